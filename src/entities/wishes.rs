use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[sea_orm(string_value = "male")]
    Male,
    #[sea_orm(string_value = "female")]
    Female,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "wishes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub child_name: String,
    pub gender: Gender,
    pub content: String,
    pub reason: String,
    pub grade: Option<String>,
    pub photo_url: Option<String>,
    pub is_published: bool,
    /// 当前生效的认领记录，空表示可认领
    pub active_record_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 心愿可被认领：未被认领且已公开
    pub fn claimable(&self) -> bool {
        self.active_record_id.is_none() && self.is_published
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wish(active_record_id: Option<i64>, is_published: bool) -> Model {
        Model {
            id: 1,
            child_name: "小明".to_string(),
            gender: Gender::Male,
            content: "一套画笔".to_string(),
            reason: "喜欢画画".to_string(),
            grade: None,
            photo_url: None,
            is_published,
            active_record_id,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }

    #[test]
    fn test_claimable() {
        assert!(wish(None, true).claimable());
        assert!(!wish(Some(7), true).claimable());
        assert!(!wish(None, false).claimable());
        assert!(!wish(Some(7), false).claimable());
    }
}
