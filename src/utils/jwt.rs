use crate::error::{AppError, AppResult};
use crate::models::{AuthenticatedUser, Role};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id 或 admin_id
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expires_in: i64,
}

impl JwtService {
    pub fn new(secret: &str, token_expires_in: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expires_in,
        }
    }

    pub fn generate_token(&self, subject_id: i64, role: Role) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.token_expires_in);

        let claims = Claims {
            sub: subject_id.to_string(),
            role: role.as_str().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AppError::JwtError)
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(AppError::JwtError)
    }

    /// 校验令牌并还原调用主体
    pub fn authenticate(&self, token: &str) -> AppResult<AuthenticatedUser> {
        let claims = self.verify_token(token)?;

        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))?;
        let role = Role::parse(&claims.role)
            .ok_or_else(|| AppError::AuthError("Invalid token role".to_string()))?;

        Ok(AuthenticatedUser { id, role })
    }

    pub fn get_token_expires_in(&self) -> i64 {
        self.token_expires_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let service = JwtService::new("test-secret", 3600);
        let token = service.generate_token(42, Role::User).unwrap();

        let principal = service.authenticate(&token).unwrap();
        assert_eq!(principal.id, 42);
        assert_eq!(principal.role, Role::User);
    }

    #[test]
    fn test_admin_role_preserved() {
        let service = JwtService::new("test-secret", 3600);
        let token = service.generate_token(1, Role::Admin).unwrap();
        assert!(service.authenticate(&token).unwrap().is_admin());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = JwtService::new("test-secret", 3600);
        let token = service.generate_token(1, Role::User).unwrap();

        let other = JwtService::new("other-secret", 3600);
        assert!(other.authenticate(&token).is_err());
    }
}
