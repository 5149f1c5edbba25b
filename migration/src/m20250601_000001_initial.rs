use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    WechatOpenid,
    WechatUnionid,
    Nickname,
    AvatarUrl,
    IsAdmin,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Admins {
    Table,
    Id,
    Username,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Wishes {
    Table,
    Id,
    ChildName,
    Gender,
    Content,
    Reason,
    Grade,
    PhotoUrl,
    IsPublished,
    ActiveRecordId,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum WishRecords {
    Table,
    Id,
    Status,
    WishId,
    DonorId,
    DonorName,
    DonorMobile,
    DonorAddress,
    DonorComment,
    ShippingNumber,
    ShippingTime,
    ConfirmationMessage,
    ConfirmationPhotos,
    ConfirmationTime,
    DeliveryNumber,
    DeliveryTime,
    ReceiptMessage,
    ReceiptPhotos,
    ReceiptTime,
    PlatformGiftMessage,
    PlatformGiftPhotos,
    PlatformGiftTime,
    OwnerGiftMessage,
    OwnerGiftPhotos,
    OwnerGiftTime,
    CancellationTime,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::WechatOpenid)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::WechatUnionid).string_len(64).null())
                    .col(ColumnDef::new(Users::Nickname).string_len(64).null())
                    .col(ColumnDef::new(Users::AvatarUrl).string_len(512).null())
                    .col(
                        ColumnDef::new(Users::IsAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Admins::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Admins::Username)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Admins::PasswordHash)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Admins::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Admins::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Admins::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Wishes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Wishes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Wishes::ChildName).string_len(64).not_null())
                    .col(ColumnDef::new(Wishes::Gender).string_len(16).not_null())
                    .col(ColumnDef::new(Wishes::Content).text().not_null())
                    .col(ColumnDef::new(Wishes::Reason).text().not_null())
                    .col(ColumnDef::new(Wishes::Grade).string_len(32).null())
                    .col(ColumnDef::new(Wishes::PhotoUrl).string_len(512).null())
                    .col(
                        ColumnDef::new(Wishes::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Wishes::ActiveRecordId).big_integer().null())
                    .col(
                        ColumnDef::new(Wishes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Wishes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Wishes::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WishRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WishRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WishRecords::Status)
                            .string_len(32)
                            .not_null()
                            .default("pending_shipment"),
                    )
                    .col(ColumnDef::new(WishRecords::WishId).big_integer().not_null())
                    .col(
                        ColumnDef::new(WishRecords::DonorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WishRecords::DonorName)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WishRecords::DonorMobile)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WishRecords::DonorAddress)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WishRecords::DonorComment)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(WishRecords::ShippingNumber)
                            .string_len(64)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WishRecords::ShippingTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(WishRecords::ConfirmationMessage).text().null())
                    .col(
                        ColumnDef::new(WishRecords::ConfirmationPhotos)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WishRecords::ConfirmationTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WishRecords::DeliveryNumber)
                            .string_len(64)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WishRecords::DeliveryTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(WishRecords::ReceiptMessage).text().null())
                    .col(ColumnDef::new(WishRecords::ReceiptPhotos).text().null())
                    .col(
                        ColumnDef::new(WishRecords::ReceiptTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WishRecords::PlatformGiftMessage)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WishRecords::PlatformGiftPhotos)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WishRecords::PlatformGiftTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(WishRecords::OwnerGiftMessage).text().null())
                    .col(ColumnDef::new(WishRecords::OwnerGiftPhotos).text().null())
                    .col(
                        ColumnDef::new(WishRecords::OwnerGiftTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WishRecords::CancellationTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WishRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(WishRecords::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(WishRecords::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_wish_records_donor_id")
                    .table(WishRecords::Table)
                    .col(WishRecords::DonorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_wish_records_wish_id")
                    .table(WishRecords::Table)
                    .col(WishRecords::WishId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WishRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wishes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Admins::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
