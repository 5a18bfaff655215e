//! Create meal order table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MealOrder::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MealOrder::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MealOrder::MealId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(MealOrder::MealTitle)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MealOrder::Price)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(MealOrder::UserEmail)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MealOrder::UserName).string_len(128))
                    .col(
                        ColumnDef::new(MealOrder::Status)
                            .string_len(16)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(
                        ColumnDef::new(MealOrder::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_email (for a user's order history)
        manager
            .create_index(
                Index::create()
                    .name("idx_meal_order_user_email")
                    .table(MealOrder::Table)
                    .col(MealOrder::UserEmail)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MealOrder::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MealOrder {
    Table,
    Id,
    MealId,
    MealTitle,
    Price,
    UserEmail,
    UserName,
    Status,
    CreatedAt,
}
