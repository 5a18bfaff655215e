//! Create review table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Review::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Review::MealId).string_len(32).not_null())
                    .col(ColumnDef::new(Review::MealTitle).string_len(256).not_null())
                    .col(ColumnDef::new(Review::UserEmail).string_len(256).not_null())
                    .col(ColumnDef::new(Review::UserName).string_len(128))
                    .col(ColumnDef::new(Review::Review).text().not_null())
                    .col(ColumnDef::new(Review::Rating).integer())
                    .col(
                        ColumnDef::new(Review::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Review::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_meal")
                            .from(Review::Table, Review::MealId)
                            .to(Meal::Table, Meal::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: meal_id (for listing reviews of a meal)
        manager
            .create_index(
                Index::create()
                    .name("idx_review_meal_id")
                    .table(Review::Table)
                    .col(Review::MealId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Review::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Review {
    Table,
    Id,
    MealId,
    MealTitle,
    UserEmail,
    UserName,
    Review,
    Rating,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Meal {
    Table,
    Id,
}
