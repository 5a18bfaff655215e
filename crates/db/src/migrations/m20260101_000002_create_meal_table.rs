//! Create meal table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Meal::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Meal::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Meal::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Meal::Category).string_len(64).not_null())
                    .col(ColumnDef::new(Meal::Image).string_len(1024))
                    .col(
                        ColumnDef::new(Meal::Ingredients)
                            .json_binary()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Meal::Description).text())
                    .col(ColumnDef::new(Meal::Price).double().not_null().default(0.0))
                    .col(ColumnDef::new(Meal::Rating).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Meal::DistributorName)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Meal::DistributorEmail)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Meal::Likes).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Meal::ReviewsCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Meal::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::col(Meal::Likes).gte(0))
                    .to_owned(),
            )
            .await?;

        // Unique index: (title, distributor_email) - the duplicate check on create
        manager
            .create_index(
                Index::create()
                    .name("idx_meal_title_distributor")
                    .table(Meal::Table)
                    .col(Meal::Title)
                    .col(Meal::DistributorEmail)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: distributor_email (for search)
        manager
            .create_index(
                Index::create()
                    .name("idx_meal_distributor_email")
                    .table(Meal::Table)
                    .col(Meal::DistributorEmail)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Meal::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Meal {
    Table,
    Id,
    Title,
    Category,
    Image,
    Ingredients,
    Description,
    Price,
    Rating,
    DistributorName,
    DistributorEmail,
    Likes,
    ReviewsCount,
    CreatedAt,
}
