//! Create upcoming meal table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UpcomingMeal::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UpcomingMeal::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UpcomingMeal::Title)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UpcomingMeal::Category)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(UpcomingMeal::Image).string_len(1024))
                    .col(
                        ColumnDef::new(UpcomingMeal::Ingredients)
                            .json_binary()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(UpcomingMeal::Description).text())
                    .col(
                        ColumnDef::new(UpcomingMeal::Price)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(UpcomingMeal::Rating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(UpcomingMeal::DistributorName)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UpcomingMeal::DistributorEmail)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UpcomingMeal::Likes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UpcomingMeal::LikedBy)
                            .json_binary()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(UpcomingMeal::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_upcoming_meal_title_distributor")
                    .table(UpcomingMeal::Table)
                    .col(UpcomingMeal::Title)
                    .col(UpcomingMeal::DistributorEmail)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // GIN index: liked_by (membership checks in the vote statements)
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_upcoming_meal_liked_by \
                 ON upcoming_meal USING GIN (liked_by)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UpcomingMeal::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UpcomingMeal {
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
    LikedBy,
    CreatedAt,
}
