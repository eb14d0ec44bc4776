use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum ProfileViews {
    Table,
    Id,
    FreelancerId,
    ViewerId,
    IpAddress,
    UserAgent,
    Referrer,
    ViewedAt,
}

#[derive(DeriveIden)]
enum SearchQueries {
    Table,
    Id,
    Query,
    ResultsCount,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum FreelancerProfiles {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProfileViews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProfileViews::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProfileViews::FreelancerId).uuid().not_null())
                    .col(ColumnDef::new(ProfileViews::ViewerId).uuid().null())
                    .col(ColumnDef::new(ProfileViews::IpAddress).string().null())
                    .col(
                        ColumnDef::new(ProfileViews::UserAgent)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ProfileViews::Referrer)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ProfileViews::ViewedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_views_freelancer_id")
                            .from(ProfileViews::Table, ProfileViews::FreelancerId)
                            .to(FreelancerProfiles::Table, FreelancerProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_views_viewer_id")
                            .from(ProfileViews::Table, ProfileViews::ViewerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SearchQueries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SearchQueries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SearchQueries::Query).string().not_null())
                    .col(
                        ColumnDef::new(SearchQueries::ResultsCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(SearchQueries::UserId).uuid().null())
                    .col(
                        ColumnDef::new(SearchQueries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_search_queries_user_id")
                            .from(SearchQueries::Table, SearchQueries::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SearchQueries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProfileViews::Table).to_owned())
            .await
    }
}
