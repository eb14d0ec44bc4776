use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Portfolios {
    Table,
    Id,
    FreelancerId,
    Title,
    Description,
    IsPublished,
    Completeness,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PortfolioItems {
    Table,
    Id,
    PortfolioId,
    Title,
    Description,
    MediaUrl,
    MediaType,
    AiTags,
    IsFeatured,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PortfolioCategories {
    Table,
    PortfolioId,
    CategoryId,
}

#[derive(DeriveIden)]
enum PortfolioSkills {
    Table,
    PortfolioId,
    SkillId,
}

#[derive(DeriveIden)]
enum FreelancerProfiles {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Skills {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Portfolios::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Portfolios::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Portfolios::FreelancerId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Portfolios::Title).string().not_null())
                    .col(
                        ColumnDef::new(Portfolios::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Portfolios::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Portfolios::Completeness)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Portfolios::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Portfolios::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portfolios_freelancer_id")
                            .from(Portfolios::Table, Portfolios::FreelancerId)
                            .to(FreelancerProfiles::Table, FreelancerProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PortfolioItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PortfolioItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PortfolioItems::PortfolioId).uuid().not_null())
                    .col(ColumnDef::new(PortfolioItems::Title).string().not_null())
                    .col(
                        ColumnDef::new(PortfolioItems::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(PortfolioItems::MediaUrl).string().not_null())
                    .col(
                        ColumnDef::new(PortfolioItems::MediaType)
                            .string()
                            .not_null()
                            .default("image"),
                    )
                    .col(
                        ColumnDef::new(PortfolioItems::AiTags)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(PortfolioItems::IsFeatured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PortfolioItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portfolio_items_portfolio_id")
                            .from(PortfolioItems::Table, PortfolioItems::PortfolioId)
                            .to(Portfolios::Table, Portfolios::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PortfolioCategories::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PortfolioCategories::PortfolioId).uuid().not_null())
                    .col(
                        ColumnDef::new(PortfolioCategories::CategoryId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(PortfolioCategories::PortfolioId)
                            .col(PortfolioCategories::CategoryId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portfolio_categories_portfolio_id")
                            .from(PortfolioCategories::Table, PortfolioCategories::PortfolioId)
                            .to(Portfolios::Table, Portfolios::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portfolio_categories_category_id")
                            .from(PortfolioCategories::Table, PortfolioCategories::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PortfolioSkills::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PortfolioSkills::PortfolioId).uuid().not_null())
                    .col(ColumnDef::new(PortfolioSkills::SkillId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(PortfolioSkills::PortfolioId)
                            .col(PortfolioSkills::SkillId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portfolio_skills_portfolio_id")
                            .from(PortfolioSkills::Table, PortfolioSkills::PortfolioId)
                            .to(Portfolios::Table, Portfolios::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portfolio_skills_skill_id")
                            .from(PortfolioSkills::Table, PortfolioSkills::SkillId)
                            .to(Skills::Table, Skills::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PortfolioSkills::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PortfolioCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PortfolioItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Portfolios::Table).to_owned())
            .await
    }
}
