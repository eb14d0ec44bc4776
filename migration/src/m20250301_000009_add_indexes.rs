use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum FreelancerProfiles {
    Table,
    Availability,
    ActivityScore,
    City,
}

#[derive(DeriveIden)]
enum Works {
    Table,
    ClientId,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ContactRequests {
    Table,
    SenderId,
    FreelancerId,
}

#[derive(DeriveIden)]
enum ProfileViews {
    Table,
    FreelancerId,
    ViewedAt,
}

#[derive(DeriveIden)]
enum PortfolioItems {
    Table,
    PortfolioId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Candidate pools for recommendations and trending filter on availability.
        manager
            .create_index(
                Index::create()
                    .name("idx_freelancer_profiles_availability_score")
                    .table(FreelancerProfiles::Table)
                    .col(FreelancerProfiles::Availability)
                    .col(FreelancerProfiles::ActivityScore)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_freelancer_profiles_city")
                    .table(FreelancerProfiles::Table)
                    .col(FreelancerProfiles::City)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_works_client_id")
                    .table(Works::Table)
                    .col(Works::ClientId)
                    .to_owned(),
            )
            .await?;

        // Open works, newest first.
        manager
            .create_index(
                Index::create()
                    .name("idx_works_status_created")
                    .table(Works::Table)
                    .col(Works::Status)
                    .col(Works::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contact_requests_sender_freelancer")
                    .table(ContactRequests::Table)
                    .col(ContactRequests::SenderId)
                    .col(ContactRequests::FreelancerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contact_requests_freelancer_id")
                    .table(ContactRequests::Table)
                    .col(ContactRequests::FreelancerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_profile_views_freelancer_viewed")
                    .table(ProfileViews::Table)
                    .col(ProfileViews::FreelancerId)
                    .col(ProfileViews::ViewedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_portfolio_items_portfolio_id")
                    .table(PortfolioItems::Table)
                    .col(PortfolioItems::PortfolioId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_freelancer_profiles_availability_score",
            "idx_freelancer_profiles_city",
            "idx_works_client_id",
            "idx_works_status_created",
            "idx_contact_requests_sender_freelancer",
            "idx_contact_requests_freelancer_id",
            "idx_profile_views_freelancer_viewed",
            "idx_portfolio_items_portfolio_id",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}
