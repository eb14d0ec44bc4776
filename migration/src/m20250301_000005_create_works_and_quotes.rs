use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Works {
    Table,
    Id,
    ClientId,
    Title,
    Description,
    Category,
    PayPerHour,
    DurationValue,
    DurationUnit,
    Location,
    Status,
    Skills,
    ShowContactInfo,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Quotes {
    Table,
    Id,
    WorkId,
    FreelancerId,
    ProposedRate,
    EstimatedDuration,
    CoverLetter,
    Status,
    EmailSent,
    EmailSentAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClientProfiles {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum FreelancerProfiles {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Works::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Works::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Works::ClientId).uuid().not_null())
                    .col(ColumnDef::new(Works::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Works::Description).text().not_null())
                    .col(ColumnDef::new(Works::Category).string().not_null().default(""))
                    .col(ColumnDef::new(Works::PayPerHour).double().not_null())
                    .col(ColumnDef::new(Works::DurationValue).integer().not_null())
                    .col(
                        ColumnDef::new(Works::DurationUnit)
                            .string()
                            .not_null()
                            .default("hours"),
                    )
                    .col(ColumnDef::new(Works::Location).string().not_null().default(""))
                    .col(ColumnDef::new(Works::Status).string().not_null().default("open"))
                    .col(
                        ColumnDef::new(Works::Skills)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(Works::ShowContactInfo)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Works::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Works::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_works_client_id")
                            .from(Works::Table, Works::ClientId)
                            .to(ClientProfiles::Table, ClientProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Quotes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Quotes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Quotes::WorkId).uuid().not_null())
                    .col(ColumnDef::new(Quotes::FreelancerId).uuid().not_null())
                    .col(ColumnDef::new(Quotes::ProposedRate).double().not_null())
                    .col(ColumnDef::new(Quotes::EstimatedDuration).integer().not_null())
                    .col(ColumnDef::new(Quotes::CoverLetter).text().not_null())
                    .col(
                        ColumnDef::new(Quotes::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Quotes::EmailSent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Quotes::EmailSentAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Quotes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Quotes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quotes_work_id")
                            .from(Quotes::Table, Quotes::WorkId)
                            .to(Works::Table, Works::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quotes_freelancer_id")
                            .from(Quotes::Table, Quotes::FreelancerId)
                            .to(FreelancerProfiles::Table, FreelancerProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One quote per freelancer per work.
        manager
            .create_index(
                Index::create()
                    .name("idx_quotes_unique_work_freelancer")
                    .table(Quotes::Table)
                    .col(Quotes::WorkId)
                    .col(Quotes::FreelancerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Quotes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Works::Table).to_owned())
            .await
    }
}
