use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum FreelancerProfiles {
    Table,
    Id,
    UserId,
    DisplayName,
    Tagline,
    Bio,
    ProfilePhoto,
    CoverPhoto,
    City,
    State,
    Country,
    Latitude,
    Longitude,
    Address,
    Phone,
    HourlyRate,
    PriceMin,
    PriceMax,
    Availability,
    ResponseTimeHours,
    YearsExperience,
    Languages,
    LinkedinUrl,
    WebsiteUrl,
    GithubUrl,
    TwitterUrl,
    InstagramUrl,
    Education,
    WorkExperience,
    Certifications,
    AiTags,
    ActivityScore,
    ProfileViews,
    IsProfileComplete,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClientProfiles {
    Table,
    Id,
    UserId,
    FullName,
    ProfilePhoto,
    City,
    Phone,
    IsProfileComplete,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClientBookmarks {
    Table,
    ClientId,
    FreelancerId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

fn text_col<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name).string().not_null().default("").to_owned()
}

fn json_list_col<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .json_binary()
        .not_null()
        .default(Expr::cust("'[]'::jsonb"))
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FreelancerProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FreelancerProfiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FreelancerProfiles::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(text_col(FreelancerProfiles::DisplayName))
                    .col(text_col(FreelancerProfiles::Tagline))
                    .col(
                        ColumnDef::new(FreelancerProfiles::Bio)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(text_col(FreelancerProfiles::ProfilePhoto))
                    .col(text_col(FreelancerProfiles::CoverPhoto))
                    .col(text_col(FreelancerProfiles::City))
                    .col(text_col(FreelancerProfiles::State))
                    .col(text_col(FreelancerProfiles::Country))
                    .col(ColumnDef::new(FreelancerProfiles::Latitude).double().null())
                    .col(ColumnDef::new(FreelancerProfiles::Longitude).double().null())
                    .col(text_col(FreelancerProfiles::Address))
                    .col(text_col(FreelancerProfiles::Phone))
                    .col(ColumnDef::new(FreelancerProfiles::HourlyRate).double().null())
                    .col(ColumnDef::new(FreelancerProfiles::PriceMin).double().null())
                    .col(ColumnDef::new(FreelancerProfiles::PriceMax).double().null())
                    .col(
                        ColumnDef::new(FreelancerProfiles::Availability)
                            .string()
                            .not_null()
                            .default("offline"),
                    )
                    .col(
                        ColumnDef::new(FreelancerProfiles::ResponseTimeHours)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(FreelancerProfiles::YearsExperience)
                            .integer()
                            .null(),
                    )
                    .col(json_list_col(FreelancerProfiles::Languages))
                    .col(text_col(FreelancerProfiles::LinkedinUrl))
                    .col(text_col(FreelancerProfiles::WebsiteUrl))
                    .col(text_col(FreelancerProfiles::GithubUrl))
                    .col(text_col(FreelancerProfiles::TwitterUrl))
                    .col(text_col(FreelancerProfiles::InstagramUrl))
                    .col(json_list_col(FreelancerProfiles::Education))
                    .col(json_list_col(FreelancerProfiles::WorkExperience))
                    .col(json_list_col(FreelancerProfiles::Certifications))
                    .col(json_list_col(FreelancerProfiles::AiTags))
                    .col(
                        ColumnDef::new(FreelancerProfiles::ActivityScore)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(FreelancerProfiles::ProfileViews)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(FreelancerProfiles::IsProfileComplete)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(FreelancerProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FreelancerProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_freelancer_profiles_user_id")
                            .from(FreelancerProfiles::Table, FreelancerProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ClientProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClientProfiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClientProfiles::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(text_col(ClientProfiles::FullName))
                    .col(text_col(ClientProfiles::ProfilePhoto))
                    .col(text_col(ClientProfiles::City))
                    .col(text_col(ClientProfiles::Phone))
                    .col(
                        ColumnDef::new(ClientProfiles::IsProfileComplete)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ClientProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClientProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_client_profiles_user_id")
                            .from(ClientProfiles::Table, ClientProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ClientBookmarks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ClientBookmarks::ClientId).uuid().not_null())
                    .col(ColumnDef::new(ClientBookmarks::FreelancerId).uuid().not_null())
                    .col(
                        ColumnDef::new(ClientBookmarks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ClientBookmarks::ClientId)
                            .col(ClientBookmarks::FreelancerId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_client_bookmarks_client_id")
                            .from(ClientBookmarks::Table, ClientBookmarks::ClientId)
                            .to(ClientProfiles::Table, ClientProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_client_bookmarks_freelancer_id")
                            .from(ClientBookmarks::Table, ClientBookmarks::FreelancerId)
                            .to(FreelancerProfiles::Table, FreelancerProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClientBookmarks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClientProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FreelancerProfiles::Table).to_owned())
            .await
    }
}
