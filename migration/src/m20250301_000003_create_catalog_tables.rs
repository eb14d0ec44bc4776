use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    Slug,
    Icon,
}

#[derive(DeriveIden)]
enum Skills {
    Table,
    Id,
    Name,
    CategoryId,
}

/// (name, slug, icon)
const CATEGORIES: &[(&str, &str, &str)] = &[
    ("Photography", "photography", "📷"),
    ("Videography", "videography", "🎬"),
    ("Graphic Design", "graphic-design", "🎨"),
    ("Web Development", "web-development", "💻"),
    ("Tutoring", "tutoring", "📚"),
    ("Home Repair", "home-repair", "🔧"),
    ("Music Lessons", "music-lessons", "🎵"),
    ("Personal Training", "personal-training", "💪"),
    ("Event Planning", "event-planning", "🎉"),
    ("Writing", "writing", "✍️"),
];

/// (skill name, category slug)
const SKILLS: &[(&str, &str)] = &[
    ("Portrait Photography", "photography"),
    ("Wedding Photography", "photography"),
    ("Product Photography", "photography"),
    ("Logo Design", "graphic-design"),
    ("Brand Identity", "graphic-design"),
    ("React Development", "web-development"),
    ("WordPress", "web-development"),
    ("Python/Django", "web-development"),
    ("Math Tutoring", "tutoring"),
    ("English Tutoring", "tutoring"),
    ("Piano Lessons", "music-lessons"),
    ("Guitar Lessons", "music-lessons"),
    ("Fitness Training", "personal-training"),
    ("Plumbing", "home-repair"),
    ("Electrical", "home-repair"),
    ("Content Writing", "writing"),
    ("Copywriting", "writing"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Categories::Slug).string().not_null().unique_key())
                    .col(ColumnDef::new(Categories::Icon).string().not_null().default(""))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Skills::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Skills::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Skills::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Skills::CategoryId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_skills_category_id")
                            .from(Skills::Table, Skills::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Seed the catalog so search and portfolios have something to match against.
        let db = manager.get_connection();
        for (name, slug, icon) in CATEGORIES {
            db.execute_unprepared(&format!(
                "INSERT INTO categories (name, slug, icon) VALUES ('{name}', '{slug}', '{icon}') \
                 ON CONFLICT (slug) DO NOTHING"
            ))
            .await?;
        }
        for (name, slug) in SKILLS {
            db.execute_unprepared(&format!(
                "INSERT INTO skills (name, category_id) \
                 SELECT '{name}', id FROM categories WHERE slug = '{slug}' \
                 ON CONFLICT (name) DO NOTHING"
            ))
            .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Skills::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await
    }
}
