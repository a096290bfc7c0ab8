use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(
            m20240101_000001_create_properties_table::Migration,
        )]
    }
}

// Migration implementations

mod m20240101_000001_create_properties_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_properties_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create properties table aligned with entities::property Model
            manager
                .create_table(
                    Table::create()
                        .table(Properties::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Properties::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Properties::Title).string().not_null())
                        .col(ColumnDef::new(Properties::Image).text().not_null())
                        .col(ColumnDef::new(Properties::Slug).string().not_null())
                        .col(ColumnDef::new(Properties::Location).string().not_null())
                        .col(ColumnDef::new(Properties::Description).text().not_null())
                        .col(ColumnDef::new(Properties::Price).decimal().not_null())
                        .col(ColumnDef::new(Properties::PropertyType).string().not_null())
                        .col(ColumnDef::new(Properties::Status).string().not_null())
                        .col(ColumnDef::new(Properties::Area).double().not_null())
                        .col(
                            ColumnDef::new(Properties::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Properties::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // Slug is the alternate key; duplicate detection relies on this index
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_properties_slug")
                        .table(Properties::Table)
                        .col(Properties::Slug)
                        .unique()
                        .to_owned(),
                )
                .await?;

            // Newest-first listing order
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_properties_created_at")
                        .table(Properties::Table)
                        .col(Properties::CreatedAt)
                        .to_owned(),
                )
                .await?;

            // Filtered list path
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_properties_location_status_type")
                        .table(Properties::Table)
                        .col(Properties::Location)
                        .col(Properties::Status)
                        .col(Properties::PropertyType)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Properties::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Properties {
        Table,
        Id,
        Title,
        Image,
        Slug,
        Location,
        Description,
        Price,
        PropertyType,
        Status,
        Area,
        CreatedAt,
        UpdatedAt,
    }
}
