use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========================================
        // LOOKUP TABLES
        // ========================================
        manager
            .create_table(
                Table::create()
                    .table(PopupTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PopupTypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PopupTypes::Name).string().not_null())
                    .col(
                        ColumnDef::new(PopupTypes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PopupTypes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PopupLayoutTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PopupLayoutTypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PopupLayoutTypes::Name).string().not_null())
                    .col(
                        ColumnDef::new(PopupLayoutTypes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PopupLayoutTypes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // ========================================
        // POPUPS TABLE
        // ========================================
        manager
            .create_table(
                Table::create()
                    .table(Popups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Popups::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Popups::OwnerId).integer().not_null())
                    .col(ColumnDef::new(Popups::TypeId).integer().not_null())
                    .col(ColumnDef::new(Popups::LayoutTypeId).integer().not_null())
                    .col(
                        ColumnDef::new(Popups::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Popups::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_popups_type")
                            .from(Popups::Table, Popups::TypeId)
                            .to(PopupTypes::Table, PopupTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_popups_layout_type")
                            .from(Popups::Table, Popups::LayoutTypeId)
                            .to(PopupLayoutTypes::Table, PopupLayoutTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_popups_owner_id")
                    .table(Popups::Table)
                    .col(Popups::OwnerId)
                    .to_owned(),
            )
            .await?;

        // ========================================
        // POPUP_VARIANTS TABLE
        // ========================================
        manager
            .create_table(
                Table::create()
                    .table(PopupVariants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PopupVariants::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PopupVariants::PopupId).integer().not_null())
                    .col(ColumnDef::new(PopupVariants::Name).string().not_null())
                    .col(ColumnDef::new(PopupVariants::Content).json_binary().not_null())
                    .col(
                        ColumnDef::new(PopupVariants::IsPrimary)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PopupVariants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PopupVariants::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_popup_variants_popup")
                            .from(PopupVariants::Table, PopupVariants::PopupId)
                            .to(Popups::Table, Popups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_popup_variants_popup_id")
                    .table(PopupVariants::Table)
                    .col(PopupVariants::PopupId)
                    .to_owned(),
            )
            .await?;

        // ========================================
        // POPUP_SCHEDULES TABLE
        // ========================================
        manager
            .create_table(
                Table::create()
                    .table(PopupSchedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PopupSchedules::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PopupSchedules::VariantId).integer().not_null())
                    .col(
                        ColumnDef::new(PopupSchedules::TimeDelay)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PopupSchedules::DisplayPages)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PopupSchedules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PopupSchedules::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_popup_schedules_variant")
                            .from(PopupSchedules::Table, PopupSchedules::VariantId)
                            .to(PopupVariants::Table, PopupVariants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_popup_schedules_variant_id")
                    .table(PopupSchedules::Table)
                    .col(PopupSchedules::VariantId)
                    .to_owned(),
            )
            .await?;

        // ========================================
        // POPUP_ANALYTICS TABLE
        // ========================================
        manager
            .create_table(
                Table::create()
                    .table(PopupAnalytics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PopupAnalytics::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PopupAnalytics::PopupId).integer().not_null())
                    .col(ColumnDef::new(PopupAnalytics::VariantId).integer().not_null())
                    .col(ColumnDef::new(PopupAnalytics::DeviceType).string().not_null())
                    .col(ColumnDef::new(PopupAnalytics::PageUrl).string().not_null())
                    .col(
                        ColumnDef::new(PopupAnalytics::Views)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PopupAnalytics::Clicks)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PopupAnalytics::Conversions)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PopupAnalytics::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PopupAnalytics::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_popup_analytics_popup")
                            .from(PopupAnalytics::Table, PopupAnalytics::PopupId)
                            .to(Popups::Table, Popups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_popup_analytics_variant")
                            .from(PopupAnalytics::Table, PopupAnalytics::VariantId)
                            .to(PopupVariants::Table, PopupVariants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Counter buckets are keyed by this triple; upserts target it.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_popup_analytics_bucket_unique")
                    .table(PopupAnalytics::Table)
                    .col(PopupAnalytics::VariantId)
                    .col(PopupAnalytics::PageUrl)
                    .col(PopupAnalytics::DeviceType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_popup_analytics_popup_id")
                    .table(PopupAnalytics::Table)
                    .col(PopupAnalytics::PopupId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children first so foreign keys never dangle
        manager
            .drop_index(
                Index::drop()
                    .name("idx_popup_analytics_popup_id")
                    .table(PopupAnalytics::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_popup_analytics_bucket_unique")
                    .table(PopupAnalytics::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(PopupAnalytics::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_popup_schedules_variant_id")
                    .table(PopupSchedules::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(PopupSchedules::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_popup_variants_popup_id")
                    .table(PopupVariants::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(PopupVariants::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_popups_owner_id")
                    .table(Popups::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Popups::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PopupLayoutTypes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PopupTypes::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum PopupTypes {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PopupLayoutTypes {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Popups {
    Table,
    Id,
    OwnerId,
    TypeId,
    LayoutTypeId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PopupVariants {
    Table,
    Id,
    PopupId,
    Name,
    Content,
    IsPrimary,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PopupSchedules {
    Table,
    Id,
    VariantId,
    TimeDelay,
    DisplayPages,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PopupAnalytics {
    Table,
    Id,
    PopupId,
    VariantId,
    DeviceType,
    PageUrl,
    Views,
    Clicks,
    Conversions,
    CreatedAt,
    UpdatedAt,
}
