use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKey, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Players {
    Table,
    Id,
    Username,
    DisplayName,
    Kind,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Groups {
    Table,
    Id,
    Name,
    ClanChat,
    VerificationHash,
    Verified,
    Score,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Memberships {
    Table,
    Id,
    GroupId,
    PlayerId,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Snapshots {
    Table,
    Id,
    PlayerId,
    CreatedAt,
}

#[derive(Iden)]
enum SnapshotStats {
    Table,
    Id,
    SnapshotId,
    Metric,
    Rank,
    Value,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // players
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Players::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Players::Username).string().not_null())
                    .col(ColumnDef::new(Players::DisplayName).string().not_null())
                    .col(
                        ColumnDef::new(Players::Kind)
                            .string()
                            .not_null()
                            .default("regular"),
                    )
                    .col(
                        ColumnDef::new(Players::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Players::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_players_username_unique")
                    .table(Players::Table)
                    .col(Players::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // groups
        manager
            .create_table(
                Table::create()
                    .table(Groups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Groups::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Groups::Name).string().not_null())
                    .col(ColumnDef::new(Groups::ClanChat).string().null())
                    .col(
                        ColumnDef::new(Groups::VerificationHash)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Groups::Verified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Groups::Score)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Groups::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Groups::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_groups_name_unique")
                    .table(Groups::Table)
                    .col(Groups::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // memberships
        manager
            .create_table(
                Table::create()
                    .table(Memberships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Memberships::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Memberships::GroupId).big_integer().not_null())
                    .col(ColumnDef::new(Memberships::PlayerId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Memberships::Role)
                            .string()
                            .not_null()
                            .default("member"),
                    )
                    .col(
                        ColumnDef::new(Memberships::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Memberships::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_memberships_group")
                            .from(Memberships::Table, Memberships::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_memberships_player")
                            .from(Memberships::Table, Memberships::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A player appears at most once per group.
        manager
            .create_index(
                Index::create()
                    .name("idx_memberships_group_player_unique")
                    .table(Memberships::Table)
                    .col(Memberships::GroupId)
                    .col(Memberships::PlayerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // snapshots
        manager
            .create_table(
                Table::create()
                    .table(Snapshots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Snapshots::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Snapshots::PlayerId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Snapshots::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_snapshots_player")
                            .from(Snapshots::Table, Snapshots::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Latest-snapshot lookups scan (player_id, created_at desc).
        manager
            .create_index(
                Index::create()
                    .name("idx_snapshots_player_created")
                    .table(Snapshots::Table)
                    .col(Snapshots::PlayerId)
                    .col(Snapshots::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // snapshot_stats
        manager
            .create_table(
                Table::create()
                    .table(SnapshotStats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SnapshotStats::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(SnapshotStats::SnapshotId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SnapshotStats::Metric).string().not_null())
                    .col(ColumnDef::new(SnapshotStats::Rank).integer().not_null())
                    .col(ColumnDef::new(SnapshotStats::Value).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_snapshot_stats_snapshot")
                            .from(SnapshotStats::Table, SnapshotStats::SnapshotId)
                            .to(Snapshots::Table, Snapshots::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_snapshot_stats_snapshot_metric_unique")
                    .table(SnapshotStats::Table)
                    .col(SnapshotStats::SnapshotId)
                    .col(SnapshotStats::Metric)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SnapshotStats::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Snapshots::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Memberships::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Groups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await?;
        Ok(())
    }
}
