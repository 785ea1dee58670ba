//! Shared helpers for backend integration tests: an in-memory SQLite
//! database with the schema applied, snapshot seeding, and in-memory fakes
//! for the sibling services.
#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use backend::domain::metrics::{Metric, Period};
use backend::domain::pagination::Pagination;
use backend::entities::{groups, players, snapshot_stats, snapshots};
use backend::errors::DomainError;
use backend::repos::players::Player;
use backend::services::siblings::{
    AchievementService, CompetitionService, DeltaService, MemberUpdateAction, PlayerAchievement,
    PlayerDelta, PlayerRecord, RecordService,
};
use backend::{connect_db, DbProfile};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter, Set};
use time::OffsetDateTime;

#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}

/// Fresh in-memory SQLite database with all migrations applied.
pub async fn test_db() -> Result<DatabaseConnection, DomainError> {
    let conn = connect_db(DbProfile::InMemory).await?;
    migration::migrate(&conn, migration::MigrationCommand::Up)
        .await
        .map_err(DomainError::from)?;
    Ok(conn)
}

/// Insert a snapshot with the given (metric, rank, value) stat rows.
pub async fn seed_snapshot(
    conn: &DatabaseConnection,
    player_id: i64,
    stats: &[(Metric, i32, i64)],
) -> Result<i64, DomainError> {
    seed_snapshot_at(conn, player_id, stats, OffsetDateTime::now_utc()).await
}

pub async fn seed_snapshot_at(
    conn: &DatabaseConnection,
    player_id: i64,
    stats: &[(Metric, i32, i64)],
    created_at: OffsetDateTime,
) -> Result<i64, DomainError> {
    let snapshot = snapshots::ActiveModel {
        id: NotSet,
        player_id: Set(player_id),
        created_at: Set(created_at),
    }
    .insert(conn)
    .await
    .map_err(DomainError::from)?;

    for (metric, rank, value) in stats {
        snapshot_stats::ActiveModel {
            id: NotSet,
            snapshot_id: Set(snapshot.id),
            metric: Set(metric.code().to_string()),
            rank: Set(*rank),
            value: Set(*value),
        }
        .insert(conn)
        .await
        .map_err(DomainError::from)?;
    }
    Ok(snapshot.id)
}

/// Backdate a player's last-refresh timestamp.
pub async fn set_player_updated_at(
    conn: &DatabaseConnection,
    player_id: i64,
    updated_at: OffsetDateTime,
) -> Result<(), DomainError> {
    players::Entity::update_many()
        .col_expr(
            players::Column::UpdatedAt,
            sea_orm::sea_query::Expr::value(updated_at),
        )
        .filter(players::Column::Id.eq(player_id))
        .exec(conn)
        .await
        .map_err(DomainError::from)?;
    Ok(())
}

/// Mark a group as verified, bypassing whatever out-of-band process does
/// that in production.
pub async fn set_group_verified(
    conn: &DatabaseConnection,
    group_id: i64,
) -> Result<(), DomainError> {
    groups::Entity::update_many()
        .col_expr(groups::Column::Verified, sea_orm::sea_query::Expr::value(true))
        .filter(groups::Column::Id.eq(group_id))
        .exec(conn)
        .await
        .map_err(DomainError::from)?;
    Ok(())
}

/// Competition fake with fixed ongoing/upcoming counts.
pub struct FakeCompetitions {
    pub ongoing: u64,
    pub upcoming: u64,
}

impl FakeCompetitions {
    pub fn none() -> Self {
        Self {
            ongoing: 0,
            upcoming: 0,
        }
    }
}

#[async_trait]
impl CompetitionService for FakeCompetitions {
    async fn count_ongoing(&self, _group_id: i64) -> Result<u64, DomainError> {
        Ok(self.ongoing)
    }

    async fn count_upcoming(&self, _group_id: i64) -> Result<u64, DomainError> {
        Ok(self.upcoming)
    }
}

/// Delta fake serving a canned gain list, filtered to the requested players.
pub struct FakeDeltas {
    pub gains: Vec<PlayerDelta>,
}

#[async_trait]
impl DeltaService for FakeDeltas {
    async fn group_deltas(
        &self,
        player_ids: &[i64],
        _period: Period,
        _metric: Metric,
    ) -> Result<Vec<PlayerDelta>, DomainError> {
        Ok(self
            .gains
            .iter()
            .filter(|d| player_ids.contains(&d.player_id))
            .cloned()
            .collect())
    }
}

pub struct FakeAchievements {
    pub achievements: Vec<PlayerAchievement>,
}

#[async_trait]
impl AchievementService for FakeAchievements {
    async fn group_achievements(
        &self,
        player_ids: &[i64],
        pagination: Pagination,
    ) -> Result<Vec<PlayerAchievement>, DomainError> {
        Ok(self
            .achievements
            .iter()
            .filter(|a| player_ids.contains(&a.player_id))
            .skip(pagination.offset as usize)
            .take(pagination.limit as usize)
            .cloned()
            .collect())
    }
}

pub struct FakeRecords {
    pub records: Vec<PlayerRecord>,
}

#[async_trait]
impl RecordService for FakeRecords {
    async fn group_records(
        &self,
        player_ids: &[i64],
        metric: Metric,
        period: Period,
        _pagination: Pagination,
    ) -> Result<Vec<PlayerRecord>, DomainError> {
        Ok(self
            .records
            .iter()
            .filter(|r| {
                player_ids.contains(&r.player_id) && r.metric == metric && r.period == period
            })
            .cloned()
            .collect())
    }
}

/// Update action that records which players it was invoked for.
#[derive(Default)]
pub struct RecordingUpdateAction {
    pub seen: Mutex<Vec<i64>>,
}

#[async_trait]
impl MemberUpdateAction for RecordingUpdateAction {
    async fn update(&self, player: &Player) -> Result<(), DomainError> {
        self.seen
            .lock()
            .expect("update action mutex poisoned")
            .push(player.id);
        Ok(())
    }
}
