//! Collaborator traits for the group service.
//!
//! Deltas, achievements, records and competitions live in sibling services
//! outside this crate; the group service consumes them through these
//! traits. Tests substitute in-memory fakes.

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::domain::metrics::{Metric, Period};
use crate::domain::pagination::Pagination;
use crate::errors::domain::DomainError;

/// One player's gain over a period for a metric.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerDelta {
    pub player_id: i64,
    pub username: String,
    pub gained: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerAchievement {
    pub player_id: i64,
    pub metric: Metric,
    pub threshold: i64,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub player_id: i64,
    pub metric: Metric,
    pub period: Period,
    pub value: i64,
}

/// Ranked gains for a set of players.
#[async_trait]
pub trait DeltaService: Send + Sync {
    /// Gains for the given players over a period for one metric, sorted by
    /// gained value descending.
    async fn group_deltas(
        &self,
        player_ids: &[i64],
        period: Period,
        metric: Metric,
    ) -> Result<Vec<PlayerDelta>, DomainError>;
}

#[async_trait]
pub trait AchievementService: Send + Sync {
    /// Recent achievements of the given players, newest first, paginated.
    async fn group_achievements(
        &self,
        player_ids: &[i64],
        pagination: Pagination,
    ) -> Result<Vec<PlayerAchievement>, DomainError>;
}

#[async_trait]
pub trait RecordService: Send + Sync {
    /// Best recorded gains of the given players for a metric and period,
    /// sorted descending, paginated.
    async fn group_records(
        &self,
        player_ids: &[i64],
        metric: Metric,
        period: Period,
        pagination: Pagination,
    ) -> Result<Vec<PlayerRecord>, DomainError>;
}

#[async_trait]
pub trait CompetitionService: Send + Sync {
    async fn count_ongoing(&self, group_id: i64) -> Result<u64, DomainError>;
    async fn count_upcoming(&self, group_id: i64) -> Result<u64, DomainError>;
}

/// Per-player action invoked by `update_all_members` for members whose
/// stats have gone stale. The caller decides what an update means, e.g.
/// enqueueing a stats refresh.
#[async_trait]
pub trait MemberUpdateAction: Send + Sync {
    async fn update(&self, player: &crate::repos::players::Player) -> Result<(), DomainError>;
}
