//! Snapshot repository functions for domain layer.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::snapshots_sea as snapshots_adapter;
use crate::domain::metrics::Metric;
use crate::errors::domain::DomainError;

pub use crate::adapters::snapshots_sea::{MemberMetricRow, MemberOverallRow};

/// A single tracked metric inside a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotStat {
    pub metric: Metric,
    pub rank: i32,
    pub value: i64,
}

/// A player's latest snapshot together with its parsed stat lines.
///
/// Stat rows whose metric code is not recognized are dropped rather than
/// failing the whole read.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub id: i64,
    pub player_id: i64,
    pub created_at: OffsetDateTime,
    pub stats: Vec<SnapshotStat>,
}

impl PlayerSnapshot {
    pub fn stat(&self, metric: Metric) -> Option<&SnapshotStat> {
        self.stats.iter().find(|s| s.metric == metric)
    }
}

/// Latest snapshot for a player, with all its stat rows.
pub async fn latest_for_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<PlayerSnapshot>, DomainError> {
    let Some(snapshot) = snapshots_adapter::latest_for_player(conn, player_id).await? else {
        return Ok(None);
    };
    let rows = snapshots_adapter::stats_for_snapshot(conn, snapshot.id).await?;
    let stats = rows
        .into_iter()
        .filter_map(|row| {
            Metric::from_code(&row.metric).map(|metric| SnapshotStat {
                metric,
                rank: row.rank,
                value: row.value,
            })
        })
        .collect();
    Ok(Some(PlayerSnapshot {
        id: snapshot.id,
        player_id: snapshot.player_id,
        created_at: snapshot.created_at,
        stats,
    }))
}

/// Group members joined to their latest overall value, role then username
/// ordered.
pub async fn member_overall_rows<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
) -> Result<Vec<MemberOverallRow>, DomainError> {
    Ok(snapshots_adapter::member_overall_rows(conn, group_id).await?)
}

/// Ranked members of a group for one metric, value descending, paginated.
pub async fn member_metric_rows<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
    metric: Metric,
    limit: u64,
    offset: u64,
) -> Result<Vec<MemberMetricRow>, DomainError> {
    Ok(snapshots_adapter::member_metric_rows(conn, group_id, metric.code(), limit, offset).await?)
}
