//! SeaORM adapter for snapshot lookups.
//!
//! The per-member "latest snapshot" joins are hand-written SQL: the ORM
//! rendition needs one correlated query per member, and these run on every
//! group page view.

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, QueryFilter, QueryOrder, Statement,
};

use crate::entities::{snapshot_stats, snapshots};

/// One member row with the overall value from their latest snapshot.
#[derive(Debug, Clone, FromQueryResult)]
pub struct MemberOverallRow {
    pub player_id: i64,
    pub username: String,
    pub display_name: String,
    pub kind: String,
    pub role: String,
    /// None when the player has no snapshot yet.
    pub overall_value: Option<i64>,
}

/// One member row with rank/value for a single metric from their latest
/// snapshot.
#[derive(Debug, Clone, FromQueryResult)]
pub struct MemberMetricRow {
    pub player_id: i64,
    pub username: String,
    pub display_name: String,
    pub kind: String,
    pub rank: i32,
    pub value: i64,
}

/// All members of a group joined to their latest snapshot's overall value,
/// sorted by role string then username.
pub async fn member_overall_rows<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
) -> Result<Vec<MemberOverallRow>, sea_orm::DbErr> {
    let stmt = Statement::from_sql_and_values(
        conn.get_database_backend(),
        r#"
        SELECT m.player_id AS player_id,
               p.username AS username,
               p.display_name AS display_name,
               p.kind AS kind,
               m.role AS role,
               (SELECT ss.value
                  FROM snapshots s
                  JOIN snapshot_stats ss
                    ON ss.snapshot_id = s.id AND ss.metric = 'overall'
                 WHERE s.player_id = m.player_id
                 ORDER BY s.created_at DESC, s.id DESC
                 LIMIT 1) AS overall_value
          FROM memberships m
          JOIN players p ON p.id = m.player_id
         WHERE m.group_id = $1
         ORDER BY m.role ASC, p.username ASC
        "#,
        [group_id.into()],
    );
    MemberOverallRow::find_by_statement(stmt).all(conn).await
}

/// Members of a group with their latest-snapshot rank/value for one metric,
/// unranked (rank <= 0) members filtered out, sorted by value descending.
pub async fn member_metric_rows<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
    metric_code: &str,
    limit: u64,
    offset: u64,
) -> Result<Vec<MemberMetricRow>, sea_orm::DbErr> {
    let stmt = Statement::from_sql_and_values(
        conn.get_database_backend(),
        r#"
        SELECT m.player_id AS player_id,
               p.username AS username,
               p.display_name AS display_name,
               p.kind AS kind,
               ss.rank AS rank,
               ss.value AS value
          FROM memberships m
          JOIN players p ON p.id = m.player_id
          JOIN snapshots s
            ON s.id = (SELECT s2.id
                         FROM snapshots s2
                        WHERE s2.player_id = m.player_id
                        ORDER BY s2.created_at DESC, s2.id DESC
                        LIMIT 1)
          JOIN snapshot_stats ss
            ON ss.snapshot_id = s.id AND ss.metric = $2
         WHERE m.group_id = $1
           AND ss.rank > 0
         ORDER BY ss.value DESC
         LIMIT $3 OFFSET $4
        "#,
        [
            group_id.into(),
            metric_code.into(),
            (limit as i64).into(),
            (offset as i64).into(),
        ],
    );
    MemberMetricRow::find_by_statement(stmt).all(conn).await
}

/// Latest snapshot row for a player, if any.
pub async fn latest_for_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<snapshots::Model>, sea_orm::DbErr> {
    snapshots::Entity::find()
        .filter(snapshots::Column::PlayerId.eq(player_id))
        .order_by_desc(snapshots::Column::CreatedAt)
        .order_by_desc(snapshots::Column::Id)
        .one(conn)
        .await
}

pub async fn stats_for_snapshot<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    snapshot_id: i64,
) -> Result<Vec<snapshot_stats::Model>, sea_orm::DbErr> {
    snapshot_stats::Entity::find()
        .filter(snapshot_stats::Column::SnapshotId.eq(snapshot_id))
        .order_by_asc(snapshot_stats::Column::Metric)
        .all(conn)
        .await
}
