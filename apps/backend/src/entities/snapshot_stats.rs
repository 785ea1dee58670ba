use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One (metric, rank, value) row of a snapshot. `value` is experience for
/// skills, kills for bosses and score for activities.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "snapshot_stats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "snapshot_id")]
    pub snapshot_id: i64,
    #[sea_orm(column_name = "metric")]
    pub metric: String,
    #[sea_orm(column_name = "rank")]
    pub rank: i32,
    #[sea_orm(column_name = "value")]
    pub value: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::snapshots::Entity",
        from = "Column::SnapshotId",
        to = "super::snapshots::Column::Id"
    )]
    Snapshot,
}

impl Related<super::snapshots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Snapshot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
