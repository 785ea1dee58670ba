use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique after sanitization.
    #[sea_orm(column_name = "name")]
    pub name: String,
    #[sea_orm(column_name = "clan_chat")]
    pub clan_chat: Option<String>,
    /// blake3 hex of the verification code. Never leaves the storage layer.
    #[serde(skip_serializing)]
    #[sea_orm(column_name = "verification_hash")]
    pub verification_hash: String,
    #[sea_orm(column_name = "verified")]
    pub verified: bool,
    /// Recomputed by the score refresh pass.
    #[sea_orm(column_name = "score")]
    pub score: i32,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::memberships::Entity")]
    Memberships,
}

impl Related<super::memberships::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Memberships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
