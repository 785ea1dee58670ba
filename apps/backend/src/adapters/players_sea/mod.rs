//! SeaORM adapter for player storage.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, NotSet, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use time::OffsetDateTime;

use crate::entities::{memberships, players};

#[derive(Debug, Clone)]
pub struct PlayerCreate {
    /// Standardized (lowercase, sanitized) username.
    pub username: String,
    pub display_name: String,
    pub kind: String,
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find_by_id(id).one(conn).await
}

pub async fn find_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
) -> Result<Vec<players::Model>, sea_orm::DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    players::Entity::find()
        .filter(players::Column::Id.is_in(ids.iter().copied()))
        .all(conn)
        .await
}

pub async fn find_by_username<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find()
        .filter(players::Column::Username.eq(username))
        .one(conn)
        .await
}

pub async fn find_by_usernames<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    usernames: &[String],
) -> Result<Vec<players::Model>, sea_orm::DbErr> {
    if usernames.is_empty() {
        return Ok(Vec::new());
    }
    players::Entity::find()
        .filter(players::Column::Username.is_in(usernames.iter().cloned()))
        .all(conn)
        .await
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PlayerCreate,
) -> Result<players::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let player_active = players::ActiveModel {
        id: NotSet,
        username: Set(dto.username),
        display_name: Set(dto.display_name),
        kind: Set(dto.kind),
        created_at: Set(now),
        updated_at: Set(now),
    };
    player_active.insert(conn).await
}

/// Members of a group whose player row has not been refreshed since `cutoff`.
pub async fn find_outdated_by_group<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
    cutoff: OffsetDateTime,
) -> Result<Vec<players::Model>, sea_orm::DbErr> {
    players::Entity::find()
        .join(JoinType::InnerJoin, players::Relation::Memberships.def())
        .filter(memberships::Column::GroupId.eq(group_id))
        .filter(players::Column::UpdatedAt.lt(cutoff))
        .order_by_asc(players::Column::Id)
        .all(conn)
        .await
}
