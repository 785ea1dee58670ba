//! SeaORM adapter for group storage.

use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::groups;

pub mod dto;

pub use dto::{GroupCreate, GroupEdit};

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<groups::Model>, sea_orm::DbErr> {
    groups::Entity::find_by_id(id).one(conn).await
}

/// Case-insensitive exact match on the sanitized name.
pub async fn find_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
) -> Result<Option<groups::Model>, sea_orm::DbErr> {
    groups::Entity::find()
        .filter(
            Expr::expr(Func::lower(Expr::col((
                groups::Entity,
                groups::Column::Name,
            ))))
            .eq(name.to_lowercase()),
        )
        .one(conn)
        .await
}

/// Case-insensitive substring search, ordered by score desc then id asc.
pub async fn search_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name_filter: &str,
    limit: u64,
    offset: u64,
) -> Result<Vec<groups::Model>, sea_orm::DbErr> {
    let mut query = groups::Entity::find();
    if !name_filter.is_empty() {
        query = query.filter(
            Expr::expr(Func::lower(Expr::col((
                groups::Entity,
                groups::Column::Name,
            ))))
            .like(format!("%{}%", name_filter.to_lowercase())),
        );
    }
    query
        .order_by_desc(groups::Column::Score)
        .order_by_asc(groups::Column::Id)
        .limit(limit)
        .offset(offset)
        .all(conn)
        .await
}

/// Groups by id, ordered by score desc then id asc, paginated.
pub async fn find_by_ids_ordered<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
    limit: u64,
    offset: u64,
) -> Result<Vec<groups::Model>, sea_orm::DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    groups::Entity::find()
        .filter(groups::Column::Id.is_in(ids.iter().copied()))
        .order_by_desc(groups::Column::Score)
        .order_by_asc(groups::Column::Id)
        .limit(limit)
        .offset(offset)
        .all(conn)
        .await
}

pub async fn find_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<groups::Model>, sea_orm::DbErr> {
    groups::Entity::find()
        .order_by_asc(groups::Column::Id)
        .all(conn)
        .await
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GroupCreate,
) -> Result<groups::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let group_active = groups::ActiveModel {
        id: NotSet,
        name: Set(dto.name),
        clan_chat: Set(dto.clan_chat),
        verification_hash: Set(dto.verification_hash),
        verified: Set(false),
        score: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };
    group_active.insert(conn).await
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GroupEdit,
) -> Result<groups::Model, sea_orm::DbErr> {
    let group = groups::ActiveModel {
        id: Set(dto.id),
        name: match dto.name {
            Some(name) => Set(name),
            None => NotSet,
        },
        clan_chat: match dto.clan_chat {
            Some(clan_chat) => Set(Some(clan_chat)),
            None => NotSet,
        },
        verification_hash: NotSet,
        verified: NotSet,
        score: NotSet,
        created_at: NotSet,
        updated_at: Set(time::OffsetDateTime::now_utc()),
    };
    group.update(conn).await
}

pub async fn update_score<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    score: i32,
) -> Result<(), sea_orm::DbErr> {
    groups::Entity::update_many()
        .col_expr(groups::Column::Score, Expr::value(score))
        .filter(groups::Column::Id.eq(id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Bump the group's updated_at timestamp.
pub async fn touch<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<(), sea_orm::DbErr> {
    groups::Entity::update_many()
        .col_expr(
            groups::Column::UpdatedAt,
            Expr::value(time::OffsetDateTime::now_utc()),
        )
        .filter(groups::Column::Id.eq(id))
        .exec(conn)
        .await?;
    Ok(())
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<(), sea_orm::DbErr> {
    groups::Entity::delete_many()
        .filter(groups::Column::Id.eq(id))
        .exec(conn)
        .await?;
    Ok(())
}
