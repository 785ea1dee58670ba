//! SeaORM adapter for membership storage.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::memberships;

pub mod dto;

pub use dto::MembershipCreate;

pub async fn find_by_group<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
) -> Result<Vec<memberships::Model>, sea_orm::DbErr> {
    memberships::Entity::find()
        .filter(memberships::Column::GroupId.eq(group_id))
        .order_by_asc(memberships::Column::PlayerId)
        .all(conn)
        .await
}

pub async fn find_by_group_and_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
    player_id: i64,
) -> Result<Option<memberships::Model>, sea_orm::DbErr> {
    memberships::Entity::find()
        .filter(memberships::Column::GroupId.eq(group_id))
        .filter(memberships::Column::PlayerId.eq(player_id))
        .one(conn)
        .await
}

pub async fn find_by_group_and_players<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
    player_ids: &[i64],
) -> Result<Vec<memberships::Model>, sea_orm::DbErr> {
    if player_ids.is_empty() {
        return Ok(Vec::new());
    }
    memberships::Entity::find()
        .filter(memberships::Column::GroupId.eq(group_id))
        .filter(memberships::Column::PlayerId.is_in(player_ids.iter().copied()))
        .all(conn)
        .await
}

/// Distinct group ids a player belongs to.
pub async fn group_ids_by_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Vec<i64>, sea_orm::DbErr> {
    let rows = memberships::Entity::find()
        .filter(memberships::Column::PlayerId.eq(player_id))
        .all(conn)
        .await?;
    let mut ids: Vec<i64> = rows.into_iter().map(|m| m.group_id).collect();
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}

pub async fn player_ids_by_group<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
) -> Result<Vec<i64>, sea_orm::DbErr> {
    let rows = memberships::Entity::find()
        .filter(memberships::Column::GroupId.eq(group_id))
        .all(conn)
        .await?;
    let mut ids: Vec<i64> = rows.into_iter().map(|m| m.player_id).collect();
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}

/// Membership counts grouped by group id, one query for a whole page.
pub async fn count_by_group_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_ids: &[i64],
) -> Result<Vec<(i64, i64)>, sea_orm::DbErr> {
    if group_ids.is_empty() {
        return Ok(Vec::new());
    }
    memberships::Entity::find()
        .select_only()
        .column(memberships::Column::GroupId)
        .column_as(Expr::col(memberships::Column::Id).count(), "member_count")
        .filter(memberships::Column::GroupId.is_in(group_ids.iter().copied()))
        .group_by(memberships::Column::GroupId)
        .into_tuple::<(i64, i64)>()
        .all(conn)
        .await
}

pub async fn create_many<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dtos: Vec<MembershipCreate>,
) -> Result<(), sea_orm::DbErr> {
    if dtos.is_empty() {
        return Ok(());
    }
    let now = time::OffsetDateTime::now_utc();
    let models = dtos.into_iter().map(|dto| memberships::ActiveModel {
        id: NotSet,
        group_id: Set(dto.group_id),
        player_id: Set(dto.player_id),
        role: Set(dto.role),
        created_at: Set(now),
        updated_at: Set(now),
    });
    memberships::Entity::insert_many(models).exec(conn).await?;
    Ok(())
}

pub async fn update_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    membership_id: i64,
    role: &str,
) -> Result<(), sea_orm::DbErr> {
    memberships::Entity::update_many()
        .col_expr(memberships::Column::Role, Expr::value(role))
        .col_expr(
            memberships::Column::UpdatedAt,
            Expr::value(time::OffsetDateTime::now_utc()),
        )
        .filter(memberships::Column::Id.eq(membership_id))
        .exec(conn)
        .await?;
    Ok(())
}

pub async fn delete_by_group<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let res = memberships::Entity::delete_many()
        .filter(memberships::Column::GroupId.eq(group_id))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

pub async fn delete_by_group_and_players<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
    player_ids: &[i64],
) -> Result<u64, sea_orm::DbErr> {
    if player_ids.is_empty() {
        return Ok(0);
    }
    let res = memberships::Entity::delete_many()
        .filter(memberships::Column::GroupId.eq(group_id))
        .filter(memberships::Column::PlayerId.is_in(player_ids.iter().copied()))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}
