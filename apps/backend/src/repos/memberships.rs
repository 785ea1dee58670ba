//! Membership repository functions for domain layer.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::memberships_sea as memberships_adapter;
use crate::domain::roles::Role;
use crate::errors::domain::DomainError;

pub use crate::adapters::memberships_sea::MembershipCreate;

/// Group membership domain model.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMembership {
    pub id: i64,
    pub group_id: i64,
    pub player_id: i64,
    pub role: Role,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<crate::entities::memberships::Model> for GroupMembership {
    fn from(model: crate::entities::memberships::Model) -> Self {
        Self {
            id: model.id,
            group_id: model.group_id,
            player_id: model.player_id,
            // Unknown role strings degrade to plain membership.
            role: Role::from_code(&model.role).unwrap_or_default(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub async fn find_by_group<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
) -> Result<Vec<GroupMembership>, DomainError> {
    let memberships = memberships_adapter::find_by_group(conn, group_id).await?;
    Ok(memberships.into_iter().map(GroupMembership::from).collect())
}

pub async fn find_by_group_and_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
    player_id: i64,
) -> Result<Option<GroupMembership>, DomainError> {
    let membership =
        memberships_adapter::find_by_group_and_player(conn, group_id, player_id).await?;
    Ok(membership.map(GroupMembership::from))
}

pub async fn find_by_group_and_players<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
    player_ids: &[i64],
) -> Result<Vec<GroupMembership>, DomainError> {
    let memberships =
        memberships_adapter::find_by_group_and_players(conn, group_id, player_ids).await?;
    Ok(memberships.into_iter().map(GroupMembership::from).collect())
}

pub async fn group_ids_by_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Vec<i64>, DomainError> {
    Ok(memberships_adapter::group_ids_by_player(conn, player_id).await?)
}

pub async fn player_ids_by_group<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
) -> Result<Vec<i64>, DomainError> {
    Ok(memberships_adapter::player_ids_by_group(conn, group_id).await?)
}

/// Member counts for a set of groups; groups with no rows default to 0 on
/// the caller's side.
pub async fn count_by_group_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_ids: &[i64],
) -> Result<Vec<(i64, i64)>, DomainError> {
    Ok(memberships_adapter::count_by_group_ids(conn, group_ids).await?)
}

pub async fn create_many<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dtos: Vec<MembershipCreate>,
) -> Result<(), DomainError> {
    memberships_adapter::create_many(conn, dtos).await?;
    Ok(())
}

pub async fn update_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    membership_id: i64,
    role: Role,
) -> Result<(), DomainError> {
    memberships_adapter::update_role(conn, membership_id, role.code()).await?;
    Ok(())
}

pub async fn delete_by_group<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
) -> Result<u64, DomainError> {
    Ok(memberships_adapter::delete_by_group(conn, group_id).await?)
}

pub async fn delete_by_group_and_players<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
    player_ids: &[i64],
) -> Result<u64, DomainError> {
    Ok(memberships_adapter::delete_by_group_and_players(conn, group_id, player_ids).await?)
}
