//! Group repository functions for domain layer.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::groups_sea as groups_adapter;
use crate::errors::domain::DomainError;

pub use crate::adapters::groups_sea::{GroupCreate, GroupEdit};

/// Group domain model. The verification hash deliberately stays behind in
/// the entity; callers that need it go through
/// [`verification_hash_by_id`].
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub clan_chat: Option<String>,
    pub verified: bool,
    pub score: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<crate::entities::groups::Model> for Group {
    fn from(model: crate::entities::groups::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            clan_chat: model.clan_chat,
            verified: model.verified,
            score: model.score,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<Group>, DomainError> {
    let group = groups_adapter::find_by_id(conn, id).await?;
    Ok(group.map(Group::from))
}

pub async fn find_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
) -> Result<Option<Group>, DomainError> {
    let group = groups_adapter::find_by_name(conn, name).await?;
    Ok(group.map(Group::from))
}

pub async fn search_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name_filter: &str,
    limit: u64,
    offset: u64,
) -> Result<Vec<Group>, DomainError> {
    let groups = groups_adapter::search_by_name(conn, name_filter, limit, offset).await?;
    Ok(groups.into_iter().map(Group::from).collect())
}

pub async fn find_by_ids_ordered<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
    limit: u64,
    offset: u64,
) -> Result<Vec<Group>, DomainError> {
    let groups = groups_adapter::find_by_ids_ordered(conn, ids, limit, offset).await?;
    Ok(groups.into_iter().map(Group::from).collect())
}

pub async fn find_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<Group>, DomainError> {
    let groups = groups_adapter::find_all(conn).await?;
    Ok(groups.into_iter().map(Group::from).collect())
}

/// Stored verification hash for a group. Only the verification module
/// should look at this.
pub async fn verification_hash_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<String>, DomainError> {
    let group = groups_adapter::find_by_id(conn, id).await?;
    Ok(group.map(|g| g.verification_hash))
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GroupCreate,
) -> Result<Group, DomainError> {
    let group = groups_adapter::create(conn, dto).await?;
    Ok(Group::from(group))
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GroupEdit,
) -> Result<Group, DomainError> {
    let group = groups_adapter::update(conn, dto).await?;
    Ok(Group::from(group))
}

pub async fn update_score<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    score: i32,
) -> Result<(), DomainError> {
    groups_adapter::update_score(conn, id, score).await?;
    Ok(())
}

pub async fn touch<C: ConnectionTrait + Send + Sync>(conn: &C, id: i64) -> Result<(), DomainError> {
    groups_adapter::touch(conn, id).await?;
    Ok(())
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<(), DomainError> {
    groups_adapter::delete(conn, id).await?;
    Ok(())
}
