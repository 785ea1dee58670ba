//! Player repository functions for domain layer.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::players_sea as players_adapter;
use crate::domain::name::standardize_username;
use crate::errors::domain::DomainError;

/// Player domain model.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub kind: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<crate::entities::players::Model> for Player {
    fn from(model: crate::entities::players::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            display_name: model.display_name,
            kind: model.kind,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<Player>, DomainError> {
    let player = players_adapter::find_by_id(conn, id).await?;
    Ok(player.map(Player::from))
}

pub async fn find_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
) -> Result<Vec<Player>, DomainError> {
    let players = players_adapter::find_by_ids(conn, ids).await?;
    Ok(players.into_iter().map(Player::from).collect())
}

pub async fn find_by_username<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<Option<Player>, DomainError> {
    let player = players_adapter::find_by_username(conn, &standardize_username(username)).await?;
    Ok(player.map(Player::from))
}

/// Find or create players for a list of display names, idempotently.
///
/// Usernames are standardized before lookup; the display name keeps the
/// caller's sanitized casing on first creation. Returns players in the
/// same order as the input list.
pub async fn find_or_create_many<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    display_names: &[String],
) -> Result<Vec<Player>, DomainError> {
    let usernames: Vec<String> = display_names
        .iter()
        .map(|n| standardize_username(n))
        .collect();

    let existing = players_adapter::find_by_usernames(conn, &usernames).await?;
    let mut by_username: HashMap<String, Player> = existing
        .into_iter()
        .map(|m| (m.username.clone(), Player::from(m)))
        .collect();

    for (display_name, username) in display_names.iter().zip(usernames.iter()) {
        if by_username.contains_key(username) {
            continue;
        }
        let created = players_adapter::create(
            conn,
            players_adapter::PlayerCreate {
                username: username.clone(),
                display_name: crate::domain::name::sanitize_name(display_name),
                kind: "regular".to_string(),
            },
        )
        .await?;
        by_username.insert(username.clone(), Player::from(created));
    }

    Ok(usernames
        .iter()
        .filter_map(|u| by_username.get(u).cloned())
        .collect())
}

/// Members of a group whose stats have not been refreshed since `cutoff`.
pub async fn find_outdated_by_group<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
    cutoff: OffsetDateTime,
) -> Result<Vec<Player>, DomainError> {
    let players = players_adapter::find_outdated_by_group(conn, group_id, cutoff).await?;
    Ok(players.into_iter().map(Player::from).collect())
}
