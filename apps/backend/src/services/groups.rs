//! Group domain service.
//!
//! Orchestrates group queries and mutations over the repos layer, and
//! delegates delta/achievement/record/competition lookups to sibling
//! services through the traits in [`super::siblings`]. Verification codes
//! gate every mutation after creation; only the blake3 hash is stored and
//! the plaintext is returned exactly once, from [`GroupService::create`].

use std::collections::{HashMap, HashSet};

use futures::future::join_all;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::db::txn::with_txn;
use crate::domain::levels;
use crate::domain::metrics::{Measure, Metric, MetricKind, Period};
use crate::domain::name::{is_valid_username, sanitize_name, standardize_username};
use crate::domain::pagination::Pagination;
use crate::domain::roles::Role;
use crate::domain::scoring::{self, ScoreInputs};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::repos::groups::{self, Group, GroupCreate, GroupEdit};
use crate::repos::memberships::{self, GroupMembership, MembershipCreate};
use crate::repos::players;
use crate::repos::snapshots::{self, PlayerSnapshot, SnapshotStat};
use crate::services::siblings::{
    AchievementService, CompetitionService, DeltaService, MemberUpdateAction, PlayerAchievement,
    PlayerDelta, PlayerRecord, RecordService,
};
use crate::utils::verification;

/// Window after which a member's stats count as stale.
const STALE_MEMBER_CUTOFF: Duration = Duration::minutes(10);

/// A group with its live member count attached.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupWithCount {
    pub group: Group,
    pub member_count: i64,
}

/// Requested member for create/edit/set/add operations.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberInput {
    pub username: String,
    pub role: Role,
}

impl MemberInput {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    pub fn member(username: impl Into<String>) -> Self {
        Self::new(username, Role::Member)
    }
}

/// Result of a successful [`GroupService::create`]. The verification code
/// is plaintext and is never stored or logged; this is the caller's only
/// chance to see it.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedGroup {
    pub group: Group,
    pub verification_code: String,
}

/// One row of the group member listing: member joined to their latest
/// snapshot's overall experience.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberListEntry {
    pub player_id: i64,
    pub username: String,
    pub display_name: String,
    pub role: Role,
    pub overall_exp: Option<i64>,
}

/// One row of a group hiscores page for a single metric.
#[derive(Debug, Clone, PartialEq)]
pub struct HiscoresEntry {
    pub player_id: i64,
    pub username: String,
    pub display_name: String,
    pub rank: i32,
    pub value: i64,
    /// Derived level, for individual skill metrics only.
    pub level: Option<i32>,
}

/// A member and their latest full snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberStats {
    pub player_id: i64,
    pub snapshot: PlayerSnapshot,
}

/// Aggregate statistics over the latest snapshots of a group's members.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStatistics {
    pub maxed_combat_count: u64,
    pub maxed_total_count: u64,
    /// Total number of 200m-experience skills across all members.
    pub maxed_200ms_count: u64,
    /// Per-metric averages across members that have a snapshot.
    pub average_stats: Vec<SnapshotStat>,
}

/// Outcome of [`GroupService::change_role`].
#[derive(Debug, Clone, PartialEq)]
pub struct RoleChange {
    pub player_id: i64,
    pub username: String,
    pub old_role: Role,
    pub new_role: Role,
}

/// Group domain service.
pub struct GroupService;

impl GroupService {
    pub fn new() -> Self {
        Self
    }

    // ---- Queries ----------------------------------------------------------

    /// Groups whose sanitized name contains the filter, case-insensitively,
    /// ordered by score descending then id ascending.
    pub async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        name_filter: &str,
        pagination: Pagination,
    ) -> Result<Vec<GroupWithCount>, DomainError> {
        let filter = sanitize_name(name_filter);
        let found =
            groups::search_by_name(conn, &filter, pagination.limit, pagination.offset).await?;
        attach_member_counts(conn, found).await
    }

    /// All groups a player belongs to, sorted by score descending before
    /// pagination.
    pub async fn find_for_player<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        player_id: i64,
        pagination: Pagination,
    ) -> Result<Vec<GroupWithCount>, DomainError> {
        let group_ids = memberships::group_ids_by_player(conn, player_id).await?;
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }
        let found =
            groups::find_by_ids_ordered(conn, &group_ids, pagination.limit, pagination.offset)
                .await?;
        attach_member_counts(conn, found).await
    }

    pub async fn view<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<GroupWithCount, DomainError> {
        let group = require_group(conn, id).await?;
        let mut with_counts = attach_member_counts(conn, vec![group]).await?;
        // attach_member_counts preserves its single input row.
        match with_counts.pop() {
            Some(row) => Ok(row),
            None => Err(DomainError::not_found(NotFoundKind::Group, "Group not found.")),
        }
    }

    /// Every member joined to their latest snapshot's overall experience,
    /// sorted by role string then username.
    pub async fn get_members_list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Vec<MemberListEntry>, DomainError> {
        require_group(conn, id).await?;
        let rows = snapshots::member_overall_rows(conn, id).await?;
        Ok(rows
            .into_iter()
            .map(|row| MemberListEntry {
                player_id: row.player_id,
                username: row.username,
                display_name: row.display_name,
                role: Role::from_code(&row.role).unwrap_or_default(),
                overall_exp: row.overall_value,
            })
            .collect())
    }

    /// Group hiscores for one metric: latest-snapshot rank/value per member,
    /// unranked members filtered out, sorted by value descending.
    pub async fn get_hiscores<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        metric: &str,
        pagination: Pagination,
    ) -> Result<Vec<HiscoresEntry>, DomainError> {
        let metric = parse_metric(metric)?;
        require_group(conn, id).await?;
        let rows =
            snapshots::member_metric_rows(conn, id, metric, pagination.limit, pagination.offset)
                .await?;
        Ok(rows
            .into_iter()
            .map(|row| HiscoresEntry {
                player_id: row.player_id,
                username: row.username,
                display_name: row.display_name,
                rank: row.rank,
                value: row.value,
                level: skill_level_for(metric, row.value),
            })
            .collect())
    }

    /// Latest full snapshot per member. Members without any snapshot are
    /// omitted.
    pub async fn get_member_stats<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Vec<MemberStats>, DomainError> {
        require_group(conn, id).await?;
        let player_ids = memberships::player_ids_by_group(conn, id).await?;
        let mut stats = Vec::new();
        for player_id in player_ids {
            if let Some(snapshot) = snapshots::latest_for_player(conn, player_id).await? {
                stats.push(MemberStats {
                    player_id,
                    snapshot,
                });
            }
        }
        Ok(stats)
    }

    /// Aggregate member stats: maxed-combat count, maxed-total count, total
    /// 200m skill count and a per-metric averaged snapshot.
    pub async fn get_statistics<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<GroupStatistics, DomainError> {
        let stats = self.get_member_stats(conn, id).await?;
        if stats.is_empty() {
            return Err(DomainError::validation(
                "Couldn't find any stats for this group.",
            ));
        }
        Ok(aggregate_statistics(&stats))
    }

    /// Member with the highest overall-experience gain this month.
    pub async fn get_monthly_top_player<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        deltas: &dyn DeltaService,
    ) -> Result<Option<PlayerDelta>, DomainError> {
        let player_ids = require_member_ids(conn, id).await?;
        let mut gains = deltas
            .group_deltas(&player_ids, Period::Month, Metric::Overall)
            .await?;
        Ok(if gains.is_empty() {
            None
        } else {
            Some(gains.remove(0))
        })
    }

    /// Ranked member gains for an enumerated (period, metric) pair.
    pub async fn get_deltas<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        period: &str,
        metric: &str,
        deltas: &dyn DeltaService,
    ) -> Result<Vec<PlayerDelta>, DomainError> {
        let period = parse_period(period)?;
        let metric = parse_metric(metric)?;
        let player_ids = require_member_ids(conn, id).await?;
        deltas.group_deltas(&player_ids, period, metric).await
    }

    pub async fn get_achievements<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        pagination: Pagination,
        achievements: &dyn AchievementService,
    ) -> Result<Vec<PlayerAchievement>, DomainError> {
        let player_ids = require_member_ids(conn, id).await?;
        achievements.group_achievements(&player_ids, pagination).await
    }

    pub async fn get_records<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        metric: &str,
        period: &str,
        pagination: Pagination,
        records: &dyn RecordService,
    ) -> Result<Vec<PlayerRecord>, DomainError> {
        let metric = parse_metric(metric)?;
        let period = parse_period(period)?;
        let player_ids = require_member_ids(conn, id).await?;
        records
            .group_records(&player_ids, metric, period, pagination)
            .await
    }

    // ---- Mutations --------------------------------------------------------

    /// Create a group, optionally seeding initial members. Returns the new
    /// group and the plaintext verification code exactly once.
    pub async fn create(
        &self,
        conn: &DatabaseConnection,
        name: &str,
        clan_chat: Option<String>,
        members: Vec<MemberInput>,
    ) -> Result<CreatedGroup, DomainError> {
        let name = sanitize_name(name);
        if name.is_empty() {
            return Err(DomainError::validation("Group name cannot be empty."));
        }
        if groups::find_by_name(conn, &name).await?.is_some() {
            return Err(DomainError::conflict(
                ConflictKind::UniqueGroupName,
                format!("Group name '{name}' is already taken."),
            ));
        }
        validate_usernames(&members)?;

        let code = verification::generate_verification_code();
        let hash = verification::hash_code(&code);

        let group = with_txn(conn, move |txn| {
            Box::pin(async move {
                let group = groups::create(
                    txn,
                    GroupCreate {
                        name,
                        clan_chat,
                        verification_hash: hash,
                    },
                )
                .await?;
                if !members.is_empty() {
                    replace_members(txn, group.id, &members).await?;
                }
                Ok(group)
            })
        })
        .await?;

        info!(group_id = group.id, name = %group.name, "group created");
        Ok(CreatedGroup {
            group,
            verification_code: code,
        })
    }

    /// Edit name/clan chat and optionally replace the member list wholesale.
    /// Requires the group's verification code.
    pub async fn edit(
        &self,
        conn: &DatabaseConnection,
        id: i64,
        verification_code: &str,
        name: Option<String>,
        clan_chat: Option<String>,
        members: Option<Vec<MemberInput>>,
    ) -> Result<Group, DomainError> {
        if name.is_none() && clan_chat.is_none() && members.is_none() {
            return Err(DomainError::validation("Nothing to update."));
        }
        let name = match name {
            Some(raw) => {
                let sanitized = sanitize_name(&raw);
                if sanitized.is_empty() {
                    return Err(DomainError::validation("Group name cannot be empty."));
                }
                Some(sanitized)
            }
            None => None,
        };
        if let Some(inputs) = &members {
            validate_usernames(inputs)?;
        }
        verify_group_code(conn, id, verification_code).await?;

        let group = with_txn(conn, move |txn| {
            Box::pin(async move {
                if let Some(inputs) = members {
                    replace_members(txn, id, &inputs).await?;
                }
                if name.is_some() || clan_chat.is_some() {
                    groups::update(
                        txn,
                        GroupEdit {
                            id,
                            name,
                            clan_chat,
                        },
                    )
                    .await
                } else {
                    groups::touch(txn, id).await?;
                    require_group(txn, id).await
                }
            })
        })
        .await?;

        debug!(group_id = id, "group edited");
        Ok(group)
    }

    /// Delete a group and cascade its memberships. Requires the group's
    /// verification code.
    pub async fn destroy(
        &self,
        conn: &DatabaseConnection,
        id: i64,
        verification_code: &str,
    ) -> Result<Group, DomainError> {
        let group = require_group(conn, id).await?;
        verify_group_code(conn, id, verification_code).await?;
        groups::delete(conn, id).await?;
        info!(group_id = id, name = %group.name, "group destroyed");
        Ok(group)
    }

    /// Destructive member replacement: every existing membership is deleted
    /// and the deduplicated (case-insensitive) input list recreated, missing
    /// players included.
    pub async fn set_members(
        &self,
        conn: &DatabaseConnection,
        id: i64,
        members: Vec<MemberInput>,
    ) -> Result<Vec<GroupMembership>, DomainError> {
        require_group(conn, id).await?;
        validate_usernames(&members)?;
        with_txn(conn, move |txn| {
            Box::pin(async move { replace_members(txn, id, &members).await })
        })
        .await
    }

    /// Add members to a group. Fails when every given username is already a
    /// member; leader-flagged entries that already exist get their role
    /// forced to leader.
    pub async fn add_members(
        &self,
        conn: &DatabaseConnection,
        id: i64,
        verification_code: &str,
        members: Vec<MemberInput>,
    ) -> Result<Vec<GroupMembership>, DomainError> {
        if members.is_empty() {
            return Err(DomainError::validation("Empty members list."));
        }
        validate_usernames(&members)?;
        verify_group_code(conn, id, verification_code).await?;

        let inputs = dedup_members(members);
        let (added, inserted) = with_txn(conn, move |txn| {
            Box::pin(async move {
                let usernames: Vec<String> = inputs.iter().map(|m| m.username.clone()).collect();
                let players = players::find_or_create_many(txn, &usernames).await?;
                let player_ids: Vec<i64> = players.iter().map(|p| p.id).collect();
                let existing =
                    memberships::find_by_group_and_players(txn, id, &player_ids).await?;
                let existing_ids: HashSet<i64> =
                    existing.iter().map(|m| m.player_id).collect();

                let new_rows: Vec<MembershipCreate> = inputs
                    .iter()
                    .zip(players.iter())
                    .filter(|(_, player)| !existing_ids.contains(&player.id))
                    .map(|(input, player)| MembershipCreate {
                        group_id: id,
                        player_id: player.id,
                        role: input.role.code().to_string(),
                    })
                    .collect();
                if new_rows.is_empty() {
                    return Err(DomainError::validation(
                        "All players given are already members.",
                    ));
                }
                let inserted = new_rows.len();
                memberships::create_many(txn, new_rows).await?;

                // Second pass: leader-flagged entries that were already
                // members get the role forced.
                for (input, player) in inputs.iter().zip(players.iter()) {
                    if input.role != Role::Leader {
                        continue;
                    }
                    if let Some(existing_row) =
                        existing.iter().find(|m| m.player_id == player.id)
                    {
                        if existing_row.role != Role::Leader {
                            memberships::update_role(txn, existing_row.id, Role::Leader).await?;
                        }
                    }
                }

                groups::touch(txn, id).await?;
                let rows = memberships::find_by_group_and_players(txn, id, &player_ids).await?;
                Ok((rows, inserted))
            })
        })
        .await?;

        debug!(group_id = id, added = inserted, "members added");
        Ok(added)
    }

    /// Remove members by username. Fails when none of the given usernames
    /// are members of the group.
    pub async fn remove_members(
        &self,
        conn: &DatabaseConnection,
        id: i64,
        verification_code: &str,
        usernames: Vec<String>,
    ) -> Result<u64, DomainError> {
        if usernames.is_empty() {
            return Err(DomainError::validation("Empty members list."));
        }
        verify_group_code(conn, id, verification_code).await?;

        let removed = with_txn(conn, move |txn| {
            Box::pin(async move {
                let standardized: Vec<String> =
                    usernames.iter().map(|u| standardize_username(u)).collect();
                let mut player_ids = Vec::new();
                for username in &standardized {
                    if let Some(player) = players::find_by_username(txn, username).await? {
                        player_ids.push(player.id);
                    }
                }
                let removed =
                    memberships::delete_by_group_and_players(txn, id, &player_ids).await?;
                if removed == 0 {
                    return Err(DomainError::validation(
                        "None of the players given were members of that group.",
                    ));
                }
                groups::touch(txn, id).await?;
                Ok(removed)
            })
        })
        .await?;

        debug!(group_id = id, removed, "members removed");
        Ok(removed)
    }

    /// Change a member's role. Fails when the player is not a member or
    /// already holds the role. Returns both the old and new role.
    pub async fn change_role(
        &self,
        conn: &DatabaseConnection,
        id: i64,
        verification_code: &str,
        username: &str,
        role: &str,
    ) -> Result<RoleChange, DomainError> {
        let role = Role::from_code(role)
            .ok_or_else(|| DomainError::validation(format!("Invalid role '{role}'.")))?;
        verify_group_code(conn, id, verification_code).await?;

        let username = standardize_username(username);
        let player = players::find_by_username(conn, &username)
            .await?
            .ok_or_else(|| {
                DomainError::validation(format!("'{username}' is not a member of this group."))
            })?;
        let membership = memberships::find_by_group_and_player(conn, id, player.id)
            .await?
            .ok_or_else(|| {
                DomainError::validation(format!("'{username}' is not a member of this group."))
            })?;
        if membership.role == role {
            return Err(DomainError::validation(format!(
                "'{username}' is already a {role}."
            )));
        }

        memberships::update_role(conn, membership.id, role).await?;
        debug!(group_id = id, player_id = player.id, new_role = %role, "role changed");
        Ok(RoleChange {
            player_id: player.id,
            username,
            old_role: membership.role,
            new_role: role,
        })
    }

    /// Invoke the caller-supplied action for every member whose stats are
    /// older than ten minutes. Returns how many members were passed to the
    /// action.
    pub async fn update_all_members<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        action: &dyn MemberUpdateAction,
    ) -> Result<u64, DomainError> {
        require_group(conn, id).await?;
        let cutoff = OffsetDateTime::now_utc() - STALE_MEMBER_CUTOFF;
        let outdated = players::find_outdated_by_group(conn, id, cutoff).await?;
        let count = outdated.len() as u64;
        for player in &outdated {
            action.update(player).await?;
        }
        debug!(group_id = id, count, "stale members dispatched for update");
        Ok(count)
    }

    // ---- Scoring ----------------------------------------------------------

    /// Recompute and persist every group's score, writing only on change.
    /// Groups whose recomputation fails are logged and skipped; a refresh
    /// is idempotent and last-write-wins under concurrent runs.
    pub async fn refresh_scores<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        competitions: &dyn CompetitionService,
    ) -> Result<(), DomainError> {
        let all = groups::find_all(conn).await?;
        let refreshes = all.into_iter().map(|group| async move {
            let outcome = self.calculate_score(conn, &group, competitions).await;
            match outcome {
                Ok(score) if score != group.score => {
                    groups::update_score(conn, group.id, score).await.map(|_| true)
                }
                Ok(_) => Ok(false),
                Err(err) => Err(err),
            }
            .map_err(|err| (group.id, err))
        });

        for outcome in join_all(refreshes).await {
            if let Err((group_id, err)) = outcome {
                warn!(group_id, error = %err, "score refresh failed for group");
            }
        }
        Ok(())
    }

    /// Weighted-sum score for one group. A group with no members scores 0
    /// without consulting the competition service.
    pub async fn calculate_score<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        group: &Group,
        competitions: &dyn CompetitionService,
    ) -> Result<i32, DomainError> {
        let rows = snapshots::member_overall_rows(conn, group.id).await?;
        if rows.is_empty() {
            return Ok(0);
        }

        let member_count = rows.len() as u64;
        let leader_count = rows
            .iter()
            .filter(|row| Role::from_code(&row.role) == Some(Role::Leader))
            .count() as u64;
        let with_stats: Vec<i64> = rows.iter().filter_map(|row| row.overall_value).collect();
        let avg_overall_exp = if with_stats.is_empty() {
            0
        } else {
            with_stats.iter().sum::<i64>() / with_stats.len() as i64
        };

        let inputs = ScoreInputs {
            member_count,
            leader_count,
            avg_overall_exp,
            has_clan_chat: group
                .clan_chat
                .as_deref()
                .is_some_and(|c| !c.trim().is_empty()),
            verified: group.verified,
            ongoing_competitions: competitions.count_ongoing(group.id).await?,
            upcoming_competitions: competitions.count_upcoming(group.id).await?,
        };
        Ok(scoring::calculate(&inputs))
    }
}

impl Default for GroupService {
    fn default() -> Self {
        Self::new()
    }
}

// ---- Helpers --------------------------------------------------------------

async fn require_group<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Group, DomainError> {
    groups::find_by_id(conn, id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Group, "Group not found."))
}

/// Member player ids for group-wide delegating operations; a group without
/// members is a validation error for those.
async fn require_member_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Vec<i64>, DomainError> {
    require_group(conn, id).await?;
    let player_ids = memberships::player_ids_by_group(conn, id).await?;
    if player_ids.is_empty() {
        return Err(DomainError::validation("That group has no members."));
    }
    Ok(player_ids)
}

async fn verify_group_code(
    conn: &DatabaseConnection,
    id: i64,
    code: &str,
) -> Result<(), DomainError> {
    let hash = groups::verification_hash_by_id(conn, id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Group, "Group not found."))?;
    if !verification::verify_code(code, &hash) {
        return Err(DomainError::validation("Incorrect verification code."));
    }
    Ok(())
}

fn validate_usernames(members: &[MemberInput]) -> Result<(), DomainError> {
    let invalid: Vec<&str> = members
        .iter()
        .filter(|m| !is_valid_username(&m.username))
        .map(|m| m.username.as_str())
        .collect();
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(DomainError::validation_with_data(
            "Found 1 or more invalid usernames.",
            serde_json::json!({ "invalid_usernames": invalid }),
        ))
    }
}

/// Case-insensitive dedup on standardized username; the first occurrence
/// wins.
fn dedup_members(members: Vec<MemberInput>) -> Vec<MemberInput> {
    let mut seen = HashSet::new();
    members
        .into_iter()
        .filter(|m| seen.insert(standardize_username(&m.username)))
        .collect()
}

/// Delete-and-recreate member replacement, shared by create/edit/set.
async fn replace_members<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
    members: &[MemberInput],
) -> Result<Vec<GroupMembership>, DomainError> {
    memberships::delete_by_group(conn, group_id).await?;

    let inputs = dedup_members(members.to_vec());
    if inputs.is_empty() {
        return Ok(Vec::new());
    }

    let usernames: Vec<String> = inputs.iter().map(|m| m.username.clone()).collect();
    let players = players::find_or_create_many(conn, &usernames).await?;
    let rows: Vec<MembershipCreate> = inputs
        .iter()
        .zip(players.iter())
        .map(|(input, player)| MembershipCreate {
            group_id,
            player_id: player.id,
            role: input.role.code().to_string(),
        })
        .collect();
    memberships::create_many(conn, rows).await?;

    let player_ids: Vec<i64> = players.iter().map(|p| p.id).collect();
    memberships::find_by_group_and_players(conn, group_id, &player_ids).await
}

async fn attach_member_counts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    found: Vec<Group>,
) -> Result<Vec<GroupWithCount>, DomainError> {
    let ids: Vec<i64> = found.iter().map(|g| g.id).collect();
    let counts: HashMap<i64, i64> = memberships::count_by_group_ids(conn, &ids)
        .await?
        .into_iter()
        .collect();
    Ok(found
        .into_iter()
        .map(|group| {
            let member_count = counts.get(&group.id).copied().unwrap_or(0);
            GroupWithCount {
                group,
                member_count,
            }
        })
        .collect())
}

fn parse_metric(code: &str) -> Result<Metric, DomainError> {
    Metric::from_code(code)
        .ok_or_else(|| DomainError::validation(format!("Invalid metric '{code}'.")))
}

fn parse_period(code: &str) -> Result<Period, DomainError> {
    Period::from_code(code)
        .ok_or_else(|| DomainError::validation(format!("Invalid period '{code}'.")))
}

/// Derived level for individual skill metrics; overall and non-skill
/// metrics carry no level.
fn skill_level_for(metric: Metric, value: i64) -> Option<i32> {
    if metric != Metric::Overall
        && metric.kind() == MetricKind::Skill
        && metric.measure() == Measure::Experience
    {
        Some(levels::level_for_exp(value))
    } else {
        None
    }
}

fn aggregate_statistics(stats: &[MemberStats]) -> GroupStatistics {
    let mut maxed_combat_count = 0;
    let mut maxed_total_count = 0;
    let mut maxed_200ms_count = 0;
    // metric -> (rank sum, value sum, row count)
    let mut sums: HashMap<Metric, (i64, i64, i64)> = HashMap::new();

    for member in stats {
        let snapshot = &member.snapshot;

        let skill_level = |metric: Metric| -> i32 {
            snapshot
                .stat(metric)
                .map(|s| levels::level_for_exp(s.value))
                .unwrap_or(levels::MIN_LEVEL)
        };

        let combat = levels::combat_level(
            skill_level(Metric::Attack),
            skill_level(Metric::Strength),
            skill_level(Metric::Defence),
            skill_level(Metric::Hitpoints),
            skill_level(Metric::Ranged),
            skill_level(Metric::Magic),
            skill_level(Metric::Prayer),
        );
        if combat >= levels::MAXED_COMBAT_LEVEL {
            maxed_combat_count += 1;
        }

        let total_level: i32 = Metric::SKILLS.iter().map(|m| skill_level(*m)).sum();
        if total_level >= levels::MAXED_TOTAL_LEVEL {
            maxed_total_count += 1;
        }

        for stat in &snapshot.stats {
            if stat.metric != Metric::Overall
                && stat.metric.kind() == MetricKind::Skill
                && stat.value >= levels::MAX_SKILL_EXP
            {
                maxed_200ms_count += 1;
            }
            let entry = sums.entry(stat.metric).or_insert((0, 0, 0));
            entry.0 += i64::from(stat.rank);
            entry.1 += stat.value;
            entry.2 += 1;
        }
    }

    let average_stats = Metric::ALL
        .iter()
        .filter_map(|metric| {
            sums.get(metric).map(|(rank_sum, value_sum, n)| SnapshotStat {
                metric: *metric,
                rank: (rank_sum / n) as i32,
                value: value_sum / n,
            })
        })
        .collect();

    GroupStatistics {
        maxed_combat_count,
        maxed_total_count,
        maxed_200ms_count,
        average_stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with(stats: Vec<SnapshotStat>) -> PlayerSnapshot {
        PlayerSnapshot {
            id: 1,
            player_id: 1,
            created_at: OffsetDateTime::now_utc(),
            stats,
        }
    }

    fn maxed_stats() -> Vec<SnapshotStat> {
        Metric::SKILLS
            .iter()
            .map(|m| SnapshotStat {
                metric: *m,
                rank: 1,
                value: levels::exp_for_level(99),
            })
            .collect()
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let deduped = dedup_members(vec![
            MemberInput::new("Zezima", Role::Leader),
            MemberInput::member("ZEZIMA"),
            MemberInput::member("zezima "),
            MemberInput::member("other"),
        ]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].role, Role::Leader);
        assert_eq!(deduped[1].username, "other");
    }

    #[test]
    fn invalid_usernames_carry_structured_detail() {
        let err = validate_usernames(&[
            MemberInput::member("fine"),
            MemberInput::member("bad!chars"),
        ])
        .unwrap_err();
        match err {
            DomainError::Validation { data, .. } => {
                let data = data.unwrap();
                assert_eq!(data["invalid_usernames"][0], "bad!chars");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn skill_levels_only_for_individual_skills() {
        assert_eq!(skill_level_for(Metric::Attack, 13_034_431), Some(99));
        assert_eq!(skill_level_for(Metric::Overall, 13_034_431), None);
        assert_eq!(skill_level_for(Metric::Zulrah, 500), None);
    }

    #[test]
    fn aggregate_counts_maxed_members() {
        let maxed = MemberStats {
            player_id: 1,
            snapshot: snapshot_with(maxed_stats()),
        };
        let fresh = MemberStats {
            player_id: 2,
            snapshot: snapshot_with(vec![SnapshotStat {
                metric: Metric::Attack,
                rank: 100,
                value: 83,
            }]),
        };
        let stats = aggregate_statistics(&[maxed, fresh]);
        assert_eq!(stats.maxed_combat_count, 1);
        assert_eq!(stats.maxed_total_count, 1);
        assert_eq!(stats.maxed_200ms_count, 0);
        // Attack averaged across both members.
        let attack = stats
            .average_stats
            .iter()
            .find(|s| s.metric == Metric::Attack)
            .unwrap();
        assert_eq!(attack.value, (levels::exp_for_level(99) + 83) / 2);
    }

    #[test]
    fn aggregate_counts_200m_skills_across_members() {
        let heavy = MemberStats {
            player_id: 1,
            snapshot: snapshot_with(vec![
                SnapshotStat {
                    metric: Metric::Fishing,
                    rank: 1,
                    value: levels::MAX_SKILL_EXP,
                },
                SnapshotStat {
                    metric: Metric::Cooking,
                    rank: 1,
                    value: levels::MAX_SKILL_EXP,
                },
                SnapshotStat {
                    metric: Metric::Overall,
                    rank: 1,
                    value: 2 * levels::MAX_SKILL_EXP,
                },
            ]),
        };
        let stats = aggregate_statistics(&[heavy]);
        assert_eq!(stats.maxed_200ms_count, 2);
    }
}
