//! Integration tests for the snapshot-derived group views: member lists,
//! hiscores, member stats, aggregate statistics and the sibling-service
//! delegations.

mod support;

use backend::domain::levels;
use backend::domain::metrics::Metric;
use backend::domain::pagination::Pagination;
use backend::domain::roles::Role;
use backend::errors::DomainError;
use backend::repos::players;
use backend::services::groups::{GroupService, MemberInput};
use backend::services::siblings::{PlayerAchievement, PlayerDelta, PlayerRecord};
use backend_test_support::unique_helpers::{unique_group_name, unique_username};
use time::{Duration, OffsetDateTime};

use crate::support::{
    seed_snapshot, seed_snapshot_at, set_player_updated_at, test_db, FakeAchievements, FakeDeltas,
    FakeRecords, RecordingUpdateAction,
};

#[tokio::test]
async fn members_list_joins_latest_overall_value() -> Result<(), DomainError> {
    let conn = test_db().await?;
    let service = GroupService::new();

    let leader = unique_username("lead");
    let fresh = unique_username("fres");
    let created = service
        .create(
            &conn,
            &unique_group_name("Tracked"),
            None,
            vec![
                MemberInput::new(&leader, Role::Leader),
                MemberInput::member(&fresh),
            ],
        )
        .await?;

    let leader_player = players::find_by_username(&conn, &leader)
        .await?
        .expect("leader player exists");
    // Two snapshots; only the newest overall value should surface.
    seed_snapshot_at(
        &conn,
        leader_player.id,
        &[(Metric::Overall, 1000, 1_000_000)],
        OffsetDateTime::now_utc() - Duration::hours(2),
    )
    .await?;
    seed_snapshot(&conn, leader_player.id, &[(Metric::Overall, 900, 5_000_000)]).await?;

    let members = service.get_members_list(&conn, created.group.id).await?;
    assert_eq!(members.len(), 2);
    // Role strings sort "leader" before "member".
    assert_eq!(members[0].role, Role::Leader);
    assert_eq!(members[0].overall_exp, Some(5_000_000));
    assert_eq!(members[1].overall_exp, None);
    Ok(())
}

#[tokio::test]
async fn hiscores_filter_unranked_and_sort_by_value() -> Result<(), DomainError> {
    let conn = test_db().await?;
    let service = GroupService::new();

    let names: Vec<String> = (0..3).map(|_| unique_username("fish")).collect();
    let created = service
        .create(
            &conn,
            &unique_group_name("Anglers"),
            None,
            names.iter().map(MemberInput::member).collect(),
        )
        .await?;

    let values = [(2, 5_000_000_i64), (9, 1_000_000), (-1, 0)];
    for (name, (rank, value)) in names.iter().zip(values) {
        let player = players::find_by_username(&conn, name)
            .await?
            .expect("member exists");
        seed_snapshot(&conn, player.id, &[(Metric::Fishing, rank, value)]).await?;
    }

    let hiscores = service
        .get_hiscores(&conn, created.group.id, "fishing", Pagination::default())
        .await?;
    assert_eq!(hiscores.len(), 2, "unranked member should be filtered out");
    assert_eq!(hiscores[0].value, 5_000_000);
    assert_eq!(hiscores[1].value, 1_000_000);
    assert_eq!(hiscores[0].level, Some(levels::level_for_exp(5_000_000)));
    Ok(())
}

#[tokio::test]
async fn hiscores_reject_unknown_metric() -> Result<(), DomainError> {
    let conn = test_db().await?;
    let service = GroupService::new();

    let created = service
        .create(&conn, &unique_group_name("Strict"), None, Vec::new())
        .await?;
    let err = service
        .get_hiscores(&conn, created.group.id, "sailing", Pagination::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
    Ok(())
}

#[tokio::test]
async fn member_stats_return_latest_full_snapshot() -> Result<(), DomainError> {
    let conn = test_db().await?;
    let service = GroupService::new();

    let username = unique_username("snap");
    let created = service
        .create(
            &conn,
            &unique_group_name("Snapshotted"),
            None,
            vec![MemberInput::member(&username)],
        )
        .await?;
    let player = players::find_by_username(&conn, &username)
        .await?
        .expect("member exists");

    seed_snapshot_at(
        &conn,
        player.id,
        &[(Metric::Attack, 100, 500)],
        OffsetDateTime::now_utc() - Duration::days(1),
    )
    .await?;
    seed_snapshot(
        &conn,
        player.id,
        &[(Metric::Attack, 90, 2000), (Metric::Zulrah, 12, 150)],
    )
    .await?;

    let stats = service.get_member_stats(&conn, created.group.id).await?;
    assert_eq!(stats.len(), 1);
    let snapshot = &stats[0].snapshot;
    assert_eq!(snapshot.stats.len(), 2);
    assert_eq!(snapshot.stat(Metric::Attack).map(|s| s.value), Some(2000));
    assert_eq!(snapshot.stat(Metric::Zulrah).map(|s| s.value), Some(150));
    Ok(())
}

#[tokio::test]
async fn statistics_fail_without_any_stats() -> Result<(), DomainError> {
    let conn = test_db().await?;
    let service = GroupService::new();

    let created = service
        .create(
            &conn,
            &unique_group_name("Unscanned"),
            None,
            vec![MemberInput::member(unique_username("idle"))],
        )
        .await?;
    let err = service
        .get_statistics(&conn, created.group.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
    Ok(())
}

#[tokio::test]
async fn statistics_aggregate_member_snapshots() -> Result<(), DomainError> {
    let conn = test_db().await?;
    let service = GroupService::new();

    let maxed = unique_username("maxd");
    let fresh = unique_username("fres");
    let created = service
        .create(
            &conn,
            &unique_group_name("Veterans"),
            None,
            vec![MemberInput::member(&maxed), MemberInput::member(&fresh)],
        )
        .await?;

    let maxed_player = players::find_by_username(&conn, &maxed)
        .await?
        .expect("member exists");
    // All skills at 99, two of them at the 200m experience cap.
    let maxed_stats: Vec<(Metric, i32, i64)> = Metric::SKILLS
        .iter()
        .map(|m| {
            if matches!(m, Metric::Fishing | Metric::Cooking) {
                (*m, 1, levels::MAX_SKILL_EXP)
            } else {
                (*m, 1000, levels::exp_for_level(99))
            }
        })
        .collect();
    seed_snapshot(&conn, maxed_player.id, &maxed_stats).await?;

    let fresh_player = players::find_by_username(&conn, &fresh)
        .await?
        .expect("member exists");
    seed_snapshot(&conn, fresh_player.id, &[(Metric::Attack, 500_000, 83)]).await?;

    let stats = service.get_statistics(&conn, created.group.id).await?;
    assert_eq!(stats.maxed_combat_count, 1);
    assert_eq!(stats.maxed_total_count, 1);
    assert_eq!(stats.maxed_200ms_count, 2);

    let attack = stats
        .average_stats
        .iter()
        .find(|s| s.metric == Metric::Attack)
        .expect("attack should be averaged");
    assert_eq!(attack.value, (levels::exp_for_level(99) + 83) / 2);
    Ok(())
}

#[tokio::test]
async fn delta_operations_require_members() -> Result<(), DomainError> {
    let conn = test_db().await?;
    let service = GroupService::new();
    let deltas = FakeDeltas { gains: Vec::new() };

    let created = service
        .create(&conn, &unique_group_name("Hollow"), None, Vec::new())
        .await?;
    let err = service
        .get_monthly_top_player(&conn, created.group.id, &deltas)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));

    let err = service
        .get_deltas(&conn, created.group.id, "week", "overall", &deltas)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
    Ok(())
}

#[tokio::test]
async fn deltas_validate_period_and_metric_codes() -> Result<(), DomainError> {
    let conn = test_db().await?;
    let service = GroupService::new();
    let deltas = FakeDeltas { gains: Vec::new() };

    let created = service
        .create(
            &conn,
            &unique_group_name("Checked"),
            None,
            vec![MemberInput::member(unique_username("memb"))],
        )
        .await?;

    let err = service
        .get_deltas(&conn, created.group.id, "fortnight", "overall", &deltas)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));

    let err = service
        .get_deltas(&conn, created.group.id, "week", "sailing", &deltas)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
    Ok(())
}

#[tokio::test]
async fn monthly_top_player_comes_from_delta_service() -> Result<(), DomainError> {
    let conn = test_db().await?;
    let service = GroupService::new();

    let grinder = unique_username("grnd");
    let created = service
        .create(
            &conn,
            &unique_group_name("Competitive"),
            None,
            vec![MemberInput::member(&grinder)],
        )
        .await?;
    let player = players::find_by_username(&conn, &grinder)
        .await?
        .expect("member exists");

    let deltas = FakeDeltas {
        gains: vec![PlayerDelta {
            player_id: player.id,
            username: player.username.clone(),
            gained: 1_234_567,
        }],
    };
    let top = service
        .get_monthly_top_player(&conn, created.group.id, &deltas)
        .await?;
    assert_eq!(top.map(|d| d.gained), Some(1_234_567));
    Ok(())
}

#[tokio::test]
async fn achievements_and_records_delegate_with_member_ids() -> Result<(), DomainError> {
    let conn = test_db().await?;
    let service = GroupService::new();

    let username = unique_username("achv");
    let created = service
        .create(
            &conn,
            &unique_group_name("Decorated"),
            None,
            vec![MemberInput::member(&username)],
        )
        .await?;
    let player = players::find_by_username(&conn, &username)
        .await?
        .expect("member exists");

    let achievements = FakeAchievements {
        achievements: vec![
            PlayerAchievement {
                player_id: player.id,
                metric: Metric::Overall,
                threshold: 100_000_000,
                created_at: OffsetDateTime::now_utc(),
            },
            // Someone else's achievement; filtered out by member ids.
            PlayerAchievement {
                player_id: player.id + 999,
                metric: Metric::Overall,
                threshold: 50_000_000,
                created_at: OffsetDateTime::now_utc(),
            },
        ],
    };
    let found = service
        .get_achievements(&conn, created.group.id, Pagination::default(), &achievements)
        .await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].threshold, 100_000_000);

    let records = FakeRecords {
        records: vec![PlayerRecord {
            player_id: player.id,
            metric: Metric::Zulrah,
            period: backend::domain::metrics::Period::Week,
            value: 250,
        }],
    };
    let found = service
        .get_records(
            &conn,
            created.group.id,
            "zulrah",
            "week",
            Pagination::default(),
            &records,
        )
        .await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].value, 250);
    Ok(())
}

#[tokio::test]
async fn update_all_members_dispatches_only_stale_players() -> Result<(), DomainError> {
    let conn = test_db().await?;
    let service = GroupService::new();

    let stale = unique_username("stal");
    let recent = unique_username("rcnt");
    let created = service
        .create(
            &conn,
            &unique_group_name("Refreshing"),
            None,
            vec![MemberInput::member(&stale), MemberInput::member(&recent)],
        )
        .await?;

    let stale_player = players::find_by_username(&conn, &stale)
        .await?
        .expect("member exists");
    set_player_updated_at(
        &conn,
        stale_player.id,
        OffsetDateTime::now_utc() - Duration::minutes(20),
    )
    .await?;

    let action = RecordingUpdateAction::default();
    let count = service
        .update_all_members(&conn, created.group.id, &action)
        .await?;
    assert_eq!(count, 1);

    let seen = action.seen.lock().expect("mutex poisoned");
    assert_eq!(seen.as_slice(), &[stale_player.id]);
    Ok(())
}
