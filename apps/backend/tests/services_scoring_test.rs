//! Integration tests for group scoring: the weighted-sum heuristic over
//! real member and snapshot rows, and the persistence behavior of
//! `refresh_scores`.

mod support;

use backend::domain::metrics::Metric;
use backend::domain::roles::Role;
use backend::errors::DomainError;
use backend::repos::players;
use backend::services::groups::{GroupService, MemberInput};
use backend_test_support::unique_helpers::unique_group_name;

use crate::support::{seed_snapshot, set_group_verified, test_db, FakeCompetitions};

#[tokio::test]
async fn score_is_zero_for_memberless_group() -> Result<(), DomainError> {
    let conn = test_db().await?;
    let service = GroupService::new();

    // Clan chat and verification alone do not score without members.
    let created = service
        .create(
            &conn,
            &unique_group_name("Deserted"),
            Some("some cc".to_string()),
            Vec::new(),
        )
        .await?;
    set_group_verified(&conn, created.group.id).await?;

    let group = service.view(&conn, created.group.id).await?.group;
    let score = service
        .calculate_score(&conn, &group, &FakeCompetitions::none())
        .await?;
    assert_eq!(score, 0);
    Ok(())
}

#[tokio::test]
async fn fully_loaded_group_scores_390() -> Result<(), DomainError> {
    let conn = test_db().await?;
    let service = GroupService::new();

    // 50 members, one of them a leader.
    let members: Vec<MemberInput> = (0..50)
        .map(|i| {
            let role = if i == 0 { Role::Leader } else { Role::Member };
            MemberInput::new(format!("m{i}"), role)
        })
        .collect();
    let created = service
        .create(
            &conn,
            &unique_group_name("Elite"),
            Some("elite cc".to_string()),
            members,
        )
        .await?;
    set_group_verified(&conn, created.group.id).await?;

    // Everyone at 100m overall experience.
    for i in 0..50 {
        let player = players::find_by_username(&conn, &format!("m{i}"))
            .await?
            .expect("member exists");
        seed_snapshot(&conn, player.id, &[(Metric::Overall, 1, 100_000_000)]).await?;
    }

    let group = service.view(&conn, created.group.id).await?.group;
    let competitions = FakeCompetitions {
        ongoing: 1,
        upcoming: 1,
    };
    let score = service.calculate_score(&conn, &group, &competitions).await?;
    // 30 leader + 40 members + 30 + 60 avg exp + 50 cc + 100 verified
    // + 50 ongoing + 30 upcoming.
    assert_eq!(score, 390);
    Ok(())
}

#[tokio::test]
async fn refresh_scores_persists_only_on_change() -> Result<(), DomainError> {
    let conn = test_db().await?;
    let service = GroupService::new();

    let scored = service
        .create(
            &conn,
            &unique_group_name("Scored"),
            Some("cc".to_string()),
            vec![MemberInput::new("solo lead", Role::Leader)],
        )
        .await?;
    let unscored = service
        .create(&conn, &unique_group_name("Unscored"), None, Vec::new())
        .await?;

    service
        .refresh_scores(&conn, &FakeCompetitions::none())
        .await?;

    // Leader (+30) and clan chat (+50).
    let refreshed = service.view(&conn, scored.group.id).await?.group;
    assert_eq!(refreshed.score, 80);
    let untouched = service.view(&conn, unscored.group.id).await?.group;
    assert_eq!(untouched.score, 0);

    // Idempotent on a second run.
    service
        .refresh_scores(&conn, &FakeCompetitions::none())
        .await?;
    let again = service.view(&conn, scored.group.id).await?.group;
    assert_eq!(again.score, 80);
    Ok(())
}
