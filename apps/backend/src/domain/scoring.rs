//! Weighted-sum group score heuristic.

/// Everything the score heuristic looks at, gathered by the service layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreInputs {
    pub member_count: u64,
    pub leader_count: u64,
    /// Average latest-snapshot overall experience across members that have
    /// at least one snapshot; 0 when nobody has stats yet.
    pub avg_overall_exp: i64,
    pub has_clan_chat: bool,
    pub verified: bool,
    pub ongoing_competitions: u64,
    pub upcoming_competitions: u64,
}

const AVG_EXP_TIER_1: i64 = 30_000_000;
const AVG_EXP_TIER_2: i64 = 100_000_000;

/// Compute the group score. Member-count bonuses are exclusive tiers;
/// average-experience bonuses stack.
pub fn calculate(inputs: &ScoreInputs) -> i32 {
    let mut score = 0;

    if inputs.leader_count >= 1 {
        score += 30;
    }

    if inputs.member_count >= 50 {
        score += 40;
    } else if inputs.member_count >= 10 {
        score += 20;
    }

    if inputs.avg_overall_exp >= AVG_EXP_TIER_1 {
        score += 30;
    }
    if inputs.avg_overall_exp >= AVG_EXP_TIER_2 {
        score += 60;
    }

    if inputs.has_clan_chat {
        score += 50;
    }
    if inputs.verified {
        score += 100;
    }
    if inputs.ongoing_competitions >= 1 {
        score += 50;
    }
    if inputs.upcoming_competitions >= 1 {
        score += 30;
    }

    score
}
