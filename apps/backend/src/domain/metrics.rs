//! The fixed metric and period sets the tracker accepts.
//!
//! Every leaderboard-style operation validates its `(period, metric)` pair
//! against these enumerations before touching the database.

use std::fmt;

/// What a metric measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Experience,
    Kills,
    Score,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Skill,
    Boss,
    Activity,
}

/// Trackable metric: skills, a boss set and an activity set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    // Skills
    Overall,
    Attack,
    Defence,
    Strength,
    Hitpoints,
    Ranged,
    Prayer,
    Magic,
    Cooking,
    Woodcutting,
    Fletching,
    Fishing,
    Firemaking,
    Crafting,
    Smithing,
    Mining,
    Herblore,
    Agility,
    Thieving,
    Slayer,
    Farming,
    Runecrafting,
    Hunter,
    Construction,
    // Bosses
    Zulrah,
    Vorkath,
    ChambersOfXeric,
    TheatreOfBlood,
    // Activities
    BountyHunter,
    LastManStanding,
}

impl Metric {
    pub const ALL: [Metric; 30] = [
        Metric::Overall,
        Metric::Attack,
        Metric::Defence,
        Metric::Strength,
        Metric::Hitpoints,
        Metric::Ranged,
        Metric::Prayer,
        Metric::Magic,
        Metric::Cooking,
        Metric::Woodcutting,
        Metric::Fletching,
        Metric::Fishing,
        Metric::Firemaking,
        Metric::Crafting,
        Metric::Smithing,
        Metric::Mining,
        Metric::Herblore,
        Metric::Agility,
        Metric::Thieving,
        Metric::Slayer,
        Metric::Farming,
        Metric::Runecrafting,
        Metric::Hunter,
        Metric::Construction,
        Metric::Zulrah,
        Metric::Vorkath,
        Metric::ChambersOfXeric,
        Metric::TheatreOfBlood,
        Metric::BountyHunter,
        Metric::LastManStanding,
    ];

    /// Individual skills, excluding the overall aggregate.
    pub const SKILLS: [Metric; 23] = [
        Metric::Attack,
        Metric::Defence,
        Metric::Strength,
        Metric::Hitpoints,
        Metric::Ranged,
        Metric::Prayer,
        Metric::Magic,
        Metric::Cooking,
        Metric::Woodcutting,
        Metric::Fletching,
        Metric::Fishing,
        Metric::Firemaking,
        Metric::Crafting,
        Metric::Smithing,
        Metric::Mining,
        Metric::Herblore,
        Metric::Agility,
        Metric::Thieving,
        Metric::Slayer,
        Metric::Farming,
        Metric::Runecrafting,
        Metric::Hunter,
        Metric::Construction,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Metric::Overall => "overall",
            Metric::Attack => "attack",
            Metric::Defence => "defence",
            Metric::Strength => "strength",
            Metric::Hitpoints => "hitpoints",
            Metric::Ranged => "ranged",
            Metric::Prayer => "prayer",
            Metric::Magic => "magic",
            Metric::Cooking => "cooking",
            Metric::Woodcutting => "woodcutting",
            Metric::Fletching => "fletching",
            Metric::Fishing => "fishing",
            Metric::Firemaking => "firemaking",
            Metric::Crafting => "crafting",
            Metric::Smithing => "smithing",
            Metric::Mining => "mining",
            Metric::Herblore => "herblore",
            Metric::Agility => "agility",
            Metric::Thieving => "thieving",
            Metric::Slayer => "slayer",
            Metric::Farming => "farming",
            Metric::Runecrafting => "runecrafting",
            Metric::Hunter => "hunter",
            Metric::Construction => "construction",
            Metric::Zulrah => "zulrah",
            Metric::Vorkath => "vorkath",
            Metric::ChambersOfXeric => "chambers_of_xeric",
            Metric::TheatreOfBlood => "theatre_of_blood",
            Metric::BountyHunter => "bounty_hunter",
            Metric::LastManStanding => "last_man_standing",
        }
    }

    pub fn from_code(code: &str) -> Option<Metric> {
        Metric::ALL.iter().copied().find(|m| m.code() == code)
    }

    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::Zulrah | Metric::Vorkath | Metric::ChambersOfXeric | Metric::TheatreOfBlood => {
                MetricKind::Boss
            }
            Metric::BountyHunter | Metric::LastManStanding => MetricKind::Activity,
            _ => MetricKind::Skill,
        }
    }

    pub fn measure(&self) -> Measure {
        match self.kind() {
            MetricKind::Skill => Measure::Experience,
            MetricKind::Boss => Measure::Kills,
            MetricKind::Activity => Measure::Score,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Delta/record aggregation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Day, Period::Week, Period::Month, Period::Year];

    pub fn code(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }

    pub fn from_code(code: &str) -> Option<Period> {
        Period::ALL.iter().copied().find(|p| p.code() == code)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(Metric::from_code(metric.code()), Some(metric));
        }
        for period in Period::ALL {
            assert_eq!(Period::from_code(period.code()), Some(period));
        }
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert_eq!(Metric::from_code("sailing"), None);
        assert_eq!(Period::from_code("5min"), None);
    }

    #[test]
    fn measures_follow_kinds() {
        assert_eq!(Metric::Overall.measure(), Measure::Experience);
        assert_eq!(Metric::Zulrah.measure(), Measure::Kills);
        assert_eq!(Metric::LastManStanding.measure(), Measure::Score);
    }
}
