pub mod groups;
pub mod memberships;
pub mod players;
pub mod snapshot_stats;
pub mod snapshots;

pub use groups::Entity as Groups;
pub use groups::Model as Group;
pub use memberships::Entity as Memberships;
pub use memberships::Model as Membership;
pub use players::Entity as Players;
pub use players::Model as Player;
pub use snapshot_stats::Entity as SnapshotStats;
pub use snapshot_stats::Model as SnapshotStat;
pub use snapshots::Entity as Snapshots;
pub use snapshots::Model as Snapshot;
