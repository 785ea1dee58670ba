//! Repository functions for the domain layer.

pub mod groups;
pub mod memberships;
pub mod players;
pub mod snapshots;
