//! SeaORM adapters. Functions here return `sea_orm::DbErr`; the repos layer
//! maps to `DomainError` via `From<DbErr>`.

pub mod groups_sea;
pub mod memberships_sea;
pub mod players_sea;
pub mod snapshots_sea;
