//! Pure domain logic: no database, no IO.

pub mod levels;
pub mod metrics;
pub mod name;
pub mod pagination;
pub mod roles;
pub mod scoring;
