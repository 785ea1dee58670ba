//! Domain services.

pub mod groups;
pub mod siblings;
