//! Error handling for the group tracker backend.

pub mod domain;

pub use domain::DomainError;
