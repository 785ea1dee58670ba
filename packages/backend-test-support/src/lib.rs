//! Backend test support utilities
//!
//! Unique test-data generators and unified logging initialization shared by
//! the backend's unit and integration tests.

pub mod logging;
pub mod unique_helpers;
