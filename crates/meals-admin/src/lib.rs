//! Staff administration for a meal-delivery program.
//!
//! The library holds the domain (volunteers, customers, recurring assignments), the date
//! resolver that places assignments on a month, and the ambient configuration, error, and
//! telemetry plumbing shared with the API binary.

pub mod config;
pub mod error;
pub mod management;
pub mod schedule;
pub mod telemetry;
