//! Staff-facing management of volunteers, customers, and recurring delivery assignments.

pub mod assignments;
pub mod customers;
pub mod domain;
pub mod memory;
pub mod repository;
pub mod volunteers;

pub use domain::{Address, Locality};
pub use repository::RepositoryError;
