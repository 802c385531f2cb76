//! Meal-delivery customers, their delivery records, and development seeding.

pub mod domain;
pub mod repository;
pub mod router;
pub mod seed;

pub use domain::{Customer, CustomerId, CustomerRecord, CustomerView, PaymentType};
pub use repository::CustomerRepository;
pub use router::customer_router;
pub use seed::{run_seed, SeedError, SeedMode, SeedModeError, SeedSummary};
