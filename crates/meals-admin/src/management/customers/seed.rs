//! Development data seeding.
//!
//! `refresh` wipes customer data and recreates a batch of sample customers around a single
//! Charlottesville address; `clear` only wipes. Sample values rotate through fixed pools so two
//! runs with the same count produce the same data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

use super::domain::{Customer, CustomerId, CustomerRecord, PaymentType};
use super::repository::CustomerRepository;
use crate::management::domain::{Address, Locality};
use crate::management::repository::RepositoryError;

const FIRST_NAMES: [&str; 7] = ["Bob", "Jane", "Joe", "Hank", "Jill", "Tom", "Alice"];
const LAST_NAMES: [&str; 5] = ["Smith", "Adams", "Thompson", "Berry", "Phillips"];
const PAYMENT_TYPES: [&str; 3] = ["debit", "credit", "cash"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedMode {
    /// Clear customer data, then create sample customers.
    #[default]
    Refresh,
    /// Clear customer data without creating anything.
    Clear,
}

impl SeedMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Refresh => "refresh",
            Self::Clear => "clear",
        }
    }
}

impl fmt::Display for SeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SeedMode {
    type Err = SeedModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "refresh" => Ok(Self::Refresh),
            "clear" => Ok(Self::Clear),
            other => Err(SeedModeError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown seed mode '{0}' (expected 'refresh' or 'clear')")]
pub struct SeedModeError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SeedSummary {
    pub cleared: usize,
    pub created: usize,
    pub skipped: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("seeding failed: {0}")]
    Repository(#[from] RepositoryError),
}

fn seed_locality() -> Locality {
    Locality {
        name: "Charlottesville".to_string(),
        postal_code: "22911".to_string(),
        state: "VA".to_string(),
        country: "US".to_string(),
    }
}

fn seed_address(locality: &Locality) -> Address {
    Address {
        street_number: "1".to_string(),
        route: "Some Street".to_string(),
        locality: Some(locality.clone()),
        raw: "1 Some Street, Charlottesville, VA".to_string(),
    }
}

/// Seed the customer tables according to `mode`.
pub fn run_seed<C>(repository: &C, mode: SeedMode, count: usize) -> Result<SeedSummary, SeedError>
where
    C: CustomerRepository + ?Sized,
{
    info!(%mode, "deleting customers");
    let cleared = repository.clear()?;
    let mut summary = SeedSummary {
        cleared,
        ..SeedSummary::default()
    };
    if mode == SeedMode::Clear {
        return Ok(summary);
    }

    let locality = repository.ensure_locality(seed_locality())?;
    let payment_types = PAYMENT_TYPES
        .iter()
        .map(|name| repository.ensure_payment_type(name))
        .collect::<Result<Vec<_>, _>>()?;

    for index in 0..count {
        match create_customer(repository, index, &locality, &payment_types) {
            Ok(customer) => {
                info!(customer_id = %customer.id, name = %customer, "customer created");
                summary.created += 1;
            }
            Err(err) => {
                warn!(index, error = %err, "skipping sample customer");
                summary.skipped += 1;
            }
        }
    }

    info!(
        cleared = summary.cleared,
        created = summary.created,
        skipped = summary.skipped,
        "seeding complete"
    );
    Ok(summary)
}

fn create_customer<C>(
    repository: &C,
    index: usize,
    locality: &Locality,
    payment_types: &[PaymentType],
) -> Result<Customer, RepositoryError>
where
    C: CustomerRepository + ?Sized,
{
    let customer = Customer {
        id: CustomerId(index as u64 + 1),
        active: index % 2 == 0,
        first_name: FIRST_NAMES[index % FIRST_NAMES.len()].to_string(),
        last_name: LAST_NAMES[index % LAST_NAMES.len()].to_string(),
        address: seed_address(locality),
    };
    let payment_type = payment_types
        .get(index % payment_types.len().max(1))
        .cloned()
        .ok_or_else(|| RepositoryError::Unavailable("no payment types available".to_string()))?;
    let record = CustomerRecord {
        customer: customer.id,
        num_meals: 1,
        payment_type,
    };

    repository.insert_customer(customer, vec![record])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::management::memory::InMemoryCustomerRepository;

    #[test]
    fn refresh_creates_customers_with_one_record_each() {
        let repository = InMemoryCustomerRepository::default();

        let summary = run_seed(&repository, SeedMode::Refresh, 30).expect("seed runs");

        assert_eq!(
            summary,
            SeedSummary {
                cleared: 0,
                created: 30,
                skipped: 0
            }
        );
        let customers = repository.customers().expect("customers");
        assert_eq!(customers.len(), 30);
        assert!(customers
            .iter()
            .all(|customer| customer.address.raw == "1 Some Street, Charlottesville, VA"));
        assert!(customers
            .iter()
            .all(|customer| FIRST_NAMES.contains(&customer.first_name.as_str())
                && LAST_NAMES.contains(&customer.last_name.as_str())));

        let records = repository.records().expect("records");
        assert_eq!(records.len(), 30);
        assert!(records.iter().all(|record| record.num_meals == 1));
    }

    #[test]
    fn repeated_refresh_replaces_customers_without_duplicating_lookups() {
        let repository = InMemoryCustomerRepository::default();
        run_seed(&repository, SeedMode::Refresh, 5).expect("first seed");

        let summary = run_seed(&repository, SeedMode::Refresh, 5).expect("second seed");

        assert_eq!(summary.cleared, 5);
        assert_eq!(summary.created, 5);
        assert_eq!(repository.customers().expect("customers").len(), 5);
        assert_eq!(repository.records().expect("records").len(), 5);
        let names: Vec<String> = repository
            .payment_types()
            .expect("payment types")
            .into_iter()
            .map(|payment| payment.name)
            .collect();
        assert_eq!(names, vec!["debit", "credit", "cash"]);
        assert_eq!(repository.localities().expect("localities").len(), 1);
    }

    #[test]
    fn clear_mode_only_deletes() {
        let repository = InMemoryCustomerRepository::default();
        run_seed(&repository, SeedMode::Refresh, 3).expect("seed");

        let summary = run_seed(&repository, SeedMode::Clear, 3).expect("clear");

        assert_eq!(summary.cleared, 3);
        assert_eq!(summary.created, 0);
        assert!(repository.customers().expect("customers").is_empty());
        assert!(repository.records().expect("records").is_empty());
    }

    /// Rejects one customer id and delegates everything else.
    struct RejectingRepository {
        inner: InMemoryCustomerRepository,
        rejected: CustomerId,
    }

    impl CustomerRepository for RejectingRepository {
        fn clear(&self) -> Result<usize, RepositoryError> {
            self.inner.clear()
        }

        fn insert_customer(
            &self,
            customer: Customer,
            records: Vec<CustomerRecord>,
        ) -> Result<Customer, RepositoryError> {
            if customer.id == self.rejected {
                return Err(RepositoryError::Unavailable("write timed out".to_string()));
            }
            self.inner.insert_customer(customer, records)
        }

        fn customers(&self) -> Result<Vec<Customer>, RepositoryError> {
            self.inner.customers()
        }

        fn records(&self) -> Result<Vec<CustomerRecord>, RepositoryError> {
            self.inner.records()
        }

        fn ensure_locality(&self, locality: Locality) -> Result<Locality, RepositoryError> {
            self.inner.ensure_locality(locality)
        }

        fn ensure_payment_type(&self, name: &str) -> Result<PaymentType, RepositoryError> {
            self.inner.ensure_payment_type(name)
        }
    }

    #[test]
    fn failed_customer_is_skipped_and_the_rest_are_created() {
        let repository = RejectingRepository {
            inner: InMemoryCustomerRepository::default(),
            rejected: CustomerId(3),
        };

        let summary = run_seed(&repository, SeedMode::Refresh, 5).expect("seed runs");

        assert_eq!(
            summary,
            SeedSummary {
                cleared: 0,
                created: 4,
                skipped: 1
            }
        );
        let customers = repository.customers().expect("customers");
        let records = repository.records().expect("records");
        assert_eq!(customers.len(), 4);
        assert!(customers.iter().all(|customer| customer.id != CustomerId(3)));
        assert!(customers
            .iter()
            .all(|customer| records.iter().any(|record| record.customer == customer.id)));
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn rejected_record_leaves_no_customer_behind() {
        let repository = InMemoryCustomerRepository::default();
        let locality = repository
            .ensure_locality(seed_locality())
            .expect("locality");
        let customer = Customer {
            id: CustomerId(1),
            active: true,
            first_name: "Bob".to_string(),
            last_name: "Smith".to_string(),
            address: seed_address(&locality),
        };
        let record = CustomerRecord {
            customer: customer.id,
            num_meals: 1,
            payment_type: PaymentType {
                name: "barter".to_string(),
            },
        };

        let err = repository
            .insert_customer(customer, vec![record])
            .expect_err("unknown payment type");

        assert_eq!(err, RepositoryError::NotFound);
        assert!(repository.customers().expect("customers").is_empty());
        assert!(repository.records().expect("records").is_empty());
    }

    #[test]
    fn seed_mode_parses_case_insensitively() {
        assert_eq!("Refresh".parse::<SeedMode>(), Ok(SeedMode::Refresh));
        assert_eq!(" clear ".parse::<SeedMode>(), Ok(SeedMode::Clear));
        assert_eq!(
            "wipe".parse::<SeedMode>(),
            Err(SeedModeError("wipe".to_string()))
        );
    }
}
