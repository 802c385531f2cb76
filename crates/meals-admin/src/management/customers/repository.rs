use super::domain::{Customer, CustomerRecord, PaymentType};
use crate::management::domain::Locality;
use crate::management::repository::RepositoryError;

/// Storage abstraction for customers and the lookup tables they reference.
pub trait CustomerRepository: Send + Sync {
    /// Deletes every customer and customer record, returning how many customers were removed.
    fn clear(&self) -> Result<usize, RepositoryError>;
    /// Stores a customer together with its records. Nothing is stored if any part is rejected.
    fn insert_customer(
        &self,
        customer: Customer,
        records: Vec<CustomerRecord>,
    ) -> Result<Customer, RepositoryError>;
    fn customers(&self) -> Result<Vec<Customer>, RepositoryError>;
    fn records(&self) -> Result<Vec<CustomerRecord>, RepositoryError>;
    /// Returns the stored locality with the same name and postal code, creating it if needed.
    fn ensure_locality(&self, locality: Locality) -> Result<Locality, RepositoryError>;
    /// Returns the payment type with this name, creating it if needed.
    fn ensure_payment_type(&self, name: &str) -> Result<PaymentType, RepositoryError>;
}
