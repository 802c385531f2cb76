//! Process-local repository implementations used by the API server and tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::assignments::{Assignment, AssignmentId, AssignmentRepository};
use super::customers::{Customer, CustomerId, CustomerRecord, CustomerRepository, PaymentType};
use super::domain::Locality;
use super::repository::RepositoryError;
use super::volunteers::{
    AccountNotice, AccountNotifier, NotifyError, Volunteer, VolunteerId, VolunteerRecord,
    VolunteerRepository,
};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
}

#[derive(Default, Clone)]
pub struct InMemoryVolunteerRepository {
    volunteers: Arc<Mutex<BTreeMap<VolunteerId, Volunteer>>>,
    records: Arc<Mutex<Vec<VolunteerRecord>>>,
}

/// Usernames are unique case-insensitively; checked while the map lock is held.
fn username_held_by_other(
    volunteers: &BTreeMap<VolunteerId, Volunteer>,
    candidate: &Volunteer,
) -> bool {
    let username = candidate.account.username.to_lowercase();
    volunteers.values().any(|stored| {
        stored.id != candidate.id && stored.account.username.to_lowercase() == username
    })
}

impl VolunteerRepository for InMemoryVolunteerRepository {
    fn insert(&self, volunteer: Volunteer) -> Result<Volunteer, RepositoryError> {
        let mut guard = lock(&self.volunteers)?;
        if guard.contains_key(&volunteer.id) || username_held_by_other(&guard, &volunteer) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(volunteer.id, volunteer.clone());
        Ok(volunteer)
    }

    fn update(&self, volunteer: Volunteer) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.volunteers)?;
        if username_held_by_other(&guard, &volunteer) {
            return Err(RepositoryError::Conflict);
        }
        match guard.get_mut(&volunteer.id) {
            Some(slot) => {
                *slot = volunteer;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: VolunteerId) -> Result<Option<Volunteer>, RepositoryError> {
        Ok(lock(&self.volunteers)?.get(&id).cloned())
    }

    fn find_by_username(&self, username: &str) -> Result<Option<Volunteer>, RepositoryError> {
        let username = username.to_lowercase();
        Ok(lock(&self.volunteers)?
            .values()
            .find(|volunteer| volunteer.account.username.to_lowercase() == username)
            .cloned())
    }

    fn remove(&self, id: VolunteerId) -> Result<Volunteer, RepositoryError> {
        let removed = lock(&self.volunteers)?
            .remove(&id)
            .ok_or(RepositoryError::NotFound)?;
        lock(&self.records)?.retain(|record| record.volunteer != id);
        Ok(removed)
    }

    fn list(&self) -> Result<Vec<Volunteer>, RepositoryError> {
        Ok(lock(&self.volunteers)?.values().cloned().collect())
    }

    fn add_record(&self, record: VolunteerRecord) -> Result<(), RepositoryError> {
        if !lock(&self.volunteers)?.contains_key(&record.volunteer) {
            return Err(RepositoryError::NotFound);
        }
        lock(&self.records)?.push(record);
        Ok(())
    }

    fn records(&self) -> Result<Vec<VolunteerRecord>, RepositoryError> {
        Ok(lock(&self.records)?.clone())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryAssignmentRepository {
    assignments: Arc<Mutex<BTreeMap<AssignmentId, Assignment>>>,
}

impl AssignmentRepository for InMemoryAssignmentRepository {
    fn insert(&self, assignment: Assignment) -> Result<Assignment, RepositoryError> {
        let mut guard = lock(&self.assignments)?;
        if guard.contains_key(&assignment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(assignment.id, assignment.clone());
        Ok(assignment)
    }

    fn list(&self) -> Result<Vec<Assignment>, RepositoryError> {
        Ok(lock(&self.assignments)?.values().cloned().collect())
    }

    fn for_volunteer(&self, volunteer: VolunteerId) -> Result<Vec<Assignment>, RepositoryError> {
        Ok(lock(&self.assignments)?
            .values()
            .filter(|assignment| assignment.volunteer == Some(volunteer))
            .cloned()
            .collect())
    }

    fn release_volunteer(&self, volunteer: VolunteerId) -> Result<usize, RepositoryError> {
        let mut released = 0;
        for assignment in lock(&self.assignments)?.values_mut() {
            if assignment.volunteer == Some(volunteer) {
                assignment.volunteer = None;
                released += 1;
            }
        }
        Ok(released)
    }
}

#[derive(Default)]
struct CustomerTables {
    customers: BTreeMap<CustomerId, Customer>,
    records: Vec<CustomerRecord>,
    localities: Vec<Locality>,
    payment_types: Vec<PaymentType>,
}

#[derive(Default, Clone)]
pub struct InMemoryCustomerRepository {
    tables: Arc<Mutex<CustomerTables>>,
}

impl InMemoryCustomerRepository {
    pub fn payment_types(&self) -> Result<Vec<PaymentType>, RepositoryError> {
        Ok(lock(&self.tables)?.payment_types.clone())
    }

    pub fn localities(&self) -> Result<Vec<Locality>, RepositoryError> {
        Ok(lock(&self.tables)?.localities.clone())
    }
}

impl CustomerRepository for InMemoryCustomerRepository {
    fn clear(&self) -> Result<usize, RepositoryError> {
        let mut tables = lock(&self.tables)?;
        let removed = tables.customers.len();
        tables.customers.clear();
        tables.records.clear();
        Ok(removed)
    }

    fn insert_customer(
        &self,
        customer: Customer,
        records: Vec<CustomerRecord>,
    ) -> Result<Customer, RepositoryError> {
        let mut tables = lock(&self.tables)?;
        if tables.customers.contains_key(&customer.id) {
            return Err(RepositoryError::Conflict);
        }
        for record in &records {
            if record.customer != customer.id
                || !tables.payment_types.contains(&record.payment_type)
            {
                return Err(RepositoryError::NotFound);
            }
        }
        tables.customers.insert(customer.id, customer.clone());
        tables.records.extend(records);
        Ok(customer)
    }

    fn customers(&self) -> Result<Vec<Customer>, RepositoryError> {
        Ok(lock(&self.tables)?.customers.values().cloned().collect())
    }

    fn records(&self) -> Result<Vec<CustomerRecord>, RepositoryError> {
        Ok(lock(&self.tables)?.records.clone())
    }

    fn ensure_locality(&self, locality: Locality) -> Result<Locality, RepositoryError> {
        let mut tables = lock(&self.tables)?;
        if let Some(existing) = tables.localities.iter().find(|stored| {
            stored.name == locality.name && stored.postal_code == locality.postal_code
        }) {
            return Ok(existing.clone());
        }
        tables.localities.push(locality.clone());
        Ok(locality)
    }

    fn ensure_payment_type(&self, name: &str) -> Result<PaymentType, RepositoryError> {
        let mut tables = lock(&self.tables)?;
        if let Some(existing) = tables.payment_types.iter().find(|stored| stored.name == name) {
            return Ok(existing.clone());
        }
        let payment_type = PaymentType {
            name: name.to_string(),
        };
        tables.payment_types.push(payment_type.clone());
        Ok(payment_type)
    }
}

/// Notifier that keeps every notice it is handed, for inspection.
#[derive(Default, Clone)]
pub struct InMemoryNotifier {
    notices: Arc<Mutex<Vec<AccountNotice>>>,
}

impl InMemoryNotifier {
    pub fn notices(&self) -> Vec<AccountNotice> {
        self.notices
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl AccountNotifier for InMemoryNotifier {
    fn notify(&self, notice: AccountNotice) -> Result<(), NotifyError> {
        self.notices
            .lock()
            .map_err(|_| NotifyError::Transport("notifier mutex poisoned".to_string()))?
            .push(notice);
        Ok(())
    }
}
