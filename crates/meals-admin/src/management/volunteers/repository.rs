use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{Volunteer, VolunteerId, VolunteerRecord};
use crate::management::repository::RepositoryError;

/// Storage abstraction for volunteers and their job records.
pub trait VolunteerRepository: Send + Sync {
    /// Fails with `Conflict` when the id or the username (case-insensitive) is already taken.
    fn insert(&self, volunteer: Volunteer) -> Result<Volunteer, RepositoryError>;
    fn update(&self, volunteer: Volunteer) -> Result<(), RepositoryError>;
    fn fetch(&self, id: VolunteerId) -> Result<Option<Volunteer>, RepositoryError>;
    fn find_by_username(&self, username: &str) -> Result<Option<Volunteer>, RepositoryError>;
    /// Removes the volunteer together with their job records.
    fn remove(&self, id: VolunteerId) -> Result<Volunteer, RepositoryError>;
    fn list(&self) -> Result<Vec<Volunteer>, RepositoryError>;
    fn add_record(&self, record: VolunteerRecord) -> Result<(), RepositoryError>;
    fn records(&self) -> Result<Vec<VolunteerRecord>, RepositoryError>;
}

/// Outbound account notifications (password setup e-mails and similar).
pub trait AccountNotifier: Send + Sync {
    fn notify(&self, notice: AccountNotice) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountNotice {
    pub template: String,
    pub email: String,
    pub username: String,
    pub details: BTreeMap<String, String>,
}

impl AccountNotice {
    pub const PASSWORD_SETUP: &'static str = "password_setup";

    pub fn password_setup(volunteer: &Volunteer) -> Self {
        let mut details = BTreeMap::new();
        details.insert("volunteer_id".to_string(), volunteer.id.to_string());
        details.insert("name".to_string(), volunteer.full_name());
        Self {
            template: Self::PASSWORD_SETUP.to_string(),
            email: volunteer.account.email.clone(),
            username: volunteer.account.username.clone(),
            details,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
