use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::management::domain::Address;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolunteerId(pub u64);

impl fmt::Display for VolunteerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Login identity attached to every volunteer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerAccount {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// A volunteer as stored by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volunteer {
    pub id: VolunteerId,
    pub account: VolunteerAccount,
    pub active: bool,
    pub organization: String,
    pub address: Option<Address>,
    pub home_phone: String,
    pub cell_phone: String,
    pub work_phone: String,
    pub birth_date: Option<NaiveDate>,
    pub notes: String,
    pub join_date: NaiveDate,
    pub number_of_people: u32,
    pub dont_email: bool,
    pub end_date: Option<NaiveDate>,
    pub end_reason: String,
}

impl Volunteer {
    /// Builds a freshly onboarded volunteer. New volunteers always start active.
    pub(crate) fn onboard(id: VolunteerId, draft: VolunteerDraft, today: NaiveDate) -> Self {
        let account = draft.account();
        Self {
            id,
            account,
            active: true,
            organization: draft.organization,
            address: draft.address,
            home_phone: draft.home_phone,
            cell_phone: draft.cell_phone,
            work_phone: draft.work_phone,
            birth_date: draft.birth_date,
            notes: draft.notes,
            join_date: draft.join_date.unwrap_or(today),
            number_of_people: draft.number_of_people,
            dont_email: draft.dont_email,
            end_date: draft.end_date,
            end_reason: draft.end_reason,
        }
    }

    /// Replaces every editable field with the draft, keeping the join date when none is given.
    pub(crate) fn apply(&mut self, draft: VolunteerDraft) {
        self.account = draft.account();
        self.active = draft.active;
        self.organization = draft.organization;
        self.address = draft.address;
        self.home_phone = draft.home_phone;
        self.cell_phone = draft.cell_phone;
        self.work_phone = draft.work_phone;
        self.birth_date = draft.birth_date;
        self.notes = draft.notes;
        if let Some(join_date) = draft.join_date {
            self.join_date = join_date;
        }
        self.number_of_people = draft.number_of_people;
        self.dont_email = draft.dont_email;
        self.end_date = draft.end_date;
        self.end_reason = draft.end_reason;
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.account.first_name, self.account.last_name)
            .trim()
            .to_string()
    }
}

/// Create/edit payload submitted by staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolunteerDraft {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub active: bool,
    pub organization: String,
    pub address: Option<Address>,
    pub home_phone: String,
    pub cell_phone: String,
    pub work_phone: String,
    pub birth_date: Option<NaiveDate>,
    pub notes: String,
    pub join_date: Option<NaiveDate>,
    pub number_of_people: u32,
    pub dont_email: bool,
    pub end_date: Option<NaiveDate>,
    pub end_reason: String,
}

impl Default for VolunteerDraft {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            active: true,
            organization: String::new(),
            address: None,
            home_phone: String::new(),
            cell_phone: String::new(),
            work_phone: String::new(),
            birth_date: None,
            notes: String::new(),
            join_date: None,
            number_of_people: 1,
            dont_email: false,
            end_date: None,
            end_reason: String::new(),
        }
    }
}

impl VolunteerDraft {
    /// Usernames are compared case-insensitively, so they are stored lower-cased.
    pub fn normalized_username(&self) -> String {
        self.username.trim().to_lowercase()
    }

    pub fn validate(&self) -> Result<(), VolunteerValidationError> {
        let username = self.normalized_username();
        if username.is_empty() {
            return Err(VolunteerValidationError::MissingUsername);
        }
        if username.chars().any(char::is_whitespace) {
            return Err(VolunteerValidationError::InvalidUsername(username));
        }

        let email = self.email.trim();
        let valid_email = email
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && !domain.is_empty())
            .unwrap_or(false);
        if !valid_email {
            return Err(VolunteerValidationError::InvalidEmail(email.to_string()));
        }

        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(VolunteerValidationError::MissingName);
        }

        if let (Some(end), Some(join)) = (self.end_date, self.join_date) {
            if end < join {
                return Err(VolunteerValidationError::EndBeforeJoin { join, end });
            }
        }

        Ok(())
    }

    fn account(&self) -> VolunteerAccount {
        VolunteerAccount {
            username: self.normalized_username(),
            email: self.email.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VolunteerValidationError {
    #[error("username is required")]
    MissingUsername,
    #[error("username '{0}' must not contain whitespace")]
    InvalidUsername(String),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("first and last name are required")]
    MissingName,
    #[error("end date {end} is before join date {join}")]
    EndBeforeJoin { join: NaiveDate, end: NaiveDate },
}

/// A completed delivery job or shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerRecord {
    pub volunteer: VolunteerId,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
}

/// Listing row: the volunteer plus the date of their most recent job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolunteerSummary {
    #[serde(flatten)]
    pub volunteer: Volunteer,
    pub last_record_date: Option<NaiveDate>,
}

impl VolunteerSummary {
    pub fn from_records(volunteer: Volunteer, records: &[VolunteerRecord]) -> Self {
        let last_record_date = records
            .iter()
            .filter(|record| record.volunteer == volunteer.id)
            .map(|record| record.date)
            .max();
        Self {
            volunteer,
            last_record_date,
        }
    }
}
