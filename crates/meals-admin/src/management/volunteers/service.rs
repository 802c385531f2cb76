use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use super::domain::{
    Volunteer, VolunteerDraft, VolunteerId, VolunteerRecord, VolunteerSummary,
    VolunteerValidationError,
};
use super::export::{ExportError, VolunteerExport};
use super::repository::{AccountNotice, AccountNotifier, NotifyError, VolunteerRepository};
use crate::management::assignments::{AssignmentRepository, ScheduledAssignment};
use crate::management::repository::RepositoryError;

/// Service composing volunteer storage, assignment release, and account notifications.
pub struct VolunteerService<V, A, N> {
    volunteers: Arc<V>,
    assignments: Arc<A>,
    notifier: Arc<N>,
    sequence: AtomicU64,
}

impl<V, A, N> VolunteerService<V, A, N>
where
    V: VolunteerRepository + 'static,
    A: AssignmentRepository + 'static,
    N: AccountNotifier + 'static,
{
    pub fn new(volunteers: Arc<V>, assignments: Arc<A>, notifier: Arc<N>) -> Self {
        Self {
            volunteers,
            assignments,
            notifier,
            sequence: AtomicU64::new(1),
        }
    }

    fn next_id(&self) -> Result<VolunteerId, RepositoryError> {
        let floor = self
            .volunteers
            .list()?
            .iter()
            .map(|volunteer| volunteer.id.0 + 1)
            .max()
            .unwrap_or(1);
        self.sequence.fetch_max(floor, Ordering::Relaxed);
        Ok(VolunteerId(self.sequence.fetch_add(1, Ordering::Relaxed)))
    }

    fn require(&self, id: VolunteerId) -> Result<Volunteer, VolunteerServiceError> {
        self.volunteers
            .fetch(id)?
            .ok_or(VolunteerServiceError::NotFound(id))
    }

    /// Onboard a volunteer and send them a password setup notice.
    pub fn create(
        &self,
        draft: VolunteerDraft,
        today: NaiveDate,
    ) -> Result<Volunteer, VolunteerServiceError> {
        draft.validate()?;
        let username = draft.normalized_username();
        if self.volunteers.find_by_username(&username)?.is_some() {
            return Err(VolunteerServiceError::UsernameTaken(username));
        }

        let volunteer = Volunteer::onboard(self.next_id()?, draft, today);
        let stored = self
            .volunteers
            .insert(volunteer)
            .map_err(|err| taken_on_conflict(err, &username))?;
        self.notifier.notify(AccountNotice::password_setup(&stored))?;

        info!(
            volunteer_id = %stored.id,
            username = %stored.account.username,
            "volunteer onboarded"
        );
        Ok(stored)
    }

    /// Replace a volunteer's account and profile details.
    pub fn update(
        &self,
        id: VolunteerId,
        draft: VolunteerDraft,
    ) -> Result<Volunteer, VolunteerServiceError> {
        draft.validate()?;
        let mut volunteer = self.require(id)?;

        let username = draft.normalized_username();
        if let Some(existing) = self.volunteers.find_by_username(&username)? {
            if existing.id != id {
                return Err(VolunteerServiceError::UsernameTaken(username));
            }
        }

        volunteer.apply(draft);
        self.volunteers
            .update(volunteer.clone())
            .map_err(|err| taken_on_conflict(err, &username))?;

        info!(volunteer_id = %id, active = volunteer.active, "volunteer updated");
        Ok(volunteer)
    }

    /// Remove a volunteer, releasing any assignments they held. Returns the number released.
    pub fn delete(&self, id: VolunteerId) -> Result<usize, VolunteerServiceError> {
        self.require(id)?;
        let released = self.assignments.release_volunteer(id)?;
        self.volunteers.remove(id)?;

        info!(volunteer_id = %id, released, "volunteer deleted");
        Ok(released)
    }

    pub fn get(&self, id: VolunteerId) -> Result<Volunteer, VolunteerServiceError> {
        self.require(id)
    }

    /// All volunteers with their most recent job date, ordered by first then last name.
    pub fn list(&self) -> Result<Vec<VolunteerSummary>, VolunteerServiceError> {
        let mut summaries = self.summaries()?;
        summaries.sort_by(|left, right| {
            let left_account = &left.volunteer.account;
            let right_account = &right.volunteer.account;
            left_account
                .first_name
                .cmp(&right_account.first_name)
                .then_with(|| left_account.last_name.cmp(&right_account.last_name))
                .then_with(|| left.volunteer.id.cmp(&right.volunteer.id))
        });
        Ok(summaries)
    }

    fn summaries(&self) -> Result<Vec<VolunteerSummary>, VolunteerServiceError> {
        let records = self.volunteers.records()?;
        Ok(self
            .volunteers
            .list()?
            .into_iter()
            .map(|volunteer| VolunteerSummary::from_records(volunteer, &records))
            .collect())
    }

    /// Log a completed job for the volunteer.
    pub fn record_job(
        &self,
        id: VolunteerId,
        date: NaiveDate,
        description: String,
    ) -> Result<VolunteerRecord, VolunteerServiceError> {
        self.require(id)?;
        let record = VolunteerRecord {
            volunteer: id,
            date,
            description,
        };
        self.volunteers.add_record(record.clone())?;
        debug!(volunteer_id = %id, %date, "volunteer job recorded");
        Ok(record)
    }

    /// Render every volunteer, ordered by id, as a CSV attachment.
    pub fn export(&self, now: NaiveDateTime) -> Result<VolunteerExport, VolunteerServiceError> {
        let mut summaries = self.summaries()?;
        summaries.sort_by_key(|summary| summary.volunteer.id);
        let export = VolunteerExport::render(&summaries, now)?;
        info!(rows = summaries.len(), filename = %export.filename, "volunteer export generated");
        Ok(export)
    }

    /// Mark every volunteer active, returning how many changed.
    pub fn backfill_active(&self) -> Result<usize, VolunteerServiceError> {
        let mut changed = 0;
        for mut volunteer in self.volunteers.list()? {
            if !volunteer.active {
                volunteer.active = true;
                self.volunteers.update(volunteer)?;
                changed += 1;
            }
        }
        info!(changed, "volunteer active flag backfilled");
        Ok(changed)
    }

    /// The volunteer's assignments resolved against the given (or current) month.
    pub fn assignments_for(
        &self,
        id: VolunteerId,
        month: Option<u32>,
        today: NaiveDate,
    ) -> Result<Vec<ScheduledAssignment>, VolunteerServiceError> {
        self.require(id)?;
        Ok(self
            .assignments
            .for_volunteer(id)?
            .iter()
            .map(|assignment| ScheduledAssignment::resolve(assignment, month, today))
            .collect())
    }
}

fn taken_on_conflict(err: RepositoryError, username: &str) -> VolunteerServiceError {
    match err {
        RepositoryError::Conflict => VolunteerServiceError::UsernameTaken(username.to_string()),
        other => VolunteerServiceError::Repository(other),
    }
}

/// Error raised by the volunteer service.
#[derive(Debug, thiserror::Error)]
pub enum VolunteerServiceError {
    #[error(transparent)]
    Validation(#[from] VolunteerValidationError),
    #[error("username '{0}' is already taken")]
    UsernameTaken(String),
    #[error("volunteer {0} not found")]
    NotFound(VolunteerId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl VolunteerServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::UsernameTaken(_) | Self::Repository(RepositoryError::Conflict) => {
                StatusCode::CONFLICT
            }
            Self::NotFound(_) | Self::Repository(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            Self::Repository(RepositoryError::Unavailable(_))
            | Self::Notify(_)
            | Self::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
