use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::NaiveDate;
use tracing::{debug, info};

use super::domain::{Assignment, AssignmentDraft, AssignmentId, ScheduledAssignment};
use super::repository::AssignmentRepository;
use crate::management::repository::RepositoryError;
use crate::management::volunteers::{VolunteerId, VolunteerRepository};
use crate::schedule::RecurrenceError;

/// Service for creating assignments and laying them out on a month.
pub struct AssignmentService<A, V> {
    assignments: Arc<A>,
    volunteers: Arc<V>,
    sequence: AtomicU64,
}

impl<A, V> AssignmentService<A, V>
where
    A: AssignmentRepository + 'static,
    V: VolunteerRepository + 'static,
{
    pub fn new(assignments: Arc<A>, volunteers: Arc<V>) -> Self {
        Self {
            assignments,
            volunteers,
            sequence: AtomicU64::new(1),
        }
    }

    fn next_id(&self) -> Result<AssignmentId, RepositoryError> {
        let floor = self
            .assignments
            .list()?
            .iter()
            .map(|assignment| assignment.id.0 + 1)
            .max()
            .unwrap_or(1);
        self.sequence.fetch_max(floor, Ordering::Relaxed);
        Ok(AssignmentId(self.sequence.fetch_add(1, Ordering::Relaxed)))
    }

    pub fn create(&self, draft: AssignmentDraft) -> Result<Assignment, AssignmentServiceError> {
        let rule = draft.rule();
        rule.validate()?;

        if let Some(volunteer) = draft.volunteer {
            if self.volunteers.fetch(volunteer)?.is_none() {
                return Err(AssignmentServiceError::UnknownVolunteer(volunteer));
            }
        }

        let assignment = Assignment {
            id: self.next_id()?,
            volunteer: draft.volunteer,
            route: draft.route.trim().to_string(),
            rule,
        };
        let stored = self.assignments.insert(assignment)?;

        info!(assignment_id = %stored.id, recurrence = %stored.rule.label(), "assignment created");
        Ok(stored)
    }

    pub fn list(&self) -> Result<Vec<Assignment>, AssignmentServiceError> {
        let mut assignments = self.assignments.list()?;
        assignments.sort_by_key(|assignment| assignment.id);
        Ok(assignments)
    }

    /// Every assignment resolved against the given (or current) month, in calendar order.
    ///
    /// Assignments with no occurrence that month are kept, with no day, after the dated ones.
    pub fn schedule(
        &self,
        month: Option<u32>,
        today: NaiveDate,
    ) -> Result<Vec<ScheduledAssignment>, AssignmentServiceError> {
        if let Some(month) = month {
            if !(1..=12).contains(&month) {
                return Err(RecurrenceError::InvalidMonth(month).into());
            }
        }

        let mut scheduled: Vec<ScheduledAssignment> = self
            .assignments
            .list()?
            .iter()
            .map(|assignment| ScheduledAssignment::resolve(assignment, month, today))
            .collect();
        scheduled.sort_by_key(|entry| (entry.day.is_none(), entry.day, entry.assignment_id));

        let skipped = scheduled.iter().filter(|entry| !entry.occurs()).count();
        debug!(total = scheduled.len(), skipped, "assignment schedule resolved");
        Ok(scheduled)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssignmentServiceError {
    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),
    #[error("volunteer {0} does not exist")]
    UnknownVolunteer(VolunteerId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AssignmentServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Recurrence(_) | Self::UnknownVolunteer(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            Self::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Self::Repository(RepositoryError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
