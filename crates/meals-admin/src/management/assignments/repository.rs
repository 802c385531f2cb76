use super::domain::Assignment;
use crate::management::repository::RepositoryError;
use crate::management::volunteers::VolunteerId;

/// Storage abstraction for recurring assignments.
pub trait AssignmentRepository: Send + Sync {
    fn insert(&self, assignment: Assignment) -> Result<Assignment, RepositoryError>;
    fn list(&self) -> Result<Vec<Assignment>, RepositoryError>;
    fn for_volunteer(&self, volunteer: VolunteerId) -> Result<Vec<Assignment>, RepositoryError>;
    /// Clears the volunteer from every assignment they hold, returning how many were released.
    fn release_volunteer(&self, volunteer: VolunteerId) -> Result<usize, RepositoryError>;
}
