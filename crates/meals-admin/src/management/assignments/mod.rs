//! Recurring delivery assignments and their monthly schedule.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Assignment, AssignmentDraft, AssignmentId, ScheduledAssignment};
pub use repository::AssignmentRepository;
pub use router::{assignment_router, MonthQuery};
pub use service::{AssignmentService, AssignmentServiceError};
