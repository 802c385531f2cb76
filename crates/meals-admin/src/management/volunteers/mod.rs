//! Volunteer lifecycle: onboarding, profile edits, removal, job records, and CSV export.

pub mod domain;
pub mod export;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Volunteer, VolunteerAccount, VolunteerDraft, VolunteerId, VolunteerRecord, VolunteerSummary,
    VolunteerValidationError,
};
pub use export::{export_filename, ExportError, VolunteerExport, EXPORT_COLUMNS};
pub use repository::{AccountNotice, AccountNotifier, NotifyError, VolunteerRepository};
pub use router::volunteer_router;
pub use service::{VolunteerService, VolunteerServiceError};
