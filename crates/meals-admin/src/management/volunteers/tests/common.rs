use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::management::assignments::{Assignment, AssignmentId, AssignmentRepository};
use crate::management::domain::Address;
use crate::management::memory::{
    InMemoryAssignmentRepository, InMemoryNotifier, InMemoryVolunteerRepository,
};
use crate::management::repository::RepositoryError;
use crate::management::volunteers::{
    volunteer_router, AccountNotice, AccountNotifier, NotifyError, Volunteer, VolunteerDraft,
    VolunteerId, VolunteerRecord, VolunteerRepository, VolunteerService,
};
use crate::schedule::RecurrenceRule;

pub(super) type MemoryService =
    VolunteerService<InMemoryVolunteerRepository, InMemoryAssignmentRepository, InMemoryNotifier>;

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date")
}

pub(super) fn draft(username: &str, first_name: &str, last_name: &str) -> VolunteerDraft {
    VolunteerDraft {
        username: username.to_string(),
        email: format!("{}@example.org", username.to_lowercase()),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        organization: "St. Paul's".to_string(),
        address: Some(Address::from_raw("12 Rugby Rd, Charlottesville, VA")),
        cell_phone: "434-555-0101".to_string(),
        ..VolunteerDraft::default()
    }
}

pub(super) struct Fixture {
    pub(super) volunteers: Arc<InMemoryVolunteerRepository>,
    pub(super) assignments: Arc<InMemoryAssignmentRepository>,
    pub(super) notifier: Arc<InMemoryNotifier>,
}

pub(super) fn build_service() -> (MemoryService, Fixture) {
    let volunteers = Arc::new(InMemoryVolunteerRepository::default());
    let assignments = Arc::new(InMemoryAssignmentRepository::default());
    let notifier = Arc::new(InMemoryNotifier::default());
    let service = VolunteerService::new(volunteers.clone(), assignments.clone(), notifier.clone());
    (
        service,
        Fixture {
            volunteers,
            assignments,
            notifier,
        },
    )
}

pub(super) fn assign(
    repository: &InMemoryAssignmentRepository,
    id: u64,
    volunteer: Option<VolunteerId>,
    rule: RecurrenceRule,
) -> Assignment {
    repository
        .insert(Assignment {
            id: AssignmentId(id),
            volunteer,
            route: format!("Route {id}"),
            rule,
        })
        .expect("assignment stored")
}

pub(super) fn volunteer_router_with_service(service: MemoryService) -> axum::Router {
    volunteer_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}

pub(super) struct OfflineNotifier;

impl AccountNotifier for OfflineNotifier {
    fn notify(&self, _notice: AccountNotice) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp offline".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl VolunteerRepository for UnavailableRepository {
    fn insert(&self, _volunteer: Volunteer) -> Result<Volunteer, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _volunteer: Volunteer) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: VolunteerId) -> Result<Option<Volunteer>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_username(&self, _username: &str) -> Result<Option<Volunteer>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove(&self, _id: VolunteerId) -> Result<Volunteer, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Volunteer>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn add_record(&self, _record: VolunteerRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn records(&self) -> Result<Vec<VolunteerRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Delegates to the in-memory store but never reports an existing username, so callers race
/// straight through to the write.
#[derive(Default, Clone)]
pub(super) struct StaleLookupRepository {
    pub(super) inner: InMemoryVolunteerRepository,
}

impl VolunteerRepository for StaleLookupRepository {
    fn insert(&self, volunteer: Volunteer) -> Result<Volunteer, RepositoryError> {
        self.inner.insert(volunteer)
    }

    fn update(&self, volunteer: Volunteer) -> Result<(), RepositoryError> {
        self.inner.update(volunteer)
    }

    fn fetch(&self, id: VolunteerId) -> Result<Option<Volunteer>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn find_by_username(&self, _username: &str) -> Result<Option<Volunteer>, RepositoryError> {
        Ok(None)
    }

    fn remove(&self, id: VolunteerId) -> Result<Volunteer, RepositoryError> {
        self.inner.remove(id)
    }

    fn list(&self) -> Result<Vec<Volunteer>, RepositoryError> {
        self.inner.list()
    }

    fn add_record(&self, record: VolunteerRecord) -> Result<(), RepositoryError> {
        self.inner.add_record(record)
    }

    fn records(&self) -> Result<Vec<VolunteerRecord>, RepositoryError> {
        self.inner.records()
    }
}
