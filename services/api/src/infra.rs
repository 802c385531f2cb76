use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use meals_admin::management::assignments::AssignmentService;
use meals_admin::management::memory::{
    InMemoryAssignmentRepository, InMemoryCustomerRepository, InMemoryVolunteerRepository,
};
use meals_admin::management::volunteers::{
    AccountNotice, AccountNotifier, NotifyError, VolunteerService,
};
use serde::Deserialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type ServerVolunteerService =
    VolunteerService<InMemoryVolunteerRepository, InMemoryAssignmentRepository, LoggingNotifier>;
pub(crate) type ServerAssignmentService =
    AssignmentService<InMemoryAssignmentRepository, InMemoryVolunteerRepository>;

/// Process-local stores and the services built on them.
pub(crate) struct Stores {
    pub(crate) volunteers: Arc<ServerVolunteerService>,
    pub(crate) assignments: Arc<ServerAssignmentService>,
    pub(crate) customers: Arc<InMemoryCustomerRepository>,
}

impl Stores {
    pub(crate) fn in_memory() -> Self {
        let volunteer_repository = Arc::new(InMemoryVolunteerRepository::default());
        let assignment_repository = Arc::new(InMemoryAssignmentRepository::default());
        let notifier = Arc::new(LoggingNotifier);

        Self {
            volunteers: Arc::new(VolunteerService::new(
                volunteer_repository.clone(),
                assignment_repository.clone(),
                notifier,
            )),
            assignments: Arc::new(AssignmentService::new(
                assignment_repository,
                volunteer_repository,
            )),
            customers: Arc::new(InMemoryCustomerRepository::default()),
        }
    }
}

/// Notifier that records account notices in the service log instead of sending mail.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct LoggingNotifier;

impl AccountNotifier for LoggingNotifier {
    fn notify(&self, notice: AccountNotice) -> Result<(), NotifyError> {
        info!(
            template = %notice.template,
            email = %notice.email,
            username = %notice.username,
            "account notice queued"
        );
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_padded_iso_dates() {
        assert_eq!(
            parse_date(" 2025-02-28 "),
            Ok(NaiveDate::from_ymd_opt(2025, 2, 28).expect("valid"))
        );
        assert!(parse_date("2025-02-30").is_err());
    }
}
