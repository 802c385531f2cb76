use chrono::{NaiveDate, NaiveDateTime, Timelike};

use super::domain::VolunteerSummary;

/// Column order of the volunteer CSV export.
pub const EXPORT_COLUMNS: [&str; 18] = [
    "email",
    "first_name",
    "last_name",
    "id",
    "active",
    "organization",
    "address",
    "home_phone",
    "cell_phone",
    "work_phone",
    "birth_date",
    "notes",
    "join_date",
    "number_of_people",
    "dont_email",
    "end_date",
    "end_reason",
    "last_job",
];

/// A rendered CSV attachment.
#[derive(Debug, Clone)]
pub struct VolunteerExport {
    pub filename: String,
    pub body: Vec<u8>,
}

impl VolunteerExport {
    pub const CONTENT_TYPE: &'static str = "text/csv";

    pub fn render(rows: &[VolunteerSummary], now: NaiveDateTime) -> Result<Self, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(EXPORT_COLUMNS)?;
        for row in rows {
            writer.write_record(export_row(row))?;
        }
        let body = writer
            .into_inner()
            .map_err(|err| ExportError::Io(err.into_error()))?;

        Ok(Self {
            filename: export_filename(now),
            body,
        })
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Timestamped attachment name. Whole seconds carry no fractional part.
pub fn export_filename(now: NaiveDateTime) -> String {
    let pattern = if now.nanosecond() / 1_000 == 0 {
        "%Y-%m-%d %H:%M:%S"
    } else {
        "%Y-%m-%d %H:%M:%S%.6f"
    };
    format!("volunteer-export-{}.csv", now.format(pattern))
}

fn export_row(summary: &VolunteerSummary) -> Vec<String> {
    let volunteer = &summary.volunteer;
    let account = &volunteer.account;
    vec![
        account.email.clone(),
        account.first_name.clone(),
        account.last_name.clone(),
        volunteer.id.to_string(),
        flag(volunteer.active),
        volunteer.organization.clone(),
        volunteer
            .address
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        volunteer.home_phone.clone(),
        volunteer.cell_phone.clone(),
        volunteer.work_phone.clone(),
        date(volunteer.birth_date),
        volunteer.notes.clone(),
        date(Some(volunteer.join_date)),
        volunteer.number_of_people.to_string(),
        flag(volunteer.dont_email),
        date(volunteer.end_date),
        volunteer.end_reason.clone(),
        date(summary.last_record_date),
    ]
}

// Spreadsheet consumers of the export expect capitalised booleans.
fn flag(value: bool) -> String {
    let text = if value { "True" } else { "False" };
    text.to_string()
}

fn date(value: Option<NaiveDate>) -> String {
    value
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write volunteer CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush volunteer CSV: {0}")]
    Io(#[from] std::io::Error),
}
