use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::management::volunteers::VolunteerId;
use crate::schedule::RecurrenceRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentId(pub u64);

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A delivery route staffed on the Nth weekday of every month.
///
/// `volunteer` is `None` while the slot is open, including after its volunteer was removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub volunteer: Option<VolunteerId>,
    pub route: String,
    #[serde(flatten)]
    pub rule: RecurrenceRule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDraft {
    #[serde(default)]
    pub volunteer: Option<VolunteerId>,
    pub route: String,
    pub week_of_month: i32,
    pub day_of_week: i32,
}

impl AssignmentDraft {
    pub fn rule(&self) -> RecurrenceRule {
        RecurrenceRule::new(self.week_of_month, self.day_of_week)
    }
}

/// An assignment placed on the calendar for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledAssignment {
    pub assignment_id: AssignmentId,
    pub volunteer: Option<VolunteerId>,
    pub route: String,
    pub recurrence: String,
    /// `None` when the recurrence does not occur in the month.
    pub day: Option<u32>,
    pub date: Option<NaiveDate>,
}

impl ScheduledAssignment {
    pub fn resolve(assignment: &Assignment, month: Option<u32>, today: NaiveDate) -> Self {
        let date = assignment.rule.resolve_date(month, today);
        Self {
            assignment_id: assignment.id,
            volunteer: assignment.volunteer,
            route: assignment.route.clone(),
            recurrence: assignment.rule.label(),
            day: assignment.rule.resolve(month, today),
            date,
        }
    }

    pub fn occurs(&self) -> bool {
        self.day.is_some()
    }
}
