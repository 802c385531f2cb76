//! Recurring assignment scheduling.
//!
//! Assignments recur on the Nth occurrence of a weekday within each month ("2nd Tuesday"). The
//! resolver in [`recurrence`] turns such a rule into a concrete day of a given month.

pub mod recurrence;

pub use recurrence::{
    resolve_day, try_resolve_day, weekday_from_ordinal, window_start, RecurrenceError,
    RecurrenceRule,
};
