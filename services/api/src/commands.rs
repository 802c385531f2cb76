use crate::infra::parse_date;
use chrono::{Local, NaiveDate};
use clap::Args;
use meals_admin::config::AppConfig;
use meals_admin::error::AppError;
use meals_admin::management::customers::{run_seed, CustomerRepository, SeedError, SeedMode};
use meals_admin::management::memory::InMemoryCustomerRepository;
use meals_admin::schedule::{try_resolve_day, RecurrenceError, RecurrenceRule};
use meals_admin::telemetry;

#[derive(Args, Debug)]
pub(crate) struct SeedArgs {
    /// Seeding mode: `refresh` clears then creates customers, `clear` only deletes
    #[arg(long, default_value = "refresh")]
    pub(crate) mode: SeedMode,
    /// Number of customers to create (defaults to APP_SEED_CUSTOMERS)
    #[arg(long)]
    pub(crate) count: Option<usize>,
}

#[derive(Args, Debug)]
pub(crate) struct ScheduleResolveArgs {
    /// Which occurrence of the weekday within the month (1-5)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) week_of_month: i32,
    /// Target weekday, Monday = 1 through Sunday = 7
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) day_of_week: i32,
    /// Month to resolve (1-12, defaults to the current month)
    #[arg(long)]
    pub(crate) month: Option<u32>,
    /// Reference date supplying the year and default month (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_seed_command(args: SeedArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let count = args.count.unwrap_or(config.seed.customer_count);
    let repository = InMemoryCustomerRepository::default();

    println!("seeding data...");
    let summary = run_seed(&repository, args.mode, count)?;
    for customer in repository.customers().map_err(SeedError::from)? {
        let status = if customer.active { "active" } else { "inactive" };
        println!("  #{:<3} {:<16} {}", customer.id, customer.to_string(), status);
    }
    println!(
        "done. mode={} cleared={} created={} skipped={}",
        args.mode, summary.cleared, summary.created, summary.skipped
    );

    Ok(())
}

pub(crate) fn run_schedule_resolve(args: ScheduleResolveArgs) -> Result<(), AppError> {
    let ScheduleResolveArgs {
        week_of_month,
        day_of_week,
        month,
        today,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let rule = RecurrenceRule::new(week_of_month, day_of_week);
    println!("{}", render_resolution(&rule, month, today)?);
    Ok(())
}

fn render_resolution(
    rule: &RecurrenceRule,
    month: Option<u32>,
    today: NaiveDate,
) -> Result<String, AppError> {
    match try_resolve_day(rule.week_of_month, rule.day_of_week, month, today) {
        Ok(day) => {
            let date = rule
                .resolve_date(month, today)
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            Ok(format!("{}: day {day} ({date})", rule.label()))
        }
        Err(RecurrenceError::NoOccurrence { year, month, .. }) => Ok(format!(
            "{}: does not occur in {year}-{month:02}",
            rule.label()
        )),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date")
    }

    #[test]
    fn renders_resolved_day_with_date() {
        let rule = RecurrenceRule::new(1, 1);
        let line = render_resolution(&rule, None, today()).expect("renders");
        assert_eq!(line, "1st Mon: day 6 (2025-01-06)");
    }

    #[test]
    fn renders_missing_occurrence_without_failing() {
        let rule = RecurrenceRule::new(5, 1);
        let line = render_resolution(&rule, Some(2), today()).expect("renders");
        assert_eq!(line, "5th Mon: does not occur in 2025-02");
    }

    #[test]
    fn invalid_ordinals_are_reported_as_errors() {
        let rule = RecurrenceRule::new(6, 1);
        assert!(render_resolution(&rule, None, today()).is_err());
    }
}
