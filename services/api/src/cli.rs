use crate::commands::{run_schedule_resolve, run_seed_command, ScheduleResolveArgs, SeedArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use meals_admin::error::AppError;
use meals_admin::management::customers::SeedMode;

#[derive(Parser, Debug)]
#[command(
    name = "Meal Delivery Staff Console",
    about = "Run and administer the meal-delivery staff service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Seed customer data for testing and development
    Seed(SeedArgs),
    /// Work with recurring assignment schedules
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ScheduleCommand {
    /// Resolve the day of month for a week-of-month/day-of-week recurrence
    Resolve(ScheduleResolveArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the in-memory store before serving (refresh or clear)
    #[arg(long)]
    pub(crate) seed: Option<SeedMode>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Seed(args) => run_seed_command(args),
        Command::Schedule {
            command: ScheduleCommand::Resolve(args),
        } => run_schedule_resolve(args),
    }
}
