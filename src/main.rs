use std::{path::PathBuf, process::ExitCode, time::Duration};

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use clap::Parser as _;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use planner::{
    calendar::{month_grid, sorted_milestones},
    clock::{Clock, FixedClock, SystemClock},
    dataset::Dataset,
    error::AppError,
    grid::project,
    parser::parse_range,
    prefs::{PreferenceFile, Request, ViewMode},
    render,
    schedule::normalize,
    settings::Settings,
    tick,
};

#[derive(Debug, Clone, clap::Parser)]
#[clap(about = "Class schedule planner")]
struct Cli {
    /// Settings file.
    #[clap(long, default_value = "planner.toml")]
    config: PathBuf,
    /// Where view, dataset and day choices are remembered.
    #[clap(long, default_value = ".planner-prefs.toml")]
    prefs: PathBuf,
    /// Pretend the current time is this, e.g. 2025-09-03T10:30:00.
    #[clap(long)]
    now: Option<NaiveDateTime>,
    /// Dataset to show; remembered for later runs.
    #[clap(long)]
    dataset: Option<String>,
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, clap::Subcommand)]
enum Command {
    /// One day's timeline with free periods.
    Daily {
        #[clap(long)]
        day: Option<Weekday>,
        /// Redraw every refresh interval until Ctrl-C.
        #[clap(long)]
        watch: bool,
    },
    /// Week table, Monday to Saturday.
    Weekly,
    /// Month calendar of events.
    Monthly {
        /// YYYY-MM, defaults to the current month.
        #[clap(long)]
        month: Option<String>,
    },
    Milestones,
    /// Report time labels that only parse leniently.
    Check,
    /// List configured datasets.
    Datasets,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "planner=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("🛑 {}", err);
            ExitCode::FAILURE
        }
    }
}

impl Command {
    fn view(&self) -> Option<ViewMode> {
        match self {
            Command::Daily { .. } => Some(ViewMode::Daily),
            Command::Weekly => Some(ViewMode::Weekly),
            Command::Monthly { .. } => Some(ViewMode::Monthly),
            Command::Milestones | Command::Check | Command::Datasets => None,
        }
    }

    fn for_view(view: ViewMode) -> Self {
        match view {
            ViewMode::Daily => Command::Daily {
                day: None,
                watch: false,
            },
            ViewMode::Weekly => Command::Weekly,
            ViewMode::Monthly => Command::Monthly { month: None },
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let settings = Settings::load(&cli.config)?;

    let clock: Box<dyn Clock> = match cli.now {
        Some(now) => Box::new(FixedClock(now)),
        None => Box::new(SystemClock),
    };

    if let Some(id) = &cli.dataset {
        settings.dataset_path(id)?;
    }

    let request = Request {
        dataset: cli.dataset,
        view: cli.command.as_ref().and_then(Command::view),
        day: match &cli.command {
            Some(Command::Daily { day, .. }) => *day,
            _ => None,
        },
    };
    let selection = PreferenceFile::new(&cli.prefs).update(
        request,
        &settings.default_dataset,
        clock.weekday(),
    )?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::for_view(selection.view));

    if let Command::Datasets = command {
        for entry in &settings.datasets {
            let marker = if entry.id == selection.dataset { '*' } else { ' ' };
            println!("{} {:<8} {}", marker, entry.id, entry.label);
        }
        return Ok(());
    }

    let path = settings.dataset_path(&selection.dataset)?;
    let dataset = Dataset::load(&path).map_err(|err| AppError::Load(Box::new(err)))?;
    debug!("using dataset {} from {}", selection.dataset, path.display());

    match command {
        Command::Daily { watch, .. } => {
            let day = selection.day;
            if watch {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()?;
                let period = Duration::from_secs(settings.refresh_secs.max(1));
                let ticks = runtime.block_on(tick::run_every(period, tick::ctrl_c(), || {
                    print!("\x1b[2J\x1b[H");
                    show_daily(&dataset, &settings, clock.as_ref(), day);
                }));
                debug!("watch ended after {} refreshes", ticks);
            } else {
                show_daily(&dataset, &settings, clock.as_ref(), day);
            }
        }
        Command::Weekly => {
            let grid = project(&dataset.time, &dataset.classes, settings.grid_key);
            print!(
                "{}",
                render::weekly(&grid, settings.period_minutes, settings.time_format)
            );
        }
        Command::Monthly { month } => {
            let today = clock.today();
            let month = match month {
                Some(month) => parse_month(&month)?,
                None => today,
            };
            let days = month_grid(&dataset.events, month, today);
            print!("{}", render::monthly(&days));
        }
        Command::Milestones => {
            print!("{}", render::milestones(&sorted_milestones(&dataset.milestones)));
        }
        Command::Check => check_labels(&dataset, settings.period_minutes),
        Command::Datasets => {}
    }

    Ok(())
}

fn show_daily(dataset: &Dataset, settings: &Settings, clock: &dyn Clock, day: Weekday) {
    let timeline = normalize(dataset.day(day), &settings.schedule_config());
    let reference = (day == clock.weekday()).then(|| clock.minutes_of_day());
    print!(
        "{}",
        render::daily(
            day,
            &timeline,
            &dataset.classes,
            reference,
            settings.time_format
        )
    );
}

fn check_labels(dataset: &Dataset, period_minutes: u32) {
    let mut days: Vec<_> = dataset.time.iter().collect();
    days.sort_by_key(|(day, _)| day.num_days_from_sunday());

    let mut problems = 0;
    for (day, slots) in days {
        for (index, slot) in slots.iter().enumerate() {
            if let Err(err) = parse_range(&slot.time, period_minutes) {
                problems += 1;
                warn!("{:?} slot {} has a malformed label", day, index);
                println!(
                    "{} #{}: {:?}: {}",
                    render::day_name(*day),
                    index,
                    slot.time,
                    err
                );
            }
        }
    }

    if problems == 0 {
        println!("All time labels are well formed.");
    }
}

fn parse_month(month: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(&format!("{}-01", month.trim()), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidMonth(month.to_string()))
}
