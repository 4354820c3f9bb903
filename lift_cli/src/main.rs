use clap::{Parser, Subcommand};
use lift_core::*;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "lift")]
#[command(about = "Strength training split planner and scheduler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a weekly training plan
    Plan {
        /// Training days per week
        #[arg(long)]
        days: Option<u32>,

        /// Experience level (beginner, intermediate, advanced)
        #[arg(long)]
        level: Option<ExperienceLevel>,

        /// Available equipment, comma separated (e.g. barbell,dumbbell)
        #[arg(long, value_delimiter = ',')]
        equipment: Vec<Equipment>,

        /// Save the plan as the active routine
        #[arg(long)]
        save: bool,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the next workout day of the active routine (default)
    Next {
        /// Record the shown day as completed
        #[arg(long)]
        done: bool,

        /// Print the day as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a completed workout against the active routine
    Log {
        /// Day that was performed; omit for an ad-hoc workout
        #[arg(long)]
        day: Option<u32>,
    },

    /// Search the exercise catalog
    Catalog {
        /// Target muscle group (repeatable, comma separated)
        #[arg(long, value_delimiter = ',')]
        muscle: Vec<MuscleGroup>,

        /// Required equipment, any of (comma separated)
        #[arg(long, value_delimiter = ',')]
        equipment: Vec<Equipment>,

        /// Equipment to exclude (comma separated)
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<Equipment>,

        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,

        /// Number of results to skip
        #[arg(long)]
        offset: Option<usize>,
    },

    /// Show the effective configuration, or write a default config file
    Config {
        /// Write the defaults to the config path if no file exists there
        #[arg(long)]
        init: bool,
    },

    /// Roll up the completion WAL to CSV
    Rollup {
        /// Clean up processed WAL files after rollup
        #[arg(long)]
        cleanup: bool,
    },
}

/// File locations under the data directory
struct DataPaths {
    routine: PathBuf,
    wal_dir: PathBuf,
    wal: PathBuf,
    csv: PathBuf,
}

impl DataPaths {
    fn new(data_dir: &Path) -> Self {
        let wal_dir = data_dir.join("wal");
        Self {
            routine: data_dir.join("routine.json"),
            wal: wal_dir.join("completions.wal"),
            wal_dir,
            csv: data_dir.join("completions.csv"),
        }
    }

    fn history(&self) -> FileHistory {
        FileHistory::new(&self.wal, &self.csv)
    }
}

fn main() {
    let cli = Cli::parse();

    lift_core::logging::init_cli(cli.verbose);

    if let Err(e) = run(cli) {
        report_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(Config::default_config_path);
    if let Some(Commands::Config { init: true }) = cli.command {
        return cmd_config_init(&config_path);
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let paths = DataPaths::new(&data_dir);

    match cli.command {
        Some(Commands::Plan {
            days,
            level,
            equipment,
            save,
            json,
        }) => cmd_plan(&paths, &config, days, level, equipment, save, json),
        Some(Commands::Next { done, json }) => cmd_next(&paths, done, json),
        Some(Commands::Log { day }) => cmd_log(&paths, day),
        Some(Commands::Catalog {
            muscle,
            equipment,
            exclude,
            limit,
            offset,
        }) => cmd_catalog(&config, muscle, equipment, exclude, limit, offset),
        Some(Commands::Config { .. }) => cmd_config_show(&config_path, &config),
        Some(Commands::Rollup { cleanup }) => cmd_rollup(&paths, cleanup),
        None => cmd_next(&paths, false, false),
    }
}

fn report_error(error: &Error) {
    if !error.is_scheduling() {
        eprintln!("Error: {}", error);
        return;
    }

    match error {
        Error::MalformedRoutine(detail) => {
            tracing::error!("Malformed routine data: {}", detail);
            eprintln!("Routine data is inconsistent: {}", detail);
            eprintln!("Generate a new routine with `lift plan --save`.");
        }
        _ => eprintln!("No active routine. Run `lift plan --save` to set one up first."),
    }
}

fn load_catalog(config: &Config) -> Result<Cow<'static, Catalog>> {
    let catalog = Catalog::load_or_default(config.catalog.path.as_deref())?;
    let uncovered = catalog.uncovered_muscles();
    if !uncovered.is_empty() {
        tracing::warn!("Catalog has no exercises for: {:?}", uncovered);
    }
    Ok(catalog)
}

fn cmd_plan(
    paths: &DataPaths,
    config: &Config,
    days: Option<u32>,
    level: Option<ExperienceLevel>,
    equipment: Vec<Equipment>,
    save: bool,
    json: bool,
) -> Result<()> {
    let catalog = load_catalog(config)?;

    let days = days.unwrap_or(config.plan.days_per_week);
    let level = level.unwrap_or(config.plan.experience_level);
    let equipment_filter = if equipment.is_empty() {
        config.equipment.filter()
    } else {
        Some(equipment.as_slice())
    };

    let plan = generate_plan(catalog.as_ref(), days, level, equipment_filter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        display_plan(&plan);
    }

    if save {
        let routine = Routine::from_plan(&plan, chrono::Utc::now());
        RoutineStore::new(&paths.routine).save(&routine)?;
        if !json {
            println!("✓ Saved as active routine: {}", routine.name);
        }
    }

    Ok(())
}

fn cmd_next(paths: &DataPaths, done: bool, json: bool) -> Result<()> {
    let store = RoutineStore::new(&paths.routine);
    let routine = store.active_routine()?.ok_or(Error::NoActiveRoutineDays)?;
    let last = paths.history().last_completion(routine.id)?;

    let day = next_day(&routine.days, last.as_ref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(day)?);
    } else {
        display_next_day(&routine, day, last.as_ref());
    }

    if done {
        record_completion(paths, routine.id, Some(day.day_order))?;
        if !json {
            println!("✓ Day {} logged!", day.day_order);
        }
    }

    Ok(())
}

fn cmd_log(paths: &DataPaths, day: Option<u32>) -> Result<()> {
    let store = RoutineStore::new(&paths.routine);
    let routine = store.active_routine()?.ok_or(Error::NoActiveRoutineDays)?;

    if let Some(order) = day {
        if !routine.days.iter().any(|d| d.day_order == order) {
            return Err(Error::InvalidInput(format!(
                "routine has no day {} (days 1-{})",
                order,
                routine.days.len()
            )));
        }
    }

    record_completion(paths, routine.id, day)?;

    match day {
        Some(order) => println!("✓ Day {} logged!", order),
        None => println!("✓ Ad-hoc workout logged! Next workout restarts at day 1."),
    }
    Ok(())
}

fn record_completion(paths: &DataPaths, routine_id: uuid::Uuid, day: Option<u32>) -> Result<()> {
    let record = CompletionRecord::new(routine_id, day, chrono::Utc::now());
    let mut sink = JsonlSink::new(&paths.wal);
    sink.append(&record)
}

fn cmd_catalog(
    config: &Config,
    muscle: Vec<MuscleGroup>,
    equipment: Vec<Equipment>,
    exclude: Vec<Equipment>,
    limit: Option<usize>,
    offset: Option<usize>,
) -> Result<()> {
    let catalog = load_catalog(config)?;

    let query = ExerciseQuery {
        target_muscles: Some(muscle),
        equipments: Some(equipment),
        exclude_equipments: Some(exclude),
        limit,
        offset,
    };
    let result = catalog.search(&query)?;

    for exercise in &result.exercises {
        println!(
            "  {:<28} [{}] ({})",
            exercise.name,
            join(&exercise.target_muscles),
            join(&exercise.equipment)
        );
    }

    let start = offset.unwrap_or(0);
    println!();
    println!(
        "Showing {} of {} exercises",
        result.exercises.len(),
        result.total
    );
    if result.has_more {
        println!(
            "  More available: --offset {}",
            start + result.exercises.len()
        );
    }

    Ok(())
}

fn cmd_config_show(path: &Path, config: &Config) -> Result<()> {
    let source = if path.exists() { "" } else { " (not found, showing defaults)" };
    println!("# {}{}", path.display(), source);
    print!("{}", config.to_toml()?);
    Ok(())
}

fn cmd_config_init(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(Error::Config(format!(
            "{} already exists, not overwriting",
            path.display()
        )));
    }

    Config::default().save_to(path)?;
    println!("✓ Wrote default config to {}", path.display());
    Ok(())
}

fn cmd_rollup(paths: &DataPaths, cleanup: bool) -> Result<()> {
    if !paths.wal.exists() {
        println!("No WAL file found - nothing to roll up.");
        return Ok(());
    }

    let count = lift_core::csv_rollup::wal_to_csv_and_archive(&paths.wal, &paths.csv)?;

    println!("✓ Rolled up {} completions to CSV", count);
    println!("  CSV: {}", paths.csv.display());

    if cleanup {
        let cleaned = lift_core::csv_rollup::cleanup_processed_wals(&paths.wal_dir)?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed WAL files", cleaned);
        }
    }

    Ok(())
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_plan(plan: &WorkoutPlan) {
    println!("\n╭─────────────────────────────────────────╮");
    println!(
        "│  {} PLAN ({} days/week)",
        plan.archetype.to_string().to_uppercase(),
        plan.days_per_week
    );
    println!("╰─────────────────────────────────────────╯");
    println!("  Level: {}", plan.experience_level);

    for (i, day) in plan.workout_days.iter().enumerate() {
        println!();
        println!("  Day {}: {}  [{}]", i + 1, day.name, join(&day.focus));
        if day.exercises.is_empty() {
            println!("    (no matching exercises)");
        }
        for exercise in &day.exercises {
            println!("    → {} ({})", exercise.name, join(&exercise.equipment));
        }
    }

    println!();
}

fn display_next_day(routine: &Routine, day: &RoutineDay, last: Option<&CompletionRecord>) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  NEXT: DAY {} OF {}", day.day_order, routine.days.len());
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", day.name);
    println!("  Routine: {}", routine.name);

    match last {
        Some(CompletionRecord {
            day_order: Some(order),
            completed_at,
            ..
        }) => println!(
            "  Last: day {} on {}",
            order,
            completed_at.format("%Y-%m-%d")
        ),
        Some(record) => println!(
            "  Last: ad-hoc workout on {}",
            record.completed_at.format("%Y-%m-%d")
        ),
        None => println!("  Last: none yet"),
    }

    println!();
    for exercise in &day.exercises {
        println!("  → {}", exercise.name);
    }
    println!();
}
