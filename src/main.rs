//! ghisa - personal hypertrophy training log

use std::path::Path;

use anyhow::{Result, anyhow, bail};
use clap::{Parser, Subcommand};
use tracing::warn;

use ghisa::ai::CoachClient;
use ghisa::catalog;
use ghisa::entry::{self, LogEntry, SetData};
use ghisa::state::AppState;
use ghisa::store::Store;
use ghisa::tui::App;
use ghisa::volume;

const DB_PATH: &str = "ghisa.db";

#[derive(Parser)]
#[command(name = "ghisa")]
#[command(author, version, about = "Diario di allenamento - weekly split, logs and AI coach")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI dashboard
    Tui,

    /// Record a session for an exercise
    Log {
        /// Exercise id (see `plan`)
        exercise: String,

        /// Sets (standard mode)
        #[arg(short, long, default_value = "")]
        sets: String,

        /// Reps (standard mode)
        #[arg(short, long, default_value = "")]
        reps: String,

        /// Load in kg (standard mode)
        #[arg(short, long, default_value = "")]
        kg: String,

        /// Per-set detail as REPSxKG; repeatable, switches to dynamic mode
        #[arg(long = "set", value_name = "REPSxKG")]
        set: Vec<String>,

        /// Optional note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Show a day's schedule in display order
    Plan {
        /// Day id (lun..dom); defaults to today
        day: Option<String>,
    },

    /// List stored sessions
    History,

    /// Weekly volume per muscle group
    Volume,

    /// Print an AI warm-up plan for a day
    Warmup {
        /// Day id (lun..dom); defaults to today
        day: Option<String>,
    },

    /// Delete every stored log and custom order
    Reset {
        /// Skip the confirmation
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let store = open_store()?;

    match cli.command {
        Some(Commands::Tui) | None => {
            let mut app = App::new(AppState::load(store))?;
            app.run()?;
        }

        Some(Commands::Log { exercise, sets, reps, kg, set, note }) => {
            let Some(ex) = catalog::find_exercise(&exercise) else {
                bail!("unknown exercise id '{}' (use `ghisa plan` to list ids)", exercise);
            };
            let note = note.unwrap_or_default();
            let entry = if set.is_empty() {
                entry::build_standard(&sets, &reps, &kg, &note)?
            } else {
                let parsed: Vec<SetData> =
                    set.iter().map(|s| parse_set(s)).collect::<Result<_>>()?;
                entry::build_dynamic(&parsed, &note)?
            };

            let mut state = AppState::load(store);
            let summary = entry.summary();
            state.save_log(ex.id, entry);
            println!("Logged: {} - {}", ex.name, summary);
        }

        Some(Commands::Plan { day }) => {
            let state = AppState::load(store);
            let day = resolve_day(day)?;
            println!("{} - {}", day.full_name, day.focus);
            println!("{:-<70}", "");
            if day.is_rest() {
                println!("Rest day.");
            } else {
                for (i, ex) in state.exercises_for_day(day.id).iter().enumerate() {
                    let logged = match state.log_for(ex.id) {
                        Some(log) => format!(" | {} ({})", log.summary(), log.date),
                        None => String::new(),
                    };
                    println!("{:2}. [{}] {} - {}{}", i + 1, ex.id, ex.name, ex.muscle, logged);
                }
            }
        }

        Some(Commands::History) => {
            let state = AppState::load(store);
            let mut entries: Vec<(&String, &LogEntry)> = state.logs.iter().collect();
            entries.sort_by_key(|(_, log)| std::cmp::Reverse(log.timestamp));

            println!("Stored sessions:");
            println!("{:-<70}", "");
            for (id, log) in entries {
                let name = catalog::find_exercise(id).map(|ex| ex.name).unwrap_or(id.as_str());
                println!(
                    "{} | {:35} | {} | {}",
                    log.date,
                    name,
                    log.summary(),
                    log.note.as_deref().unwrap_or("-")
                );
            }
        }

        Some(Commands::Volume) => {
            let state = AppState::load(store);
            let report = volume::weekly_report(&state.logs);

            println!("Weekly Volume");
            println!("{:-<40}", "");
            if report.is_empty() {
                println!("Nessun dato registrato.");
            }
            for (group, count, bar) in report {
                println!("{} {:14} {:>3} sets", bar, group, count);
            }
        }

        Some(Commands::Warmup { day }) => {
            let state = AppState::load(store);
            let day = resolve_day(day)?;
            if day.is_rest() {
                bail!("{} è un giorno di riposo", day.full_name);
            }

            let client = CoachClient::from_env()?;
            let names: Vec<String> = state
                .exercises_for_day(day.id)
                .iter()
                .map(|ex| ex.name.to_string())
                .collect();

            println!("Warm-up per {} ({})...", day.full_name, day.focus);
            let plan = client.warmup_plan(day.focus, &names)?;

            println!("\n1. Mobilità Articolare");
            for step in &plan.mobility {
                println!("   {} - {}", step.name, step.instruction);
            }
            println!("\n2. Attivazione Specifica");
            for step in &plan.activation {
                println!("   {} - {}", step.name, step.instruction);
            }
            println!("\n3. Avvicinamento al carico");
            println!("   {}", plan.potentiation);
        }

        Some(Commands::Reset { yes }) => {
            if !yes {
                println!("This deletes every stored log and custom order.");
                println!("Re-run with --yes to confirm.");
                return Ok(());
            }
            let mut state = AppState::load(store);
            state.reset_all();
            println!("All data cleared.");
        }
    }

    Ok(())
}

/// Open the on-disk store; an unusable file degrades to an in-memory one
fn open_store() -> Result<Store> {
    match Store::open(Path::new(DB_PATH)) {
        Ok(store) => Ok(store),
        Err(e) => {
            warn!(error = %e, "cannot open {}, falling back to in-memory store", DB_PATH);
            Store::open_in_memory()
        }
    }
}

fn resolve_day(day: Option<String>) -> Result<&'static catalog::WeekDay> {
    let id = day.unwrap_or_else(|| catalog::today_id().to_string());
    catalog::find_day(&id)
        .ok_or_else(|| anyhow!("unknown day '{}' (lun, mar, mer, gio, ven, sab, dom)", id))
}

fn parse_set(raw: &str) -> Result<SetData> {
    let (reps, kg) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow!("invalid set '{}', expected REPSxKG (e.g. 10x50)", raw))?;
    Ok(SetData { reps: reps.trim().to_string(), kg: kg.trim().to_string() })
}
