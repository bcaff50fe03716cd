use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};
use itertools::Itertools;
use log::{error, warn};
use trialsheet::{
    AppConfig, FileBasedStorage, LapSlot, TimeValue, Trial, TrialEntry, TrialSheetError,
    TrialStore, display_time,
    catalog::{OptionKind, compare_names, suggest},
    exchange::{self, ExchangeFormat},
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// Trial store file to use instead of the configured one
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Record a time-trial run
    Add {
        #[arg(short, long, default_value = "")]
        track: String,
        #[arg(short, long, default_value = "")]
        character: String,
        #[arg(short, long, default_value = "")]
        vehicle: String,
        #[arg(long, default_value = "")]
        lap1: String,
        #[arg(long, default_value = "")]
        lap2: String,
        /// Finish time, M:SS.mmm
        #[arg(short, long, default_value = "")]
        finish: String,
    },
    /// Show the third lap implied by a finish time
    Lap3 {
        #[arg(long, default_value = "")]
        lap1: String,
        #[arg(long, default_value = "")]
        lap2: String,
        #[arg(short, long, default_value = "")]
        finish: String,
    },
    /// List recorded runs, newest first
    List {
        #[arg(short, long)]
        track: Option<String>,
    },
    /// Delete a run by id
    Remove { id: u64 },
    /// Show personal-best splits per track
    Bests {
        #[arg(short, long)]
        track: Option<String>,
    },
    /// Export all runs
    Export {
        format: ExchangeFormat,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace all runs with the contents of a .json or .csv file
    Import { input: PathBuf },
    /// List tracks, characters or vehicles matching a search
    Options { kind: OptionKind, query: Option<String> },
    /// Show the active configuration
    Config {
        /// Write the configuration file, creating it with defaults if missing
        #[arg(long)]
        save: bool,
    },
}

fn load_config() -> AppConfig {
    match AppConfig::from_local_file() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            warn!("Ignoring config file: {}", e);
            AppConfig::default()
        }
    }
}

fn open_store(
    store: Option<PathBuf>,
    config: &AppConfig,
) -> Result<TrialStore<FileBasedStorage>, TrialSheetError> {
    let path = match store {
        Some(path) => path,
        None => config.resolve_store_path()?,
    };
    Ok(TrialStore::open(FileBasedStorage::new(path)))
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

fn hint_unknown(kind: OptionKind, value: &str) {
    if value.is_empty() || kind.contains(value) {
        return;
    }
    let matches = suggest(kind.options(), value);
    if !matches.is_empty() {
        println!("{value:?} is not in the list; did you mean {}?", matches.iter().join(", "));
    }
}

fn print_trial(trial: &Trial) {
    let date = if trial.date.is_empty() {
        String::new()
    } else {
        format!(" · {}", trial.date)
    };
    println!(
        "[{}] {}  {} · {}{}",
        trial.id, trial.track, trial.character, trial.vehicle, date
    );
    println!(
        "    L1 {}  L2 {}  L3 {}  FIN {}",
        display_time(&trial.lap1),
        display_time(&trial.lap2),
        display_time(&trial.lap3),
        display_time(&trial.finished_time)
    );
}

fn add(store: &mut TrialStore<FileBasedStorage>, entry: TrialEntry) -> Result<(), TrialSheetError> {
    hint_unknown(OptionKind::Tracks, &entry.track);
    hint_unknown(OptionKind::Characters, &entry.character);
    hint_unknown(OptionKind::Vehicles, &entry.vehicle);

    match store.add(entry)? {
        Some(trial) => {
            println!("Recorded run {}", trial.id);
            print_trial(trial);
        }
        None => println!(
            "Nothing recorded: track, character, vehicle, lap 1, lap 2 and finish are all required"
        ),
    }
    Ok(())
}

fn list(store: &TrialStore<FileBasedStorage>, track: Option<&str>) {
    let runs = store
        .trials()
        .iter()
        .filter(|t| track.is_none_or(|track| t.track == track))
        .collect_vec();
    if runs.is_empty() {
        println!("No runs yet. Add your first time trial with `trialsheet add`.");
        return;
    }
    for trial in runs.iter().rev() {
        print_trial(trial);
    }
    println!("{} run{}", runs.len(), plural(runs.len()));
}

fn bests(store: &TrialStore<FileBasedStorage>, track: Option<&str>) {
    let splits = store.best_splits();
    let tracks = splits
        .keys()
        .filter(|name| track.is_none_or(|track| *name == track))
        .sorted_by(|a, b| compare_names(a, b))
        .collect_vec();
    if tracks.is_empty() {
        println!("No personal bests yet.");
        return;
    }

    for name in tracks {
        let bests = &splits[name];
        println!("{name}");
        for slot in LapSlot::ALL {
            match bests.get(slot) {
                Some(best) => println!(
                    "  {} {:>9}  {} · {}",
                    slot.label(),
                    display_time(&best.time),
                    best.character,
                    best.vehicle
                ),
                None => println!("  {} {:>9}", slot.label(), "—"),
            }
        }
        if let Some(sum) = bests.split_sum() {
            println!("  Split sum: {sum}");
        }
    }
    println!("{} total run{} logged", store.len(), plural(store.len()));
}

fn run(args: Args) -> Result<(), TrialSheetError> {
    let config = load_config();

    match args.command {
        Commands::Add {
            track,
            character,
            vehicle,
            lap1,
            lap2,
            finish,
        } => {
            let mut store = open_store(args.store, &config)?;
            let entry = TrialEntry {
                track,
                character,
                vehicle,
                lap1,
                lap2,
                finished_time: finish,
            };
            add(&mut store, entry)?;
        }
        Commands::Lap3 { lap1, lap2, finish } => {
            let entry = TrialEntry {
                lap1,
                lap2,
                finished_time: finish,
                ..Default::default()
            };
            let lap3 = entry.lap3().map(TimeValue::display);
            println!("Lap 3: {}", lap3.as_deref().unwrap_or("—"));
        }
        Commands::List { track } => {
            let store = open_store(args.store, &config)?;
            list(&store, track.as_deref());
        }
        Commands::Remove { id } => {
            let mut store = open_store(args.store, &config)?;
            if store.remove(id)? {
                println!("Removed run {id}");
            } else {
                println!("No run with id {id}");
            }
        }
        Commands::Bests { track } => {
            let store = open_store(args.store, &config)?;
            bests(&store, track.as_deref());
        }
        Commands::Export { format, output } => {
            let store = open_store(args.store, &config)?;
            let path = output.unwrap_or_else(|| PathBuf::from(config.export_file_name(format)));
            exchange::export_to_file(format, store.trials(), &path)?;
            println!(
                "Exported {} run{} to {}",
                store.len(),
                plural(store.len()),
                path.display()
            );
        }
        Commands::Import { input } => {
            let mut store = open_store(args.store, &config)?;
            let records = exchange::read_import_file(&input)?;
            let count = store.import(records, Local::now())?;
            println!("Imported {count} run{} from {}", plural(count), input.display());
        }
        Commands::Options { kind, query } => {
            for option in suggest(kind.options(), query.as_deref().unwrap_or_default()) {
                println!("{option}");
            }
        }
        Commands::Config { save } => {
            if save {
                let path = config.save()?;
                println!("Saved config to {}", path.display());
            }
            let shown = serde_json::to_string_pretty(&config)
                .map_err(|e| TrialSheetError::ConfigSerializeError { source: e })?;
            println!("{shown}");
            let store_path = match args.store {
                Some(path) => path,
                None => config.resolve_store_path()?,
            };
            println!("Trial store: {}", store_path.display());
        }
    }
    Ok(())
}

fn main() {
    #[cfg(debug_assertions)]
    colog::init();

    let cli = Args::parse();
    if let Err(e) = run(cli) {
        error!("{:?}", e);
        eprintln!("{e}");
        std::process::exit(1);
    }
}
