mod acquisition;
mod catalog;
mod config;
mod conjunction;
mod elements;
mod fallback;
mod propagate;
mod web;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::Config;
use crate::conjunction::{format_probability, run_query, ConjunctionFilter, SortKey};
use crate::web::AppState;

#[derive(Parser)]
#[command(name = "orbit-watch")]
#[command(about = "Tracked-object element sets, positions and conjunction screening")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        #[arg(long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(long)]
        config: PathBuf,
    },
    /// Print the current position of every catalog object
    Positions {
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run the conjunction pipeline once and print the events
    Conjunctions {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = SortKey::Default)]
        sort: SortKey,
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(&config).await,
        Commands::Validate { config } => validate(&config),
        Commands::Positions { config } => positions(config.as_deref()).await,
        Commands::Conjunctions {
            config,
            sort,
            limit,
        } => conjunctions(config.as_deref(), sort, limit).await,
    }
}

fn load_config(path: Option<&Path>) -> Option<Config> {
    match Config::load(path) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Config error: {}", e);
            None
        }
    }
}

fn build_state(config: &Config) -> Option<AppState> {
    match AppState::from_config(config) {
        Ok(state) => Some(state),
        Err(e) => {
            eprintln!("Startup error: {}", e);
            None
        }
    }
}

async fn serve(path: &Path) -> ExitCode {
    let Some(config) = load_config(Some(path)) else {
        return ExitCode::FAILURE;
    };
    match web::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn validate(path: &Path) -> ExitCode {
    let Some(config) = load_config(Some(path)) else {
        return ExitCode::FAILURE;
    };

    println!("Configuration is valid");
    println!("  bind: {}", config.web.bind);
    match config.credentials() {
        Some(credentials) => println!(
            "  upstream: enabled ({} as {})",
            config.upstream.base_url, credentials.username
        ),
        None => println!("  upstream: disabled (no credentials)"),
    }
    println!(
        "  batches: {} per group, {:?} apart, {:?} timeout",
        config.acquisition.batch_size, config.acquisition.batch_delay, config.upstream.request_timeout
    );
    let tracked: Vec<String> = config
        .conjunctions
        .tracked
        .iter()
        .map(u32::to_string)
        .collect();
    println!("  conjunction feeds: {}", tracked.join(", "));
    ExitCode::SUCCESS
}

async fn positions(path: Option<&Path>) -> ExitCode {
    let Some(state) = load_config(path).as_ref().and_then(build_state) else {
        return ExitCode::FAILURE;
    };

    let now = chrono::Utc::now();
    let resolved = elements::resolve_catalog(&state.acquisition, &state.catalog, now).await;

    println!("Positions at {}", now.format("%Y-%m-%d %H:%M:%S UTC"));
    println!(
        "  {:<24} {:>6} {:>9} {:>10} {:>10} {:>7}  source",
        "name", "norad", "lat", "lon", "alt km", "km/s"
    );
    for r in &resolved {
        match propagate::propagate(&r.entry, now) {
            Some(state) => println!(
                "  {:<24} {:>6} {:>9.3} {:>10.3} {:>10.1} {:>7.3}  {}",
                state.name,
                state.norad_id,
                state.latitude_deg,
                state.longitude_deg,
                state.altitude_km,
                state.speed_km_s,
                r.source
            ),
            None => println!("  {:<24} {:>6}  no state", r.entry.name, r.entry.norad_id),
        }
    }
    ExitCode::SUCCESS
}

async fn conjunctions(path: Option<&Path>, sort: SortKey, limit: Option<usize>) -> ExitCode {
    let Some(state) = load_config(path).as_ref().and_then(build_state) else {
        return ExitCode::FAILURE;
    };

    let now = chrono::Utc::now();
    let resolved = state.conjunctions.events(now).await;
    let (events, total) = run_query(&resolved.value, &ConjunctionFilter::default(), sort, limit, now);

    println!(
        "{} conjunctions from {} (showing {})",
        total,
        resolved.source,
        events.len()
    );
    for event in &events {
        println!(
            "  {:<18} {:<6} {} {} / {}  {:.3} km  {}  {:.1} km/s",
            event.id,
            event.risk_level.to_string(),
            event.tca.format("%Y-%m-%d %H:%M"),
            event.satellite1,
            event.satellite2,
            event.min_range_km,
            format_probability(event.probability),
            event.relative_velocity_km_s
        );
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conjunctions_sort_flag_accepts_camel_case_keys() {
        let cli = Cli::try_parse_from(["orbit-watch", "conjunctions", "--sort", "minRange"]).unwrap();
        match cli.command {
            Commands::Conjunctions { sort, .. } => assert_eq!(sort, SortKey::MinRange),
            _ => panic!("wrong subcommand"),
        }

        let cli = Cli::try_parse_from(["orbit-watch", "conjunctions"]).unwrap();
        match cli.command {
            Commands::Conjunctions { sort, limit, .. } => {
                assert_eq!(sort, SortKey::Default);
                assert_eq!(limit, None);
            }
            _ => panic!("wrong subcommand"),
        }

        assert!(Cli::try_parse_from(["orbit-watch", "conjunctions", "--sort", "sideways"]).is_err());
    }
}
