//! PCOS Risk Core - Command line entry point
//!
//! Thin adapter over `RiskOrchestrator`: reads a request, prints JSON.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use pcos_risk_core::constants::{APP_NAME, APP_VERSION};
use pcos_risk_core::{EngineConfig, RiskOrchestrator};

#[derive(Parser, Debug)]
#[command(name = "pcos-risk", version, about = "PCOS risk assessment from the command line")]
struct Cli {
    /// Model directory (overrides RISK_MODEL_DIR)
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assess one request (JSON object of measurements)
    Assess {
        /// Request file; stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Print the loaded model summary
    ModelInfo,
    /// Print engine status
    Status,
}

fn read_request(input: Option<&PathBuf>) -> io::Result<String> {
    match input {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut body = String::new();
            io::stdin().read_to_string(&mut body)?;
            Ok(body)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> bool {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            true
        }
        Err(e) => {
            log::error!("Cannot render output: {}", e);
            false
        }
    }
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    log::info!("Starting {} v{}", APP_NAME, APP_VERSION);

    let mut config = EngineConfig::from_env();
    if let Some(dir) = cli.model_dir {
        config = config.with_model_dir(dir);
    }
    let orchestrator = RiskOrchestrator::from_config(config);

    let ok = match cli.command {
        Command::Assess { input } => match read_request(input.as_ref()) {
            Ok(body) => {
                let response = orchestrator.assess_json(&body);
                print_json(&response) && response.success
            }
            Err(e) => {
                log::error!("Cannot read request: {}", e);
                false
            }
        },
        Command::ModelInfo => print_json(&orchestrator.model_info()),
        Command::Status => print_json(&orchestrator.status()),
    };

    if !ok {
        process::exit(1);
    }
}
