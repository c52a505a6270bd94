//! Kirchhoff - circuit analysis for the physics virtual lab.
//!
//! # Usage
//!
//! ```bash
//! kirchhoff solve series "voltage=12 R1=10 R2=20"
//! kirchhoff solve complex "V1=12 V2=6 R1=10 R2=20 R3=30" --record --user 7
//! kirchhoff history --user 7 --json
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use kirchhoff_lab::{
    error::Result, Experiment, JsonFileHistory, KirchhoffLab, LabConfig, ParameterSet, Topology,
    UserId, DEFAULT_HISTORY_FILE,
};
use tracing::Level;

/// Kirchhoff circuit analysis engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Experiment log file
    #[arg(long, env = "KIRCHHOFF_HISTORY", default_value = DEFAULT_HISTORY_FILE, global = true)]
    history: PathBuf,

    /// Absolute tolerance for law checks
    #[arg(long, default_value_t = kirchhoff_lab::verify::DEFAULT_TOLERANCE, global = true)]
    tolerance: f64,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve a circuit and check it against Kirchhoff's laws
    Solve {
        /// Circuit topology: series, parallel or complex
        topology: Topology,

        /// Component values, e.g. "voltage=12 R1=10 R2=4.7k"
        params: ParameterSet,

        /// Append the experiment to the history log
        #[arg(long, requires = "user")]
        record: bool,

        /// Owner of the recorded experiment
        #[arg(long, requires = "record")]
        user: Option<UserId>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List a user's experiments, most recent first
    History {
        /// User whose experiments to list
        #[arg(long)]
        user: UserId,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = LabConfig::new().with_tolerance(args.tolerance);
    let lab = KirchhoffLab::with_config(JsonFileHistory::new(&args.history), config);

    match args.command {
        Command::Solve {
            topology,
            params,
            record,
            user,
            json,
        } => {
            let results = lab.solve(topology, &params)?;
            let report = lab.verify(topology, &params, &results)?;

            if json {
                let value = serde_json::json!({
                    "topology": topology,
                    "parameters": &params,
                    "results": &results,
                    "verification": &report,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{topology} circuit ({params})");
                println!("{results}");
                println!("{report}");
            }

            if let Some(user_id) = user.filter(|_| record) {
                let experiment = lab.record_experiment(user_id, topology, params, results, report)?;
                eprintln!(
                    "recorded experiment #{} in {}",
                    experiment.id,
                    args.history.display()
                );
            }
        }
        Command::History { user, json } => {
            let experiments = lab.history(user)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&experiments)?);
            } else if experiments.is_empty() {
                println!("no experiments for user {user}");
            } else {
                for experiment in &experiments {
                    print_experiment(experiment);
                }
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn print_experiment(experiment: &Experiment) {
    let status = if experiment.verification.all_satisfied() {
        "laws hold"
    } else {
        "LAW CHECK FAILED"
    };
    println!(
        "#{} {} {} ({}) - {}",
        experiment.id,
        experiment.created_at.to_rfc3339(),
        experiment.topology,
        experiment.parameters,
        status
    );
}
