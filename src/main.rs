use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use cutplan::config::OptimizeParams;
use std::process;
use tracing::{error, info, warn, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a cutting plan for an order
    Optimize(cmd::optimize::OptimizeArgs),
    /// Write a synthetic order file
    Generate(cmd::generate::GenerateArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    // Logs go to stderr so stdout carries only the report tables.
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Optimize(args) => {
            let params = resolve_params(args, matches.subcommand_matches("optimize"));
            cmd::optimize::run(args, &params)
        }
        Commands::Generate(args) => cmd::generate::run(args),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}

/// Params file as the base, explicit CLI flags on top.
fn resolve_params(
    args: &cmd::optimize::OptimizeArgs,
    sub_matches: Option<&clap::ArgMatches>,
) -> OptimizeParams {
    let Some(path) = &args.params_file else {
        return args.params.clone();
    };

    info!("⚖️  Loading parameters from: {}", path);
    match OptimizeParams::load_from_file(path) {
        Ok(mut file_params) => {
            if let Some(m) = sub_matches {
                file_params.merge_from_cli(&args.params, m);
            }
            file_params
        }
        Err(e) => {
            warn!("⚠️  {}. Using command-line parameters.", e);
            args.params.clone()
        }
    }
}
