use clap::Args;
use cutplan::error::CpResult;
use cutplan::synthetic::OrderGenerator;
use std::fs;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(short, long, default_value_t = 5)]
    pub profiles: usize,

    /// Demand lines per profile
    #[arg(short, long, default_value_t = 6)]
    pub lines: usize,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub out: String,
}

pub fn run(args: &GenerateArgs) -> CpResult<()> {
    let mut generator = match args.seed {
        Some(s) => OrderGenerator::with_seed(s),
        None => OrderGenerator::new(),
    };

    let order = generator.order(args.profiles, args.lines);
    fs::write(&args.out, serde_json::to_string_pretty(&order)?)?;
    info!(
        "🧪 Wrote {} profiles x {} lines to {}",
        args.profiles, args.lines, args.out
    );
    Ok(())
}
