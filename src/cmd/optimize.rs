use crate::reports;
use clap::Args;
use cutplan::api::{self, PlanOutcome};
use cutplan::config::OptimizeParams;
use cutplan::error::CpResult;
use cutplan::order::Order;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub params: OptimizeParams,

    /// Order document (JSON, or CSV with --csv / a .csv extension)
    #[arg(short, long)]
    pub order: String,

    #[arg(long, default_value_t = false)]
    pub csv: bool,

    /// JSON file with optimizer parameters; explicit flags still win
    #[arg(long = "params")]
    pub params_file: Option<String>,

    /// Write the outcome as JSON
    #[arg(long)]
    pub json: Option<String>,

    /// Write one CSV row per bar
    #[arg(long)]
    pub export_csv: Option<String>,

    /// Print the `Boy N: Kesimler -> ... | Fire: ... mm` lines
    #[arg(long, default_value_t = false)]
    pub legacy: bool,
}

pub fn load_order(args: &OptimizeArgs) -> CpResult<Order> {
    let is_csv = args.csv
        || Path::new(&args.order)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    info!("📂 Loading order: {}", args.order);
    if is_csv {
        Order::load_csv(&args.order)
    } else {
        Order::load_from_file(&args.order)
    }
}

pub fn run(args: &OptimizeArgs, params: &OptimizeParams) -> CpResult<()> {
    let order = load_order(args)?;
    info!(
        "⚙️  Kerf {} mm ({}), paint margin {} mm, strategy {}",
        params.bicak_payi, params.kerf_convention, params.boya_payi, params.strategy
    );

    let outcome = api::optimize_or_fallback(&order, params);

    match &outcome {
        PlanOutcome::Optimized { plans } => {
            for plan in plans {
                if args.legacy {
                    reports::print_legacy_lines(plan);
                } else {
                    reports::print_profile_plan(plan);
                }
            }
            reports::print_summary(plans);

            if let Some(path) = &args.export_csv {
                reports::write_plan_csv(plans, path)?;
                info!("💾 Cutting plan CSV written to {}", path);
            }
        }
        PlanOutcome::Fallback { reason, rows } => reports::print_fallback(reason, rows),
    }

    if let Some(path) = &args.json {
        fs::write(path, serde_json::to_string_pretty(&outcome)?)?;
        info!("💾 Outcome JSON written to {}", path);
    }

    Ok(())
}
