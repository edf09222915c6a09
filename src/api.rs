use crate::config::OptimizeParams;
use crate::demand::{normalize_count, normalize_length};
use crate::error::CpResult;
use crate::optimizer;
use crate::order::Order;
use crate::plan::ProfilePlan;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Raw demand passed through untouched when no plan can be produced.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawDemandRow {
    pub profil_id: String,
    pub profil_isim: String,
    pub kesim_olcusu: f64,
    pub kesim_adedi: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "durum", rename_all = "camelCase")]
pub enum PlanOutcome {
    Optimized { plans: Vec<ProfilePlan> },
    Fallback { reason: String, rows: Vec<RawDemandRow> },
}

impl PlanOutcome {
    pub fn is_optimized(&self) -> bool {
        matches!(self, Self::Optimized { .. })
    }

    pub fn plans(&self) -> Option<&[ProfilePlan]> {
        match self {
            Self::Optimized { plans } => Some(plans),
            Self::Fallback { .. } => None,
        }
    }
}

/// Service: optimize, or degrade to the raw cut counts. Never fails.
pub fn optimize_or_fallback(order: &Order, params: &OptimizeParams) -> PlanOutcome {
    optimize_or_fallback_with(order, params, optimizer::optimize)
}

/// Same as [`optimize_or_fallback`] with the optimizer supplied by the caller.
pub fn optimize_or_fallback_with<F>(order: &Order, params: &OptimizeParams, run: F) -> PlanOutcome
where
    F: FnOnce(&Order, &OptimizeParams) -> CpResult<Vec<ProfilePlan>>,
{
    match run(order, params) {
        Ok(plans) => PlanOutcome::Optimized { plans },
        Err(e) => {
            error!("Optimization failed, falling back to raw counts: {}", e);
            PlanOutcome::Fallback {
                reason: e.to_string(),
                rows: raw_rows(order),
            }
        }
    }
}

/// One row per demand line, with the same clamping the optimizer applies.
pub fn raw_rows(order: &Order) -> Vec<RawDemandRow> {
    order
        .lines()
        .map(|line| RawDemandRow {
            profil_id: line.profil_id.clone().unwrap_or_default(),
            profil_isim: line.profil.profil_isim.clone().unwrap_or_default(),
            kesim_olcusu: normalize_length(line.hesaplanan_degerler.kesim_olcusu),
            kesim_adedi: normalize_count(line.hesaplanan_degerler.kesim_adedi),
        })
        .collect()
}

/// Service: JSON order in, JSON outcome out.
pub fn optimize_json(input: &str, params: &OptimizeParams) -> CpResult<String> {
    let order = Order::from_json_str(input)?;
    let outcome = optimize_or_fallback(&order, params);
    if let Some(plans) = outcome.plans() {
        info!("API: produced plans for {} profiles", plans.len());
    }
    Ok(serde_json::to_string_pretty(&outcome)?)
}
