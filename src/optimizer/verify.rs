use super::packing::EPS;
use crate::config::OptimizeParams;
use crate::demand::CutRequest;
use crate::error::{CpResult, CutPlanError};
use crate::plan::ProfilePlan;

/// Checks a finished plan against the request it was built from.
pub fn check_plan(req: &CutRequest, plan: &ProfilePlan, params: &OptimizeParams) -> CpResult<()> {
    let fail = |detail: String| -> CpResult<()> {
        Err(CutPlanError::Invariant {
            profile_id: plan.profile_id.clone(),
            detail,
        })
    };

    if plan.total_bars != plan.bars.len() {
        return fail(format!(
            "total_bars {} but {} bars emitted",
            plan.total_bars,
            plan.bars.len()
        ));
    }

    let kerf = params.bicak_payi;
    let usable = plan.stock_length_mm - plan.paint_margin_mm;

    for (pos, bar) in plan.bars.iter().enumerate() {
        if bar.index != pos + 1 {
            return fail(format!("bar at position {} numbered {}", pos + 1, bar.index));
        }
        if bar.cuts.is_empty() {
            return fail(format!("bar {} has no cuts", bar.index));
        }
        if bar.waste_mm < 0.0 {
            return fail(format!("bar {} has negative waste {}", bar.index, bar.waste_mm));
        }

        let overhead = params.kerf_convention.overhead(kerf, bar.cuts.len());
        let consumed = bar.used_mm() + overhead;
        // A piece at the bar end may go without its own kerf.
        let end_allowance = if params.kerf_convention.free_end() {
            kerf.min(consumed - usable).max(0.0)
        } else {
            0.0
        };
        if consumed - end_allowance > usable + EPS {
            return fail(format!(
                "bar {} consumes {} of {} usable mm",
                bar.index, consumed, usable
            ));
        }
        let expected_waste = usable - consumed + end_allowance;
        if (expected_waste - bar.waste_mm).abs() > 1e-3 {
            return fail(format!(
                "bar {} reports waste {} but accounting gives {}",
                bar.index, bar.waste_mm, expected_waste
            ));
        }
    }

    // Placed plus unplaced must be exactly the requested multiset.
    let mut requested = req.expand_sorted();
    let mut emitted: Vec<f64> = plan
        .bars
        .iter()
        .flat_map(|b| b.cuts.iter().copied())
        .chain(plan.unplaced.iter().copied())
        .collect();
    requested.sort_by(|a, b| b.total_cmp(a));
    emitted.sort_by(|a, b| b.total_cmp(a));
    if requested != emitted {
        return fail(format!(
            "requested {} pieces, plan accounts for {}",
            requested.len(),
            emitted.len()
        ));
    }

    Ok(())
}
