pub mod exact;
pub mod packing;
pub mod verify;

use self::packing::{Packer, StockBar};
use crate::config::{OptimizeParams, Strategy};
use crate::demand::{self, CutRequest, MAX_PIECES_PER_PROFILE};
use crate::error::{CpResult, CutPlanError};
use crate::order::Order;
use crate::plan::ProfilePlan;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Builds a cutting plan for every profile in the order.
///
/// Malformed lengths and counts never raise; they simply contribute no
/// pieces, and oversized counts are capped. The only error is a broken
/// packing invariant, which signals a defect in this crate rather than bad input.
pub fn optimize(order: &Order, params: &OptimizeParams) -> CpResult<Vec<ProfilePlan>> {
    let (requests, report) = demand::aggregate_with_report(order);
    if report.lines_without_id > 0 || report.lines_zeroed > 0 || report.lines_clamped > 0 {
        info!(
            "Normalized {} demand lines ({} without id, {} without pieces, {} capped)",
            report.lines_seen, report.lines_without_id, report.lines_zeroed, report.lines_clamped
        );
    }
    optimize_requests(&requests, params)
}

/// Packs already aggregated requests. Requests over
/// [`MAX_PIECES_PER_PROFILE`] are rejected with a validation error.
pub fn optimize_requests(
    requests: &[CutRequest],
    params: &OptimizeParams,
) -> CpResult<Vec<ProfilePlan>> {
    let params = params.sanitized();
    if let Some(req) = requests
        .iter()
        .find(|r| r.piece_count() > MAX_PIECES_PER_PROFILE as usize)
    {
        return Err(CutPlanError::Validation(format!(
            "profile '{}' requests {} pieces, limit is {}",
            req.profile.id,
            req.piece_count(),
            MAX_PIECES_PER_PROFILE
        )));
    }
    let start = Instant::now();

    // Collecting into a Result keeps input order, so the plan matches a sequential run.
    let plans = requests
        .par_iter()
        .map(|req| plan_profile(req, &params))
        .collect::<CpResult<Vec<_>>>()?;

    info!(
        "Optimized {} profiles into {} bars in {:.1?}",
        plans.len(),
        plans.iter().map(|p| p.total_bars).sum::<usize>(),
        start.elapsed()
    );
    Ok(plans)
}

/// Packs a single aggregated profile and checks the result.
pub fn plan_profile(req: &CutRequest, params: &OptimizeParams) -> CpResult<ProfilePlan> {
    let kerf = params.bicak_payi;
    let paint_margin = if req.profile.painted {
        params.boya_payi
    } else {
        0.0
    };
    let usable = req.profile.stock_length_mm - paint_margin;
    let capacity = if usable > 0.0 {
        usable + params.kerf_convention.capacity_bonus(kerf)
    } else {
        0.0
    };
    let packer = Packer::new(capacity, kerf).with_free_end(params.kerf_convention.free_end());

    let (placeable, unplaced): (Vec<f64>, Vec<f64>) = req
        .expand_sorted()
        .into_iter()
        .partition(|&p| packer.can_hold(p));

    if !unplaced.is_empty() {
        warn!(
            "Profile {} ({}): {} piece(s) exceed usable length {:.1} mm: {:?}",
            req.profile.id,
            req.profile.name,
            unplaced.len(),
            usable.max(0.0),
            unplaced
        );
    }

    let bars = pack(&packer, &placeable, params);
    debug!(
        "Profile {}: {} pieces -> {} bars ({})",
        req.profile.id,
        placeable.len(),
        bars.len(),
        params.strategy
    );

    let plan = ProfilePlan {
        profile_id: req.profile.id.clone(),
        profile_name: req.profile.name.clone(),
        painted: req.profile.painted,
        stock_length_mm: req.profile.stock_length_mm,
        unit_weight_kg_m: req.profile.unit_weight_kg_m,
        paint_margin_mm: paint_margin,
        total_bars: bars.len(),
        bars: bars
            .into_iter()
            .enumerate()
            .map(|(i, bar)| bar.into_cut(i + 1))
            .collect(),
        unplaced,
    };

    if let Err(e) = verify::check_plan(req, &plan, params) {
        error!("{}", e);
        return Err(e);
    }
    Ok(plan)
}

fn pack(packer: &Packer, pieces: &[f64], params: &OptimizeParams) -> Vec<StockBar> {
    if pieces.is_empty() {
        return Vec::new();
    }

    match params.strategy {
        Strategy::FirstFitDecreasing => packer.first_fit(pieces),
        Strategy::BestFitDecreasing => packer.best_fit(pieces),
        Strategy::Auto => {
            let ffd = packer.first_fit(pieces);
            let bfd = packer.best_fit(pieces);
            let best = if bfd.len() < ffd.len() { bfd } else { ffd };

            if pieces.len() <= params.exact_piece_limit {
                if let Some(assignment) = exact::improve(packer, pieces, best.len()) {
                    return packer.from_assignment(pieces, &assignment);
                }
            }
            best
        }
    }
}
