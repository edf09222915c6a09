//! Structured cutting plan returned by the optimizer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One stock bar of the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarCut {
    /// 1-based bar number within the profile.
    #[serde(rename = "boyNo")]
    pub index: usize,
    /// Piece lengths in the order they are cut.
    #[serde(rename = "kesimler")]
    pub cuts: Vec<f64>,
    /// Usable length left after the cuts and their kerf.
    #[serde(rename = "fire")]
    pub waste_mm: f64,
}

impl BarCut {
    pub fn used_mm(&self) -> f64 {
        self.cuts.iter().sum()
    }

    /// Physical leftover including the paint margin reserved on the bar.
    pub fn offcut_mm(&self, paint_margin: f64) -> f64 {
        self.waste_mm + paint_margin
    }
}

/// Legacy display line: `Boy 1: Kesimler -> 2000+2000+1500 | Fire: 491 mm`.
impl fmt::Display for BarCut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cuts: Vec<String> = self.cuts.iter().map(|c| fmt_mm(*c)).collect();
        write!(
            f,
            "Boy {}: Kesimler -> {} | Fire: {} mm",
            self.index,
            cuts.join("+"),
            fmt_mm(self.waste_mm)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilePlan {
    #[serde(rename = "profilId")]
    pub profile_id: String,
    #[serde(rename = "profilIsim")]
    pub profile_name: String,
    #[serde(rename = "boyali")]
    pub painted: bool,
    #[serde(rename = "boyUzunluk")]
    pub stock_length_mm: f64,
    #[serde(rename = "birimAgirlik")]
    pub unit_weight_kg_m: f64,
    /// Paint margin actually reserved per bar (0 for unpainted profiles).
    #[serde(rename = "boyaPayi")]
    pub paint_margin_mm: f64,
    #[serde(rename = "toplamBoySayisi")]
    pub total_bars: usize,
    #[serde(rename = "boyKesimler")]
    pub bars: Vec<BarCut>,
    /// Pieces longer than a fresh bar can hold.
    #[serde(rename = "yerlesmeyenler", default, skip_serializing_if = "Vec::is_empty")]
    pub unplaced: Vec<f64>,
}

impl ProfilePlan {
    pub fn placed_pieces(&self) -> usize {
        self.bars.iter().map(|b| b.cuts.len()).sum()
    }

    pub fn requested_pieces(&self) -> usize {
        self.placed_pieces() + self.unplaced.len()
    }

    pub fn total_waste_mm(&self) -> f64 {
        self.bars.iter().map(|b| b.waste_mm).sum()
    }

    pub fn used_mm(&self) -> f64 {
        self.bars.iter().map(BarCut::used_mm).sum()
    }

    /// Share of purchased stock that ends up in pieces, in percent.
    pub fn efficiency_pct(&self) -> f64 {
        let stock = self.stock_length_mm * self.total_bars as f64;
        if stock > 0.0 {
            self.used_mm() / stock * 100.0
        } else {
            0.0
        }
    }

    /// Weight of the purchased bars in kg.
    pub fn stock_weight_kg(&self) -> f64 {
        self.unit_weight_kg_m * (self.stock_length_mm / 1000.0) * self.total_bars as f64
    }

    /// Legacy `boyKesimler` strings, for callers that still print them verbatim.
    pub fn bar_lines(&self) -> Vec<String> {
        self.bars.iter().map(|b| b.to_string()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub profiles: usize,
    pub bars: usize,
    pub pieces: usize,
    pub unplaced: usize,
    pub waste_mm: f64,
    pub stock_weight_kg: f64,
}

impl PlanSummary {
    pub fn from_plans(plans: &[ProfilePlan]) -> Self {
        plans.iter().fold(Self::default(), |mut acc, p| {
            acc.profiles += 1;
            acc.bars += p.total_bars;
            acc.pieces += p.placed_pieces();
            acc.unplaced += p.unplaced.len();
            acc.waste_mm += p.total_waste_mm();
            acc.stock_weight_kg += p.stock_weight_kg();
            acc
        })
    }
}

/// Millimetres without trailing zeros: `1500`, `1234.5`, `99.25`.
pub fn fmt_mm(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        let s = format!("{:.2}", rounded);
        s.trim_end_matches('0').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_line_format() {
        let bar = BarCut {
            index: 1,
            cuts: vec![2000.0, 2000.0, 1500.0],
            waste_mm: 491.0,
        };
        assert_eq!(
            bar.to_string(),
            "Boy 1: Kesimler -> 2000+2000+1500 | Fire: 491 mm"
        );
    }

    #[test]
    fn fmt_mm_trims() {
        assert_eq!(fmt_mm(1500.0), "1500");
        assert_eq!(fmt_mm(1234.5), "1234.5");
        assert_eq!(fmt_mm(99.254), "99.25");
        assert_eq!(fmt_mm(0.0), "0");
    }
}
