use crate::error::{CpResult, CutPlanError};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum_macros::{Display, EnumIter, EnumString};

/// How the blade kerf is charged against a bar.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, EnumString, Display, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum KerfConvention {
    /// Every placed piece consumes one kerf.
    #[default]
    PerCut,
    /// Only the boundaries between neighbouring pieces consume a kerf (n - 1 per bar).
    BetweenCuts,
}

impl KerfConvention {
    /// Extra capacity granted to a bar so that per-cut packing reproduces this convention.
    #[inline]
    pub fn capacity_bonus(self, kerf: f64) -> f64 {
        match self {
            Self::PerCut => 0.0,
            Self::BetweenCuts => kerf,
        }
    }

    /// Whether the last piece on a bar may run to its end without a kerf.
    /// Between-cuts already leaves the last piece uncharged.
    #[inline]
    pub fn free_end(self) -> bool {
        matches!(self, Self::PerCut)
    }

    /// Total kerf overhead for `cuts` pieces on one bar.
    #[inline]
    pub fn overhead(self, kerf: f64, cuts: usize) -> f64 {
        match self {
            Self::PerCut => kerf * cuts as f64,
            Self::BetweenCuts => kerf * cuts.saturating_sub(1) as f64,
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, EnumString, Display, Serialize,
    Deserialize,
)]
pub enum Strategy {
    /// First-fit decreasing.
    #[default]
    #[strum(serialize = "ffd")]
    #[serde(rename = "ffd")]
    FirstFitDecreasing,
    /// Best-fit decreasing.
    #[strum(serialize = "bfd")]
    #[serde(rename = "bfd")]
    BestFitDecreasing,
    /// Both heuristics, then branch-and-bound on small profiles.
    #[strum(serialize = "auto")]
    #[serde(rename = "auto")]
    Auto,
}

pub const DEFAULT_EXACT_PIECE_LIMIT: usize = 20;

/// Optimizer parameters. Field names follow the legacy `{ bicak_payi, boya_payi }` object.
#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeParams {
    /// Blade kerf in mm
    #[arg(long, visible_alias = "kerf", default_value_t = 0.0)]
    #[serde(alias = "kerf")]
    pub bicak_payi: f64,

    /// Paint margin in mm, reserved once per bar of a painted profile
    #[arg(long, visible_alias = "paint-margin", default_value_t = 0.0)]
    #[serde(alias = "paint_margin")]
    pub boya_payi: f64,

    #[arg(long, default_value_t = KerfConvention::PerCut)]
    pub kerf_convention: KerfConvention,

    #[arg(long, default_value_t = Strategy::FirstFitDecreasing)]
    pub strategy: Strategy,

    /// Largest piece count per profile for which `auto` runs the exact search
    #[arg(long, default_value_t = DEFAULT_EXACT_PIECE_LIMIT)]
    pub exact_piece_limit: usize,
}

impl Default for OptimizeParams {
    fn default() -> Self {
        Self {
            bicak_payi: 0.0,
            boya_payi: 0.0,
            kerf_convention: KerfConvention::PerCut,
            strategy: Strategy::FirstFitDecreasing,
            exact_piece_limit: DEFAULT_EXACT_PIECE_LIMIT,
        }
    }
}

impl OptimizeParams {
    pub fn with_kerf(mut self, kerf: f64) -> Self {
        self.bicak_payi = kerf;
        self
    }

    pub fn with_paint_margin(mut self, margin: f64) -> Self {
        self.boya_payi = margin;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_kerf_convention(mut self, convention: KerfConvention) -> Self {
        self.kerf_convention = convention;
        self
    }

    /// Negative or non-finite allowances are treated as zero.
    pub fn sanitized(&self) -> Self {
        Self {
            bicak_payi: clamp_mm(self.bicak_payi),
            boya_payi: clamp_mm(self.boya_payi),
            ..self.clone()
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> CpResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CutPlanError::Config(format!(
                "Failed to read params file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Copies over only the values the user typed on the command line.
    pub fn merge_from_cli(&mut self, cli_params: &OptimizeParams, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli_params.$field.clone();
                }
            };
        }

        update_if_present!(bicak_payi, "bicak_payi");
        update_if_present!(boya_payi, "boya_payi");
        update_if_present!(kerf_convention, "kerf_convention");
        update_if_present!(strategy, "strategy");
        update_if_present!(exact_piece_limit, "exact_piece_limit");
    }
}

#[inline]
pub(crate) fn clamp_mm(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}
