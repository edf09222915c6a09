pub mod api;
pub mod config;
pub mod demand;
pub mod error;
pub mod optimizer;
pub mod order;
pub mod plan;
pub mod synthetic;
// cmd and reports belong to the binary (main.rs).

pub use config::{KerfConvention, OptimizeParams, Strategy};
pub use error::{CpResult, CutPlanError};
pub use optimizer::optimize;
pub use order::Order;
pub use plan::{BarCut, PlanSummary, ProfilePlan};
