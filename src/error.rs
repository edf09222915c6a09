use thiserror::Error;

#[derive(Error, Debug)]
pub enum CutPlanError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    /// A packing result broke one of its own invariants. Never caused by user data.
    #[error("Packing invariant violated for profile '{profile_id}': {detail}")]
    Invariant { profile_id: String, detail: String },
}

impl CutPlanError {
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::Invariant { .. })
    }
}

pub type CpResult<T> = Result<T, CutPlanError>;
