use serde::Serialize;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionProgress {
    pub index: usize,
    pub total: usize,
    pub answered: usize,
    /// `(index + 1) / total`, drives the progress bar.
    pub fraction: f64,
    pub is_first: bool,
    pub is_last: bool,
}
