//! Errors surfaced by the analysis API.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// A correction named a column that is not part of the analysis.
    #[error("no mapping for source column '{source_field}'")]
    UnknownSourceField { source_field: String },

    /// A correction supplied a blank target name.
    #[error("target field for '{source_field}' cannot be empty")]
    EmptyTarget { source_field: String },

    /// A `source=target` override could not be parsed.
    #[error("invalid mapping override '{raw}': expected source=target")]
    InvalidOverride { raw: String },
}
