use super::parameters::ParameterError;
use super::period::{Period, PeriodUnit};

/// Failure while evaluating a variable. Rules never recover from these; they
/// are handed back to the caller unchanged.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EvaluationError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    #[error("{entity} '{id}' has no value for '{variable}' in {period}")]
    MissingInput {
        entity: &'static str,
        id: String,
        variable: &'static str,
        period: Period,
    },
    #[error("'{variable}' is defined by {expected}, cannot evaluate it for {actual}")]
    PeriodMismatch {
        variable: &'static str,
        expected: PeriodUnit,
        actual: Period,
    },
    #[error("'{variable}' for {period} does not fit in a decimal")]
    Overflow {
        variable: &'static str,
        period: Period,
    },
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
}
