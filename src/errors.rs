//! Error types for the crate.
//!
//! Every fallible operation returns [`Error`]. Configuration problems
//! (bad modulus, singular curve, ...) are reported when a field or curve is
//! built; the remaining kinds surface from arithmetic and pairing queries.

use thiserror::Error;

/// Errors produced by the field, curve, group and pairing layers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("field mismatch: expected element of {expected}, got element of {found}")]
    FieldMismatch { expected: String, found: String },
    #[error("{0} is not invertible")]
    NotInvertible(String),
    #[error("point {point} is not on the curve {curve}")]
    PointNotOnCurve { point: String, curve: String },
    #[error("distortion map requires y^2 = x^3 + 1, got a = {a}, b = {b}")]
    InvalidCurveForDistortion { a: String, b: String },
    #[error("pairing evaluation hit a zero or a pole")]
    DegeneratePairingEvaluation,
    #[error("no divisor of the group order {group_order} annihilates {element}")]
    OrderNotFound { element: String, group_order: usize },
    #[error("no point of order {order} found on {curve}")]
    PointOfRequiredOrderNotFound { order: u64, curve: String },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
