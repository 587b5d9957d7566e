use thiserror::Error;

use crate::drag::DragFunction;

/// Error taxonomy for a single solve request.
///
/// Every variant is local to one request; nothing here is fatal to the
/// process hosting the solver.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The request envelope could not be parsed or was missing fields.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// A drag family that needs a ballistic coefficient got a non-positive one.
    #[error("ballistic coefficient must be positive, got {0}")]
    DegenerateBallisticCoefficient(f64),

    /// A table-driven drag family was selected without its table.
    #[error("drag function {0:?} requires a custom table, none was supplied")]
    MissingDragTable(DragFunction),

    /// Bullet geometry that appears in a denominator was zero.
    #[error("bullet {field} must be positive, got {value}")]
    DegenerateBulletGeometry {
        field: &'static str,
        value: f64,
    },
}

impl From<serde_json::Error> for SolverError {
    fn from(err: serde_json::Error) -> Self {
        SolverError::MalformedRequest(err.to_string())
    }
}
