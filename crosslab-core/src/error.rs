//! Engine error taxonomy.

use thiserror::Error;

/// Failures raised by the conditioner and simulator.
///
/// An empty conditioned series is not an error: the engine reports it as a
/// degenerate summary instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Invalid parameter relationship (window order, negative cost, capital).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A required input column is absent.
    #[error("missing column: no usable '{0}' field in input")]
    MissingColumn(String),

    /// A non-positive or non-finite price reached the simulator.
    #[error("invalid price {price} at bar {bar_index}")]
    InvalidPrice { bar_index: usize, price: f64 },
}
