//! Domain types shared by the conditioner, simulator and statistics.

pub mod bar;
pub mod fill;
pub mod signal;
pub mod summary;
pub mod value;

pub use bar::{ConditionedBar, ConditionedSeries, EquityPoint};
pub use fill::{Fill, FillSide};
pub use signal::Signal;
pub use summary::BacktestSummary;
pub use value::{RawRow, RawValue};
