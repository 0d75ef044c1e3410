//! Flight statistics aggregation engine.
//!
//! Turns a year (or several years) of flight-leg rows into a structured
//! report: totals, monthly breakdown, load factor, punctuality, route and
//! airline rankings, concentration, volatility, seasonality and
//! year-over-year growth.
//!
//! ```no_run
//! use flight_stats::{CancelToken, EngineConfig, InMemoryLegs, LegFilter, StatsEngine};
//!
//! let source = InMemoryLegs::new(Vec::new());
//! let config = EngineConfig::default();
//! let engine = StatsEngine::new(&source, &config);
//! let report = engine
//!     .yearly_report(2024, &LegFilter::default(), &CancelToken::new())
//!     .unwrap();
//! assert_eq!(report.monthly_breakdown.len(), 12);
//! ```

pub mod compose;
pub mod config;
pub mod error;
pub mod loader;
pub mod monthly;
pub mod normalize;
pub mod output;
pub mod ranking;
pub mod ratios;
pub mod reports;
pub mod seasonality;
pub mod structure;
pub mod types;
pub mod util;
pub mod yoy;

#[cfg(test)]
mod testutil;

pub use compose::{compose_multi_year, CancelToken, InMemoryLegs, LegSource, StatsEngine};
pub use config::{Config, EngineConfig};
pub use error::{Result, StatsError};
pub use normalize::{normalize, normalize_row, NormalizeReport, RowRejection};
pub use reports::build_yearly_report;
pub use types::{FlightLegObservation, LegFilter, MultiYearReport, RawLegRow, YearlyReport};
