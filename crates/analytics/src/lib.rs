//! # Market Health Analytics Engine
//!
//! This crate computes the market-health KPIs of a consumer-products market from two
//! append-only logs: product listings and sale agreements.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` (Layer 0).
//! - **Stateless Queries:** Apart from `set_tables`, every `KpiEngine` method is a pure
//!   function of the loaded tables and its arguments. Tables are shared snapshots; nothing
//!   here mutates them.
//!
//! ## Public API
//!
//! - `KpiEngine`: Holds the two tables and answers every KPI query.
//! - `with_date_column`: Derives the `date`/`month` column from the raw `date_id` column.
//! - `period_boundaries` / `period_windows`: Calendar splitting used by the time-series KPIs.
//! - `StoreRanking`, `ActorCountPoint`, `HealthScorePoint`, `CategorySummary`: Result records.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod dates;
pub mod engine;
pub mod error;
pub mod periods;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use dates::{with_date_column, DateParseError, DateStrategy, DEFAULT_POLICY};
pub use engine::KpiEngine;
pub use error::AnalyticsError;
pub use periods::{period_boundaries, period_windows};
pub use report::{ActorCountPoint, CategorySummary, HealthScorePoint, StoreRanking};
