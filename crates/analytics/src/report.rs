use chrono::NaiveDate;
use core_types::{CategoryId, ManufacturerId, StoreId};
use serde::{Deserialize, Serialize};

/// A store and the number of sale agreements that reference it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRanking {
    pub store_id: StoreId,
    pub agreement_count: usize,
}

/// Distinct manufacturers active in one half-open period `[period_start, period_end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorCountPoint {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub actor_count: usize,
}

/// A manufacturer's health score over one half-open period `[period_start, period_end)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthScorePoint {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub health_score: f64,
}

/// The scalar KPIs for one category, seen from one manufacturer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category_id: CategoryId,
    pub manufacturer_id: ManufacturerId,
    pub market_actors: usize,
    pub avg_products_per_manufacturer: f64,
    pub manufacturer_products: usize,
    pub manufacturer_share: f64,
    pub top_n_stores: usize,
    pub health_score: f64,
}
