use crate::dates::with_date_column;
use crate::error::AnalyticsError;
use crate::periods::period_windows;
use crate::report::{ActorCountPoint, CategorySummary, HealthScorePoint, StoreRanking};
use chrono::NaiveDate;
use core_types::{
    CategoryId, DateRange, Frequency, ManufacturerId, ProductId, ProductRecord, SaleRecord, Season,
    StoreId, Table,
};
use itertools::Itertools;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Computes market-health KPIs over a product log and a sale agreement log.
///
/// The engine holds shared snapshots of the two tables and never mutates them.
/// Every query is a pure function of the current tables and its arguments; the
/// only mutation is [`KpiEngine::set_tables`], which takes `&mut self`. Callers
/// that share an engine across threads wrap it in a lock and treat
/// `set_tables` as the write side.
#[derive(Debug, Default, Clone)]
pub struct KpiEngine {
    products: Option<Table<ProductRecord>>,
    sales: Option<Table<SaleRecord>>,
    categories: Vec<CategoryId>,
    manufacturers: Vec<ManufacturerId>,
    stores: Vec<StoreId>,
}

impl KpiEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(products: Table<ProductRecord>, sales: Table<SaleRecord>) -> Self {
        let mut engine = Self::new();
        engine.set_tables(products, sales);
        engine
    }

    /// Replaces both tables at once and recomputes the distinct id lists.
    ///
    /// Categories and manufacturers come from the product table, or from the
    /// sale table when there are no products. Stores always come from sales.
    pub fn set_tables(&mut self, products: Table<ProductRecord>, sales: Table<SaleRecord>) {
        if products.is_empty() {
            self.categories = distinct(sales.rows(), |s| s.cat_id);
            self.manufacturers = distinct(sales.rows(), |s| s.fab_id);
        } else {
            self.categories = distinct(products.rows(), |p| p.cat_id);
            self.manufacturers = distinct(products.rows(), |p| p.fab_id);
        }
        self.stores = distinct(sales.rows(), |s| s.mag_id);

        tracing::info!(
            products = products.len(),
            sales = sales.len(),
            categories = self.categories.len(),
            manufacturers = self.manufacturers.len(),
            stores = self.stores.len(),
            "KPI tables replaced."
        );

        self.products = Some(products);
        self.sales = Some(sales);
    }

    pub fn products(&self) -> Result<&Table<ProductRecord>, AnalyticsError> {
        self.products.as_ref().ok_or(AnalyticsError::ProductDataNotConfigured)
    }

    pub fn sales(&self) -> Result<&Table<SaleRecord>, AnalyticsError> {
        self.sales.as_ref().ok_or(AnalyticsError::SaleDataNotConfigured)
    }

    /// Sorted distinct categories as of the last `set_tables`.
    pub fn categories(&self) -> &[CategoryId] {
        &self.categories
    }

    /// Sorted distinct manufacturers as of the last `set_tables`.
    pub fn manufacturers(&self) -> &[ManufacturerId] {
        &self.manufacturers
    }

    /// Sorted distinct stores as of the last `set_tables`.
    pub fn stores(&self) -> &[StoreId] {
        &self.stores
    }

    /// Number of distinct manufacturers listing products in `category_id`.
    pub fn count_market_actors_by_category(&self, category_id: CategoryId) -> Result<usize, AnalyticsError> {
        let actors = self
            .products()?
            .rows()
            .iter()
            .filter(|p| p.cat_id == category_id)
            .map(|p| p.fab_id)
            .unique()
            .count();
        tracing::debug!(category_id, actors, "Counted market actors.");
        Ok(actors)
    }

    /// Mean number of product rows per manufacturer in `category_id`.
    ///
    /// Rows are counted as listed, so a product listed twice counts twice.
    pub fn avg_products_per_manufacturer_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<f64, AnalyticsError> {
        let rows = self.products()?.rows().iter().filter(|p| p.cat_id == category_id);
        Ok(mean_rows_per_manufacturer(rows))
    }

    /// The `n` stores referenced by the most sale agreements, most referenced first.
    ///
    /// Stores with equal counts are ordered by ascending store id.
    pub fn top_stores(&self, n: usize) -> Result<Vec<StoreRanking>, AnalyticsError> {
        Ok(rank_stores(self.sales()?.rows(), n))
    }

    /// Average share of the manufacturer's products in the category assortment
    /// of each of the top `top_n_stores` stores.
    ///
    /// A top store where the manufacturer sells nothing in the category scores 0
    /// and still counts toward the average. The result is within `[0.0, 1.0]`.
    pub fn manufacturer_health_score(
        &self,
        manufacturer_id: ManufacturerId,
        category_id: CategoryId,
        top_n_stores: usize,
    ) -> Result<f64, AnalyticsError> {
        let score = health_score(self.sales()?.rows(), manufacturer_id, category_id, top_n_stores);
        tracing::debug!(manufacturer_id, category_id, top_n_stores, score, "Computed health score.");
        Ok(score)
    }

    /// Distinct manufacturers in `category_id` for every period between `start` and `end`.
    ///
    /// Products are first restricted to `[start, end]`; each returned point then
    /// counts the rows dated inside its half-open period. Returns an empty list
    /// when the range holds fewer than two period boundaries.
    #[tracing::instrument(skip(self))]
    pub fn market_actors_over_time(
        &self,
        category_id: CategoryId,
        start: NaiveDate,
        end: NaiveDate,
        freq: Frequency,
    ) -> Result<Vec<ActorCountPoint>, AnalyticsError> {
        let products = with_date_column(self.products()?);
        if !products.has_date_column() {
            tracing::warn!("Product table has no usable date column; every period will be empty.");
        }

        let range = DateRange::new(start, end);
        let in_category: Vec<(NaiveDate, ManufacturerId)> = products
            .iter_dated()
            .filter(|(product, _)| product.cat_id == category_id)
            .filter_map(|(product, date)| {
                date.filter(|d| range.contains(*d)).map(|d| (d, product.fab_id))
            })
            .collect();

        let points = period_windows(start, end, freq)
            .into_iter()
            .map(|(period_start, period_end)| {
                let window = period_start..period_end;
                let actor_count = in_category
                    .iter()
                    .filter(|(date, _)| window.contains(date))
                    .map(|(_, manufacturer)| manufacturer)
                    .unique()
                    .count();
                ActorCountPoint {
                    period_start,
                    period_end,
                    actor_count,
                }
            })
            .collect();
        Ok(points)
    }

    /// The health score recomputed for every period between `start` and `end`,
    /// using only the sale agreements dated inside each period.
    ///
    /// Top stores are ranked over all categories within the period, the same way
    /// [`Self::manufacturer_health_score`] ranks them over the whole sale table.
    #[tracing::instrument(skip(self))]
    pub fn manufacturer_health_score_over_time(
        &self,
        manufacturer_id: ManufacturerId,
        category_id: CategoryId,
        start: NaiveDate,
        end: NaiveDate,
        top_n_stores: usize,
        freq: Frequency,
    ) -> Result<Vec<HealthScorePoint>, AnalyticsError> {
        let sales = with_date_column(self.sales()?);
        if !sales.has_date_column() {
            tracing::warn!("Sale table has no usable date column; every period will score 0.");
        }

        let dated: Vec<(NaiveDate, &SaleRecord)> = sales
            .iter_dated()
            .filter_map(|(sale, date)| date.map(|d| (d, sale)))
            .collect();

        let points = period_windows(start, end, freq)
            .into_iter()
            .map(|(period_start, period_end)| {
                let window = period_start..period_end;
                let in_period = dated
                    .iter()
                    .filter(|(date, _)| window.contains(date))
                    .map(|(_, sale)| *sale);
                HealthScorePoint {
                    period_start,
                    period_end,
                    health_score: health_score(in_period, manufacturer_id, category_id, top_n_stores),
                }
            })
            .collect();
        Ok(points)
    }

    /// Share of the category's distinct products that belong to the manufacturer.
    pub fn manufacturer_share_in_category(
        &self,
        manufacturer_id: ManufacturerId,
        category_id: CategoryId,
    ) -> Result<f64, AnalyticsError> {
        let in_category = self
            .products()?
            .rows()
            .iter()
            .filter(|p| p.cat_id == category_id);
        let total = in_category.clone().map(|p| p.prod_id).unique().count();
        if total == 0 {
            return Ok(0.0);
        }
        let own = in_category
            .filter(|p| p.fab_id == manufacturer_id)
            .map(|p| p.prod_id)
            .unique()
            .count();
        Ok(own as f64 / total as f64)
    }

    /// Distinct products the manufacturer lists in the category.
    pub fn manufacturer_products_in_category(
        &self,
        manufacturer_id: ManufacturerId,
        category_id: CategoryId,
    ) -> Result<usize, AnalyticsError> {
        Ok(self
            .products()?
            .rows()
            .iter()
            .filter(|p| p.cat_id == category_id && p.fab_id == manufacturer_id)
            .map(|p| p.prod_id)
            .unique()
            .count())
    }

    pub fn discount_period(&self, season: Season, year: i32) -> Result<DateRange, AnalyticsError> {
        Ok(season.discount_period(year)?)
    }

    /// [`Self::avg_products_per_manufacturer_by_category`] restricted to products
    /// dated inside the season's discount period.
    pub fn avg_products_in_discount_period(
        &self,
        category_id: CategoryId,
        season: Season,
        year: i32,
    ) -> Result<f64, AnalyticsError> {
        let window = season.discount_period(year)?;
        let products = with_date_column(self.products()?);
        if !products.has_date_column() {
            tracing::warn!(%season, year, "Product table has no usable date column.");
        }
        let rows = products
            .iter_dated()
            .filter(|(p, date)| p.cat_id == category_id && date.is_some_and(|d| window.contains(d)))
            .map(|(p, _)| p);
        Ok(mean_rows_per_manufacturer(rows))
    }

    /// [`Self::top_stores`] over the sale agreements dated inside the season's
    /// discount period, optionally limited to one category.
    pub fn top_stores_in_discount_period(
        &self,
        category_id: Option<CategoryId>,
        n: usize,
        season: Season,
        year: i32,
    ) -> Result<Vec<StoreRanking>, AnalyticsError> {
        let window = season.discount_period(year)?;
        let sales = with_date_column(self.sales()?);
        if !sales.has_date_column() {
            tracing::warn!(%season, year, "Sale table has no usable date column.");
        }
        let rows = sales
            .iter_dated()
            .filter(|(s, date)| {
                category_id.is_none_or(|c| s.cat_id == c) && date.is_some_and(|d| window.contains(d))
            })
            .map(|(s, _)| s);
        Ok(rank_stores(rows, n))
    }

    /// Collects the scalar KPIs for one category and manufacturer.
    pub fn summary(
        &self,
        category_id: CategoryId,
        manufacturer_id: ManufacturerId,
        top_n_stores: usize,
    ) -> Result<CategorySummary, AnalyticsError> {
        Ok(CategorySummary {
            category_id,
            manufacturer_id,
            market_actors: self.count_market_actors_by_category(category_id)?,
            avg_products_per_manufacturer: self.avg_products_per_manufacturer_by_category(category_id)?,
            manufacturer_products: self.manufacturer_products_in_category(manufacturer_id, category_id)?,
            manufacturer_share: self.manufacturer_share_in_category(manufacturer_id, category_id)?,
            top_n_stores,
            health_score: self.manufacturer_health_score(manufacturer_id, category_id, top_n_stores)?,
        })
    }
}

fn distinct<T, K: Ord>(rows: &[T], key: impl Fn(&T) -> K) -> Vec<K> {
    rows.iter().map(key).collect::<BTreeSet<_>>().into_iter().collect()
}

fn mean_rows_per_manufacturer<'a>(rows: impl Iterator<Item = &'a ProductRecord>) -> f64 {
    let per_manufacturer = rows.map(|p| p.fab_id).counts();
    if per_manufacturer.is_empty() {
        return 0.0;
    }
    let total: usize = per_manufacturer.values().sum();
    total as f64 / per_manufacturer.len() as f64
}

fn rank_stores<'a>(rows: impl IntoIterator<Item = &'a SaleRecord>, n: usize) -> Vec<StoreRanking> {
    let mut ranking: Vec<StoreRanking> = rows
        .into_iter()
        .map(|s| s.mag_id)
        .counts()
        .into_iter()
        .map(|(store_id, agreement_count)| StoreRanking {
            store_id,
            agreement_count,
        })
        .collect();
    ranking.sort_by(|a, b| {
        b.agreement_count
            .cmp(&a.agreement_count)
            .then(a.store_id.cmp(&b.store_id))
    });
    ranking.truncate(n);
    ranking
}

/// Products on offer in one store for one category.
#[derive(Debug, Default)]
struct StoreAssortment {
    products: HashSet<ProductId>,
    manufacturer_products: HashSet<ProductId>,
}

impl StoreAssortment {
    fn ratio(&self) -> f64 {
        if self.products.is_empty() {
            0.0
        } else {
            self.manufacturer_products.len() as f64 / self.products.len() as f64
        }
    }
}

fn health_score<'a, I>(
    rows: I,
    manufacturer_id: ManufacturerId,
    category_id: CategoryId,
    top_n_stores: usize,
) -> f64
where
    I: IntoIterator<Item = &'a SaleRecord>,
    I::IntoIter: Clone,
{
    let rows = rows.into_iter();
    let top = rank_stores(rows.clone(), top_n_stores);
    if top.is_empty() {
        return 0.0;
    }

    let mut assortments: HashMap<StoreId, StoreAssortment> = top
        .iter()
        .map(|ranking| (ranking.store_id, StoreAssortment::default()))
        .collect();
    for sale in rows.filter(|s| s.cat_id == category_id) {
        if let Some(assortment) = assortments.get_mut(&sale.mag_id) {
            assortment.products.insert(sale.prod_id);
            if sale.fab_id == manufacturer_id {
                assortment.manufacturer_products.insert(sale.prod_id);
            }
        }
    }

    let total: f64 = top
        .iter()
        .map(|ranking| assortments.get(&ranking.store_id).map_or(0.0, StoreAssortment::ratio))
        .sum();
    total / top.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sale(log_id: i64, prod_id: i64, cat_id: i64, fab_id: i64, mag_id: i64) -> SaleRecord {
        SaleRecord::new(log_id, prod_id, cat_id, fab_id, mag_id, 20220101)
    }

    fn engine_with_sales(sales: Vec<SaleRecord>) -> KpiEngine {
        KpiEngine::with_tables(Table::default(), Table::new(sales))
    }

    #[test]
    fn queries_fail_before_tables_are_set() {
        let engine = KpiEngine::new();
        assert_eq!(
            engine.count_market_actors_by_category(1),
            Err(AnalyticsError::ProductDataNotConfigured)
        );
        assert_eq!(
            engine.avg_products_per_manufacturer_by_category(1),
            Err(AnalyticsError::ProductDataNotConfigured)
        );
        assert_eq!(engine.top_stores(3), Err(AnalyticsError::SaleDataNotConfigured));
        assert_eq!(
            engine.manufacturer_health_score(1, 1, 3),
            Err(AnalyticsError::SaleDataNotConfigured)
        );
        assert_eq!(
            engine.market_actors_over_time(1, ymd(2022, 1, 1), ymd(2022, 6, 30), Frequency::MonthEnd),
            Err(AnalyticsError::ProductDataNotConfigured)
        );
        assert!(engine.categories().is_empty());
    }

    #[test]
    fn empty_tables_give_zero_results() {
        let engine = KpiEngine::with_tables(Table::default(), Table::default());
        assert_eq!(engine.count_market_actors_by_category(5), Ok(0));
        assert_eq!(engine.avg_products_per_manufacturer_by_category(5), Ok(0.0));
        assert_eq!(engine.top_stores(10), Ok(vec![]));
        assert_eq!(engine.manufacturer_health_score(1, 5, 10), Ok(0.0));
        assert_eq!(engine.manufacturer_share_in_category(1, 5), Ok(0.0));
    }

    #[test]
    fn average_counts_rows_not_distinct_products() {
        let products = Table::new(vec![
            ProductRecord::new(1, 101, 5, 1, 20220101),
            ProductRecord::new(2, 101, 5, 1, 20220102),
            ProductRecord::new(3, 101, 5, 1, 20220103),
            ProductRecord::new(4, 200, 7, 9, 20220103),
        ]);
        let engine = KpiEngine::with_tables(products, Table::default());
        assert_relative_eq!(engine.avg_products_per_manufacturer_by_category(5).unwrap(), 3.0);
        assert_eq!(engine.manufacturer_products_in_category(1, 5), Ok(1));
    }

    #[test]
    fn top_stores_break_ties_by_store_id() {
        let engine = engine_with_sales(vec![
            sale(1, 1, 1, 1, 30),
            sale(2, 1, 1, 1, 20),
            sale(3, 2, 1, 1, 10),
            sale(4, 2, 1, 1, 10),
            sale(5, 2, 1, 1, 20),
        ]);
        let ranking = engine.top_stores(10).unwrap();
        let order: Vec<(StoreId, usize)> =
            ranking.iter().map(|r| (r.store_id, r.agreement_count)).collect();
        assert_eq!(order, vec![(10, 2), (20, 2), (30, 1)]);
        assert_eq!(engine.top_stores(0).unwrap(), vec![]);
    }

    #[test]
    fn health_score_averages_over_every_top_store() {
        // Store 1: products {1, 2} in category 5, manufacturer 7 sells product 1.
        // Store 2: category 5 carries only manufacturer 8.
        let engine = engine_with_sales(vec![
            sale(1, 1, 5, 7, 1),
            sale(2, 2, 5, 8, 1),
            sale(3, 1, 5, 7, 1),
            sale(4, 3, 5, 8, 2),
            sale(5, 4, 5, 8, 2),
            sale(6, 9, 6, 7, 3),
        ]);
        // Store 1 ratio 0.5, store 2 ratio 0.0.
        assert_relative_eq!(engine.manufacturer_health_score(7, 5, 2).unwrap(), 0.25);
        assert_relative_eq!(engine.manufacturer_health_score(7, 5, 1).unwrap(), 0.5);
        assert_relative_eq!(engine.manufacturer_health_score(99, 5, 2).unwrap(), 0.0);
    }

    #[test]
    fn health_score_counts_stores_without_category_sales_as_zero() {
        let engine = engine_with_sales(vec![
            sale(1, 1, 5, 7, 1),
            sale(2, 2, 6, 8, 2),
            sale(3, 3, 6, 8, 2),
        ]);
        // Top stores are 2 (no category-5 sales) and 1 (sole seller).
        assert_relative_eq!(engine.manufacturer_health_score(7, 5, 2).unwrap(), 0.5);
    }

    #[test]
    fn caches_fall_back_to_sales_when_products_are_empty() {
        let engine = engine_with_sales(vec![sale(1, 1, 9, 4, 2), sale(2, 1, 3, 4, 1)]);
        assert_eq!(engine.categories(), &[3, 9]);
        assert_eq!(engine.manufacturers(), &[4]);
        assert_eq!(engine.stores(), &[1, 2]);
    }

    #[test]
    fn set_tables_replaces_previous_state() {
        let mut engine = engine_with_sales(vec![sale(1, 1, 9, 4, 2)]);
        engine.set_tables(
            Table::new(vec![ProductRecord::new(1, 1, 3, 1, 20220101)]),
            Table::new(vec![sale(1, 1, 3, 1, 8)]),
        );
        assert_eq!(engine.categories(), &[3]);
        assert_eq!(engine.stores(), &[8]);
        assert_eq!(engine.top_stores(5).unwrap()[0].store_id, 8);
    }

    #[test]
    fn share_uses_distinct_products() {
        let products = Table::new(vec![
            ProductRecord::new(1, 1, 5, 1, 20220101),
            ProductRecord::new(2, 1, 5, 1, 20220102),
            ProductRecord::new(3, 2, 5, 2, 20220101),
            ProductRecord::new(4, 3, 5, 2, 20220101),
            ProductRecord::new(5, 4, 5, 3, 20220101),
        ]);
        let engine = KpiEngine::with_tables(products, Table::default());
        assert_relative_eq!(engine.manufacturer_share_in_category(1, 5).unwrap(), 0.25);
        assert_relative_eq!(engine.manufacturer_share_in_category(2, 5).unwrap(), 0.5);
    }

    #[test]
    fn actors_over_time_count_half_open_periods() {
        let products = Table::new(vec![
            ProductRecord::new(1, 1, 5, 1, 20220131),
            ProductRecord::new(2, 2, 5, 2, 20220215),
            ProductRecord::new(3, 3, 5, 1, 20220227),
            // Falls on the closing boundary, so it belongs to the next period.
            ProductRecord::new(4, 4, 5, 3, 20220228),
            ProductRecord::new(5, 5, 6, 4, 20220210),
        ]);
        let engine = KpiEngine::with_tables(products, Table::default());
        let points = engine
            .market_actors_over_time(5, ymd(2022, 1, 1), ymd(2022, 3, 31), Frequency::MonthEnd)
            .unwrap();
        assert_eq!(
            points,
            vec![
                ActorCountPoint {
                    period_start: ymd(2022, 1, 31),
                    period_end: ymd(2022, 2, 28),
                    actor_count: 2,
                },
                ActorCountPoint {
                    period_start: ymd(2022, 2, 28),
                    period_end: ymd(2022, 3, 31),
                    actor_count: 1,
                },
            ]
        );
    }

    #[test]
    fn actors_over_time_with_undatable_products_is_all_zero() {
        let products = Table::new(vec![ProductRecord::new(1, 1, 5, 1, "whenever")]);
        let engine = KpiEngine::with_tables(products, Table::default());
        let points = engine
            .market_actors_over_time(5, ymd(2022, 1, 1), ymd(2022, 1, 10), Frequency::Daily)
            .unwrap();
        assert_eq!(points.len(), 9);
        assert!(points.iter().all(|p| p.actor_count == 0));
    }

    #[test]
    fn health_over_time_ranks_stores_per_period() {
        let sales = vec![
            SaleRecord::new(1, 1, 5, 7, 1, 20220105),
            SaleRecord::new(2, 2, 5, 8, 1, 20220106),
            SaleRecord::new(3, 3, 5, 7, 2, 20220110),
            SaleRecord::new(4, 4, 5, 7, 2, 20220111),
        ];
        let engine = engine_with_sales(sales);
        let points = engine
            .manufacturer_health_score_over_time(7, 5, ymd(2022, 1, 2), ymd(2022, 1, 16), 1, Frequency::Weekly)
            .unwrap();
        assert_eq!(points.len(), 2);
        // Week of Jan 2: only store 1 trades, half its assortment is manufacturer 7.
        assert_relative_eq!(points[0].health_score, 0.5);
        // Week of Jan 9: store 2 is the top store and manufacturer 7 is its only seller.
        assert_relative_eq!(points[1].health_score, 1.0);
    }

    #[test]
    fn discount_period_queries_filter_by_season() {
        let products = Table::new(vec![
            ProductRecord::new(1, 1, 5, 1, 20220115),
            ProductRecord::new(2, 2, 5, 1, 20220120),
            ProductRecord::new(3, 3, 5, 2, 20220201),
            ProductRecord::new(4, 4, 5, 2, 20220301),
        ]);
        let sales = Table::new(vec![
            SaleRecord::new(1, 1, 5, 1, 10, 20220115),
            SaleRecord::new(2, 2, 6, 1, 20, 20220116),
            SaleRecord::new(3, 2, 6, 1, 20, 20220117),
            SaleRecord::new(4, 3, 5, 2, 30, 20220625),
        ]);
        let engine = KpiEngine::with_tables(products, sales);

        assert_relative_eq!(
            engine.avg_products_in_discount_period(5, Season::Winter, 2022).unwrap(),
            1.5
        );
        assert_relative_eq!(
            engine.avg_products_in_discount_period(5, Season::Summer, 2022).unwrap(),
            0.0
        );

        let winter = engine.top_stores_in_discount_period(None, 5, Season::Winter, 2022).unwrap();
        assert_eq!(winter.iter().map(|r| r.store_id).collect::<Vec<_>>(), vec![20, 10]);
        let winter_cat5 = engine
            .top_stores_in_discount_period(Some(5), 5, Season::Winter, 2022)
            .unwrap();
        assert_eq!(winter_cat5, vec![StoreRanking { store_id: 10, agreement_count: 1 }]);
        let summer = engine.top_stores_in_discount_period(None, 5, Season::Summer, 2022).unwrap();
        assert_eq!(summer, vec![StoreRanking { store_id: 30, agreement_count: 1 }]);
    }

    #[test]
    fn summary_collects_every_scalar_kpi() {
        let products = Table::new(vec![
            ProductRecord::new(1, 1, 5, 1, 20220101),
            ProductRecord::new(2, 2, 5, 2, 20220101),
        ]);
        let sales = Table::new(vec![sale(1, 1, 5, 1, 1), sale(2, 2, 5, 2, 1)]);
        let engine = KpiEngine::with_tables(products, sales);
        let summary = engine.summary(5, 1, 3).unwrap();
        assert_eq!(summary.market_actors, 2);
        assert_eq!(summary.manufacturer_products, 1);
        assert_relative_eq!(summary.avg_products_per_manufacturer, 1.0);
        assert_relative_eq!(summary.manufacturer_share, 0.5);
        assert_relative_eq!(summary.health_score, 0.5);
    }
}
