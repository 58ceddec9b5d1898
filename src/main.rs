use analytics::{ActorCountPoint, CategorySummary, HealthScorePoint, KpiEngine, StoreRanking};
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use configuration::Config;
use core_types::{CategoryId, DateRange, Frequency, ManufacturerId, Season, StoreId};
use serde::Serialize;
use std::path::PathBuf;

/// The main entry point for the market-health KPI tool.
fn main() -> anyhow::Result<()> {
    // A missing .env is fine; it only carries optional overrides.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => configuration::load_config_from(path),
        None => configuration::load_config(),
    }
    .context("Failed to load configuration")?;

    // The guard flushes the log file on drop, so it lives until main returns.
    let _log_guard = configuration::init_logging(&config.logging)?;
    tracing::debug!(?config, "Configuration loaded.");

    let (products, sales) = dataset::load_tables(&config.data.product_file, &config.data.sale_file)
        .context("Failed to load the product and sale logs")?;

    let mut engine = KpiEngine::new();
    engine.set_tables(products, sales);

    let output = Output { json: cli.json };
    run(&engine, &config, cli.command, &output)
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Market-health KPIs over product listing and sale agreement logs.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON instead of a table.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count the distinct manufacturers listing products in a category.
    Actors {
        #[arg(long)]
        category: CategoryId,
    },
    /// Average number of products per manufacturer in a category.
    AvgProducts {
        #[arg(long)]
        category: CategoryId,
    },
    /// The stores referenced by the most sale agreements.
    TopStores {
        /// Defaults to `kpi.top_n_stores`.
        #[arg(long)]
        n: Option<usize>,
    },
    /// A manufacturer's health score in a category.
    Health {
        #[arg(long)]
        manufacturer: ManufacturerId,
        #[arg(long)]
        category: CategoryId,
        #[arg(long)]
        top_n: Option<usize>,
    },
    /// Distinct manufacturers in a category, period by period.
    ActorsOverTime {
        #[arg(long)]
        category: CategoryId,
        /// Start date (format: YYYY-MM-DD).
        #[arg(long)]
        from: NaiveDate,
        /// End date (format: YYYY-MM-DD).
        #[arg(long)]
        to: NaiveDate,
        /// One of D, W, M, MS. Defaults to `kpi.frequency`.
        #[arg(long)]
        freq: Option<Frequency>,
    },
    /// A manufacturer's health score, period by period.
    HealthOverTime {
        #[arg(long)]
        manufacturer: ManufacturerId,
        #[arg(long)]
        category: CategoryId,
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
        #[arg(long)]
        top_n: Option<usize>,
        #[arg(long)]
        freq: Option<Frequency>,
    },
    /// Category KPIs restricted to a seasonal discount period.
    Discount {
        #[arg(long)]
        category: CategoryId,
        /// `winter` or `summer`.
        #[arg(long)]
        season: Season,
        /// Defaults to `kpi.discount_year`.
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        n: Option<usize>,
    },
    /// Every scalar KPI for one category and manufacturer.
    Summary {
        #[arg(long)]
        category: CategoryId,
        #[arg(long)]
        manufacturer: ManufacturerId,
        #[arg(long)]
        top_n: Option<usize>,
    },
    /// The distinct categories, manufacturers and stores in the loaded logs.
    Lists,
}

// ==============================================================================
// Command Dispatch
// ==============================================================================

fn run(engine: &KpiEngine, config: &Config, command: Commands, output: &Output) -> anyhow::Result<()> {
    let kpi = &config.kpi;
    match command {
        Commands::Actors { category } => {
            let market_actors = engine.count_market_actors_by_category(category)?;
            output.emit(&Scalar::new("market_actors", category, market_actors))
        }
        Commands::AvgProducts { category } => {
            let avg = engine.avg_products_per_manufacturer_by_category(category)?;
            output.emit(&Scalar::new("avg_products_per_manufacturer", category, avg))
        }
        Commands::TopStores { n } => {
            let ranking = engine.top_stores(n.unwrap_or(kpi.top_n_stores))?;
            output.emit(&ranking)
        }
        Commands::Health {
            manufacturer,
            category,
            top_n,
        } => {
            let score =
                engine.manufacturer_health_score(manufacturer, category, top_n.unwrap_or(kpi.top_n_stores))?;
            output.emit(&Scalar::new("health_score", category, score))
        }
        Commands::ActorsOverTime {
            category,
            from,
            to,
            freq,
        } => {
            let points = engine.market_actors_over_time(category, from, to, freq.unwrap_or(kpi.frequency))?;
            output.emit(&points)
        }
        Commands::HealthOverTime {
            manufacturer,
            category,
            from,
            to,
            top_n,
            freq,
        } => {
            let points = engine.manufacturer_health_score_over_time(
                manufacturer,
                category,
                from,
                to,
                top_n.unwrap_or(kpi.top_n_stores),
                freq.unwrap_or(kpi.frequency),
            )?;
            output.emit(&points)
        }
        Commands::Discount {
            category,
            season,
            year,
            n,
        } => {
            let year = year.unwrap_or(kpi.discount_year);
            let report = DiscountReport {
                category_id: category,
                season,
                period: engine.discount_period(season, year)?,
                avg_products_per_manufacturer: engine.avg_products_in_discount_period(category, season, year)?,
                top_stores: engine.top_stores_in_discount_period(
                    Some(category),
                    n.unwrap_or(kpi.top_n_stores),
                    season,
                    year,
                )?,
            };
            output.emit(&report)
        }
        Commands::Summary {
            category,
            manufacturer,
            top_n,
        } => {
            let summary = engine.summary(category, manufacturer, top_n.unwrap_or(kpi.top_n_stores))?;
            output.emit(&summary)
        }
        Commands::Lists => {
            let lists = Lists {
                categories: engine.categories(),
                manufacturers: engine.manufacturers(),
                stores: engine.stores(),
            };
            output.emit(&lists)
        }
    }
}

// ==============================================================================
// Rendering
// ==============================================================================

struct Output {
    json: bool,
}

impl Output {
    fn emit<T: Serialize + Render>(&self, value: &T) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            value.render(&mut table);
            println!("{table}");
        }
        Ok(())
    }
}

/// Fills a terminal table with a query result.
trait Render {
    fn render(&self, table: &mut Table);
}

#[derive(Serialize)]
struct Scalar<V> {
    kpi: &'static str,
    category_id: CategoryId,
    value: V,
}

impl<V> Scalar<V> {
    fn new(kpi: &'static str, category_id: CategoryId, value: V) -> Self {
        Self {
            kpi,
            category_id,
            value,
        }
    }
}

impl<V: std::fmt::Display> Render for Scalar<V> {
    fn render(&self, table: &mut Table) {
        table.set_header(vec!["KPI", "Category", "Value"]);
        table.add_row(vec![
            self.kpi.to_string(),
            self.category_id.to_string(),
            self.value.to_string(),
        ]);
    }
}

impl Render for Vec<StoreRanking> {
    fn render(&self, table: &mut Table) {
        table.set_header(vec!["Rank", "Store", "Agreements"]);
        for (rank, entry) in self.iter().enumerate() {
            table.add_row(vec![
                (rank + 1).to_string(),
                entry.store_id.to_string(),
                entry.agreement_count.to_string(),
            ]);
        }
    }
}

impl Render for Vec<ActorCountPoint> {
    fn render(&self, table: &mut Table) {
        table.set_header(vec!["Period start", "Period end", "Market actors"]);
        for point in self {
            table.add_row(vec![
                point.period_start.to_string(),
                point.period_end.to_string(),
                point.actor_count.to_string(),
            ]);
        }
    }
}

impl Render for Vec<HealthScorePoint> {
    fn render(&self, table: &mut Table) {
        table.set_header(vec!["Period start", "Period end", "Health score"]);
        for point in self {
            table.add_row(vec![
                point.period_start.to_string(),
                point.period_end.to_string(),
                format!("{:.4}", point.health_score),
            ]);
        }
    }
}

impl Render for CategorySummary {
    fn render(&self, table: &mut Table) {
        table.set_header(vec!["KPI", "Value"]);
        table.add_row(vec!["Category".to_string(), self.category_id.to_string()]);
        table.add_row(vec!["Manufacturer".to_string(), self.manufacturer_id.to_string()]);
        table.add_row(vec!["Market actors".to_string(), self.market_actors.to_string()]);
        table.add_row(vec![
            "Avg products per manufacturer".to_string(),
            format!("{:.2}", self.avg_products_per_manufacturer),
        ]);
        table.add_row(vec![
            "Manufacturer products".to_string(),
            self.manufacturer_products.to_string(),
        ]);
        table.add_row(vec![
            "Manufacturer share".to_string(),
            format!("{:.2}%", self.manufacturer_share * 100.0),
        ]);
        table.add_row(vec![
            format!("Health score (top {} stores)", self.top_n_stores),
            format!("{:.4}", self.health_score),
        ]);
    }
}

#[derive(Serialize)]
struct DiscountReport {
    category_id: CategoryId,
    season: Season,
    period: DateRange,
    avg_products_per_manufacturer: f64,
    top_stores: Vec<StoreRanking>,
}

impl Render for DiscountReport {
    fn render(&self, table: &mut Table) {
        table.set_header(vec!["KPI", "Value"]);
        table.add_row(vec!["Category".to_string(), self.category_id.to_string()]);
        table.add_row(vec![
            format!("{} discount period", self.season),
            format!("{} to {}", self.period.start, self.period.end),
        ]);
        table.add_row(vec![
            "Avg products per manufacturer".to_string(),
            format!("{:.2}", self.avg_products_per_manufacturer),
        ]);
        let stores = self
            .top_stores
            .iter()
            .map(|s| format!("{} ({})", s.store_id, s.agreement_count))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec!["Top stores".to_string(), stores]);
    }
}

#[derive(Serialize)]
struct Lists<'a> {
    categories: &'a [CategoryId],
    manufacturers: &'a [ManufacturerId],
    stores: &'a [StoreId],
}

impl Render for Lists<'_> {
    fn render(&self, table: &mut Table) {
        table.set_header(vec!["List", "Count", "Ids"]);
        for (name, ids) in [
            ("Categories", self.categories),
            ("Manufacturers", self.manufacturers),
            ("Stores", self.stores),
        ] {
            let joined = ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", ");
            table.add_row(vec![name.to_string(), ids.len().to_string(), joined]);
        }
    }
}
