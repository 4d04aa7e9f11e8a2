//! energy_mix
//!
//! A lightweight Rust library for exploring global electricity data and
//! simulating energy-mix budgets. Pairs with the `emix` CLI and the `emix-gui`
//! desktop app.
//!
//! ### Features
//! - Energy-mix sliders: change one share, the unlocked others absorb the
//!   difference proportionally, never below a floor, always summing to 100
//! - Lock up to N-1 categories so they keep their share
//! - Budget estimate as a weighted sum of amount, share and unit price
//! - Load the global electricity dataset, rank countries by consumption,
//!   summarize metrics per year and region
//! - Load the South Korea series: actual mix per year, energy balance,
//!   monthly unit prices, sector electricity savings
//! - Save results as CSV or JSON
//!
//! ### Example
//! ```
//! use energy_mix::{CategorySet, Category, UnitPrices, budget};
//!
//! let mut mix = CategorySet::default();
//! let _ = mix.set_locked(Category::Nuclear, true)?;
//! let _ = mix.set_share(Category::Renewable, 50.0)?;
//! assert_eq!(mix.share(Category::Nuclear)?, 6.0);
//!
//! let prices = UnitPrices::new()
//!     .with(Category::Nuclear, 60.0)
//!     .with(Category::Renewable, 180.0);
//! let est = budget::estimate(&mix, 300_000.0, &prices);
//! println!("{:.2} 억 KRW", est.total_eok());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod budget;
pub mod dataset;
pub mod error;
pub mod format;
pub mod korea;
pub mod mix;
pub mod models;
pub mod stats;
pub mod storage;
pub mod view;

pub use budget::{BudgetEstimate, UnitPrices};
pub use dataset::Dataset;
pub use error::{MixError, MixResult};
pub use korea::KoreaData;
pub use mix::{CategorySet, MixConfig, MixOutcome, NoOpReason};
pub use models::{Category, CountryRecord, Metric};
pub use view::{View, ViewState};
