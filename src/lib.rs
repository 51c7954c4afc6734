//! # Meal Poll
//!
//! School meal dashboard: browse the lunch menu's calorie trend and vote for
//! a favorite dish, with a live per-visitor tally.
//!
//! ## Modules
//!
//! - [`dataset`]: CSV loading with encoding fallback, cached by file version
//! - [`tally`]: per-session vote counts
//! - [`charts`]: trend and tally chart specs, SVG rendering
//! - [`dashboard`]: one render pass of the page
//! - [`session`]: visitor sessions owning their tallies
//! - [`api`]: HTTP server with Axum
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use meal_poll::dataset::{DatasetCache, MealLoader};
//! use meal_poll::tally::VoteTally;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() {
//!     let cache = DatasetCache::new(MealLoader::default());
//!     let outcome = cache.get(Path::new("meals_data.csv")).await;
//!
//!     if let Some(table) = outcome.table() {
//!         let mut tally = VoteTally::new();
//!         tally.initialize(table.distinct_dishes());
//!
//!         if let Some(first) = table.distinct_dishes().first() {
//!             tally.record_vote(first).unwrap();
//!         }
//!
//!         for entry in tally.sorted() {
//!             println!("{}: {}", entry.dish, entry.count);
//!         }
//!     }
//! }
//! ```

pub mod api;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod session;
pub mod tally;

// Re-export top-level types for convenience
pub use dataset::{
    DatasetCache, DatasetError, DatasetResult, LoadOutcome, MealLoader, MealRecord, MealTable,
};

pub use tally::{TallyEntry, TallyError, VoteReceipt, VoteTally};

pub use charts::{BarChart, LineChart};

pub use dashboard::{cast_vote, render_pass, DashboardView, Notice, Section};

pub use session::{Session, SessionStore};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{
    ApiConfig, Config, ConfigError, DatasetConfig, LoggingConfig, SessionConfig,
};
