//! Dashboard module
//!
//! Provides the overview page showing summary cards, the category
//! breakdown, and the monthly trend, recomputed from the full expense
//! collection on every request.

mod aggregation;
mod cards;
mod charts;
mod handlers;
mod tables;
mod trend;

pub use handlers::{DashboardQuery, get_dashboard_content, get_dashboard_page};
