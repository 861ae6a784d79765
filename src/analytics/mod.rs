//! Monthly analytics over the stored transactions.
//!
//! This module contains:
//! - Sales totals and sold/unsold counts for a month
//! - The price range histogram shown as a bar chart
//! - The per-category counts shown as a pie chart
//! - A combined report of all three and the route handlers that serve them

mod categories;
mod handlers;
mod histogram;
mod report;
mod statistics;

pub use handlers::{
    get_bar_chart_endpoint, get_combined_data_endpoint, get_pie_chart_endpoint,
    get_statistics_endpoint,
};
