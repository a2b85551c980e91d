//! Business KPI engine.
//!
//! A [`dataset::Dataset`] feeds the [`kpi::KpiEngine`], whose store is frozen into a
//! [`dashboard::DashboardSnapshot`] that the [`export`] module projects into files for
//! visualization tools.

pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod export;
pub mod kpi;
pub mod telemetry;
