//! gatsmonitor: periodically checks trigger conditions and indicators for a
//! set of symbols against the Gatsiva analytics API and emails a report when
//! something fires.

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod models;
pub mod report;
pub mod services;
