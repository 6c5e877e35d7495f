//! stayreview - threaded guest reviews for lodging stays

pub mod cli;
pub mod config;
pub mod logging;
pub mod output;
