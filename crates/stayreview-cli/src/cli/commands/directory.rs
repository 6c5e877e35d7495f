//! Implementation of `stayreview users|companies|stays add`.
//!
//! These register the read-only context the review flow looks up.

use anyhow::Result;
use std::path::Path;

use stayreview_core::model::{Company, CompanyId, Stay, User};

use crate::cli::commands::helpers::open_services;
use crate::output::{Formatter, OutputFormat};

/// Register a guest.
#[tracing::instrument(skip(db_path, format))]
pub fn run_users_add(db_path: &Path, name: &str, format: OutputFormat) -> Result<User> {
    let services = open_services(db_path)?;
    let user = services.store().insert_user(name)?;
    Formatter::new(format).print(&user)?;
    Ok(user)
}

/// Register a company.
#[tracing::instrument(skip(db_path, format))]
pub fn run_companies_add(db_path: &Path, name: &str, format: OutputFormat) -> Result<Company> {
    let services = open_services(db_path)?;
    let company = services.store().insert_company(name)?;
    Formatter::new(format).print(&company)?;
    Ok(company)
}

/// Register a stay owned by `owner`.
#[tracing::instrument(skip(db_path, format))]
pub fn run_stays_add(
    db_path: &Path,
    owner: i64,
    name: &str,
    format: OutputFormat,
) -> Result<Stay> {
    let services = open_services(db_path)?;
    let stay = services.store().insert_stay(CompanyId(owner), name)?;
    Formatter::new(format).print(&stay)?;
    Ok(stay)
}
