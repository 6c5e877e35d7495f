//! Access policy for review reads.
//!
//! Every check returns a `Result`, so a denial has to be handled by the
//! caller (usually with `?`, which turns it into `CoreError::Unauthorized`).

use serde::Serialize;
use thiserror::Error;

use crate::model::{Company, CompanyId, StayId, UserId};

/// The party making a request. Authentication happens upstream; this is
/// only what the session says.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Actor {
    #[default]
    Anonymous,
    User(UserId),
    Company(CompanyId),
}

/// Why an actor was turned away.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("login required")]
    Anonymous,

    #[error("a company session is required")]
    NotACompany,

    #[error("company {actor} does not own stay {stay_id}")]
    NotOwner { actor: CompanyId, stay_id: StayId },
}

/// Require a company session and return its id.
pub const fn require_company(actor: Actor) -> Result<CompanyId, AccessDenied> {
    match actor {
        Actor::Company(id) => Ok(id),
        Actor::User(_) => Err(AccessDenied::NotACompany),
        Actor::Anonymous => Err(AccessDenied::Anonymous),
    }
}

/// Decide whether `actor` may list the reviews of `stay_id`, owned by `owner`.
pub fn check_list(
    actor: Actor,
    stay_id: StayId,
    owner: &Company,
) -> Result<CompanyId, AccessDenied> {
    let company_id = require_company(actor)?;
    if company_id != owner.id {
        return Err(AccessDenied::NotOwner {
            actor: company_id,
            stay_id,
        });
    }
    Ok(company_id)
}

/// Decide whether `actor` may read a single review's detail.
///
/// Any company session passes; ownership of the review's stay is not checked.
pub const fn check_detail(actor: Actor) -> Result<CompanyId, AccessDenied> {
    require_company(actor)
}
