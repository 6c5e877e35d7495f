//! Runtime configuration: where the database lives and who is asking.
//!
//! Flags win over environment variables, which win over defaults.

use anyhow::{bail, Context, Result};
use std::env;
use std::path::{Path, PathBuf};

use stayreview_core::access::Actor;
use stayreview_core::model::{CompanyId, UserId};

/// The directory name for stayreview data
pub const DATA_DIR: &str = ".stayreview";

/// The database filename inside [`DATA_DIR`]
pub const DB_FILE: &str = "reviews.db";

/// Overrides the database path
pub const DB_VAR: &str = "STAYREVIEW_DB";
/// Acts as this user when no `--user`/`--company` flag is given
pub const USER_VAR: &str = "STAYREVIEW_USER";
/// Acts as this company when no `--user`/`--company` flag is given
pub const COMPANY_VAR: &str = "STAYREVIEW_COMPANY";

/// Default database path under `root`.
#[must_use]
pub fn default_db_path(root: &Path) -> PathBuf {
    root.join(DATA_DIR).join(DB_FILE)
}

/// Resolve the database path.
///
/// Order: explicit flag, then `env_value`, then `<root>/.stayreview/reviews.db`.
#[must_use]
pub fn resolve_db_path(flag: Option<&Path>, env_value: Option<String>, root: &Path) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    match env_value.filter(|v| !v.trim().is_empty()) {
        Some(value) => PathBuf::from(value),
        None => default_db_path(root),
    }
}

/// Resolve the database path from the process environment.
pub fn db_path_from_env(flag: Option<&Path>) -> Result<PathBuf> {
    let root = env::current_dir().context("Failed to read current directory")?;
    Ok(resolve_db_path(flag, env::var(DB_VAR).ok(), &root))
}

/// Resolve the acting party.
///
/// Flags take priority; the env values are only consulted when neither flag
/// is set. Naming both a user and a company is an error.
pub fn resolve_actor(
    user_flag: Option<i64>,
    company_flag: Option<i64>,
    user_env: Option<String>,
    company_env: Option<String>,
) -> Result<Actor> {
    let (user, company) = if user_flag.is_some() || company_flag.is_some() {
        (user_flag, company_flag)
    } else {
        (
            parse_env_id(USER_VAR, user_env)?,
            parse_env_id(COMPANY_VAR, company_env)?,
        )
    };

    match (user, company) {
        (Some(_), Some(_)) => bail!("Act as either a user or a company, not both"),
        (Some(id), None) => Ok(Actor::User(UserId(id))),
        (None, Some(id)) => Ok(Actor::Company(CompanyId(id))),
        (None, None) => Ok(Actor::Anonymous),
    }
}

/// Resolve the acting party from flags and the process environment.
pub fn actor_from_env(user_flag: Option<i64>, company_flag: Option<i64>) -> Result<Actor> {
    resolve_actor(
        user_flag,
        company_flag,
        env::var(USER_VAR).ok(),
        env::var(COMPANY_VAR).ok(),
    )
}

fn parse_env_id(var: &str, value: Option<String>) -> Result<Option<i64>> {
    match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(v) => v
            .parse::<i64>()
            .map(Some)
            .with_context(|| format!("{var} must be a numeric id, got '{v}'")),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_path_flag_wins() {
        let path = resolve_db_path(
            Some(Path::new("/tmp/flag.db")),
            Some("/tmp/env.db".to_string()),
            Path::new("/work"),
        );
        assert_eq!(path, Path::new("/tmp/flag.db"));
    }

    #[test]
    fn test_db_path_env_then_default() {
        let path = resolve_db_path(None, Some("/tmp/env.db".to_string()), Path::new("/work"));
        assert_eq!(path, Path::new("/tmp/env.db"));

        let path = resolve_db_path(None, Some("  ".to_string()), Path::new("/work"));
        assert_eq!(path, Path::new("/work/.stayreview/reviews.db"));

        let path = resolve_db_path(None, None, Path::new("/work"));
        assert_eq!(path, Path::new("/work/.stayreview/reviews.db"));
    }

    #[test]
    fn test_actor_from_flags() {
        assert_eq!(
            resolve_actor(Some(3), None, None, Some("9".into())).unwrap(),
            Actor::User(UserId(3))
        );
        assert_eq!(
            resolve_actor(None, Some(4), Some("9".into()), None).unwrap(),
            Actor::Company(CompanyId(4))
        );
    }

    #[test]
    fn test_actor_from_env() {
        assert_eq!(
            resolve_actor(None, None, None, Some("12".into())).unwrap(),
            Actor::Company(CompanyId(12))
        );
        assert_eq!(
            resolve_actor(None, None, Some(" 5 ".into()), None).unwrap(),
            Actor::User(UserId(5))
        );
    }

    #[test]
    fn test_actor_anonymous_by_default() {
        assert_eq!(resolve_actor(None, None, None, None).unwrap(), Actor::Anonymous);
    }

    #[test]
    fn test_actor_both_rejected() {
        assert!(resolve_actor(Some(1), Some(2), None, None).is_err());
        assert!(resolve_actor(None, None, Some("1".into()), Some("2".into())).is_err());
    }

    #[test]
    fn test_actor_env_must_be_numeric() {
        let err = resolve_actor(None, None, Some("alice".into()), None).unwrap_err();
        assert!(err.to_string().contains(USER_VAR));
    }
}
