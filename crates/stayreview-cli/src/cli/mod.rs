//! CLI command definitions and handlers.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

pub mod commands;

/// Threaded guest reviews for lodging stays
#[derive(Parser, Debug)]
#[command(name = "stayreview")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Shorthand for --format json
    #[arg(long, global = true)]
    pub json: bool,

    /// Database path (default: $STAYREVIEW_DB or ./.stayreview/reviews.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Act as this user id (default: $STAYREVIEW_USER)
    #[arg(long, global = true, conflicts_with = "company")]
    pub user: Option<i64>,

    /// Act as this company id (default: $STAYREVIEW_COMPANY)
    #[arg(long, global = true)]
    pub company: Option<i64>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// The effective output format after applying `--json`.
    #[must_use]
    pub const fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the review database
    Init,

    /// Manage guest accounts
    #[command(subcommand)]
    Users(UsersCommands),

    /// Manage companies
    #[command(subcommand)]
    Companies(CompaniesCommands),

    /// Manage stays
    #[command(subcommand)]
    Stays(StaysCommands),

    /// Post, list, show, and delete reviews
    #[command(subcommand)]
    Reviews(ReviewsCommands),
}

// ============================================================================
// Directory subcommands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum UsersCommands {
    /// Register a guest
    Add {
        #[arg(long)]
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CompaniesCommands {
    /// Register a company
    Add {
        #[arg(long)]
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum StaysCommands {
    /// Register a stay owned by a company
    Add {
        /// Owning company id
        #[arg(long = "owner")]
        owner: i64,

        #[arg(long)]
        name: String,
    },
}

// ============================================================================
// Reviews subcommands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum ReviewsCommands {
    /// Post a review on a stay, or reply to one (as --user)
    Add {
        /// Stay id
        #[arg(long)]
        stay: i64,

        /// Review text
        #[arg(long, visible_alias = "message", short = 'm')]
        content: String,

        /// Numeric rating
        #[arg(long, allow_negative_numbers = true)]
        score: i32,

        /// Review id to reply to
        #[arg(long)]
        parent: Option<i64>,
    },

    /// Show the review tree of a stay (as the owning --company)
    List {
        /// Stay id
        #[arg(long)]
        stay: i64,
    },

    /// Show a review with its direct replies (as a --company)
    Show {
        /// Review id
        review_id: i64,
    },

    /// Soft-delete a review
    Delete {
        /// Review id
        review_id: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reviews_add() {
        let cli = Cli::try_parse_from([
            "stayreview", "--user", "3", "reviews", "add", "--stay", "1", "--content",
            "Great view", "--score", "5", "--parent", "9",
        ])
        .unwrap();

        assert_eq!(cli.user, Some(3));
        match cli.command {
            Commands::Reviews(ReviewsCommands::Add {
                stay,
                content,
                score,
                parent,
            }) => {
                assert_eq!(stay, 1);
                assert_eq!(content, "Great view");
                assert_eq!(score, 5);
                assert_eq!(parent, Some(9));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "stayreview", "reviews", "list", "--stay", "2", "--company", "4", "--json", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.company, Some(4));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output_format(), OutputFormat::Json);
    }

    #[test]
    fn test_user_and_company_conflict() {
        let result = Cli::try_parse_from([
            "stayreview", "--user", "1", "--company", "2", "reviews", "show", "5",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_format_text() {
        let cli = Cli::try_parse_from(["stayreview", "init"]).unwrap();
        assert_eq!(cli.output_format(), OutputFormat::Text);
        assert!(cli.db.is_none());
    }
}
