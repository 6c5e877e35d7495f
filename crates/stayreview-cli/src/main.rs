//! stayreview - threaded guest reviews for lodging stays

use anyhow::Result;
use clap::Parser;

use stayreview_cli::cli::commands::{
    run_companies_add, run_init, run_reviews_add, run_reviews_delete, run_reviews_list,
    run_reviews_show, run_stays_add, run_users_add,
};
use stayreview_cli::cli::{
    Cli, Commands, CompaniesCommands, ReviewsCommands, StaysCommands, UsersCommands,
};
use stayreview_cli::config::{actor_from_env, db_path_from_env};
use stayreview_cli::logging::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json)?;

    let db_path = db_path_from_env(cli.db.as_deref())?;
    let actor = actor_from_env(cli.user, cli.company)?;
    let format = cli.output_format();
    tracing::debug!(db = %db_path.display(), ?actor, "Resolved configuration");

    match cli.command {
        Commands::Init => {
            run_init(&db_path)?;
        }

        Commands::Users(UsersCommands::Add { name }) => {
            run_users_add(&db_path, &name, format)?;
        }

        Commands::Companies(CompaniesCommands::Add { name }) => {
            run_companies_add(&db_path, &name, format)?;
        }

        Commands::Stays(StaysCommands::Add { owner, name }) => {
            run_stays_add(&db_path, owner, &name, format)?;
        }

        Commands::Reviews(cmd) => match cmd {
            ReviewsCommands::Add {
                stay,
                content,
                score,
                parent,
            } => {
                run_reviews_add(&db_path, actor, stay, &content, score, parent, format)?;
            }
            ReviewsCommands::List { stay } => {
                run_reviews_list(&db_path, actor, stay, format)?;
            }
            ReviewsCommands::Show { review_id } => {
                run_reviews_show(&db_path, actor, review_id, format)?;
            }
            ReviewsCommands::Delete { review_id } => {
                run_reviews_delete(&db_path, review_id, format)?;
            }
        },
    }

    Ok(())
}
