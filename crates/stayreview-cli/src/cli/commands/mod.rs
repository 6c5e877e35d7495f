//! Command implementations for the stayreview CLI.

pub mod directory;
pub mod helpers;
pub mod init;
pub mod reviews;

pub use directory::{run_companies_add, run_stays_add, run_users_add};
pub use init::run_init;
pub use reviews::{run_reviews_add, run_reviews_delete, run_reviews_list, run_reviews_show};
