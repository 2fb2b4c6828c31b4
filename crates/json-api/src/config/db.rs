//! Database Config

use clap::Args;

/// `MongoDB` settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `MongoDB` connection string
    #[arg(long, env = "MONGODB_URI", hide_env_values = true)]
    pub mongodb_uri: String,

    /// Database holding the `cart` and `orders` collections
    #[arg(long, env = "MONGODB_DATABASE", default_value = "myProjectDB")]
    pub database: String,
}
