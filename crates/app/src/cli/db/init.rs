use clap::Args;
use shopfront_app::database;

#[derive(Debug, Args)]
pub(crate) struct InitArgs {
    /// MongoDB connection string
    #[arg(long, env = "MONGODB_URI", hide_env_values = true)]
    mongodb_uri: String,

    /// Database holding the cart and orders collections
    #[arg(long, env = "MONGODB_DATABASE", default_value = "myProjectDB")]
    database: String,
}

pub(crate) async fn run(args: InitArgs) -> Result<(), String> {
    if args.database.trim().is_empty() {
        return Err("database cannot be empty".to_string());
    }

    let db = database::init(&args.mongodb_uri, &args.database)
        .await
        .map_err(|error| format!("failed to initialise database: {error}"))?;

    println!("database: {}", db.name());
    println!("indexes: ensured");

    db.close().await;

    Ok(())
}
