use clap::{Parser, Subcommand};

mod db;
mod token;

#[derive(Debug, Parser)]
#[command(name = "shopfront-app", about = "Shopfront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Token(token::TokenCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Token(command) => token::run(command),
            Commands::Db(command) => db::run(command).await,
        }
    }
}
