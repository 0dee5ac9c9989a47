use anyhow::Result;
use clap::Parser;
use deadline_labeler::app::Application;
use deadline_labeler::cli::Cli;
use log::{debug, error};
use std::io;

fn main() {
    let dotenv = dotenvy::dotenv();
    deadline_labeler::init_logger();
    if let Err(err) = dotenv {
        debug!("No .env file loaded: {}", err);
    }

    if let Err(err) = run() {
        error!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let app = Application::new(cli.config)?;
    app.run(cli.command, &mut io::stdout().lock())
}
