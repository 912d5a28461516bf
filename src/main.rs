//! # shop-chat - product assistant chat client
//!
//! Sends messages (and optional images) to the product chat service and prints
//! the assistant's replies after normalizing them into a small markup fragment.
//!
//! ## Modes
//! - Interactive chat (default)
//! - Single message with `-p` / `--prompt`
//! - Offline reply normalization with `render`
//! - Service checks with `health` and `config`

mod cli;
mod core;
mod display;
mod run;

use clap::Parser;
use dotenv::dotenv;

use cli::{Args, Commands};

#[tokio::main]
async fn main() {
    if let Err(e) = try_main().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv().ok();

    let args = Args::parse();
    run::init_logger(&args);

    let mut config = core::config::load()?;
    if let Some(url) = args.base_url.as_deref() {
        config = config.with_base_url(url)?;
    }
    log::debug!("Using chat endpoint {}", config.chat_url());

    match &args.command {
        Some(Commands::Render { file }) => run::run_render(file.as_deref(), &config),
        Some(Commands::Health) => run::run_health(&config, args.json).await,
        Some(Commands::Config) => {
            run::show_config(&config);
            Ok(())
        }
        Some(Commands::Completions { shell }) => {
            run::print_completions(*shell);
            Ok(())
        }
        None if args.prompt.is_some() => run::run_single_prompt(&args, &config).await,
        None => run::run_interactive(&config, args.json).await,
    }
}
