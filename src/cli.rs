//! CLI definitions: argument parsing, subcommands, and help text.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

pub use clap_complete::generate;

const AFTER_HELP: &str = "\
EXAMPLES:
  shop-chat                                  Start an interactive chat
  shop-chat -p \"waterproof hiking boots\"     Single message, print the reply
  shop-chat -p \"similar?\" --image bag.jpg    Send a message with an image
  shop-chat -p -                             Read the message from stdin
  shop-chat render reply.txt                 Normalize a saved reply (no network)
  shop-chat health                           Check the chat service
  shop-chat config                           Show the effective configuration
  shop-chat completions bash                 Generate bash completions

INTERACTIVE COMMANDS:
  /image <path>   Attach an image to the next message
  /new            Start a new chat thread
  /history        Show the messages of the current thread
  /quit           Exit
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Chat with the product assistant from the terminal",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Send a single message then exit
    #[arg(
        short = 'p',
        long,
        help = "Send one message and print the reply (use '-' to read from stdin)"
    )]
    pub prompt: Option<String>,

    /// Image to attach to the single message
    #[arg(long, requires = "prompt", help = "Attach an image (jpeg, png or webp)")]
    pub image: Option<PathBuf>,

    /// Override SHOP_CHAT_BASE_URL
    #[arg(long, global = true, help = "Chat service root, e.g. http://127.0.0.1:8888")]
    pub base_url: Option<String>,

    /// Print records as JSON instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize a raw reply from FILE (or stdin) and print the markup
    Render {
        /// File holding the raw reply; stdin when omitted
        file: Option<PathBuf>,
    },
    /// Query the chat service health endpoint
    Health,
    /// Show the effective configuration
    Config,
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }

    /// Interactive mode owns stdout, so logs are redirected to a file.
    pub fn is_interactive(&self) -> bool {
        self.command.is_none() && self.prompt.is_none()
    }
}
