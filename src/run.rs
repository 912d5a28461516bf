//! Application run modes: logger init, render, health, single message, interactive chat.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::{self, Args};
use crate::core;
use crate::core::attachment::Attachment;
use crate::core::client::ChatClient;
use crate::core::config::Config;
use crate::core::message::Message;
use crate::core::session::ChatSession;
use crate::display;

type RunResult = Result<(), Box<dyn std::error::Error>>;

/// Initialize env_logger. In interactive mode, writes to file to keep the conversation readable.
pub fn init_logger(args: &Args) {
    let log_level = args.log_level();
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level));

    if args.is_interactive()
        && let Some(path) = core::paths::log_file()
        && let Some(dir) = path.parent()
        && std::fs::create_dir_all(dir).is_ok()
        && let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
    {
        logger.target(env_logger::Target::Pipe(Box::new(file)));
    }
    let _ = logger.try_init();
}

fn print_message(msg: &Message, json: bool) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if json {
        let text = serde_json::to_string(msg).map_err(io::Error::other)?;
        writeln!(out, "{}", text)
    } else {
        writeln!(out, "{}", display::format_message(msg, display::terminal_width()))
    }
}

/// Normalize a raw reply read from `file` (or stdin) and print it.
pub fn run_render(file: Option<&Path>, config: &Config) -> RunResult {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut s = String::new();
            io::stdin().read_to_string(&mut s)?;
            s
        }
    };
    let rendered = match config.fallback.as_deref() {
        Some(fallback) => core::render::normalize_with_fallback(Some(&raw), fallback),
        None => core::render::normalize_response(Some(&raw)),
    };
    println!("{}", rendered);
    Ok(())
}

pub async fn run_health(config: &Config, json: bool) -> RunResult {
    let client = ChatClient::new(config)?;
    let health = client.health().await?;
    if json {
        println!(
            "{}",
            serde_json::json!({"status": health.status, "service": health.service})
        );
    } else {
        println!("{} ({})", health.status, health.service);
    }
    Ok(())
}

pub fn show_config(config: &Config) {
    println!("Chat endpoint:   {}", config.chat_url());
    println!("Health endpoint: {}", config.health_url());
    println!("Timeout:         {}s", config.timeout.as_secs());
    println!(
        "Fallback reply:  {}",
        config
            .fallback
            .as_deref()
            .unwrap_or(core::render::DEFAULT_FALLBACK)
    );
    match core::paths::log_file() {
        Some(path) => println!("Log file:        {}", path.display()),
        None => println!("Log file:        (no cache directory)"),
    }
}

pub fn print_completions(shell: clap_complete::Shell) {
    let mut cmd = Args::command();
    cli::generate(shell, &mut cmd, core::app::NAME, &mut io::stdout());
}

/// Send a single message and print the reply. Exits non-zero if the send failed.
pub async fn run_single_prompt(args: &Args, config: &Config) -> RunResult {
    let prompt_arg = args.prompt.as_deref().unwrap_or_default();
    let prompt = if prompt_arg == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        prompt_arg.to_string()
    };
    let attachment = args
        .image
        .as_deref()
        .map(Attachment::from_path)
        .transpose()?;

    let client = ChatClient::new(config)?;
    let mut session = ChatSession::new().with_fallback(config.fallback.clone());
    let reply = session.send(&client, prompt.trim(), attachment).await?;
    if reply.is_error() {
        eprintln!("Error: {}", reply.display_text());
        std::process::exit(1);
    }
    if args.json {
        print_message(reply, true)?;
    } else {
        println!("{}", reply.display_text());
    }
    Ok(())
}

/// Parsed interactive input line.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Quit,
    NewChat,
    Attach(PathBuf),
    History,
    Send(String),
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some(("/image", path)) if !path.trim().is_empty() => {
            return Input::Attach(PathBuf::from(path.trim()));
        }
        _ => {}
    }
    match trimmed {
        "/quit" | "/exit" => Input::Quit,
        "/new" => Input::NewChat,
        "/history" => Input::History,
        cmd if cmd.starts_with('/') => Input::Unknown(cmd.to_string()),
        text => Input::Send(text.to_string()),
    }
}

/// Interactive chat on stdin/stdout. One message is in flight at a time.
pub async fn run_interactive(config: &Config, json: bool) -> RunResult {
    let client = ChatClient::new(config)?;
    let mut session = ChatSession::new().with_fallback(config.fallback.clone());
    let mut pending_image: Option<Attachment> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    log::info!("Interactive session for user {}", session.user_id());

    println!("Welcome to Product Search! Ask about products, attach images with /image <path>.");
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_input(&line) {
            Input::Quit => break,
            Input::NewChat => {
                session.new_chat();
                pending_image = None;
                println!("Started a new chat ({}).", session.thread_id());
            }
            Input::Attach(path) => match Attachment::from_path(&path) {
                Ok(image) => {
                    println!("Attached {} ({} bytes)", image.file_name, image.size());
                    pending_image = Some(image);
                }
                Err(e) => eprintln!("Error: {}", e),
            },
            Input::History => {
                for msg in session.messages() {
                    print_message(msg, json)?;
                }
            }
            Input::Unknown(cmd) => eprintln!("Unknown command: {}", cmd),
            Input::Send(text) => {
                if text.is_empty() && pending_image.is_none() {
                    continue;
                }
                // The attachment is consumed whether or not the send succeeds.
                match session.send(&client, &text, pending_image.take()).await {
                    Ok(reply) => print_message(reply, json)?,
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
        }
    }
    Ok(())
}
