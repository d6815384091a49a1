//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod play;
pub mod settings;
pub mod tokens;

use std::error::Error;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cli::play::{run_play, PlayOptions, RevealOverrides};
use crate::cli::settings::{apply_set, apply_unset};
use crate::cli::tokens::print_tokens;
use crate::core::config::Config;
use crate::core::constants::LOG_FILTER_ENV;
use crate::core::reveal::RevealMode;

#[derive(Parser)]
#[command(name = "chatreveal")]
#[command(version)]
#[command(about = "Reveal chat replies in the terminal as if they were typed live")]
#[command(
    long_about = "Chatreveal reveals chat replies progressively, one character or one word \
at a time, without ever breaking inline formatting. Replies may carry follow-on \
blocks, which appear as separate bubbles once the previous one finishes.\n\n\
Supported markup:\n\
  **bold** __bold__  *italic* _italic_  `code`  ~~strike~~  [label](url)\n\n\
Environment Variables:\n\
  CHATREVEAL_LOG    tracing filter for diagnostics on stderr (default: warn)"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reveal a reply, followed by any chained blocks
    Play {
        /// Text of the reply
        text: String,
        /// Follow-on block, revealed as its own bubble (repeatable)
        #[arg(short = 'b', long = "block", value_name = "TEXT")]
        blocks: Vec<String>,
        /// Reveal granularity: character or word
        #[arg(short = 'm', long)]
        mode: Option<RevealMode>,
        /// Milliseconds between character ticks
        #[arg(short = 'i', long, value_name = "MS")]
        interval: Option<u64>,
        /// Show the reply fully formed, without animation
        #[arg(long)]
        no_animation: bool,
        /// User message shown before the reply
        #[arg(short = 'p', long, value_name = "TEXT")]
        prompt: Option<String>,
        /// Show a loading placeholder for this long before the reply
        #[arg(short = 'd', long, value_name = "MS", requires = "prompt")]
        delay: Option<u64>,
    },
    /// Print the markup tokens of a text as JSON
    Tokens {
        /// Text to tokenize
        text: String,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Set configuration values, or show them all when no key is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        value: Option<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async_main())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match args.command {
        Commands::Play {
            text,
            blocks,
            mode,
            interval,
            no_animation,
            prompt,
            delay,
        } => {
            let config = Config::load()?;
            let overrides = RevealOverrides {
                mode,
                interval_ms: interval,
                no_animation,
            };
            let options = PlayOptions {
                text,
                blocks,
                prompt,
                delay: delay.map(Duration::from_millis),
                settings: overrides.apply(config.reveal_settings()),
            };
            run_play(options).await
        }
        Commands::Tokens { text, pretty } => print_tokens(&text, pretty),
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            let Some(key) = key else {
                config.print_all();
                return Ok(());
            };
            let message = apply_set(&mut config, &key, value.as_deref())?;
            config.save()?;
            println!("{message}");
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            let message = apply_unset(&mut config, &key)?;
            config.save()?;
            println!("{message}");
            Ok(())
        }
    }
}
