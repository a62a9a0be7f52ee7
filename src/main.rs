use anyhow::{bail, Context, Result};
use chatform::config::FormConfig;
use chatform::console::{parse_step, Session};
use chatform::core::{Answers, RouteTable, Step};
use chatform::flow::Flow;
use chatform::logging::init_logging;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// Conversational step-by-step form in the terminal
#[derive(Parser)]
#[command(name = "chatform")]
#[command(about = "chatform - Answer a short form one question at a time", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer the form interactively (default command)
    Run {
        /// Print the completion snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the location bound to each step
    Routes,
    /// Check whether a value would let a step be submitted
    Check {
        /// Step to check (email, phone, moved)
        #[arg(value_parser = parse_step)]
        step: Step,
        /// Value as it would be typed
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = FormConfig::discover(cli.config.as_deref()).context("Failed to load config")?;
    init_logging(cli.verbose, config.log_level.as_deref());
    debug!(?config, "Configuration loaded");

    match cli.command.unwrap_or(Commands::Run { json: false }) {
        Commands::Run { json } => run(&config, json).await,
        Commands::Routes => routes(),
        Commands::Check { step, value } => check(step, &value),
    }
}

async fn run(config: &FormConfig, json: bool) -> Result<()> {
    let mut session = Session::new(config).with_json(json);
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout();

    println!("Type :help for commands.");
    session.run(input, &mut out).await?;
    out.flush()?;
    Ok(())
}

fn routes() -> Result<()> {
    for (step, path) in RouteTable::standard().iter() {
        println!("{:>2}  {:<6} {}", step.ordinal(), step, path);
    }
    Ok(())
}

fn check(step: Step, value: &str) -> Result<()> {
    let flow = Flow::standard();
    let definition = flow.definition(step);
    let field = definition.primary_field();
    let answers = Answers::new().set_field(field, definition.sanitize(field, value));

    if !definition.is_complete(&answers) {
        bail!("{step} answer is incomplete: {value:?}");
    }
    println!("{step}: {}", definition.summarize(&answers).answer);
    Ok(())
}
