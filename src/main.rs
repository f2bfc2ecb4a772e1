//! FRONT - a customer-experience wizard for your terminal.
//!
//! Walks a team through nine steps, from diagnosis to a proactive service
//! strategy, with a language model drafting each step's result.

#![allow(clippy::single_match_else)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use front_wizard::ai::{Gateway, GenerationGateway};
use front_wizard::core::Config;
use front_wizard::export;
use front_wizard::wizard::{self, Answers, Field, Language, StepController, StepId};

/// Customer-experience wizard for your terminal
#[derive(Parser)]
#[command(name = "front")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive wizard (default)
    #[cfg(feature = "tui")]
    Run {
        /// Language of the session
        #[arg(short, long)]
        language: Option<Language>,
    },

    /// Run every step from an answers file and export the results
    Batch {
        /// TOML file with the answers for each step
        answers: PathBuf,

        /// Directory to write exports to
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Language of the session (overrides the answers file)
        #[arg(short, long)]
        language: Option<Language>,
    },

    /// Ask the model to suggest a value for one field
    Suggest {
        /// Field to suggest (e.g. feeling, goal, adjectives)
        field: Field,

        /// Answers file used as context
        #[arg(short, long)]
        answers: Option<PathBuf>,

        /// Language of the suggestion
        #[arg(short, long)]
        language: Option<Language>,
    },

    /// List the wizard steps and their inputs
    Steps {
        /// Language of the labels
        #[arg(short, long)]
        language: Option<Language>,
    },

    /// Show current configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,

        /// Check that the configured providers answer
        #[arg(long)]
        check: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "tui")]
    let interactive = matches!(cli.command, None | Some(Commands::Run { .. }));
    #[cfg(not(feature = "tui"))]
    let interactive = false;

    init_logging(cli.verbose, interactive);

    match cli.command {
        #[cfg(feature = "tui")]
        None => cmd_run(None),
        #[cfg(not(feature = "tui"))]
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
        #[cfg(feature = "tui")]
        Some(Commands::Run { language }) => cmd_run(language),
        Some(Commands::Batch { answers, out, language }) => {
            cmd_batch(&answers, out.as_deref(), language)
        }
        Some(Commands::Suggest { field, answers, language }) => {
            cmd_suggest(field, answers.as_deref(), language)
        }
        Some(Commands::Steps { language }) => {
            cmd_steps(language);
            Ok(())
        }
        Some(Commands::Config { path, check }) => cmd_config(path, check),
        Some(Commands::Completions { shell }) => {
            cmd_completions(shell);
            Ok(())
        }
    }
}

/// Install the tracing subscriber.
///
/// The interactive wizard owns the terminal, so its log goes to a file in
/// the data directory instead of stderr.
fn init_logging(verbose: bool, interactive: bool) {
    let filter = if verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    if interactive {
        if let Some(file) = open_log_file() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(false).with_ansi(false).with_writer(file))
                .with(filter)
                .init();
            return;
        }
    }

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

fn open_log_file() -> Option<std::sync::Mutex<std::fs::File>> {
    let dir = Config::data_dir()?;
    std::fs::create_dir_all(&dir).ok()?;
    let file =
        std::fs::OpenOptions::new().create(true).append(true).open(dir.join("front.log")).ok()?;
    Some(std::sync::Mutex::new(file))
}

/// Build the gateway from configuration and the environment.
fn build_gateway(config: &Config) -> Result<Gateway> {
    let api_key = config.ai.resolve_api_key();
    let gateway = Gateway::from_config(&config.ai, api_key)?;
    tracing::debug!(provider = ?gateway.active_provider(), "Gateway ready");
    Ok(gateway)
}

/// Run the interactive wizard.
#[cfg(feature = "tui")]
fn cmd_run(language: Option<Language>) -> Result<()> {
    use front_wizard::{tui, App};

    let config = Config::load()?;
    let gateway = build_gateway(&config)?;
    let language = language.unwrap_or(config.general.language);

    let rt = tokio::runtime::Runtime::new()?;
    let controller = StepController::new(Arc::new(gateway), language);
    let app = App::new(controller, config, rt.handle().clone());

    tui::run_tui(app)
}

/// Run the whole wizard from an answers file.
fn cmd_batch(answers_path: &Path, out: Option<&Path>, language: Option<Language>) -> Result<()> {
    let config = Config::load()?;
    let answers = Answers::load(answers_path)
        .with_context(|| format!("Failed to read answers from {}", answers_path.display()))?;
    let language = language.or(answers.language).unwrap_or(config.general.language);
    let out_dir = out.map_or_else(|| config.general.export_dir.clone(), Path::to_path_buf);

    let gateway = build_gateway(&config)?;
    let mut controller = StepController::new(Arc::new(gateway), language);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(wizard::run_to_end(&mut controller, &answers, |step, _| {
        println!("✓ {}. {}", step.number(), step.label(language));
    }))?;

    let written = export::export_session(controller.session(), &out_dir)?;
    println!("\nExported {} files:", written.len());
    for path in written {
        println!("  {}", path.display());
    }

    Ok(())
}

/// Print one suggestion for `field`.
fn cmd_suggest(
    field: Field,
    answers_path: Option<&Path>,
    language: Option<Language>,
) -> Result<()> {
    if !field.is_suggestible() {
        anyhow::bail!("Suggestions are only available for the first three steps");
    }

    let config = Config::load()?;
    let answers = match answers_path {
        Some(path) => Answers::load(path)
            .with_context(|| format!("Failed to read answers from {}", path.display()))?,
        None => Answers::default(),
    };
    let language = language.or(answers.language).unwrap_or(config.general.language);

    let mut session = wizard::Session::new(language);
    for f in Field::ALL {
        session.set_field(f, answers.get(f));
    }

    let gateway = build_gateway(&config)?;
    let rt = tokio::runtime::Runtime::new()?;
    let suggestion = rt.block_on(gateway.generate_suggestion(
        field.prompt_label(),
        &session.suggestion_context(),
        language,
    ))?;

    println!("{suggestion}");
    Ok(())
}

/// List the steps with their inputs.
fn cmd_steps(language: Option<Language>) {
    let language = language.unwrap_or_default();

    for step in StepId::ALL {
        let kind = if step.is_generative() { " (generates a result)" } else { "" };
        println!("{}. {}{}", step.number(), step.label(language), kind);
        for field in step.fields() {
            let hint = if field.is_suggestible() { " (suggest)" } else { "" };
            println!("     - {} [{}]{}", field.label(language), field.key(), hint);
        }
        if step == StepId::Dashboard {
            println!("     - pick {} KPIs", wizard::REQUIRED_KPIS);
        }
    }
}

/// Show configuration.
fn cmd_config(show_path: bool, check: bool) -> Result<()> {
    if show_path {
        match Config::active_path() {
            Some(path) => println!("{}", path.display()),
            None => {
                if let Some(dir) = Config::config_dir() {
                    println!("{} (not created)", dir.join("config.toml").display());
                }
            }
        }
        return Ok(());
    }

    let config = Config::load()?;

    if check {
        let gateway = build_gateway(&config)?;
        let rt = tokio::runtime::Runtime::new()?;
        for (name, available) in rt.block_on(gateway.availability()) {
            let mark = if available { "✓" } else { "✗" };
            println!("{mark} {name}");
        }
        return Ok(());
    }

    let toml = toml::to_string_pretty(&config)?;
    println!("{toml}");

    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "front", &mut io::stdout());
}
