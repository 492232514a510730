mod candidates;
mod remote;

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::writer::BoxMakeWriter};
use typeahead_engine::{Controller, ControllerConfig, WindowEventHub};
use typeahead_tui::{InputRow, TypeaheadView, run_picker};
use typeahead_types::Effect;
use typeahead_util::TypeaheadSettings;

use crate::candidates::load_candidates;
use crate::remote::{DEFAULT_LATENCY, RemoteCatalog};

/// Pick one entry from a list by typing part of it.
#[derive(Debug, Parser)]
#[command(name = "typeahead", version, about)]
struct Args {
    /// Local candidates: a JSON array of strings or one entry per line
    #[arg(long, value_name = "FILE")]
    candidates: Option<PathBuf>,

    /// Larger catalog searched asynchronously once enough text is typed
    #[arg(long, value_name = "FILE")]
    remote: Option<PathBuf>,

    /// Simulated latency of the remote catalog
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_LATENCY.as_millis() as u64)]
    remote_latency_ms: u64,

    /// Characters required before the remote catalog is searched
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    min_search_chars: Option<i64>,

    /// Debounce and throttle delay for remote searches
    #[arg(long, value_name = "MS")]
    throttle_ms: Option<u64>,

    #[arg(long, value_name = "TEXT")]
    placeholder: Option<String>,

    /// Prompt shown in front of a new entry
    #[arg(long, value_name = "TEXT")]
    prompt: Option<String>,

    /// Offer to create the typed text when nothing matches
    #[arg(long)]
    allow_create: bool,

    /// Start with this entry selected
    #[arg(long, value_name = "LABEL")]
    select: Option<String>,

    /// Title drawn on the input border
    #[arg(long, value_name = "TEXT")]
    title: Option<String>,

    /// Where the input line sits in the terminal
    #[arg(long, value_enum, default_value_t = Position::Center)]
    position: Position,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Write logs here (the terminal is busy with the picker)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Position {
    Top,
    Center,
    Bottom,
}

impl From<Position> for InputRow {
    fn from(position: Position) -> Self {
        match position {
            Position::Top => InputRow::Top,
            Position::Center => InputRow::Center,
            Position::Bottom => InputRow::Bottom,
        }
    }
}

/// What the user ended up with.
#[derive(Debug, PartialEq, Eq, Serialize)]
struct Picked {
    label: String,
    is_new: bool,
}

impl Picked {
    /// The committed entry among `effects`, if any.
    fn from_effects(effects: &[Effect<String>]) -> Option<Self> {
        effects.iter().rev().find_map(|effect| match effect {
            Effect::Create(label) => Some(Picked {
                label: label.clone(),
                is_new: true,
            }),
            Effect::Select(Some(label)) => Some(Picked {
                label: label.clone(),
                is_new: false,
            }),
            _ => None,
        })
    }

    fn render(&self, json: bool) -> Result<String> {
        if json {
            return serde_json::to_string(self).context("failed to encode the result");
        }
        Ok(if self.is_new {
            format!("new: {}", self.label)
        } else {
            self.label.clone()
        })
    }
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let writer = match log_file {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("failed to create log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::sink),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn build_config(args: &Args, settings: &TypeaheadSettings, candidates: Vec<String>) -> ControllerConfig<String> {
    let mut config = ControllerConfig::new(candidates, |label: &String| label.clone()).apply_settings(settings);
    if let Some(min) = args.min_search_chars {
        config = config.with_min_search_chars(min);
    }
    if let Some(ms) = args.throttle_ms {
        config = config.with_throttle_delay(Duration::from_millis(ms));
    }
    if let Some(placeholder) = &args.placeholder {
        config = config.with_placeholder(placeholder.clone());
    }
    if let Some(prompt) = &args.prompt {
        config = config.with_new_item_prompt(prompt.clone());
    }
    if args.allow_create {
        config = config.with_create_new(true);
    }
    config.with_selected_option(args.select.clone())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.log_file.as_ref())?;

    if args.candidates.is_none() && args.remote.is_none() {
        bail!("nothing to pick from: pass --candidates and/or --remote");
    }
    let settings = TypeaheadSettings::load().context("failed to load settings")?;
    let candidates = match &args.candidates {
        Some(path) => load_candidates(path)?,
        None => Vec::new(),
    };
    info!(count = candidates.len(), "loaded candidates");

    let mut config = build_config(&args, &settings, candidates);
    let mut remote_results = None;
    if let Some(path) = &args.remote {
        let catalog = RemoteCatalog::new(load_candidates(path)?, Duration::from_millis(args.remote_latency_ms));
        let (handler, results) = catalog.into_search();
        config = config.with_search(handler);
        remote_results = Some(results);
    }

    let hub = WindowEventHub::new();
    let controller = Controller::mount(config, &hub);
    let mut view = TypeaheadView::default().with_input_row(args.position.into());
    if let Some(title) = &args.title {
        view = view.with_title(title.clone());
    }

    let effects = run_picker(controller, hub, view, remote_results).await?;
    match Picked::from_effects(&effects) {
        Some(picked) => {
            info!(label = %picked.label, is_new = picked.is_new, "picked");
            println!("{}", picked.render(args.json)?);
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(ExitCode::from(1)),
    }
}
