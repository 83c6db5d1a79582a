use std::fs::OpenOptions;
use std::process::ExitCode;
use std::sync::Mutex;

mod controller;
mod dashboard;
mod datatable;
mod domain;
mod form;
mod inputter;
mod model;
mod resources;
mod ui;

use clap::{Parser, ValueEnum};
use ratatui::DefaultTerminal;
use ratatui::style::Color;
use tracing::{error, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use controller::Controller;
use domain::{CMSConfig, CMSError, Features};
use model::{Model, Status};
use ui::AppUI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Feature {
    Pages,
    Blog,
    Media,
    Users,
    Settings,
}

#[derive(Debug, Parser)]
#[command(name = "cmsdash", about = "Terminal admin dashboard for a small CMS", version)]
struct Args {
    /// Name shown on top of the sidebar.
    #[arg(long, default_value = "Admin CMS")]
    site_name: String,

    /// Hide a screen. Can be given multiple times.
    #[arg(long, value_enum, value_name = "FEATURE")]
    disable: Vec<Feature>,

    /// Milliseconds to wait for input before redrawing.
    #[arg(long, default_value = "100")]
    poll_ms: u64,

    /// Seconds a notification stays visible.
    #[arg(long, default_value = "4")]
    toast_secs: u64,

    /// Highlight color, a name like `magenta` or a hex value like `#ff8800`.
    #[arg(long, default_value = "cyan", value_name = "COLOR")]
    accent: Color,

    /// Log destination, `~` and environment variables are expanded.
    #[arg(long, default_value = "~/.cmsdash.log", value_name = "PATH")]
    log_file: String,

    /// Used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn config(&self) -> CMSConfig {
        let features = self
            .disable
            .iter()
            .fold(Features::default(), |features, f| match f {
                Feature::Pages => features.pages(false),
                Feature::Blog => features.blog(false),
                Feature::Media => features.media(false),
                Feature::Users => features.users(false),
                Feature::Settings => features.settings(false),
            });
        CMSConfig::default()
            .site_name(self.site_name.as_str())
            .features(features)
            .event_poll_time(self.poll_ms)
            .toast_duration_secs(self.toast_secs)
            .accent(self.accent)
    }
}

fn setup_logging(args: &Args) -> Result<(), CMSError> {
    let path = shellexpand::full(&args.log_file)
        .map_err(|e| CMSError::LoggingSetup(e.to_string()))?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path.as_ref())?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .finish()
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| CMSError::LoggingSetup(e.to_string()))
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Err(e) => {
            error!("Exiting with error: {}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn run(args: &Args) -> Result<(), CMSError> {
    setup_logging(args)?;
    let cfg = args.config();

    let mut model = Model::init(&cfg);
    let mut ui = AppUI::new(&cfg);
    let controller = Controller::new(&cfg);

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut model, &mut ui, &controller);
    ratatui::restore();
    info!("Terminal restored");
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    model: &mut Model,
    ui: &mut AppUI,
    controller: &Controller,
) -> Result<(), CMSError> {
    while model.status != Status::Quitting {
        // Render the current view
        terminal.draw(|f| ui.draw(model, f))?;

        // Handle events and map to a Message
        let message = controller.handle_event(model)?;
        model.update(message)?;
    }
    Ok(())
}
