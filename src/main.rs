// AgentView - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation
// 3. Headless one-shot modes (--query, --fetch-logs), attached to the
//    parent console on Windows
// 4. eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` can use
// `crate::app::...`, `crate::core::...` etc.
pub use agentview::app;
pub use agentview::core;
pub use agentview::platform;
pub use agentview::ui;
pub use agentview::util;

use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// AgentView - client for a multi-agent assistant backend.
///
/// Opens a window to submit queries and watch backend logs. With --query or
/// --fetch-logs it runs once in the terminal instead.
#[derive(Parser, Debug)]
#[command(name = "AgentView", version, about)]
struct Cli {
    /// Backend base address (overrides [backend] base_url).
    #[arg(short = 'u', long = "base-url")]
    base_url: Option<String>,

    /// Config file to use instead of the platform default.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Run a single query, print the response, and exit.
    #[arg(short = 'q', long = "query", conflicts_with = "fetch_logs")]
    query: Option<String>,

    /// Fetch the log collection, print it as JSON, and exit.
    #[arg(long = "fetch-logs")]
    fetch_logs: bool,

    /// Do not subscribe to live log updates.
    #[arg(long = "no-live")]
    no_live: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let headless = cli.query.is_some() || cli.fetch_logs;
    if headless {
        platform::console::attach_parent_console();
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "AgentView failed to start");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> util::error::Result<ExitCode> {
    // Config is loaded before logging exists; its warnings are replayed below.
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| platform::config::PlatformPaths::resolve().config_file);
    let (mut config, mut warnings) = platform::config::load_config(&config_path);

    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        "AgentView starting"
    );
    for warning in &warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    // CLI overrides
    if let Some(ref url) = cli.base_url {
        config.base_url = platform::config::validate_base_url(url)?;
    }
    if cli.no_live {
        config.live_logs_enabled = false;
    }

    let backend = platform::http::HttpBackend::new(&config.base_url, config.request_timeout)?;

    if let Some(ref query) = cli.query {
        let ok = app::headless::run_query(&backend, query, &mut io::stdout().lock());
        return Ok(exit_code(ok));
    }
    if cli.fetch_logs {
        let ok = app::headless::run_fetch_logs(&backend, &mut io::stdout().lock());
        return Ok(exit_code(ok));
    }

    let mut state = app::state::ViewState::new(
        config.base_url.clone(),
        config.live_logs_enabled,
        cli.debug,
    );
    if !warnings.is_empty() {
        state.status_message = format!(
            "Started with {} config warning(s). See View > Warnings.",
            warnings.len()
        );
    }
    state.warnings.append(&mut warnings);

    let view = app::view::QueryView::new(Arc::new(backend), state);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([900.0, 760.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let dark_mode = config.dark_mode;
    let font_size = config.font_size;
    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |cc| {
            ui::theme::apply(&cc.egui_ctx, dark_mode, font_size);
            Ok(Box::new(gui::AgentViewApp::new(view)))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch AgentView GUI: {e}");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Map a headless run to the process exit status.
fn exit_code(result: io::Result<bool>) -> ExitCode {
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "Failed to write output");
            ExitCode::FAILURE
        }
    }
}
