use std::io::Stdout;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod app;
mod builtin;
mod config;
mod message;
mod registry;
mod task;
mod widget;

use config::{resolve_config_path, ConfigFile, WidgetConfig};

const LOG_DIR_ENV: &str = "TERMPANE_LOG_DIR";
const USAGE: &str = "usage: termpane [--config <path>] [--title <title>] [--version]";

#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    config: Option<PathBuf>,
    title: Option<String>,
}

enum CliAction {
    Run(CliArgs),
    Version,
    Help,
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(CliAction::Run(cli)) => cli,
        Ok(CliAction::Version) => {
            println!("termpane {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Ok(CliAction::Help) => {
            println!("{USAGE}");
            return Ok(());
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let _log_guard = init_logging()?;
    install_panic_hook();
    let config = build_config(cli)?;
    info!(title = %config.title, entries = config.registry.len(), "starting");

    let mut terminal = setup_terminal()?;
    let result = app::run_app(&mut terminal, config);
    restore_terminal(&mut terminal)?;
    result
}

fn parse_args(args: &[String]) -> Result<CliAction> {
    let mut cli = CliArgs::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--version" | "-v" => return Ok(CliAction::Version),
            "--help" | "-h" => return Ok(CliAction::Help),
            "--config" | "-c" => {
                let Some(path) = iter.next() else {
                    bail!("--config needs a path\n{USAGE}");
                };
                cli.config = Some(PathBuf::from(path));
            }
            "--title" | "-t" => {
                let Some(title) = iter.next() else {
                    bail!("--title needs a value\n{USAGE}");
                };
                cli.title = Some(title.clone());
            }
            unknown => bail!("unknown argument: {unknown}"),
        }
    }
    Ok(CliAction::Run(cli))
}

/// Built-in tasks first, the config file layered on top, then CLI overrides.
fn build_config(cli: CliArgs) -> Result<WidgetConfig> {
    let base = builtin::builtin_registry();
    let file = match resolve_config_path(cli.config) {
        Some(path) => ConfigFile::load(&path).context("load config")?,
        None => ConfigFile::default(),
    };
    let mut config = file.into_widget_config(base);
    if let Some(title) = cli.title {
        config.title = title;
    }
    Ok(config)
}

/// The TUI owns stdout/stderr, so logs only go to a file when asked for.
fn init_logging() -> Result<Option<WorkerGuard>> {
    let Some(dir) = std::env::var_os(LOG_DIR_ENV) else {
        return Ok(None);
    };
    let appender = tracing_appender::rolling::never(dir, "termpane.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("install log subscriber: {err}"))?;
    Ok(Some(guard))
}

/// A panicking task is already turned into a rejection by the runner, so on
/// task threads the panic is only logged; printing it would garble the pane.
/// Any other panic leaves the alternate screen before the default report.
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let thread = std::thread::current();
        if task::is_task_thread(thread.name()) {
            error!(
                thread = thread.name().unwrap_or_default(),
                panic = %info,
                "task panicked"
            );
            return;
        }
        let _ = crossterm::execute!(
            std::io::stdout(),
            DisableBracketedPaste,
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            LeaveAlternateScreen,
            crossterm::cursor::Show
        );
        let _ = disable_raw_mode();
        previous(info);
    }));
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("enable raw mode")?;
    crossterm::execute!(std::io::stdout(), EnterAlternateScreen, EnableMouseCapture)
        .context("enter alternate screen")?;

    if matches!(supports_keyboard_enhancement(), Ok(true)) {
        crossterm::execute!(
            std::io::stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )
        .ok();
    }
    crossterm::execute!(std::io::stdout(), EnableBracketedPaste).ok();

    let mut terminal =
        Terminal::new(CrosstermBackend::new(std::io::stdout())).context("create terminal")?;
    terminal.hide_cursor().ok();
    terminal.clear().context("clear terminal")?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    crossterm::execute!(std::io::stdout(), DisableBracketedPaste).ok();
    crossterm::execute!(std::io::stdout(), PopKeyboardEnhancementFlags).ok();
    disable_raw_mode().context("disable raw mode")?;
    crossterm::execute!(std::io::stdout(), DisableMouseCapture, LeaveAlternateScreen)
        .context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}
