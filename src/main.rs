mod app;
mod components;
mod config;
mod error;
mod event;
mod fs;
mod handler;
mod logging;
mod opener;
mod search;
mod theme;
mod tui;
mod ui;
mod viewport;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;

use crate::app::{App, Options};
use crate::config::{AppConfig, GeneralConfig};
use crate::error::{AppError, Result};
use crate::event::Event;
use crate::opener::SystemLauncher;
use crate::tui::{install_panic_hook, terminal_rows, Tui};

/// Browse nested directories in one flattened, sortable list.
#[derive(Parser, Debug)]
#[command(name = "fl", version, about)]
struct Cli {
    /// Directories to list before the current one
    paths: Vec<PathBuf>,

    /// Open files with the system opener (xdg-open)
    #[arg(short = 'E', long)]
    external: bool,

    /// Open files in $EDITOR (default; wins over -E)
    #[arg(short = 'I', long)]
    internal: bool,

    /// Disable deleting files
    #[arg(short = 'D', long = "no-delete", visible_alias = "dumb")]
    no_delete: bool,

    /// Change to this directory before starting
    #[arg(short = 'd', long)]
    directory: Option<PathBuf>,

    /// Path to a config file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Config values set explicitly on the command line.
    fn overrides(&self) -> AppConfig {
        let external = if self.internal {
            Some(false)
        } else if self.external {
            Some(true)
        } else {
            None
        };
        AppConfig {
            general: GeneralConfig {
                external,
                allow_delete: self.no_delete.then_some(false),
                editor: None,
            },
            ..Default::default()
        }
    }
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(cwd) => println!("{}", cwd.display()),
        Err(e) => {
            tracing::error!(error = %e, "fatal");
            eprintln!("fl: {e}");
            std::process::exit(1);
        }
    }
}

/// Run a session; returns the final working directory.
fn run(cli: Cli) -> Result<PathBuf> {
    if !std::io::stdin().is_terminal() {
        return Err(AppError::Terminal("stdin is not a terminal".into()));
    }

    if let Some(dir) = &cli.directory {
        std::env::set_current_dir(dir)
            .map_err(|e| AppError::InvalidPath(format!("{}: {}", dir.display(), e)))?;
    }

    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));
    if let Err(e) = logging::init_logging(&config.log_file()) {
        eprintln!("Warning: {e}");
    }
    let theme = theme::resolve_theme(&config.theme);

    let options = Options {
        open_external: config.open_external(),
        allow_delete: config.allow_delete(),
        editor: config.editor(),
    };

    // Query the size before raw mode, so a failure leaves the terminal as is.
    let rows = terminal_rows()?;
    let mut app = App::new(options, config.backup_dir(), rows);
    app.load_roots(&cli.paths);
    let mut launcher = SystemLauncher::new();

    install_panic_hook();
    let mut tui = Tui::new()?;
    tracing::info!(
        entries = app.store.len(),
        theme = config.theme_scheme(),
        "session started"
    );

    let result = event_loop(&mut app, &mut tui, &mut launcher, &theme);
    tui.restore()?;
    result?;

    tracing::info!("session ended");
    Ok(std::env::current_dir()?)
}

fn event_loop(
    app: &mut App,
    tui: &mut Tui,
    launcher: &mut SystemLauncher,
    theme: &theme::ThemeColors,
) -> Result<()> {
    while !app.should_quit {
        tui.terminal_mut().draw(|frame| ui::render(app, theme, frame))?;

        match event::next_event()? {
            Event::Key(key) => {
                app.clear_expired_status();
                handler::handle_key_event(app, key);
            }
            Event::Resize(_, rows) => app.viewport.resize(rows),
            Event::Other => {}
        }

        if app.pending_open.is_some() {
            app.open_pending(tui, launcher);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_parse() {
        let cli = Cli::try_parse_from(["fl", "-E", "-D", "-d", "/tmp", "a", "b"]).unwrap();
        assert!(cli.external);
        assert!(cli.no_delete);
        assert_eq!(cli.directory, Some(PathBuf::from("/tmp")));
        assert_eq!(cli.paths, vec![PathBuf::from("a"), PathBuf::from("b")]);
    }

    #[test]
    fn dumb_is_alias_for_no_delete() {
        let cli = Cli::try_parse_from(["fl", "--dumb"]).unwrap();
        assert!(cli.no_delete);
    }

    #[test]
    fn internal_wins_over_external() {
        for args in [["fl", "-E", "-I"], ["fl", "-I", "-E"]] {
            let cli = Cli::try_parse_from(args).unwrap();
            assert_eq!(cli.overrides().general.external, Some(false));
        }
    }

    #[test]
    fn overrides_only_set_given_flags() {
        let cli = Cli::try_parse_from(["fl"]).unwrap();
        let o = cli.overrides();
        assert!(o.general.external.is_none());
        assert!(o.general.allow_delete.is_none());

        let cli = Cli::try_parse_from(["fl", "-I", "-D"]).unwrap();
        let o = cli.overrides();
        assert_eq!(o.general.external, Some(false));
        assert_eq!(o.general.allow_delete, Some(false));
    }

    #[test]
    fn cli_debug_assert() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
