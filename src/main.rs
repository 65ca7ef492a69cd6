use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pagetree::actions::{self, Action};
use pagetree::app::AppState;
use pagetree::config::{load_config, CliArgs};
use pagetree::logging::{self, LogTarget};
use pagetree::store::{JsonFileStore, StoreError, TreeStore};
use pagetree::{event, ui};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{error, info};

fn main() -> Result<()> {
    // Parse command line arguments
    let args = CliArgs::parse();

    // Load configuration
    let config = load_config(&args)?;

    if args.debug_config {
        println!("Configuration:");
        println!("{:#?}", config);
        return Ok(());
    }

    // The editor owns the terminal, so it can only log to a file
    let log_target = if args.print {
        LogTarget::Stderr
    } else {
        config
            .log_file
            .clone()
            .or_else(logging::default_log_path)
            .map(LogTarget::File)
            .unwrap_or(LogTarget::Stderr)
    };
    logging::setup_logging(args.debug, &log_target)?;

    // Create application state
    let mut app = AppState::new(config);

    // Load file if provided
    if let Some(ref filename) = args.filename {
        let store = JsonFileStore::new(filename, app.config.format, app.config.orphan_policy());
        match store.load() {
            Ok(tree) => app.load_tree(tree),
            Err(StoreError::NotFound(_)) if !args.print => {
                info!(path = %filename.display(), "starting a new document");
                app.set_message(format!("New file {}", filename.display()));
            }
            Err(e) => {
                return Err(e).with_context(|| format!("cannot load {}", filename.display()));
            }
        }
        app.store = Some(store);
    }

    if args.print {
        println!(
            "{}",
            ui::outline_text(&app.tree, app.config.indent_width as usize)
        );
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Clear the terminal
    terminal.clear()?;
    app.terminal_height = terminal.size()?.height;

    // Run the main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Handle any errors from the main loop
    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
) -> Result<()> {
    while app.running {
        // Draw the UI
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle events
        if let Some(action) = event::handle_events(app)? {
            // Pointer moves keep whatever the last action reported
            if !matches!(action, Action::DragTo { .. } | Action::Scroll(_)) {
                app.clear_message();
            }
            if let Err(e) = actions::execute_action(action, app) {
                error!("{:#}", e);
                app.set_message(format!("Error: {}", e));
            }
        }
    }

    Ok(())
}
