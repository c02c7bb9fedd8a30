mod app;
mod ui;

use std::fs::OpenOptions;
use std::io::stdout;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use mergepane_config::Config;
use mergepane_engine::{
    ConflictRegion, ConflictTracker, Direction, DocumentSource, MergeSession, Side, Workspace,
    reconstruct,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;

/// Resolve git conflict markers with current, merged and incoming side by side.
#[derive(Parser, Debug)]
#[command(name = "mergepane", version, args_conflicts_with_subcommands = true)]
struct Cli {
    /// File to open in the three-pane view.
    file: Option<PathBuf>,

    /// Write logs of the interactive view to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the three-pane view.
    View {
        file: PathBuf,

        /// Write logs to this file.
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// List the conflicts in a file.
    List { file: PathBuf },

    /// Print one side's line-aligned projection.
    Show {
        file: PathBuf,

        /// current or incoming.
        #[arg(short, long)]
        side: Side,
    },

    /// Accept one side and write the file back.
    Accept {
        file: PathBuf,

        /// current or incoming.
        #[arg(short, long)]
        side: Side,

        /// 1-based conflict number.
        #[arg(short, long, default_value = "1", conflicts_with = "all")]
        conflict: usize,

        /// Accept the side for every conflict.
        #[arg(long)]
        all: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().context("Failed to load config file")?;

    match cli.command {
        Some(Commands::View { file, log_file }) => run_view(&file, log_file, config),
        Some(Commands::List { file }) => {
            init_logging(None)?;
            list(&file)
        }
        Some(Commands::Show { file, side }) => {
            init_logging(None)?;
            show(&file, side)
        }
        Some(Commands::Accept {
            file,
            side,
            conflict,
            all,
        }) => {
            init_logging(None)?;
            accept(&file, side, conflict, all)
        }
        None => match cli.file {
            Some(file) => run_view(&file, cli.log_file, config),
            None => bail!("Usage: mergepane <file> or mergepane <command>, see --help"),
        },
    }
}

/// Interactive sessions log to a file or not at all, since the view owns
/// the terminal. Everything else logs warnings to stderr. `RUST_LOG`
/// overrides the level either way.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder
            .filter_level(log::LevelFilter::Debug)
            .parse_default_env()
            .target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn open(path: &Path) -> Result<(Workspace, Vec<ConflictRegion>)> {
    let mut workspace = Workspace::new();
    let tracker = ConflictTracker::new().create_tracker("commands");
    let document = workspace
        .open_document(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let regions = tracker.get_conflicts(document).to_vec();
    Ok((workspace, regions))
}

fn list(path: &Path) -> Result<()> {
    let (_, regions) = open(path)?;
    if regions.is_empty() {
        println!("No merge conflicts found in {}", path.display());
        return Ok(());
    }

    for (i, region) in regions.iter().enumerate() {
        println!(
            "conflict {}: lines {}-{}",
            i + 1,
            region.range.start + 1,
            region.range.end
        );
        let mut sections = vec![("current", &region.current)];
        sections.extend(region.common_ancestors.iter().map(|s| ("base", s)));
        sections.push(("incoming", &region.incoming));
        for (name, section) in sections {
            let label = section
                .label
                .as_deref()
                .map(|l| format!(" ({l})"))
                .unwrap_or_default();
            if section.is_empty {
                println!("  {name}{label}: empty");
            } else {
                println!(
                    "  {name}{label}: lines {}-{}",
                    section.lines.start + 1,
                    section.lines.end
                );
            }
        }
    }
    Ok(())
}

fn show(path: &Path, side: Side) -> Result<()> {
    let (workspace, regions) = open(path)?;
    let document = workspace
        .document(path)
        .with_context(|| format!("{} is not open", path.display()))?;
    print!("{}", reconstruct(document, &regions, side));
    Ok(())
}

fn accept(path: &Path, side: Side, conflict: usize, all: bool) -> Result<()> {
    let mut workspace = Workspace::new();
    let tracker = ConflictTracker::new().create_tracker("commands");
    let mut session = MergeSession::open(&mut workspace, tracker, path)?;

    if all {
        let count = session.accept_all(&mut workspace, side)?;
        println!("Accepted {side} for {count} conflict(s) in {}", path.display());
    } else {
        let regions = session.conflicts(&workspace)?;
        let Some(region) = conflict.checked_sub(1).and_then(|i| regions.get(i)) else {
            bail!(
                "conflict {conflict} is out of range, {} has {} conflict(s)",
                path.display(),
                regions.len()
            );
        };
        session.accept(&mut workspace, region, side)?;
        println!("Accepted {side} for conflict {conflict} in {}", path.display());
    }

    workspace
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn run_view(path: &Path, log_file: Option<PathBuf>, config: Config) -> Result<()> {
    let log_file = log_file.or_else(|| config.log_file.clone());
    if let Some(log_file) = &log_file {
        init_logging(Some(log_file))?;
    }
    log::info!("mergepane opening {}", path.display());

    let mut app = App::open(path, config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }
    if app.dirty {
        println!("Unsaved changes to {} were discarded", app.path().display());
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui::ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
                KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
                KeyCode::PageDown => app.move_cursor(20),
                KeyCode::PageUp => app.move_cursor(-20),
                KeyCode::Char('J') => app.scroll_sides(1),
                KeyCode::Char('K') => app.scroll_sides(-1),
                KeyCode::Char('n') => app.navigate(Direction::Forwards),
                KeyCode::Char('p') => app.navigate(Direction::Backwards),
                KeyCode::Char('c') => app.accept(Side::Current),
                KeyCode::Char('i') => app.accept(Side::Incoming),
                KeyCode::Char('a') => app.accept_selection(),
                KeyCode::Char('s') => app.save(),
                _ => {}
            }
        }
    }
}
