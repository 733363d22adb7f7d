mod paths;

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::{Duration, Utc};
use clap::Parser;
use dirlisting::prelude::*;
use log::{error, info};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};

#[derive(Parser, Debug)]
#[command(name = "dirlisting-demo", about = "Drive a directory listing through a scripted session")]
struct Args {
    /// Listing config (TOML). Defaults to the platform config directory.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write logs to this file instead of the terminal
    #[arg(short, long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(args: &Args) -> Result<(), Box<dyn Error>> {
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    match &args.log_file {
        Some(path) => WriteLogger::init(level, Config::default(), File::create(path)?)?,
        None => TermLogger::init(
            level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )?,
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<ListingConfig, ListingError> {
    match args.config.clone().or_else(paths::default_config) {
        Some(path) => {
            info!("Loading config from {}", path.display());
            ListingConfig::load(path)
        }
        None => Ok(ListingConfig::default()),
    }
}

fn sample_model() -> MemoryModel {
    let now = Utc::now();
    MemoryModel::new()
        .with_dir("data")
        .with_dir("notebooks")
        .with_entry("README.md", EntryKind::File, Some(now - Duration::days(3)))
        .with_entry(
            "analysis.ipynb",
            EntryKind::Notebook,
            Some(now - Duration::hours(2)),
        )
        .with_entry("notes.txt", EntryKind::File, Some(now - Duration::minutes(5)))
        .with_file("data/notes.txt")
        .with_session("kernel-1", "analysis.ipynb", "Python 3")
}

/// Answer every overwrite prompt with yes and print errors.
fn spawn_dialog_host() -> ChannelDialogs {
    let (dialogs, mut requests) = ChannelDialogs::channel();
    tokio::spawn(async move {
        while let Some(request) = requests.recv().await {
            match request {
                DialogRequest::Confirm { title, body, reply } => {
                    println!("? {title}: {body} [yes]");
                    let _ = reply.send(true);
                }
                DialogRequest::Error { title, message } => {
                    println!("! {title}: {message}");
                }
            }
        }
    });
    dialogs
}

fn print_rows(label: &str, listing: &DirListing) {
    let dir = listing.model().path();
    println!("-- {label} (/{dir})");
    for row in listing.rows().rows() {
        let flags = &row.flags;
        let mark = |on: bool, c: char| if on { c } else { ' ' };
        println!(
            "  {}{}{}{} {:<20} {:<16} {}",
            mark(flags.selected, 'x'),
            mark(flags.cut, '~'),
            mark(flags.drop_target, '>'),
            mark(flags.running, '*'),
            row.name,
            row.modified_text,
            row.running_label.as_deref().unwrap_or("")
        );
    }
}

fn row_of(listing: &DirListing, name: &str) -> Option<usize> {
    listing.rows().rows().iter().position(|row| row.name == name)
}

fn at(index: usize) -> Position {
    Position::new(0, index as i32)
}

async fn click(listing: &mut DirListing, index: usize, modifiers: Modifiers) {
    listing
        .handle_event(ListingEvent::PointerDown {
            position: at(index),
            button: MouseButton::Left,
            modifiers,
        })
        .await;
    listing
        .handle_event(ListingEvent::PointerUp {
            position: at(index),
            button: MouseButton::Left,
        })
        .await;
}

async fn run(config: ListingConfig) -> Result<(), ListingError> {
    let model = Arc::new(sample_model());
    let mut listing = DirListing::new(model.clone(), Arc::new(spawn_dialog_host()), config)
        .with_locator(FixedRowLocator::new(0, 1));
    listing.set_viewport_height(10);
    listing.subscribe_open(|entry| println!("> open {}", entry.path));
    print_rows("initial", &listing);

    // Drag notes.txt onto data/, which already has one.
    let notes = row_of(&listing, "notes.txt").ok_or(ListingError::NoSelection)?;
    let data = row_of(&listing, "data").ok_or(ListingError::NoSelection)?;
    click(&mut listing, notes, Modifiers::NONE).await;
    listing
        .handle_event(ListingEvent::PointerDown {
            position: at(notes),
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        })
        .await;
    let started = listing
        .handle_event(ListingEvent::PointerMove {
            position: Position::new(8, notes as i32),
        })
        .await;
    if started == EventResult::StartDrag
        && let Some(session) = listing.drag_session()
    {
        let drop = DragEvent::new(at(data), DropAction::Move, session.payload.clone());
        let entered = listing
            .handle_event(ListingEvent::DragEnter(drop.clone()))
            .await;
        if entered.is_handled() {
            listing.handle_event(ListingEvent::Drop(drop)).await;
        }
        listing
            .handle_event(ListingEvent::DragEnded(DropAction::Move))
            .await;
    }
    print_rows("after drop", &listing);

    // Click, click again, wait: README.md goes into edit mode.
    let readme = row_of(&listing, "README.md").ok_or(ListingError::NoSelection)?;
    click(&mut listing, readme, Modifiers::NONE).await;
    click(&mut listing, readme, Modifiers::NONE).await;
    let delay = listing.config().rename_delay_duration();
    if listing.poll_timers(Instant::now() + delay) {
        for c in "INTRO".chars() {
            listing
                .handle_event(ListingEvent::Key(KeyCombo::key(Key::Char(c))))
                .await;
        }
        listing
            .handle_event(ListingEvent::Key(KeyCombo::key(Key::Enter)))
            .await;
    }
    print_rows("after rename", &listing);

    listing
        .handle_event(ListingEvent::HeaderClick(Header::Modified))
        .await;
    print_rows("sorted by modified", &listing);

    // Open the notebook, then copy it into notebooks/.
    let notebook = row_of(&listing, "analysis.ipynb").ok_or(ListingError::NoSelection)?;
    listing
        .handle_event(ListingEvent::DoubleClick {
            position: at(notebook),
            button: MouseButton::Left,
        })
        .await;
    click(&mut listing, notebook, Modifiers::NONE).await;
    listing.copy();
    let folder = row_of(&listing, "notebooks").ok_or(ListingError::NoSelection)?;
    listing
        .handle_event(ListingEvent::DoubleClick {
            position: at(folder),
            button: MouseButton::Left,
        })
        .await;
    listing.paste().await?;
    print_rows("after paste", &listing);

    info!("Requests: {:?}", model.mutations());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = load_config(&args)?;
    if let Err(e) = run(config).await {
        error!("Demo failed: {}", e);
        return Err(e.into());
    }
    Ok(())
}
