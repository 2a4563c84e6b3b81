//! File watcher for incremental index updates

use anyhow::Result;
use colored::Colorize;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::time::Duration;
use tracing::debug;

use crate::indexer::IndexBuilder;
use ciq::store::INDEX_DIR;

/// Quiet period after a change before the rebuild starts. Editors tend to
/// emit bursts of events per save.
const DEBOUNCE: Duration = Duration::from_millis(500);

/// File system watcher
pub struct Watcher {
    root: PathBuf,
}

impl Watcher {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Start watching for file changes
    pub fn watch(&self) -> Result<()> {
        let (tx, rx) = channel();

        let config = Config::default().with_poll_interval(Duration::from_secs(2));
        let mut watcher = RecommendedWatcher::new(tx, config)?;
        watcher.watch(&self.root, RecursiveMode::Recursive)?;

        println!(
            "{} Watching {} for changes (Ctrl+C to stop)",
            "✓".green(),
            self.root.display()
        );

        let builder = IndexBuilder::new(&self.root)?;

        while let Ok(res) = rx.recv() {
            let trigger = match res {
                Ok(event) => should_reindex(&event),
                Err(e) => {
                    eprintln!("{} Watch error: {}", "✗".red(), e);
                    false
                }
            };
            if !trigger {
                continue;
            }

            drain_burst(&rx);

            println!("{} Change detected, reindexing...", "✓".cyan());
            match builder.build(false) {
                Ok(stats) => debug!(
                    indexed = stats.files_indexed,
                    removed = stats.files_removed,
                    "reindex complete"
                ),
                Err(e) => eprintln!("{} Reindex failed: {}", "✗".red(), e),
            }
        }

        Ok(())
    }
}

/// Swallow follow-up events so a burst of saves triggers one rebuild.
fn drain_burst(rx: &Receiver<std::result::Result<Event, notify::Error>>) {
    loop {
        match rx.recv_timeout(DEBOUNCE) {
            Ok(_) => continue,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

/// Check if event should trigger reindex. Writes to the index directory
/// itself must not (the rebuild would loop forever).
fn should_reindex(event: &Event) -> bool {
    use notify::EventKind::*;

    if !matches!(event.kind, Create(_) | Modify(_) | Remove(_)) {
        return false;
    }
    event.paths.iter().any(|path| !touches_index_dir(path))
}

fn touches_index_dir(path: &Path) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => name.to_str() == Some(INDEX_DIR),
        _ => false,
    })
}

/// Run the watch command
pub fn run(path: Option<&str>) -> Result<()> {
    let root = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };

    // Build initial index
    let builder = IndexBuilder::new(&root)?;
    let stats = builder.build(false)?;
    println!(
        "{} Indexed {} files ({} skipped)",
        "✓".green(),
        stats.files_indexed,
        stats.files_skipped
    );

    // Start watching
    let watcher = Watcher::new(&root);
    watcher.watch()
}
