//! Area Focus
//!
//! Replays window manager events (one JSON object per line on stdin) through
//! the focus tracker and prints the focus decision after each event.

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use area_focus::{Config, WindowManager, WmEvent};

fn config_arg() -> Result<Option<PathBuf>> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" || arg == "-c" {
            let path = args.next().context("--config requires a path")?;
            return Ok(Some(PathBuf::from(path)));
        }
        warn!("Ignoring unknown argument {:?}", arg);
    }
    Ok(None)
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries one result per event
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "area_focus=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    info!("Starting Area focus tracker");

    let config = match config_arg()? {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };
    let mut wm = WindowManager::new(&config);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for (line_no, line) in stdin.lock().lines().enumerate() {
        let line = line.context("Failed to read event from stdin")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let event: WmEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                warn!("Line {}: malformed event: {}", line_no + 1, e);
                continue;
            }
        };
        debug!("Line {}: {:?}", line_no + 1, event);

        match wm.handle_event(event) {
            Ok(result) => {
                serde_json::to_writer(&mut stdout, &result)
                    .context("Failed to write result")?;
                writeln!(stdout)?;
            }
            Err(e) => warn!("Line {}: event rejected: {}", line_no + 1, e),
        }
    }

    info!(
        "Input closed; {} clients managed, focused={:?}",
        wm.clients().len(),
        wm.focused()
    );
    Ok(())
}
