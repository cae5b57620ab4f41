//! livetweak dev host
//!
//! Exposes the sample tweakables in [`tweaks`] over a JSON-lines protocol on
//! stdin/stdout. Each input line is either a command object, e.g.
//!
//! ```text
//! {"type":"SetValue","entryId":"livetweak_devhost::tweaks:MASTER_VOLUME","value":"0.5"}
//! ```
//!
//! or one of the plain words `schema`, `rescan` and `quit`. Commands are
//! queued by a reader thread and applied on the main thread once per frame.

mod tweaks;

use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use livetweak_core::{logging, CommandQueue, ConfigFile, Dispatcher, TweakConfig};
use livetweak_sdk::{TweakCommand, TweakCommandResult};

/// Main loop frame time
const FRAME: Duration = Duration::from_millis(16);

fn main() {
    let config = TweakConfig::load().unwrap_or_else(|e| {
        eprintln!("Using default config: {}", e);
        TweakConfig::default()
    });
    logging::init(&config);

    tracing::info!("Hello, live tweak developer!");

    let dispatcher = Arc::new(Dispatcher::new().with_config(&config));
    let queue = CommandQueue::from_config(&config);
    let running = Arc::new(AtomicBool::new(true));

    tracing::info!("{} tweakable entries", dispatcher.schema().len());

    let reader = {
        let dispatcher = dispatcher.clone();
        let queue = queue.clone();
        let running = running.clone();
        std::thread::spawn(move || read_commands(&dispatcher, &queue, &running))
    };

    while running.load(Ordering::SeqCst) {
        queue.pump(&dispatcher);
        std::thread::sleep(FRAME);
    }
    queue.pump(&dispatcher);

    if reader.join().is_err() {
        tracing::error!("Command reader thread panicked");
    }
    tracing::info!("Dev host shutting down");
}

/// Read stdin lines until EOF or `quit`
fn read_commands(dispatcher: &Dispatcher, queue: &CommandQueue, running: &AtomicBool) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read stdin: {}", e);
                break;
            }
        };

        match line.trim() {
            "" => continue,
            "quit" => break,
            "schema" => emit(&dispatcher.schema()),
            "rescan" => {
                let count = dispatcher.rescan();
                emit(&TweakCommandResult::success(format!("Rescanned {} entries", count), None));
            }
            text => emit(&submit(queue, text)),
        }
    }
    running.store(false, Ordering::SeqCst);
}

/// Queue one command and wait for the main thread to apply it
fn submit(queue: &CommandQueue, text: &str) -> TweakCommandResult {
    let command: TweakCommand = match serde_json::from_str(text) {
        Ok(command) => command,
        Err(e) => return TweakCommandResult::failure(format!("Invalid command: {}", e)),
    };

    match queue.submit_blocking(command) {
        Ok(reply) => reply
            .recv()
            .unwrap_or_else(|_| TweakCommandResult::failure("Command was dropped")),
        Err(e) => TweakCommandResult::failure(e.to_string()),
    }
}

fn emit<T: serde::Serialize + ?Sized>(value: &T) {
    let mut stdout = std::io::stdout().lock();
    let written = serde_json::to_writer(&mut stdout, value).is_ok() && writeln!(stdout).is_ok();
    if !written || stdout.flush().is_err() {
        tracing::warn!("Failed to write to stdout");
    }
}
