//! Ctrl-C handling
//!
//! The first interrupt raises the [`CancelFlag`] so puzzles that have not
//! started are skipped while running ones finish. A second interrupt exits
//! immediately.

use crate::executor::CancelFlag;
use crate::output::EXIT_INTERRUPTED;
use std::io;
use std::thread;
use tracing::warn;

/// Listen for Ctrl-C on a background thread
pub fn install(cancel: CancelFlag) -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    thread::Builder::new()
        .name("aoc-interrupt".to_string())
        .spawn(move || {
            runtime.block_on(async move {
                if tokio::signal::ctrl_c().await.is_err() {
                    return;
                }
                eprintln!("\nInterrupted, finishing running puzzles (Ctrl-C again to abort)...");
                cancel.cancel();

                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("aborting on second interrupt");
                    std::process::exit(i32::from(EXIT_INTERRUPTED));
                }
            })
        })?;
    Ok(())
}
