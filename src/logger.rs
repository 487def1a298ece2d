use std::{collections::VecDeque, io::Write, sync::Mutex};

use log::{LevelFilter, Log, Metadata, Record};
use once_cell::sync::Lazy;

/// Maximum number of messages kept for the host to drain.
const LOG_STORE_CAPACITY: usize = 1024;

static LOG_STORE: Lazy<Mutex<VecDeque<String>>> =
    Lazy::new(|| Mutex::new(VecDeque::with_capacity(LOG_STORE_CAPACITY)));

static LOGGER: Logger = Logger;

fn add_to_log_store(message: String) {
    if let Ok(mut store) = LOG_STORE.lock() {
        if store.len() == LOG_STORE_CAPACITY {
            store.pop_front();
        }
        store.push_back(message);
    }
}

fn level_for(verbose: bool, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Off
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Writes records to stderr and remembers recent ones so a host can show them.
#[derive(Debug)]
pub struct Logger;

impl Logger {
    /// Install the logger. Quiet overrides verbose.
    ///
    /// Safe to call more than once; later calls only change the level.
    pub fn init(verbose: bool, quiet: bool) {
        // Only fails if a logger is already installed, which is fine.
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(level_for(verbose, quiet));
    }

    /// Take every stored message, oldest first.
    pub fn drain() -> Vec<String> {
        match LOG_STORE.lock() {
            Ok(mut store) => store.drain(..).collect(),
            Err(_) => vec![],
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = format!(
            "[{level}] {target}: {args}",
            level = record.level(),
            target = record.target(),
            args = record.args()
        );

        let _ = writeln!(std::io::stderr(), "{message}");
        add_to_log_store(message);
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
