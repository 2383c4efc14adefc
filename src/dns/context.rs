//! The `PatternContext` holds the common state shared by lookups and reloads
//!
//! Configuration can be built in code or read from a TOML file:
//!
//! ```text
//! zones_file = "/etc/patternzone/zones"
//! reload_interval_secs = 30
//! ```

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, Builder, JoinHandle};
use std::time::{Duration, Instant};

use serde_derive::{Deserialize, Serialize};

use crate::dns::answers::{AnswerRegistry, SynchronizedAnswers};
use crate::dns::errors::PatternResult;
use crate::dns::pattern_table::PatternStore;
use crate::dns::resolver::PatternResolver;

pub const DEFAULT_ZONES_FILE: &str = "config/zones";

/// Runtime configuration for the pattern answer source
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Zones file read at startup and on every `reload`
    pub zones_file: Arc<str>,
    /// Seconds between periodic reloads; unset reloads only on demand
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reload_interval_secs: Option<u64>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        PatternConfig {
            zones_file: Arc::from(DEFAULT_ZONES_FILE),
            reload_interval_secs: None,
        }
    }
}

impl PatternConfig {
    /// Read a TOML configuration file. Missing keys take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> PatternResult<PatternConfig> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> PatternResult<PatternConfig> {
        Ok(toml::from_str(content)?)
    }

    /// A zero interval counts as unset
    pub fn reload_interval(&self) -> Option<Duration> {
        self.reload_interval_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Handle to the periodic reload thread. Dropping it stops the thread.
pub struct Reloader {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Reloader {
    fn spawn(store: Arc<PatternStore>, interval: Duration) -> std::io::Result<Reloader> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        log::info!("Reloading {} every {:?}", store.path().display(), interval);

        let handle = Builder::new()
            .name("PatternStore-reloader".into())
            .spawn(move || loop {
                let deadline = Instant::now() + interval;
                loop {
                    if stop_flag.load(Ordering::Acquire) {
                        return;
                    }
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    thread::park_timeout(deadline - now);
                }

                // Errors are logged by the store and keep the current table
                let _ = store.reload();
            })?;

        Ok(Reloader {
            stop,
            handle: Some(handle),
        })
    }

    /// Stop the thread and wait for it to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some() && !self.stop.load(Ordering::Acquire)
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                log::error!("Pattern reload thread panicked");
            }
        }
    }
}

impl Drop for Reloader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Wires the pattern store, the answer registry and the resolver together
pub struct PatternContext {
    pub config: PatternConfig,
    pub store: Arc<PatternStore>,
    pub answers: Arc<SynchronizedAnswers>,
    pub resolver: Arc<PatternResolver>,
}

impl PatternContext {
    /// Load the zones file and build a resolver backed by an in-memory
    /// answer registry
    pub fn new(config: PatternConfig) -> PatternContext {
        let answers = Arc::new(SynchronizedAnswers::new());
        Self::with_answers(config, answers)
    }

    pub fn with_answers(config: PatternConfig, answers: Arc<SynchronizedAnswers>) -> PatternContext {
        let store = Arc::new(PatternStore::open(&*config.zones_file));
        let registry: Arc<dyn AnswerRegistry + Send + Sync> = answers.clone();
        let resolver = Arc::new(PatternResolver::new(store.clone(), registry));

        PatternContext {
            config,
            store,
            answers,
            resolver,
        }
    }

    /// Start a thread reloading the zones file every reload interval.
    /// Returns `Ok(None)` when no interval is configured. The thread runs
    /// until the returned `Reloader` is stopped or dropped.
    pub fn spawn_reloader(&self) -> std::io::Result<Option<Reloader>> {
        match self.config.reload_interval() {
            Some(interval) => Reloader::spawn(self.store.clone(), interval).map(Some),
            None => Ok(None),
        }
    }
}
