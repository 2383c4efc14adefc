//! Contains the pattern table and its hot-reloadable store
//!
//! ## Zones File Format
//!
//! The table is read from a line-oriented text file:
//!
//! ```text
//! # comment
//! 127.0.0.1   *.dev.example.com
//! 10.0.0.5    mail.example.com
//! ```
//!
//! Each line is `<ip> <pattern>`. Blank lines and lines starting with `#`
//! are skipped, as are lines with fewer than two fields. A line with an
//! invalid address or a pattern that does not compile is dropped with a
//! warning; loading carries on with the next line.
//!
//! ## Ordering
//!
//! Entries keep file order and the first matching entry answers a query.
//! Duplicate patterns are kept; the later ones are simply never reached.
//!
//! ## Reloading
//!
//! A `PatternTable` is never modified after it is built. `PatternStore`
//! publishes the current table through an `ArcSwap`: readers take a snapshot
//! without locking and a reload installs a complete new table in one store.
//! When the zones file cannot be read, the published table is left as is.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::dns::errors::{ParseError, PatternResult};
use crate::dns::pattern::WildcardPattern;

/// A compiled pattern and the address it answers with
#[derive(Clone, Debug)]
pub struct PatternEntry {
    pub pattern: WildcardPattern,
    pub address: IpAddr,
    /// The address token exactly as written in the zones file
    pub target: String,
}

impl PatternEntry {
    /// Parse a single `<ip> <pattern>` line. Fields after the second are
    /// ignored.
    pub fn parse(line: &str) -> Result<PatternEntry, ParseError> {
        let items: Vec<&str> = line.split_whitespace().collect();
        if items.len() < 2 {
            return Err(ParseError::MissingFields { found: items.len() });
        }

        let address = items[0]
            .parse::<IpAddr>()
            .map_err(|source| ParseError::InvalidAddress {
                value: items[0].to_string(),
                source,
            })?;
        let pattern = WildcardPattern::compile(items[1])?;

        Ok(PatternEntry {
            pattern,
            address,
            target: items[0].to_string(),
        })
    }

    pub fn is_match(&self, query: &str) -> bool {
        self.pattern.is_match(query)
    }
}

/// Ordered, immutable list of pattern entries
#[derive(Clone, Debug, Default)]
pub struct PatternTable {
    entries: Vec<PatternEntry>,
}

impl PatternTable {
    pub fn new() -> PatternTable {
        PatternTable {
            entries: Vec::new(),
        }
    }

    /// Build a table from zones file lines. Bad lines are logged and skipped,
    /// so this always returns a usable (possibly empty) table.
    pub fn from_lines<I, S>(lines: I) -> PatternTable
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();

        for line in lines {
            if let Some(entry) = Self::read_line(line.as_ref()) {
                entries.push(entry);
            }
        }

        PatternTable { entries }
    }

    /// Build a table from a reader. Lines are decoded one at a time and
    /// invalid UTF-8 is replaced, so an oddly encoded line only affects
    /// itself. A read error part way through fails the whole load rather
    /// than producing a truncated table.
    pub fn load<R: BufRead>(mut reader: R) -> PatternResult<PatternTable> {
        let mut lines = Vec::new();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            lines.push(String::from_utf8_lossy(&buf).into_owned());
        }

        Ok(Self::from_lines(lines))
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> PatternResult<PatternTable> {
        let file = File::open(path.as_ref())?;
        Self::load(BufReader::new(file))
    }

    /// Like `load_file`, but an unreadable file is logged and yields an
    /// empty table
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> PatternTable {
        match Self::load_file(path.as_ref()) {
            Ok(table) => table,
            Err(e) => {
                log::error!("read config file failed: {}: {}", path.as_ref().display(), e);
                PatternTable::new()
            }
        }
    }

    fn read_line(raw: &str) -> Option<PatternEntry> {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        match PatternEntry::parse(line) {
            Ok(entry) => {
                log::info!("read config success:\t{}", line);
                Some(entry)
            }
            Err(ParseError::MissingFields { .. }) => {
                log::debug!("ignored config line:\t{}", line);
                None
            }
            Err(e) => {
                log::warn!("parse config line error:\t{}\t{}", line, e);
                None
            }
        }
    }

    /// First entry whose pattern matches `query`
    pub fn find(&self, query: &str) -> Option<&PatternEntry> {
        self.entries.iter().find(|entry| entry.is_match(query))
    }

    pub fn entries(&self) -> &[PatternEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Holds the currently published `PatternTable` and the path it is
/// reloaded from
pub struct PatternStore {
    current: ArcSwap<PatternTable>,
    path: PathBuf,
}

impl PatternStore {
    /// Create a store by reading `path`. An unreadable file starts the store
    /// with an empty table; a later `reload` can still pick the file up.
    pub fn open<P: Into<PathBuf>>(path: P) -> PatternStore {
        let path = path.into();
        let table = PatternTable::load_or_empty(&path);
        log::info!("Loaded {} pattern(s) from {}", table.len(), path.display());

        PatternStore {
            current: ArcSwap::from_pointee(table),
            path,
        }
    }

    /// Create a store around an existing table
    pub fn with_table<P: Into<PathBuf>>(path: P, table: PatternTable) -> PatternStore {
        PatternStore {
            current: ArcSwap::from_pointee(table),
            path: path.into(),
        }
    }

    /// Snapshot of the current table. The snapshot stays valid and unchanged
    /// for as long as the caller holds it, whatever reloads happen meanwhile.
    pub fn current(&self) -> Arc<PatternTable> {
        self.current.load_full()
    }

    /// The path `reload` reads from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the configured zones file
    pub fn reload(&self) -> PatternResult<usize> {
        self.reload_from(&self.path)
    }

    /// Re-read from an explicit path. The configured path is unchanged and
    /// is still what `reload` reads.
    pub fn reload_from<P: AsRef<Path>>(&self, path: P) -> PatternResult<usize> {
        self.reload_path(path.as_ref())
    }

    fn reload_path(&self, path: &Path) -> PatternResult<usize> {
        let table = match PatternTable::load_file(path) {
            Ok(table) => table,
            Err(e) => {
                log::warn!(
                    "read config file failed: {}: {}; keeping {} existing pattern(s)",
                    path.display(),
                    e,
                    self.current.load().len()
                );
                return Err(e);
            }
        };

        let count = table.len();
        self.publish(table);
        log::info!("Reloaded {} pattern(s) from {}", count, path.display());

        Ok(count)
    }

    /// Install `table` as the current table
    pub fn publish(&self, table: PatternTable) {
        self.current.store(Arc::new(table));
    }
}
