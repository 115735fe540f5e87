//! Command handler: applies trace commands to a cache

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use lrucache::ConcurrentCache;
use tracing::{debug, warn};

use crate::reply::{OutputFormat, Reply};
use crate::script::{self, Command, ParseError};

/// Shared cache handle used by the replay tool
pub type SharedCache = Arc<dyn ConcurrentCache<String, String>>;

/// Replay settings
#[derive(Debug, Clone, Copy)]
pub struct ReplayOptions {
    /// Output format for replies
    pub format: OutputFormat,
    /// Stop at the first malformed line instead of reporting it
    pub strict: bool,
}

/// Outcome of a replay run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Commands executed
    pub commands: usize,
    /// Malformed lines reported
    pub errors: usize,
}

pub struct CommandHandler {
    cache: SharedCache,
}

impl CommandHandler {
    pub fn new(cache: SharedCache) -> Self {
        Self { cache }
    }

    pub fn handle(&self, cmd: Command) -> Reply {
        match cmd {
            Command::Put { key, value } => self.handle_put(key, value),
            Command::Get { key } => Reply::Value(self.cache.get(&key)),
            Command::Del { key } => Reply::Integer(i64::from(self.cache.remove(&key).is_some())),
            Command::Exists { key } => Reply::Integer(i64::from(self.cache.contains_key(&key))),
            Command::Size => Reply::Integer(to_integer(self.cache.len())),
            Command::Capacity => Reply::Integer(to_integer(self.cache.capacity())),
            Command::Keys => Reply::Keys(self.cache.keys()),
            Command::Clear => {
                self.cache.clear();
                Reply::Ok
            }
            Command::Stats => Reply::Stats(self.cache.stats().snapshot()),
        }
    }

    fn handle_put(&self, key: String, value: String) -> Reply {
        if let Some((evicted, _)) = self.cache.put(key, value) {
            debug!(key = %evicted, "evicted");
        }
        Reply::Ok
    }

    /// Run every command in `input`, writing one reply per command to `out`
    pub fn replay<R, W>(&self, input: R, out: &mut W, options: ReplayOptions) -> Result<ReplaySummary>
    where
        R: BufRead,
        W: Write,
    {
        let mut summary = ReplaySummary::default();

        for (idx, bytes) in input.split(b'\n').enumerate() {
            let line_no = idx + 1;
            let mut bytes = bytes.with_context(|| format!("failed to read line {}", line_no))?;
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }

            // A line that fails to decode is malformed like any other
            let parsed = String::from_utf8(bytes)
                .map_err(|_| ParseError::InvalidUtf8)
                .and_then(|line| script::parse_line(&line));

            let (name, reply) = match parsed {
                Ok(None) => continue,
                Ok(Some(cmd)) => {
                    summary.commands += 1;
                    (cmd.name(), self.handle(cmd))
                }
                Err(e) if options.strict => bail!("line {}: {}", line_no, e),
                Err(e) => {
                    warn!(line = line_no, "Parse error: {}", e);
                    ("?", Reply::Error(e.to_string()))
                }
            };

            if reply.is_error() {
                summary.errors += 1;
            }
            reply
                .write_to(out, options.format, line_no, name)
                .context("failed to write reply")?;
        }

        Ok(summary)
    }
}

fn to_integer(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
