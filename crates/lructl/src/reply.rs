//! Command replies and their text / JSON renderings

use std::io::{self, Write};

use clap::ValueEnum;
use lrucache::StatsSnapshot;
use serde::Serialize;

/// How replies are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// redis-cli style, one reply per command
    Text,
    /// One JSON object per line
    Json,
}

/// Reply to a single command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Reply {
    /// Command succeeded with nothing to return
    Ok,
    /// Looked-up value, `None` when the key is absent
    Value(Option<String>),
    /// Count or flag
    Integer(i64),
    /// Key listing
    Keys(Vec<String>),
    /// Counter snapshot
    Stats(StatsSnapshot),
    /// Malformed command
    Error(String),
}

/// JSON output record
#[derive(Serialize)]
struct Record<'a> {
    line: usize,
    command: &'a str,
    reply: &'a Reply,
}

impl Reply {
    /// Render in redis-cli style
    pub fn to_text(&self) -> String {
        match self {
            Reply::Ok => "OK".to_string(),
            Reply::Value(Some(value)) => format!("{:?}", value),
            Reply::Value(None) => "(nil)".to_string(),
            Reply::Integer(i) => format!("(integer) {}", i),
            Reply::Keys(keys) if keys.is_empty() => "(empty list)".to_string(),
            Reply::Keys(keys) => keys
                .iter()
                .enumerate()
                .map(|(i, key)| format!("{}) {:?}", i + 1, key))
                .collect::<Vec<_>>()
                .join("\n"),
            Reply::Stats(stats) => format!(
                "hits:{}\nmisses:{}\ninserts:{}\nupdates:{}\nevictions:{}\nremovals:{}\nhit_ratio:{:.2}",
                stats.hits,
                stats.misses,
                stats.inserts,
                stats.updates,
                stats.evictions,
                stats.removals,
                stats.hit_ratio,
            ),
            Reply::Error(e) => format!("(error) ERR {}", e),
        }
    }

    /// Write this reply for script line `line` in the requested format
    pub fn write_to<W: Write>(
        &self,
        out: &mut W,
        format: OutputFormat,
        line: usize,
        command: &str,
    ) -> io::Result<()> {
        match format {
            OutputFormat::Text => writeln!(out, "{}", self.to_text()),
            OutputFormat::Json => {
                let record = Record {
                    line,
                    command,
                    reply: self,
                };
                serde_json::to_writer(&mut *out, &record)?;
                writeln!(out)
            }
        }
    }

    /// Whether this reply reports a malformed command
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }
}
