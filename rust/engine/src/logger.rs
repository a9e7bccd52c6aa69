use serde::{Deserialize, Serialize};

use crate::cards::PileIndex;
use crate::game::GameMode;
use crate::rules::LossReason;

/// How a finished round ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    Won,
    Lost(LossReason),
}

impl RoundOutcome {
    /// Answer to the player's question: a win means "yes".
    pub fn answer(&self) -> &'static str {
        match self {
            RoundOutcome::Won => "yes",
            RoundOutcome::Lost(_) => "no",
        }
    }
}

/// One legal play made during a round.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayRecord {
    /// Identifier of the card that was revealed or moved
    pub card: String,
    /// Pile the card was taken from
    pub from: PileIndex,
    /// Pile the play pointed to next
    pub to: PileIndex,
}

/// Complete record of a finished round, one JSON line per round.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Unique identifier for this round (format: YYYYMMDD-NNNNNN)
    pub round_id: String,
    /// Seed of the session RNG (rounds of one session share it)
    pub seed: u64,
    /// Manual or Automatic
    pub mode: GameMode,
    /// The question the round answers
    pub question: Option<String>,
    pub outcome: RoundOutcome,
    /// Number of revealed cards when the round ended
    pub revealed: usize,
    /// Chronological list of plays
    pub plays: Vec<PlayRecord>,
    /// Timestamp when the round finished (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
}

pub fn format_round_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

/// Appends [`RoundRecord`]s to a JSONL file, assigning sequential ids.
///
/// Ids continue from the rounds already logged today, so several runs can
/// share one history file.
pub struct RoundLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

#[derive(Deserialize)]
struct LoggedRound {
    round_id: String,
}

/// Highest sequence number logged under `date` in `path`; 0 for a missing file.
fn last_seq(path: &Path, date: &str) -> std::io::Result<u32> {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };
    let prefix = format!("{}-", date);
    Ok(text
        .lines()
        .filter_map(|line| serde_json::from_str::<LoggedRound>(line).ok())
        .filter_map(|r| r.round_id.strip_prefix(&prefix)?.parse::<u32>().ok())
        .max()
        .unwrap_or(0))
}

impl RoundLogger {
    /// Opens `path` for appending, creating it and its parent directories if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let date = Utc::now().format("%Y%m%d").to_string();
        let seq = last_seq(path, &date)?;
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date,
            seq,
        })
    }

    /// A logger that numbers rounds but writes nowhere.
    pub fn detached(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_round_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &RoundRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for RoundLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundLogger")
            .field("date", &self.date)
            .field("seq", &self.seq)
            .finish()
    }
}
