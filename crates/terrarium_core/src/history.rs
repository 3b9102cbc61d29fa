use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
pub use terrarium_data::{PopulationStats, SimEvent};

/// File name of the event stream inside the log directory.
pub const LIVE_LOG_FILE: &str = "live.jsonl";

/// One line of the event stream.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LoggedEvent {
    pub tick: u64,
    /// RFC 3339 wall-clock time of the write.
    pub timestamp: String,
    pub payload: SimEvent,
}

impl LoggedEvent {
    #[must_use]
    pub fn now(tick: u64, payload: SimEvent) -> Self {
        Self {
            tick,
            timestamp: chrono::Utc::now().to_rfc3339(),
            payload,
        }
    }
}

/// Append-only JSONL sink for [`SimEvent`]s.
pub struct HistoryLogger {
    live_file: Option<BufWriter<File>>,
    log_dir: PathBuf,
}

impl HistoryLogger {
    pub fn new_at<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(LIVE_LOG_FILE))?;
        tracing::info!(dir = %dir.display(), "Event log opened");
        Ok(Self {
            live_file: Some(BufWriter::new(file)),
            log_dir: dir.to_path_buf(),
        })
    }

    /// Logger that discards everything.
    #[must_use]
    pub fn new_dummy() -> Self {
        Self {
            live_file: None,
            log_dir: PathBuf::new(),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.live_file.is_some()
    }

    pub fn log_event(&mut self, tick: u64, event: &SimEvent) -> anyhow::Result<()> {
        if let Some(ref mut file) = self.live_file {
            let line = LoggedEvent::now(tick, event.clone());
            let json = serde_json::to_string(&line)?;
            writeln!(file, "{}", json)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Every parseable line written so far; malformed lines are skipped.
    pub fn read_events(&self) -> anyhow::Result<Vec<LoggedEvent>> {
        if !self.is_active() {
            return Ok(vec![]);
        }
        let file = match File::open(self.log_dir.join(LIVE_LOG_FILE)) {
            Ok(f) => f,
            Err(_) => return Ok(vec![]),
        };
        let reader = BufReader::new(file);
        Ok(reader
            .lines()
            .map_while(Result::ok)
            .filter_map(|l| serde_json::from_str::<LoggedEvent>(&l).ok())
            .collect())
    }

    /// Population statistics snapshots as `(tick, stats)` pairs.
    pub fn get_snapshots(&self) -> anyhow::Result<Vec<(u64, PopulationStats)>> {
        Ok(self
            .read_events()?
            .into_iter()
            .filter_map(|e| match e.payload {
                SimEvent::PopulationStatsUpdated { stats, .. } => Some((e.tick, *stats)),
                _ => None,
            })
            .collect())
    }
}
