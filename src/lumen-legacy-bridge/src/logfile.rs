//! Side-channel file logging controlled by an environment variable.

use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::config::LOG_FILE_PROPERTY;

/// Appends legacy log messages to the file named by `ij.log.file`.
///
/// The variable is consulted on every call, so the channel can be turned on
/// mid-run. The file handle is opened once and reused; a timestamp header is
/// written when it opens. The first write failure disables the sink — the
/// variable is removed from the process view, the handle dropped, and
/// further logging silently discarded.
pub struct LogFileSink {
    default_path: Option<PathBuf>,
    state: Mutex<SinkState>,
}

#[derive(Default)]
struct SinkState {
    writer: Option<BufWriter<std::fs::File>>,
    disabled: bool,
}

impl LogFileSink {
    /// `default_path` is used when the environment variable is unset.
    pub fn new(default_path: Option<PathBuf>) -> Self {
        Self {
            default_path,
            state: Mutex::new(SinkState::default()),
        }
    }

    fn target_path(&self) -> Option<PathBuf> {
        match std::env::var(LOG_FILE_PROPERTY) {
            Ok(path) if !path.is_empty() => Some(PathBuf::from(path)),
            _ => self.default_path.clone(),
        }
    }

    pub fn log(&self, message: &str) {
        let mut state = self.state.lock();
        if state.disabled {
            return;
        }
        let Some(path) = self.target_path() else {
            return;
        };
        if let Err(err) = append(&mut state, &path, message) {
            tracing::warn!("disabling legacy log file {}: {err}", path.display());
            state.writer = None;
            state.disabled = true;
            unsafe { std::env::remove_var(LOG_FILE_PROPERTY) };
        }
    }
}

fn append(state: &mut SinkState, path: &Path, message: &str) -> io::Result<()> {
    if state.writer.is_none() {
        let file = OpenOptions::new().append(true).create(true).open(path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "Started new log on {}", chrono::Local::now())?;
        state.writer = Some(writer);
    }
    let Some(writer) = state.writer.as_mut() else {
        return Ok(());
    };
    writer.write_all(message.as_bytes())?;
    if !message.ends_with('\n') {
        writer.write_all(b"\n")?;
    }
    writer.flush()
}
