//! Log subsystem over tracing-subscriber
//!
//! The global subscriber is built once. Its level filter sits behind a
//! reload handle and both output targets write through switchable sinks, so
//! the `log` settings group and debug mode can change output at runtime.

use crate::contract::{LogSettings, LogTarget};
use crate::domain::LogBackend;
use anyhow::{Context, Result};
use file_rotate::{compression::Compression, suffix::AppendCount, ContentLimit, FileRotate};
use parking_lot::{Mutex, RwLock};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    reload, EnvFilter, Registry,
};

const DEBUG_LEVEL: &str = "debug";

/// Rotated log files kept next to the active one
const KEEP_ROTATED_FILES: usize = 10;

#[derive(Clone, Default)]
enum Sink {
    #[default]
    Off,
    Stderr,
    File(NonBlocking),
}

/// Writer factory whose destination can be swapped while the subscriber is live
#[derive(Clone, Default)]
pub struct TargetWriter {
    sink: Arc<RwLock<Sink>>,
}

impl TargetWriter {
    fn set(&self, sink: Sink) {
        *self.sink.write() = sink;
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(*self.sink.read(), Sink::Off)
    }
}

/// Writer handed to the fmt layer for a single event
pub enum TargetWrite {
    Off,
    Stderr(io::Stderr),
    File(NonBlocking),
}

impl io::Write for TargetWrite {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            TargetWrite::Off => Ok(buf.len()),
            TargetWrite::Stderr(w) => w.write(buf),
            TargetWrite::File(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            TargetWrite::Off => Ok(()),
            TargetWrite::Stderr(w) => w.flush(),
            TargetWrite::File(w) => w.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for TargetWriter {
    type Writer = TargetWrite;

    fn make_writer(&'a self) -> Self::Writer {
        match &*self.sink.read() {
            Sink::Off => TargetWrite::Off,
            Sink::Stderr => TargetWrite::Stderr(io::stderr()),
            Sink::File(w) => TargetWrite::File(w.clone()),
        }
    }
}

#[derive(Default)]
struct FileState {
    path: Option<PathBuf>,
    max_bytes: i64,
    /// Dropping the guard flushes and stops the background writer
    guard: Option<WorkerGuard>,
}

/// Runtime control over the global subscriber
pub struct LogController {
    filter: reload::Handle<EnvFilter, Registry>,
    console: TargetWriter,
    file: TargetWriter,
    file_state: Mutex<FileState>,
    /// Filter directives used outside debug mode
    normal_level: String,
    current_level: RwLock<String>,
}

impl LogController {
    /// Build the subscriber and its controller without installing it
    pub fn build(
        level: &str,
        colorable: bool,
    ) -> Result<(Arc<Self>, impl tracing::Subscriber + Send + Sync + 'static)> {
        let env_filter = EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level '{level}'"))?;
        let (filter, handle) = reload::Layer::new(env_filter);

        let console = TargetWriter::default();
        console.set(Sink::Stderr);
        let file = TargetWriter::default();

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_ansi(colorable)
                    .with_writer(console.clone()),
            )
            .with(fmt::layer().with_ansi(false).with_writer(file.clone()));

        let controller = Arc::new(Self {
            filter: handle,
            console,
            file,
            file_state: Mutex::new(FileState::default()),
            normal_level: level.to_string(),
            current_level: RwLock::new(level.to_string()),
        });
        Ok((controller, subscriber))
    }

    /// Build the subscriber and install it as the global default
    pub fn init(level: &str, colorable: bool) -> Result<Arc<Self>> {
        let (controller, subscriber) = Self::build(level, colorable)?;
        tracing::subscriber::set_global_default(subscriber)
            .context("failed to set global tracing subscriber")?;
        Ok(controller)
    }

    /// Filter directives currently in effect
    pub fn current_level(&self) -> String {
        self.current_level.read().clone()
    }

    pub fn console_enabled(&self) -> bool {
        self.console.is_enabled()
    }

    pub fn file_enabled(&self) -> bool {
        self.file.is_enabled()
    }

    /// Stop writing to the log file and flush what is buffered
    pub fn close_file(&self) {
        self.file.set(Sink::Off);
        let mut state = self.file_state.lock();
        state.path = None;
        // drop the guard last so pending lines reach the file
        drop(state.guard.take());
    }

    fn reload_filter(&self, directives: &str) -> Result<()> {
        let filter = EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log level '{directives}'"))?;
        self.filter
            .reload(filter)
            .context("failed to reload log level")?;
        *self.current_level.write() = directives.to_string();
        Ok(())
    }

    fn open_file(&self, path: &Path, max_bytes: i64) -> Result<()> {
        if path.as_os_str().is_empty() {
            anyhow::bail!("file log target requires a log file path");
        }

        let mut state = self.file_state.lock();
        if state.guard.is_some() && state.path.as_deref() == Some(path) && state.max_bytes == max_bytes
        {
            return Ok(());
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create log directory {}", parent.display()))?;
        }

        let limit = usize::try_from(max_bytes).unwrap_or(usize::MAX).max(1);
        let (writer, guard) = tracing_appender::non_blocking(rotating_file(path, limit));
        self.file.set(Sink::File(writer));

        state.guard = Some(guard);
        state.path = Some(path.to_path_buf());
        state.max_bytes = max_bytes;
        Ok(())
    }
}

#[cfg(unix)]
fn rotating_file(path: &Path, limit: usize) -> FileRotate<AppendCount> {
    FileRotate::new(
        path,
        AppendCount::new(KEEP_ROTATED_FILES),
        ContentLimit::Bytes(limit),
        Compression::None,
        None,
    )
}

#[cfg(not(unix))]
fn rotating_file(path: &Path, limit: usize) -> FileRotate<AppendCount> {
    FileRotate::new(
        path,
        AppendCount::new(KEEP_ROTATED_FILES),
        ContentLimit::Bytes(limit),
        Compression::None,
    )
}

impl LogBackend for LogController {
    fn apply(&self, settings: &LogSettings) -> Result<()> {
        self.console.set(if settings.has_target(LogTarget::Console) {
            Sink::Stderr
        } else {
            Sink::Off
        });

        if settings.has_target(LogTarget::File) {
            self.open_file(Path::new(&settings.save_file), settings.file_max_bytes)?;
        } else {
            self.close_file();
        }

        let level = if settings.debug {
            DEBUG_LEVEL
        } else {
            self.normal_level.as_str()
        };
        self.reload_filter(level)
    }

    fn set_debug(&self, on: bool) {
        let level = if on {
            DEBUG_LEVEL
        } else {
            self.normal_level.as_str()
        };
        if let Err(e) = self.reload_filter(level) {
            tracing::warn!("{:#}", e);
        }
    }
}
