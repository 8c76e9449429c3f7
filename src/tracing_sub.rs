use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::Level;

use crate::components::sys::debug_log::{DebugLogWriter, global_debug_log};
use crate::error::CardError;

pub struct DelegatingWriter {
    inner: DelegatingInner,
}

enum DelegatingInner {
    Debug(DebugLogWriter),
    File(Arc<Mutex<File>>),
    Sink(io::Sink),
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            DelegatingInner::Debug(w) => w.write(buf),
            DelegatingInner::File(f) => match f.lock() {
                Ok(mut file) => file.write(buf),
                Err(_) => Ok(buf.len()),
            },
            DelegatingInner::Sink(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            DelegatingInner::Debug(w) => w.flush(),
            DelegatingInner::File(f) => match f.lock() {
                Ok(mut file) => file.flush(),
                Err(_) => Ok(()),
            },
            DelegatingInner::Sink(s) => s.flush(),
        }
    }
}

/// Log file when one was opened, else the in-memory debug log. Events are
/// dropped when neither exists so the terminal is never written to.
#[derive(Clone, Debug, Default)]
pub struct SubscriberMakeWriter {
    file: Option<Arc<Mutex<File>>>,
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        let inner = match (&self.file, global_debug_log()) {
            (Some(file), _) => DelegatingInner::File(Arc::clone(file)),
            (None, Some(handle)) => DelegatingInner::Debug(handle.writer()),
            (None, None) => DelegatingInner::Sink(io::sink()),
        };
        DelegatingWriter { inner }
    }
}

/// Install the global subscriber. With `log_file`, events are appended to
/// that file; otherwise they go to the debug log ring buffer. Later calls
/// keep the first subscriber.
pub fn init(log_file: Option<&Path>) -> Result<(), CardError> {
    let file = match log_file {
        Some(path) => Some(Arc::new(Mutex::new(
            OpenOptions::new().create(true).append(true).open(path)?,
        ))),
        None => None,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_writer(SubscriberMakeWriter { file })
        .with_ansi(false)
        .with_target(false)
        .with_thread_names(false)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn file_writer_appends() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("card.log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .expect("open log");
        let make = SubscriberMakeWriter {
            file: Some(Arc::new(Mutex::new(file))),
        };
        let mut writer = make.make_writer();
        writer.write_all(b"panel opened\n").unwrap();
        writer.flush().unwrap();
        let text = std::fs::read_to_string(&path).expect("read log");
        assert_eq!(text, "panel opened\n");
    }
}
