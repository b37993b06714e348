// Logging setup
//
// Records always go to stderr. Once `config.toml` has been read, a log file
// can be attached and every later record is copied into it as well.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

/// Shared `env_logger` output: stderr plus an optional log file.
#[derive(Clone, Default)]
pub struct LogSink {
    file: Arc<Mutex<Option<File>>>,
}

impl LogSink {
    /// Truncate `path`, write a header, and copy every later record there.
    pub fn attach_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {:?}", path))?;

        writeln!(file, "=== Vertex Sample Log ===")?;
        writeln!(file, "Started: {:?}", std::time::SystemTime::now())?;
        writeln!(file)?;

        *self.file.lock() = Some(file);
        Ok(())
    }

    pub fn has_file(&self) -> bool {
        self.file.lock().is_some()
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        if let Some(file) = self.file.lock().as_mut() {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        if let Some(file) = self.file.lock().as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

/// Install `env_logger` writing into `sink`. Default level Info, overridden
/// by `RUST_LOG`.
pub fn init(sink: &LogSink) {
    use env_logger::{Builder, Target};
    use log::LevelFilter;

    let mut builder = Builder::from_default_env();
    builder.filter_level(LevelFilter::Info);
    builder.parse_default_env();
    builder.target(Target::Pipe(Box::new(sink.clone())));
    builder.init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attached_file_receives_writes() {
        let path = std::env::temp_dir().join(format!("vertex-log-{}.log", std::process::id()));
        std::fs::write(&path, "stale contents\n").unwrap();

        let mut sink = LogSink::default();
        assert!(!sink.has_file());
        sink.write_all(b"before attach\n").unwrap();

        sink.attach_file(&path).unwrap();
        assert!(sink.has_file());
        sink.write_all(b"[INFO] after attach\n").unwrap();
        sink.flush().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(contents.starts_with("=== Vertex Sample Log ==="));
        assert!(contents.contains("[INFO] after attach"));
        assert!(!contents.contains("stale contents"));
        assert!(!contents.contains("before attach"));
    }
}
