//! Console sink implementation

use crate::core::error::Result;
use parking_lot::Mutex;
use std::io::{self, Write};

/// Writes encoded records to standard output without buffering
///
/// Each record is written and flushed under the sink's own lock, so lines
/// from concurrent callers never interleave.
pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Use another stream as the console, e.g. stderr or an in-memory buffer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
        }
    }

    pub fn write(&self, record: &[u8]) -> Result<()> {
        let mut out = self.out.lock();
        out.write_all(record)?;
        out.flush()?;
        Ok(())
    }

    pub fn flush(&self) -> Result<()> {
        self.out.lock().flush()?;
        Ok(())
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writes_whole_records() {
        let buf = SharedBuf::default();
        let sink = ConsoleSink::with_writer(buf.clone());

        sink.write(b"first\n").unwrap();
        sink.write(b"second\n").unwrap();
        sink.flush().unwrap();

        assert_eq!(&*buf.0.lock(), b"first\nsecond\n");
    }

    #[test]
    fn test_concurrent_records_do_not_interleave() {
        let buf = SharedBuf::default();
        let sink = Arc::new(ConsoleSink::with_writer(buf.clone()));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        sink.write(format!("thread-{}-record-{}\n", t, i).as_bytes())
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let out = String::from_utf8(buf.0.lock().clone()).unwrap();
        assert_eq!(out.lines().count(), 200);
        assert!(out.lines().all(|l| l.starts_with("thread-") && l.contains("-record-")));
    }
}
