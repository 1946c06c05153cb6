/*!
 * Stream I/O
 * Thin byte-oriented wrappers over the three standard streams
 */

use log::warn;
use parking_lot::RwLock;
use std::io::{Read, Write};
use std::sync::Arc;
use thiserror::Error;

/// I/O operation result
pub type IoResult<T> = Result<T, IoError>;

/// I/O errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IoError {
    #[error("read from input stream failed: {0}")]
    Read(String),

    #[error("write to output stream failed: {0}")]
    Write(String),

    #[error("flush failed: {0}")]
    Flush(String),
}

/// Byte-oriented access to the host's standard streams.
///
/// The runtime core never calls this; hosts interleave stream operations
/// with `tick` polls.
pub struct StreamIo {
    last_error: Arc<RwLock<Option<IoError>>>,
}

impl StreamIo {
    pub fn new() -> Self {
        Self {
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Read up to `buf.len()` bytes from the input stream
    pub fn read(&self, buf: &mut [u8]) -> IoResult<usize> {
        match std::io::stdin().lock().read(buf) {
            Ok(count) => {
                self.clear_error();
                Ok(count)
            }
            Err(err) => Err(self.fail(IoError::Read(err.to_string()))),
        }
    }

    /// Write `buf` to the output stream, returning the bytes written
    pub fn write(&self, buf: &[u8]) -> IoResult<usize> {
        match std::io::stdout().lock().write(buf) {
            Ok(count) => {
                self.clear_error();
                Ok(count)
            }
            Err(err) => Err(self.fail(IoError::Write(err.to_string()))),
        }
    }

    /// Write `buf` to the error stream, returning the bytes written
    pub fn write_err(&self, buf: &[u8]) -> IoResult<usize> {
        match std::io::stderr().lock().write(buf) {
            Ok(count) => {
                self.clear_error();
                Ok(count)
            }
            Err(err) => Err(self.fail(IoError::Write(err.to_string()))),
        }
    }

    /// Flush the output and error streams
    pub fn flush(&self) -> IoResult<()> {
        std::io::stdout()
            .lock()
            .flush()
            .map_err(|err| self.fail(IoError::Flush(err.to_string())))?;
        std::io::stderr()
            .lock()
            .flush()
            .map_err(|err| self.fail(IoError::Flush(err.to_string())))?;
        self.clear_error();
        Ok(())
    }

    /// Last failed operation, if the most recent call failed
    pub fn last_error(&self) -> Option<IoError> {
        self.last_error.read().clone()
    }

    fn fail(&self, err: IoError) -> IoError {
        warn!("stream operation failed: {}", err);
        *self.last_error.write() = Some(err.clone());
        err
    }

    fn clear_error(&self) {
        *self.last_error.write() = None;
    }
}

impl Clone for StreamIo {
    fn clone(&self) -> Self {
        Self {
            last_error: Arc::clone(&self.last_error),
        }
    }
}

impl Default for StreamIo {
    fn default() -> Self {
        Self::new()
    }
}
