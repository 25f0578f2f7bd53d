use std::collections::VecDeque;

use embedded_io_async::{ErrorKind, ErrorType, Read, Write};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SerialError;

impl embedded_io_async::Error for SerialError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::BrokenPipe
    }
}

/// A serial port replaying scripted input and recording everything written to it.
///
/// Reading past the end of the script fails with [`SerialError`] instead of blocking,
/// so a test can drive a never-ending server loop until the script runs dry.
#[derive(Debug, Default)]
pub struct ScriptedSerial {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    flushes: usize,
}

impl ScriptedSerial {
    pub fn new(rx: &[u8]) -> Self {
        Self {
            rx: rx.iter().copied().collect(),
            tx: Vec::new(),
            flushes: 0,
        }
    }

    /// Append bytes that will be returned by subsequent reads.
    pub fn push_rx(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes);
    }

    /// Bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.tx
    }

    /// Take and clear the bytes written so far.
    pub fn take_written(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.tx)
    }

    /// Number of scripted bytes not yet read.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl ErrorType for ScriptedSerial {
    type Error = SerialError;
}

impl Read for ScriptedSerial {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, SerialError> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.rx.is_empty() {
            return Err(SerialError);
        }

        let len = usize::min(buf.len(), self.rx.len());
        for (dest, src) in buf.iter_mut().zip(self.rx.drain(..len)) {
            *dest = src;
        }
        Ok(len)
    }
}

impl Write for ScriptedSerial {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, SerialError> {
        self.tx.extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), SerialError> {
        self.flushes += 1;
        Ok(())
    }
}
