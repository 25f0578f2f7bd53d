use embedded_io_async::{Error, Read, ReadExactError, Write};

use crate::{BridgeError, BusError};

/// The serial channel to the host.
pub trait HostLink {
    /// Receive a single byte, waiting until one is available.
    async fn recv_byte(&mut self) -> Result<u8, BridgeError>;

    /// Send a single byte, waiting until the link can accept it.
    async fn send_byte(&mut self, byte: u8) -> Result<(), BridgeError>;

    /// Wait until all sent bytes have left the link.
    async fn flush(&mut self) -> Result<(), BridgeError>;
}

/// The spi bus to the chip, together with its chip select and CTS lines.
pub trait DeviceBus {
    /// Drive nSEL low.
    fn assert_select(&mut self) -> Result<(), BusError>;

    /// Drive nSEL high.
    fn deassert_select(&mut self) -> Result<(), BusError>;

    /// Clock out `byte` and return the byte clocked in at the same time.
    /// The call must not complete before the transfer has physically completed.
    async fn transfer_byte(&mut self, byte: u8) -> Result<u8, BusError>;

    /// Sample the CTS line.
    fn is_ready(&mut self) -> Result<bool, BusError>;
}

impl<T: Read + Write> HostLink for T {
    async fn recv_byte(&mut self) -> Result<u8, BridgeError> {
        let mut byte = [0];
        self.read_exact(&mut byte).await.map_err(|e| match e {
            ReadExactError::UnexpectedEof => BridgeError::HostClosed,
            ReadExactError::Other(e) => BridgeError::Host(e.kind()),
        })?;
        Ok(byte[0])
    }

    async fn send_byte(&mut self, byte: u8) -> Result<(), BridgeError> {
        self.write_all(&[byte])
            .await
            .map_err(|e| BridgeError::Host(e.kind()))
    }

    async fn flush(&mut self) -> Result<(), BridgeError> {
        Write::flush(self)
            .await
            .map_err(|e| BridgeError::Host(e.kind()))
    }
}
