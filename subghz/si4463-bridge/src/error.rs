use embedded_io_async::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// The spi transfer failed.
    Spi,
    /// The chip select pin could not be driven.
    Select,
    /// The CTS pin could not be sampled.
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeError {
    /// The host link failed.
    Host(ErrorKind),
    /// The host link was closed while a frame was being received.
    HostClosed,
    Bus(BusError),
    /// The reset or indicator pin could not be driven.
    Pin,
    /// The chip did not signal CTS within the configured timeout.
    ReadinessTimeout,
    /// A frame declared more bytes than the bridge can buffer.
    MalformedFrame { req_len: u8, rsp_len: u8 },
}

impl BridgeError {
    /// Whether the error originates from the host link.
    /// The bridge cannot reply on a broken link, so such errors end the serve loop.
    pub const fn is_host(&self) -> bool {
        matches!(self, BridgeError::Host(_) | BridgeError::HostClosed)
    }
}

impl From<BusError> for BridgeError {
    fn from(value: BusError) -> Self {
        BridgeError::Bus(value)
    }
}
