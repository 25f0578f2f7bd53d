use embedded_io_async::{Error, ErrorKind, ReadExactError};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// The serial link to the bridge failed.
    Link(ErrorKind),
    /// The serial link ended while a reply was expected.
    LinkClosed,
    /// The bridge replied with something else than a sync marker.
    UnexpectedSync(u8),
    /// The request is empty or does not fit in a frame.
    InvalidRequest,
    /// A packet handler condition was not met in time.
    Timeout,
    InvalidPartNumber(u16),
    /// The chip reported a state that is not known.
    InvalidState(u8),
    Config(ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The value of a definition on `line` is not a list of bytes.
    InvalidValue { line: usize },
    /// The command on `line` is longer than the chip command buffer.
    TooLong { line: usize },
}

impl From<ConfigError> for DriverError {
    fn from(value: ConfigError) -> Self {
        DriverError::Config(value)
    }
}

impl DriverError {
    pub(crate) fn link<E: Error>(error: E) -> Self {
        DriverError::Link(error.kind())
    }
}

impl<E: Error> From<ReadExactError<E>> for DriverError {
    fn from(value: ReadExactError<E>) -> Self {
        match value {
            ReadExactError::UnexpectedEof => DriverError::LinkClosed,
            ReadExactError::Other(e) => DriverError::link(e),
        }
    }
}
