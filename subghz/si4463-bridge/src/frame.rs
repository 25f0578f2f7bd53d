use heapless::Vec;

use crate::{
    opcode::{classify, OpcodeClass},
    BridgeError,
};

/// The two length bytes that start every frame from the host.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameHeader {
    /// The number of request bytes following the header.
    pub req_len: u8,
    /// The number of reply bytes expected by the host, 0 if only a sync marker is expected.
    pub rsp_len: u8,
}

impl FrameHeader {
    /// Ensure that both the request and the reply of a forwarded frame fit in a buffer of `capacity` bytes.
    pub const fn validate(&self, capacity: usize) -> Result<(), BridgeError> {
        if self.req_len as usize > capacity || self.rsp_len as usize > capacity {
            return Err(BridgeError::MalformedFrame {
                req_len: self.req_len,
                rsp_len: self.rsp_len,
            });
        }
        Ok(())
    }

    /// A frame without request bytes is handled by the bridge itself.
    pub const fn meta_command(&self) -> Option<MetaCommand> {
        match (self.req_len, self.rsp_len) {
            (0, 0) => Some(MetaCommand::Identify),
            (0, _) => Some(MetaCommand::Reset),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MetaCommand {
    /// Blink the indicator.
    Identify,
    /// Hardware reset the chip.
    Reset,
}

/// A request to be forwarded to the chip.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Request<const N: usize> {
    payload: Vec<u8, N>,
    rsp_len: u8,
}

impl<const N: usize> Request<N> {
    /// Create a request, or `None` if `payload` is empty or too large.
    pub fn new(payload: &[u8], rsp_len: u8) -> Option<Self> {
        if payload.is_empty() {
            return None;
        }
        Some(Self {
            payload: Vec::from_slice(payload).ok()?,
            rsp_len,
        })
    }

    pub(crate) fn from_vec(payload: Vec<u8, N>, rsp_len: u8) -> Self {
        debug_assert!(!payload.is_empty());
        Self { payload, rsp_len }
    }

    pub fn opcode(&self) -> u8 {
        self.payload[0]
    }

    pub fn class(&self) -> OpcodeClass {
        classify(self.opcode())
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub const fn rsp_len(&self) -> u8 {
        self.rsp_len
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Frame<const N: usize> {
    Meta(MetaCommand),
    Forward(Request<N>),
}

/// What is sent back to the host after a frame is handled.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply<const N: usize> {
    /// The reply bytes clocked out from the chip.
    Data(Vec<u8, N>),
    /// A single sync marker.
    Sync,
}

impl<const N: usize> Reply<N> {
    /// The number of bytes sent to the host for this reply.
    pub fn wire_len(&self) -> usize {
        match self {
            Reply::Data(data) => data.len(),
            Reply::Sync => 1,
        }
    }
}
