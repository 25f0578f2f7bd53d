//! Host to chip command forwarding
//!
//! # Examples
//!
//! Typical exchanges, host frame followed by the spi traffic and the reply:
//! Frame           SPI_TX              Description
//! 01 08 01        01                  PART_INFO
//!                                     Wait for CTS
//!                 44 FF FFx8          Read command buffer, 8 reply bytes to host
//!
//! 04 00 20000000  20000000            GET_INT_STATUS, clear all
//!                                     Wait for CTS, sync marker FF to host
//!
//! 01 40 77        77 FFx64            READ_RX_FIFO, 64 bytes to host
//!
//! 00 00                               Identify, sync marker FF to host
//! 00 01                               Reset, sync marker FF to host

use core::convert::Infallible;

use embedded_hal::digital::{OutputPin, StatefulOutputPin};
use embedded_hal_async::delay::DelayNs;
use heapless::Vec;
use num_traits::FromPrimitive;

use crate::{
    frame::{Frame, FrameHeader, MetaCommand, Reply, Request},
    meta::MetaPins,
    opcode::{Opcode, OpcodeClass, FILLER, SYNC_MARKER},
    readiness::{ReadinessState, ReadinessSync},
    traits::{DeviceBus, HostLink},
    BridgeConfig, BridgeError,
};

/// The default request and reply capacity, i.e. everything that can be declared by a frame header.
pub const DEFAULT_CAPACITY: usize = 256;

/// What was done while serving a single frame.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Served {
    Identified,
    Reset,
    Forwarded {
        opcode: u8,
        class: OpcodeClass,
        reply_len: usize,
    },
}

pub struct CommandBridge<Host, Bus, ResetPin, LedPin, Delay, const N: usize = DEFAULT_CAPACITY>
where
    Host: HostLink,
    Bus: DeviceBus,
    ResetPin: OutputPin,
    LedPin: StatefulOutputPin,
    Delay: DelayNs,
{
    host: Host,
    bus: Bus,
    pins: MetaPins<ResetPin, LedPin>,
    delay: Delay,
    sync: ReadinessSync,
    config: BridgeConfig,
}

impl<Host, Bus, ResetPin, LedPin, Delay, const N: usize>
    CommandBridge<Host, Bus, ResetPin, LedPin, Delay, N>
where
    Host: HostLink,
    Bus: DeviceBus,
    ResetPin: OutputPin,
    LedPin: StatefulOutputPin,
    Delay: DelayNs,
{
    /// Create a new bridge.
    /// The peripherals must already be configured, and nSEL should idle high.
    pub fn new(
        host: Host,
        bus: Bus,
        sdn: ResetPin,
        led: LedPin,
        delay: Delay,
        config: BridgeConfig,
    ) -> Self {
        Self {
            host,
            bus,
            pins: MetaPins::new(sdn, led),
            delay,
            sync: ReadinessSync::new(&config),
            config,
        }
    }

    /// Reset the chip so that it is ready to accept the first command.
    pub async fn init(&mut self) -> Result<(), BridgeError> {
        self.reset_chip().await?;
        info!("Bridge ready");
        Ok(())
    }

    pub fn readiness_state(&self) -> ReadinessState {
        self.sync.state()
    }

    pub fn release(self) -> (Host, Bus, ResetPin, LedPin, Delay) {
        let (sdn, led) = self.pins.release();
        (self.host, self.bus, sdn, led, self.delay)
    }

    /// Serve frames from the host forever.
    /// Only a failing host link ends the loop, as no reply can be delivered then.
    pub async fn run(&mut self) -> Result<Infallible, BridgeError> {
        loop {
            match self.serve().await {
                Ok(_) => {}
                Err(e) if e.is_host() => {
                    error!("Host link failed: {:?}", e);
                    return Err(e);
                }
                Err(e) => warn!("Frame failed: {:?}", e),
            }
        }
    }

    /// Receive a single frame from the host, handle it, and send the reply.
    ///
    /// The host always receives the number of bytes it expects, also when the frame fails.
    /// A failed frame is answered with sync markers in place of the reply bytes.
    pub async fn serve(&mut self) -> Result<Served, BridgeError> {
        match self.receive().await? {
            Frame::Meta(command) => {
                let result = self.execute_meta(command).await;
                self.send_reply(&Reply::Sync).await?;
                result?;

                Ok(match command {
                    MetaCommand::Identify => Served::Identified,
                    MetaCommand::Reset => Served::Reset,
                })
            }
            Frame::Forward(request) => match self.forward(&request).await {
                Ok(reply) => {
                    self.send_reply(&reply).await?;
                    Ok(Served::Forwarded {
                        opcode: request.opcode(),
                        class: request.class(),
                        reply_len: reply.wire_len(),
                    })
                }
                Err(e) => {
                    // Leave the chip deselected for the next request.
                    if let Err(reset_error) = self.sync.reset(&mut self.bus) {
                        warn!("Unable to deselect chip: {:?}", reset_error);
                    }
                    self.send_fault(request.rsp_len()).await?;
                    Err(e)
                }
            },
        }
    }

    /// Receive a complete frame.
    /// All request bytes are received before anything is sent to the chip.
    async fn receive(&mut self) -> Result<Frame<N>, BridgeError> {
        let req_len = self.host.recv_byte().await?;
        let rsp_len = self.host.recv_byte().await?;
        let header = FrameHeader { req_len, rsp_len };

        // The reply length of a meta-command only selects the command.
        if let Some(command) = header.meta_command() {
            return Ok(Frame::Meta(command));
        }

        if let Err(e) = header.validate(N) {
            // Consume the frame to stay aligned with the host.
            for _ in 0..req_len {
                self.host.recv_byte().await?;
            }
            self.send_fault(rsp_len).await?;
            return Err(e);
        }

        let mut payload = Vec::<u8, N>::new();
        for _ in 0..req_len {
            let byte = self.host.recv_byte().await?;
            payload
                .push(byte)
                .map_err(|_| BridgeError::MalformedFrame { req_len, rsp_len })?;
        }

        Ok(Frame::Forward(Request::from_vec(payload, rsp_len)))
    }

    async fn execute_meta(&mut self, command: MetaCommand) -> Result<(), BridgeError> {
        match command {
            MetaCommand::Identify => {
                info!("Identify");
                self.pins.identify(&mut self.delay, &self.config).await
            }
            MetaCommand::Reset => self.reset_chip().await,
        }
    }

    async fn reset_chip(&mut self) -> Result<(), BridgeError> {
        info!("Resetting chip");
        self.sync.reset(&mut self.bus)?;
        self.pins.reset(&mut self.delay, &self.config).await
    }

    /// Forward a request to the chip and clock out its reply.
    async fn forward(&mut self, request: &Request<N>) -> Result<Reply<N>, BridgeError> {
        let rsp_len = request.rsp_len();
        trace!(
            "Forwarding {:#x} ({:?}) with {} bytes, expecting {} bytes",
            request.opcode(),
            Opcode::from_u8(request.opcode()),
            request.payload().len(),
            rsp_len
        );

        self.sync.select(&mut self.bus)?;

        // Only the write matters, the chip does not reply while receiving a command.
        for &byte in request.payload() {
            self.bus.transfer_byte(byte).await?;
        }

        match request.class() {
            OpcodeClass::FastPath => {
                // The reply follows immediately in the same transaction.
            }
            OpcodeClass::StandardPath => {
                self.sync.await_ready(&mut self.bus, &mut self.delay).await?;

                if rsp_len == 0 {
                    self.sync.finish(&mut self.bus)?;
                    return Ok(Reply::Sync);
                }

                self.sync.prime_reply_buffer(&mut self.bus).await?;
            }
        }

        self.sync.begin_transfer();
        let mut reply = Vec::<u8, N>::new();
        for _ in 0..rsp_len {
            let byte = self.bus.transfer_byte(FILLER).await?;
            reply.push(byte).map_err(|_| BridgeError::MalformedFrame {
                req_len: request.payload().len() as u8,
                rsp_len,
            })?;
        }
        self.sync.finish(&mut self.bus)?;

        if reply.is_empty() {
            Ok(Reply::Sync)
        } else {
            Ok(Reply::Data(reply))
        }
    }

    async fn send_reply(&mut self, reply: &Reply<N>) -> Result<(), BridgeError> {
        match reply {
            Reply::Data(data) => {
                for &byte in data {
                    self.host.send_byte(byte).await?;
                }
            }
            Reply::Sync => self.host.send_byte(SYNC_MARKER).await?,
        }
        self.host.flush().await
    }

    /// Send the number of bytes expected by the host for a frame that could not be handled.
    async fn send_fault(&mut self, rsp_len: u8) -> Result<(), BridgeError> {
        for _ in 0..u8::max(rsp_len, 1) {
            self.host.send_byte(SYNC_MARKER).await?;
        }
        self.host.flush().await
    }
}
