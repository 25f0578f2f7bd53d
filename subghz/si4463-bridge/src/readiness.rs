//! The CTS handshake
//!
//! The chip only presents the reply to a command after it has finished processing it.
//! Processing starts when nSEL is released, and completion is signalled by CTS going high.
//! The reply is then read in a new transaction that starts with [`PRIME_PREAMBLE`].
//!
//! State          nSEL    Description
//! Idle           high    No request in progress
//! Selected       low     Request bytes are being written
//! AwaitingReady  high    Waiting for CTS
//! Primed         low     Command buffer read issued, reply is next on the bus
//! Transferring   low     Reply bytes are being clocked out

use embedded_hal_async::delay::DelayNs;

use crate::{opcode::PRIME_PREAMBLE, traits::DeviceBus, BridgeConfig, BridgeError, BusError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadinessState {
    Idle,
    Selected,
    AwaitingReady,
    Primed,
    Transferring,
}

impl ReadinessState {
    /// Whether nSEL is asserted in this state.
    pub const fn is_selected(self) -> bool {
        matches!(
            self,
            ReadinessState::Selected | ReadinessState::Primed | ReadinessState::Transferring
        )
    }
}

pub struct ReadinessSync {
    state: ReadinessState,
    timeout_us: u32,
    poll_interval_us: u32,
}

impl ReadinessSync {
    pub const fn new(config: &BridgeConfig) -> Self {
        Self {
            state: ReadinessState::Idle,
            timeout_us: config.cts_timeout_us,
            poll_interval_us: if config.cts_poll_interval_us > 0 {
                config.cts_poll_interval_us
            } else {
                1
            },
        }
    }

    pub const fn state(&self) -> ReadinessState {
        self.state
    }

    /// Start a new request by selecting the chip.
    pub fn select<Bus: DeviceBus>(&mut self, bus: &mut Bus) -> Result<(), BusError> {
        debug_assert_eq!(ReadinessState::Idle, self.state);
        bus.assert_select()?;
        self.state = ReadinessState::Selected;
        Ok(())
    }

    /// Release the chip so that it starts processing the request, and wait for CTS.
    pub async fn await_ready<Bus: DeviceBus, Delay: DelayNs>(
        &mut self,
        bus: &mut Bus,
        delay: &mut Delay,
    ) -> Result<(), BridgeError> {
        debug_assert_eq!(ReadinessState::Selected, self.state);
        bus.deassert_select()?;
        self.state = ReadinessState::AwaitingReady;

        let mut waited_us: u32 = 0;
        loop {
            if bus.is_ready()? {
                return Ok(());
            }

            if waited_us >= self.timeout_us {
                return Err(BridgeError::ReadinessTimeout);
            }

            delay.delay_us(self.poll_interval_us).await;
            waited_us = waited_us.saturating_add(self.poll_interval_us);
        }
    }

    /// Select the chip and read the command buffer header, after which the reply is next on the bus.
    /// Both bytes returned by the chip, i.e. the echo and CTS, are discarded.
    pub async fn prime_reply_buffer<Bus: DeviceBus>(
        &mut self,
        bus: &mut Bus,
    ) -> Result<(), BusError> {
        debug_assert_eq!(ReadinessState::AwaitingReady, self.state);
        bus.assert_select()?;
        self.state = ReadinessState::Selected;

        for byte in PRIME_PREAMBLE {
            bus.transfer_byte(byte).await?;
        }

        self.state = ReadinessState::Primed;
        Ok(())
    }

    /// Mark that the reply is about to be clocked out.
    pub fn begin_transfer(&mut self) {
        debug_assert!(matches!(
            self.state,
            ReadinessState::Selected | ReadinessState::Primed
        ));
        self.state = ReadinessState::Transferring;
    }

    /// Complete the request, releasing the chip if it is still selected.
    pub fn finish<Bus: DeviceBus>(&mut self, bus: &mut Bus) -> Result<(), BusError> {
        if self.state.is_selected() {
            bus.deassert_select()?;
        }
        self.state = ReadinessState::Idle;
        Ok(())
    }

    /// Unconditionally release the chip and return to idle.
    pub fn reset<Bus: DeviceBus>(&mut self, bus: &mut Bus) -> Result<(), BusError> {
        self.state = ReadinessState::Idle;
        bus.deassert_select()
    }
}
