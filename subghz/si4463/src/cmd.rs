use bitfield::bitfield;

use crate::State;

bitfield! {
    /// The `CONDITION` argument of `START_TX`.
    #[derive(Clone, Copy, PartialEq)]
    pub struct TxCondition(u8);
    impl Debug;
    /// The state entered when the packet has been sent.
    pub u8, txcomplete_state, set_txcomplete_state: 7, 4;
    /// Send the last packet in the tx fifo again.
    pub retransmit, set_retransmit: 2;
    /// 0: start immediately, 1: start on wake-up timer expiry.
    pub u8, start, set_start: 1, 0;
}

/// Arguments for `START_TX`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StartTx {
    pub channel: u8,
    pub condition: TxCondition,
    /// The number of bytes to send, 0 to use the length configured by the packet handler.
    pub tx_len: u16,
}

impl StartTx {
    pub fn new(channel: u8, tx_len: u16) -> Self {
        let mut condition = TxCondition(0);
        condition.set_txcomplete_state(State::Ready as u8);
        Self {
            channel,
            condition,
            tx_len,
        }
    }

    pub fn args(&self) -> [u8; 4] {
        let [len_hi, len_lo] = self.tx_len.to_be_bytes();
        [self.channel, self.condition.0, len_hi, len_lo]
    }
}

/// Arguments for `START_RX`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StartRx {
    pub channel: u8,
    pub start: u8,
    /// The number of bytes to receive, 0 to use the length configured by the packet handler.
    pub rx_len: u16,
    pub rxtimeout_state: State,
    pub rxvalid_state: State,
    pub rxinvalid_state: State,
}

impl StartRx {
    pub const fn new(channel: u8, rx_len: u16) -> Self {
        Self {
            channel,
            start: 0,
            rx_len,
            rxtimeout_state: State::NoChange,
            rxvalid_state: State::Ready,
            rxinvalid_state: State::Rx,
        }
    }

    pub fn args(&self) -> [u8; 7] {
        let [len_hi, len_lo] = self.rx_len.to_be_bytes();
        [
            self.channel,
            self.start,
            len_hi,
            len_lo,
            self.rxtimeout_state as u8,
            self.rxvalid_state as u8,
            self.rxinvalid_state as u8,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_tx_defaults() {
        // Given
        let cmd = StartTx::new(0, 17);

        // Then
        assert_eq!([0x00, 0x30, 0x00, 0x11], cmd.args());
    }

    #[test]
    fn tx_condition_layout() {
        // Given
        let mut condition = TxCondition(0);

        // When
        condition.set_txcomplete_state(State::Rx as u8);
        condition.set_retransmit(true);
        condition.set_start(1);

        // Then
        assert_eq!(0x85, condition.0);
    }

    #[test]
    fn start_rx_defaults() {
        // Given
        let cmd = StartRx::new(3, 0x0140);

        // Then
        assert_eq!([0x03, 0x00, 0x01, 0x40, 0x00, 0x03, 0x08], cmd.args());
    }
}
