use bitfield::bitfield;

bitfield! {
    /// The packet handler interrupt status, as read through fast response register A.
    #[derive(Clone, Copy, PartialEq)]
    pub struct PhStatus(u8);
    impl Debug;
    pub filter_match, _: 7;
    pub filter_miss, _: 6;
    /// A packet has been transmitted.
    pub packet_sent, _: 5;
    /// A valid packet has been received.
    pub packet_rx, _: 4;
    pub crc_error, _: 3;
    pub alt_crc_error, _: 2;
    pub tx_fifo_almost_empty, _: 1;
    pub rx_fifo_almost_full, _: 0;
}

impl PhStatus {
    pub const PACKET_SENT: u8 = 1 << 5;
    pub const PACKET_RX: u8 = 1 << 4;
}

#[cfg(feature = "defmt")]
impl defmt::Format for PhStatus {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "PhStatus({=u8:#x})", self.0)
    }
}

/// The main state of the chip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum State {
    /// Remain in the current state. Only meaningful as a state transition argument.
    NoChange = 0,
    Sleep = 1,
    SpiActive = 2,
    Ready = 3,
    Ready2 = 4,
    TxTune = 5,
    RxTune = 6,
    Tx = 7,
    Rx = 8,
    RxIdle = 9,
}

/// The current state and channel as returned by `REQUEST_DEVICE_STATE`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceState {
    pub state: State,
    pub channel: u8,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PartNumber {
    Si4463,
}

/// The reply to `PART_INFO`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PartInfo {
    pub chiprev: u8,
    pub part: u16,
    pub pbuild: u8,
    pub id: u16,
    pub customer: u8,
    pub romid: u8,
}

impl PartInfo {
    pub const LEN: usize = 8;

    pub const fn from_bytes(bytes: &[u8; Self::LEN]) -> Self {
        Self {
            chiprev: bytes[0],
            part: u16::from_be_bytes([bytes[1], bytes[2]]),
            pbuild: bytes[3],
            id: u16::from_be_bytes([bytes[4], bytes[5]]),
            customer: bytes[6],
            romid: bytes[7],
        }
    }

    pub const fn part_number(&self) -> Option<PartNumber> {
        match self.part {
            0x4463 => Some(PartNumber::Si4463),
            _ => None,
        }
    }
}
