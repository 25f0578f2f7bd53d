/// Filler byte clocked out while reading a reply from the chip.
pub const FILLER: u8 = 0xFF;

/// Byte sent to the host when there is no reply payload.
pub const SYNC_MARKER: u8 = 0xFF;

/// The exchange that makes the chip present its pending reply.
pub const PRIME_PREAMBLE: [u8; 2] = [Opcode::ReadCmdBuff as u8, FILLER];

/// Opcodes for which the chip can be read immediately after the request,
/// i.e. without waiting for CTS and without reading the command buffer.
pub const FAST_PATH_OPCODES: [Opcode; 7] = [
    Opcode::ReadRxFifo,
    Opcode::WriteTxFifo,
    Opcode::ReadCmdBuff,
    Opcode::FrrARead,
    Opcode::FrrBRead,
    Opcode::FrrCRead,
    Opcode::FrrDRead,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Opcode {
    /// No operation
    Nop = 0x00,
    /// Report basic information about the device
    PartInfo = 0x01,
    /// Power-up the device with the specified function
    PowerUp = 0x02,
    /// Report function revision information
    FuncInfo = 0x10,
    /// Set the value of one or more properties
    SetProperty = 0x11,
    /// Retrieve the value of one or more properties
    GetProperty = 0x12,
    /// Configure the GPIO pins
    GpioPinCfg = 0x13,
    /// Access the current byte counts in the TX and RX FIFOs, and reset them
    FifoInfo = 0x15,
    /// Return information about the length of the variable field in the last packet received
    PacketInfo = 0x16,
    /// Return and clear the interrupt status
    GetIntStatus = 0x20,
    /// Return and clear the packet handler status
    GetPhStatus = 0x21,
    /// Return and clear the modem status
    GetModemStatus = 0x22,
    /// Switch to TX state and start transmission of a packet
    StartTx = 0x31,
    /// Switch to RX state
    StartRx = 0x32,
    /// Request the current device state and channel
    RequestDeviceState = 0x33,
    /// Manually switch the chip to a desired operating state
    ChangeState = 0x34,
    /// Hop to a new frequency while in RX
    RxHop = 0x36,
    /// Hop to a new frequency while in TX
    TxHop = 0x37,
    /// Read the command buffer, i.e. CTS followed by the reply of the previous command
    ReadCmdBuff = 0x44,
    /// Read fast response register A
    FrrARead = 0x50,
    /// Read fast response register B
    FrrBRead = 0x51,
    /// Read fast response register C
    FrrCRead = 0x53,
    /// Read fast response register D
    FrrDRead = 0x57,
    /// Write data byte(s) to the TX FIFO
    WriteTxFifo = 0x66,
    /// Read data byte(s) from the RX FIFO
    ReadRxFifo = 0x77,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OpcodeClass {
    /// The reply can be clocked out in the same transaction as the request.
    FastPath,
    /// The chip must signal CTS and the command buffer must be primed before the reply can be read.
    StandardPath,
}

impl Opcode {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn class(self) -> OpcodeClass {
        classify(self as u8)
    }
}

/// Classify the first byte of a request.
pub const fn classify(opcode: u8) -> OpcodeClass {
    let mut i = 0;
    while i < FAST_PATH_OPCODES.len() {
        if FAST_PATH_OPCODES[i] as u8 == opcode {
            return OpcodeClass::FastPath;
        }
        i += 1;
    }
    OpcodeClass::StandardPath
}

#[cfg(test)]
mod tests {
    use num_traits::FromPrimitive;

    use super::*;

    #[test]
    fn fast_path_table() {
        for opcode in [0x77, 0x66, 0x44, 0x50, 0x51, 0x53, 0x57] {
            assert_eq!(OpcodeClass::FastPath, classify(opcode), "{:#x}", opcode);
        }
    }

    #[test]
    fn everything_else_is_standard_path() {
        let fast = FAST_PATH_OPCODES.map(Opcode::as_u8);
        for opcode in 0..=u8::MAX {
            if !fast.contains(&opcode) {
                assert_eq!(OpcodeClass::StandardPath, classify(opcode), "{:#x}", opcode);
            }
        }
    }

    #[test]
    fn opcode_class() {
        assert_eq!(OpcodeClass::StandardPath, Opcode::PartInfo.class());
        assert_eq!(OpcodeClass::StandardPath, Opcode::GetIntStatus.class());
        assert_eq!(OpcodeClass::FastPath, Opcode::FrrCRead.class());
        assert_eq!(Some(Opcode::StartTx), Opcode::from_u8(0x31));
        assert_eq!(None, Opcode::from_u8(0x52));
    }

    #[test]
    fn preamble() {
        assert_eq!([0x44, 0xFF], PRIME_PREAMBLE);
    }
}
