/// Timing used by the bridge.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BridgeConfig {
    /// The maximum time to wait for the chip to signal CTS after a command.
    pub cts_timeout_us: u32,
    /// The interval between samples of the CTS pin.
    pub cts_poll_interval_us: u32,
    /// The time the SDN pin is kept high during a reset.
    pub reset_pulse_ms: u32,
    /// The time to wait after SDN is released before the chip accepts commands.
    pub power_on_settle_ms: u32,
    /// The number of times the indicator is toggled during identify.
    pub identify_toggles: u8,
    /// The time between indicator toggles.
    pub identify_interval_ms: u32,
}

impl BridgeConfig {
    pub const fn new() -> Self {
        Self {
            cts_timeout_us: 250_000,
            cts_poll_interval_us: 10,
            reset_pulse_ms: 10, // The datasheet requires at least 10us
            power_on_settle_ms: 15, // Power on reset takes up to 6ms, and POWER_UP is not accepted before
            identify_toggles: 6,
            identify_interval_ms: 100,
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}
