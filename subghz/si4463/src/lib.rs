#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate num_derive;

// This mod MUST go first, so that the others see its macros.
#[macro_use]
mod fmt;

mod cmd;
pub mod config;
mod driver;
mod error;
mod status;

pub use self::{
    cmd::{StartRx, StartTx, TxCondition},
    config::Si4463Config,
    driver::{Si4463, MAX_FRAME_LEN, MAX_PACKET_LEN, MAX_PROPERTIES},
    error::{ConfigError, DriverError},
    status::{DeviceState, PartInfo, PartNumber, PhStatus, State},
};

#[cfg(all(test, feature = "defmt"))]
mod tests {
    //! This module is required in order to satisfy the requirements of defmt, while running tests.
    //! Note that this will cause all log `defmt::` log statements to be thrown away.

    #[defmt::global_logger]
    struct GlobalLogger;

    unsafe impl defmt::Logger for GlobalLogger {
        fn acquire() {}
        unsafe fn flush() {}
        unsafe fn release() {}
        unsafe fn write(_bytes: &[u8]) {}
    }

    defmt::timestamp!("");

    #[defmt::panic_handler]
    fn panic() -> ! {
        panic!()
    }
}
