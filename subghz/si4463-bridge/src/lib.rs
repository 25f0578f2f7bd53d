#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

#[macro_use]
extern crate num_derive;

// This mod MUST go first, so that the others see its macros.
#[macro_use]
mod fmt;

mod bridge;
mod bus;
mod config;
mod error;
pub mod frame;
mod meta;
pub mod opcode;
pub mod readiness;
pub mod traits;

pub use self::{
    bridge::{CommandBridge, Served, DEFAULT_CAPACITY},
    bus::SpiDeviceBus,
    config::BridgeConfig,
    error::{BridgeError, BusError},
    meta::MetaPins,
    opcode::{Opcode, OpcodeClass, SYNC_MARKER},
    readiness::{ReadinessState, ReadinessSync},
};
