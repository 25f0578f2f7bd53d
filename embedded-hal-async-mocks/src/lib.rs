pub mod delay;
pub mod digital;
pub mod serial;
pub mod spi;
