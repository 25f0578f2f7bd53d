//! Radio configuration
//!
//! Configurations are generated by Silicon Labs WDS as a `radio_config.h` header,
//! where every `RF_*` definition is a complete chip command, e.g.
//!
//! ```text
//! #define RF_POWER_UP 0x02, 0x01, 0x00, 0x01, 0xC9, 0xC3, 0x80
//! ```

use heapless::Vec;

use crate::ConfigError;

/// The size of the chip command buffer.
pub const MAX_COMMAND_LEN: usize = 16;

pub type Command = Vec<u8, MAX_COMMAND_LEN>;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Si4463Config {
    /// The interval between packet handler status reads while waiting for a packet.
    pub poll_interval_ms: u32,
    /// The maximum time to wait for a packet to be sent or received.
    pub poll_timeout_ms: u32,
}

impl Si4463Config {
    pub const fn new() -> Self {
        Self {
            poll_interval_ms: 1,
            poll_timeout_ms: 1000,
        }
    }
}

impl Default for Si4463Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterate the commands defined in a WDS `radio_config.h` header, in file order.
pub fn commands(header: &str) -> impl Iterator<Item = Result<Command, ConfigError>> + '_ {
    header
        .lines()
        .enumerate()
        .filter_map(|(index, line)| definition(line).map(|value| parse_command(value, index + 1)))
}

/// Get the value of a `#define RF_*` line.
fn definition(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("#define ")?;
    let (name, value) = rest.split_once(' ')?;
    let is_name = name.starts_with("RF_")
        && name
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_');
    if is_name {
        Some(value)
    } else {
        None
    }
}

fn parse_command(value: &str, line: usize) -> Result<Command, ConfigError> {
    let mut command = Command::new();
    for item in value.trim().trim_end_matches(',').split(',') {
        let byte = parse_byte(item.trim()).ok_or(ConfigError::InvalidValue { line })?;
        command
            .push(byte)
            .map_err(|_| ConfigError::TooLong { line })?;
    }
    Ok(command)
}

fn parse_byte(item: &str) -> Option<u8> {
    match item
        .strip_prefix("0x")
        .or_else(|| item.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => item.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "\
// Radio configuration
#ifndef RADIO_CONFIG_H_
#define RADIO_CONFIG_H_
#define RADIO_CONFIGURATION_DATA_RADIO_XO_FREQ 30000000L
#define RF_POWER_UP 0x02, 0x01, 0x00, 0x01, 0xC9, 0xC3, 0x80
#define RF_GPIO_PIN_CFG 0x13, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00
#define RF_GLOBAL_XO_TUNE_2 0x11, 0x00, 0x02, 0x00, 0x52, 0x00
    #define RF_INDENTED 0x01
#define RF_NOP 0
#endif
";

    #[test]
    fn can_read_commands() {
        // When
        let commands: std::vec::Vec<_> = commands(HEADER).collect();

        // Then
        assert_eq!(4, commands.len());
        assert_eq!(
            &[0x02, 0x01, 0x00, 0x01, 0xC9, 0xC3, 0x80],
            commands[0].as_ref().unwrap().as_slice()
        );
        assert_eq!(8, commands[1].as_ref().unwrap().len());
        assert_eq!(
            &[0x11, 0x00, 0x02, 0x00, 0x52, 0x00],
            commands[2].as_ref().unwrap().as_slice()
        );
        assert_eq!(&[0x00], commands[3].as_ref().unwrap().as_slice());
    }

    #[test]
    fn invalid_value() {
        // Given
        let header = "#define RF_A 0x01\n#define RF_B 0x02, {0x03}\n";

        // When
        let commands: std::vec::Vec<_> = commands(header).collect();

        // Then
        assert_eq!(Ok(&[0x01][..]), commands[0].as_deref());
        assert_eq!(Err(ConfigError::InvalidValue { line: 2 }), commands[1]);
    }

    #[test]
    fn byte_out_of_range() {
        let mut commands = commands("#define RF_A 0x100\n");
        assert_eq!(
            Some(Err(ConfigError::InvalidValue { line: 1 })),
            commands.next()
        );
    }

    #[test]
    fn command_too_long() {
        // Given
        let header = "#define RF_LONG 0x11, 0x00, 0x0D, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D\n";

        // When
        let result = commands(header).next();

        // Then
        assert_eq!(Some(Err(ConfigError::TooLong { line: 1 })), result);
    }
}
