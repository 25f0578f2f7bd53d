use embedded_hal::digital::{OutputPin, StatefulOutputPin};
use embedded_hal_async::delay::DelayNs;

use crate::{BridgeConfig, BridgeError};

/// The pins used by the bridge local commands.
pub struct MetaPins<ResetPin, LedPin>
where
    ResetPin: OutputPin,
    LedPin: StatefulOutputPin,
{
    /// The chip SDN pin. The chip is shut down while high.
    sdn: ResetPin,
    led: LedPin,
}

impl<ResetPin, LedPin> MetaPins<ResetPin, LedPin>
where
    ResetPin: OutputPin,
    LedPin: StatefulOutputPin,
{
    pub const fn new(sdn: ResetPin, led: LedPin) -> Self {
        Self { sdn, led }
    }

    pub fn release(self) -> (ResetPin, LedPin) {
        (self.sdn, self.led)
    }

    /// Blink the indicator.
    /// The indicator is left in the state it had before the call if the toggle count is even.
    pub async fn identify<Delay: DelayNs>(
        &mut self,
        delay: &mut Delay,
        config: &BridgeConfig,
    ) -> Result<(), BridgeError> {
        for _ in 0..config.identify_toggles {
            self.led.toggle().map_err(|_| BridgeError::Pin)?;
            delay.delay_ms(config.identify_interval_ms).await;
        }
        Ok(())
    }

    /// Shut the chip down and power it up again.
    pub async fn reset<Delay: DelayNs>(
        &mut self,
        delay: &mut Delay,
        config: &BridgeConfig,
    ) -> Result<(), BridgeError> {
        self.sdn.set_high().map_err(|_| BridgeError::Pin)?;
        delay.delay_ms(config.reset_pulse_ms).await;
        self.sdn.set_low().map_err(|_| BridgeError::Pin)?;
        delay.delay_ms(config.power_on_settle_ms).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use embedded_hal_async_mocks::{
        delay::MockDelay,
        digital::{MockOutputPin, PinError},
    };
    use mockall::Sequence;

    use super::*;

    #[tokio::test]
    async fn identify_toggles_indicator() {
        // Given
        let config = BridgeConfig::new();
        let mut seq = Sequence::new();
        let mut led = MockOutputPin::new();
        let mut delay = MockDelay::new();
        for _ in 0..6 {
            led.expect_toggle()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|| Ok(()));
            delay
                .expect_delay_ms()
                .withf(|ms| *ms == 100)
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());
        }

        let mut pins = MetaPins::new(MockOutputPin::new(), led);

        // When
        pins.identify(&mut delay, &config).await.unwrap();
    }

    #[tokio::test]
    async fn reset_timing() {
        // Given
        let config = BridgeConfig {
            reset_pulse_ms: 3,
            power_on_settle_ms: 20,
            ..BridgeConfig::new()
        };
        let mut seq = Sequence::new();
        let mut sdn = MockOutputPin::new();
        let mut delay = MockDelay::new();
        sdn.expect_set_high()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        delay
            .expect_delay_ms()
            .withf(|ms| *ms == 3)
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        sdn.expect_set_low()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        delay
            .expect_delay_ms()
            .withf(|ms| *ms == 20)
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let mut pins = MetaPins::new(sdn, MockOutputPin::new());

        // When
        pins.reset(&mut delay, &config).await.unwrap();
    }

    #[tokio::test]
    async fn reset_pin_error() {
        // Given
        let mut sdn = MockOutputPin::new();
        sdn.expect_set_high().times(1).returning(|| Err(PinError));
        let mut pins = MetaPins::new(sdn, MockOutputPin::new());
        let mut delay = MockDelay::new();

        // When
        let result = pins.reset(&mut delay, &BridgeConfig::new()).await;

        // Then
        assert_eq!(Err(BridgeError::Pin), result);
    }
}
