use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::spi::SpiBus;

use crate::{traits::DeviceBus, BusError};

/// A [`DeviceBus`] on an exclusively owned spi bus with a gpio for nSEL and a gpio for CTS.
///
/// The chip must be wired with GPIO1 in its power on default configuration, i.e. as CTS.
pub struct SpiDeviceBus<Spi, SelectPin, CtsPin>
where
    Spi: SpiBus,
    SelectPin: OutputPin,
    CtsPin: InputPin,
{
    spi: Spi,
    nsel: SelectPin,
    cts: CtsPin,
}

impl<Spi, SelectPin, CtsPin> SpiDeviceBus<Spi, SelectPin, CtsPin>
where
    Spi: SpiBus,
    SelectPin: OutputPin,
    CtsPin: InputPin,
{
    pub const fn new(spi: Spi, nsel: SelectPin, cts: CtsPin) -> Self {
        Self { spi, nsel, cts }
    }

    pub fn release(self) -> (Spi, SelectPin, CtsPin) {
        (self.spi, self.nsel, self.cts)
    }
}

impl<Spi, SelectPin, CtsPin> DeviceBus for SpiDeviceBus<Spi, SelectPin, CtsPin>
where
    Spi: SpiBus,
    SelectPin: OutputPin,
    CtsPin: InputPin,
{
    fn assert_select(&mut self) -> Result<(), BusError> {
        self.nsel.set_low().map_err(|_| BusError::Select)
    }

    fn deassert_select(&mut self) -> Result<(), BusError> {
        self.nsel.set_high().map_err(|_| BusError::Select)
    }

    async fn transfer_byte(&mut self, byte: u8) -> Result<u8, BusError> {
        let mut word = [byte];

        // Reading back the received byte also clears a pending overrun.
        self.spi
            .transfer_in_place(&mut word)
            .await
            .map_err(|_| BusError::Spi)?;

        // Wait for the bus to become idle.
        self.spi.flush().await.map_err(|_| BusError::Spi)?;

        Ok(word[0])
    }

    fn is_ready(&mut self) -> Result<bool, BusError> {
        self.cts.is_high().map_err(|_| BusError::Ready)
    }
}

#[cfg(test)]
mod tests {
    use embedded_hal_async_mocks::{
        digital::{MockInputPin, MockOutputPin, PinError},
        spi::{MockSpiBus, SpiError},
    };
    use mockall::Sequence;

    use super::*;

    #[tokio::test]
    async fn transfer_byte_waits_for_idle_bus() {
        // Given
        let mut seq = Sequence::new();
        let mut spi = MockSpiBus::new();
        spi.expect_exchange(&mut seq, 0x01, 0xFF);
        spi.expect_exchange(&mut seq, 0xFF, 0x44);

        let mut bus = SpiDeviceBus::new(spi, MockOutputPin::new(), MockInputPin::new());

        // When
        let first = bus.transfer_byte(0x01).await.unwrap();
        let second = bus.transfer_byte(0xFF).await.unwrap();

        // Then
        assert_eq!(0xFF, first);
        assert_eq!(0x44, second);
    }

    #[tokio::test]
    async fn transfer_error() {
        // Given
        let mut spi = MockSpiBus::new();
        spi.expect_transfer_in_place()
            .times(1)
            .returning(|_| Err(SpiError));

        let mut bus = SpiDeviceBus::new(spi, MockOutputPin::new(), MockInputPin::new());

        // When
        let result = bus.transfer_byte(0x01).await;

        // Then
        assert_eq!(Err(BusError::Spi), result);
    }

    #[test]
    fn select_is_active_low() {
        // Given
        let mut seq = Sequence::new();
        let mut nsel = MockOutputPin::new();
        nsel.expect_set_low()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        nsel.expect_set_high()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));

        let mut bus = SpiDeviceBus::new(MockSpiBus::new(), nsel, MockInputPin::new());

        // When
        bus.assert_select().unwrap();
        bus.deassert_select().unwrap();
    }

    #[test]
    fn cts_is_active_high() {
        // Given
        let mut seq = Sequence::new();
        let mut cts = MockInputPin::new();
        cts.expect_is_high()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(false));
        cts.expect_is_high()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(true));
        cts.expect_is_high()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(PinError));

        let mut bus = SpiDeviceBus::new(MockSpiBus::new(), MockOutputPin::new(), cts);

        // Then
        assert_eq!(Ok(false), bus.is_ready());
        assert_eq!(Ok(true), bus.is_ready());
        assert_eq!(Err(BusError::Ready), bus.is_ready());
    }
}
