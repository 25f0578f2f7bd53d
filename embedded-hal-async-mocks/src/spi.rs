use embedded_hal_async::spi::{self, ErrorKind};
use mockall::{mock, Sequence};

#[derive(Debug, Clone, Copy)]
pub struct SpiError;

impl spi::Error for SpiError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

mock! {
    #[derive(Debug)]
    pub SpiBus {}

    impl spi::ErrorType for SpiBus {
        type Error = SpiError;
    }

    impl spi::SpiBus<u8> for SpiBus {
        async fn read(&mut self, words: &mut [u8]) -> Result<(), SpiError>;
        async fn write(&mut self, words: &[u8]) -> Result<(), SpiError>;
        async fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), SpiError>;
        async fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), SpiError>;
        async fn flush(&mut self) -> Result<(), SpiError>;
    }
}

impl MockSpiBus {
    /// Expect a single full-duplex byte exchange: `mosi` is clocked out and `miso` is clocked in.
    pub fn expect_exchange(&mut self, seq: &mut Sequence, mosi: u8, miso: u8) {
        self.expect_transfer_in_place()
            .withf(move |words| words.len() == 1 && words[0] == mosi)
            .times(1)
            .in_sequence(seq)
            .returning(move |words| {
                words[0] = miso;
                Ok(())
            });
        self.expect_flush()
            .times(1)
            .in_sequence(seq)
            .returning(|| Ok(()));
    }
}
