use embedded_hal::digital::{self, ErrorKind};
use mockall::mock;

#[derive(Debug, Clone, Copy)]
pub struct PinError;

impl digital::Error for PinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

mock! {
    #[derive(Debug)]
    pub OutputPin {}

    impl digital::ErrorType for OutputPin {
        type Error = PinError;
    }

    impl digital::OutputPin for OutputPin {
        fn set_low(&mut self) -> Result<(), PinError>;
        fn set_high(&mut self) -> Result<(), PinError>;
    }

    impl digital::StatefulOutputPin for OutputPin {
        fn is_set_high(&mut self) -> Result<bool, PinError>;
        fn is_set_low(&mut self) -> Result<bool, PinError>;
        fn toggle(&mut self) -> Result<(), PinError>;
    }
}

mock! {
    #[derive(Debug)]
    pub InputPin {}

    impl digital::ErrorType for InputPin {
        type Error = PinError;
    }

    impl digital::InputPin for InputPin {
        fn is_high(&mut self) -> Result<bool, PinError>;
        fn is_low(&mut self) -> Result<bool, PinError>;
    }
}

impl MockOutputPin {
    /// An output pin accepting any level change.
    pub fn permissive() -> Self {
        let mut pin = Self::new();
        pin.expect_set_low().returning(|| Ok(()));
        pin.expect_set_high().returning(|| Ok(()));
        pin.expect_toggle().returning(|| Ok(()));
        pin
    }
}
