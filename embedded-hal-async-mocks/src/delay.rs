use embedded_hal_async::delay;
use mockall::mock;

mock! {
    #[derive(Debug)]
    pub Delay {}

    impl delay::DelayNs for Delay {
        async fn delay_ns(&mut self, ns: u32);
        async fn delay_us(&mut self, us: u32);
        async fn delay_ms(&mut self, ms: u32);
    }
}

impl MockDelay {
    /// Accept any delay without recording it.
    pub fn permissive() -> Self {
        let mut delay = Self::new();
        delay.expect_delay_ns().return_const(());
        delay.expect_delay_us().return_const(());
        delay.expect_delay_ms().return_const(());
        delay
    }
}
