use embedded_hal_async::delay::DelayNs;
use embedded_io_async::{Read, Write};
use num_traits::FromPrimitive;
use si4463_bridge::{Opcode, SYNC_MARKER};

use crate::{
    config::{self, Si4463Config},
    DeviceState, DriverError, PartInfo, PartNumber, PhStatus, StartRx, StartTx, State,
};

/// The largest number of request or reply bytes in a single frame.
pub const MAX_FRAME_LEN: usize = u8::MAX as usize;

/// The largest number of properties read or written by a single command.
pub const MAX_PROPERTIES: usize = 12;

/// The size of the chip fifo used for a single packet, including the length byte.
pub const MAX_PACKET_LEN: usize = 64;

const FIFO_INFO_RESET_TX: u8 = 0x01;
const FIFO_INFO_RESET_RX: u8 = 0x02;

/// A Si4463 attached to a command bridge.
pub struct Si4463<Link: Read + Write, Delay: DelayNs> {
    link: Link,
    delay: Delay,
    config: Si4463Config,
}

impl<Link: Read + Write, Delay: DelayNs> Si4463<Link, Delay> {
    pub const fn new(link: Link, delay: Delay, config: Si4463Config) -> Self {
        Self {
            link,
            delay,
            config,
        }
    }

    pub fn release(self) -> (Link, Delay) {
        (self.link, self.delay)
    }

    /// Blink the bridge indicator.
    pub async fn identify(&mut self) -> Result<(), DriverError> {
        self.send_frame(&[0, 0], &[]).await?;
        self.read_sync().await
    }

    /// Hardware reset the chip through the bridge.
    pub async fn reset(&mut self) -> Result<(), DriverError> {
        self.send_frame(&[0, 1], &[]).await?;
        self.read_sync().await
    }

    /// Send a command to the chip and read its reply into `rsp`.
    /// The bridge replies with a sync marker if `rsp` is empty.
    pub async fn request(&mut self, req: &[u8], rsp: &mut [u8]) -> Result<(), DriverError> {
        self.request_parts(&[req], rsp).await
    }

    /// Send a command whose bytes are split across `parts`.
    pub async fn request_parts(
        &mut self,
        parts: &[&[u8]],
        rsp: &mut [u8],
    ) -> Result<(), DriverError> {
        let req_len: usize = parts.iter().map(|part| part.len()).sum();
        if req_len == 0 || req_len > MAX_FRAME_LEN || rsp.len() > MAX_FRAME_LEN {
            return Err(DriverError::InvalidRequest);
        }

        trace!(
            "Sending {} request bytes, expecting {} bytes",
            req_len,
            rsp.len()
        );
        self.send_frame(&[req_len as u8, rsp.len() as u8], parts)
            .await?;

        if rsp.is_empty() {
            self.read_sync().await
        } else {
            self.link.read_exact(rsp).await?;
            Ok(())
        }
    }

    async fn send_frame(&mut self, header: &[u8; 2], parts: &[&[u8]]) -> Result<(), DriverError> {
        self.link
            .write_all(header)
            .await
            .map_err(DriverError::link)?;
        for part in parts {
            self.link
                .write_all(part)
                .await
                .map_err(DriverError::link)?;
        }
        self.link.flush().await.map_err(DriverError::link)
    }

    async fn read_sync(&mut self) -> Result<(), DriverError> {
        let mut sync = [0];
        self.link.read_exact(&mut sync).await?;
        match sync[0] {
            SYNC_MARKER => Ok(()),
            other => Err(DriverError::UnexpectedSync(other)),
        }
    }

    /// Send every command in a WDS `radio_config.h` header.
    /// Nothing is sent if any of the commands is invalid.
    pub async fn apply_config(&mut self, header: &str) -> Result<(), DriverError> {
        for command in config::commands(header) {
            command?;
        }

        for command in config::commands(header) {
            let command = command?;
            debug!("Applying command {:#x}", command[0]);
            self.request(&command, &mut []).await?;
        }
        Ok(())
    }

    pub async fn part_info(&mut self) -> Result<PartInfo, DriverError> {
        let mut rsp = [0; PartInfo::LEN];
        self.request(&[Opcode::PartInfo as u8], &mut rsp).await?;
        Ok(PartInfo::from_bytes(&rsp))
    }

    /// Ensure that the chip is a Si4463.
    pub async fn verify_part(&mut self) -> Result<PartNumber, DriverError> {
        let info = self.part_info().await?;
        info!("Chip part {:#x} revision {:#x}", info.part, info.chiprev);
        info.part_number()
            .ok_or(DriverError::InvalidPartNumber(info.part))
    }

    /// Read `values.len()` consecutive properties starting at `index` in `group`.
    pub async fn get_property(
        &mut self,
        group: u8,
        index: u8,
        values: &mut [u8],
    ) -> Result<(), DriverError> {
        if values.is_empty() || values.len() > MAX_PROPERTIES {
            return Err(DriverError::InvalidRequest);
        }
        let req = [Opcode::GetProperty as u8, group, values.len() as u8, index];
        self.request(&req, values).await
    }

    /// Write consecutive properties starting at `index` in `group`.
    pub async fn set_property(
        &mut self,
        group: u8,
        index: u8,
        values: &[u8],
    ) -> Result<(), DriverError> {
        if values.is_empty() || values.len() > MAX_PROPERTIES {
            return Err(DriverError::InvalidRequest);
        }
        let header = [Opcode::SetProperty as u8, group, values.len() as u8, index];
        self.request_parts(&[&header, values], &mut []).await
    }

    pub async fn rx_fifo_count(&mut self) -> Result<u8, DriverError> {
        let mut rsp = [0; 1];
        self.request(&[Opcode::FifoInfo as u8, 0x00], &mut rsp)
            .await?;
        Ok(rsp[0])
    }

    pub async fn tx_fifo_space(&mut self) -> Result<u8, DriverError> {
        let mut rsp = [0; 2];
        self.request(&[Opcode::FifoInfo as u8, 0x00], &mut rsp)
            .await?;
        Ok(rsp[1])
    }

    pub async fn clear_tx_fifo(&mut self) -> Result<(), DriverError> {
        self.request(&[Opcode::FifoInfo as u8, FIFO_INFO_RESET_TX], &mut [])
            .await
    }

    pub async fn clear_rx_fifo(&mut self) -> Result<(), DriverError> {
        self.request(&[Opcode::FifoInfo as u8, FIFO_INFO_RESET_RX], &mut [])
            .await
    }

    /// Clear all pending interrupts.
    pub async fn clear_interrupts(&mut self) -> Result<(), DriverError> {
        self.request(&[Opcode::GetIntStatus as u8, 0x00, 0x00, 0x00], &mut [])
            .await
    }

    pub async fn clear_packet_rx(&mut self) -> Result<(), DriverError> {
        self.request(&[Opcode::GetPhStatus as u8, !PhStatus::PACKET_RX], &mut [])
            .await
    }

    pub async fn clear_packet_sent(&mut self) -> Result<(), DriverError> {
        self.request(
            &[Opcode::GetPhStatus as u8, !PhStatus::PACKET_SENT],
            &mut [],
        )
        .await
    }

    pub async fn write_tx_fifo(&mut self, data: &[u8]) -> Result<(), DriverError> {
        self.request_parts(&[&[Opcode::WriteTxFifo as u8], data], &mut [])
            .await
    }

    pub async fn read_rx_fifo(&mut self, buffer: &mut [u8]) -> Result<(), DriverError> {
        if buffer.is_empty() {
            return Err(DriverError::InvalidRequest);
        }
        self.request(&[Opcode::ReadRxFifo as u8], buffer).await
    }

    /// Read the packet handler status.
    /// This expects fast response register A to be configured for the packet handler pending interrupts.
    pub async fn ph_status(&mut self) -> Result<PhStatus, DriverError> {
        let mut rsp = [0; 1];
        self.request(&[Opcode::FrrARead as u8], &mut rsp).await?;
        Ok(PhStatus(rsp[0]))
    }

    pub async fn request_device_state(&mut self) -> Result<DeviceState, DriverError> {
        let mut rsp = [0; 2];
        self.request(&[Opcode::RequestDeviceState as u8], &mut rsp)
            .await?;
        let state = State::from_u8(rsp[0] & 0x0F).ok_or(DriverError::InvalidState(rsp[0]))?;
        Ok(DeviceState {
            state,
            channel: rsp[1],
        })
    }

    pub async fn change_state(&mut self, state: State) -> Result<(), DriverError> {
        self.request(&[Opcode::ChangeState as u8, state as u8], &mut [])
            .await
    }

    pub async fn start_tx(&mut self, cmd: &StartTx) -> Result<(), DriverError> {
        self.request_parts(&[&[Opcode::StartTx as u8], &cmd.args()], &mut [])
            .await
    }

    pub async fn start_rx(&mut self, cmd: &StartRx) -> Result<(), DriverError> {
        self.request_parts(&[&[Opcode::StartRx as u8], &cmd.args()], &mut [])
            .await
    }

    /// Wait until a packet is received.
    pub async fn wait_packet_rx(&mut self) -> Result<(), DriverError> {
        self.wait_ph_status(PhStatus::packet_rx).await
    }

    /// Wait until a packet is sent.
    pub async fn wait_packet_sent(&mut self) -> Result<(), DriverError> {
        self.wait_ph_status(PhStatus::packet_sent).await
    }

    async fn wait_ph_status(&mut self, condition: fn(&PhStatus) -> bool) -> Result<(), DriverError> {
        let mut waited_ms: u32 = 0;
        loop {
            if condition(&self.ph_status().await?) {
                return Ok(());
            }

            if waited_ms >= self.config.poll_timeout_ms {
                warn!("Timeout waiting for packet handler");
                return Err(DriverError::Timeout);
            }

            self.delay.delay_ms(self.config.poll_interval_ms).await;
            waited_ms = waited_ms.saturating_add(self.config.poll_interval_ms.max(1));
        }
    }

    /// Send a variable length packet, where the first byte on air is the packet length.
    pub async fn send_packet(&mut self, channel: u8, data: &[u8]) -> Result<(), DriverError> {
        if data.len() >= MAX_PACKET_LEN {
            return Err(DriverError::InvalidRequest);
        }

        self.clear_interrupts().await?;
        self.clear_tx_fifo().await?;
        self.request_parts(
            &[&[Opcode::WriteTxFifo as u8, data.len() as u8], data],
            &mut [],
        )
        .await?;
        self.start_tx(&StartTx::new(channel, 1 + data.len() as u16))
            .await?;
        self.wait_packet_sent().await?;
        debug!("Sent {} bytes", data.len());
        Ok(())
    }

    /// Receive a variable length packet sent by [`Self::send_packet()`] into `buffer`,
    /// returning the packet length.
    pub async fn receive_packet(
        &mut self,
        channel: u8,
        buffer: &mut [u8; MAX_PACKET_LEN],
    ) -> Result<usize, DriverError> {
        self.clear_interrupts().await?;
        self.clear_rx_fifo().await?;
        self.start_rx(&StartRx::new(channel, MAX_PACKET_LEN as u16))
            .await?;
        self.wait_packet_rx().await?;
        self.read_rx_fifo(buffer).await?;

        let len = usize::min(buffer[0] as usize, MAX_PACKET_LEN - 1);
        buffer.copy_within(1..1 + len, 0);
        debug!("Received {} bytes", len);
        Ok(len)
    }
}
