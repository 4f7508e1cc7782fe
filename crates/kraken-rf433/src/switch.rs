//! [`Rf433Switch`] -- a catalog model bound to an address and a transmitter.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use kraken_core::error::Result;
use kraken_core::switch::{RemoteSwitch, SwitchInfo};
use kraken_core::types::{Codeword, Status, TransmitReport};

use crate::catalog::ResolvedDevice;
use crate::encoder;
use crate::transmitter::{TransmitOptions, Transmitter};

/// A 433 MHz remote-controlled socket.
///
/// Several switches can share one [`Transmitter`]; their requests are
/// queued and sent one after another.
pub struct Rf433Switch {
    info: SwitchInfo,
    transmitter: Arc<Transmitter>,
}

impl Rf433Switch {
    /// Bind `info` to `transmitter`.
    ///
    /// Fails with [`Error::UnsupportedAddress`](kraken_core::Error::UnsupportedAddress)
    /// when the address cannot be encoded for the switch's family, so a
    /// constructed switch always has a valid codeword for every status.
    pub fn new(info: SwitchInfo, transmitter: Arc<Transmitter>) -> Result<Self> {
        encoder::encode(info.family, &info.master, &info.slave, Status::On)?;
        Ok(Rf433Switch { info, transmitter })
    }

    /// Bind a resolved catalog device at (`master`, `slave`).
    pub fn from_device(
        device: &ResolvedDevice,
        master: &str,
        slave: &str,
        transmitter: Arc<Transmitter>,
    ) -> Result<Self> {
        let info = SwitchInfo {
            interface: device.interface.clone(),
            vendor: device.vendor.clone(),
            model: device.model.clone(),
            family: device.family,
            protocol: device.protocol,
            master: master.to_string(),
            slave: slave.to_string(),
        };
        Self::new(info, transmitter)
    }

    /// The codeword this switch sends for `status`.
    pub fn codeword(&self, status: Status) -> Result<Codeword> {
        encoder::encode(self.info.family, &self.info.master, &self.info.slave, status)
    }
}

#[async_trait]
impl RemoteSwitch for Rf433Switch {
    fn info(&self) -> &SwitchInfo {
        &self.info
    }

    async fn set_status(&self, status: Status) -> Result<TransmitReport> {
        let codeword = self.codeword(status)?;
        info!(
            vendor = %self.info.vendor,
            model = %self.info.model,
            master = %self.info.master,
            slave = %self.info.slave,
            status = %status,
            "switching"
        );
        let options = TransmitOptions::new().with_protocol(self.info.protocol);
        self.transmitter.transmit_with(&codeword, options).await
    }
}
