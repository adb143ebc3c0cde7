//! # Config Commands
//!
//! Commands for reading the station configuration and checking the printer.

use papucho_printer::{Printer, PrinterTarget};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::ConfigState;

/// Printer reachability as seen from the station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterStatus {
    pub enabled: bool,
    pub target: Option<PrinterTarget>,
    pub online: bool,
}

/// Gets the current station configuration.
///
/// ## Returns
/// Complete configuration state (read-only)
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}

/// Checks whether the configured printer answers.
pub async fn printer_status(config: &ConfigState) -> Result<PrinterStatus, ApiError> {
    debug!("printer_status command");

    let Some(target) = config.printer_target() else {
        return Ok(PrinterStatus {
            enabled: false,
            target: None,
            online: false,
        });
    };

    let online = target.connect()?.is_online().await;
    Ok(PrinterStatus {
        enabled: true,
        target: Some(target),
        online,
    })
}
