//! # Configuration State
//!
//! Station configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`PAPUCHO_*`)
//! 2. `config.json` in the data directory
//! 3. Defaults
//!
//! ## Environment Variables
//! | Variable               | Overrides                         |
//! |------------------------|-----------------------------------|
//! | `PAPUCHO_DATA_DIR`     | data directory                    |
//! | `PAPUCHO_PRINTER`      | spooler queue (`impresora.nombre`) |
//! | `PAPUCHO_PRINTER_ADDR` | network printer `host[:port]`     |
//! | `PAPUCHO_PAPER_MM`     | paper width in millimetres        |
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use papucho_core::{PricingOptions, TicketConfig};
use papucho_printer::PrinterTarget;
use papucho_store::StationSettings;
use serde::Serialize;
use tracing::warn;

pub const ENV_DATA_DIR: &str = "PAPUCHO_DATA_DIR";
pub const ENV_PRINTER: &str = "PAPUCHO_PRINTER";
pub const ENV_PRINTER_ADDR: &str = "PAPUCHO_PRINTER_ADDR";
pub const ENV_PAPER_MM: &str = "PAPUCHO_PAPER_MM";

/// Effective station configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigState {
    /// Where `productos.json`, `config.json` and `tickets/` live
    pub data_dir: PathBuf,

    /// `config.json` with environment overrides applied
    pub settings: StationSettings,
}

impl ConfigState {
    pub fn new(data_dir: impl Into<PathBuf>, settings: StationSettings) -> Self {
        ConfigState {
            data_dir: data_dir.into(),
            settings,
        }
    }

    /// Applies the `PAPUCHO_*` printer overrides from the process environment.
    pub fn from_env(data_dir: impl Into<PathBuf>, settings: StationSettings) -> Self {
        let mut config = ConfigState::new(data_dir, settings);
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Applies overrides from any key/value source.
    ///
    /// Unparsable values are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(queue) = var(ENV_PRINTER) {
            self.settings.printer.queue = Some(queue);
        }

        if let Some(address) = var(ENV_PRINTER_ADDR) {
            self.settings.printer.address = Some(address);
        }

        if let Some(raw) = var(ENV_PAPER_MM) {
            match raw.trim().parse::<u32>() {
                Ok(mm) => self.settings.printer.paper_mm = mm,
                Err(_) => warn!(value = %raw, "Ignoring invalid {}", ENV_PAPER_MM),
            }
        }
    }

    /// Ticket layout for the configured paper.
    pub fn ticket_config(&self) -> TicketConfig {
        self.settings.ticket_config()
    }

    pub fn pricing_options(&self) -> PricingOptions {
        self.settings.pricing_options()
    }

    /// Print transport, or `None` when printing is disabled.
    pub fn printer_target(&self) -> Option<PrinterTarget> {
        let printer = &self.settings.printer;
        if !printer.enabled {
            return None;
        }
        Some(PrinterTarget::from_settings(
            printer.queue.as_deref(),
            printer.address.as_deref(),
        ))
    }
}

/// Determines the data directory.
///
/// ## Resolution Order
/// 1. Explicit path (command line)
/// 2. `PAPUCHO_DATA_DIR`
/// 3. Platform data directory
///    - **Linux**: `~/.local/share/papucho-pos`
///    - **macOS**: `~/Library/Application Support/ar.papucho.pos`
///    - **Windows**: `%APPDATA%\papucho\pos\data`
/// 4. `./data`
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ENV_DATA_DIR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    match ProjectDirs::from("ar", "papucho", "pos") {
        Some(dirs) => dirs.data_dir().to_path_buf(),
        None => {
            warn!("Could not determine platform data directory, using ./data");
            PathBuf::from("data")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConfigState::new("/tmp/papucho", StationSettings::default());
        assert_eq!(config.ticket_config().width, 48);
        assert_eq!(
            config.printer_target(),
            Some(PrinterTarget::Spooler { queue: None })
        );
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ConfigState::new("/tmp/papucho", StationSettings::default());
        config.apply_overrides(overrides(&[
            (ENV_PRINTER, "POS80"),
            (ENV_PAPER_MM, "58"),
        ]));

        assert_eq!(config.ticket_config().width, 32);
        assert_eq!(
            config.printer_target(),
            Some(PrinterTarget::Spooler {
                queue: Some("POS80".into())
            })
        );

        config.apply_overrides(overrides(&[
            (ENV_PRINTER_ADDR, "192.168.0.50"),
            (ENV_PAPER_MM, "ochenta"),
        ]));
        assert_eq!(config.settings.printer.paper_mm, 58);
        assert_eq!(
            config.printer_target(),
            Some(PrinterTarget::Network {
                address: "192.168.0.50".into()
            })
        );
    }

    #[test]
    fn test_disabled_printer() {
        let mut settings = StationSettings::default();
        settings.printer.enabled = false;
        assert_eq!(ConfigState::new("/tmp", settings).printer_target(), None);
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let dir = resolve_data_dir(Some(Path::new("/srv/papucho")));
        assert_eq!(dir, PathBuf::from("/srv/papucho"));
    }
}
