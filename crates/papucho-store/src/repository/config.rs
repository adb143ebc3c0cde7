//! # Station Settings
//!
//! `config.json` in the data directory, created with defaults on first run.
//!
//! ```text
//! {
//!   "impresora": { "ancho_ticket": 80, "modelo": "POS-80", "habilitada": true,
//!                  "nombre": "POS80", "direccion": "192.168.0.50:9100" },
//!   "tickets":   { "incluir_fecha_hora": true, "lineas_corte": 3,
//!                  "nombre_negocio": "PAPUCHO FOODTRUCK" },
//!   "precios":   { "permitir_precio_negativo": true,
//!                  "modo_estricto_adicionales": false }
//! }
//! ```
//!
//! Every key is optional: a partial file is completed with defaults. A file
//! that is not JSON at all is left untouched and ignored with a warning.

use std::path::PathBuf;
use std::sync::Arc;

use papucho_core::{PricingOptions, TicketConfig};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::{StoreError, StoreResult};
use crate::files;

// =============================================================================
// Settings
// =============================================================================

/// Everything the station reads from `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationSettings {
    #[serde(rename = "impresora")]
    pub printer: PrinterSettings,
    #[serde(rename = "tickets")]
    pub tickets: TicketSettings,
    #[serde(rename = "precios")]
    pub pricing: PricingSettings,
}

/// Thermal printer section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterSettings {
    /// Paper roll width in millimetres (58, 76 or 80).
    #[serde(rename = "ancho_ticket")]
    pub paper_mm: u32,

    /// Informational model name.
    #[serde(rename = "modelo")]
    pub model: String,

    /// When false, tickets are only archived.
    #[serde(rename = "habilitada")]
    pub enabled: bool,

    /// Spooler queue name; the system default queue when absent.
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,

    /// `host:port` of a network printer. Takes precedence over the queue.
    #[serde(rename = "direccion", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Default for PrinterSettings {
    fn default() -> Self {
        PrinterSettings {
            paper_mm: 80,
            model: "POS-80".to_string(),
            enabled: true,
            queue: None,
            address: None,
        }
    }
}

/// Ticket layout section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketSettings {
    #[serde(rename = "incluir_fecha_hora")]
    pub include_timestamp: bool,
    #[serde(rename = "lineas_corte")]
    pub cut_lines: usize,
    #[serde(rename = "nombre_negocio")]
    pub business_name: String,
}

impl Default for TicketSettings {
    fn default() -> Self {
        let config = TicketConfig::default();
        TicketSettings {
            include_timestamp: config.include_timestamp,
            cut_lines: config.cut_lines,
            business_name: config.business_name,
        }
    }
}

/// Pricing section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSettings {
    #[serde(rename = "permitir_precio_negativo")]
    pub allow_negative_adjusted_price: bool,
    #[serde(rename = "modo_estricto_adicionales")]
    pub strict_additional_pricing: bool,
}

impl Default for PricingSettings {
    fn default() -> Self {
        let options = PricingOptions::default();
        PricingSettings {
            allow_negative_adjusted_price: options.allow_negative_adjusted_price,
            strict_additional_pricing: options.strict_additional_pricing,
        }
    }
}

impl StationSettings {
    /// Ticket layout for the configured paper width.
    pub fn ticket_config(&self) -> TicketConfig {
        TicketConfig {
            business_name: self.tickets.business_name.clone(),
            width: TicketConfig::width_for_paper_mm(self.printer.paper_mm),
            include_timestamp: self.tickets.include_timestamp,
            cut_lines: self.tickets.cut_lines,
        }
    }

    pub fn pricing_options(&self) -> PricingOptions {
        PricingOptions {
            allow_negative_adjusted_price: self.pricing.allow_negative_adjusted_price,
            strict_additional_pricing: self.pricing.strict_additional_pricing,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Loads and saves `config.json`.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl SettingsRepository {
    pub(crate) fn new(path: PathBuf, lock: Arc<Mutex<()>>) -> Self {
        SettingsRepository { path, lock }
    }

    /// Loads the settings.
    ///
    /// ## Behavior
    /// - Missing file: written with defaults, defaults returned
    /// - Not valid JSON: defaults returned, file left for the operator to fix
    /// - I/O failure: error
    pub async fn load(&self) -> StoreResult<StationSettings> {
        let _guard = self.lock.lock().await;

        match files::read_json::<StationSettings>(&self.path).await {
            Ok(Some(settings)) => Ok(settings),
            Ok(None) => {
                let settings = StationSettings::default();
                files::write_json(&self.path, &settings).await?;
                info!(path = %self.path.display(), "Default configuration written");
                Ok(settings)
            }
            Err(StoreError::Json { source, .. }) => {
                warn!(
                    path = %self.path.display(),
                    error = %source,
                    "Configuration file is invalid, using defaults"
                );
                Ok(StationSettings::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Saves the settings.
    pub async fn save(&self, settings: &StationSettings) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        files::write_json(&self.path, settings).await?;
        info!(path = %self.path.display(), "Configuration saved");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
