//! Printer transports
//!
//! ```text
//! ┌──────────────────┐   lpr -o raw    ┌──────────┐
//! │  SpoolerPrinter  │ ──────────────► │   CUPS   │ ──► USB printer
//! └──────────────────┘   (stdin)       └──────────┘
//!
//! ┌──────────────────┐   TCP :9100
//! │  NetworkPrinter  │ ──────────────────────────────► network printer
//! └──────────────────┘
//! ```
//!
//! Both implement [`Printer`]; [`PrinterTarget`] picks one from
//! configuration.

use std::net::SocketAddr;
use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::error::{PrintError, PrintResult};

/// Raw printing port used by Epson-compatible network printers.
pub const DEFAULT_PORT: u16 = 9100;

/// Printer trait - abstraction over different printer types
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send raw ESC/POS data to printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;

    /// Check if printer is online
    async fn is_online(&self) -> bool;
}

// =============================================================================
// System Spooler
// =============================================================================

/// Prints through the system spooler (`lpr`).
///
/// The job is piped to `lpr -o raw` so CUPS passes the ESC/POS bytes
/// through untouched. Without a queue name the default printer is used.
#[derive(Debug, Clone)]
pub struct SpoolerPrinter {
    queue: Option<String>,
    program: String,
    timeout: Duration,
}

impl Default for SpoolerPrinter {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SpoolerPrinter {
    pub fn new(queue: Option<String>) -> Self {
        Self {
            queue: queue.filter(|q| !q.trim().is_empty()),
            program: "lpr".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Overrides the spooler binary (`lp` wrappers, tests).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn queue(&self) -> Option<&str> {
        self.queue.as_deref()
    }

    /// Command line arguments passed to the spooler.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(4);
        if let Some(queue) = &self.queue {
            args.push("-P".to_string());
            args.push(queue.clone());
        }
        args.push("-o".to_string());
        args.push("raw".to_string());
        args
    }

    async fn submit(&self, data: &[u8]) -> PrintResult<()> {
        let mut child = Command::new(&self.program)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(data).await?;
            stdin.shutdown().await?;
        }

        let output = child.wait_with_output().await?;
        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Err(PrintError::Spooler(format!(
                "{} exited with {}: {}",
                self.program, output.status, stderr
            )))
        }
    }
}

impl Printer for SpoolerPrinter {
    #[instrument(skip(self, data), fields(queue = ?self.queue, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        match tokio::time::timeout(self.timeout, self.submit(data)).await {
            Ok(result) => {
                if result.is_ok() {
                    debug!("Spooler accepted job");
                }
                result
            }
            Err(_) => Err(PrintError::Timeout(format!(
                "{} did not finish within {:?}",
                self.program, self.timeout
            ))),
        }
    }

    async fn is_online(&self) -> bool {
        let mut command = Command::new("lpstat");
        match &self.queue {
            Some(queue) => command.args(["-p", queue.as_str()]),
            None => command.arg("-d"),
        };
        command.stdout(Stdio::null()).stderr(Stdio::null());

        match tokio::time::timeout(Duration::from_millis(500), command.status()).await {
            Ok(Ok(status)) => status.success(),
            _ => false,
        }
    }
}

// =============================================================================
// Network Printer
// =============================================================================

/// Network printer (TCP)
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: SocketAddr,
    timeout: Duration,
}

impl NetworkPrinter {
    /// Create a new network printer
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|e| PrintError::InvalidConfig(format!("Invalid address: {}", e)))?;

        Ok(Self {
            addr,
            timeout: Duration::from_secs(5),
        })
    }

    /// Parses `host` or `host:port`; the port defaults to 9100.
    pub fn from_address(address: &str) -> PrintResult<Self> {
        let address = address.trim();
        match address.parse::<SocketAddr>() {
            Ok(addr) => Ok(Self::from_addr(addr)),
            Err(_) => Self::new(address, DEFAULT_PORT),
        }
    }

    /// Create from socket address
    pub fn from_addr(addr: SocketAddr) -> Self {
        Self {
            addr,
            timeout: Duration::from_secs(5),
        }
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(self, data), fields(addr = %self.addr, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connect to {} timed out", self.addr)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr, e)))?;

        tokio::time::timeout(self.timeout, async {
            stream.write_all(data).await?;
            stream.flush().await?;
            stream.shutdown().await
        })
        .await
        .map_err(|_| PrintError::Timeout(format!("Write to {} timed out", self.addr)))??;

        debug!("Print data sent successfully");
        Ok(())
    }

    async fn is_online(&self) -> bool {
        tokio::time::timeout(Duration::from_millis(500), TcpStream::connect(self.addr))
            .await
            .map(|r| r.is_ok())
            .unwrap_or(false)
    }
}

// =============================================================================
// Target Selection
// =============================================================================

/// Where print jobs go, as chosen by configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrinterTarget {
    /// System spooler, optional queue name.
    Spooler { queue: Option<String> },
    /// Raw TCP printer at `host[:port]`.
    Network { address: String },
}

impl PrinterTarget {
    /// Network address wins over the spooler queue when both are set.
    pub fn from_settings(queue: Option<&str>, address: Option<&str>) -> Self {
        match address.map(str::trim).filter(|a| !a.is_empty()) {
            Some(address) => PrinterTarget::Network {
                address: address.to_string(),
            },
            None => PrinterTarget::Spooler {
                queue: queue.map(str::to_string),
            },
        }
    }

    /// Builds the concrete printer.
    pub fn connect(&self) -> PrintResult<AnyPrinter> {
        match self {
            PrinterTarget::Spooler { queue } => {
                Ok(AnyPrinter::Spooler(SpoolerPrinter::new(queue.clone())))
            }
            PrinterTarget::Network { address } => {
                NetworkPrinter::from_address(address).map(AnyPrinter::Network)
            }
        }
    }
}

/// Either transport behind one [`Printer`] impl.
#[derive(Debug, Clone)]
pub enum AnyPrinter {
    Spooler(SpoolerPrinter),
    Network(NetworkPrinter),
}

impl Printer for AnyPrinter {
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        match self {
            AnyPrinter::Spooler(p) => p.print(data).await,
            AnyPrinter::Network(p) => p.print(data).await,
        }
    }

    async fn is_online(&self) -> bool {
        let online = match self {
            AnyPrinter::Spooler(p) => p.is_online().await,
            AnyPrinter::Network(p) => p.is_online().await,
        };
        if !online {
            warn!(printer = ?self, "Printer not reachable");
        }
        online
    }
}
