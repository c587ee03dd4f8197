//! Live-reload server address selection.

use std::net::{SocketAddr, TcpListener};

use kiln_config::Project;

use crate::error::{CliError, Result};

/// Ports tried after the configured one before giving up.
const PORT_FALLBACK: u16 = 10;

/// Where the live-reload server listens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    pub addr: SocketAddr,
}

impl SyncConfig {
    /// Pick an address for the project's configured port.
    pub fn for_project(project: &Project) -> Result<Self> {
        Ok(Self {
            addr: find_available_port(project.server.port)?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// The requested port on localhost, or the first free one of the next ten.
fn find_available_port(requested: u16) -> Result<SocketAddr> {
    if requested < 1024 {
        crate::ui::warning(&format!(
            "Port {requested} is in privileged range, may require root access"
        ));
    }

    for offset in 0..=PORT_FALLBACK {
        let Some(port) = requested.checked_add(offset) else {
            break;
        };
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        if TcpListener::bind(addr).is_ok() {
            if offset > 0 {
                crate::ui::warning(&format!(
                    "Port {requested} is busy, using port {port} instead"
                ));
            }
            return Ok(addr);
        }
    }

    Err(CliError::Server(format!(
        "no free port in {requested}..={}",
        requested.saturating_add(PORT_FALLBACK)
    )))
}
