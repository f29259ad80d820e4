use crate::domain::annotator::{DEFAULT_DASHBOARD_BASE, DashboardLinks};
use crate::domain::ports::TerminalBackendBox;
use crate::error::Result;
use crate::infrastructure::http::{DEFAULT_BACKEND_URL, HttpTerminalBackend};
use crate::infrastructure::simulated::SimulatedTerminalBackend;
use tracing::info;
use url::Url;

/// Runtime settings resolved from the command line and environment.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalConfig {
    pub backend_url: Url,
    pub dashboard_url: Url,
    pub simulated: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            backend_url: Url::parse(DEFAULT_BACKEND_URL).expect("valid default backend URL"),
            dashboard_url: Url::parse(DEFAULT_DASHBOARD_BASE).expect("valid default dashboard URL"),
            simulated: false,
        }
    }
}

impl TerminalConfig {
    /// Validates both URLs.
    pub fn new(backend_url: &str, dashboard_url: &str, simulated: bool) -> Result<Self> {
        Ok(Self {
            backend_url: Url::parse(backend_url)?,
            dashboard_url: Url::parse(dashboard_url)?,
            simulated,
        })
    }

    pub fn dashboard_links(&self) -> DashboardLinks {
        DashboardLinks::new(self.dashboard_url.as_str())
    }

    /// Builds the backend the session talks to.
    pub fn backend(&self) -> Result<TerminalBackendBox> {
        if self.simulated {
            info!("Using simulated backend");
            Ok(Box::new(SimulatedTerminalBackend::demo_fleet()))
        } else {
            info!(backend = %self.backend_url, "Using HTTP backend");
            Ok(Box::new(HttpTerminalBackend::new(self.backend_url.clone())?))
        }
    }
}
