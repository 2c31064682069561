use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr};

/// HTTP wizard configuration, read from `FAZENDA_INSTALLER_*` variables.
///
/// The install path is not part of it: `--install-path` already reads
/// `FAZENDA_INSTALLER_INSTALL_PATH`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address (default: 127.0.0.1:8090)
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 8090))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}
