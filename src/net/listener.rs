//! TCP listener binding.
//!
//! # Responsibilities
//! - Translate `:<port>` listen addresses into socket addresses
//! - Bind the listener for a named server, mapping failures to `StartError`

use std::net::{Ipv4Addr, SocketAddr};

use tokio::net::TcpListener;

use crate::lifecycle::StartError;

/// Parse a listen address.
///
/// `:<port>` binds every IPv4 interface; anything else must be a full
/// socket address such as `127.0.0.1:8080`.
pub fn parse_listen_address(address: &str) -> Result<SocketAddr, std::net::AddrParseError> {
    match address.strip_prefix(':') {
        Some(port) => format!("{}:{}", Ipv4Addr::UNSPECIFIED, port).parse(),
        None => address.parse(),
    }
}

/// Bind a listener for the server called `name`.
pub async fn bind(name: &str, address: &str) -> Result<TcpListener, StartError> {
    let addr = parse_listen_address(address).map_err(|source| StartError::InvalidAddress {
        name: name.to_string(),
        address: address.to_string(),
        source,
    })?;

    let listener = TcpListener::bind(addr).await.map_err(|source| StartError::Bind {
        name: name.to_string(),
        address: address.to_string(),
        source,
    })?;

    if let Ok(local_addr) = listener.local_addr() {
        tracing::info!(server = %name, address = %local_addr, "Listener bound");
    }

    Ok(listener)
}
