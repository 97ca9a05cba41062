//! Validation of `address:port` server arguments.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, TcpListener};

/// Address used when `--server` is given without a value.
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:5500";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AddressValidationError {
    #[error("Server address is not valid: '{0}'")]
    Malformed(String),

    #[error("Server port is not valid: {0}")]
    PortOutOfRange(u64),

    #[error("This address is already in use: {0}")]
    InUse(SocketAddr),
}

/// Parse an `a.b.c.d:port` string without touching the network.
///
/// Ports must be in `1..=65534`.
pub fn parse_server_addr(s: &str) -> Result<SocketAddr, AddressValidationError> {
    let malformed = || AddressValidationError::Malformed(s.to_string());

    let (host, port) = s.split_once(':').ok_or_else(malformed)?;
    let ip: Ipv4Addr = host.parse().map_err(|_| malformed())?;
    let port: u64 = port.parse().map_err(|_| malformed())?;
    if !(1..65535).contains(&port) {
        return Err(AddressValidationError::PortOutOfRange(port));
    }

    Ok(SocketAddr::V4(SocketAddrV4::new(ip, port as u16)))
}

/// Parse an address and check that it's free to bind.
pub fn validate_server_addr(s: &str) -> Result<SocketAddr, AddressValidationError> {
    let addr = parse_server_addr(s)?;
    match TcpListener::bind(addr) {
        Ok(_) => Ok(addr),
        Err(e) if e.kind() == io::ErrorKind::AddrInUse => Err(AddressValidationError::InUse(addr)),
        // Anything else (e.g. address not available on this host) will surface
        // again, with more context, when the server binds.
        Err(_) => Ok(addr),
    }
}
