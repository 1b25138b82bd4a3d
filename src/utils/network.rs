//! Network utilities
//!
//! Codecs for the `h1,h2,h3,h4,p1,p2` address notation used by PORT and
//! PASV.

use std::net::{Ipv4Addr, SocketAddrV4};

/// Parses a PORT argument. All six fields must be present and fit a byte.
pub fn parse_port_argument(param: &str) -> Option<SocketAddrV4> {
    let mut fields = [0u8; 6];
    let mut parts = param.split(',');
    for field in fields.iter_mut() {
        *field = parts.next()?.trim().parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    let ip = Ipv4Addr::new(fields[0], fields[1], fields[2], fields[3]);
    let port = u16::from(fields[4]) << 8 | u16::from(fields[5]);
    Some(SocketAddrV4::new(ip, port))
}

/// Formats `ip` and `port` the way a 227 reply carries them.
pub fn format_pasv_address(ip: Ipv4Addr, port: u16) -> String {
    let [a, b, c, d] = ip.octets();
    format!("{},{},{},{},{},{}", a, b, c, d, port >> 8, port & 0xff)
}
