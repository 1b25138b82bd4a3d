//! Utility functions
//!
//! Logging setup and the PORT/PASV address codecs.

pub mod logging;
pub mod network;

pub use logging::setup_logging;
pub use network::{format_pasv_address, parse_port_argument};
