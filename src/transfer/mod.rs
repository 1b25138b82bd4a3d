//! Transfer module for FTP server
//!
//! Handles the data channel, the session's transfer buffer and the
//! incremental file and listing transfers driven by the server poll.

pub mod buffer;
pub mod data_channel;
pub mod file_ops;
pub mod modes;
pub mod results;

pub use buffer::{MIN_BUFFER_SIZE, TransferBuffer};
pub use data_channel::DataChannel;
pub use file_ops::{TransferContext, abort_transfer, close_transfer, step};
pub use modes::{DataMode, Direction};
pub use results::{DataReady, TransferProgress};
