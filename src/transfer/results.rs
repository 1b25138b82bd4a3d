//! Transfer result types
//!
//! Defines the values returned by data-channel negotiation and by each
//! step of the transfer loop.

/// Answer of `DataChannel::ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataReady {
    /// No connection yet; ask again on a later poll.
    NotReady,
    /// No connection can be made for this command.
    Failed,
    Ready,
}

/// Outcome of one transfer step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferProgress {
    /// More work remains; call again on the next poll.
    Continue,
    /// The transfer has finished and should be closed.
    Finished,
}
