//! Module `file_ops`
//!
//! The transfer loop. Each call to `step` moves at most one buffer's worth
//! of bytes between the open file (or rendered listing) and the data
//! socket, then returns so the host scheduler keeps control.

use log::{debug, info, warn};
use std::io::{Cursor, Read, Write};
use std::time::Instant;

use crate::error::TransferError;
use crate::net::{Connection, Connector, Listener};
use crate::protocol::responses::{Replies, TRANSFER_ABORTED, TRANSFER_COMPLETE};
use crate::storage::{FileHandle, ListingFormat};
use crate::transfer::buffer::TransferBuffer;
use crate::transfer::data_channel::DataChannel;
use crate::transfer::modes::Direction;
use crate::transfer::results::TransferProgress;

/// What the transfer reads from or writes to.
enum TransferSource<H> {
    File(H),
    Listing {
        body: Cursor<Vec<u8>>,
        entries: usize,
        format: ListingFormat,
    },
}

/// State of the one in-flight transfer of a session.
pub struct TransferContext<H> {
    direction: Direction,
    source: TransferSource<H>,
    buffer: TransferBuffer,
    bytes_transferred: u64,
    /// Bytes to send for a retrieve; unknown for a store.
    total: Option<u64>,
    started: Instant,
}

impl<H: FileHandle> TransferContext<H> {
    /// Sends `file` to the client.
    pub fn retrieve(file: H, buffer: TransferBuffer, now: Instant) -> Self {
        let total = file.size();
        Self::new(Direction::Retrieve, TransferSource::File(file), buffer, Some(total), now)
    }

    /// Writes what the client sends into `file`.
    pub fn store(file: H, buffer: TransferBuffer, now: Instant) -> Self {
        Self::new(Direction::Store, TransferSource::File(file), buffer, None, now)
    }

    /// Sends an already rendered directory listing.
    pub fn listing(
        body: Vec<u8>,
        entries: usize,
        format: ListingFormat,
        buffer: TransferBuffer,
        now: Instant,
    ) -> Self {
        let total = body.len() as u64;
        let source = TransferSource::Listing {
            body: Cursor::new(body),
            entries,
            format,
        };
        Self::new(Direction::Retrieve, source, buffer, Some(total), now)
    }

    fn new(
        direction: Direction,
        source: TransferSource<H>,
        buffer: TransferBuffer,
        total: Option<u64>,
        now: Instant,
    ) -> Self {
        Self {
            direction,
            source,
            buffer,
            bytes_transferred: 0,
            total,
            started: now,
        }
    }

    pub fn bytes_transferred(&self) -> u64 {
        self.bytes_transferred
    }

    fn read_source(&mut self, len: usize) -> Result<usize, TransferError> {
        let space = self.buffer.space(len);
        let n = match &mut self.source {
            TransferSource::File(file) => file.read(space),
            TransferSource::Listing { body, .. } => body.read(space),
        }
        .map_err(TransferError::FileReadFailed)?;
        self.buffer.filled(n);
        Ok(n)
    }
}

/// Advances the transfer by one bounded unit of work.
pub fn step<H: FileHandle, S: Connection>(
    transfer: &mut TransferContext<H>,
    data: &mut S,
) -> Result<TransferProgress, TransferError> {
    match transfer.direction {
        Direction::Retrieve => do_retrieve(transfer, data),
        Direction::Store => do_store(transfer, data),
    }
}

/// File to data socket. Bytes the socket did not accept stay in the buffer
/// and go out first on the next call.
pub fn do_retrieve<H: FileHandle, S: Connection>(
    transfer: &mut TransferContext<H>,
    data: &mut S,
) -> Result<TransferProgress, TransferError> {
    if !data.is_connected() {
        return Ok(TransferProgress::Finished);
    }

    if transfer.buffer.is_drained() {
        let remaining = transfer
            .total
            .map_or(u64::MAX, |total| total.saturating_sub(transfer.bytes_transferred));
        if remaining == 0 {
            return Ok(TransferProgress::Finished);
        }
        let want = usize::try_from(remaining)
            .unwrap_or(usize::MAX)
            .min(transfer.buffer.capacity());
        if transfer.read_source(want)? == 0 {
            return Ok(TransferProgress::Finished);
        }
    }

    let written = data
        .write(transfer.buffer.pending())
        .map_err(TransferError::DataSocketFailed)?;
    transfer.buffer.consume(written);
    transfer.bytes_transferred += written as u64;
    if written > 0 {
        debug!("Transfer {} bytes fs->client", written);
    }
    Ok(TransferProgress::Continue)
}

/// Data socket to file. Only reads what is already available; finishes
/// once the peer has closed and nothing is left to read.
pub fn do_store<H: FileHandle, S: Connection>(
    transfer: &mut TransferContext<H>,
    data: &mut S,
) -> Result<TransferProgress, TransferError> {
    let capacity = transfer.buffer.capacity();
    let space = transfer.buffer.space(capacity);
    let received = data.read(space).map_err(TransferError::DataSocketFailed)?;

    if received > 0 {
        let TransferSource::File(file) = &mut transfer.source else {
            return Ok(TransferProgress::Finished);
        };
        transfer.buffer.filled(received);
        file.write_all(transfer.buffer.pending())
            .map_err(TransferError::FileWriteFailed)?;
        transfer.bytes_transferred += received as u64;
        debug!("Transfer {} bytes client->fs", received);
        return Ok(TransferProgress::Continue);
    }

    if data.is_connected() {
        Ok(TransferProgress::Continue)
    } else {
        Ok(TransferProgress::Finished)
    }
}

/// Finishes the in-flight transfer: completion reply, then buffer, file
/// and data socket are released.
pub fn close_transfer<H, L, C>(
    slot: &mut Option<TransferContext<H>>,
    data: &mut DataChannel<L, C>,
    replies: &mut Replies,
    now: Instant,
) where
    H: FileHandle,
    L: Listener,
    C: Connector<Conn = L::Conn>,
{
    let Some(mut transfer) = slot.take() else {
        return;
    };

    match &transfer.source {
        TransferSource::Listing {
            entries, format, ..
        } => {
            if *format == ListingFormat::Mlsd {
                replies.send_continued(TRANSFER_COMPLETE, "options: -a -l");
            }
            replies.send(TRANSFER_COMPLETE, &format!("{} matches total", entries));
        }
        TransferSource::File(_) => {
            let bytes = transfer.bytes_transferred;
            let elapsed_ms = now.saturating_duration_since(transfer.started).as_millis();
            if elapsed_ms > 0 && bytes > 0 {
                let rate = bytes as f64 / elapsed_ms as f64;
                info!("Transferred {} bytes in {} ms ({:.2} kB/s)", bytes, elapsed_ms, rate);
                replies.send(
                    TRANSFER_COMPLETE,
                    &format!(
                        "File successfully transferred, {} bytes in {} ms, {:.2} kB/s.",
                        bytes, elapsed_ms, rate
                    ),
                );
            } else {
                info!("Transferred {} bytes", bytes);
                replies.send(
                    TRANSFER_COMPLETE,
                    &format!("File successfully transferred, {} bytes.", bytes),
                );
            }
        }
    }

    if let TransferSource::File(file) = &mut transfer.source {
        if let Err(e) = file.flush() {
            warn!("Flushing transferred file failed: {}", e);
        }
    }
    drop(transfer);
    data.close();
}

/// Cancels the in-flight transfer, if any. Safe to call at any time.
pub fn abort_transfer<H, L, C>(
    slot: &mut Option<TransferContext<H>>,
    data: &mut DataChannel<L, C>,
    replies: &mut Replies,
) where
    H: FileHandle,
    L: Listener,
    C: Connector<Conn = L::Conn>,
{
    if let Some(transfer) = slot.take() {
        info!(
            "Aborting transfer after {} bytes",
            transfer.bytes_transferred
        );
        drop(transfer);
        data.close();
        replies.send(TRANSFER_ABORTED, "Transfer aborted");
    }
}
