// Byte-level primitives the protocol layer is built on.  The device frames nothing except with a
// trailing CR LF, and it rejects requests with a bare sentinel that carries no terminator at all.

use std::time::Duration;

use crate::error::Result;

pub const TERMINATOR:&[u8] = b"\r\n";
pub const ERROR_SENTINEL:&[u8] = b"ERR!";

pub mod tcp_session;

#[cfg(test)]
pub(crate) mod mock;

/// A reliable, ordered byte stream to one device, with one request in flight at a time.
pub trait Transport {

	/// Writes `text` followed by CR LF.
	fn send_frame(&mut self, text:&str) -> Result<()>;

	/// Waits up to `wait` for the stream to become readable.  Consumes nothing.
	fn probe(&mut self, wait:Duration) -> Result<bool>;

	/// One blocking read of at most the configured buffer size.  An empty chunk means the peer closed.
	fn receive_chunk(&mut self) -> Result<Vec<u8>>;

	/// How long a command waits for an immediate (error) reply.
	fn quiet_period(&self) -> Duration;

}

pub(crate) fn frame(text:&str) -> Vec<u8> {
	let mut bytes:Vec<u8> = Vec::with_capacity(text.len() + TERMINATOR.len());
	bytes.extend_from_slice(text.as_bytes());
	bytes.extend_from_slice(TERMINATOR);
	bytes
}
