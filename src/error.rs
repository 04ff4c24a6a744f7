use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	#[error("unable to connect to {addr}: {source}")]
	Connection { addr: String, source: io::Error },

	#[error("transport error: {0}")]
	Transport(#[from] io::Error),

	#[error("command rejected by device: {0:?}")]
	CommandRejected(String),

	#[error("query rejected by device: {0:?}")]
	QueryRejected(String),

	#[error("expected {expected}, got {reply:?}")]
	Format { expected: &'static str, reply: String },

	#[error("channel arrays differ in length ({ch1} vs {ch2})")]
	LengthMismatch { ch1: usize, ch2: usize },

	#[error("request contains a line terminator: {0:?}")]
	InvalidRequest(String),

	#[error("no such channel: {0} (only 1 and 2 exist)")]
	InvalidChannel(u8),

	#[error("invalid configuration: {0}")]
	Config(String),

	#[error("malformed configuration document: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {

	pub(crate) fn format(expected: &'static str, reply: &str) -> Self {
		Error::Format { expected, reply: reply.to_owned() }
	}

	pub(crate) fn peer_closed() -> Self {
		Error::Transport(io::Error::new(io::ErrorKind::UnexpectedEof, "peer closed the connection"))
	}

	/// The device answered with the error sentinel. The caller may correct the request and retry.
	pub fn is_rejection(&self) -> bool {
		matches!(self, Error::CommandRejected(_) | Error::QueryRejected(_))
	}

	/// A blocking read or write ran past the session's I/O timeout.
	pub fn is_timeout(&self) -> bool {
		match self {
			Error::Transport(e) => matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock),
			_ => false,
		}
	}

	pub fn is_peer_closed(&self) -> bool {
		match self {
			Error::Transport(e) => e.kind() == io::ErrorKind::UnexpectedEof,
			_ => false,
		}
	}

}
