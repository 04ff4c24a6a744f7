// Scripted stand-in for a device.  Replies are handed out one chunk per receive; a probe reports
// readiness whenever a reply is still queued.

use std::collections::VecDeque;
use std::io::{self, ErrorKind};
use std::time::Duration;

use crate::error::Result;
use super::Transport;

pub(crate) enum Reply {
	Chunk(Vec<u8>),
	Fail(ErrorKind),
}

#[derive(Default)]
pub(crate) struct MockTransport {
	pub sent: Vec<String>,
	pub probes: usize,
	pub receives: usize,
	replies: VecDeque<Reply>,
}

impl MockTransport {

	pub fn new() -> Self { Self::default() }

	pub fn chunk(mut self, bytes:&[u8]) -> Self {
		self.replies.push_back(Reply::Chunk(bytes.to_vec()));
		self
	}

	pub fn closed(self) -> Self { self.chunk(b"") }

	pub fn fail(mut self, kind:ErrorKind) -> Self {
		self.replies.push_back(Reply::Fail(kind));
		self
	}

	/// A complete reply to one query.
	pub fn line(self, payload:&str) -> Self { self.chunk(format!("{}\r\n", payload).as_bytes()) }

	pub fn pending(&self) -> usize { self.replies.len() }

}

impl Transport for MockTransport {

	fn send_frame(&mut self, text:&str) -> Result<()> {
		self.sent.push(text.to_owned());
		Ok(())
	}

	fn probe(&mut self, _wait:Duration) -> Result<bool> {
		self.probes += 1;
		Ok(!self.replies.is_empty())
	}

	fn receive_chunk(&mut self) -> Result<Vec<u8>> {
		self.receives += 1;
		match self.replies.pop_front() {
			Some(Reply::Chunk(bytes)) => Ok(bytes),
			Some(Reply::Fail(kind))   => Err(io::Error::new(kind, "scripted failure").into()),
			None => panic!("receive_chunk called with nothing scripted; a real device would block here"),
		}
	}

	fn quiet_period(&self) -> Duration { Duration::from_millis(1) }

}
