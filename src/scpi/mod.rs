// Request/response engine.  Commands normally get no reply at all, so the only way to notice a
// rejection is a short readiness probe after sending.  Queries always get a reply, which is either
// CR LF terminated or exactly the bare error sentinel.

use std::time::Duration;

use tracing::{debug, error, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::transport::{Transport, TERMINATOR, ERROR_SENTINEL};
use crate::transport::tcp_session::TcpSession;

pub mod decode;

pub struct ScpiClient<T: Transport = TcpSession> {
	transport: T,
}

impl ScpiClient<TcpSession> {

	pub fn connect(config:&Config) -> Result<Self> {
		Ok(Self::new(TcpSession::open(config)?))
	}

}

impl<T: Transport> ScpiClient<T> {

	pub fn new(transport:T) -> Self { Self{ transport } }

	pub fn transport_mut(&mut self) -> &mut T { &mut self.transport }
	pub fn into_inner(self) -> T { self.transport }

	pub fn send(&mut self, text:&str) -> Result<()> {
		if text.contains(|c:char| c == '\r' || c == '\n') {
			return Err(Error::InvalidRequest(text.to_owned()));
		}
		self.transport.send_frame(text)
	}

	/// Sends a request that produces no reply when it succeeds.
	///
	/// # Panics
	///
	/// If the device answers with anything other than the error sentinel.  The device only ever
	/// stays silent or rejects a command, so any other reply means the two sides are out of step.
	pub fn command(&mut self, cmd:&str) -> Result<()> {
		self.send(cmd)?;

		let wait:Duration = self.transport.quiet_period();
		if !self.transport.probe(wait)? {
			return Ok(());
		}

		let reply:Vec<u8> = self.transport.receive_chunk()?;
		if reply.is_empty() {
			return Err(Error::peer_closed());
		}

		if reply != ERROR_SENTINEL {
			let reply = String::from_utf8_lossy(&reply);
			error!(command = cmd, %reply, "unexpected reply to command");
			panic!("device replied {:?} to command {:?}; expected silence or {:?}", reply, cmd, "ERR!");
		}

		warn!(command = cmd, "command rejected");
		Err(Error::CommandRejected(cmd.to_owned()))
	}

	/// Sends a request and returns its reply with the trailing CR LF removed.
	///
	/// The reply buffer grows without limit until CR LF arrives.  Only the per-read I/O timeout
	/// bounds a peer that keeps streaming bytes without ever terminating the reply.
	pub fn query_bytes(&mut self, query:&str) -> Result<Vec<u8>> {
		self.send(query)?;

		let mut resp:Vec<u8> = vec![];
		loop {
			let chunk:Vec<u8> = self.transport.receive_chunk()?;
			if chunk.is_empty() {
				debug!(query, received = resp.len(), "peer closed mid-reply");
				return Err(Error::peer_closed());
			}
			resp.extend_from_slice(&chunk);

			// The sentinel is never terminated, so it has to be recognised before waiting for CR LF
			if resp == ERROR_SENTINEL {
				warn!(query, "query rejected");
				return Err(Error::QueryRejected(query.to_owned()));
			}

			if resp.ends_with(TERMINATOR) {
				resp.truncate(resp.len() - TERMINATOR.len());
				return Ok(resp);
			}
		}
	}

	pub fn query(&mut self, query:&str) -> Result<String> {
		let resp:Vec<u8> = self.query_bytes(query)?;
		String::from_utf8(resp)
			.map_err(|e| Error::format("a UTF-8 reply", &String::from_utf8_lossy(e.as_bytes())))
	}

	pub fn query_scalar(&mut self, query:&str) -> Result<f64> {
		decode::decode_scalar(&self.query(query)?)
	}

	pub fn query_array(&mut self, query:&str) -> Result<Vec<f64>> {
		decode::decode_numeric_array(&self.query(query)?)
	}

}
