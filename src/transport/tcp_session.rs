use std::io::{self, Read, Write, ErrorKind};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, trace};

use crate::config::Config;
use crate::error::{Error, Result};
use super::{Transport, frame};

pub struct TcpSession {
	stream: TcpStream,
	io_timeout: Duration,
	quiet_period: Duration,
	buffer_size: usize,
}

fn connect_any(addrs:&[SocketAddr], timeout:Duration) -> io::Result<TcpStream> {
	let mut last_err = io::Error::new(ErrorKind::InvalidInput, "address resolved to nothing");
	for addr in addrs {
		match TcpStream::connect_timeout(addr, timeout) {
			Ok(stream) => return Ok(stream),
			Err(e)     => last_err = e,
		}
	}
	Err(last_err)
}

impl TcpSession {

	/// Connects and applies the configured timeouts.  Any failure here is a `Connection` error and the
	/// half-built socket is dropped (closed) before returning.
	pub fn open(config:&Config) -> Result<Self> {
		config.validate()?;

		let target:String = format!("{}:{}", config.address, config.port);
		let conn_err = |source:io::Error| Error::Connection{ addr: target.clone(), source };

		let addrs:Vec<SocketAddr> = (config.address.as_str(), config.port).to_socket_addrs().map_err(conn_err)?.collect();
		let stream:TcpStream = connect_any(&addrs, config.connect_timeout()?).map_err(conn_err)?;

		let io_timeout:Duration = config.io_timeout()?;
		stream.set_read_timeout(Some(io_timeout)).map_err(conn_err)?;
		stream.set_write_timeout(Some(io_timeout)).map_err(conn_err)?;
		stream.set_nodelay(true).map_err(conn_err)?;

		debug!(addr = %target, "connected");

		Ok(Self{ stream, io_timeout, quiet_period: config.quiet_period()?, buffer_size: config.receive_buffer_size })
	}

	pub fn peer_addr(&self) -> Result<SocketAddr> { Ok(self.stream.peer_addr()?) }

	/// Shuts down both directions.  Dropping the session closes the socket as well.
	pub fn close(self) -> Result<()> {
		match self.stream.shutdown(Shutdown::Both) {
			Err(e) if e.kind() != ErrorKind::NotConnected => Err(e.into()),
			_ => Ok(()),
		}
	}

	fn peek_within(&mut self, wait:Duration) -> io::Result<bool> {
		// A zero read timeout is rejected by the OS layer
		let wait:Duration = wait.max(Duration::from_micros(1));
		self.stream.set_read_timeout(Some(wait))?;

		let mut byte:[u8; 1] = [0; 1];
		let ready:io::Result<bool> = match self.stream.peek(&mut byte) {
			// Zero bytes means EOF, which still counts as readable
			Ok(_) => Ok(true),
			Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => Ok(false),
			Err(e) => Err(e),
		};

		self.stream.set_read_timeout(Some(self.io_timeout))?;
		ready
	}

}

impl Transport for TcpSession {

	fn send_frame(&mut self, text:&str) -> Result<()> {
		let bytes:Vec<u8> = frame(text);
		self.stream.write_all(&bytes)?;
		self.stream.flush()?;
		trace!(len = bytes.len(), "sent frame");
		Ok(())
	}

	fn probe(&mut self, wait:Duration) -> Result<bool> {
		let ready:bool = self.peek_within(wait)?;
		trace!(?wait, ready, "probed");
		Ok(ready)
	}

	fn receive_chunk(&mut self) -> Result<Vec<u8>> {
		let mut buff:Vec<u8> = vec![0; self.buffer_size];
		let n:usize = loop {
			match self.stream.read(&mut buff) {
				Ok(n) => break n,
				Err(e) if e.kind() == ErrorKind::Interrupted => continue,
				Err(e) => return Err(e.into()),
			}
		};
		buff.truncate(n);
		trace!(len = n, "received chunk");
		Ok(buff)
	}

	fn quiet_period(&self) -> Duration { self.quiet_period }

}
