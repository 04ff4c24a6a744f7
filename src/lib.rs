// Error type shared by every layer
pub mod error;

// Constructor-time options for a session (address, port, timeouts, buffer size)
pub mod config;

// Byte-level access to the instrument: framed sends, readiness probes and chunked reads over TCP
pub mod transport;

// The SCPI request/response engine plus decoders for numeric replies
pub mod scpi;

// Module for devices that speak this protocol
pub mod devices;

pub use config::Config;
pub use devices::red_pitaya::{AcquisitionFrame, Identity, RedPitaya};
pub use error::{Error, Result};
pub use scpi::ScpiClient;
pub use transport::Transport;
pub use transport::tcp_session::TcpSession;
