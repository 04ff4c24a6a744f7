use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::scpi::ScpiClient;
use crate::scpi::decode::{decode_scalar, time_axis};
use crate::transport::Transport;
use crate::transport::tcp_session::TcpSession;

lazy_static! {
    static ref IDN_RE: Regex = Regex::new("^([^,]+),([^,]+),([^,]+),([^,\\s]+)").unwrap();
}

pub struct RedPitaya<T: Transport = TcpSession> {
	scpi: ScpiClient<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
	pub manufacturer: String,
	pub model: String,
	pub serial_num: String,
	pub fw_version: String,
}

/// One two-channel capture with its derived time axis.  All three vectors have the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionFrame {
	pub time: Vec<f64>,
	pub ch1: Vec<f64>,
	pub ch2: Vec<f64>,
}

impl AcquisitionFrame {

	pub fn len(&self) -> usize { self.time.len() }
	pub fn is_empty(&self) -> bool { self.time.is_empty() }

	/// `(t, ch1, ch2)` per sample.
	pub fn rows(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
		self.time.iter().zip(&self.ch1).zip(&self.ch2).map(|((t, a), b)| (*t, *a, *b))
	}

}

fn chan_ok(n:u8) -> Result<()> {
	if n != 1 && n != 2 { Err(Error::InvalidChannel(n)) }
	else { Ok(()) }
}

impl RedPitaya<TcpSession> {

	pub fn connect(config:&Config) -> Result<Self> {
		Ok(Self::new(ScpiClient::connect(config)?))
	}

}

impl<T: Transport> RedPitaya<T> {

	pub fn new(scpi:ScpiClient<T>) -> Self { Self{ scpi } }

	pub fn scpi(&mut self) -> &mut ScpiClient<T> { &mut self.scpi }
	pub fn into_inner(self) -> ScpiClient<T> { self.scpi }

	pub fn identify(&mut self) -> Result<Identity> {
		let idn:String = self.scpi.query("*IDN?")?;
		let caps = IDN_RE.captures(&idn)
			.ok_or_else(|| Error::format("manufacturer,model,serial,firmware", &idn))?;

		Ok(Identity{
			manufacturer: caps[1].trim().to_owned(),
			model:        caps[2].trim().to_owned(),
			serial_num:   caps[3].trim().to_owned(),
			fw_version:   caps[4].trim().to_owned(),
		})
	}

	pub fn get_channel(&mut self, ch:u8) -> Result<Vec<f64>> {
		chan_ok(ch)?;
		self.scpi.query_array(&format!("ACQ:SOUR{}:DATA?", ch))
	}

	pub fn get_sample_rate(&mut self) -> Result<f64> { self.scpi.query_scalar("ACQ:SRA:HZ?") }

	/// Trigger delay in samples.
	pub fn get_trigger_delay(&mut self) -> Result<f64> { self.scpi.query_scalar("ACQ:TRIG:DLY?") }

	/// Current position of the acquisition write pointer in the sample buffer.
	pub fn write_pointer(&mut self) -> Result<u64> {
		let raw:String = self.scpi.query("ACQ:WPOS?")?;
		let x:f64 = decode_scalar(&raw)?;
		if x < 0.0 || x.fract() != 0.0 || x >= u64::MAX as f64 {
			return Err(Error::format("a non-negative integer buffer position", &raw));
		}
		Ok(x as u64)
	}

	pub fn fetch_acquisition_frame(&mut self) -> Result<AcquisitionFrame> {
		self.fetch_acquisition_frame_from(1, 2)
	}

	/// Downloads two channels plus the sample rate and trigger delay, and derives the time axis.
	///
	/// These are four separate round trips and the device keeps acquiring in between, so the write
	/// pointer may move between the channel downloads.  The two channels are then not guaranteed to
	/// cover the same instant, and the time axis reflects the settings at the moment they were read.
	/// The protocol has no command to freeze the buffer; stop the acquisition first if it matters.
	pub fn fetch_acquisition_frame_from(&mut self, ch_a:u8, ch_b:u8) -> Result<AcquisitionFrame> {
		chan_ok(ch_a)?;
		chan_ok(ch_b)?;

		let ch1:Vec<f64> = self.get_channel(ch_a)?;
		let ch2:Vec<f64> = self.get_channel(ch_b)?;
		if ch1.len() != ch2.len() {
			return Err(Error::LengthMismatch{ ch1: ch1.len(), ch2: ch2.len() });
		}

		let sample_rate:f64   = self.get_sample_rate()?;
		let trigger_delay:f64 = self.get_trigger_delay()?;
		let time:Vec<f64>     = time_axis(ch1.len(), sample_rate, trigger_delay)?;

		debug!(samples = ch1.len(), sample_rate, trigger_delay, "acquisition frame assembled");

		Ok(AcquisitionFrame{ time, ch1, ch2 })
	}

}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::transport::mock::MockTransport;

	fn device(mock:MockTransport) -> RedPitaya<MockTransport> { RedPitaya::new(ScpiClient::new(mock)) }

	#[test]
	fn frame_with_time_axis() {
		let mut rp = device(MockTransport::new()
			.line("{1,2,3,4}")
			.line("{-1,-2,-3,-4}")
			.line("10.0")
			.line("2.0"));

		let frame = rp.fetch_acquisition_frame().unwrap();
		assert_eq!(frame.time, vec![0.0, 0.1, 0.2, 0.3]);
		assert_eq!(frame.ch1, vec![1.0, 2.0, 3.0, 4.0]);
		assert_eq!(frame.ch2, vec![-1.0, -2.0, -3.0, -4.0]);
		assert_eq!(frame.rows().nth(1), Some((0.1, 2.0, -2.0)));

		let t = rp.into_inner().into_inner();
		assert_eq!(t.sent, vec!["ACQ:SOUR1:DATA?", "ACQ:SOUR2:DATA?", "ACQ:SRA:HZ?", "ACQ:TRIG:DLY?"]);
	}

	#[test]
	fn length_mismatch_stops_early() {
		let mut rp = device(MockTransport::new()
			.line("{1,2,3,4}")
			.line("{1,2,3}")
			.line("10.0")
			.line("2.0"));

		match rp.fetch_acquisition_frame() {
			Err(Error::LengthMismatch{ ch1, ch2 }) => assert_eq!((ch1, ch2), (4, 3)),
			other => panic!("unexpected result {:?}", other),
		}

		let t = rp.into_inner().into_inner();
		assert_eq!(t.sent.len(), 2);
		assert_eq!(t.pending(), 2);
	}

	#[test]
	fn channel_bounds() {
		let mut rp = device(MockTransport::new());
		assert!(matches!(rp.get_channel(3), Err(Error::InvalidChannel(3))));
		assert!(matches!(rp.fetch_acquisition_frame_from(0, 1), Err(Error::InvalidChannel(0))));
		assert!(rp.into_inner().into_inner().sent.is_empty());
	}

	#[test]
	fn swapped_channels() {
		let mut rp = device(MockTransport::new().line("{5}").line("{6}").line("1").line("0.5"));
		let frame = rp.fetch_acquisition_frame_from(2, 1).unwrap();
		assert_eq!(frame.ch1, vec![5.0]);
		assert_eq!(frame.time, vec![0.0]);
		assert_eq!(rp.into_inner().into_inner().sent[0], "ACQ:SOUR2:DATA?");
	}

	#[test]
	fn rejected_channel_query() {
		let mut rp = device(MockTransport::new().chunk(b"ERR!"));
		assert!(matches!(rp.fetch_acquisition_frame(), Err(Error::QueryRejected(_))));
	}

	#[test]
	fn identify() {
		let mut rp = device(MockTransport::new().line("REDPITAYA,INSTR2020,0,01-02"));
		let id = rp.identify().unwrap();
		assert_eq!(id.manufacturer, "REDPITAYA");
		assert_eq!(id.model, "INSTR2020");
		assert_eq!(id.serial_num, "0");
		assert_eq!(id.fw_version, "01-02");

		let mut rp = device(MockTransport::new().line("garbage"));
		assert!(matches!(rp.identify(), Err(Error::Format{..})));
	}

	#[test]
	fn write_pointer() {
		let mut rp = device(MockTransport::new().line("8191").line("-3").line("12.5").line("18446744073709551616"));
		assert_eq!(rp.write_pointer().unwrap(), 8191);
		assert!(matches!(rp.write_pointer(), Err(Error::Format{..})));
		assert!(matches!(rp.write_pointer(), Err(Error::Format{..})));
		// 2^64 would otherwise saturate to u64::MAX
		assert!(matches!(rp.write_pointer(), Err(Error::Format{..})));
	}

	#[test]
	fn frame_serializes() {
		let frame = AcquisitionFrame{ time: vec![0.0], ch1: vec![1.0], ch2: vec![2.0] };
		let json = serde_json::to_string(&frame).unwrap();
		assert_eq!(json, r#"{"time":[0.0],"ch1":[1.0],"ch2":[2.0]}"#);
		let back:AcquisitionFrame = serde_json::from_str(&json).unwrap();
		assert_eq!(back, frame);
	}
}
