// Parsers for the two reply grammars the device uses for numbers: a bare decimal literal, and a
// brace-delimited, comma-separated list of them.

use crate::error::{Error, Result};

const ARRAY_GRAMMAR:&str = "a brace-delimited list like {f1,f2,...}";
const SCALAR_GRAMMAR:&str = "a decimal number";

// `f64::from_str` also takes "nan", "inf" and "infinity", which the device never sends as numbers
fn parse_finite(field:&str) -> Option<f64> {
	field.trim().parse::<f64>().ok().filter(|x| x.is_finite())
}

pub fn decode_numeric_array(raw:&str) -> Result<Vec<f64>> {
	let interior:&str = raw.strip_prefix('{')
		.and_then(|s| s.strip_suffix('}'))
		.ok_or_else(|| Error::format(ARRAY_GRAMMAR, raw))?;

	if interior.trim().is_empty() {
		return Ok(vec![]);
	}

	interior.split(',')
		.map(|field| parse_finite(field).ok_or_else(|| Error::format(ARRAY_GRAMMAR, raw)))
		.collect()
}

pub fn decode_scalar(raw:&str) -> Result<f64> {
	parse_finite(raw).ok_or_else(|| Error::format(SCALAR_GRAMMAR, raw))
}

/// Sample times for a capture of `len` points, with the trigger at `trigger_delay` samples past
/// the middle of the buffer: `t[i] = (i + trigger_delay - len/2) / sample_rate`.
pub fn time_axis(len:usize, sample_rate:f64, trigger_delay:f64) -> Result<Vec<f64>> {
	if !(sample_rate.is_finite() && sample_rate > 0.0) {
		return Err(Error::format("a positive sample rate", &sample_rate.to_string()));
	}

	let t0:f64 = trigger_delay - (len as f64) / 2.0;
	Ok((0..len).map(|i| (i as f64 + t0) / sample_rate).collect())
}
