/// Parses the platform's ISO-8601 duration encoding (`PT1M5S`, `PT58S`,
/// `P1DT2H`) into whole seconds.
///
/// Partial upstream data must never fail the pipeline, so anything that does
/// not parse yields zero seconds; the short-duration search restriction keeps
/// long videos out of the result set regardless.
pub fn parse_seconds(raw: &str) -> u64 {
	let raw = raw.trim();
	let Some(rest) = raw.strip_prefix('P') else {
		return 0;
	};
	let mut seconds = 0u64;
	let mut value = 0u64;
	let mut in_time = false;

	for ch in rest.chars() {
		match ch {
			'T' => {
				in_time = true;
				value = 0;
			},
			'0'..='9' => {
				value = value.saturating_mul(10).saturating_add((ch as u8 - b'0') as u64);
			},
			'D' if !in_time => {
				seconds = seconds.saturating_add(value.saturating_mul(86_400));
				value = 0;
			},
			'H' if in_time => {
				seconds = seconds.saturating_add(value.saturating_mul(3_600));
				value = 0;
			},
			'M' if in_time => {
				seconds = seconds.saturating_add(value.saturating_mul(60));
				value = 0;
			},
			'S' if in_time => {
				seconds = seconds.saturating_add(value);
				value = 0;
			},
			// Week/month/year designators and fractions do not occur in
			// video durations; treat them as unparsable.
			_ => return 0,
		}
	}

	seconds
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_typical_short_durations() {
		assert_eq!(parse_seconds("PT58S"), 58);
		assert_eq!(parse_seconds("PT1M"), 60);
		assert_eq!(parse_seconds("PT1M5S"), 65);
	}

	#[test]
	fn parses_longer_durations() {
		assert_eq!(parse_seconds("PT1H2M3S"), 3_723);
		assert_eq!(parse_seconds("P1DT2H"), 93_600);
	}

	#[test]
	fn malformed_input_yields_zero() {
		assert_eq!(parse_seconds(""), 0);
		assert_eq!(parse_seconds("1M5S"), 0);
		assert_eq!(parse_seconds("PT1X"), 0);
	}
}
