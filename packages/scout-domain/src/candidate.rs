use time::OffsetDateTime;

/// A video surfaced by the discovery pipeline.
///
/// `growth_ratio` is the ranking signal: views relative to the channel's
/// subscriber base. Channels that hide their subscriber count report zero;
/// those get a synthetic floor of one subscriber per hundred views so the
/// ratio stays finite and conservative.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoCandidate {
	pub id: String,
	pub title: String,
	pub channel_title: String,
	pub channel_subscribers: u64,
	pub views: u64,
	#[serde(with = "time::serde::rfc3339")]
	pub published_at: OffsetDateTime,
	pub duration_seconds: u64,
	pub thumbnail_url: String,
	pub watch_url: String,
	pub growth_ratio: f64,
	// Working field for the channel-statistics join; not part of the public
	// response shape.
	#[serde(skip_serializing)]
	pub channel_id: String,
}

pub fn effective_subscribers(channel_subscribers: u64, views: u64) -> u64 {
	if channel_subscribers > 0 { channel_subscribers } else { (views / 100).max(1) }
}

pub fn growth_ratio(views: u64, channel_subscribers: u64) -> f64 {
	views as f64 / effective_subscribers(channel_subscribers, views).max(1) as f64
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ratio_divides_by_subscriber_count() {
		assert_eq!(growth_ratio(120_000, 1_000), 120.0);
	}

	#[test]
	fn hidden_subscribers_get_a_synthetic_floor() {
		// 50 000 views with a hidden count -> 500 effective subscribers.
		assert_eq!(effective_subscribers(0, 50_000), 500);
		assert_eq!(growth_ratio(50_000, 0), 100.0);
	}

	#[test]
	fn ratio_is_finite_for_degenerate_inputs() {
		let ratio = growth_ratio(0, 0);

		assert!(ratio.is_finite());
		assert_eq!(ratio, 0.0);
	}
}
