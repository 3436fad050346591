// std
use std::{collections::HashMap, time::Duration as StdDuration};

// crates.io
use reqwest::Client;
use serde_json::Value;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{ApiAuth, Result};

/// Search page size; the platform caps this at 50.
pub const MAX_SEARCH_RESULTS: u32 = 50;

/// One row of the videos.list join: snippet + statistics + contentDetails.
/// Missing or malformed upstream fields decode to safe defaults rather than
/// failing the batch.
#[derive(Debug, Clone)]
pub struct VideoItem {
	pub id: String,
	pub title: String,
	pub channel_id: String,
	pub channel_title: String,
	pub views: u64,
	pub published_at: OffsetDateTime,
	pub duration: String,
	pub thumbnail_url: String,
}

/// Searches up to [`MAX_SEARCH_RESULTS`] short-duration videos and returns
/// their ids in result order.
pub async fn search_videos(
	cfg: &scout_config::PlatformApi,
	auth: ApiAuth<'_>,
	query: &str,
	order: &str,
	published_after: Option<OffsetDateTime>,
) -> Result<Vec<String>> {
	let client = client(cfg)?;
	let mut request = client
		.get(format!("{}/search", cfg.api_base))
		.query(&[
			("part", "snippet"),
			("type", "video"),
			("videoDuration", "short"),
			("q", query),
			("order", order),
		])
		.query(&[("maxResults", MAX_SEARCH_RESULTS)]);

	if let Some(cutoff) = published_after {
		let cutoff = cutoff
			.format(&Rfc3339)
			.map_err(|err| crate::Error::Decode(format!("Failed to format cutoff: {err}.")))?;

		request = request.query(&[("publishedAfter", cutoff)]);
	}

	let json: Value = auth.apply(request).send().await?.error_for_status()?.json().await?;

	Ok(parse_search_ids(&json))
}

/// Batch-fetches statistics and content metadata for the given video ids.
pub async fn list_videos(
	cfg: &scout_config::PlatformApi,
	auth: ApiAuth<'_>,
	ids: &[String],
) -> Result<Vec<VideoItem>> {
	if ids.is_empty() {
		return Ok(Vec::new());
	}

	let client = client(cfg)?;
	let request = client.get(format!("{}/videos", cfg.api_base)).query(&[
		("part", "snippet,statistics,contentDetails"),
		("id", ids.join(",").as_str()),
	]);
	let json: Value = auth.apply(request).send().await?.error_for_status()?.json().await?;

	Ok(parse_video_items(&json))
}

/// Batch-fetches subscriber counts for the given channel ids. Channels that
/// hide their count report zero subscribers.
pub async fn list_channels(
	cfg: &scout_config::PlatformApi,
	auth: ApiAuth<'_>,
	ids: &[String],
) -> Result<HashMap<String, u64>> {
	if ids.is_empty() {
		return Ok(HashMap::new());
	}

	let client = client(cfg)?;
	let request = client
		.get(format!("{}/channels", cfg.api_base))
		.query(&[("part", "statistics"), ("id", ids.join(",").as_str())]);
	let json: Value = auth.apply(request).send().await?.error_for_status()?.json().await?;

	Ok(parse_channel_subscribers(&json))
}

fn client(cfg: &scout_config::PlatformApi) -> Result<Client> {
	Ok(Client::builder().timeout(StdDuration::from_millis(cfg.timeout_ms)).build()?)
}

fn parse_search_ids(json: &Value) -> Vec<String> {
	let Some(items) = json.get("items").and_then(Value::as_array) else {
		return Vec::new();
	};

	items
		.iter()
		.filter_map(|item| item.pointer("/id/videoId").and_then(Value::as_str))
		.map(str::to_string)
		.collect()
}

fn parse_video_items(json: &Value) -> Vec<VideoItem> {
	let Some(items) = json.get("items").and_then(Value::as_array) else {
		return Vec::new();
	};

	items
		.iter()
		.filter_map(|item| {
			// Without an id the row is unusable; everything else defaults.
			let id = item.get("id").and_then(Value::as_str)?;

			Some(VideoItem {
				id: id.to_string(),
				title: str_at(item, "/snippet/title"),
				channel_id: str_at(item, "/snippet/channelId"),
				channel_title: str_at(item, "/snippet/channelTitle"),
				views: count_at(item, "/statistics/viewCount"),
				published_at: item
					.pointer("/snippet/publishedAt")
					.and_then(Value::as_str)
					.and_then(|raw| OffsetDateTime::parse(raw, &Rfc3339).ok())
					.unwrap_or(OffsetDateTime::UNIX_EPOCH),
				duration: str_at(item, "/contentDetails/duration"),
				thumbnail_url: str_at(item, "/snippet/thumbnails/high/url"),
			})
		})
		.collect()
}

fn parse_channel_subscribers(json: &Value) -> HashMap<String, u64> {
	let Some(items) = json.get("items").and_then(Value::as_array) else {
		return HashMap::new();
	};

	items
		.iter()
		.filter_map(|item| {
			let id = item.get("id").and_then(Value::as_str)?;

			Some((id.to_string(), count_at(item, "/statistics/subscriberCount")))
		})
		.collect()
}

fn str_at(item: &Value, pointer: &str) -> String {
	item.pointer(pointer).and_then(Value::as_str).unwrap_or_default().to_string()
}

// The platform encodes counts as decimal strings; bare numbers are accepted
// too, anything else is zero.
fn count_at(item: &Value, pointer: &str) -> u64 {
	match item.pointer(pointer) {
		Some(Value::String(raw)) => raw.parse().unwrap_or(0),
		Some(Value::Number(number)) => number.as_u64().unwrap_or(0),
		_ => 0,
	}
}
