use std::collections::HashSet;

use time::{Duration, OffsetDateTime};
use tracing::warn;

use scout_domain::{
	DateBucket, SearchFilters, SearchOrder, VideoCandidate, candidate, duration, ranking,
};

use crate::{Error, Result, ScoutService, credentials::SearchAuth};

/// Query used when the caller sends nothing searchable.
pub const DEFAULT_QUERY: &str = "viral ideas";

/// A phase that survives with fewer candidates than this triggers the
/// relevance fallback.
pub const MIN_PHASE_RESULTS: usize = 5;

const MAX_SHORT_SECONDS: u64 = 60;

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct SearchRequest {
	#[serde(default)]
	pub query: String,
	/// Raw caller filters; normalization repairs whatever arrives here.
	#[serde(default)]
	pub filters: serde_json::Value,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SearchResponse {
	pub items: Vec<VideoCandidate>,
}

impl ScoutService {
	/// Runs the discovery pipeline: normalize filters, resolve a credential,
	/// search-and-enrich (with the relevance fallback when the primary phase
	/// comes up short), then rank by growth ratio.
	pub async fn search(&self, user_id: &str, req: SearchRequest) -> Result<SearchResponse> {
		let filters = SearchFilters::normalize(&req.filters);
		let auth = self.resolve_for_search(user_id).await?;
		let query = match req.query.trim() {
			"" => DEFAULT_QUERY,
			trimmed => trimmed,
		};
		let published_after = date_cutoff(filters.date, OffsetDateTime::now_utc());

		let primary =
			self.fetch_and_filter(&auth, query, filters.order, published_after, &filters).await;
		let primary_count = primary.as_deref().map(<[_]>::len).unwrap_or(0);
		let mut phases = vec![primary];

		if primary_count < MIN_PHASE_RESULTS && filters.order != SearchOrder::Relevance {
			let fallback = self
				.fetch_and_filter(&auth, query, SearchOrder::Relevance, published_after, &filters)
				.await;

			phases.push(fallback);
		}

		// A phase that errored and a phase that found nothing feed the
		// merge identically; the distinction only matters when every phase
		// failed and there is nothing at all to return.
		let all_failed = phases.iter().all(Result::is_err);
		let merged = ranking::merge_unique(
			phases.into_iter().map(|phase| phase.unwrap_or_default()).collect(),
		);

		if merged.is_empty() && all_failed {
			return Err(Error::Upstream {
				message: "Every search phase failed upstream.".to_string(),
			});
		}

		Ok(SearchResponse { items: ranking::rank(merged) })
	}

	/// One search phase: search, enrich with video and channel statistics,
	/// construct candidates, apply the hard filters. A non-success upstream
	/// response degrades the phase to an error the caller absorbs.
	async fn fetch_and_filter(
		&self,
		auth: &SearchAuth,
		query: &str,
		order: SearchOrder,
		published_after: Option<OffsetDateTime>,
		filters: &SearchFilters,
	) -> Result<Vec<VideoCandidate>> {
		let outcome = self.try_fetch(auth, query, order, published_after, filters).await;

		if let Err(err) = outcome.as_ref() {
			warn!(order = order.as_str(), "Search phase degraded to empty: {err}.");
		}

		outcome
	}

	async fn try_fetch(
		&self,
		auth: &SearchAuth,
		query: &str,
		order: SearchOrder,
		published_after: Option<OffsetDateTime>,
		filters: &SearchFilters,
	) -> Result<Vec<VideoCandidate>> {
		let platform_cfg = &self.cfg.platform;
		let ids = self
			.providers
			.platform
			.search_videos(platform_cfg, auth, query, order, published_after)
			.await?;
		let videos = self.providers.platform.list_videos(platform_cfg, auth, &ids).await?;
		let channel_ids: Vec<String> = videos
			.iter()
			.map(|video| video.channel_id.clone())
			.filter(|id| !id.is_empty())
			.collect::<HashSet<_>>()
			.into_iter()
			.collect();
		let subscribers =
			self.providers.platform.list_channels(platform_cfg, auth, &channel_ids).await?;

		let candidates = videos
			.into_iter()
			.filter_map(|video| {
				let channel_subscribers =
					subscribers.get(&video.channel_id).copied().unwrap_or(0);
				let duration_seconds = duration::parse_seconds(&video.duration);

				if video.thumbnail_url.is_empty() || video.title.is_empty() {
					return None;
				}
				if duration_seconds > MAX_SHORT_SECONDS {
					return None;
				}
				if video.views < filters.min_views {
					return None;
				}
				if channel_subscribers > filters.max_subs {
					return None;
				}

				Some(VideoCandidate {
					growth_ratio: candidate::growth_ratio(video.views, channel_subscribers),
					watch_url: format!("https://www.youtube.com/watch?v={}", video.id),
					id: video.id,
					title: video.title,
					channel_title: video.channel_title,
					channel_id: video.channel_id,
					channel_subscribers,
					views: video.views,
					published_at: video.published_at,
					duration_seconds,
					thumbnail_url: video.thumbnail_url,
				})
			})
			.collect();

		Ok(candidates)
	}
}

fn date_cutoff(bucket: DateBucket, now: OffsetDateTime) -> Option<OffsetDateTime> {
	match bucket {
		DateBucket::Week => Some(now - Duration::days(7)),
		DateBucket::Month => Some(now - Duration::days(30)),
		DateBucket::Year => Some(now - Duration::days(365)),
		DateBucket::All => None,
	}
}
