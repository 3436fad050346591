use serde_json::Value;

pub const DEFAULT_MIN_VIEWS: u64 = 10_000;
pub const DEFAULT_MAX_SUBS: u64 = 500_000;

/// The product is shorts-only; caller input never changes this.
pub const CONTENT_TYPE: &str = "short";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateBucket {
	Week,
	Month,
	Year,
	All,
}
impl DateBucket {
	fn parse(raw: &str) -> Option<Self> {
		match raw {
			"week" => Some(Self::Week),
			"month" => Some(Self::Month),
			"year" => Some(Self::Year),
			"all" => Some(Self::All),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchOrder {
	Date,
	Rating,
	Relevance,
	ViewCount,
}
impl SearchOrder {
	fn parse(raw: &str) -> Option<Self> {
		match raw {
			"date" => Some(Self::Date),
			"rating" => Some(Self::Rating),
			"relevance" => Some(Self::Relevance),
			"viewCount" => Some(Self::ViewCount),
			_ => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Date => "date",
			Self::Rating => "rating",
			Self::Relevance => "relevance",
			Self::ViewCount => "viewCount",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
	pub min_views: u64,
	pub max_subs: u64,
	pub date: DateBucket,
	pub order: SearchOrder,
	pub content_type: &'static str,
}
impl Default for SearchFilters {
	fn default() -> Self {
		Self {
			min_views: DEFAULT_MIN_VIEWS,
			max_subs: DEFAULT_MAX_SUBS,
			date: DateBucket::Year,
			order: SearchOrder::ViewCount,
			content_type: CONTENT_TYPE,
		}
	}
}
impl SearchFilters {
	/// Repairs arbitrary caller input into a fully populated filter record.
	/// Total over any JSON shape; invalid fields fall back to their defaults.
	pub fn normalize(raw: &Value) -> Self {
		let min_views = number_field(raw, "minViews").unwrap_or(DEFAULT_MIN_VIEWS);
		let max_subs = number_field(raw, "maxSubs").unwrap_or(DEFAULT_MAX_SUBS);
		let date = raw
			.get("date")
			.and_then(Value::as_str)
			.and_then(DateBucket::parse)
			.unwrap_or(DateBucket::Year);
		let order = raw
			.get("order")
			.and_then(Value::as_str)
			.and_then(SearchOrder::parse)
			.unwrap_or(SearchOrder::ViewCount);

		Self { min_views, max_subs, date, order, content_type: CONTENT_TYPE }
	}
}

fn number_field(raw: &Value, key: &str) -> Option<u64> {
	let value = raw.get(key)?;
	let number = match value {
		Value::Number(number) => number.as_f64()?,
		Value::String(text) => text.trim().parse::<f64>().ok()?,
		_ => return None,
	};

	if !number.is_finite() {
		return None;
	}

	Some(number.max(0.0).floor() as u64)
}
