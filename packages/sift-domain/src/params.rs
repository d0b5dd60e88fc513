use std::sync::LazyLock;

use regex::Regex;
use time::{Date, Duration, Month, OffsetDateTime};

use crate::{
	query::{Parameters, ScopeFilter, SortKey, TimeRange},
	terms,
};

/// Relative phrases and the day counts of the ranges they imply, longest
/// phrases first so "last week" wins over a bare "week" never matching.
const RELATIVE_RANGES: &[(&str, i64)] = &[
	("last quarter", 90),
	("last month", 30),
	("last week", 7),
	("last year", 365),
	("yesterday", 2),
	("today", 1),
];

static MONTH_DATE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2})(?:st|nd|rd|th)?(?:,?\s+(\d{4}))?\b",
	)
	.expect("month date pattern is valid")
});
static LIMIT: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?i)\b(?:show|list|display|top|first)\s+(\d{1,3})\b")
		.expect("limit pattern is valid")
});

/// Extracts filter parameters from a query. Purely lexical; `now` anchors the
/// relative time ranges.
pub fn extract(query: &str, now: OffsetDateTime) -> Parameters {
	let lower = query.to_lowercase();
	let tokens = terms::tokenize(query);

	Parameters {
		time_range: time_range(&lower, now),
		sort: sort_key(&lower),
		limit: limit(&lower),
		scope: scope(&tokens),
	}
}

fn time_range(lower: &str, now: OffsetDateTime) -> Option<TimeRange> {
	for (phrase, days) in RELATIVE_RANGES {
		if lower.contains(phrase) {
			return Some(TimeRange { start: now - Duration::days(*days), end: now });
		}
	}

	absolute_range(lower, now)
}

fn absolute_range(lower: &str, now: OffsetDateTime) -> Option<TimeRange> {
	let mut dates = Vec::new();

	for captures in MONTH_DATE.captures_iter(lower) {
		let month = month_from_name(captures.get(1)?.as_str())?;
		let day: u8 = captures.get(2)?.as_str().parse().ok()?;
		let year: i32 = match captures.get(3) {
			Some(raw) => raw.as_str().parse().ok()?,
			None => now.year(),
		};

		if let Ok(date) = Date::from_calendar_date(year, month, day) {
			dates.push(date.midnight().assume_utc());
		}
		if dates.len() == 2 {
			break;
		}
	}

	if dates.len() < 2 {
		return None;
	}

	let start = dates[0].min(dates[1]);
	let end = dates[0].max(dates[1]);

	Some(TimeRange { start, end })
}

fn month_from_name(name: &str) -> Option<Month> {
	match name {
		"january" => Some(Month::January),
		"february" => Some(Month::February),
		"march" => Some(Month::March),
		"april" => Some(Month::April),
		"may" => Some(Month::May),
		"june" => Some(Month::June),
		"july" => Some(Month::July),
		"august" => Some(Month::August),
		"september" => Some(Month::September),
		"october" => Some(Month::October),
		"november" => Some(Month::November),
		"december" => Some(Month::December),
		_ => None,
	}
}

fn sort_key(lower: &str) -> Option<SortKey> {
	if lower.contains("oldest") {
		return Some(SortKey::Oldest);
	}
	if lower.contains("newest") || lower.contains("latest") || lower.contains("most recent") {
		return Some(SortKey::Newest);
	}
	if lower.contains("alphabetical") {
		return Some(SortKey::Alphabetical);
	}
	if lower.contains("popular") || lower.contains("top ") {
		return Some(SortKey::Popularity);
	}

	None
}

fn limit(lower: &str) -> Option<u32> {
	LIMIT.captures(lower)?.get(1)?.as_str().parse().ok()
}

fn scope(tokens: &[String]) -> Option<ScopeFilter> {
	for token in tokens {
		match token.as_str() {
			"my" | "mine" => return Some(ScopeFilter::Mine),
			"team" | "our" => return Some(ScopeFilter::Team),
			"organization" | "org" | "company" => return Some(ScopeFilter::Organization),
			"public" => return Some(ScopeFilter::Public),
			_ => {},
		}
	}

	None
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use super::*;

	#[test]
	fn last_week_spans_the_prior_seven_days() {
		let now = datetime!(2026-03-10 12:00 UTC);
		let parameters = extract("Q4 budget planning last week", now);
		let range = parameters.time_range.expect("range");

		assert_eq!(range.end, now);
		assert_eq!(range.start, now - Duration::days(7));
	}

	#[test]
	fn month_name_pair_becomes_an_absolute_range() {
		let now = datetime!(2026-03-10 12:00 UTC);
		let parameters = extract("sales from January 5 to March 2", now);
		let range = parameters.time_range.expect("range");

		assert_eq!(range.start, datetime!(2026-01-05 00:00 UTC));
		assert_eq!(range.end, datetime!(2026-03-02 00:00 UTC));
	}

	#[test]
	fn limit_sort_and_scope_keywords() {
		let now = OffsetDateTime::UNIX_EPOCH;
		let parameters = extract("show 25 of my newest documents", now);

		assert_eq!(parameters.limit, Some(25));
		assert_eq!(parameters.sort, Some(SortKey::Newest));
		assert_eq!(parameters.scope, Some(ScopeFilter::Mine));
	}

	#[test]
	fn plain_query_has_no_parameters() {
		assert!(extract("budget review notes", OffsetDateTime::UNIX_EPOCH).is_empty());
	}
}
