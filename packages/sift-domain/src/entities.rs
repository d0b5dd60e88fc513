use std::sync::LazyLock;

use regex::Regex;

use crate::query::{Entity, EntityKind, Span};

pub const ABSOLUTE_DATE_CONFIDENCE: f32 = 0.9;
pub const RELATIVE_DATE_CONFIDENCE: f32 = 0.8;
pub const MONEY_CONFIDENCE: f32 = 0.9;
pub const PERCENT_CONFIDENCE: f32 = 0.9;
pub const PROJECT_CONFIDENCE: f32 = 0.7;
pub const DOCUMENT_CONFIDENCE: f32 = 0.7;

static ABSOLUTE_DATE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"(?i)\b(?:january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{1,2}(?:st|nd|rd|th)?(?:,?\s+\d{4})?\b|\b\d{4}-\d{2}-\d{2}\b|\b\d{1,2}/\d{1,2}/\d{2,4}\b",
	)
	.expect("absolute date pattern is valid")
});
static RELATIVE_DATE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?i)\b(?:today|yesterday|tomorrow|(?:last|this|next)\s+(?:week|month|quarter|year))\b")
		.expect("relative date pattern is valid")
});
static MONEY: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?i)\$\d[\d,]*(?:\.\d+)?(?:\s?(?:k|m|bn|thousand|million|billion))?")
		.expect("money pattern is valid")
});
static PERCENT: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\b\d+(?:\.\d+)?%").expect("percent pattern is valid"));
static CAPITALIZED_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\b[A-Z][A-Za-z0-9]*(?:\s+[A-Z][A-Za-z0-9]*)+\b")
		.expect("capitalized phrase pattern is valid")
});
static DOCUMENT_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"(?i)\b(?:report|presentation|spreadsheet|document|invoice|contract|proposal|memo|deck|slides?|email)\b",
	)
	.expect("document keyword pattern is valid")
});

/// Common words that disqualify a capitalized phrase from being a project name,
/// mostly sentence starters and query verbs that happen to be capitalized.
const PHRASE_STOPLIST: &[&str] = &[
	"the", "this", "that", "these", "those", "what", "how", "when", "where", "why", "who", "which",
	"show", "find", "get", "list", "display", "create", "delete", "update", "compare", "analyze",
	"my", "our", "your", "new", "last", "next", "can", "does", "is", "are", "please", "and", "for",
];

/// Runs every pattern matcher independently over the raw query. Each match
/// records its byte span and a fixed per-pattern confidence.
pub fn extract(query: &str) -> Vec<Entity> {
	let mut out = Vec::new();

	collect(&ABSOLUTE_DATE, query, EntityKind::Date, ABSOLUTE_DATE_CONFIDENCE, &mut out);
	collect(&RELATIVE_DATE, query, EntityKind::Date, RELATIVE_DATE_CONFIDENCE, &mut out);
	collect(&MONEY, query, EntityKind::Metric, MONEY_CONFIDENCE, &mut out);
	collect(&PERCENT, query, EntityKind::Metric, PERCENT_CONFIDENCE, &mut out);

	for found in CAPITALIZED_PHRASE.find_iter(query) {
		let phrase = found.as_str();
		let blocked = phrase
			.split_whitespace()
			.any(|word| PHRASE_STOPLIST.contains(&word.to_lowercase().as_str()));

		if blocked {
			continue;
		}

		out.push(Entity {
			kind: EntityKind::Project,
			value: phrase.to_string(),
			confidence: PROJECT_CONFIDENCE,
			span: Span { start: found.start(), end: found.end() },
		});
	}

	collect(&DOCUMENT_KEYWORD, query, EntityKind::Document, DOCUMENT_CONFIDENCE, &mut out);

	out
}

fn collect(pattern: &Regex, query: &str, kind: EntityKind, confidence: f32, out: &mut Vec<Entity>) {
	for found in pattern.find_iter(query) {
		out.push(Entity {
			kind,
			value: found.as_str().to_string(),
			confidence,
			span: Span { start: found.start(), end: found.end() },
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn relative_date_with_span() {
		let entities = extract("Q4 budget planning last week");

		assert_eq!(entities.len(), 1);
		assert_eq!(entities[0].kind, EntityKind::Date);
		assert_eq!(entities[0].value, "last week");
		assert_eq!(entities[0].span, Span { start: 19, end: 28 });
	}

	#[test]
	fn money_and_percent_are_metrics() {
		let entities = extract("revenue up 12% on a $1,200.50 budget");
		let kinds: Vec<_> = entities.iter().map(|entity| entity.kind).collect();

		assert!(kinds.contains(&EntityKind::Metric));
		assert!(entities.iter().any(|entity| entity.value == "12%"));
		assert!(entities.iter().any(|entity| entity.value == "$1,200.50"));
	}

	#[test]
	fn capitalized_phrase_becomes_project() {
		let entities = extract("status of Project Atlas rollout");

		assert!(entities.iter().any(|entity| {
			entity.kind == EntityKind::Project && entity.value == "Project Atlas"
		}));
	}

	#[test]
	fn stoplisted_phrases_are_skipped() {
		let entities = extract("Show Me everything");

		assert!(entities.iter().all(|entity| entity.kind != EntityKind::Project));
	}

	#[test]
	fn document_keywords_match_case_insensitively() {
		let entities = extract("the quarterly Report");

		assert!(entities.iter().any(|entity| {
			entity.kind == EntityKind::Document && entity.value == "Report"
		}));
	}
}
