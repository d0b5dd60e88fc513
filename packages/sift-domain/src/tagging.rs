use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
	entities,
	lexicon::{self, ActionLexicon, TopicLexicon},
	query::EntityKind,
	terms,
};

const MAX_KEYWORD_CONFIDENCE: f32 = 0.95;
const ENTITY_AUTHOR_CONFIDENCE: f32 = 0.9;
const ENTITY_SOURCE_CONFIDENCE: f32 = 0.8;
const ENTITY_PATTERN_CONFIDENCE: f32 = 0.7;
const CUSTOM_CONFIDENCE: f32 = 0.6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
	Topic,
	Sentiment,
	Entity,
	Action,
	Custom,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
	#[default]
	General,
	Technical,
	Financial,
	Legal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tag {
	pub name: String,
	pub category: TagCategory,
	pub confidence: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
	pub id: String,
	#[serde(default)]
	pub title: Option<String>,
	pub content: String,
	#[serde(default)]
	pub author: Option<String>,
	#[serde(default)]
	pub source: Option<String>,
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagOptions {
	pub domain: Domain,
	pub min_confidence: f32,
	pub max_tags: usize,
	/// Categories to emit; `None` enables all of them.
	pub categories: Option<Vec<TagCategory>>,
}
impl Default for TagOptions {
	fn default() -> Self {
		Self { domain: Domain::General, min_confidence: 0.3, max_tags: 10, categories: None }
	}
}
impl TagOptions {
	fn enabled(&self, category: TagCategory) -> bool {
		self.categories.as_ref().map(|list| list.contains(&category)).unwrap_or(true)
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaggingResult {
	pub document_id: String,
	pub tags: Vec<Tag>,
	pub overall_confidence: f32,
	pub tag_density: f32,
}

/// Full tagging pipeline minus memoization: extract per-category tags, dedupe
/// by (name, category) keeping the best confidence, filter, sort, truncate.
pub fn tag_document(document: &Document, options: &TagOptions) -> TaggingResult {
	let text = match document.title.as_deref() {
		Some(title) => format!("{title} {}", document.content),
		None => document.content.clone(),
	};
	let tokens = terms::tokenize(&text);
	let mut raw = Vec::new();

	if options.enabled(TagCategory::Topic) {
		collect_topics(lexicon::BUSINESS, &tokens, TagCategory::Topic, &mut raw);
		collect_topics(lexicon::domain_lexicon(options.domain), &tokens, TagCategory::Topic, &mut raw);
	}
	if options.enabled(TagCategory::Sentiment) {
		collect_sentiment(&tokens, &mut raw);
	}
	if options.enabled(TagCategory::Entity) {
		collect_entities(document, &mut raw);
	}
	if options.enabled(TagCategory::Action) {
		collect_actions(lexicon::ACTIONS, &tokens, &mut raw);
	}
	if options.enabled(TagCategory::Custom) {
		collect_custom(lexicon::domain_lexicon(options.domain), &tokens, &mut raw);
	}

	let mut tags = dedupe(raw);

	tags.retain(|tag| tag.confidence >= options.min_confidence);
	tags.sort_by(|a, b| {
		b.confidence
			.partial_cmp(&a.confidence)
			.unwrap_or(std::cmp::Ordering::Equal)
			.then_with(|| a.name.cmp(&b.name))
	});
	tags.truncate(options.max_tags);

	let overall_confidence = if tags.is_empty() {
		0.0
	} else {
		tags.iter().map(|tag| tag.confidence).sum::<f32>() / tags.len() as f32
	};
	let word_count = document.content.split_whitespace().count();
	let tag_density =
		if word_count == 0 { 0.0 } else { tags.len() as f32 / word_count as f32 };

	TaggingResult { document_id: document.id.clone(), tags, overall_confidence, tag_density }
}

fn keyword_hits(keywords: &[&str], tokens: &[String]) -> usize {
	tokens.iter().filter(|token| keywords.contains(&token.as_str())).count()
}

fn collect_topics(
	lexicons: &[TopicLexicon],
	tokens: &[String],
	category: TagCategory,
	out: &mut Vec<Tag>,
) {
	for entry in lexicons {
		let hits = keyword_hits(entry.keywords, tokens);

		if hits > 0 {
			out.push(Tag {
				name: entry.topic.to_string(),
				category,
				confidence: scaled_confidence(hits),
			});
		}
	}
}

fn collect_sentiment(tokens: &[String], out: &mut Vec<Tag>) {
	let positive = keyword_hits(lexicon::POSITIVE, tokens);
	let negative = keyword_hits(lexicon::NEGATIVE, tokens);

	if positive == 0 && negative == 0 {
		out.push(Tag {
			name: "neutral".to_string(),
			category: TagCategory::Sentiment,
			confidence: 0.5,
		});

		return;
	}

	let (name, hits) =
		if positive >= negative { ("positive", positive) } else { ("negative", negative) };

	out.push(Tag {
		name: name.to_string(),
		category: TagCategory::Sentiment,
		confidence: (0.5 + 0.1 * hits as f32).min(MAX_KEYWORD_CONFIDENCE),
	});
}

fn collect_entities(document: &Document, out: &mut Vec<Tag>) {
	if let Some(author) = document.author.as_deref().filter(|author| !author.trim().is_empty()) {
		out.push(Tag {
			name: author.to_lowercase(),
			category: TagCategory::Entity,
			confidence: ENTITY_AUTHOR_CONFIDENCE,
		});
	}
	if let Some(source) = document.source.as_deref().filter(|source| !source.trim().is_empty()) {
		out.push(Tag {
			name: source.to_lowercase(),
			category: TagCategory::Entity,
			confidence: ENTITY_SOURCE_CONFIDENCE,
		});
	}

	for entity in entities::extract(&document.content) {
		let keep = entity.kind == EntityKind::Date
			|| (entity.kind == EntityKind::Metric && entity.value.starts_with('$'));

		if keep {
			out.push(Tag {
				name: entity.value.to_lowercase(),
				category: TagCategory::Entity,
				confidence: ENTITY_PATTERN_CONFIDENCE,
			});
		}
	}
}

fn collect_actions(lexicons: &[ActionLexicon], tokens: &[String], out: &mut Vec<Tag>) {
	for entry in lexicons {
		let hits = keyword_hits(entry.verbs, tokens);

		if hits > 0 {
			out.push(Tag {
				name: entry.action.to_string(),
				category: TagCategory::Action,
				confidence: scaled_confidence(hits),
			});
		}
	}
}

// Domain lexicon matches double as custom tags so integrations can consume
// them without parsing topic semantics.
fn collect_custom(lexicons: &[TopicLexicon], tokens: &[String], out: &mut Vec<Tag>) {
	for entry in lexicons {
		if keyword_hits(entry.keywords, tokens) > 0 {
			out.push(Tag {
				name: entry.topic.to_string(),
				category: TagCategory::Custom,
				confidence: CUSTOM_CONFIDENCE,
			});
		}
	}
}

fn scaled_confidence(hits: usize) -> f32 {
	(0.55 + 0.1 * hits as f32).min(MAX_KEYWORD_CONFIDENCE)
}

fn dedupe(raw: Vec<Tag>) -> Vec<Tag> {
	let mut best: HashMap<(String, TagCategory), Tag> = HashMap::new();

	for tag in raw {
		let key = (tag.name.clone(), tag.category);

		match best.get(&key) {
			Some(existing) if existing.confidence >= tag.confidence => {},
			_ => {
				best.insert(key, tag);
			},
		}
	}

	best.into_values().collect()
}
