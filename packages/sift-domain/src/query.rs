use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentType {
	#[default]
	Search,
	Question,
	Command,
	Comparison,
	Analysis,
	Creation,
	Update,
	Delete,
}
impl IntentType {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Search => "search",
			Self::Question => "question",
			Self::Command => "command",
			Self::Comparison => "comparison",
			Self::Analysis => "analysis",
			Self::Creation => "creation",
			Self::Update => "update",
			Self::Delete => "delete",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"search" => Some(Self::Search),
			"question" => Some(Self::Question),
			"command" => Some(Self::Command),
			"comparison" => Some(Self::Comparison),
			"analysis" => Some(Self::Analysis),
			"creation" => Some(Self::Creation),
			"update" => Some(Self::Update),
			"delete" => Some(Self::Delete),
			_ => None,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
	Person,
	Organization,
	Date,
	Location,
	Product,
	Project,
	Document,
	Topic,
	Metric,
}
impl EntityKind {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"person" => Some(Self::Person),
			"organization" => Some(Self::Organization),
			"date" => Some(Self::Date),
			"location" => Some(Self::Location),
			"product" => Some(Self::Product),
			"project" => Some(Self::Project),
			"document" => Some(Self::Document),
			"topic" => Some(Self::Topic),
			"metric" => Some(Self::Metric),
			_ => None,
		}
	}
}

/// Byte offsets of a match within the original query string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
	pub start: usize,
	pub end: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
	#[serde(rename = "type")]
	pub kind: EntityKind,
	pub value: String,
	pub confidence: f32,
	pub span: Span,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
	Newest,
	Oldest,
	Alphabetical,
	Popularity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeFilter {
	Mine,
	Team,
	Organization,
	Public,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
	#[serde(with = "time::serde::rfc3339")]
	pub start: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub end: OffsetDateTime,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
	pub time_range: Option<TimeRange>,
	pub sort: Option<SortKey>,
	pub limit: Option<u32>,
	pub scope: Option<ScopeFilter>,
}
impl Parameters {
	pub fn is_empty(&self) -> bool {
		self.time_range.is_none()
			&& self.sort.is_none()
			&& self.limit.is_none()
			&& self.scope.is_none()
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
	pub intent: IntentType,
	pub confidence: f32,
	pub entities: Vec<Entity>,
	pub parameters: Parameters,
	pub search_terms: Vec<String>,
	pub suggestions: Vec<String>,
}
impl Interpretation {
	/// Returned for blank queries before any classification runs.
	pub fn empty() -> Self {
		Self::default()
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryContext {
	pub recent_searches: Vec<String>,
	pub connected_sources: Vec<String>,
	pub organization: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpretOptions {
	pub context: QueryContext,
}
