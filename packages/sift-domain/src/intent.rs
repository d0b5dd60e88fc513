use crate::{query::IntentType, terms};

const QUESTION_MARKERS: &[&str] =
	&["what", "how", "when", "where", "why", "who", "which", "can", "does", "is", "are"];
const COMMAND_VERBS: &[&str] =
	&["show", "find", "get", "list", "display", "open", "fetch", "give", "pull"];
const COMPARISON_MARKERS: &[&str] =
	&["compare", "comparison", "versus", "vs", "difference", "differences", "better"];
const ANALYSIS_MARKERS: &[&str] = &[
	"analyze", "analyse", "analysis", "trend", "trends", "insight", "insights", "breakdown",
	"summarize", "summary",
];
const CREATION_VERBS: &[&str] =
	&["create", "make", "add", "new", "generate", "draft", "write", "compose", "build"];
const UPDATE_VERBS: &[&str] = &["update", "edit", "modify", "change", "rename", "revise"];
const DELETE_VERBS: &[&str] = &["delete", "remove", "erase", "discard", "archive"];

struct Rule {
	intent: IntentType,
	markers: &'static [&'static str],
}

/// Ordered rule list; the first rule with at least one hit wins. Question rules
/// only fire on a leading marker or a trailing question mark so that command
/// phrases like "show me what changed" stay commands.
const RULES: &[Rule] = &[
	Rule { intent: IntentType::Question, markers: QUESTION_MARKERS },
	Rule { intent: IntentType::Command, markers: COMMAND_VERBS },
	Rule { intent: IntentType::Comparison, markers: COMPARISON_MARKERS },
	Rule { intent: IntentType::Analysis, markers: ANALYSIS_MARKERS },
	Rule { intent: IntentType::Creation, markers: CREATION_VERBS },
	Rule { intent: IntentType::Update, markers: UPDATE_VERBS },
	Rule { intent: IntentType::Delete, markers: DELETE_VERBS },
];

/// Deterministic fallback intent classification. Returns the intent and the
/// number of matched indicator keywords for the winning rule.
pub fn classify(query: &str) -> (IntentType, usize) {
	let tokens = terms::tokenize(query);

	if tokens.is_empty() {
		return (IntentType::Search, 0);
	}

	for rule in RULES {
		let hits = tokens.iter().filter(|token| rule.markers.contains(&token.as_str())).count();

		if rule.intent == IntentType::Question {
			let leads = QUESTION_MARKERS.contains(&tokens[0].as_str());
			let asks = query.trim_end().ends_with('?');

			if leads || asks {
				return (IntentType::Question, hits.max(1));
			}

			continue;
		}

		if hits > 0 {
			return (rule.intent, hits);
		}
	}

	(IntentType::Search, 0)
}
