use std::collections::HashSet;

pub const STOP_WORDS: &[&str] = &[
	"a", "about", "after", "all", "an", "and", "any", "are", "as", "at", "be", "been", "before",
	"but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has", "have", "if",
	"in", "into", "is", "it", "its", "me", "no", "not", "of", "on", "or", "over", "please", "so",
	"than", "that", "the", "then", "these", "this", "those", "to", "under", "was", "were", "will",
	"with", "would", "you", "your",
];

/// Lowercased alphanumeric tokens, order preserved, no filtering.
pub fn tokenize(text: &str) -> Vec<String> {
	let mut normalized = String::with_capacity(text.len());

	for ch in text.chars() {
		if ch.is_alphanumeric() {
			normalized.extend(ch.to_lowercase());
		} else {
			normalized.push(' ');
		}
	}

	normalized.split_whitespace().map(|token| token.to_string()).collect()
}

/// Query tokens with stop words removed and duplicates dropped.
pub fn search_terms(query: &str) -> Vec<String> {
	let mut out = Vec::new();
	let mut seen = HashSet::new();

	for token in tokenize(query) {
		if token.len() < 2 {
			continue;
		}
		if STOP_WORDS.contains(&token.as_str()) {
			continue;
		}
		if seen.insert(token.clone()) {
			out.push(token);
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_stop_words_and_lowercases() {
		let terms = search_terms("The Q4 budget for a planning review");

		assert_eq!(terms, vec!["q4", "budget", "planning", "review"]);
	}

	#[test]
	fn deduplicates_preserving_order() {
		let terms = search_terms("budget budget BUDGET review");

		assert_eq!(terms, vec!["budget", "review"]);
	}
}
