use time::Duration;

use sift_domain::tagging::{self, Document, TagOptions, TaggingResult};

use crate::{SiftService, keys};

impl SiftService {
	/// Tags a document with topic, sentiment, entity, action, and custom tags.
	/// Results are memoized per (document id, options): a repeat request
	/// returns the cached result without recomputation, even if the document
	/// body changed in the meantime. No remote call is involved.
	pub fn tag_content(&self, document: &Document, options: &TagOptions) -> TaggingResult {
		let cache_key = keys::tagging_cache_key(&document.id, options);

		if let Some(key) = cache_key.as_deref()
			&& let Some(cached) = self.cache.get::<TaggingResult>(key)
		{
			return cached;
		}

		let result = tagging::tag_document(document, options);

		if let Some(key) = cache_key {
			self.cache.set(&key, &result, Duration::seconds(self.cfg.cache.tagging_ttl_secs));
		}

		result
	}
}
