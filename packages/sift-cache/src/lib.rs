//! Quota- and TTL-aware key/value cache over a pluggable storage medium.
//!
//! Every failure degrades to a cache miss or a `false` return; nothing here is
//! fatal to callers. Byte accounting lives in a per-process index owned by the
//! store, so two stores must not share one medium.

mod error;

pub use error::{Error, Result};

use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use time::{Duration, OffsetDateTime};

pub const ENVELOPE_SCHEMA_VERSION: u32 = 1;

/// The persistent key/value collaborator. String keys, serialized payloads.
pub trait StorageMedium
where
	Self: Send + Sync,
{
	fn read(&self, key: &str) -> Result<Option<String>>;
	fn write(&self, key: &str, payload: &str) -> Result<()>;
	fn delete(&self, key: &str) -> Result<()>;
	fn clear(&self) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryMedium {
	entries: Mutex<HashMap<String, String>>,
}
impl StorageMedium for MemoryMedium {
	fn read(&self, key: &str) -> Result<Option<String>> {
		Ok(self.lock().get(key).cloned())
	}

	fn write(&self, key: &str, payload: &str) -> Result<()> {
		self.lock().insert(key.to_string(), payload.to_string());

		Ok(())
	}

	fn delete(&self, key: &str) -> Result<()> {
		self.lock().remove(key);

		Ok(())
	}

	fn clear(&self) -> Result<()> {
		self.lock().clear();

		Ok(())
	}
}
impl MemoryMedium {
	fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
		self.entries.lock().unwrap_or_else(|err| err.into_inner())
	}
}

#[derive(Debug, Serialize, serde::Deserialize)]
struct Envelope {
	schema_version: u32,
	#[serde(with = "time::serde::rfc3339")]
	written_at: OffsetDateTime,
	ttl_ms: i64,
	value: Value,
}

#[derive(Clone, Copy, Debug)]
struct EntryMeta {
	written_at: OffsetDateTime,
	ttl: Duration,
	size_bytes: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheStats {
	pub used_bytes: u64,
	pub item_count: usize,
}

#[derive(Clone, Copy, Debug)]
pub struct CachePolicy {
	pub max_bytes: u64,
	pub max_items: usize,
	/// Cleanup evicts until usage drops to this fraction of `max_bytes`.
	pub cleanup_ratio: f32,
}
impl Default for CachePolicy {
	fn default() -> Self {
		Self { max_bytes: 5 * 1024 * 1024, max_items: 1_000, cleanup_ratio: 0.8 }
	}
}

pub struct CacheStore {
	medium: Arc<dyn StorageMedium>,
	policy: CachePolicy,
	index: Mutex<HashMap<String, EntryMeta>>,
}
impl CacheStore {
	pub fn new(medium: Arc<dyn StorageMedium>, policy: CachePolicy) -> Self {
		Self { medium, policy, index: Mutex::new(HashMap::new()) }
	}

	/// Writes an entry, evicting first when the budget or item cap would be
	/// exceeded. Returns false when the entry cannot be admitted or the medium
	/// rejects the write; callers must treat that as a degraded write, not an
	/// error.
	pub fn set<T>(&self, key: &str, value: &T, ttl: Duration) -> bool
	where
		T: Serialize,
	{
		let now = OffsetDateTime::now_utc();
		let value = match serde_json::to_value(value) {
			Ok(value) => value,
			Err(err) => {
				tracing::warn!(key, error = %err, "Failed to serialize cache value.");

				return false;
			},
		};
		let envelope = Envelope {
			schema_version: ENVELOPE_SCHEMA_VERSION,
			written_at: now,
			ttl_ms: ttl.whole_milliseconds() as i64,
			value,
		};
		let payload = match serde_json::to_string(&envelope) {
			Ok(payload) => payload,
			Err(err) => {
				tracing::warn!(key, error = %err, "Failed to encode cache envelope.");

				return false;
			},
		};
		let size_bytes = payload.len() as u64;

		if size_bytes > self.policy.max_bytes {
			tracing::warn!(key, size_bytes, "Cache entry exceeds the byte budget; skipping.");

			return false;
		}

		let mut index = self.lock_index();
		// Overwrites release the old entry's accounting before admission.
		let previous = index.remove(key);
		let over_budget = used_bytes(&index) + size_bytes > self.policy.max_bytes;
		let over_items = index.len() + 1 > self.policy.max_items;

		if over_budget || over_items {
			self.cleanup(&mut index, size_bytes, now);
		}
		if let Err(err) = self.medium.write(key, &payload) {
			tracing::warn!(key, error = %err, "Cache medium rejected the write.");

			if let Some(previous) = previous {
				index.insert(key.to_string(), previous);
			}

			return false;
		}

		index.insert(key.to_string(), EntryMeta { written_at: now, ttl, size_bytes });

		true
	}

	/// Missing, expired, or undecodable entries all read as `None`; stale and
	/// corrupt entries are deleted on the way out.
	pub fn get<T>(&self, key: &str) -> Option<T>
	where
		T: DeserializeOwned,
	{
		let payload = match self.medium.read(key) {
			Ok(Some(payload)) => payload,
			Ok(None) => {
				self.lock_index().remove(key);

				return None;
			},
			Err(err) => {
				tracing::warn!(key, error = %err, "Cache medium read failed; treating as miss.");

				return None;
			},
		};
		let envelope: Envelope = match serde_json::from_str(&payload) {
			Ok(envelope) => envelope,
			Err(_) => {
				self.purge(key);

				return None;
			},
		};

		if envelope.schema_version != ENVELOPE_SCHEMA_VERSION {
			self.purge(key);

			return None;
		}
		if OffsetDateTime::now_utc() - envelope.written_at
			> Duration::milliseconds(envelope.ttl_ms)
		{
			self.purge(key);

			return None;
		}

		match serde_json::from_value(envelope.value) {
			Ok(value) => Some(value),
			Err(_) => {
				self.purge(key);

				None
			},
		}
	}

	pub fn remove(&self, key: &str) -> bool {
		let existed = self.lock_index().remove(key).is_some();

		if let Err(err) = self.medium.delete(key) {
			tracing::warn!(key, error = %err, "Cache medium delete failed.");
		}

		existed
	}

	pub fn clear(&self) {
		self.lock_index().clear();

		if let Err(err) = self.medium.clear() {
			tracing::warn!(error = %err, "Cache medium clear failed.");
		}
	}

	pub fn stats(&self) -> CacheStats {
		let index = self.lock_index();

		CacheStats { used_bytes: used_bytes(&index), item_count: index.len() }
	}

	/// Purge expired entries, then evict oldest-by-write-time entries until the
	/// incoming entry fits under the cleanup threshold and the item cap.
	fn cleanup(
		&self,
		index: &mut HashMap<String, EntryMeta>,
		incoming_bytes: u64,
		now: OffsetDateTime,
	) {
		let expired: Vec<String> = index
			.iter()
			.filter(|(_, meta)| now - meta.written_at > meta.ttl)
			.map(|(key, _)| key.clone())
			.collect();

		for key in expired {
			index.remove(&key);
			self.delete_quiet(&key);
		}

		let target = (self.policy.max_bytes as f64 * f64::from(self.policy.cleanup_ratio)) as u64;

		loop {
			let used = used_bytes(index);
			let fits = used + incoming_bytes <= self.policy.max_bytes
				&& used <= target
				&& index.len() < self.policy.max_items;

			if fits || index.is_empty() {
				break;
			}

			let Some(oldest) = index
				.iter()
				.min_by_key(|(_, meta)| meta.written_at)
				.map(|(key, _)| key.clone())
			else {
				break;
			};

			index.remove(&oldest);
			self.delete_quiet(&oldest);
			tracing::debug!(key = oldest.as_str(), "Evicted oldest cache entry.");
		}
	}

	fn purge(&self, key: &str) {
		self.lock_index().remove(key);
		self.delete_quiet(key);
	}

	fn delete_quiet(&self, key: &str) {
		if let Err(err) = self.medium.delete(key) {
			tracing::warn!(key, error = %err, "Cache medium delete failed.");
		}
	}

	fn lock_index(&self) -> std::sync::MutexGuard<'_, HashMap<String, EntryMeta>> {
		self.index.lock().unwrap_or_else(|err| err.into_inner())
	}
}

fn used_bytes(index: &HashMap<String, EntryMeta>) -> u64 {
	index.values().map(|meta| meta.size_bytes).sum()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trip() {
		let store = CacheStore::new(Arc::new(MemoryMedium::default()), CachePolicy::default());

		assert!(store.set("k", &"v".to_string(), Duration::seconds(60)));
		assert_eq!(store.get::<String>("k").as_deref(), Some("v"));
	}

	#[test]
	fn oversized_entry_is_refused() {
		let policy = CachePolicy { max_bytes: 32, ..CachePolicy::default() };
		let store = CacheStore::new(Arc::new(MemoryMedium::default()), policy);

		assert!(!store.set("k", &"x".repeat(64), Duration::seconds(60)));
		assert_eq!(store.stats().item_count, 0);
	}

	#[test]
	fn remove_reports_presence() {
		let store = CacheStore::new(Arc::new(MemoryMedium::default()), CachePolicy::default());

		store.set("k", &1_u32, Duration::seconds(60));

		assert!(store.remove("k"));
		assert!(!store.remove("k"));
	}
}
