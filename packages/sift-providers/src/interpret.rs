use color_eyre::{Result, eyre};
use serde_json::Value;

use sift_config::ProviderConfig;
use sift_domain::query::{Entity, EntityKind, IntentType, QueryContext, Span};

#[derive(Clone, Debug)]
pub struct RemoteInterpretation {
	pub intent: IntentType,
	pub confidence: f32,
	pub entities: Vec<Entity>,
}

/// Asks the remote intelligence service to classify a query. Any schema
/// mismatch in the response is an error; the caller's resilience gate turns
/// that into a fallback.
pub async fn interpret(
	cfg: &ProviderConfig,
	query: &str,
	context: &QueryContext,
) -> Result<RemoteInterpretation> {
	let client = crate::build_client(cfg)?;
	let url = format!("{}{}", cfg.api_base, cfg.interpret_path);
	let body = serde_json::json!({
		"model": cfg.model,
		"query": query,
		"context": {
			"recent_searches": context.recent_searches,
			"connected_sources": context.connected_sources,
			"organization": context.organization,
		},
	});
	let res = client.post(url).json(&body).send().await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_interpret_response(json)
}

fn parse_interpret_response(json: Value) -> Result<RemoteInterpretation> {
	let intent_raw = json
		.get("intent")
		.and_then(|v| v.as_str())
		.ok_or_else(|| eyre::eyre!("Interpret response is missing intent."))?;
	let intent = IntentType::parse(intent_raw)
		.ok_or_else(|| eyre::eyre!("Interpret response has unknown intent {intent_raw}."))?;
	let confidence =
		json.get("confidence").and_then(|v| v.as_f64()).unwrap_or(0.5).clamp(0.0, 1.0) as f32;
	let mut entities = Vec::new();

	if let Some(items) = json.get("entities").and_then(|v| v.as_array()) {
		for item in items {
			entities.push(parse_entity(item)?);
		}
	}

	Ok(RemoteInterpretation { intent, confidence, entities })
}

fn parse_entity(item: &Value) -> Result<Entity> {
	let kind_raw = item
		.get("type")
		.and_then(|v| v.as_str())
		.ok_or_else(|| eyre::eyre!("Entity is missing type."))?;
	let kind = EntityKind::parse(kind_raw)
		.ok_or_else(|| eyre::eyre!("Entity has unknown type {kind_raw}."))?;
	let value = item
		.get("value")
		.and_then(|v| v.as_str())
		.ok_or_else(|| eyre::eyre!("Entity is missing value."))?
		.to_string();
	let confidence =
		item.get("confidence").and_then(|v| v.as_f64()).unwrap_or(0.5).clamp(0.0, 1.0) as f32;
	let start = item.get("start").and_then(|v| v.as_u64()).unwrap_or(0) as usize;
	let end = item
		.get("end")
		.and_then(|v| v.as_u64())
		.map(|v| v as usize)
		.unwrap_or(start + value.len());

	Ok(Entity { kind, value, confidence, span: Span { start, end } })
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_intent_and_entities() {
		let json = serde_json::json!({
			"intent": "question",
			"confidence": 0.92,
			"entities": [
				{ "type": "date", "value": "last week", "confidence": 0.8, "start": 19, "end": 28 }
			]
		});
		let parsed = parse_interpret_response(json).expect("parse failed");

		assert_eq!(parsed.intent, IntentType::Question);
		assert!((parsed.confidence - 0.92).abs() < 1e-6);
		assert_eq!(parsed.entities.len(), 1);
		assert_eq!(parsed.entities[0].kind, EntityKind::Date);
		assert_eq!(parsed.entities[0].span, Span { start: 19, end: 28 });
	}

	#[test]
	fn unknown_intent_is_a_schema_mismatch() {
		let json = serde_json::json!({ "intent": "telepathy" });

		assert!(parse_interpret_response(json).is_err());
	}

	#[test]
	fn unknown_entity_type_is_a_schema_mismatch() {
		let json = serde_json::json!({
			"intent": "search",
			"entities": [{ "type": "spaceship", "value": "x" }]
		});

		assert!(parse_interpret_response(json).is_err());
	}
}
