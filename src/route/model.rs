use schemars::JsonSchema;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// A path containing a single resource id.
#[derive(Deserialize, Validate, JsonSchema)]
pub struct IdInput {
	pub id: Uuid,
}

#[cfg(test)]
mod test {
	use super::IdInput;

	#[test]
	fn test_id_input_requires_uuid() {
		let ok = serde_json::from_value::<IdInput>(serde_json::json!({
			"id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
		}));
		assert!(ok.is_ok());

		let err = serde_json::from_value::<IdInput>(serde_json::json!({ "id": "12345" }));
		assert!(err.is_err());
	}
}
