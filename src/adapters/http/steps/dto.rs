//! DTOs for step data endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::step_data::StepRecord;

/// Body of `PUT /api/steps/:track/:step`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertStepRequest {
    pub payload: Value,
    #[serde(default)]
    pub expected_version: Option<i32>,
}

/// A list of step rows.
#[derive(Debug, Clone, Serialize)]
pub struct StepListResponse {
    pub steps: Vec<StepRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expected_version_is_optional() {
        let req: UpsertStepRequest =
            serde_json::from_value(json!({"payload": {"notes": "hi"}})).unwrap();
        assert!(req.expected_version.is_none());

        let req: UpsertStepRequest =
            serde_json::from_value(json!({"payload": {}, "expectedVersion": 3})).unwrap();
        assert_eq!(req.expected_version, Some(3));
    }
}
