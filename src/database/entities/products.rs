use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::{string_or_number, value_as_number};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Per-unit weight as entered; may be a number or a numeric string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Model {
    pub fn unit_weight(&self) -> Option<f64> {
        self.weight.as_ref().and_then(value_as_number)
    }
}
