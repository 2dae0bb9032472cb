use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::common::{id_or_string, optional_number};

/// A mart/outlet that employees visit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(deserialize_with = "id_or_string")]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mart_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_name: Option<String>,
    #[serde(default, deserialize_with = "optional_number", skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "optional_number", skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default, deserialize_with = "optional_number", skip_serializing_if = "Option::is_none")]
    pub radius_meters: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Model {
    /// Label stored on sale records: `"<mart> - <area>"`, or the id when
    /// neither is known.
    pub fn sale_label(&self) -> String {
        let mart = self.mart_name.as_deref().unwrap_or_default();
        let label = match self.area.as_deref().filter(|a| !a.is_empty()) {
            Some(area) => format!("{} - {}", mart, area),
            None => mart.to_string(),
        };
        let label = label.trim();
        if label.is_empty() {
            self.id.to_string()
        } else {
            label.to_string()
        }
    }

    /// Name shown on schedules; falls back to `mart • area • city`.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        [&self.mart_name, &self.area, &self.city_name]
            .iter()
            .filter_map(|part| part.as_deref().filter(|p| !p.is_empty()))
            .collect::<Vec<_>>()
            .join(" • ")
    }

    pub fn radius(&self) -> Option<f64> {
        self.radius_meters
            .or_else(|| self.extra.get("allowRadiusMeters").and_then(Value::as_f64))
    }

    /// Point-in-time copy embedded in journey plans.
    pub fn snapshot(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.display_name(),
            "lat": self.lat,
            "lng": self.lng,
            "radiusMeters": self.radius(),
        })
    }
}
