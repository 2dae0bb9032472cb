use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{id_or_string, number_or_string, optional_number, string_or_number};
use crate::dates::CalendarDate;

/// An immutable sale entry. Names and weights are copied from the reference
/// records when the sale is recorded and never re-derived afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(deserialize_with = "id_or_string")]
    pub id: i64,
    #[serde(deserialize_with = "id_or_string")]
    pub employee_id: i64,
    #[serde(default)]
    pub employee_name: String,
    #[serde(deserialize_with = "id_or_string")]
    pub location_id: i64,
    #[serde(default)]
    pub location_name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub product_id: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default, deserialize_with = "optional_number")]
    pub product_weight: Option<f64>,
    #[serde(deserialize_with = "number_or_string")]
    pub quantity: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub total_weight: f64,
    pub sale_date: CalendarDate,
    pub created_at: DateTime<Utc>,
}

/// `quantity × unit weight`, or the bare quantity when the product has no
/// usable weight.
pub fn total_weight(quantity: f64, unit_weight: Option<f64>) -> f64 {
    match unit_weight {
        Some(weight) => quantity * weight,
        None => quantity,
    }
}
