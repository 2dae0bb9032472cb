use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::id_or_string;
use crate::dates::{CalendarDate, DateRange};

/// Date → ordered, de-duplicated location references.
pub type DayMap = BTreeMap<CalendarDate, Vec<String>>;

/// Location reference → denormalized display attributes.
pub type LocationsSnapshot = BTreeMap<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Weekly,
    Monthly,
}

impl FromStr for PeriodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(PeriodType::Weekly),
            "monthly" => Ok(PeriodType::Monthly),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodType::Weekly => f.write_str("weekly"),
            PeriodType::Monthly => f.write_str("monthly"),
        }
    }
}

/// A supervisor's visit schedule. At most one exists per supervisor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(deserialize_with = "id_or_string")]
    pub id: i64,
    #[serde(deserialize_with = "id_or_string")]
    pub supervisor_id: i64,
    pub period_type: PeriodType,
    pub start_date: CalendarDate,
    pub end_date: CalendarDate,
    #[serde(default)]
    pub days: DayMap,
    #[serde(default)]
    pub locations_snapshot: LocationsSnapshot,
    #[serde(default)]
    pub days_count: usize,
    #[serde(default)]
    pub selected_days_count: usize,
    #[serde(default)]
    pub copied_from: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn is_active_on(&self, date: CalendarDate) -> bool {
        DateRange::between(self.start_date, self.end_date).contains(date)
    }

    pub fn is_owned_by(&self, supervisor_id: i64) -> bool {
        self.supervisor_id == supervisor_id
    }

    /// Location references assigned on `date`.
    pub fn assignments_on(&self, date: CalendarDate) -> Vec<String> {
        self.days.get(&date).cloned().unwrap_or_default()
    }

    /// Resolve references through the plan's own snapshot; references the
    /// snapshot does not know are skipped.
    pub fn resolve_locations(&self, references: &[String]) -> Vec<Value> {
        references
            .iter()
            .filter_map(|reference| self.locations_snapshot.get(reference))
            .cloned()
            .collect()
    }
}

/// Number of days with at least one assignment.
pub fn selected_days(days: &DayMap) -> usize {
    days.values().filter(|ids| !ids.is_empty()).count()
}
