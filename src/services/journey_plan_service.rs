use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::common::{str_as_id, value_as_id, value_as_reference};
use crate::config::LimitsConfig;
use crate::database::entities::journey_plans::{selected_days, DayMap, LocationsSnapshot, PeriodType};
use crate::database::entities::{JourneyPlan, Role};
use crate::database::{Database, Snapshot};
use crate::dates::CalendarDate;
use crate::errors::{AuthError, PlanError, PlanResult};
use crate::services::authorization::Identity;

/// Raw create/update request for a supervisor's plan.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSubmission {
    #[serde(default, alias = "supervisor_id", alias = "supervisor")]
    pub supervisor_id: Option<Value>,
    #[serde(default)]
    pub period_type: Option<Value>,
    #[serde(default)]
    pub start_date: Option<Value>,
    #[serde(default)]
    pub end_date: Option<Value>,
    #[serde(default)]
    pub days: Option<Value>,
    #[serde(default)]
    pub locations_snapshot: Option<Value>,
    #[serde(default)]
    pub copied_from: Option<Value>,
}

#[derive(Clone, Debug, Default)]
pub struct PlanFilter {
    pub supervisor_id: Option<i64>,
    pub limit: Option<usize>,
}

/// The plan covering a date and that date's resolved assignments.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePlan {
    pub plan: JourneyPlan,
    pub date: CalendarDate,
    pub location_ids: Vec<String>,
    pub locations: Vec<Value>,
}

#[derive(Debug)]
struct ValidatedPlan {
    supervisor_id: i64,
    period_type: PeriodType,
    start_date: CalendarDate,
    end_date: CalendarDate,
    days: DayMap,
    selected_days_count: usize,
    locations_snapshot: Option<LocationsSnapshot>,
    copied_from: Option<String>,
}

/// Canonicalize a raw day map.
///
/// Keys that are not dates are dropped. Each day's references are coerced to
/// strings, falsy values removed, de-duplicated and sorted, so logically equal
/// inputs always produce the same map. Keys that land on the same date are
/// merged.
pub fn normalize_days(raw: &Value) -> DayMap {
    let Some(entries) = raw.as_object() else {
        return DayMap::new();
    };

    let mut merged: BTreeMap<CalendarDate, BTreeSet<String>> = BTreeMap::new();
    for (key, value) in entries {
        let Some(date) = CalendarDate::parse(key.as_str()) else {
            continue;
        };
        let references = merged.entry(date).or_default();
        if let Some(items) = value.as_array() {
            references.extend(items.iter().filter_map(value_as_reference));
        }
    }

    merged
        .into_iter()
        .map(|(date, references)| (date, references.into_iter().collect()))
        .collect()
}

fn validate_submission(submission: PlanSubmission) -> PlanResult<ValidatedPlan> {
    let supervisor_id = submission
        .supervisor_id
        .as_ref()
        .and_then(value_as_id)
        .ok_or(PlanError::MissingField("supervisorId"))?;

    let period_type = match submission.period_type {
        None | Some(Value::Null) | Some(Value::Bool(false)) => PeriodType::Weekly,
        Some(Value::String(raw)) if raw.trim().is_empty() => PeriodType::Weekly,
        Some(Value::String(raw)) => raw.parse().map_err(PlanError::InvalidPeriodType)?,
        Some(other) => return Err(PlanError::InvalidPeriodType(other.to_string())),
    };

    let start_date = CalendarDate::parse(&submission.start_date);
    let end_date = CalendarDate::parse(&submission.end_date);
    let (Some(start_date), Some(end_date)) = (start_date, end_date) else {
        return Err(PlanError::InvalidDateRange);
    };
    if end_date < start_date {
        return Err(PlanError::EndBeforeStart);
    }

    let days = submission
        .days
        .as_ref()
        .map(normalize_days)
        .unwrap_or_default();
    let selected_days_count = selected_days(&days);
    if selected_days_count == 0 {
        return Err(PlanError::EmptySchedule);
    }

    let locations_snapshot = match submission.locations_snapshot {
        Some(Value::Object(map)) => Some(map.into_iter().collect()),
        _ => None,
    };

    Ok(ValidatedPlan {
        supervisor_id,
        period_type,
        start_date,
        end_date,
        days,
        selected_days_count,
        locations_snapshot,
        copied_from: submission.copied_from.as_ref().and_then(value_as_reference),
    })
}

/// Copy the live attributes of every referenced location.
fn capture_locations(snapshot: &Snapshot, days: &DayMap) -> LocationsSnapshot {
    days.values()
        .flatten()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter_map(|reference| {
            let location = str_as_id(reference).and_then(|id| snapshot.location(id))?;
            Some((reference.clone(), location.snapshot()))
        })
        .collect()
}

fn by_recency(a: &JourneyPlan, b: &JourneyPlan) -> std::cmp::Ordering {
    b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id))
}

/// Journey plan management: one live plan per supervisor.
#[derive(Clone)]
pub struct JourneyPlanService {
    db: Database,
    limits: LimitsConfig,
}

impl JourneyPlanService {
    pub fn new(db: Database, limits: LimitsConfig) -> Self {
        Self { db, limits }
    }

    /// Create the supervisor's plan, or overwrite it in place if one exists.
    /// The flag is `true` when a new plan was created.
    pub async fn upsert_plan(&self, submission: PlanSubmission) -> PlanResult<(JourneyPlan, bool)> {
        self.save_plan_at(submission, Utc::now()).await
    }

    pub async fn upsert_plan_at(
        &self,
        submission: PlanSubmission,
        now: DateTime<Utc>,
    ) -> PlanResult<JourneyPlan> {
        self.save_plan_at(submission, now).await.map(|(plan, _)| plan)
    }

    pub async fn save_plan_at(
        &self,
        submission: PlanSubmission,
        now: DateTime<Utc>,
    ) -> PlanResult<(JourneyPlan, bool)> {
        let validated = validate_submission(submission).map_err(|e| {
            warn!("Rejected journey plan: {}", e);
            e
        })?;

        let (plan, created) = self
            .db
            .transact(|snapshot| -> PlanResult<(JourneyPlan, bool)> {
                let is_supervisor = snapshot
                    .user(validated.supervisor_id)
                    .is_some_and(|u| u.role == Role::Supervisor);
                if !is_supervisor {
                    return Err(PlanError::SupervisorNotFound(validated.supervisor_id));
                }

                let locations_snapshot = validated
                    .locations_snapshot
                    .clone()
                    .unwrap_or_else(|| capture_locations(snapshot, &validated.days));

                if let Some(existing) = snapshot.plan_for_supervisor_mut(validated.supervisor_id) {
                    existing.period_type = validated.period_type;
                    existing.start_date = validated.start_date;
                    existing.end_date = validated.end_date;
                    existing.days = validated.days.clone();
                    existing.locations_snapshot = locations_snapshot;
                    existing.days_count = validated.days.len();
                    existing.selected_days_count = validated.selected_days_count;
                    if validated.copied_from.is_some() {
                        existing.copied_from = validated.copied_from.clone();
                    }
                    existing.updated_at = now;
                    return Ok((existing.clone(), false));
                }

                let plan = JourneyPlan {
                    id: snapshot.next_plan_id(),
                    supervisor_id: validated.supervisor_id,
                    period_type: validated.period_type,
                    start_date: validated.start_date,
                    end_date: validated.end_date,
                    days_count: validated.days.len(),
                    selected_days_count: validated.selected_days_count,
                    days: validated.days.clone(),
                    locations_snapshot,
                    copied_from: validated.copied_from.clone(),
                    created_at: now,
                    updated_at: now,
                };
                snapshot.journey_plans.push(plan.clone());
                Ok((plan, true))
            })
            .await?;

        info!(
            "{} journey plan {} for supervisor {} ({} of {} days planned)",
            if created { "Created" } else { "Updated" },
            plan.id,
            plan.supervisor_id,
            plan.selected_days_count,
            plan.days_count
        );
        Ok((plan, created))
    }

    /// Plans ordered most recently updated first.
    pub async fn list_plans(&self, filter: PlanFilter) -> PlanResult<Vec<JourneyPlan>> {
        let limit = self.limits.plans(filter.limit);
        let plans = self
            .db
            .read(|snapshot| {
                let mut plans: Vec<JourneyPlan> = snapshot
                    .journey_plans
                    .iter()
                    .filter(|p| filter.supervisor_id.map_or(true, |id| p.is_owned_by(id)))
                    .cloned()
                    .collect();
                plans.sort_by(by_recency);
                plans.truncate(limit);
                plans
            })
            .await?;
        debug!("Listed {} journey plans", plans.len());
        Ok(plans)
    }

    /// The supervisor's plan covering `date` (today when absent), with that
    /// day's locations resolved from the plan's own snapshot.
    pub async fn active_plan(
        &self,
        supervisor_id: i64,
        date: Option<CalendarDate>,
    ) -> PlanResult<Option<ActivePlan>> {
        let date = date.unwrap_or_else(CalendarDate::today);
        let plan = self
            .db
            .read(|snapshot| {
                snapshot
                    .journey_plans
                    .iter()
                    .filter(|p| p.is_owned_by(supervisor_id) && p.is_active_on(date))
                    .min_by(|a, b| by_recency(a, b))
                    .cloned()
            })
            .await?;

        Ok(plan.map(|plan| {
            let location_ids = plan.assignments_on(date);
            let locations = plan.resolve_locations(&location_ids);
            ActivePlan {
                plan,
                date,
                location_ids,
                locations,
            }
        }))
    }

    /// Fetch a plan the caller is allowed to see.
    pub async fn get_plan(&self, caller: &Identity, id: i64) -> PlanResult<JourneyPlan> {
        if caller.role == Role::Employee {
            return Err(AuthError::forbidden().into());
        }
        let plan = self
            .db
            .read(|snapshot| snapshot.plan(id).cloned())
            .await?
            .ok_or(PlanError::NotFound(id))?;
        if !caller.can_view_plan(&plan) {
            return Err(AuthError::forbidden().into());
        }
        Ok(plan)
    }

    pub async fn delete_plan(&self, id: i64) -> PlanResult<JourneyPlan> {
        let removed = self
            .db
            .transact(|snapshot| -> PlanResult<JourneyPlan> {
                let index = snapshot
                    .journey_plans
                    .iter()
                    .position(|p| p.id == id)
                    .ok_or(PlanError::NotFound(id))?;
                Ok(snapshot.journey_plans.remove(index))
            })
            .await?;
        info!("Deleted journey plan {} of supervisor {}", removed.id, removed.supervisor_id);
        Ok(removed)
    }
}
