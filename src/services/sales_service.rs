use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::common::{str_as_id, value_as_number, value_as_reference};
use crate::config::LimitsConfig;
use crate::database::entities::sales::total_weight;
use crate::database::entities::SaleRecord;
use crate::database::Database;
use crate::dates::{month_bounds, week_bounds, CalendarDate, DateRange};
use crate::errors::{AuthError, SaleError, SaleResult};
use crate::services::aggregation::{filter_sales, rollup, top_group, totals, GroupKey, GroupTotals, SaleFilter};

/// Raw sale as submitted by an employee.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleSubmission {
    #[serde(default)]
    pub product_id: Option<Value>,
    #[serde(default)]
    pub location_id: Option<Value>,
    #[serde(default)]
    pub quantity: Option<Value>,
    #[serde(default)]
    pub sale_date: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub employee_id: i64,
    pub total_quantity: f64,
    pub total_weight: f64,
}

/// Top employee and top location for the current week and month.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlights {
    pub today: CalendarDate,
    pub week_from: CalendarDate,
    pub week_to: CalendarDate,
    pub month_from: CalendarDate,
    pub month_to: CalendarDate,
    pub top_employee_this_week: Option<GroupTotals>,
    pub top_employee_this_month: Option<GroupTotals>,
    pub top_mart_this_week: Option<GroupTotals>,
    pub top_mart_this_month: Option<GroupTotals>,
}

#[derive(Debug)]
struct ValidatedSale {
    product_id: String,
    location_ref: String,
    quantity: f64,
    sale_date: CalendarDate,
}

fn is_blank(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Bool(b)) => !b,
        Some(_) => false,
    }
}

fn validate_sale(submission: SaleSubmission, today: CalendarDate) -> SaleResult<ValidatedSale> {
    if is_blank(&submission.product_id)
        || is_blank(&submission.location_id)
        || submission.quantity.is_none()
    {
        return Err(SaleError::MissingFields);
    }

    let quantity = submission
        .quantity
        .as_ref()
        .and_then(value_as_number)
        .filter(|q| *q > 0.0)
        .ok_or(SaleError::InvalidQuantity)?;

    let sale_date = if is_blank(&submission.sale_date) {
        today
    } else {
        CalendarDate::parse(&submission.sale_date).ok_or(SaleError::InvalidSaleDate)?
    };

    let product_id = submission
        .product_id
        .as_ref()
        .and_then(value_as_reference)
        .ok_or(SaleError::MissingFields)?;
    let location_ref = submission
        .location_id
        .as_ref()
        .and_then(value_as_reference)
        .ok_or(SaleError::MissingFields)?;

    Ok(ValidatedSale {
        product_id,
        location_ref,
        quantity,
        sale_date,
    })
}

fn newest_first(a: &SaleRecord, b: &SaleRecord) -> std::cmp::Ordering {
    b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))
}

/// Sale recording and the queries built on the aggregation functions.
#[derive(Clone)]
pub struct SalesService {
    db: Database,
    limits: LimitsConfig,
}

impl SalesService {
    pub fn new(db: Database, limits: LimitsConfig) -> Self {
        Self { db, limits }
    }

    pub async fn record_sale(&self, employee_id: i64, submission: SaleSubmission) -> SaleResult<SaleRecord> {
        let now = Utc::now();
        self.record_sale_at(employee_id, submission, now, CalendarDate::today())
            .await
    }

    /// Record a sale, freezing the product weight and display names as they
    /// are right now. `today` is the default `saleDate`.
    pub async fn record_sale_at(
        &self,
        employee_id: i64,
        submission: SaleSubmission,
        now: DateTime<Utc>,
        today: CalendarDate,
    ) -> SaleResult<SaleRecord> {
        let validated = validate_sale(submission, today).map_err(|e| {
            warn!("Rejected sale from employee {}: {}", employee_id, e);
            e
        })?;

        let sale = self
            .db
            .transact(|snapshot| -> SaleResult<SaleRecord> {
                let employee_name = snapshot
                    .user(employee_id)
                    .map(|u| u.name.clone())
                    .ok_or_else(|| AuthError::Unauthorized("Invalid identity".to_string()))?;

                let product = snapshot
                    .product(&validated.product_id)
                    .ok_or_else(|| SaleError::ProductNotFound(validated.product_id.clone()))?;
                let (product_id, product_name, unit_weight) =
                    (product.id.clone(), product.name.clone(), product.unit_weight());

                let location = str_as_id(&validated.location_ref)
                    .and_then(|id| snapshot.location(id))
                    .ok_or_else(|| SaleError::LocationNotFound(validated.location_ref.clone()))?;
                let (location_id, location_name) = (location.id, location.sale_label());

                let sale = SaleRecord {
                    id: snapshot.next_sale_id(),
                    employee_id,
                    employee_name,
                    location_id,
                    location_name,
                    product_id,
                    product_name,
                    product_weight: unit_weight,
                    quantity: validated.quantity,
                    total_weight: total_weight(validated.quantity, unit_weight),
                    sale_date: validated.sale_date,
                    created_at: now,
                };
                snapshot.sales.push(sale.clone());
                Ok(sale)
            })
            .await?;

        info!(
            "Recorded sale {} by employee {}: {} x {} at {}",
            sale.id, sale.employee_id, sale.quantity, sale.product_name, sale.location_name
        );
        Ok(sale)
    }

    /// Matching sales, newest first, capped by the configured sales limit.
    pub async fn query_sales(&self, filter: SaleFilter, limit: Option<usize>) -> SaleResult<Vec<SaleRecord>> {
        let limit = self.limits.sales(limit);
        self.collect(filter, limit).await
    }

    /// The caller's own sales, newest first.
    pub async fn my_sales(
        &self,
        employee_id: i64,
        range: DateRange,
        limit: Option<usize>,
    ) -> SaleResult<Vec<SaleRecord>> {
        let limit = self.limits.my_sales(limit);
        let filter = SaleFilter {
            employee_id: Some(employee_id),
            range,
            ..Default::default()
        };
        self.collect(filter, limit).await
    }

    async fn collect(&self, filter: SaleFilter, limit: usize) -> SaleResult<Vec<SaleRecord>> {
        let rows = self
            .db
            .read(|snapshot| {
                let mut rows: Vec<SaleRecord> = filter_sales(&snapshot.sales, &filter).cloned().collect();
                rows.sort_by(newest_first);
                rows.truncate(limit);
                rows
            })
            .await?;
        debug!("Sales query returned {} rows", rows.len());
        Ok(rows)
    }

    pub async fn summary(&self, employee_id: i64, range: DateRange) -> SaleResult<SalesSummary> {
        let filter = SaleFilter {
            employee_id: Some(employee_id),
            range,
            ..Default::default()
        };
        let (total_quantity, total_weight) = self
            .db
            .read(|snapshot| totals(filter_sales(&snapshot.sales, &filter)))
            .await?;
        Ok(SalesSummary {
            employee_id,
            total_quantity,
            total_weight,
        })
    }

    pub async fn rollup(&self, key: GroupKey, range: DateRange) -> SaleResult<Vec<GroupTotals>> {
        let filter = SaleFilter::within(range);
        let groups = self
            .db
            .read(|snapshot| rollup(filter_sales(&snapshot.sales, &filter), key))
            .await?;
        debug!("Rollup by {:?} produced {} groups", key, groups.len());
        Ok(groups)
    }

    pub async fn highlights(&self) -> SaleResult<Highlights> {
        self.highlights_on(CalendarDate::today()).await
    }

    pub async fn highlights_on(&self, today: CalendarDate) -> SaleResult<Highlights> {
        let (week_from, week_to) = week_bounds(today);
        let (month_from, month_to) = month_bounds(today);
        let week = SaleFilter::within(DateRange::between(week_from, week_to));
        let month = SaleFilter::within(DateRange::between(month_from, month_to));

        let highlights = self
            .db
            .read(|snapshot| {
                let sales = &snapshot.sales;
                Highlights {
                    today,
                    week_from,
                    week_to,
                    month_from,
                    month_to,
                    top_employee_this_week: top_group(filter_sales(sales, &week), GroupKey::Employee),
                    top_employee_this_month: top_group(filter_sales(sales, &month), GroupKey::Employee),
                    top_mart_this_week: top_group(filter_sales(sales, &week), GroupKey::Location),
                    top_mart_this_month: top_group(filter_sales(sales, &month), GroupKey::Location),
                }
            })
            .await?;
        Ok(highlights)
    }
}
