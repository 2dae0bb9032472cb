//! Grouped sums over sale records.
//!
//! Rollups only ever read the snapshot fields frozen on each [`SaleRecord`];
//! nothing here looks at live product or location data.

use indexmap::IndexMap;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::database::entities::SaleRecord;
use crate::dates::DateRange;

/// Dimension a rollup groups by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Employee,
    Location,
}

impl GroupKey {
    fn of(self, sale: &SaleRecord) -> (i64, &str) {
        match self {
            GroupKey::Employee => (sale.employee_id, sale.employee_name.as_str()),
            GroupKey::Location => (sale.location_id, sale.location_name.as_str()),
        }
    }
}

/// Per-group totals.
///
/// Serializes as `{employeeId, employeeName, ...}` or
/// `{locationId, locationName, ...}` depending on the grouping.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupTotals {
    pub group: GroupKey,
    pub id: i64,
    pub name: String,
    pub total_quantity: f64,
    pub total_weight: f64,
}

impl Serialize for GroupTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (id_field, name_field) = match self.group {
            GroupKey::Employee => ("employeeId", "employeeName"),
            GroupKey::Location => ("locationId", "locationName"),
        };
        let mut state = serializer.serialize_struct("GroupTotals", 4)?;
        state.serialize_field(id_field, &self.id)?;
        state.serialize_field(name_field, &self.name)?;
        state.serialize_field("totalQuantity", &self.total_quantity)?;
        state.serialize_field("totalWeight", &self.total_weight)?;
        state.end()
    }
}

/// Equality filters plus an inclusive `saleDate` range. `None` matches
/// everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SaleFilter {
    pub employee_id: Option<i64>,
    pub location_id: Option<i64>,
    pub product_id: Option<String>,
    pub range: DateRange,
}

impl SaleFilter {
    pub fn within(range: DateRange) -> Self {
        Self {
            range,
            ..Default::default()
        }
    }

    pub fn matches(&self, sale: &SaleRecord) -> bool {
        self.employee_id.map_or(true, |id| sale.employee_id == id)
            && self.location_id.map_or(true, |id| sale.location_id == id)
            && self
                .product_id
                .as_deref()
                .map_or(true, |id| sale.product_id.trim() == id.trim())
            && self.range.contains(sale.sale_date)
    }
}

pub fn filter_sales<'a>(
    sales: &'a [SaleRecord],
    filter: &'a SaleFilter,
) -> impl Iterator<Item = &'a SaleRecord> + 'a {
    sales.iter().filter(move |sale| filter.matches(sale))
}

/// Group `sales` by `key`, ordered by total weight descending. Groups with
/// equal weight keep the order in which they were first seen.
pub fn rollup<'a>(sales: impl IntoIterator<Item = &'a SaleRecord>, key: GroupKey) -> Vec<GroupTotals> {
    let mut groups: IndexMap<i64, GroupTotals> = IndexMap::new();
    for sale in sales {
        let (id, name) = key.of(sale);
        let entry = groups.entry(id).or_insert_with(|| GroupTotals {
            group: key,
            id,
            name: name.to_string(),
            total_quantity: 0.0,
            total_weight: 0.0,
        });
        entry.total_quantity += sale.quantity;
        entry.total_weight += sale.total_weight;
    }

    let mut totals: Vec<GroupTotals> = groups.into_values().collect();
    // stable: equal weights stay in first-encounter order
    totals.sort_by(|a, b| b.total_weight.total_cmp(&a.total_weight));
    totals
}

/// Heaviest group, if any sale matched.
pub fn top_group<'a>(sales: impl IntoIterator<Item = &'a SaleRecord>, key: GroupKey) -> Option<GroupTotals> {
    rollup(sales, key).into_iter().next()
}

/// `(total quantity, total weight)` across `sales`.
pub fn totals<'a>(sales: impl IntoIterator<Item = &'a SaleRecord>) -> (f64, f64) {
    sales.into_iter().fold((0.0, 0.0), |(quantity, weight), sale| {
        (quantity + sale.quantity, weight + sale.total_weight)
    })
}
