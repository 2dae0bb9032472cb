use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::entities::{City, JourneyPlan, Location, Product, SaleRecord, User};
use crate::errors::StoreResult;

/// Whole-collection persistence. Implementations only read and replace the
/// full snapshot; atomicity of read-modify-write sequences is provided by
/// [`Database`](super::Database).
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn read_all(&self) -> StoreResult<Snapshot>;

    async fn write_all(&self, snapshot: &Snapshot) -> StoreResult<()>;
}

/// Every collection the service persists.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub cities: Vec<City>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub journey_plans: Vec<JourneyPlan>,
    #[serde(default)]
    pub sales: Vec<SaleRecord>,
    #[serde(default)]
    pub sequences: Sequences,
}

/// High-water marks for store-assigned ids. Ids are never handed out twice,
/// even after the record holding them is deleted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sequences {
    #[serde(default)]
    pub journey_plans: i64,
    #[serde(default)]
    pub sales: i64,
}

fn allocate(counter: &mut i64, max_existing: i64) -> i64 {
    let id = (*counter).max(max_existing) + 1;
    *counter = id;
    id
}

impl Snapshot {
    pub fn user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_mut(&mut self, id: i64) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        let id = id.trim();
        self.products.iter().find(|p| p.id.trim() == id)
    }

    pub fn location(&self, id: i64) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn plan(&self, id: i64) -> Option<&JourneyPlan> {
        self.journey_plans.iter().find(|p| p.id == id)
    }

    pub fn plan_for_supervisor_mut(&mut self, supervisor_id: i64) -> Option<&mut JourneyPlan> {
        self.journey_plans
            .iter_mut()
            .find(|p| p.is_owned_by(supervisor_id))
    }

    pub fn next_plan_id(&mut self) -> i64 {
        let max = self.journey_plans.iter().map(|p| p.id).max().unwrap_or(0);
        allocate(&mut self.sequences.journey_plans, max)
    }

    pub fn next_sale_id(&mut self) -> i64 {
        let max = self.sales.iter().map(|s| s.id).max().unwrap_or(0);
        allocate(&mut self.sequences.sales, max)
    }
}
