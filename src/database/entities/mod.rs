pub mod cities;
pub mod journey_plans;
pub mod locations;
pub mod products;
pub mod sales;
pub mod users;

pub use cities::Model as City;
pub use journey_plans::Model as JourneyPlan;
pub use locations::Model as Location;
pub use products::Model as Product;
pub use sales::Model as SaleRecord;
pub use users::{Model as User, Role};
