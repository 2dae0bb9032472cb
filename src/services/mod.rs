pub mod aggregation;
pub mod authorization;
pub mod journey_plan_service;
pub mod sales_service;
pub mod user_service;

pub use aggregation::{GroupKey, GroupTotals, SaleFilter};
pub use authorization::Identity;
pub use journey_plan_service::*;
pub use sales_service::*;
pub use user_service::*;
