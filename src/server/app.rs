use anyhow::{Context, Result};
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use super::handlers::{admin, health, journey_plans, sales};
use crate::config::LimitsConfig;
use crate::database::Database;
use crate::services::{JourneyPlanService, SalesService, UserService};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub plans: JourneyPlanService,
    pub sales: SalesService,
    pub users: UserService,
}

impl AppState {
    pub fn new(db: Database, limits: LimitsConfig) -> Self {
        Self {
            plans: JourneyPlanService::new(db.clone(), limits),
            sales: SalesService::new(db.clone(), limits),
            users: UserService::new(db.clone()),
            db,
        }
    }
}

pub fn create_app(state: AppState, cors_origin: Option<&str>) -> Result<Router> {
    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin: {}", origin))?,
            )
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_v1_routes())
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        // Journey plans
        .route(
            "/journey-plans",
            get(journey_plans::list_plans).post(journey_plans::upsert_plan),
        )
        .route("/journey-plans/my", get(journey_plans::my_plans))
        .route("/journey-plans/my/active", get(journey_plans::my_active_plan))
        .route(
            "/journey-plans/:id",
            get(journey_plans::get_plan).delete(journey_plans::delete_plan),
        )
        // Sales
        .route("/sales", get(sales::list_sales).post(sales::create_sale))
        .route("/sales/my", get(sales::my_sales))
        .route("/sales/my/summary", get(sales::my_summary))
        .route("/sales/summary/employees", get(sales::employee_summary))
        .route("/sales/summary/locations", get(sales::location_summary))
        .route("/sales/highlights", get(sales::highlights))
        // Administration
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/:id/approve", post(admin::approve_user))
        .route("/admin/stats", get(admin::stats))
}
