// API layer - HTTP endpoints
pub mod admin;
pub mod health;
pub mod helpers;
pub mod loans;
pub mod users;

use std::sync::Arc;

pub use admin::AdminApi;
pub use health::HealthApi;
pub use loans::LoansApi;
pub use users::UsersApi;

use poem::Route;
use poem_openapi::auth::Bearer;
use poem_openapi::{OpenApiService, SecurityScheme};

use crate::app_data::AppData;

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(Bearer);

pub type ApiService = OpenApiService<(HealthApi, UsersApi, LoansApi, AdminApi), ()>;

/// OpenAPI service holding every endpoint; `server_url` is advertised in the schema
pub fn api_service(app_data: Arc<AppData>, server_url: &str) -> ApiService {
    OpenApiService::new(
        (
            HealthApi,
            UsersApi::new(app_data.clone()),
            LoansApi::new(app_data.clone()),
            AdminApi::new(app_data),
        ),
        "Loan Tracker API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(server_url)
}

/// API nested under /api and Swagger UI under /swagger
pub fn routes(app_data: Arc<AppData>, public_base_url: &str) -> Route {
    let api_service = api_service(app_data, &format!("{}/api", public_base_url));
    let ui = api_service.swagger_ui();

    Route::new().nest("/api", api_service).nest("/swagger", ui)
}
