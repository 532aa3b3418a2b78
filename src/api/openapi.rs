//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{attendances, auth, customers, groups, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Studio API",
        version = "1.0.0",
        description = "Art studio customers, class groups and attendance"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::logout,
        auth::me,
        // Customers
        customers::list_customers,
        customers::list_overdue,
        customers::get_customer,
        customers::create_customer,
        customers::update_customer,
        customers::record_payment,
        customers::delete_customer,
        // Groups
        groups::list_groups,
        groups::get_group,
        groups::create_group,
        groups::update_group,
        groups::delete_group,
        // Attendance
        attendances::list_attendances,
        attendances::save_attendances,
        attendances::get_attendance,
        attendances::update_attendance,
        attendances::delete_attendance,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::LoginRequest,
            crate::models::user::LoginResponse,
            crate::models::user::UserClaims,
            // Customers
            crate::models::customer::Customer,
            crate::models::customer::CustomerShort,
            crate::models::customer::CustomerDetails,
            crate::models::customer::CreateCustomer,
            crate::models::customer::UpdateCustomer,
            // Groups
            crate::models::group::Group,
            crate::models::group::GroupShort,
            crate::models::group::GroupDetails,
            crate::models::group::CreateGroup,
            crate::models::group::UpdateGroup,
            crate::models::enums::Weekday,
            // Attendance
            crate::models::attendance::Attendance,
            crate::models::attendance::AttendanceDetails,
            crate::models::attendance::SavedAttendance,
            crate::models::attendance::AttendanceInput,
            crate::models::attendance::UpdateAttendance,
            crate::models::attendance::BatchFailure,
            crate::models::attendance::BatchAttendanceResponse,
            crate::models::enums::AttendanceStatus,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "customers", description = "Customer records and billing state"),
        (name = "groups", description = "Class groups"),
        (name = "attendances", description = "Attendance tracking")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
