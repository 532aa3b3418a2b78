//! Customer endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    error::AppResult,
    models::customer::{AccrualQuery, CreateCustomer, Customer, CustomerDetails, UpdateCustomer},
};

use super::{AppJson, AuthenticatedUser};

/// List customers with age and billing state
#[utoipa::path(
    get,
    path = "/customers",
    tag = "customers",
    security(("bearer_auth" = [])),
    params(AccrualQuery),
    responses(
        (status = 200, description = "List of customers", body = Vec<CustomerDetails>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_customers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<AccrualQuery>,
) -> AppResult<Json<Vec<CustomerDetails>>> {
    let as_of = query.as_of.unwrap_or_else(Utc::now);
    let customers = state.services.customers.list(as_of).await?;
    Ok(Json(customers))
}

/// Customers who attended 7 or more classes since their last payment
#[utoipa::path(
    get,
    path = "/customers/overdue",
    tag = "customers",
    security(("bearer_auth" = [])),
    params(AccrualQuery),
    responses(
        (status = 200, description = "Overdue customers", body = Vec<CustomerDetails>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_overdue(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<AccrualQuery>,
) -> AppResult<Json<Vec<CustomerDetails>>> {
    let as_of = query.as_of.unwrap_or_else(Utc::now);
    let customers = state.services.customers.overdue(as_of).await?;
    Ok(Json(customers))
}

/// Get customer details by ID
#[utoipa::path(
    get,
    path = "/customers/{id}",
    tag = "customers",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Customer ID"),
        AccrualQuery
    ),
    responses(
        (status = 200, description = "Customer details", body = CustomerDetails),
        (status = 404, description = "Customer not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_customer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Query(query): Query<AccrualQuery>,
) -> AppResult<Json<CustomerDetails>> {
    let as_of = query.as_of.unwrap_or_else(Utc::now);
    let customer = state.services.customers.get(id, as_of).await?;
    Ok(Json(customer))
}

/// Create a customer
#[utoipa::path(
    post,
    path = "/customers",
    tag = "customers",
    security(("bearer_auth" = [])),
    request_body = CreateCustomer,
    responses(
        (status = 201, description = "Customer created", body = Customer),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_customer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    AppJson(data): AppJson<CreateCustomer>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let customer = state.services.customers.create(data).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Update a customer; omitted fields are kept
#[utoipa::path(
    put,
    path = "/customers/{id}",
    tag = "customers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Customer ID")),
    request_body = UpdateCustomer,
    responses(
        (status = 200, description = "Customer updated", body = Customer),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Customer not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_customer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    AppJson(data): AppJson<UpdateCustomer>,
) -> AppResult<Json<Customer>> {
    let customer = state.services.customers.update(id, data).await?;
    Ok(Json(customer))
}

/// Record a payment: the attendance count restarts from now
#[utoipa::path(
    patch,
    path = "/customers/{id}",
    tag = "customers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Payment recorded", body = CustomerDetails),
        (status = 404, description = "Customer not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn record_payment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<CustomerDetails>> {
    let customer = state.services.customers.record_payment(id).await?;
    Ok(Json(customer))
}

/// Delete a customer and their attendance history
#[utoipa::path(
    delete,
    path = "/customers/{id}",
    tag = "customers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Customer ID")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 404, description = "Customer not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_customer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.customers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
