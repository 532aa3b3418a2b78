//! Class group endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::group::{CreateGroup, Group, GroupDetails, UpdateGroup},
};

use super::{AppJson, AuthenticatedUser};

/// List groups with their members
#[utoipa::path(
    get,
    path = "/groups",
    tag = "groups",
    responses(
        (status = 200, description = "List of groups", body = Vec<GroupDetails>)
    )
)]
pub async fn list_groups(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<GroupDetails>>> {
    let groups = state.services.groups.list().await?;
    Ok(Json(groups))
}

/// Get a group with its members
#[utoipa::path(
    get,
    path = "/groups/{id}",
    tag = "groups",
    params(("id" = i32, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group details", body = GroupDetails),
        (status = 404, description = "Group not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_group(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<GroupDetails>> {
    let group = state.services.groups.get(id).await?;
    Ok(Json(group))
}

/// Create a group
#[utoipa::path(
    post,
    path = "/groups",
    tag = "groups",
    security(("bearer_auth" = [])),
    request_body = CreateGroup,
    responses(
        (status = 201, description = "Group created", body = Group),
        (status = 400, description = "Invalid schedule or input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_group(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    AppJson(data): AppJson<CreateGroup>,
) -> AppResult<(StatusCode, Json<Group>)> {
    let group = state.services.groups.create(data).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// Update a group; omitted fields are kept
#[utoipa::path(
    put,
    path = "/groups/{id}",
    tag = "groups",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Group ID")),
    request_body = UpdateGroup,
    responses(
        (status = 200, description = "Group updated", body = Group),
        (status = 400, description = "Invalid schedule or input", body = crate::error::ErrorResponse),
        (status = 404, description = "Group not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_group(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    AppJson(data): AppJson<UpdateGroup>,
) -> AppResult<Json<Group>> {
    let group = state.services.groups.update(id, data).await?;
    Ok(Json(group))
}

/// Delete a group that no customer or attendance record refers to
#[utoipa::path(
    delete,
    path = "/groups/{id}",
    tag = "groups",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Group ID")),
    responses(
        (status = 204, description = "Group deleted"),
        (status = 404, description = "Group not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Group is still in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_group(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.groups.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
