//! Handlers for the shortening resource.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::info;
use validator::Validate;

use crate::api::dto::shortening::{
    CreateShorteningRequest, ListShorteningsQuery, MessageResponse, ShorteningEnvelope,
    ShorteningListResponse, ShorteningResponse, UpdateShorteningRequest,
};
use crate::application::services::LinkService;
use crate::domain::entities::{Link, Principal, SHORTENINGS_READ, SHORTENINGS_WRITE};
use crate::error::AppError;
use crate::state::AppState;

fn to_response(service: &LinkService, link: Link) -> Result<ShorteningResponse, AppError> {
    let short_url = service.short_url(&link.identifier)?;
    Ok(ShorteningResponse::from_link(link, short_url))
}

/// Lists shortenings with filtering, sorting and pagination.
///
/// # Endpoint
///
/// `GET /v1/shortenings?original_url=&sort=-visits&page=1&page_size=20`
///
/// Requires `shortenings:read`.
pub async fn list_shortenings_handler(
    State(state): State<AppState>,
    principal: Principal,
    query: Result<Query<ListShorteningsQuery>, QueryRejection>,
) -> Result<Json<ShorteningListResponse>, AppError> {
    state
        .auth_service
        .authorize(&principal, SHORTENINGS_READ)
        .await?;

    let Query(query) = query?;
    let (links, metadata) = state.link_service.list(query.into_filter()?).await?;

    let shortenings = links
        .into_iter()
        .map(|link| to_response(&state.link_service, link))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ShorteningListResponse {
        shortenings,
        metadata,
    }))
}

/// Creates a shortening owned by the caller.
///
/// # Endpoint
///
/// `POST /v1/shortenings`
///
/// Requires `shortenings:write`. Responds `201 Created` with a `Location`
/// header pointing at the new resource.
///
/// # Errors
///
/// - `422` for an invalid URL or identifier
/// - `409 identifier_collision` if a caller-chosen identifier is taken, or
///   every generated one collided
pub async fn create_shortening_handler(
    State(state): State<AppState>,
    principal: Principal,
    payload: Result<Json<CreateShorteningRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    state
        .auth_service
        .authorize(&principal, SHORTENINGS_WRITE)
        .await?;

    let Json(payload) = payload?;
    payload.validate()?;

    let link = state
        .link_service
        .create(
            &payload.original_url,
            payload.identifier,
            principal.user_id(),
        )
        .await?;

    info!(identifier = %link.identifier, user_id = ?principal.user_id(), "Shortening created");

    let location = format!("/v1/shortenings/{}", link.identifier);
    let shortening = to_response(&state.link_service, link)?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ShorteningEnvelope { shortening }),
    ))
}

/// `GET /v1/shortenings/{identifier}`. Requires `shortenings:read`.
pub async fn show_shortening_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(identifier): Path<String>,
) -> Result<Json<ShorteningEnvelope>, AppError> {
    state
        .auth_service
        .authorize(&principal, SHORTENINGS_READ)
        .await?;

    let link = state.link_service.get(&identifier).await?;

    Ok(Json(ShorteningEnvelope {
        shortening: to_response(&state.link_service, link)?,
    }))
}

/// Replaces the original URL of a shortening.
///
/// # Endpoint
///
/// `PATCH /v1/shortenings/{identifier}`
///
/// Requires `shortenings:write`.
///
/// # Errors
///
/// `409 edit_conflict` when `version` is stale or another writer updated the
/// record first. Re-read before retrying.
pub async fn update_shortening_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(identifier): Path<String>,
    payload: Result<Json<UpdateShorteningRequest>, JsonRejection>,
) -> Result<Json<ShorteningEnvelope>, AppError> {
    state
        .auth_service
        .authorize(&principal, SHORTENINGS_WRITE)
        .await?;

    let Json(payload) = payload?;
    payload.validate()?;

    let link = state
        .link_service
        .update(&identifier, payload.original_url, payload.version)
        .await?;

    Ok(Json(ShorteningEnvelope {
        shortening: to_response(&state.link_service, link)?,
    }))
}

/// `DELETE /v1/shortenings/{identifier}`. Requires `shortenings:write`.
pub async fn delete_shortening_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(identifier): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .auth_service
        .authorize(&principal, SHORTENINGS_WRITE)
        .await?;

    state.link_service.delete(&identifier).await?;

    info!(%identifier, user_id = ?principal.user_id(), "Shortening deleted");

    Ok(Json(MessageResponse {
        message: "shortening successfully deleted".to_string(),
    }))
}

/// The caller's own shortenings, newest first.
///
/// # Endpoint
///
/// `GET /v1/me/shortenings`
///
/// Requires an activated account; no permission code.
pub async fn list_my_shortenings_handler(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<ShorteningListResponse>, AppError> {
    let user = state.auth_service.require_activated(&principal)?;

    let links = state.link_service.list_for_owner(user.id).await?;
    let shortenings = links
        .into_iter()
        .map(|link| to_response(&state.link_service, link))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ShorteningListResponse {
        shortenings,
        metadata: Default::default(),
    }))
}
