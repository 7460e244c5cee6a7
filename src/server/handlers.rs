use super::AppContext;
use super::error::ApiError;
use crate::api::models::{Contact, CreateContactRequest, DeleteContactResponse, MessageResponse};
use crate::validation::validate_create;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

pub const LIVENESS_MESSAGE: &str = "Contact Management API is running";
pub const INVALID_ID_MESSAGE: &str = "Invalid contact ID format";
pub const NOT_FOUND_MESSAGE: &str = "Contact not found";
pub const DELETED_MESSAGE: &str = "Contact deleted successfully";

pub async fn liveness() -> Json<MessageResponse> {
    Json(MessageResponse::new(LIVENESS_MESSAGE))
}

pub async fn list_contacts(State(ctx): State<AppContext>) -> Result<Json<Vec<Contact>>, ApiError> {
    let contacts = ctx.store.list_all().await?;
    Ok(Json(contacts))
}

/// Store failures on this path are reported as 400 with the store's message,
/// the same status class as validation failures.
pub async fn create_contact(
    State(ctx): State<AppContext>,
    payload: Result<Json<CreateContactRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    let Json(req) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let contact = validate_create(req)?;
    let saved = ctx
        .store
        .insert(contact)
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    log::info!("created contact {}", saved.id);
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn delete_contact(
    State(ctx): State<AppContext>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteContactResponse>, ApiError> {
    log::debug!("delete request for id {raw_id}");
    let id = Uuid::parse_str(&raw_id).map_err(|_| ApiError::BadRequest(INVALID_ID_MESSAGE.into()))?;
    let Some(contact) = ctx.store.delete_by_id(id).await? else {
        return Err(ApiError::NotFound(NOT_FOUND_MESSAGE.into()));
    };
    log::info!("deleted contact {}", contact.id);
    Ok(Json(DeleteContactResponse {
        message: DELETED_MESSAGE.into(),
        contact,
    }))
}
