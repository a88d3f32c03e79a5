use std::sync::Arc;

use axum::{
    extract::Query,
    http::StatusCode,
    response::Json,
    Extension,
};
use serde_json::Value;
use tracing::info;

use crate::api::rest::dto::{
    CardBody, CardIdPath, DeletedDto, InsertedDto, MessageDto, ModifiedDto, WelcomeDto,
};
use crate::api::rest::error::ApiError;
use crate::domain::service::CardService;

/// Capability listing
pub async fn welcome() -> Json<WelcomeDto> {
    Json(WelcomeDto::default())
}

pub async fn list_cards(
    Extension(svc): Extension<Arc<CardService>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    info!("Listing cards");
    let cards = svc.list_cards().await?;
    Ok(Json(cards))
}

pub async fn get_card(
    Extension(svc): Extension<Arc<CardService>>,
    CardIdPath(id): CardIdPath,
) -> Result<Json<Value>, ApiError> {
    info!("Getting card with id: {}", id);
    let card = svc.get_card(&id).await?;
    Ok(Json(card))
}

/// Exact-match search over query parameters
pub async fn search_cards(
    Extension(svc): Extension<Arc<CardService>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    info!("Searching cards with params: {:?}", params);
    let cards = svc.search_cards(&params).await?;
    Ok(Json(cards))
}

pub async fn create_card(
    Extension(svc): Extension<Arc<CardService>>,
    CardBody(body): CardBody,
) -> Result<(StatusCode, Json<InsertedDto>), ApiError> {
    info!("Creating card");
    let inserted_id = svc.create_card(body).await?;
    Ok((StatusCode::CREATED, Json(InsertedDto { inserted_id })))
}

/// Full replace, keeping the id
pub async fn replace_card(
    Extension(svc): Extension<Arc<CardService>>,
    CardIdPath(id): CardIdPath,
    CardBody(body): CardBody,
) -> Result<Json<ModifiedDto>, ApiError> {
    info!("Replacing card with id: {}", id);
    let modified_count = svc.replace_card(&id, body).await?;
    Ok(Json(ModifiedDto { modified_count }))
}

/// Partial update of top-level fields
pub async fn update_card(
    Extension(svc): Extension<Arc<CardService>>,
    CardIdPath(id): CardIdPath,
    CardBody(body): CardBody,
) -> Result<Json<ModifiedDto>, ApiError> {
    info!("Updating card with id: {}", id);
    let modified_count = svc.update_card(&id, body).await?;
    Ok(Json(ModifiedDto { modified_count }))
}

pub async fn delete_card(
    Extension(svc): Extension<Arc<CardService>>,
    CardIdPath(id): CardIdPath,
) -> Result<Json<DeletedDto>, ApiError> {
    info!("Deleting card with id: {}", id);
    let deleted_count = svc.delete_card(&id).await?;
    Ok(Json(DeletedDto { deleted_count }))
}

pub async fn delete_all_cards(
    Extension(svc): Extension<Arc<CardService>>,
) -> Result<Json<MessageDto>, ApiError> {
    info!("Deleting all cards");
    let deleted = svc.delete_all_cards().await?;
    Ok(Json(MessageDto {
        message: format!("All cards deleted ({deleted})"),
    }))
}
