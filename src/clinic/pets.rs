//! Client wrappers for the `/pet` endpoints.

use crate::{
    api::{ApiClient, AppError, OutboundRequest},
    clinic::types::Pet,
};
use tracing::instrument;

const PETS_PATH: &str = "/pet";

/// Registers a new pet for its owner.
///
/// # Errors
/// Returns `AppError` on transport failure or a non-2xx response.
#[instrument(skip_all)]
pub async fn add_pet(api: &ApiClient, pet: &Pet) -> Result<Pet, AppError> {
    api.json(&OutboundRequest::post(PETS_PATH).json(pet)?).await
}

/// Lists every pet known to the clinic.
///
/// # Errors
/// Returns `AppError` on transport failure or a non-2xx response.
pub async fn list_pets(api: &ApiClient) -> Result<Vec<Pet>, AppError> {
    api.json(&OutboundRequest::get(PETS_PATH)).await
}

/// Lists the pets owned by one user.
///
/// # Errors
/// Returns `AppError` on transport failure or a non-2xx response.
#[instrument(skip(api))]
pub async fn list_pets_for_user(api: &ApiClient, user_id: i64) -> Result<Vec<Pet>, AppError> {
    api.json(&OutboundRequest::get(format!("{PETS_PATH}/user/{user_id}")))
        .await
}

/// # Errors
/// Returns `AppError` on transport failure or a non-2xx response.
pub async fn get_pet(api: &ApiClient, pet_id: i64) -> Result<Pet, AppError> {
    api.json(&OutboundRequest::get(format!("{PETS_PATH}/{pet_id}")))
        .await
}

/// # Errors
/// Returns `AppError` on transport failure or a non-2xx response.
#[instrument(skip(api, pet))]
pub async fn update_pet(api: &ApiClient, pet_id: i64, pet: &Pet) -> Result<Pet, AppError> {
    api.json(&OutboundRequest::put(format!("{PETS_PATH}/{pet_id}")).json(pet)?)
        .await
}

/// # Errors
/// Returns `AppError` on transport failure or a non-2xx response.
#[instrument(skip(api))]
pub async fn delete_pet(api: &ApiClient, pet_id: i64) -> Result<(), AppError> {
    api.empty(&OutboundRequest::delete(format!("{PETS_PATH}/{pet_id}")))
        .await
}
