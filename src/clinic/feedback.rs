//! Client wrappers for the `/feedback` endpoints.

use crate::{
    api::{ApiClient, AppError, OutboundRequest},
    clinic::types::Feedback,
};
use tracing::instrument;

const FEEDBACK_PATH: &str = "/feedback";

/// # Errors
/// Returns `AppError` on transport failure or a non-2xx response.
#[instrument(skip_all)]
pub async fn create_feedback(api: &ApiClient, feedback: &Feedback) -> Result<Feedback, AppError> {
    api.json(&OutboundRequest::post(FEEDBACK_PATH).json(feedback)?)
        .await
}

/// Lists feedback from every owner. Staff only on the server side.
///
/// # Errors
/// Returns `AppError` on transport failure or a non-2xx response.
pub async fn list_feedback(api: &ApiClient) -> Result<Vec<Feedback>, AppError> {
    api.json(&OutboundRequest::get(FEEDBACK_PATH)).await
}

/// # Errors
/// Returns `AppError` on transport failure or a non-2xx response.
#[instrument(skip(api))]
pub async fn list_feedback_for_user(api: &ApiClient, user_id: i64) -> Result<Vec<Feedback>, AppError> {
    api.json(&OutboundRequest::get(format!("{FEEDBACK_PATH}/{user_id}")))
        .await
}
