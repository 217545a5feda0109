//! Client wrappers for the `/appointments` endpoints and the status filter used
//! by appointment listings.

use crate::{
    api::{ApiClient, AppError, OutboundRequest},
    clinic::types::{Appointment, AppointmentStatus, NewAppointment, Pet},
};
use tracing::{info, instrument};

const APPOINTMENTS_PATH: &str = "/appointments";

/// # Errors
/// Returns `AppError` on transport failure or a non-2xx response.
pub async fn list_appointments(api: &ApiClient) -> Result<Vec<Appointment>, AppError> {
    api.json(&OutboundRequest::get(APPOINTMENTS_PATH)).await
}

/// # Errors
/// Returns `AppError` on transport failure or a non-2xx response.
pub async fn get_appointment(api: &ApiClient, appointment_id: i64) -> Result<Appointment, AppError> {
    api.json(&OutboundRequest::get(format!(
        "{APPOINTMENTS_PATH}/{appointment_id}"
    )))
    .await
}

/// # Errors
/// Returns `AppError` on transport failure or a non-2xx response.
#[instrument(skip(api))]
pub async fn list_appointments_for_user(
    api: &ApiClient,
    user_id: i64,
) -> Result<Vec<Appointment>, AppError> {
    api.json(&OutboundRequest::get(format!(
        "{APPOINTMENTS_PATH}/user/{user_id}"
    )))
    .await
}

/// Requests a new appointment; the server starts it as `PENDING`.
///
/// # Errors
/// Returns `AppError` on transport failure or a non-2xx response.
#[instrument(skip_all)]
pub async fn add_appointment(
    api: &ApiClient,
    appointment: &NewAppointment,
) -> Result<Appointment, AppError> {
    api.json(&OutboundRequest::post(APPOINTMENTS_PATH).json(appointment)?)
        .await
}

/// # Errors
/// Returns `AppError` on transport failure or a non-2xx response.
#[instrument(skip(api, appointment))]
pub async fn update_appointment(
    api: &ApiClient,
    appointment_id: i64,
    appointment: &NewAppointment,
) -> Result<Appointment, AppError> {
    api.json(
        &OutboundRequest::put(format!("{APPOINTMENTS_PATH}/{appointment_id}")).json(appointment)?,
    )
    .await
}

/// Moves an appointment to a new status. The body is the bare status as
/// `text/plain`, without JSON quoting.
///
/// # Errors
/// Returns `AppError` on transport failure or a non-2xx response.
#[instrument(skip(api))]
pub async fn update_appointment_status(
    api: &ApiClient,
    appointment_id: i64,
    status: &AppointmentStatus,
) -> Result<(), AppError> {
    let request = OutboundRequest::put(format!("{APPOINTMENTS_PATH}/{appointment_id}/status"))
        .text(status.as_str());
    api.empty(&request).await?;

    info!("Appointment {appointment_id} status updated to {status}");

    Ok(())
}

/// # Errors
/// Returns `AppError` on transport failure or a non-2xx response.
pub async fn pet_for_appointment(api: &ApiClient, appointment_id: i64) -> Result<Pet, AppError> {
    api.json(&OutboundRequest::get(format!(
        "{APPOINTMENTS_PATH}/{appointment_id}/pet"
    )))
    .await
}

/// # Errors
/// Returns `AppError` on transport failure or a non-2xx response.
#[instrument(skip(api))]
pub async fn delete_appointment(api: &ApiClient, appointment_id: i64) -> Result<(), AppError> {
    api.empty(&OutboundRequest::delete(format!(
        "{APPOINTMENTS_PATH}/{appointment_id}"
    )))
    .await
}

/// Keeps appointments whose status is in `statuses`; an empty set keeps all.
#[must_use]
pub fn filter_by_status(
    appointments: Vec<Appointment>,
    statuses: &[AppointmentStatus],
) -> Vec<Appointment> {
    if statuses.is_empty() {
        return appointments;
    }

    appointments
        .into_iter()
        .filter(|appointment| statuses.contains(&appointment.status))
        .collect()
}
