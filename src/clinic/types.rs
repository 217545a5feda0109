//! Payloads for the pet, appointment and feedback endpoints. The API nests
//! whole user and pet records; only the identifiers are kept from the user side.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub user_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetRef {
    pub pet_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRef {
    pub appointment_id: i64,
}

pub const DEFAULT_PET_STATUS: &str = "healthy";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_id: Option<i64>,
    pub name: String,
    pub species: String,
    pub breed: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRef>,
}

impl Default for Pet {
    fn default() -> Self {
        Self {
            pet_id: None,
            name: String::new(),
            species: String::new(),
            breed: String::new(),
            date_of_birth: None,
            status: DEFAULT_PET_STATUS.to_string(),
            user: None,
        }
    }
}

/// Appointment lifecycle as the API spells it. Unknown values are kept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Closed,
    Other(String),
}

impl AppointmentStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Closed => "CLOSED",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for AppointmentStatus {
    fn from(value: String) -> Self {
        match value.trim().to_uppercase().as_str() {
            "PENDING" => Self::Pending,
            "APPROVED" => Self::Approved,
            "REJECTED" => Self::Rejected,
            "CLOSED" => Self::Closed,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for AppointmentStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Appointment {
    pub appointment_id: Option<i64>,
    pub appointment_date: Option<String>,
    pub reason: String,
    pub status: AppointmentStatus,
    pub pet: Option<Pet>,
    pub user: Option<UserRef>,
}

/// Body for requesting or editing an appointment. Edits reset the status to
/// `PENDING`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub appointment_date: String,
    pub reason: String,
    pub pet: PetRef,
    pub user: UserRef,
    pub status: AppointmentStatus,
}

impl NewAppointment {
    #[must_use]
    pub fn pending(appointment_date: String, reason: String, pet: PetRef, user: UserRef) -> Self {
        Self {
            appointment_date,
            reason,
            pet,
            user,
            status: AppointmentStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Feedback {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_id: Option<i64>,
    pub message: String,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment: Option<AppointmentRef>,
}
