//! Feature clients for the clinic resources. These go through the shared
//! [`ApiClient`](crate::api::ApiClient) and never handle tokens directly.

pub mod appointments;
pub mod feedback;
pub mod pets;
pub mod types;

pub use types::{
    Appointment, AppointmentRef, AppointmentStatus, Feedback, NewAppointment, Pet, PetRef, UserRef,
};
