use crate::{
    cli::actions::{print_json, AppointmentDetails, AppointmentsAction, Context},
    clinic::{appointments, NewAppointment, PetRef, UserRef},
    forms::AppointmentForm,
    session::Access,
};
use anyhow::Result;

fn appointment_for(details: &AppointmentDetails, user_id: i64) -> Result<NewAppointment> {
    AppointmentForm {
        pet_id: Some(details.pet_id),
        appointment_date: &details.date,
        reason: &details.reason,
    }
    .validate()?;

    Ok(NewAppointment::pending(
        details.date.trim().to_string(),
        details.reason.trim().to_string(),
        PetRef {
            pet_id: details.pet_id,
        },
        UserRef { user_id },
    ))
}

/// # Errors
/// Returns an error if an access guard denies the action, the form is invalid
/// or the API call fails.
pub async fn handle(context: &Context, action: AppointmentsAction) -> Result<()> {
    match action {
        AppointmentsAction::List { mine, statuses } => {
            let all = if mine {
                let identity = context.require(Access::Authenticated)?;
                appointments::list_appointments_for_user(context.api(), identity.user_id).await?
            } else {
                context.require(Access::Admin)?;
                appointments::list_appointments(context.api()).await?
            };
            print_json(&appointments::filter_by_status(all, &statuses))
        }
        AppointmentsAction::Show { appointment_id } => {
            context.require(Access::Authenticated)?;
            print_json(&appointments::get_appointment(context.api(), appointment_id).await?)
        }
        AppointmentsAction::Pet { appointment_id } => {
            context.require(Access::Authenticated)?;
            print_json(&appointments::pet_for_appointment(context.api(), appointment_id).await?)
        }
        AppointmentsAction::Request(details) => {
            let identity = context.require(Access::Authenticated)?;
            let appointment = appointment_for(&details, identity.user_id)?;
            print_json(&appointments::add_appointment(context.api(), &appointment).await?)
        }
        AppointmentsAction::Update {
            appointment_id,
            details,
        } => {
            let identity = context.require(Access::Authenticated)?;
            let appointment = appointment_for(&details, identity.user_id)?;
            print_json(
                &appointments::update_appointment(context.api(), appointment_id, &appointment)
                    .await?,
            )
        }
        AppointmentsAction::Delete { appointment_id } => {
            context.require(Access::Authenticated)?;
            appointments::delete_appointment(context.api(), appointment_id).await?;
            println!("Appointment {appointment_id} deleted");
            Ok(())
        }
        AppointmentsAction::SetStatus {
            appointment_id,
            status,
        } => {
            context.require(Access::Admin)?;
            appointments::update_appointment_status(context.api(), appointment_id, &status)
                .await?;
            println!("Appointment {appointment_id} is now {status}");
            Ok(())
        }
    }
}
