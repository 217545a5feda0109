//! Maps validated CLI matches to an [`Action`].

use crate::{
    cli::actions::{
        Action, AppointmentDetails, AppointmentsAction, FeedbackAction, PetDetails, PetsAction,
    },
    clinic::AppointmentStatus,
};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a String> {
    matches
        .get_one::<String>(name)
        .with_context(|| format!("missing required argument: --{name}"))
}

fn required_secret(matches: &ArgMatches, name: &str) -> Result<SecretString> {
    required(matches, name).map(|value| SecretString::from(value.clone()))
}

fn required_id(matches: &ArgMatches, name: &str) -> Result<i64> {
    matches
        .get_one::<i64>(name)
        .copied()
        .with_context(|| format!("missing required argument: {name}"))
}

fn pet_details(matches: &ArgMatches) -> Result<PetDetails> {
    Ok(PetDetails {
        name: required(matches, "name")?.clone(),
        species: required(matches, "species")?.clone(),
        breed: required(matches, "breed")?.clone(),
        date_of_birth: required(matches, "date-of-birth")?.clone(),
        status: required(matches, "status")?.clone(),
    })
}

fn appointment_details(matches: &ArgMatches) -> Result<AppointmentDetails> {
    Ok(AppointmentDetails {
        pet_id: required_id(matches, "pet-id")?,
        date: required(matches, "date")?.clone(),
        reason: required(matches, "reason")?.clone(),
    })
}

fn pets(matches: &ArgMatches) -> Result<PetsAction> {
    match matches.subcommand() {
        Some(("list", sub)) => Ok(PetsAction::List {
            mine: sub.get_flag("mine"),
        }),
        Some(("show", sub)) => Ok(PetsAction::Show {
            pet_id: required_id(sub, "pet-id")?,
        }),
        Some(("add", sub)) => pet_details(sub).map(PetsAction::Add),
        Some(("update", sub)) => Ok(PetsAction::Update {
            pet_id: required_id(sub, "pet-id")?,
            details: pet_details(sub)?,
        }),
        Some(("delete", sub)) => Ok(PetsAction::Delete {
            pet_id: required_id(sub, "pet-id")?,
        }),
        _ => Err(anyhow!("unknown pets command")),
    }
}

fn appointments(matches: &ArgMatches) -> Result<AppointmentsAction> {
    let set_status = |sub: &ArgMatches, status: AppointmentStatus| -> Result<AppointmentsAction> {
        Ok(AppointmentsAction::SetStatus {
            appointment_id: required_id(sub, "appointment-id")?,
            status,
        })
    };

    match matches.subcommand() {
        Some(("list", sub)) => Ok(AppointmentsAction::List {
            mine: sub.get_flag("mine"),
            statuses: sub
                .get_many::<String>("status")
                .map(|values| values.map(|value| AppointmentStatus::from(value.as_str())).collect())
                .unwrap_or_default(),
        }),
        Some(("show", sub)) => Ok(AppointmentsAction::Show {
            appointment_id: required_id(sub, "appointment-id")?,
        }),
        Some(("pet", sub)) => Ok(AppointmentsAction::Pet {
            appointment_id: required_id(sub, "appointment-id")?,
        }),
        Some(("request", sub)) => appointment_details(sub).map(AppointmentsAction::Request),
        Some(("update", sub)) => Ok(AppointmentsAction::Update {
            appointment_id: required_id(sub, "appointment-id")?,
            details: appointment_details(sub)?,
        }),
        Some(("delete", sub)) => Ok(AppointmentsAction::Delete {
            appointment_id: required_id(sub, "appointment-id")?,
        }),
        Some(("approve", sub)) => set_status(sub, AppointmentStatus::Approved),
        Some(("reject", sub)) => set_status(sub, AppointmentStatus::Rejected),
        Some(("close", sub)) => set_status(sub, AppointmentStatus::Closed),
        _ => Err(anyhow!("unknown appointments command")),
    }
}

fn feedback(matches: &ArgMatches) -> Result<FeedbackAction> {
    match matches.subcommand() {
        Some(("list", sub)) => Ok(FeedbackAction::List {
            mine: sub.get_flag("mine"),
        }),
        Some(("add", sub)) => Ok(FeedbackAction::Add {
            appointment_id: required_id(sub, "appointment-id")?,
            message: required(sub, "message")?.clone(),
            rating: sub
                .get_one::<u8>("rating")
                .copied()
                .context("missing required argument: --rating")?,
        }),
        _ => Err(anyhow!("unknown feedback command")),
    }
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or the subcommand is unknown.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some(("login", sub)) => Ok(Action::Login {
            email: required(sub, "email")?.clone(),
            password: required_secret(sub, "password")?,
        }),
        Some(("register", sub)) => Ok(Action::Register {
            username: required(sub, "username")?.clone(),
            email: required(sub, "email")?.clone(),
            password: required_secret(sub, "password")?,
            confirm_password: required_secret(sub, "confirm-password")?,
            mobile_number: required(sub, "mobile-number")?.clone(),
            role: required(sub, "role")?.clone(),
        }),
        Some(("logout", _)) => Ok(Action::Logout),
        Some(("whoami", _)) => Ok(Action::Whoami),
        Some(("pets", sub)) => pets(sub).map(Action::Pets),
        Some(("appointments", sub)) => appointments(sub).map(Action::Appointments),
        Some(("feedback", sub)) => feedback(sub).map(Action::Feedback),
        _ => Err(anyhow!("no command given, see --help")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn dispatch(args: &[&str]) -> Action {
        let mut argv = vec!["vetclinic"];
        argv.extend_from_slice(args);
        let matches = crate::cli::commands::new().get_matches_from(argv);
        handler(&matches).unwrap()
    }

    #[test]
    fn login_action() {
        temp_env::with_vars([("VETCLINIC_PASSWORD", None::<&str>)], || {
            match dispatch(&["login", "--email", "a@b.io", "--password", "Secret@1"]) {
                Action::Login { email, password } => {
                    assert_eq!(email, "a@b.io");
                    assert_eq!(password.expose_secret(), "Secret@1");
                }
                other => panic!("unexpected action: {other:?}"),
            }
        });
    }

    #[test]
    fn register_defaults_to_pet_owner() {
        temp_env::with_vars([("VETCLINIC_PASSWORD", None::<&str>)], || {
            let action = dispatch(&[
                "register",
                "--username",
                "olive",
                "--email",
                "olive@example.test",
                "--password",
                "Abcdef1!",
                "--confirm-password",
                "Abcdef1!",
                "--mobile-number",
                "5551234",
            ]);
            match action {
                Action::Register { role, .. } => assert_eq!(role, "PETOWNER"),
                other => panic!("unexpected action: {other:?}"),
            }
        });
    }

    #[test]
    fn staff_commands_map_to_status_updates() {
        match dispatch(&["appointments", "reject", "9"]) {
            Action::Appointments(action) => assert_eq!(
                action,
                AppointmentsAction::SetStatus {
                    appointment_id: 9,
                    status: AppointmentStatus::Rejected,
                }
            ),
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn appointment_list_collects_statuses() {
        match dispatch(&["appointments", "list", "--mine", "--status", "pending"]) {
            Action::Appointments(action) => assert_eq!(
                action,
                AppointmentsAction::List {
                    mine: true,
                    statuses: vec![AppointmentStatus::Pending],
                }
            ),
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn feedback_add_action() {
        match dispatch(&[
            "feedback",
            "add",
            "--appointment-id",
            "3",
            "--message",
            "Great care",
            "--rating",
            "5",
        ]) {
            Action::Feedback(action) => assert_eq!(
                action,
                FeedbackAction::Add {
                    appointment_id: 3,
                    message: "Great care".to_string(),
                    rating: 5,
                }
            ),
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn pets_update_action() {
        match dispatch(&[
            "pets",
            "update",
            "4",
            "--name",
            "Rex",
            "--species",
            "Dog",
            "--breed",
            "Lab",
            "--date-of-birth",
            "2020-01-31",
            "--status",
            "recovering",
        ]) {
            Action::Pets(action) => assert_eq!(
                action,
                PetsAction::Update {
                    pet_id: 4,
                    details: PetDetails {
                        name: "Rex".to_string(),
                        species: "Dog".to_string(),
                        breed: "Lab".to_string(),
                        date_of_birth: "2020-01-31".to_string(),
                        status: "recovering".to_string(),
                    },
                }
            ),
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn appointment_lookup_actions() {
        match dispatch(&["appointments", "pet", "6"]) {
            Action::Appointments(action) => {
                assert_eq!(action, AppointmentsAction::Pet { appointment_id: 6 });
            }
            other => panic!("unexpected action: {other:?}"),
        }
        match dispatch(&[
            "appointments",
            "update",
            "6",
            "--pet-id",
            "2",
            "--date",
            "2024-06-01T09:30:00",
            "--reason",
            "Follow-up check",
        ]) {
            Action::Appointments(action) => assert_eq!(
                action,
                AppointmentsAction::Update {
                    appointment_id: 6,
                    details: AppointmentDetails {
                        pet_id: 2,
                        date: "2024-06-01T09:30:00".to_string(),
                        reason: "Follow-up check".to_string(),
                    },
                }
            ),
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn pets_delete_action() {
        match dispatch(&["pets", "delete", "11"]) {
            Action::Pets(action) => assert_eq!(action, PetsAction::Delete { pet_id: 11 }),
            other => panic!("unexpected action: {other:?}"),
        }
    }
}
