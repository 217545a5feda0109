pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};

use crate::api::config::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECONDS};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_TOKEN: &str = "token";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_CHECK_EXPIRY: &str = "check-expiry";

fn mine_arg(help: &'static str) -> Arg {
    Arg::new("mine")
        .long("mine")
        .help(help)
        .action(ArgAction::SetTrue)
}

fn id_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .help(help)
        .required(true)
        .value_parser(clap::value_parser!(i64))
}

fn auth_commands() -> [Command; 4] {
    [
        Command::new("login")
            .about("Log in and print the token for later commands")
            .arg(
                Arg::new("email")
                    .long("email")
                    .help("Account email")
                    .env("VETCLINIC_EMAIL")
                    .required(true),
            )
            .arg(
                Arg::new("password")
                    .long("password")
                    .help("Account password")
                    .env("VETCLINIC_PASSWORD")
                    .hide_env_values(true)
                    .required(true),
            ),
        Command::new("register")
            .about("Create a new account")
            .arg(Arg::new("username").long("username").required(true))
            .arg(Arg::new("email").long("email").required(true))
            .arg(
                Arg::new("password")
                    .long("password")
                    .env("VETCLINIC_PASSWORD")
                    .hide_env_values(true)
                    .required(true),
            )
            .arg(
                Arg::new("confirm-password")
                    .long("confirm-password")
                    .help("Repeat the password")
                    .required(true),
            )
            .arg(Arg::new("mobile-number").long("mobile-number").required(true))
            .arg(
                Arg::new("role")
                    .long("role")
                    .help("Requested role: PETOWNER or ADMIN")
                    .default_value("PETOWNER"),
            ),
        Command::new("logout").about("Forget the current session"),
        Command::new("whoami").about("Show the identity behind the current token"),
    ]
}

fn pet_fields(command: Command) -> Command {
    command
        .arg(Arg::new("name").long("name").required(true))
        .arg(Arg::new("species").long("species").required(true))
        .arg(Arg::new("breed").long("breed").required(true))
        .arg(
            Arg::new("date-of-birth")
                .long("date-of-birth")
                .help("Date of birth, e.g. 2020-01-31; not in the future")
                .required(true),
        )
        .arg(
            Arg::new("status")
                .long("status")
                .help("Health status, e.g. healthy")
                .required(true),
        )
}

fn appointment_fields(command: Command) -> Command {
    command
        .arg(
            Arg::new("pet-id")
                .long("pet-id")
                .required(true)
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("date")
                .long("date")
                .help("ISO-8601 date time, e.g. 2024-05-01T10:00:00")
                .required(true),
        )
        .arg(
            Arg::new("reason")
                .long("reason")
                .help("At least 10 characters")
                .required(true),
        )
}

fn pets_command() -> Command {
    Command::new("pets")
        .about("Manage pets")
        .subcommand_required(true)
        .subcommand(
            Command::new("list")
                .about("List pets")
                .arg(mine_arg("Only pets owned by the current user")),
        )
        .subcommand(
            Command::new("show")
                .about("Show one pet")
                .arg(id_arg("pet-id", "Pet id")),
        )
        .subcommand(pet_fields(
            Command::new("add").about("Register a pet for the current user"),
        ))
        .subcommand(pet_fields(
            Command::new("update")
                .about("Edit a pet")
                .arg(id_arg("pet-id", "Pet id")),
        ))
        .subcommand(
            Command::new("delete")
                .about("Delete a pet")
                .arg(id_arg("pet-id", "Pet id")),
        )
}

fn appointments_command() -> Command {
    let by_id = |name: &'static str, about: &'static str| {
        Command::new(name)
            .about(about)
            .arg(id_arg("appointment-id", "Appointment id"))
    };

    Command::new("appointments")
        .about("Request and review appointments")
        .subcommand_required(true)
        .subcommand(
            Command::new("list")
                .about("List appointments")
                .arg(mine_arg("Only appointments of the current user"))
                .arg(
                    Arg::new("status")
                        .long("status")
                        .help("Keep only appointments with this status (repeatable)")
                        .action(ArgAction::Append),
                ),
        )
        .subcommand(by_id("show", "Show one appointment"))
        .subcommand(by_id("pet", "Show the pet booked for an appointment"))
        .subcommand(appointment_fields(
            Command::new("request").about("Request an appointment for one of your pets"),
        ))
        .subcommand(appointment_fields(by_id(
            "update",
            "Edit an appointment; it goes back to PENDING",
        )))
        .subcommand(by_id("delete", "Cancel an appointment"))
        .subcommand(by_id("approve", "Approve an appointment (staff)"))
        .subcommand(by_id("reject", "Reject an appointment (staff)"))
        .subcommand(by_id("close", "Close an appointment (staff)"))
}

fn feedback_command() -> Command {
    Command::new("feedback")
        .about("Leave and review feedback")
        .subcommand_required(true)
        .subcommand(
            Command::new("list")
                .about("List feedback")
                .arg(mine_arg("Only feedback left by the current user")),
        )
        .subcommand(
            Command::new("add")
                .about("Leave feedback for an appointment")
                .arg(
                    Arg::new("appointment-id")
                        .long("appointment-id")
                        .required(true)
                        .value_parser(clap::value_parser!(i64)),
                )
                .arg(Arg::new("message").long("message").required(true))
                .arg(
                    Arg::new("rating")
                        .long("rating")
                        .help("1 to 5")
                        .required(true)
                        .value_parser(clap::value_parser!(u8)),
                ),
        )
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("vetclinic")
        .about("Veterinary clinic appointment client")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_API_URL)
                .long("api-url")
                .help("Base URL of the clinic API")
                .env("VETCLINIC_API_URL")
                .default_value(DEFAULT_API_BASE_URL)
                .global(true),
        )
        .arg(
            Arg::new(ARG_TOKEN)
                .long("token")
                .help("Bearer token from a previous login")
                .env("VETCLINIC_TOKEN")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long("timeout")
                .help("Request timeout in seconds")
                .env("VETCLINIC_TIMEOUT")
                .default_value(DEFAULT_TIMEOUT_SECONDS.to_string())
                .value_parser(clap::value_parser!(u64))
                .global(true),
        )
        .arg(
            Arg::new(ARG_CHECK_EXPIRY)
                .long("check-expiry")
                .help("Treat tokens whose exp claim has passed as logged out")
                .env("VETCLINIC_CHECK_EXPIRY")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommands(auth_commands())
        .subcommand(pets_command())
        .subcommand(appointments_command())
        .subcommand(feedback_command());

    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "vetclinic");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            "Veterinary clinic appointment client"
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_debug_assert() {
        new().debug_assert();
    }

    #[test]
    fn test_login_args() {
        temp_env::with_vars(
            [
                ("VETCLINIC_TOKEN", None::<&str>),
                ("VETCLINIC_PASSWORD", None),
                ("VETCLINIC_EMAIL", None),
                ("VETCLINIC_API_URL", None),
            ],
            || {
                let matches = new().get_matches_from(vec![
                    "vetclinic",
                    "login",
                    "--email",
                    "owner@example.test",
                    "--password",
                    "pw",
                ]);

                assert_eq!(
                    matches.get_one::<String>(ARG_API_URL).map(String::as_str),
                    Some(DEFAULT_API_BASE_URL)
                );
                let (name, sub) = matches.subcommand().unwrap();
                assert_eq!(name, "login");
                assert_eq!(
                    sub.get_one::<String>("email").map(String::as_str),
                    Some("owner@example.test")
                );
            },
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("VETCLINIC_API_URL", Some("https://clinic.example/api")),
                ("VETCLINIC_TOKEN", Some("abc")),
                ("VETCLINIC_TIMEOUT", Some("3")),
                ("VETCLINIC_CHECK_EXPIRY", Some("true")),
            ],
            || {
                let matches = new().get_matches_from(vec!["vetclinic", "whoami"]);

                assert_eq!(
                    matches.get_one::<String>(ARG_API_URL).map(String::as_str),
                    Some("https://clinic.example/api")
                );
                assert_eq!(
                    matches.get_one::<String>(ARG_TOKEN).map(String::as_str),
                    Some("abc")
                );
                assert_eq!(matches.get_one::<u64>(ARG_TIMEOUT).copied(), Some(3));
                assert!(matches.get_flag(ARG_CHECK_EXPIRY));
            },
        );
    }

    #[test]
    fn test_appointment_status_filter_repeats() {
        let matches = new().get_matches_from(vec![
            "vetclinic",
            "appointments",
            "list",
            "--status",
            "PENDING",
            "--status",
            "APPROVED",
        ]);
        let (_, appointments) = matches.subcommand().unwrap();
        let (_, list) = appointments.subcommand().unwrap();
        let statuses: Vec<&String> = list.get_many::<String>("status").unwrap().collect();
        assert_eq!(statuses, vec!["PENDING", "APPROVED"]);
    }

    #[test]
    fn test_pet_add_requires_status_and_birth_date() {
        let result = new().try_get_matches_from(vec![
            "vetclinic",
            "pets",
            "add",
            "--name",
            "Rex",
            "--species",
            "Dog",
            "--breed",
            "Lab",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_subcommand_required() {
        let result = new().try_get_matches_from(vec!["vetclinic", "pets"]);
        assert!(result.is_err());
    }
}
