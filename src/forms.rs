//! Client-side form validation. Every failing field is reported at once so the
//! caller can show all messages together; the server still validates again.

use chrono::{Local, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::{collections::BTreeMap, fmt, sync::LazyLock};

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());
static PASSWORD_CHARS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\d@$!%*?&]{8,}$").ok());
static DIGITS: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[0-9]+$").ok());

const PASSWORD_SPECIALS: &str = "@$!%*?&";
pub const FEEDBACK_MAX_CHARS: usize = 200;
pub const REASON_MIN_CHARS: usize = 10;

fn matches(pattern: &LazyLock<Option<Regex>>, value: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(value))
}

#[must_use]
pub fn valid_email(email: &str) -> bool {
    matches(&EMAIL, email)
}

/// At least 8 characters from the allowed set, with a lowercase letter, an
/// uppercase letter, a digit and one of `@$!%*?&`.
#[must_use]
pub fn valid_password(password: &str) -> bool {
    matches(&PASSWORD_CHARS, password)
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

#[must_use]
pub fn valid_mobile_number(number: &str) -> bool {
    matches(&DIGITS, number)
}

/// Accepts `YYYY-MM-DD` or an ISO-8601 local date time; only the date is kept.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    value
        .parse::<NaiveDate>()
        .ok()
        .or_else(|| value.parse::<NaiveDateTime>().ok().map(|at| at.date()))
}

/// Field name to message, sorted by field name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect();
        formatter.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

fn require(errors: &mut ValidationErrors, field: &'static str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, "is required");
        false
    } else {
        true
    }
}

fn require_email(errors: &mut ValidationErrors, email: &str) {
    if require(errors, "email", email) && !valid_email(email.trim()) {
        errors.add("email", "must be a valid email address");
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

impl LoginForm<'_> {
    /// # Errors
    /// Returns every failing field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        require_email(&mut errors, self.email);
        require(&mut errors, "password", self.password);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
    pub mobile_number: &'a str,
    pub role: &'a str,
}

impl RegistrationForm<'_> {
    /// # Errors
    /// Returns every failing field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        require(&mut errors, "username", self.username);
        require_email(&mut errors, self.email);
        if require(&mut errors, "password", self.password) && !valid_password(self.password) {
            errors.add(
                "password",
                "must be at least 8 characters with upper and lower case letters, a digit and one of @$!%*?&",
            );
        }
        if require(&mut errors, "confirm_password", self.confirm_password)
            && self.password != self.confirm_password
        {
            errors.add("confirm_password", "passwords do not match");
        }
        if require(&mut errors, "mobile_number", self.mobile_number)
            && !valid_mobile_number(self.mobile_number.trim())
        {
            errors.add("mobile_number", "must contain digits only");
        }
        if require(&mut errors, "role", self.role)
            && self.role.parse::<crate::session::AccountRole>().is_err()
        {
            errors.add("role", "must be ADMIN or PETOWNER");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PetForm<'a> {
    pub name: &'a str,
    pub species: &'a str,
    pub breed: &'a str,
    pub date_of_birth: &'a str,
    pub status: &'a str,
}

impl PetForm<'_> {
    /// # Errors
    /// Returns every failing field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        self.validate_on(Local::now().date_naive())
    }

    /// Same as [`PetForm::validate`] with an explicit current date.
    ///
    /// # Errors
    /// Returns every failing field.
    pub fn validate_on(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        require(&mut errors, "name", self.name);
        require(&mut errors, "species", self.species);
        require(&mut errors, "breed", self.breed);
        if require(&mut errors, "date_of_birth", self.date_of_birth) {
            match parse_date(self.date_of_birth) {
                None => errors.add("date_of_birth", "must be a date like 2020-01-31"),
                Some(born) if born > today => {
                    errors.add("date_of_birth", "cannot be in the future");
                }
                Some(_) => {}
            }
        }
        require(&mut errors, "status", self.status);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentForm<'a> {
    pub pet_id: Option<i64>,
    pub appointment_date: &'a str,
    pub reason: &'a str,
}

impl AppointmentForm<'_> {
    /// # Errors
    /// Returns every failing field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.pet_id.is_none() {
            errors.add("pet_id", "is required");
        }
        require(&mut errors, "appointment_date", self.appointment_date);
        if require(&mut errors, "reason", self.reason)
            && self.reason.trim().chars().count() < REASON_MIN_CHARS
        {
            errors.add(
                "reason",
                format!("must be at least {REASON_MIN_CHARS} characters"),
            );
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeedbackForm<'a> {
    pub message: &'a str,
    pub rating: Option<u8>,
}

impl FeedbackForm<'_> {
    /// # Errors
    /// Returns every failing field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if require(&mut errors, "message", self.message)
            && self.message.chars().count() > FEEDBACK_MAX_CHARS
        {
            errors.add(
                "message",
                format!("must be at most {FEEDBACK_MAX_CHARS} characters"),
            );
        }
        match self.rating {
            None => errors.add("rating", "is required"),
            Some(rating) if !(1..=5).contains(&rating) => {
                errors.add("rating", "must be between 1 and 5");
            }
            Some(_) => {}
        }
        errors.into_result()
    }
}
