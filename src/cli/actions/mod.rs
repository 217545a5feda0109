pub mod appointments;
pub mod auth;
pub mod feedback;
pub mod pets;

use crate::{
    api::ApiClient,
    cli::globals::GlobalArgs,
    clinic::AppointmentStatus,
    session::{
        guard, Access, AccessDenied, AuthGateway, CredentialStore, Identity,
        MemoryCredentialStore, RequestAuthorizer, SessionState,
    },
};
use anyhow::Result;
use secrecy::SecretString;
use serde::Serialize;
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub enum Action {
    Login {
        email: String,
        password: SecretString,
    },
    Register {
        username: String,
        email: String,
        password: SecretString,
        confirm_password: SecretString,
        mobile_number: String,
        role: String,
    },
    Logout,
    Whoami,
    Pets(PetsAction),
    Appointments(AppointmentsAction),
    Feedback(FeedbackAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetDetails {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub date_of_birth: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PetsAction {
    List { mine: bool },
    Show { pet_id: i64 },
    Add(PetDetails),
    Update { pet_id: i64, details: PetDetails },
    Delete { pet_id: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentDetails {
    pub pet_id: i64,
    pub date: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppointmentsAction {
    List {
        mine: bool,
        statuses: Vec<AppointmentStatus>,
    },
    Show {
        appointment_id: i64,
    },
    Pet {
        appointment_id: i64,
    },
    Request(AppointmentDetails),
    Update {
        appointment_id: i64,
        details: AppointmentDetails,
    },
    Delete {
        appointment_id: i64,
    },
    SetStatus {
        appointment_id: i64,
        status: AppointmentStatus,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackAction {
    List {
        mine: bool,
    },
    Add {
        appointment_id: i64,
        message: String,
        rating: u8,
    },
}

/// Everything an action needs for one process-lifetime session.
pub struct Context {
    pub gateway: AuthGateway,
    watcher: JoinHandle<Option<i64>>,
}

impl Context {
    /// Builds the store, transport and gateway, seeds the store from a supplied
    /// token and starts the session-change logger.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(globals: &GlobalArgs) -> Result<Self> {
        let store: Arc<dyn CredentialStore> = Arc::new(match &globals.token {
            Some(token) => MemoryCredentialStore::with_token(token.clone()),
            None => MemoryCredentialStore::new(),
        });

        let api = ApiClient::new(
            globals.app_config()?,
            RequestAuthorizer::new(Arc::clone(&store)),
        )?;
        let session = SessionState::new();
        let watcher = watch_session(&session);
        let gateway = AuthGateway::new(api, store, session);

        if let Some(identity) = gateway.restore() {
            debug!(user_id = identity.user_id, "Restored session from supplied token");
        }

        Ok(Self { gateway, watcher })
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        self.gateway.api()
    }

    /// Current identity, provided it satisfies `access`.
    ///
    /// # Errors
    /// Returns `AccessDenied` when nobody is logged in or the role is insufficient.
    pub fn require(&self, access: Access) -> Result<Identity, AccessDenied> {
        let identity = self.gateway.current_identity();
        guard(identity.as_ref(), access)?;
        identity.ok_or(AccessDenied::NotAuthenticated)
    }

    /// Closes the session channel and waits for the logger to drain it.
    /// Returns the user id of the last state it logged, `None` when signed out.
    pub async fn finish(self) -> Option<i64> {
        let Self { gateway, watcher } = self;
        drop(gateway);

        match tokio::time::timeout(WATCHER_DRAIN_TIMEOUT, watcher).await {
            Ok(Ok(last)) => last,
            Ok(Err(err)) => {
                warn!("Session logger stopped: {err}");
                None
            }
            Err(_) => {
                warn!("Session logger did not drain in time");
                None
            }
        }
    }
}

const WATCHER_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Logs every session change, starting with the current value. Pending
/// changes are still delivered after the sender is dropped.
fn watch_session(session: &SessionState) -> JoinHandle<Option<i64>> {
    let mut receiver = session.subscribe();
    tokio::spawn(async move {
        let mut last = None;
        while receiver.changed().await.is_ok() {
            let current = receiver.borrow_and_update().clone();
            last = current.as_ref().map(|identity| identity.user_id);
            match current {
                Some(identity) => {
                    info!(user_id = identity.user_id, role = %identity.role, "Session: {}", identity.email);
                }
                None => info!("Session: signed out"),
            }
        }
        last
    })
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Runs an action against a fresh context.
///
/// # Errors
/// Returns an error when validation, an access guard or the API call fails.
pub async fn handle(action: Action, globals: &GlobalArgs) -> Result<()> {
    let context = Context::new(globals)?;

    let result = run(&context, action).await;
    context.finish().await;

    result
}

async fn run(context: &Context, action: Action) -> Result<()> {
    match action {
        Action::Login { email, password } => auth::login(context, &email, &password).await,
        Action::Register {
            username,
            email,
            password,
            confirm_password,
            mobile_number,
            role,
        } => {
            auth::register(
                context,
                auth::Registration {
                    username: &username,
                    email: &email,
                    password: &password,
                    confirm_password: &confirm_password,
                    mobile_number: &mobile_number,
                    role: &role,
                },
            )
            .await
        }
        Action::Logout => {
            auth::logout(context);
            Ok(())
        }
        Action::Whoami => auth::whoami(context),
        Action::Pets(action) => pets::handle(context, action).await,
        Action::Appointments(action) => appointments::handle(context, action).await,
        Action::Feedback(action) => feedback::handle(context, action).await,
    }
}
