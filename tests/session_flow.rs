//! End-to-end session flow against a mocked clinic API:
//! 1. Log in and receive a token.
//! 2. Call a protected endpoint and check the bearer header is attached.
//! 3. Log out and check later calls go out without credentials.

use anyhow::Result;
use base64ct::{Base64UrlUnpadded, Encoding};
use secrecy::SecretString;
use serde_json::{json, Value};
use std::{net::TcpListener, sync::Arc};
use vetclinic::{
    api::{config::AppConfig, ApiClient},
    clinic::pets,
    session::{
        landing_for, AuthError, AuthGateway, CredentialStore, Landing, MemoryCredentialStore,
        RequestAuthorizer, Role, SessionState,
    },
};
use wiremock::{
    matchers::{body_json, header, header_exists, method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn token(payload: &Value) -> String {
    let header = Base64UrlUnpadded::encode_string(br#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = Base64UrlUnpadded::encode_string(payload.to_string().as_bytes());
    format!("{header}.{claims}.c2ln")
}

struct Harness {
    server: MockServer,
    store: Arc<dyn CredentialStore>,
    gateway: AuthGateway,
}

impl Harness {
    async fn new() -> Result<Self> {
        let server = MockServer::start().await;
        let store: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::new());
        let config = AppConfig::new(&format!("{}/api/", server.uri()), 5, false)?;
        let api = ApiClient::new(config, RequestAuthorizer::new(Arc::clone(&store)))?;
        let gateway = AuthGateway::new(api, Arc::clone(&store), SessionState::new());
        Ok(Self {
            server,
            store,
            gateway,
        })
    }
}

#[tokio::test]
async fn login_authorize_logout() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let harness = Harness::new().await?;
    let jwt = token(&json!({
        "userId": 12,
        "email": "olive@example.test",
        "name": "Olive",
        "role": "ROLE_PETOWNER",
    }));

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({"email": "olive@example.test", "password": "Secret@1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jwtToken": jwt})))
        .expect(1)
        .mount(&harness.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/pet/user/12"))
        .and(header("Authorization", format!("Bearer {jwt}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"petId": 1, "name": "Rex", "species": "Dog", "breed": "Lab", "status": "healthy"}
        ])))
        .expect(1)
        .mount(&harness.server)
        .await;

    let mut changes = harness.gateway.session().subscribe();
    assert!(changes.borrow_and_update().is_none());

    let identity = harness
        .gateway
        .login("olive@example.test", &SecretString::from("Secret@1".to_string()))
        .await?;
    assert_eq!(identity.user_id, 12);
    assert_eq!(identity.role, Role::PetOwner);
    assert_eq!(landing_for(&identity.role), Landing::Home);

    changes.changed().await?;
    assert_eq!(
        changes.borrow_and_update().as_ref().map(|user| user.user_id),
        Some(12)
    );

    let user_id = harness.gateway.current_user_id().unwrap_or_default();
    let owned = pets::list_pets_for_user(harness.gateway.api(), user_id).await?;
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].name, "Rex");

    harness.gateway.logout();
    assert!(harness.store.retrieve().is_none());
    assert!(!harness.gateway.is_authenticated());
    changes.changed().await?;
    assert!(changes.borrow_and_update().is_none());

    Ok(())
}

#[tokio::test]
async fn failed_login_stores_nothing_and_sends_no_bearer() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let harness = Harness::new().await?;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
        .expect(1)
        .mount(&harness.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/pet"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&harness.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/pet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&harness.server)
        .await;

    let err = harness
        .gateway
        .login("olive@example.test", &SecretString::from("wrong".to_string()))
        .await
        .err();
    assert_eq!(err, Some(AuthError::InvalidCredentials));
    assert!(harness.store.retrieve().is_none());
    assert!(harness.gateway.session().current_user().is_none());

    let all = pets::list_pets(harness.gateway.api()).await?;
    assert!(all.is_empty());

    Ok(())
}

#[tokio::test]
async fn admin_login_lands_on_feedback_management() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let harness = Harness::new().await?;
    let jwt = token(&json!({
        "userId": 1,
        "email": "staff@example.test",
        "role": "ROLE_ADMIN",
    }));

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(move |request: &Request| {
            // login must never carry a stale bearer
            if request.headers.contains_key("authorization") {
                ResponseTemplate::new(400)
            } else {
                ResponseTemplate::new(200).set_body_json(json!({"jwtToken": jwt}))
            }
        })
        .mount(&harness.server)
        .await;

    harness
        .store
        .store(SecretString::from("stale.token.value".to_string()));

    let identity = harness
        .gateway
        .login("staff@example.test", &SecretString::from("Secret@1".to_string()))
        .await?;
    assert!(identity.role.is_admin());
    assert_eq!(identity.name, "");
    assert_eq!(landing_for(&identity.role).path(), "/addfeedback");

    Ok(())
}
