//! Login, register, logout and restoring a session after reload.

mod common;

use common::{client, user_json};
use serde_json::json;
use taskdesk_core::{
    AuthPhase, AuthState, Credentials, KeyValueStore, Method, Registration, Role, SessionStore,
};

#[tokio::test]
async fn test_login_persists_session_and_bootstrap_restores_it() {
    let (client, transport, storage) = client();
    transport.reply(
        Method::Post,
        "/auth/login",
        200,
        json!({ "user": user_json("u7", "Grace", "manager"), "accessToken": "tok-7" }),
    );

    let mut auth = AuthState::default();
    auth.begin();
    assert!(auth.is_loading());
    let result = client
        .login(&Credentials {
            email: "grace@example.com".to_string(),
            password: "hunter22".to_string(),
        })
        .await;
    auth.finish(result);

    assert!(auth.is_authenticated());
    assert_eq!(auth.role(), Some(Role::Manager));
    assert_eq!(storage.get("accessToken").as_deref(), Some("tok-7"));

    let login = &transport.sent_to(Method::Post, "/auth/login")[0];
    assert_eq!(
        login.body.as_deref(),
        Some(r#"{"email":"grace@example.com","password":"hunter22"}"#)
    );

    let reloaded = AuthState::bootstrap(&SessionStore::new(storage.clone()));
    assert_eq!(reloaded.phase, AuthPhase::Authenticated);
    assert_eq!(reloaded.user, auth.user);
}

#[tokio::test]
async fn test_failed_login_surfaces_server_message() {
    let (client, transport, storage) = client();
    transport.reply(
        Method::Post,
        "/auth/login",
        400,
        json!({ "message": "Invalid credentials" }),
    );

    let mut auth = AuthState::default();
    auth.begin();
    auth.finish(
        client
            .login(&Credentials {
                email: "grace@example.com".to_string(),
                password: "nope".to_string(),
            })
            .await,
    );

    assert_eq!(auth.phase, AuthPhase::Anonymous);
    assert_eq!(auth.error.as_deref(), Some("Invalid credentials"));
    assert_eq!(storage.get("accessToken"), None);
}

#[tokio::test]
async fn test_register_signs_in_immediately() {
    let (client, transport, _) = client();
    transport.reply(
        Method::Post,
        "/auth/register",
        201,
        json!({ "user": user_json("u8", "Linus", "user"), "accessToken": "tok-8" }),
    );

    let user = client
        .register(&Registration {
            name: "Linus".to_string(),
            email: "linus@example.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(user.role, Role::User);
    assert_eq!(client.session().token().as_deref(), Some("tok-8"));
    assert_eq!(client.session().persisted_user(), Some(user));
}

#[tokio::test]
async fn test_logout_clears_even_when_server_fails() {
    let (client, transport, storage) = client();
    client.session().set_token("tok-1");
    client
        .session()
        .persist_user(&serde_json::from_value(user_json("u1", "Ada", "admin")).unwrap());
    transport.reply(Method::Post, "/auth/logout", 500, json!({ "message": "down" }));

    client.logout().await;

    assert_eq!(storage.get("accessToken"), None);
    assert_eq!(storage.get("authUser"), None);
    assert!(AuthState::bootstrap(client.session()).user.is_none());
}

#[tokio::test]
async fn test_token_without_user_snapshot_is_not_a_session() {
    let (client, _, storage) = client();
    storage.set("accessToken", "orphan");
    assert!(client.session().has_token());
    assert_eq!(AuthState::bootstrap(client.session()).phase, AuthPhase::Anonymous);
}
