//! Token injection, the single refresh-and-retry path and error normalization.

mod common;

use common::{client, page_json, task_json, user_json};
use serde_json::json;
use taskdesk_core::{ApiError, KeyValueStore, Method, Role, UserId, ViewQuery};
use tokio::sync::oneshot;

#[tokio::test]
async fn test_bearer_token_is_injected_when_present() {
    let (client, transport, _) = client();
    transport.reply(Method::Get, "/users", 200, json!([]));
    transport.reply(Method::Get, "/users", 200, json!([]));

    client.list_users().await.unwrap();
    client.session().set_token("tok-1");
    client.list_users().await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent[0].header("Authorization"), None);
    assert_eq!(sent[1].header("Authorization"), Some("Bearer tok-1"));
    assert_eq!(sent[1].header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn test_401_then_refresh_returns_original_data() {
    let (client, transport, _) = client();
    client.session().set_token("stale");

    let path = ViewQuery::default().to_api_path();
    transport
        .reply(Method::Get, &path, 401, json!({ "message": "jwt expired" }))
        .reply(Method::Post, "/auth/refresh", 200, json!({ "accessToken": "fresh" }))
        .reply(
            Method::Get,
            &path,
            200,
            page_json(vec![task_json("t1", "Write report", "todo")], 1),
        );

    let page = client.fetch_tasks(&ViewQuery::default()).await.unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.total, 1);

    let attempts = transport.sent_to(Method::Get, &path);
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].header("Authorization"), Some("Bearer stale"));
    assert_eq!(attempts[1].header("Authorization"), Some("Bearer fresh"));
    assert_eq!(client.session().token().as_deref(), Some("fresh"));
}

#[tokio::test]
async fn test_refresh_failure_expires_session_without_retry() {
    let (client, transport, storage) = client();
    client.session().set_token("stale");
    storage.set("authUser", &user_json("u1", "Ada", "admin").to_string());

    transport
        .reply(Method::Get, "/users", 401, json!({}))
        .reply(Method::Post, "/auth/refresh", 401, json!({ "message": "no cookie" }));

    let result = client.list_users().await;
    assert_eq!(result, Err(ApiError::SessionExpired));

    assert_eq!(transport.sent().len(), 2);
    assert_eq!(client.session().token(), None);
    assert_eq!(storage.get("accessToken"), None);
    assert_eq!(storage.get("authUser"), None);
}

#[tokio::test]
async fn test_refresh_network_error_expires_session() {
    let (client, transport, _) = client();
    client.session().set_token("stale");
    transport
        .reply(Method::Get, "/users", 401, json!({}))
        .fail(Method::Post, "/auth/refresh", "connection reset");

    assert_eq!(client.list_users().await, Err(ApiError::SessionExpired));
    assert!(!client.session().has_token());
}

#[tokio::test]
async fn test_retry_is_attempted_only_once() {
    let (client, transport, _) = client();
    transport
        .reply(Method::Get, "/users", 401, json!({}))
        .reply(Method::Post, "/auth/refresh", 200, json!({ "accessToken": "fresh" }))
        .reply(Method::Get, "/users", 401, json!({ "message": "still no" }));

    let result = client.list_users().await;
    assert_eq!(
        result,
        Err(ApiError::Http {
            status: 401,
            message: "still no".to_string()
        })
    );
    assert_eq!(transport.sent_to(Method::Post, "/auth/refresh").len(), 1);
}

#[tokio::test]
async fn test_auth_endpoints_never_refresh() {
    let (client, transport, _) = client();
    transport.reply(
        Method::Post,
        "/auth/login",
        401,
        json!({ "message": "Invalid credentials" }),
    );

    let result = client
        .login(&taskdesk_core::Credentials {
            email: "ada@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await;

    assert_eq!(
        result,
        Err(ApiError::Http {
            status: 401,
            message: "Invalid credentials".to_string()
        })
    );
    assert!(transport.sent_to(Method::Post, "/auth/refresh").is_empty());
}

#[tokio::test]
async fn test_error_message_sources() {
    let (client, transport, _) = client();
    transport
        .reply(Method::Get, "/users", 403, json!({ "message": "Forbidden: admins only" }))
        .reply_raw(Method::Get, "/users", 502, "upstream down")
        .reply_raw(Method::Get, "/users", 404, "");

    let messages: Vec<String> = [
        client.list_users().await,
        client.list_users().await,
        client.list_users().await,
    ]
    .into_iter()
    .map(|result| result.unwrap_err().user_message())
    .collect();

    assert_eq!(
        messages,
        vec!["Forbidden: admins only", "upstream down", "Not Found"]
    );
}

#[tokio::test]
async fn test_network_and_decode_errors() {
    let (client, transport, _) = client();
    transport
        .fail(Method::Get, "/users", "dns failure")
        .reply_raw(Method::Get, "/users", 200, "<html>");

    assert_eq!(
        client.list_users().await,
        Err(ApiError::Network("dns failure".to_string()))
    );
    assert!(matches!(client.list_users().await, Err(ApiError::Decode(_))));
}

#[tokio::test]
async fn test_each_401_triggers_its_own_refresh() {
    let (client, transport, _) = client();
    let (open_first, first_gate) = oneshot::channel();
    let (open_second, second_gate) = oneshot::channel();
    transport
        .reply_gated(Method::Get, "/users", 401, json!({}), first_gate)
        .reply_gated(Method::Get, "/users", 401, json!({}), second_gate)
        .reply(Method::Get, "/users", 200, json!([user_json("u1", "Ada", "admin")]))
        .reply(Method::Get, "/users", 200, json!([user_json("u1", "Ada", "admin")]))
        .reply(Method::Post, "/auth/refresh", 200, json!({ "accessToken": "tok-a" }))
        .reply(Method::Post, "/auth/refresh", 200, json!({ "accessToken": "tok-b" }));

    // Both requests are in flight before either 401 is delivered.
    let release = async {
        while transport.sent().len() < 2 {
            tokio::task::yield_now().await;
        }
        let _ = open_first.send(());
        let _ = open_second.send(());
    };
    let (first, second, ()) = tokio::join!(client.list_users(), client.list_users(), release);
    assert_eq!(first.unwrap().len(), 1);
    assert_eq!(second.unwrap().len(), 1);

    let sent = transport.sent();
    assert_eq!(sent.len(), 6);
    assert!(sent[..2].iter().all(|req| req.method == Method::Get));
    assert_eq!(transport.sent_to(Method::Post, "/auth/refresh").len(), 2);
    assert_eq!(client.session().token().as_deref(), Some("tok-b"));
}

#[tokio::test]
async fn test_role_change_escapes_user_id() {
    let (client, transport, _) = client();
    transport.reply(
        Method::Put,
        "/users/u%231/role",
        200,
        user_json("u#1", "Ada", "manager"),
    );

    let user = client
        .update_user_role(&UserId::from("u#1"), Role::Manager)
        .await
        .unwrap();

    assert_eq!(user.role, Role::Manager);
    let sent = transport.sent_to(Method::Put, "/users/u%231/role");
    assert_eq!(sent[0].body.as_deref(), Some(r#"{"role":"manager"}"#));
}
