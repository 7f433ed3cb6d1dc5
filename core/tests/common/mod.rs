//! Scripted transport shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::{json, Value};
use taskdesk_core::{
    ClientConfig, HttpClient, HttpRequest, HttpResponse, MemoryStore, Method, SessionStore,
    Transport, TransportError,
};
use tokio::sync::oneshot;

pub const BASE: &str = "http://api.test";

struct Reply {
    result: Result<HttpResponse, TransportError>,
    gate: Option<oneshot::Receiver<()>>,
}

#[derive(Default)]
struct Inner {
    routes: RefCell<HashMap<String, VecDeque<Reply>>>,
    sent: RefCell<Vec<HttpRequest>>,
}

/// Answers each `METHOD url` route from a FIFO of canned replies.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    inner: Rc<Inner>,
}

fn route(method: Method, path: &str) -> String {
    format!("{method} {BASE}{path}")
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.push(method, path, Ok(response(status, &body.to_string())), None)
    }

    pub fn reply_raw(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        self.push(method, path, Ok(response(status, body)), None)
    }

    /// The reply is held back until `gate` fires.
    pub fn reply_gated(
        &self,
        method: Method,
        path: &str,
        status: u16,
        body: Value,
        gate: oneshot::Receiver<()>,
    ) -> &Self {
        self.push(method, path, Ok(response(status, &body.to_string())), Some(gate))
    }

    pub fn fail(&self, method: Method, path: &str, reason: &str) -> &Self {
        self.push(method, path, Err(TransportError(reason.to_string())), None)
    }

    fn push(
        &self,
        method: Method,
        path: &str,
        result: Result<HttpResponse, TransportError>,
        gate: Option<oneshot::Receiver<()>>,
    ) -> &Self {
        self.inner
            .routes
            .borrow_mut()
            .entry(route(method, path))
            .or_default()
            .push_back(Reply { result, gate });
        self
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.inner.sent.borrow().clone()
    }

    pub fn sent_to(&self, method: Method, path: &str) -> Vec<HttpRequest> {
        let url = format!("{BASE}{path}");
        self.sent()
            .into_iter()
            .filter(|req| req.method == method && req.url == url)
            .collect()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let key = format!("{} {}", request.method, request.url);
        self.inner.sent.borrow_mut().push(request);

        let reply = self
            .inner
            .routes
            .borrow_mut()
            .get_mut(&key)
            .and_then(VecDeque::pop_front);
        let Some(reply) = reply else {
            panic!("no scripted reply for {key}");
        };
        if let Some(gate) = reply.gate {
            let _ = gate.await;
        }
        reply.result
    }
}

pub fn response(status: u16, body: &str) -> HttpResponse {
    let status_text = match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        _ => "",
    };
    HttpResponse {
        status,
        status_text: status_text.to_string(),
        body: body.to_string(),
    }
}

pub fn client() -> (HttpClient<ScriptedTransport>, ScriptedTransport, MemoryStore) {
    let transport = ScriptedTransport::new();
    let storage = MemoryStore::new();
    let session = SessionStore::new(storage.clone());
    let config = ClientConfig::default().with_api_base(BASE);
    (
        HttpClient::new(transport.clone(), session, config),
        transport,
        storage,
    )
}

pub fn user_json(id: &str, name: &str, role: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "role": role
    })
}

pub fn task_json(id: &str, title: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "title": title,
        "priority": "medium",
        "status": status,
        "owner": "u1",
        "createdAt": "2025-01-01T00:00:00.000Z"
    })
}

pub fn page_json(tasks: Vec<Value>, total: u64) -> Value {
    json!({ "data": tasks, "total": total, "page": 1, "limit": 10 })
}
