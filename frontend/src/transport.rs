use async_trait::async_trait;
use taskdesk_core::{HttpRequest, HttpResponse, Transport, TransportError};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCredentials, RequestInit, Response};

/// `window.fetch` with the session cookie attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

fn js_error(context: &str, value: &JsValue) -> TransportError {
    let detail = value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| "unknown error".to_string());
    TransportError(format!("{context}: {detail}"))
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let opts = RequestInit::new();
        opts.set_method(request.method.as_str());
        opts.set_credentials(RequestCredentials::Include);
        if let Some(body) = &request.body {
            opts.set_body(&JsValue::from_str(body));
        }

        let req = Request::new_with_str_and_init(&request.url, &opts)
            .map_err(|e| js_error("Failed to create request", &e))?;
        for (name, value) in &request.headers {
            req.headers()
                .set(name, value)
                .map_err(|e| js_error("Failed to set header", &e))?;
        }

        let window =
            web_sys::window().ok_or_else(|| TransportError("no window available".to_string()))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&req))
            .await
            .map_err(|e| js_error("Failed to send request", &e))?
            .dyn_into()
            .map_err(|e| js_error("Unexpected fetch result", &e))?;

        let text_promise = response
            .text()
            .map_err(|e| js_error("Failed to read response", &e))?;
        let body = JsFuture::from(text_promise)
            .await
            .map_err(|e| js_error("Failed to get text", &e))?
            .as_string()
            .unwrap_or_default();

        Ok(HttpResponse {
            status: response.status(),
            status_text: response.status_text(),
            body,
        })
    }
}
