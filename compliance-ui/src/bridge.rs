use compliance_core::http::{ApiRequest, RawResponse, Transport};
use compliance_core::store::Store;
use compliance_core::{ApiConfig, CancelToken, ComplianceClient, FetchError};
use js_sys::Reflect;
use leptos::{RwSignal, SignalUpdate, SignalUpdateUntracked};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Headers, RequestInit, Response};

pub type Client = ComplianceClient<BrowserTransport>;

pub fn client() -> Client {
    ComplianceClient::new(BrowserTransport, ApiConfig::from_build_env())
}

fn js_message(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

fn is_abort_error(value: &JsValue) -> bool {
    Reflect::get(value, &JsValue::from_str("name"))
        .ok()
        .and_then(|n| n.as_string())
        .is_some_and(|n| n == "AbortError")
}

fn fetch_failed(value: JsValue) -> FetchError {
    if is_abort_error(&value) {
        FetchError::Aborted
    } else {
        FetchError::Network(js_message(&value))
    }
}

/// `window.fetch`, aborted through an `AbortController` when the token fires.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

impl Transport for BrowserTransport {
    async fn send(&self, request: ApiRequest, cancel: Option<&CancelToken>) -> Result<RawResponse, FetchError> {
        let window = web_sys::window().ok_or_else(|| FetchError::Network("window not available".into()))?;

        let headers = Headers::new().map_err(fetch_failed)?;
        for (name, value) in &request.headers {
            headers.set(name, value).map_err(fetch_failed)?;
        }

        let init = RequestInit::new();
        init.set_method(request.method.as_str());
        init.set_headers(&headers);
        if let Some(body) = &request.body {
            init.set_body(&JsValue::from_str(body));
        }
        if let Some(token) = cancel {
            let controller = AbortController::new().map_err(fetch_failed)?;
            init.set_signal(Some(&controller.signal()));
            token.on_cancel(move || controller.abort());
        }

        let response: Response = JsFuture::from(window.fetch_with_str_and_init(&request.url, &init))
            .await
            .map_err(fetch_failed)?
            .dyn_into()
            .map_err(fetch_failed)?;

        // Body first, always; error messages quote it.
        let body = JsFuture::from(response.text().map_err(fetch_failed)?)
            .await
            .map_err(fetch_failed)?
            .as_string()
            .unwrap_or_default();
        let content_type = response.headers().get("content-type").ok().flatten();

        Ok(RawResponse {
            status: response.status(),
            status_text: response.status_text(),
            content_type,
            body,
        })
    }
}

/// View state held in a signal. Updates after the owning view is disposed
/// return `None`.
pub struct SignalStore<S: 'static>(pub RwSignal<S>);

impl<S: 'static> Clone for SignalStore<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: 'static> Copy for SignalStore<S> {}

impl<S: 'static> Store<S> for SignalStore<S> {
    fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        self.0.try_update(f)
    }
}

impl<S: 'static> SignalStore<S> {
    /// Mutates without notifying, for cleanup paths.
    pub fn update_quietly(&self, f: impl FnOnce(&mut S)) {
        self.0.try_update_untracked(f);
    }
}
