#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use compliance_core::http::{ApiRequest, RawResponse, Transport};
use compliance_core::{ApiConfig, CancelToken, ComplianceClient, FetchError};
use futures::channel::oneshot;

pub enum Reply {
    Now(Result<RawResponse, FetchError>),
    /// Held until the test sends a response through the paired sender.
    Gate(oneshot::Receiver<RawResponse>),
}

/// In-memory transport answering requests from a script, in order.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Rc<RefCell<VecDeque<Reply>>>,
    requests: Rc<RefCell<Vec<ApiRequest>>>,
}

impl ScriptedTransport {
    pub fn reply(&self, response: RawResponse) -> &Self {
        self.replies.borrow_mut().push_back(Reply::Now(Ok(response)));
        self
    }

    pub fn fail(&self, error: FetchError) -> &Self {
        self.replies.borrow_mut().push_back(Reply::Now(Err(error)));
        self
    }

    pub fn gate(&self) -> oneshot::Sender<RawResponse> {
        let (tx, rx) = oneshot::channel();
        self.replies.borrow_mut().push_back(Reply::Gate(rx));
        tx
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|r| r.url.clone()).collect()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest, cancel: Option<&CancelToken>) -> Result<RawResponse, FetchError> {
        self.requests.borrow_mut().push(request);
        let reply = self
            .replies
            .borrow_mut()
            .pop_front()
            .expect("unscripted request");
        let result = match reply {
            Reply::Now(result) => result,
            Reply::Gate(rx) => rx.await.map_err(|_| FetchError::Network("gate dropped".into())),
        };
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(FetchError::Aborted);
        }
        result
    }
}

pub fn client(transport: &ScriptedTransport) -> ComplianceClient<ScriptedTransport> {
    ComplianceClient::new(transport.clone(), ApiConfig::default())
}

pub fn json(body: serde_json::Value) -> RawResponse {
    RawResponse {
        status: 200,
        status_text: "OK".into(),
        content_type: Some("application/json".into()),
        body: body.to_string(),
    }
}

pub fn html(status: u16, body: &str) -> RawResponse {
    RawResponse {
        status,
        status_text: if status == 200 { "OK".into() } else { "Error".into() },
        content_type: Some("text/html; charset=utf-8".into()),
        body: body.into(),
    }
}

pub fn empty(status: u16) -> RawResponse {
    RawResponse {
        status,
        status_text: "No Content".into(),
        content_type: None,
        body: String::new(),
    }
}
