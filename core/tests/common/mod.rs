//! Test doubles shared by the controller tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use medication_core::{
    Api, ApiError, ClientConfig, FormController, HttpMethod, HttpRequest, HttpResponse,
    ListController, Notice, Notifier, Transport,
};

pub const BASE_URL: &str = "http://localhost:3000";

type Scripted = (Option<Duration>, Result<HttpResponse, ApiError>);

/// Replays canned responses in request order and records every request it
/// sees. Each response is claimed when its request arrives, then handed
/// back after its delay.
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<HttpRequest>>,
    delay: Duration,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<HttpResponse, ApiError>>) -> Self {
        Self::from_script(responses.into_iter().map(|r| (None, r)).collect())
    }

    /// Like `new`, but every response carries its own delay.
    pub fn timed(responses: Vec<(Duration, Result<HttpResponse, ApiError>)>) -> Self {
        Self::from_script(responses.into_iter().map(|(d, r)| (Some(d), r)).collect())
    }

    fn from_script(responses: VecDeque<Scripted>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// `(method, path)` pairs with the base URL stripped.
    pub fn calls(&self) -> Vec<(HttpMethod, String)> {
        self.requests()
            .into_iter()
            .map(|r| (r.method, r.path.trim_start_matches(BASE_URL).to_string()))
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.lock().unwrap().push(request);
        let (delay, response) = self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            (None, Err(ApiError::TransportError("no scripted response".to_string())))
        });
        let delay = delay.unwrap_or(self.delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        response
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices().into_iter().map(|n| n.message).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

pub struct Harness {
    pub transport: Arc<ScriptedTransport>,
    pub notifier: Arc<RecordingNotifier>,
    pub list: ListController,
    pub form: FormController,
}

pub fn harness(transport: ScriptedTransport) -> Harness {
    harness_with_config(transport, ClientConfig::new(BASE_URL))
}

pub fn harness_with_config(transport: ScriptedTransport, config: ClientConfig) -> Harness {
    let transport = Arc::new(transport);
    let notifier = Arc::new(RecordingNotifier::default());
    let api = Api::new(&config, transport.clone());
    Harness {
        list: ListController::new(api.clone(), notifier.clone()),
        form: FormController::new(api, notifier.clone()),
        transport,
        notifier,
    }
}

pub fn json(status: u16, body: serde_json::Value) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse {
        status,
        headers: Vec::new(),
        body: body.to_string(),
    })
}

pub fn empty(status: u16) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse {
        status,
        headers: Vec::new(),
        body: String::new(),
    })
}

pub fn unreachable() -> Result<HttpResponse, ApiError> {
    Err(ApiError::TransportError("connection refused".to_string()))
}
