//! REST transport for the remote task store.
//!
//! # Responsibility
//! - Map the four task operations onto the task service endpoints.
//! - Attach the session bearer token to every request.
//! - Translate transport/status/decode failures into store errors.
//!
//! # Invariants
//! - Responses are returned verbatim; no client-side filtering or sorting.
//! - HTTP 404 on toggle/delete means the task is gone (`NotFound`).
//! - Tokens are never logged.

use super::{RemoteError, StoreError, StoreResult};
use crate::config::RemoteConfig;
use crate::model::task::{NewTask, Task, TaskId};
use crate::policy::window::WindowBound;
use crate::session::SharedSession;
use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{Method, StatusCode};
use std::time::Instant;

const TASKS_PATH: &str = "/tasks";
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Endpoint-level contract of the remote task service.
pub trait TaskApi {
    /// `GET /tasks?date=<bound>`
    fn fetch_tasks(&self, bound: WindowBound) -> StoreResult<Vec<Task>>;
    /// `POST /tasks`
    fn post_task(&self, new_task: &NewTask) -> StoreResult<Task>;
    /// `PUT /tasks/{id}/toggle`
    fn put_toggle(&self, id: &TaskId) -> StoreResult<()>;
    /// `DELETE /tasks/{id}`
    fn delete_task(&self, id: &TaskId) -> StoreResult<()>;
}

/// Blocking reqwest client for the task service.
pub struct HttpTaskApi {
    base_url: String,
    client: Client,
    session: SharedSession,
}

impl HttpTaskApi {
    /// Builds a client with the configured request timeout.
    pub fn new(config: &RemoteConfig, session: SharedSession) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| RemoteError::Config(err.to_string()))?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            client,
            session,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match self.session.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) fn list_request(&self, bound: WindowBound) -> RequestBuilder {
        self.request(Method::GET, TASKS_PATH)
            .query(&[("date", bound.as_query_value())])
    }

    pub(crate) fn create_request(&self, new_task: &NewTask) -> RequestBuilder {
        self.request(Method::POST, TASKS_PATH).json(new_task)
    }

    pub(crate) fn toggle_request(&self, id: &TaskId) -> RequestBuilder {
        self.request(Method::PUT, &format!("{TASKS_PATH}/{id}/toggle"))
    }

    pub(crate) fn delete_request(&self, id: &TaskId) -> RequestBuilder {
        self.request(Method::DELETE, &format!("{TASKS_PATH}/{id}"))
    }
}

impl TaskApi for HttpTaskApi {
    fn fetch_tasks(&self, bound: WindowBound) -> StoreResult<Vec<Task>> {
        let response = send("list", self.list_request(bound))?;
        let response = expect_success(response)?;
        response
            .json::<Vec<Task>>()
            .map_err(|err| RemoteError::Decode(err.to_string()).into())
    }

    fn post_task(&self, new_task: &NewTask) -> StoreResult<Task> {
        let response = send("create", self.create_request(new_task))?;
        let response = expect_success(response)?;
        response
            .json::<Task>()
            .map_err(|err| RemoteError::Decode(err.to_string()).into())
    }

    fn put_toggle(&self, id: &TaskId) -> StoreResult<()> {
        let response = send("toggle", self.toggle_request(id))?;
        expect_found(response, id)
    }

    fn delete_task(&self, id: &TaskId) -> StoreResult<()> {
        let response = send("delete", self.delete_request(id))?;
        expect_found(response, id)
    }
}

fn send(operation: &'static str, builder: RequestBuilder) -> Result<Response, RemoteError> {
    let started_at = Instant::now();
    let result = builder.send();
    match &result {
        Ok(response) => debug!(
            "event=remote_request module=store op={operation} status={} duration_ms={}",
            response.status().as_u16(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => debug!(
            "event=remote_request module=store op={operation} status=error timeout={} duration_ms={}",
            err.is_timeout(),
            started_at.elapsed().as_millis()
        ),
    }
    result.map_err(map_transport_error)
}

fn map_transport_error(err: reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        RemoteError::Timeout
    } else {
        RemoteError::Transport(err.to_string())
    }
}

fn expect_success(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(status_error(status, response))
}

fn expect_found(response: Response, id: &TaskId) -> StoreResult<()> {
    if response.status() == StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound(id.clone()));
    }
    expect_success(response)?;
    Ok(())
}

fn status_error(status: StatusCode, response: Response) -> RemoteError {
    let body = response.text().unwrap_or_default();
    let mut message = body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect::<String>();
    if message.is_empty() {
        message = status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string();
    }
    RemoteError::Status {
        status: status.as_u16(),
        message,
    }
}
