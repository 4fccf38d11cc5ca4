//! Per-route, per-method handler chains.
//!
//! A [`RouteHandler`] holds one ordered chain of [`Step`]s for each registered
//! HTTP method. A request runs the chain for its method, one step at a time,
//! until a step halts, fails, or writes the response.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::response::Response;
use axum::routing::MethodRouter;
use futures_util::FutureExt;
use tracing::Instrument;

use solestore_core::RequestId;

use crate::app::errors::{ApiError, FailureBody};
use crate::context::{RequestContext, ResponseWriter};

/// Default cap on buffered request bodies.
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// What a step wants the dispatcher to do next.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Next {
    /// Run the following step.
    Continue,
    /// Stop here; the step has dealt with the response.
    Halt,
}

/// `Err` short-circuits the chain and becomes a JSON failure response.
pub type StepResult = Result<Next, ApiError>;

/// One unit of a handler chain.
#[async_trait::async_trait]
pub trait Step: Send + Sync {
    async fn call(&self, req: &mut RequestContext, res: &mut ResponseWriter) -> StepResult;
}

pub type BoxedStep = Arc<dyn Step>;

/// Box a step for registration.
pub fn step<S: Step + 'static>(step: S) -> BoxedStep {
    Arc::new(step)
}

/// The methods a chain can be registered for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn from_http(method: &Method) -> Option<Self> {
        [
            (Method::GET, HttpMethod::Get),
            (Method::POST, HttpMethod::Post),
            (Method::PUT, HttpMethod::Put),
            (Method::DELETE, HttpMethod::Delete),
        ]
        .into_iter()
        .find_map(|(candidate, ours)| (*method == candidate).then_some(ours))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Chains for a single route, built once at startup.
#[derive(Clone)]
pub struct RouteHandler {
    chains: Vec<(HttpMethod, Vec<BoxedStep>)>,
    body_limit: usize,
}

impl Default for RouteHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteHandler {
    pub fn new() -> Self {
        Self {
            chains: Vec::new(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    pub fn with_body_limit(mut self, body_limit: usize) -> Self {
        self.body_limit = body_limit;
        self
    }

    pub fn get(self, steps: impl IntoIterator<Item = BoxedStep>) -> Self {
        self.register(HttpMethod::Get, steps)
    }

    pub fn post(self, steps: impl IntoIterator<Item = BoxedStep>) -> Self {
        self.register(HttpMethod::Post, steps)
    }

    pub fn put(self, steps: impl IntoIterator<Item = BoxedStep>) -> Self {
        self.register(HttpMethod::Put, steps)
    }

    pub fn delete(self, steps: impl IntoIterator<Item = BoxedStep>) -> Self {
        self.register(HttpMethod::Delete, steps)
    }

    /// Set the chain for `method`, replacing any earlier one. The method keeps
    /// its original position in `Allow`. An empty chain unregisters the method.
    pub fn register(
        mut self,
        method: HttpMethod,
        steps: impl IntoIterator<Item = BoxedStep>,
    ) -> Self {
        let steps: Vec<BoxedStep> = steps.into_iter().collect();
        match self.chains.iter().position(|(m, _)| *m == method) {
            Some(idx) if steps.is_empty() => {
                self.chains.remove(idx);
            }
            Some(idx) => self.chains[idx].1 = steps,
            None if steps.is_empty() => {}
            None => self.chains.push((method, steps)),
        }
        self
    }

    /// Registered methods in registration order.
    pub fn allowed_methods(&self) -> Vec<HttpMethod> {
        self.chains.iter().map(|(m, _)| *m).collect()
    }

    /// `Allow` header value, e.g. `GET, POST`.
    pub fn allow_header(&self) -> String {
        self.allowed_methods()
            .into_iter()
            .map(HttpMethod::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn chain(&self, method: HttpMethod) -> Option<&[BoxedStep]> {
        self.chains
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, steps)| steps.as_slice())
    }

    /// Mount on an axum route. Every method is accepted and routed through
    /// [`RouteHandler::handle`], which produces the 405s itself.
    pub fn into_method_router(self) -> MethodRouter {
        let handler = Arc::new(self);
        axum::routing::any(move |request: Request<Body>| {
            let handler = Arc::clone(&handler);
            async move { handler.handle(request).await }
        })
    }

    /// Dispatch one request.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let request_id = RequestId::new();
        let span = tracing::info_span!(
            "request",
            %request_id,
            method = %request.method(),
            path = %request.uri().path(),
        );

        async move {
            let response = self.dispatch(request_id, request).await;
            tracing::info!(status = response.status().as_u16(), "request completed");
            response
        }
        .instrument(span)
        .await
    }

    async fn dispatch(&self, request_id: RequestId, request: Request<Body>) -> Response {
        // Methods outside `HttpMethod` can never have a chain.
        let Some(chain) = HttpMethod::from_http(request.method()).and_then(|m| self.chain(m))
        else {
            return self.method_not_allowed();
        };

        let mut req = match RequestContext::from_request(request_id, request, self.body_limit).await
        {
            Ok(req) => req,
            Err(err) => return failure_response(err),
        };
        let mut res = ResponseWriter::new();

        run_chain(chain, &mut req, &mut res).await;
        res.into_response()
    }

    fn method_not_allowed(&self) -> Response {
        let mut res = ResponseWriter::new();
        if let Ok(allow) = HeaderValue::from_str(&self.allow_header()) {
            res.set_header(header::ALLOW, allow);
        }
        write_json_failure(
            &mut res,
            StatusCode::METHOD_NOT_ALLOWED,
            "Method Not Allowed".to_string(),
        );
        res.into_response()
    }
}

/// Run `chain` in order until a step halts, fails, or the response is sent.
///
/// Panics inside a step are caught at the step boundary and reported like
/// any other failure.
pub async fn run_chain(chain: &[BoxedStep], req: &mut RequestContext, res: &mut ResponseWriter) {
    for (index, step) in chain.iter().enumerate() {
        if res.is_sent() {
            tracing::debug!(step = index, "response sent; chain stopped");
            return;
        }

        tracing::debug!(step = index, "running step");
        let outcome = AssertUnwindSafe(step.call(req, res)).catch_unwind().await;

        match outcome {
            Ok(Ok(Next::Continue)) => {}
            Ok(Ok(Next::Halt)) => return,
            Ok(Err(err)) => {
                write_failure(res, err);
                return;
            }
            Err(panic) => {
                let detail = panic_message(panic.as_ref());
                tracing::error!(step = index, panic = %detail, "step panicked");
                write_failure(res, ApiError::new(""));
                return;
            }
        }
    }

    if !res.is_sent() {
        tracing::warn!("chain finished without writing a response");
    }
}

/// Write `err` as the failure body unless the response is already out.
pub fn write_failure(res: &mut ResponseWriter, err: ApiError) {
    if res.is_sent() {
        tracing::debug!(error = %err, "response already sent; error dropped");
        return;
    }
    let (status, message) = err.resolve();
    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), %message, "request failed");
    } else {
        tracing::warn!(status = status.as_u16(), %message, "request rejected");
    }
    write_json_failure(res, status, message);
}

fn write_json_failure(res: &mut ResponseWriter, status: StatusCode, message: String) {
    let body = FailureBody::new(message);
    if res.status(status).json(&body).is_err() {
        res.status(StatusCode::INTERNAL_SERVER_ERROR).end();
    }
}

fn failure_response(err: ApiError) -> Response {
    let mut res = ResponseWriter::new();
    write_failure(&mut res, err);
    res.into_response()
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
