use axum::body::{Body, Bytes};
use axum::http::{
    header, request::Parts, Extensions, HeaderMap, HeaderName, HeaderValue, Method, Request,
    StatusCode, Uri,
};
use axum::response::Response;
use serde::Serialize;
use serde::de::DeserializeOwned;

use solestore_core::{GuestId, RequestId};

use crate::app::errors::ApiError;

/// Anonymous shopper attached to the request by `check_guest`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GuestContext {
    guest_id: GuestId,
}

impl GuestContext {
    pub fn new(guest_id: GuestId) -> Self {
        Self { guest_id }
    }

    pub fn guest_id(&self) -> GuestId {
        self.guest_id
    }
}

/// Incoming request as seen by handler steps.
///
/// The body is buffered before the first step runs. `extensions` carries
/// state from one step to the next.
#[derive(Debug)]
pub struct RequestContext {
    request_id: RequestId,
    parts: Parts,
    body: Bytes,
}

impl RequestContext {
    pub async fn from_request(
        request_id: RequestId,
        request: Request<Body>,
        body_limit: usize,
    ) -> Result<Self, ApiError> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, body_limit).await.map_err(|_| {
            ApiError::status(StatusCode::PAYLOAD_TOO_LARGE, "Request Body Too Large")
        })?;
        Ok(Self {
            request_id,
            parts,
            body,
        })
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    pub fn query(&self) -> &str {
        self.parts.uri.query().unwrap_or_default()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn extensions(&self) -> &Extensions {
        &self.parts.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.parts.extensions
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Decode the JSON body. Anything unreadable is a 400 "Malformed Request".
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        if self.body.is_empty() {
            return Err(ApiError::malformed());
        }
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn guest(&self) -> Result<GuestContext, ApiError> {
        self.extensions()
            .get::<GuestContext>()
            .copied()
            .ok_or_else(|| ApiError::internal("guest context missing"))
    }
}

/// Response under construction.
///
/// Once a body is written the response counts as sent: later writes are
/// dropped and the dispatcher stops advancing the chain.
#[derive(Debug)]
pub struct ResponseWriter {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    sent: bool,
}

impl Default for ResponseWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            sent: false,
        }
    }

    pub fn is_sent(&self) -> bool {
        self.sent
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn status(&mut self, status: StatusCode) -> &mut Self {
        if !self.sent {
            self.status = status;
        }
        self
    }

    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) -> &mut Self {
        if !self.sent {
            self.headers.insert(name, value);
        }
        self
    }

    /// Serialize `value` as the body and mark the response sent.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ApiError> {
        if self.sent {
            tracing::debug!("response already sent; dropping json body");
            return Ok(());
        }
        let bytes = serde_json::to_vec(value)
            .map_err(|e| ApiError::internal(format!("failed to encode response: {e}")))?;
        self.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self.body = Bytes::from(bytes);
        self.sent = true;
        Ok(())
    }

    /// Mark the response sent with an empty body.
    pub fn end(&mut self) {
        self.sent = true;
    }

    pub fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
