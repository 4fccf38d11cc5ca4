//! Steps shared by several routes.

use axum::http::{HeaderName, HeaderValue};

use solestore_core::GuestId;

use crate::context::{GuestContext, RequestContext, ResponseWriter};
use crate::route_handler::{Next, Step, StepResult};

/// Header carrying the guest session id in both directions.
pub const GUEST_HEADER: HeaderName = HeaderName::from_static("x-guest-id");

/// Resolve the guest session, minting a new one when the request carries no
/// usable id. The id is echoed back so the client can keep it.
pub struct CheckGuest;

#[async_trait::async_trait]
impl Step for CheckGuest {
    async fn call(&self, req: &mut RequestContext, res: &mut ResponseWriter) -> StepResult {
        let guest_id = match req.header(GUEST_HEADER.as_str()).map(str::parse::<GuestId>) {
            Some(Ok(id)) => id,
            Some(Err(e)) => {
                tracing::debug!(error = %e, "ignoring malformed guest id");
                GuestId::new()
            }
            None => GuestId::new(),
        };

        req.extensions_mut().insert(GuestContext::new(guest_id));
        if let Ok(value) = HeaderValue::from_str(&guest_id.to_string()) {
            res.set_header(GUEST_HEADER, value);
        }
        Ok(Next::Continue)
    }
}
