use axum::http::StatusCode;
use serde_json::json;

use crate::context::{RequestContext, ResponseWriter};
use crate::route_handler::{step, Next, RouteHandler, Step, StepResult};

pub fn route() -> RouteHandler {
    RouteHandler::new().get([step(Health)])
}

pub struct Health;

#[async_trait::async_trait]
impl Step for Health {
    async fn call(&self, _req: &mut RequestContext, res: &mut ResponseWriter) -> StepResult {
        res.status(StatusCode::OK).json(&json!({ "status": "ok" }))?;
        Ok(Next::Halt)
    }
}
