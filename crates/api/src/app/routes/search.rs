use std::sync::Arc;

use solestore_catalog::{search, search_term};

use crate::app::dto::Success;
use crate::app::services::StoreState;
use crate::context::{RequestContext, ResponseWriter};
use crate::route_handler::{step, Next, RouteHandler, Step, StepResult};

pub fn route(store: Arc<StoreState>) -> RouteHandler {
    RouteHandler::new().get([step(SearchProducts { store })])
}

/// Title search over the whole catalog, `?search=` or `?q=`.
pub struct SearchProducts {
    store: Arc<StoreState>,
}

#[async_trait::async_trait]
impl Step for SearchProducts {
    async fn call(&self, req: &mut RequestContext, res: &mut ResponseWriter) -> StepResult {
        let term = search_term(req.query());
        let results = search(self.store.products(), &term);
        tracing::debug!(term = %term, count = results.count, "search ran");

        res.json(&Success::new(
            format!("Found {} products", results.count),
            results,
        ))?;
        Ok(Next::Halt)
    }
}
