use std::sync::Arc;

use crate::app::dto::{AddToCartRequest, RemoveFromCartRequest, Success};
use crate::app::errors::ApiError;
use crate::app::services::StoreState;
use crate::context::{RequestContext, ResponseWriter};
use crate::middleware::CheckGuest;
use crate::route_handler::{step, Next, RouteHandler, Step, StepResult};

pub fn route(store: Arc<StoreState>) -> RouteHandler {
    RouteHandler::new()
        .get([step(CheckGuest), step(GetCart { store: store.clone() })])
        .post([step(CheckGuest), step(AddToCart { store: store.clone() })])
        .delete([step(CheckGuest), step(RemoveFromCart { store })])
}

pub struct GetCart {
    store: Arc<StoreState>,
}

#[async_trait::async_trait]
impl Step for GetCart {
    async fn call(&self, req: &mut RequestContext, res: &mut ResponseWriter) -> StepResult {
        let guest = req.guest()?;
        let cart = self.store.cart(guest.guest_id()).await;

        res.json(&Success::new(
            format!("Cart Items: {}", cart.len()),
            cart.summary(),
        ))?;
        Ok(Next::Halt)
    }
}

pub struct AddToCart {
    store: Arc<StoreState>,
}

#[async_trait::async_trait]
impl Step for AddToCart {
    async fn call(&self, req: &mut RequestContext, res: &mut ResponseWriter) -> StepResult {
        let guest = req.guest()?;
        let body: AddToCartRequest = req.json()?;
        let (Some(product_id), Some(qty), Some(size)) = (body.product_id, body.qty, body.size)
        else {
            return Err(ApiError::malformed());
        };
        let product = self
            .store
            .product(&product_id)
            .ok_or_else(ApiError::malformed)?;

        let line = self
            .store
            .with_cart(guest.guest_id(), |cart| cart.add(product, qty, size).cloned())
            .await?;
        tracing::info!(
            product_id = %line.product_id,
            quantity = line.quantity,
            "cart line written"
        );

        res.json(&Success::new("Product Successfully Added To Cart", line))?;
        Ok(Next::Halt)
    }
}

pub struct RemoveFromCart {
    store: Arc<StoreState>,
}

#[async_trait::async_trait]
impl Step for RemoveFromCart {
    async fn call(&self, req: &mut RequestContext, res: &mut ResponseWriter) -> StepResult {
        let guest = req.guest()?;
        let body: RemoveFromCartRequest = req.json()?;

        self.store
            .with_cart(guest.guest_id(), |cart| match (body.empty, &body.product_id) {
                (true, _) => {
                    cart.empty();
                    Ok(())
                }
                (false, Some(product_id)) => {
                    cart.remove(product_id);
                    Ok(())
                }
                (false, None) => Err(ApiError::malformed()),
            })
            .await?;

        res.json(&Success::message_only("Product Successfully Removed From Cart"))?;
        Ok(Next::Halt)
    }
}
