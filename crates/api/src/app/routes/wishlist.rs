use std::sync::Arc;

use crate::app::dto::{Success, WishlistRequest};
use crate::app::errors::ApiError;
use crate::app::services::StoreState;
use crate::context::{RequestContext, ResponseWriter};
use crate::middleware::CheckGuest;
use crate::route_handler::{step, Next, RouteHandler, Step, StepResult};

pub fn route(store: Arc<StoreState>) -> RouteHandler {
    RouteHandler::new()
        .get([step(CheckGuest), step(GetWishlist { store: store.clone() })])
        .post([step(CheckGuest), step(AddToWishlist { store: store.clone() })])
        .delete([step(CheckGuest), step(RemoveFromWishlist { store })])
}

pub struct GetWishlist {
    store: Arc<StoreState>,
}

#[async_trait::async_trait]
impl Step for GetWishlist {
    async fn call(&self, req: &mut RequestContext, res: &mut ResponseWriter) -> StepResult {
        let guest = req.guest()?;
        let wishlist = self.store.wishlist(guest.guest_id()).await;

        res.json(&Success::new(
            "Successfully Retrieved Wishlist",
            wishlist.summary(),
        ))?;
        Ok(Next::Halt)
    }
}

pub struct AddToWishlist {
    store: Arc<StoreState>,
}

#[async_trait::async_trait]
impl Step for AddToWishlist {
    async fn call(&self, req: &mut RequestContext, res: &mut ResponseWriter) -> StepResult {
        let guest = req.guest()?;
        let body: WishlistRequest = req.json()?;
        let product = self.store.product(&body.product_id).ok_or_else(|| {
            ApiError::not_found(format!("Cannot find product {}", body.product_id))
        })?;

        let entry = self
            .store
            .with_wishlist(guest.guest_id(), |wishlist| wishlist.add(product).cloned())
            .await?;

        res.json(&Success::new("Product Successfully Added To Wishlist", entry))?;
        Ok(Next::Halt)
    }
}

pub struct RemoveFromWishlist {
    store: Arc<StoreState>,
}

#[async_trait::async_trait]
impl Step for RemoveFromWishlist {
    async fn call(&self, req: &mut RequestContext, res: &mut ResponseWriter) -> StepResult {
        let guest = req.guest()?;
        let body: WishlistRequest = req.json()?;

        self.store
            .with_wishlist(guest.guest_id(), |wishlist| wishlist.remove(&body.product_id))
            .await?;

        res.json(&Success::message_only("Product Successfully Removed From Wishlist"))?;
        Ok(Next::Halt)
    }
}
