use crate::error::Result;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::responses::GalleryResponse;

/// HTTP handler for `GET /gallery`: every stored record in store order.
pub async fn process(state: web::Data<AppState>) -> Result<HttpResponse> {
    let _guard = state.records_lock.read().await;
    let outfits = state.store.load()?;
    Ok(HttpResponse::Ok().json(GalleryResponse { outfits }))
}
