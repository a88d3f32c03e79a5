use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use crate::api::rest::handlers;
use crate::domain::service::CardService;

/// Mount the card endpoints on `router`.
///
/// `/cards/search` is a static segment and takes precedence over `/cards/{id}`.
pub fn register_routes(router: Router, service: Arc<CardService>) -> Router {
    let cards = Router::new()
        .route("/", get(handlers::welcome))
        .route(
            "/cards",
            get(handlers::list_cards)
                .post(handlers::create_card)
                .delete(handlers::delete_all_cards),
        )
        .route("/cards/search", get(handlers::search_cards))
        .route(
            "/cards/{id}",
            get(handlers::get_card)
                .put(handlers::replace_card)
                .patch(handlers::update_card)
                .delete(handlers::delete_card),
        )
        .layer(Extension(service));

    router.merge(cards)
}
