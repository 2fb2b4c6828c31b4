//! App Router

use salvo::Router;

use crate::{auth, carts, healthcheck, orders};

/// Every API route. Cart and order routes sit behind the session cookie guard.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(
            Router::with_path("jwt")
                .post(auth::handlers::issue::handler)
                .push(Router::with_path("refresh").post(auth::handlers::refresh::handler)),
        )
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(
                    Router::with_path("cart")
                        .get(carts::handlers::list::handler)
                        .push(Router::with_path("add").post(carts::handlers::add::handler))
                        .push(
                            Router::with_path("update/{id}")
                                .patch(carts::handlers::update::handler)
                                .put(carts::handlers::update::handler),
                        )
                        .push(
                            Router::with_path("increase/{id}")
                                .patch(carts::handlers::increase::handler),
                        )
                        .push(
                            Router::with_path("decrease/{id}")
                                .patch(carts::handlers::decrease::handler),
                        )
                        .push(
                            Router::with_path("delete/{id}")
                                .delete(carts::handlers::delete::handler),
                        ),
                )
                .push(Router::with_path("orders").post(orders::handlers::create::handler))
                .push(Router::with_path("userOrders").get(orders::handlers::index::handler)),
        )
}
