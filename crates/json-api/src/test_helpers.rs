//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use shopfront_app::{
    auth::{IdentityClaim, MockAuthService},
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            models::{CartLine, CartLineId},
        },
        orders::{
            MockOrdersService,
            models::{Customer, CustomerDetails, Order, OrderId, OrderLine},
        },
    },
};

use crate::{auth::middleware, extensions::*, state::State};

pub(crate) const TEST_EMAIL: &str = "a@x.com";

#[salvo::handler]
pub(crate) async fn inject_identity(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if let Some(identity) = IdentityClaim::new(TEST_EMAIL) {
        depot.insert_identity(identity);
    }

    ctrl.call_next(req, depot, res).await;
}

pub(crate) fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_issue().never();
    auth.expect_issue_pair().never();
    auth.expect_verify().never();
    auth.expect_redeem().never();

    auth
}

pub(crate) fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_list_lines().never();
    carts.expect_add_item().never();
    carts.expect_set_quantity().never();
    carts.expect_increment().never();
    carts.expect_decrement().never();
    carts.expect_remove_item().never();

    carts
}

pub(crate) fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_place_order().never();
    orders.expect_orders_for().never();

    orders
}

pub(crate) fn mock_state(
    carts: MockCartsService,
    orders: MockOrdersService,
    auth: MockAuthService,
) -> Arc<State> {
    State::from_app_context(AppContext::from_services(
        Arc::new(carts),
        Arc::new(orders),
        Arc::new(auth),
    ))
}

pub(crate) fn auth_service(auth: MockAuthService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mock_state(strict_carts_mock(), strict_orders_mock(), auth)))
            .push(route),
    )
}

/// Cart routes with the identity already established.
pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mock_state(carts, strict_orders_mock(), strict_auth_mock())))
            .hoop(inject_identity)
            .push(route),
    )
}

/// Cart routes behind the real session cookie guard.
pub(crate) fn guarded_service(
    carts: MockCartsService,
    auth: MockAuthService,
    route: Router,
) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mock_state(carts, strict_orders_mock(), auth)))
            .hoop(middleware::handler)
            .push(route),
    )
}

pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mock_state(strict_carts_mock(), orders, strict_auth_mock())))
            .hoop(inject_identity)
            .push(route),
    )
}

pub(crate) fn make_line(id: CartLineId, quantity: u32) -> CartLine {
    CartLine {
        id,
        user_id: "u1".to_string(),
        product_id: "p1".to_string(),
        quantity,
        email: TEST_EMAIL.to_string(),
        name: "Mug".to_string(),
        images: vec!["https://img.example.com/mug.png".to_string()],
        price: 12.5,
        created_at: Some(Timestamp::UNIX_EPOCH),
    }
}

pub(crate) fn make_order(quantity: u32, price: f64) -> Order {
    Order {
        id: OrderId::new(),
        customer: Customer {
            email: TEST_EMAIL.to_string(),
            details: CustomerDetails {
                name: Some("Ada".to_string()),
                ..CustomerDetails::default()
            },
        },
        items: vec![OrderLine {
            product_id: "p1".to_string(),
            name: "Mug".to_string(),
            quantity,
            price,
            images: Vec::new(),
        }],
        total: price * f64::from(quantity),
        created_at: Some(Timestamp::UNIX_EPOCH),
    }
}
