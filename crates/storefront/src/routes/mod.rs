//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check (in main)
//!
//! # Auth
//! POST /auth/login             - Login
//! POST /auth/register          - Register (confirmation email follows)
//! POST /auth/logout            - Logout (always clears the session)
//! GET  /auth/me                - Current session user
//!
//! # Products
//! GET  /products               - Active products (cached, optional ?q= filter)
//! POST /products               - Register product (admin)
//!
//! # Cart (session-held)
//! GET  /cart                   - Cart with derived totals
//! POST /cart/add               - Add one unit of a product
//! POST /cart/update            - Set quantity (<= 0 removes)
//! POST /cart/remove            - Remove a line
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Item count badge
//!
//! # Checkout
//! POST /checkout               - Place the order, returns the invoice id
//!
//! # Orders
//! GET  /orders                 - Caller's orders, newest first
//! GET  /orders/{id}            - Invoice (owner or admin)
//! GET  /admin/orders           - All orders (admin)
//! PUT  /admin/orders/{id}/status - Overwrite status (admin; any of the four)
//!
//! # Expenses (admin)
//! GET  /expenses               - List with overall and current-month totals
//! POST /expenses               - Record expense
//! DELETE /expenses/{id}        - Remove expense
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod expenses;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/", get(products::index).post(products::create))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the customer order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list_mine))
        .route("/{id}", get(orders::invoice))
}

/// Create the admin order-management routes router.
pub fn admin_order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::admin_list))
        .route("/{id}/status", put(orders::update_status))
}

/// Create the expense routes router.
pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(expenses::list).post(expenses::create))
        .route("/{id}", delete(expenses::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::submit))
        .nest("/orders", order_routes())
        .nest("/admin/orders", admin_order_routes())
        .nest("/expenses", expense_routes())
}
