//! Domain models for the storefront.

pub mod cart;
pub mod expense;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, CartItem};
pub use expense::{Expense, NewExpense};
pub use order::{InvoiceLine, NewOrder, NewOrderItem, Order, OrderItem, OrderWithItems};
pub use product::{NewProduct, Product};
pub use session::{CurrentUser, session_keys};
pub use user::{NewProfile, Profile};
