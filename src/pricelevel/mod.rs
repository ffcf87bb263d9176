//! Order domain types and the per-price FIFO level.
//!
//! Everything above this layer (books, registry, facade) treats orders as
//! records owned by a book's id index; price levels reference them by id
//! only, so a level lookup is one hash probe away from the payload.

mod level;
mod order;

pub use level::PriceLevel;
pub use order::{Order, OrderId, OrderStatus, OrderType, Price, Quantity, Side, SymbolId};
