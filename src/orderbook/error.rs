//! Order book error types

use crate::pricelevel::{OrderId, OrderStatus, SymbolId};
use std::fmt;

/// Errors that can occur within the OrderBook.
///
/// These cover caller contract violations and serialization failures.
/// Engine-level outcomes (a rejected market order, an unknown cancel id)
/// are reported through order statuses and boolean returns, never through
/// this type.
#[derive(Debug)]
#[non_exhaustive]
pub enum OrderBookError {
    /// Order routed to a book for a different instrument
    SymbolMismatch {
        /// The book's symbol
        expected: SymbolId,
        /// The order's symbol
        actual: SymbolId,
    },

    /// Order submitted in a state other than `New`
    InvalidOrderStatus {
        /// The offending order id
        order_id: OrderId,
        /// The status it arrived with
        status: OrderStatus,
    },

    /// An order with this id is still live in the book
    DuplicateOrderId(OrderId),

    /// Error while serializing snapshot data
    SerializationError {
        /// Underlying error message
        message: String,
    },

    /// Error while deserializing snapshot data
    DeserializationError {
        /// Underlying error message
        message: String,
    },
}

impl fmt::Display for OrderBookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBookError::SymbolMismatch { expected, actual } => {
                write!(
                    f,
                    "symbol mismatch: book handles {expected}, order is for {actual}"
                )
            }
            OrderBookError::InvalidOrderStatus { order_id, status } => {
                write!(
                    f,
                    "invalid order status: order {order_id} submitted as {status}, expected NEW"
                )
            }
            OrderBookError::DuplicateOrderId(order_id) => {
                write!(f, "duplicate order id: {order_id} is still live")
            }
            OrderBookError::SerializationError { message } => {
                write!(f, "serialization error: {message}")
            }
            OrderBookError::DeserializationError { message } => {
                write!(f, "deserialization error: {message}")
            }
        }
    }
}

impl std::error::Error for OrderBookError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_symbol_mismatch() {
        let err = OrderBookError::SymbolMismatch {
            expected: 100,
            actual: 101,
        };
        assert_eq!(
            err.to_string(),
            "symbol mismatch: book handles 100, order is for 101"
        );
    }

    #[test]
    fn test_display_duplicate_id() {
        let err = OrderBookError::DuplicateOrderId(7);
        assert_eq!(err.to_string(), "duplicate order id: 7 is still live");
    }
}
