//! Order book error types.
//!
//! Contract violations (duplicate order ids, a level's volume going
//! negative, a crossed book surviving an operation) are not represented
//! here — they are not recoverable caller mistakes, and are instead
//! reported via [`crate::fatal`], which logs and panics.

use std::fmt;

/// Errors a caller can receive back from a fallible order book operation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OrderBookError {
    /// `cancel`/`amend_size` referenced an order id that is not resting
    /// on the book (never placed, already filled, or already cancelled).
    OrderNotFound(u64),

    /// `submit_limit`/`submit_execute`/`amend_size` was given a size of
    /// zero.
    InvalidOrderSize {
        /// The order the size was rejected for.
        order_id: u64,
        /// The rejected size.
        size: u64,
    },

    /// `submit_limit`/`submit_execute` referenced price `0`, which is
    /// reserved for the market-order sentinel at the transport boundary
    /// and is never a valid resting price.
    InvalidPrice {
        /// The order the price was rejected for.
        order_id: u64,
    },

    /// An order id already resting on the book was submitted again via
    /// `submit_limit`/`submit_execute`.
    DuplicateOrderId(u64),
}

impl fmt::Display for OrderBookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBookError::OrderNotFound(id) => write!(f, "order {id} not found"),
            OrderBookError::InvalidOrderSize { order_id, size } => {
                write!(f, "order {order_id} has invalid size {size}")
            }
            OrderBookError::InvalidPrice { order_id } => {
                write!(f, "order {order_id} has invalid price 0")
            }
            OrderBookError::DuplicateOrderId(id) => write!(f, "order id {id} already exists"),
        }
    }
}

impl std::error::Error for OrderBookError {}
