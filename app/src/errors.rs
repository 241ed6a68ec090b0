use err_derive::Error;

use crate::orders::Status;

/// Failures reported back to the person at the counter. The display text of
/// each variant is the notice they see; the operation that raised it has
/// left stored state untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CanteenError {
    #[error(display = "Please fill in all fields")]
    MissingFields,
    #[error(display = "Password must be at least {} characters", _0)]
    PasswordTooShort(usize),
    #[error(display = "This college name is already registered")]
    CollegeExists,
    #[error(display = "Invalid college name or password")]
    InvalidCredentials,
    #[error(display = "Please select a student first")]
    NoStudentSelected,
    #[error(display = "This item is currently unavailable")]
    ItemUnavailable,
    #[error(display = "Item {} is not on the menu", _0)]
    UnknownItem(String),
    #[error(display = "Item {} is not in the cart", _0)]
    NotInCart(String),
    #[error(display = "Your cart is empty")]
    EmptyCart,
    #[error(display = "Order {} not found", _0)]
    EntryNotFound(String),
    #[error(display = "Order is already {}", _0)]
    NotPending(Status),
    #[error(display = "Orders cannot be moved back to {}", _0)]
    InvalidTransition(Status),
    #[error(display = "Please select an order to rate")]
    NoOrderSelected,
    #[error(display = "Please provide both service and taste ratings")]
    MissingRating,
    #[error(display = "Ratings must be between 1 and 5, not {}", _0)]
    RatingOutOfRange(u8),
    #[error(display = "Only completed orders can be rated")]
    NotCompleted,
    #[error(display = "This order has already been rated")]
    AlreadyRated,
}
