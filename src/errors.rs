//! Unified error types for the marketplace service.
//!
//! Every fallible operation in `core`, `config` and `api` returns [`Result`].
//! The API layer maps each variant to an HTTP status code.

use thiserror::Error;

/// All errors produced by the service
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration or seed-file problem
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Input failed validation
    #[error("Validation error: {message}")]
    Validation {
        /// Which rule was broken
        message: String,
    },

    /// A price or total was negative, zero, or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected value
        amount: f64,
    },

    /// No user with this ID
    #[error("User not found: {id}")]
    UserNotFound {
        /// The requested ID
        id: String,
    },

    /// No product with this ID
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// The requested ID
        id: String,
    },

    /// No article with this ID
    #[error("Article not found: {id}")]
    ArticleNotFound {
        /// The requested ID
        id: String,
    },

    /// No order with this ID
    #[error("Order not found: {id}")]
    OrderNotFound {
        /// The requested ID
        id: String,
    },

    /// No conversation with this ID
    #[error("Conversation not found: {id}")]
    ConversationNotFound {
        /// The requested ID
        id: String,
    },

    /// Another account already uses this email
    #[error("Email already exists: {email}")]
    EmailTaken {
        /// The conflicting email
        email: String,
    },

    /// Login failed
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Order quantity exceeds what the farmer has in stock
    #[error("Insufficient stock: {available} available, {requested} requested")]
    InsufficientStock {
        /// Units currently in stock
        available: i32,
        /// Units the buyer asked for
        requested: i32,
    },

    /// Order status change that is not allowed from the current status
    #[error("Cannot change order status from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// Feature requires the PRO plan
    #[error("Feature '{feature}' requires the PRO plan")]
    PlanRequired {
        /// Name of the locked feature
        feature: String,
    },

    /// The acting user is not allowed to touch this record
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Why access was refused
        message: String,
    },

    /// Password hashing failure
    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// Socket or file I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
