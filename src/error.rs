//! Defines the app level error type and conversions to rendered HTML pages.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{html::error_view, internal_server_error::InternalServerError, not_found::NotFoundError};

/// The ways a submitted form can fail validation.
///
/// Form fields are always received as strings and parsed explicitly, so a
/// malformed value is rejected instead of being silently coerced.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum ValidationError {
    /// A required field was missing or only contained whitespace.
    #[error("the field \"{0}\" is required")]
    MissingField(&'static str),

    /// A date was not in the `YYYY-MM-DD` format or was not a real calendar date.
    #[error("\"{0}\" is not a valid date, expected the format YYYY-MM-DD")]
    InvalidDate(String),

    /// A whole number field could not be parsed.
    #[error("the field \"{field}\" must be a whole number, got \"{value}\"")]
    InvalidInteger {
        /// The name of the form field.
        field: &'static str,
        /// The raw text that was submitted.
        value: String,
    },

    /// A decimal amount could not be parsed or was not finite.
    #[error("the field \"{field}\" must be a number, got \"{value}\"")]
    InvalidAmount {
        /// The name of the form field.
        field: &'static str,
        /// The raw text that was submitted.
        value: String,
    },

    /// A numeric field was below zero.
    #[error("the field \"{0}\" cannot be negative")]
    NegativeAmount(&'static str),

    /// A numeric field was above the largest value the ledger accepts.
    #[error("the field \"{field}\" cannot be more than {max}")]
    AmountTooLarge {
        /// The name of the form field.
        field: &'static str,
        /// The largest accepted value.
        max: u64,
    },

    /// An expense category was longer than the stored column allows.
    #[error("the category cannot be longer than {max} characters, got {length}")]
    CategoryTooLong {
        /// The maximum number of characters.
        max: usize,
        /// The number of characters that was submitted.
        length: usize,
    },

    /// The combined entry form was submitted with an unrecognised form type.
    #[error("unknown form type {0:?}, expected \"income\" or \"expense\"")]
    UnknownFormType(Option<String>),
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The submitted form data was malformed.
    #[error("invalid form data: {0}")]
    Validation(#[from] ValidationError),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The spreadsheet could not be written.
    #[error("could not create the workbook: {0}")]
    Export(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(value: rust_xlsxwriter::XlsxError) -> Self {
        Error::Export(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(error) => {
                tracing::warn!("rejected form submission: {error}");
                let description = error.to_string();

                (
                    StatusCode::BAD_REQUEST,
                    error_view(
                        "Bad Request",
                        "400",
                        &description,
                        "Go back, correct the form and submit it again.",
                    ),
                )
                    .into_response()
            }
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
