//! Error taxonomy shared by the extractors and the route handlers.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use validator::ValidationErrors;

pub const VALIDATION_FAILED: &str = "The given data was invalid.";
const SERVER_ERROR: &str = "Server Error";

#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more fillable fields failed validation.
    #[error("{}", VALIDATION_FAILED)]
    Validation(#[from] ValidationErrors),

    /// The path identifier does not resolve to a stored article.
    #[error("No article found with id: {0}")]
    NotFound(String),

    /// No route matches the request.
    #[error("Not Found")]
    NoRoute,

    /// The body could not be read as a JSON object.
    #[error("{0}")]
    MalformedBody(String),

    /// Any failure of the store or of the plumbing around it.
    #[error("{}", SERVER_ERROR)]
    Store(#[from] anyhow::Error),
}

impl From<diesel::result::Error> for ApiError {
    fn from(e: diesel::result::Error) -> Self {
        ApiError::Store(e.into())
    }
}

impl From<r2d2::Error> for ApiError {
    fn from(e: r2d2::Error) -> Self {
        ApiError::Store(e.into())
    }
}

impl From<actix_web::error::BlockingError> for ApiError {
    fn from(e: actix_web::error::BlockingError) -> Self {
        ApiError::Store(anyhow::anyhow!("blocking task failed: {}", e))
    }
}

#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Flattens validator output into `field -> [message, ...]`.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("The {} field is invalid.", field),
                })
                .collect();
            (field.to_owned(), messages)
        })
        .collect()
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) | ApiError::NoRoute => StatusCode::NOT_FOUND,
            ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let errors = match self {
            ApiError::Validation(errors) => Some(field_messages(errors)),
            ApiError::Store(cause) => {
                error!("{:#}", cause);
                None
            }
            _ => None,
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            success: false,
            message: self.to_string(),
            errors,
        })
    }
}
