use axum::http::{Method, StatusCode};
use thiserror::Error;

use crate::response::Failure;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub const MISSING_FIELDS: &str = "Campos obrigatórios: temperatura, umidade, dispositivo";
const CONNECTION_FAILURE: &str = "Erro de conexão com MongoDB";
const INTERNAL_FAILURE: &str = "Erro interno";

#[derive(Debug, Error)]
pub enum Error {
    #[error("MONGODB_URI não está definida")]
    Configuration,

    #[error("Connection error: {0}")]
    Connection(#[source] BoxError),

    #[error("{0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[source] BoxError),

    #[error("Método {0} não permitido")]
    MethodNotAllowed(Method),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn connection(err: impl Into<BoxError>) -> Self {
        Error::Connection(err.into())
    }

    pub fn store(err: impl Into<BoxError>) -> Self {
        Error::Store(err.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Error::Configuration | Error::Connection(_) | Error::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Envelope sent to the client for this error.
    pub fn to_failure(&self) -> Failure {
        match self {
            Error::Configuration => Failure::new(CONNECTION_FAILURE).with_message(self.to_string()),
            Error::Connection(source) => {
                Failure::new(CONNECTION_FAILURE).with_message(source.to_string())
            }
            Error::Store(source) => Failure::new(INTERNAL_FAILURE).with_message(source.to_string()),
            Error::Validation(_) | Error::MethodNotAllowed(_) => Failure::new(self.to_string()),
        }
    }
}

impl From<mongodb::error::Error> for Error {
    fn from(err: mongodb::error::Error) -> Self {
        Error::Store(Box::new(err))
    }
}
