//! JSON envelopes shared by every response.

use axum::http::{header, StatusCode};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::error;

use crate::cors;
use crate::errors::Error;
use crate::model::{Reading, ReadingsPage};

pub const CREATED_MESSAGE: &str = "Dados salvos com sucesso";

#[derive(Debug, Serialize)]
pub struct ListEnvelope {
    pub success: bool,
    pub total: u64,
    pub dados: Vec<Reading>,
}

impl From<ReadingsPage> for ListEnvelope {
    fn from(page: ReadingsPage) -> Self {
        Self {
            success: true,
            total: page.total,
            dados: page.readings,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedEnvelope {
    pub success: bool,
    pub message: &'static str,
    pub id: String,
}

impl CreatedEnvelope {
    pub fn new(id: String) -> Self {
        Self {
            success: true,
            message: CREATED_MESSAGE,
            id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Failure {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Failure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Transport-neutral response produced by the service and rendered by each adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn empty(status: StatusCode) -> Self {
        Self { status, body: None }
    }

    pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => Self {
                status,
                body: Some(value),
            },
            Err(e) => {
                error!("Failed to serialize response body: {}", e);
                Self::from_error(&Error::store(e))
            }
        }
    }

    pub fn from_error(err: &Error) -> Self {
        Self {
            status: err.status(),
            body: serde_json::to_value(err.to_failure()).ok(),
        }
    }

    /// Body rendered as a string, empty for body-less responses.
    pub fn body_text(&self) -> String {
        self.body.as_ref().map(Value::to_string).unwrap_or_default()
    }

    /// `{statusCode, headers, body}` document for function-style hosts.
    /// Carries the CORS policy as headers since no middleware runs there.
    pub fn to_invocation(&self) -> Value {
        let mut headers = Map::new();
        for (name, value) in cors::headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.to_string(), Value::from(value));
            }
        }
        if self.body.is_some() {
            headers.insert(
                header::CONTENT_TYPE.to_string(),
                Value::from("application/json"),
            );
        }

        serde_json::json!({
            "statusCode": self.status.as_u16(),
            "headers": headers,
            "body": self.body_text(),
        })
    }
}
