use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u32 = 50;

/// A stored sensor reading as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "temperatura")]
    pub temperature: f64,
    #[serde(rename = "umidade")]
    pub humidity: f64,
    #[serde(rename = "dispositivo")]
    pub device: String,
    pub timestamp: DateTime<Utc>,
}

/// A validated reading that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
    pub temperature: f64,
    pub humidity: f64,
    pub device: String,
    pub timestamp: DateTime<Utc>,
}

impl NewReading {
    pub fn into_reading(self, id: String) -> Reading {
        Reading {
            id,
            temperature: self.temperature,
            humidity: self.humidity,
            device: self.device,
            timestamp: self.timestamp,
        }
    }
}

/// Matches every reading when `device` is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingFilter {
    pub device: Option<String>,
}

impl ReadingFilter {
    pub fn matches(&self, reading: &Reading) -> bool {
        self.device
            .as_deref()
            .map_or(true, |device| reading.device == device)
    }
}

/// Raw POST body. Values are kept untyped so coercion rules live in `validate`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateReading {
    #[serde(rename = "temperatura")]
    pub temperature: Option<serde_json::Value>,
    #[serde(rename = "umidade")]
    pub humidity: Option<serde_json::Value>,
    #[serde(rename = "dispositivo")]
    pub device: Option<serde_json::Value>,
    pub timestamp: Option<serde_json::Value>,
}

/// Raw GET query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadingsQuery {
    #[serde(rename = "limite")]
    pub limit: Option<String>,
    #[serde(rename = "dispositivo")]
    pub device: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadingsPage {
    pub total: u64,
    pub readings: Vec<Reading>,
}
