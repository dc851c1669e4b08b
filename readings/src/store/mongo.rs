use super::{Connector, ReadingStore};
use crate::errors::{Error, Result};
use crate::model::{NewReading, Reading, ReadingFilter};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_DATABASE: &str = "test";
pub const DEFAULT_COLLECTION: &str = "dados";

/// Store-side shape of a reading.
#[derive(Debug, Serialize, Deserialize)]
struct ReadingDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    temperatura: f64,
    umidade: f64,
    dispositivo: String,
    timestamp: BsonDateTime,
}

impl From<NewReading> for ReadingDocument {
    fn from(reading: NewReading) -> Self {
        Self {
            id: None,
            temperatura: reading.temperature,
            umidade: reading.humidity,
            dispositivo: reading.device,
            timestamp: BsonDateTime::from_millis(reading.timestamp.timestamp_millis()),
        }
    }
}

impl TryFrom<ReadingDocument> for Reading {
    type Error = Error;

    fn try_from(document: ReadingDocument) -> Result<Self> {
        let id = document
            .id
            .ok_or_else(|| Error::store("MongoDB returned a document without _id"))?;
        let millis = document.timestamp.timestamp_millis();
        let timestamp = Utc
            .timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| Error::store(format!("timestamp {} is out of range", millis)))?;

        Ok(Reading {
            id: id.to_hex(),
            temperature: document.temperatura,
            humidity: document.umidade,
            device: document.dispositivo,
            timestamp,
        })
    }
}

fn filter_document(filter: &ReadingFilter) -> Document {
    match &filter.device {
        Some(device) => doc! { "dispositivo": device },
        None => doc! {},
    }
}

/// Opens MongoDB clients. `database` overrides the one named in the URI.
#[derive(Debug, Clone)]
pub struct MongoConnector {
    database: Option<String>,
    collection: String,
}

impl MongoConnector {
    pub fn new(database: Option<String>, collection: impl Into<String>) -> Self {
        Self {
            database,
            collection: collection.into(),
        }
    }
}

impl Default for MongoConnector {
    fn default() -> Self {
        Self::new(None, DEFAULT_COLLECTION)
    }
}

#[async_trait]
impl Connector for MongoConnector {
    async fn connect(&self, uri: &str) -> Result<Arc<dyn ReadingStore>> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(Error::connection)?;

        let database = match (&self.database, client.default_database()) {
            (Some(name), _) => client.database(name),
            (None, Some(database)) => database,
            (None, None) => client.database(DEFAULT_DATABASE),
        };

        // The driver connects lazily; ping so an unreachable server fails here.
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(Error::connection)?;

        info!(
            "MongoDB connected (database={}, collection={})",
            database.name(),
            self.collection
        );

        Ok(Arc::new(MongoStore {
            collection: database.collection(&self.collection),
        }))
    }
}

pub struct MongoStore {
    collection: Collection<ReadingDocument>,
}

#[async_trait]
impl ReadingStore for MongoStore {
    async fn insert(&self, reading: NewReading) -> Result<String> {
        let result = self
            .collection
            .insert_one(ReadingDocument::from(reading))
            .await?;

        result
            .inserted_id
            .as_object_id()
            .map(|id| id.to_hex())
            .ok_or_else(|| Error::store("MongoDB returned a non-ObjectId identifier"))
    }

    async fn find_latest(&self, filter: &ReadingFilter, limit: u32) -> Result<Vec<Reading>> {
        let mut cursor = self
            .collection
            .find(filter_document(filter))
            .sort(doc! { "timestamp": -1 })
            .limit(i64::from(limit))
            .await?;

        let mut readings: Vec<Reading> = Vec::new();
        while cursor.advance().await? {
            readings.push(Reading::try_from(cursor.deserialize_current()?)?);
        }

        debug!("Fetched {} readings (limit={})", readings.len(), limit);
        Ok(readings)
    }

    async fn count(&self, filter: &ReadingFilter) -> Result<u64> {
        Ok(self
            .collection
            .count_documents(filter_document(filter))
            .await?)
    }
}
