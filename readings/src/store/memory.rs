//! In-process store, used to exercise the service without a database.

use super::{Connector, ReadingStore};
use crate::errors::Result;
use crate::model::{NewReading, Reading, ReadingFilter};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    readings: RwLock<Vec<Reading>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.readings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.readings.read().await.is_empty()
    }
}

#[async_trait]
impl ReadingStore for MemoryStore {
    async fn insert(&self, reading: NewReading) -> Result<String> {
        let id = ObjectId::new().to_hex();
        self.readings
            .write()
            .await
            .push(reading.into_reading(id.clone()));
        Ok(id)
    }

    async fn find_latest(&self, filter: &ReadingFilter, limit: u32) -> Result<Vec<Reading>> {
        let readings = self.readings.read().await;
        let mut matching: Vec<Reading> = readings
            .iter()
            .filter(|reading| filter.matches(reading))
            .cloned()
            .collect();

        // Ties go to the most recently inserted reading.
        matching.reverse();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matching.truncate(limit as usize);
        Ok(matching)
    }

    async fn count(&self, filter: &ReadingFilter) -> Result<u64> {
        let readings = self.readings.read().await;
        Ok(readings.iter().filter(|reading| filter.matches(reading)).count() as u64)
    }
}

/// Hands out the same shared store on every connect and counts the calls.
#[derive(Default)]
pub struct MemoryConnector {
    store: Arc<MemoryStore>,
    connects: AtomicUsize,
}

impl MemoryConnector {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            store,
            connects: AtomicUsize::new(0),
        }
    }

    pub fn store(&self) -> Arc<MemoryStore> {
        self.store.clone()
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self, _uri: &str) -> Result<Arc<dyn ReadingStore>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(self.store.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn reading(device: &str, minutes_ago: i64) -> NewReading {
        NewReading {
            temperature: 20.0,
            humidity: 50.0,
            device: device.to_string(),
            timestamp: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn test_find_latest_orders_newest_first() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            store.insert(reading("a", 10)).await.unwrap();
            store.insert(reading("a", 1)).await.unwrap();
            store.insert(reading("a", 5)).await.unwrap();

            let found = store
                .find_latest(&ReadingFilter::default(), 10)
                .await
                .unwrap();
            assert_eq!(found.len(), 3);
            assert!(found.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        });
    }

    #[test]
    fn test_count_ignores_limit() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            for i in 0..5 {
                store.insert(reading("a", i)).await.unwrap();
            }
            store.insert(reading("b", 0)).await.unwrap();

            let filter = ReadingFilter {
                device: Some("a".to_string()),
            };
            assert_eq!(store.find_latest(&filter, 2).await.unwrap().len(), 2);
            assert_eq!(store.count(&filter).await.unwrap(), 5);
            assert_eq!(store.count(&ReadingFilter::default()).await.unwrap(), 6);
        });
    }

    #[test]
    fn test_connector_shares_one_store() {
        tokio_test::block_on(async {
            let connector = MemoryConnector::default();
            let store = connector.connect("memory://").await.unwrap();
            store.insert(reading("a", 0)).await.unwrap();

            assert_eq!(connector.store().len().await, 1);
            assert_eq!(connector.connect_count(), 1);
        });
    }
}
