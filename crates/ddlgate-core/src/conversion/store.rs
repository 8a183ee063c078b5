//! Collaborator traits and their in-memory implementations

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use chrono::{Duration, Utc};
use indexmap::IndexMap;

use crate::conversion::record::{ConversionRecord, ConversionStatus, QueueMessage};
use crate::error::CollaboratorError;
use crate::optimization::OptimizationType;

/// Persistence for conversion records
pub trait RecordStore: Send + Sync {
    /// Store a new PENDING record and return it
    fn create(
        &self,
        sql_content: &str,
        optimization: OptimizationType,
        tables_extracted: usize,
    ) -> Result<ConversionRecord, CollaboratorError>;

    fn get(&self, conversion_id: &str) -> Result<Option<ConversionRecord>, CollaboratorError>;

    fn mark_processing(&self, conversion_id: &str) -> Result<(), CollaboratorError>;

    fn mark_completed(&self, conversion_id: &str, design: &str) -> Result<(), CollaboratorError>;

    fn mark_failed(&self, conversion_id: &str, message: &str) -> Result<(), CollaboratorError>;

    /// All records, newest first
    fn list(&self) -> Result<Vec<ConversionRecord>, CollaboratorError>;
}

/// Dispatch of pending conversions for asynchronous processing
pub trait ConversionQueue: Send + Sync {
    fn send(&self, message: &QueueMessage) -> Result<(), CollaboratorError>;
}

/// Producer of a NoSQL design for a validated schema
pub trait DesignGenerator: Send + Sync {
    /// Returns the design as JSON text
    fn generate(
        &self,
        sql_content: &str,
        optimization: OptimizationType,
    ) -> Result<String, CollaboratorError>;
}

/// Record store kept in process memory
pub struct InMemoryRecordStore {
    ttl: Duration,
    records: Mutex<IndexMap<String, ConversionRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::with_ttl(Duration::hours(24))
    }

    /// Records expire `ttl` after creation
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            records: Mutex::new(IndexMap::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, IndexMap<String, ConversionRecord>>, CollaboratorError> {
        self.records.lock().map_err(|_| CollaboratorError::Unavailable {
            service: "record store",
            message: "lock poisoned".to_string(),
        })
    }

    fn update(
        &self,
        conversion_id: &str,
        apply: impl FnOnce(&mut ConversionRecord),
    ) -> Result<(), CollaboratorError> {
        let mut records = self.lock()?;
        let record = records
            .get_mut(conversion_id)
            .ok_or_else(|| CollaboratorError::RecordNotFound(conversion_id.to_string()))?;
        apply(record);
        Ok(())
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn create(
        &self,
        sql_content: &str,
        optimization: OptimizationType,
        tables_extracted: usize,
    ) -> Result<ConversionRecord, CollaboratorError> {
        let record = ConversionRecord::pending(
            sql_content,
            optimization,
            tables_extracted,
            Utc::now(),
            self.ttl,
        );
        self.lock()?
            .insert(record.conversion_id.clone(), record.clone());
        Ok(record)
    }

    fn get(&self, conversion_id: &str) -> Result<Option<ConversionRecord>, CollaboratorError> {
        Ok(self.lock()?.get(conversion_id).cloned())
    }

    fn mark_processing(&self, conversion_id: &str) -> Result<(), CollaboratorError> {
        self.update(conversion_id, |record| {
            record.status = ConversionStatus::Processing;
        })
    }

    fn mark_completed(&self, conversion_id: &str, design: &str) -> Result<(), CollaboratorError> {
        self.update(conversion_id, |record| {
            record.status = ConversionStatus::Completed;
            record.result = Some(design.to_string());
            record.error_message = None;
        })
    }

    fn mark_failed(&self, conversion_id: &str, message: &str) -> Result<(), CollaboratorError> {
        self.update(conversion_id, |record| {
            record.status = ConversionStatus::Failed;
            record.error_message = Some(message.to_string());
        })
    }

    fn list(&self) -> Result<Vec<ConversionRecord>, CollaboratorError> {
        Ok(self.lock()?.values().rev().cloned().collect())
    }
}

/// Queue that keeps sent messages in order
#[derive(Default)]
pub struct InMemoryQueue {
    messages: Mutex<VecDeque<QueueMessage>>,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, VecDeque<QueueMessage>>, CollaboratorError> {
        self.messages.lock().map_err(|_| CollaboratorError::Unavailable {
            service: "queue",
            message: "lock poisoned".to_string(),
        })
    }

    /// Messages sent so far, oldest first
    pub fn messages(&self) -> Result<Vec<QueueMessage>, CollaboratorError> {
        Ok(self.lock()?.iter().cloned().collect())
    }

    /// Remove and return the oldest message
    pub fn pop(&self) -> Result<Option<QueueMessage>, CollaboratorError> {
        Ok(self.lock()?.pop_front())
    }
}

impl ConversionQueue for InMemoryQueue {
    fn send(&self, message: &QueueMessage) -> Result<(), CollaboratorError> {
        self.lock()?.push_back(message.clone());
        Ok(())
    }
}

/// Generator that always returns the same design document
pub struct StaticDesignGenerator {
    design: String,
}

impl StaticDesignGenerator {
    pub fn new(design: impl Into<String>) -> Self {
        Self {
            design: design.into(),
        }
    }
}

impl Default for StaticDesignGenerator {
    fn default() -> Self {
        let design = serde_json::json!({
            "tables": [{
                "tableName": "users",
                "partitionKey": { "name": "userId", "type": "S" },
                "sortKey": null,
                "attributes": [
                    { "name": "userId", "type": "S" },
                    { "name": "email", "type": "S" }
                ],
                "globalSecondaryIndexes": [{
                    "indexName": "email-index",
                    "partitionKey": { "name": "email", "type": "S" },
                    "sortKey": null,
                    "projection": "ALL"
                }],
                "billingMode": "PAY_PER_REQUEST"
            }]
        });
        Self::new(design.to_string())
    }
}

impl DesignGenerator for StaticDesignGenerator {
    fn generate(
        &self,
        _sql_content: &str,
        _optimization: OptimizationType,
    ) -> Result<String, CollaboratorError> {
        Ok(self.design.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_lifecycle() {
        let store = InMemoryRecordStore::new();
        let record = store
            .create("CREATE TABLE t (id INT);", OptimizationType::Balanced, 1)
            .unwrap();
        let id = record.conversion_id.as_str();

        store.mark_processing(id).unwrap();
        assert_eq!(
            store.get(id).unwrap().unwrap().status,
            ConversionStatus::Processing
        );

        store.mark_completed(id, "{}").unwrap();
        let done = store.get(id).unwrap().unwrap();
        assert_eq!(done.status, ConversionStatus::Completed);
        assert_eq!(done.result.as_deref(), Some("{}"));
    }

    #[test]
    fn test_unknown_record() {
        let store = InMemoryRecordStore::new();
        assert!(store.get("missing").unwrap().is_none());
        assert!(matches!(
            store.mark_failed("missing", "boom"),
            Err(CollaboratorError::RecordNotFound(_))
        ));
    }

    #[test]
    fn test_list_newest_first() {
        let store = InMemoryRecordStore::new();
        let first = store.create("a", OptimizationType::Balanced, 1).unwrap();
        let second = store.create("b", OptimizationType::Balanced, 1).unwrap();

        let ids: Vec<String> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|r| r.conversion_id)
            .collect();
        assert_eq!(ids, vec![second.conversion_id, first.conversion_id]);
    }

    #[test]
    fn test_queue_order() {
        let queue = InMemoryQueue::new();
        for id in ["a", "b"] {
            queue
                .send(&QueueMessage {
                    conversion_id: id.to_string(),
                    sql_content: String::new(),
                    optimization_type: OptimizationType::Balanced,
                    tables_extracted: 0,
                })
                .unwrap();
        }
        assert_eq!(queue.messages().unwrap().len(), 2);
        assert_eq!(queue.pop().unwrap().unwrap().conversion_id, "a");
        assert_eq!(queue.pop().unwrap().unwrap().conversion_id, "b");
        assert!(queue.pop().unwrap().is_none());
    }

    #[test]
    fn test_poisoned_queue_is_unavailable() {
        let queue = InMemoryQueue::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = queue.messages.lock().unwrap();
            panic!("poison the queue lock");
        }));
        assert!(result.is_err());

        assert!(matches!(
            queue.messages(),
            Err(CollaboratorError::Unavailable { service: "queue", .. })
        ));
        assert!(matches!(
            queue.pop(),
            Err(CollaboratorError::Unavailable { service: "queue", .. })
        ));
        let message = QueueMessage {
            conversion_id: "a".to_string(),
            sql_content: String::new(),
            optimization_type: OptimizationType::Balanced,
            tables_extracted: 0,
        };
        assert!(matches!(
            queue.send(&message),
            Err(CollaboratorError::Unavailable { service: "queue", .. })
        ));
    }

    #[test]
    fn test_static_design_is_json() {
        let design = StaticDesignGenerator::default()
            .generate("sql", OptimizationType::ReadHeavy)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&design).unwrap();
        assert_eq!(value["tables"][0]["billingMode"], "PAY_PER_REQUEST");
    }
}
