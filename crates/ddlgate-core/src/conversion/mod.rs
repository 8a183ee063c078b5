//! Conversion boundary: request intake, persistence, queueing and the
//! asynchronous design step around the schema validator.

mod record;
mod request;
mod store;

use tracing::{error, info, warn};

use crate::error::{CollaboratorError, RequestError};
use crate::validator::validate_schema;

pub use record::{Accepted, ConversionRecord, ConversionStatus, QueueMessage};
pub use request::{parse_request, ConvertRequest, Submission};
pub use store::{
    ConversionQueue, DesignGenerator, InMemoryQueue, InMemoryRecordStore, RecordStore,
    StaticDesignGenerator,
};

/// Service behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionSettings {
    /// Send accepted conversions to the queue
    pub dispatch_to_queue: bool,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            dispatch_to_queue: true,
        }
    }
}

/// Accepts conversion requests: validates the schema, records it and
/// queues it for the design step
pub struct ConversionService<'a> {
    store: &'a dyn RecordStore,
    queue: &'a dyn ConversionQueue,
    settings: ConversionSettings,
}

impl<'a> ConversionService<'a> {
    pub fn new(store: &'a dyn RecordStore, queue: &'a dyn ConversionQueue) -> Self {
        Self::with_settings(store, queue, ConversionSettings::default())
    }

    pub fn with_settings(
        store: &'a dyn RecordStore,
        queue: &'a dyn ConversionQueue,
        settings: ConversionSettings,
    ) -> Self {
        Self {
            store,
            queue,
            settings,
        }
    }

    /// Handle a raw JSON request body
    pub fn submit(&self, body: &str) -> Result<Accepted, RequestError> {
        let submission = parse_request(body)?;

        let result = validate_schema(&submission.sql_content);
        if !result.is_valid {
            return Err(RequestError::invalid_schema(&result));
        }

        let record = self
            .store
            .create(
                &submission.sql_content,
                submission.optimization,
                result.tables.len(),
            )
            .map_err(|e| {
                error!(error = %e, "failed to create conversion record");
                RequestError::Internal(e)
            })?;
        info!(
            conversion_id = %record.conversion_id,
            tables = record.tables_extracted,
            optimization = %record.optimization_type,
            "conversion record created"
        );

        if self.settings.dispatch_to_queue {
            self.queue.send(&record.to_message()).map_err(|e| {
                error!(conversion_id = %record.conversion_id, error = %e, "failed to queue conversion");
                RequestError::Internal(e)
            })?;
            info!(conversion_id = %record.conversion_id, "conversion queued");
        }

        Ok(record.receipt())
    }
}

/// Error text stored on conversions that exhausted their queue retries
pub const MAX_RETRIES_EXCEEDED: &str = "Max retries exceeded";

/// Consumes queued conversions and stores the generated design
pub struct ConversionWorker<'a> {
    store: &'a dyn RecordStore,
    generator: &'a dyn DesignGenerator,
}

impl<'a> ConversionWorker<'a> {
    pub fn new(store: &'a dyn RecordStore, generator: &'a dyn DesignGenerator) -> Self {
        Self { store, generator }
    }

    /// Process one queue message body and return the final status.
    ///
    /// A generator failure marks the record FAILED and is not retried; store
    /// and decode failures are returned to the caller.
    pub fn process(&self, body: &str) -> Result<ConversionStatus, CollaboratorError> {
        let message: QueueMessage = serde_json::from_str(body)?;
        self.process_message(&message)
    }

    pub fn process_message(&self, message: &QueueMessage) -> Result<ConversionStatus, CollaboratorError> {
        let id = message.conversion_id.as_str();
        info!(
            conversion_id = id,
            optimization = %message.optimization_type,
            tables = message.tables_extracted,
            "processing conversion"
        );

        self.store.mark_processing(id)?;

        match self
            .generator
            .generate(&message.sql_content, message.optimization_type)
        {
            Ok(design) => {
                self.store.mark_completed(id, &design)?;
                info!(conversion_id = id, "conversion completed");
                Ok(ConversionStatus::Completed)
            }
            Err(e) => {
                warn!(conversion_id = id, error = %e, "design generation failed");
                if let Err(update) = self.store.mark_failed(id, &e.to_string()) {
                    error!(conversion_id = id, error = %update, "failed to mark conversion as failed");
                }
                Ok(ConversionStatus::Failed)
            }
        }
    }

    /// Handle a message that was dead-lettered after its retries ran out:
    /// the conversion is marked FAILED so it never stays in flight.
    pub fn process_dead_letter(&self, body: &str) -> Result<(), CollaboratorError> {
        let message: QueueMessage = serde_json::from_str(body).map_err(|e| {
            error!(error = %e, "failed to decode dead-lettered message");
            CollaboratorError::Codec(e)
        })?;
        let id = message.conversion_id.as_str();

        warn!(conversion_id = id, "marking conversion as failed (max retries exceeded)");
        self.store.mark_failed(id, MAX_RETRIES_EXCEEDED).map_err(|e| {
            error!(conversion_id = id, error = %e, "failed to mark conversion as failed");
            e
        })?;
        info!(conversion_id = id, "conversion marked as failed");
        Ok(())
    }
}
