// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Asynchronous event dispatch.
//!
//! Handlers hand entries to [`EventService::log`], which enqueues them and
//! returns immediately. A background task drains the queue and fans each
//! entry out to the configured sinks; a failing sink is logged and skipped so
//! one broken sink cannot stall the log.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::SendError};
use tracing::{instrument, warn};

use crate::event::EventEntry;
use crate::sink::EventSink;

pub struct EventService {
	tx: mpsc::Sender<EventEntry>,
}

impl EventService {
	pub fn new(queue_capacity: usize, sinks: Vec<Arc<dyn EventSink>>) -> Self {
		let (tx, rx) = mpsc::channel(queue_capacity);

		tokio::spawn(Self::background_task(rx, sinks));

		Self { tx }
	}

	async fn background_task(mut rx: mpsc::Receiver<EventEntry>, sinks: Vec<Arc<dyn EventSink>>) {
		while let Some(entry) = rx.recv().await {
			let entry = Arc::new(entry);

			for sink in &sinks {
				let sink = Arc::clone(sink);
				let entry = Arc::clone(&entry);

				tokio::spawn(async move {
					if let Err(e) = sink.publish(entry).await {
						warn!(sink = sink.name(), error = %e, "event sink publish failed");
					}
				});
			}
		}
	}

	/// Queue an event for dispatch.
	///
	/// Returns `true` if the event was queued, `false` if the queue is full
	/// and the entry was dropped.
	#[instrument(skip(self, entry), fields(event_type = %entry.event_type))]
	pub fn log(&self, entry: EventEntry) -> bool {
		let queued = self.tx.try_send(entry).is_ok();
		if !queued {
			warn!("event queue full, entry dropped");
		}
		queued
	}

	/// Queue an event, waiting for queue capacity. Used by tests and batch
	/// jobs that must not lose entries.
	pub async fn log_blocking(&self, entry: EventEntry) -> Result<(), SendError<EventEntry>> {
		self.tx.send(entry).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::EventSinkError;
	use crate::event::{EventActor, EventType, SystemUser};
	use async_trait::async_trait;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use tokio::time::{sleep, Duration};

	struct CountingSink {
		publish_count: Arc<AtomicUsize>,
	}

	#[async_trait]
	impl EventSink for CountingSink {
		fn name(&self) -> &str {
			"counting"
		}

		async fn publish(&self, _entry: Arc<EventEntry>) -> Result<(), EventSinkError> {
			self.publish_count.fetch_add(1, Ordering::SeqCst);
			Ok(())
		}
	}

	struct FailingSink;

	#[async_trait]
	impl EventSink for FailingSink {
		fn name(&self) -> &str {
			"failing"
		}

		async fn publish(&self, _entry: Arc<EventEntry>) -> Result<(), EventSinkError> {
			Err(EventSinkError::Other("intentional".to_string()))
		}
	}

	fn entry() -> EventEntry {
		EventEntry::builder(
			EventType::GroupCreated,
			EventActor::System(SystemUser::Scim),
		)
		.build()
	}

	#[tokio::test]
	async fn events_reach_all_sinks() {
		let count_a = Arc::new(AtomicUsize::new(0));
		let count_b = Arc::new(AtomicUsize::new(0));
		let service = EventService::new(
			16,
			vec![
				Arc::new(CountingSink {
					publish_count: Arc::clone(&count_a),
				}),
				Arc::new(CountingSink {
					publish_count: Arc::clone(&count_b),
				}),
			],
		);

		service.log_blocking(entry()).await.unwrap();
		service.log_blocking(entry()).await.unwrap();

		// Dispatch is async; give the background task a moment.
		sleep(Duration::from_millis(50)).await;

		assert_eq!(count_a.load(Ordering::SeqCst), 2);
		assert_eq!(count_b.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn failing_sink_does_not_block_others() {
		let count = Arc::new(AtomicUsize::new(0));
		let service = EventService::new(
			16,
			vec![
				Arc::new(FailingSink),
				Arc::new(CountingSink {
					publish_count: Arc::clone(&count),
				}),
			],
		);

		service.log_blocking(entry()).await.unwrap();
		sleep(Duration::from_millis(50)).await;

		assert_eq!(count.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn log_reports_queue_state() {
		let service = EventService::new(16, vec![]);
		assert!(service.log(entry()));
	}
}
