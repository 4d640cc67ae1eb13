//! Shared server state: the single in-memory task session.

use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::document::{self, DocumentIdSource, DocumentView, RandomDocumentId};
use crate::export::ExportPipeline;
use crate::surface::DocumentSurface;
use crate::task::{JobCategory, TaskGenerator, TaskRecord, ValidationError};

/// The current record and the surface rendered from it.
pub struct TaskSession {
    pub record: TaskRecord,
    pub surface: DocumentSurface,
}

impl TaskSession {
    pub fn view(&self) -> &DocumentView {
        self.surface.view()
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub generator: TaskGenerator,
    pub ids: Box<dyn DocumentIdSource>,
    pub pipeline: ExportPipeline,
    /// Held for the whole of an export, so exports on the session queue up.
    pub session: Mutex<Option<TaskSession>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self::with_parts(
            config,
            TaskGenerator::new(),
            Box::new(RandomDocumentId),
            ExportPipeline::new(),
        )
    }

    pub fn with_parts(
        config: AppConfig,
        generator: TaskGenerator,
        ids: Box<dyn DocumentIdSource>,
        pipeline: ExportPipeline,
    ) -> Self {
        Self {
            config,
            generator,
            ids,
            pipeline,
            session: Mutex::new(None),
        }
    }

    /// Validate the input, then generate a new record after the configured
    /// delay and make it the current session. Rejected input fails without
    /// waiting and leaves the session untouched.
    pub async fn submit(
        &self,
        phone_number: &str,
        category: JobCategory,
        raw_price: &str,
    ) -> Result<(TaskRecord, DocumentView), ValidationError> {
        self.generator
            .validate(phone_number, raw_price)
            .map_err(|e| {
                log::warn!("task submission rejected: {}", e);
                e
            })?;

        tokio::time::sleep(self.config.generation_delay).await;

        let record = self.generator.generate(phone_number, category, raw_price)?;
        let view = document::render(&record, self.ids.as_ref());

        let mut session = self.session.lock().await;
        *session = Some(TaskSession {
            record: record.clone(),
            surface: DocumentSurface::new(view.clone()),
        });
        log::info!(
            "new task session for {} ({})",
            record.phone_number(),
            record.job_category().as_str()
        );
        Ok((record, view))
    }

    /// Snapshot of the current record and document, if any.
    pub async fn current(&self) -> Option<(TaskRecord, DocumentView)> {
        self.session
            .lock()
            .await
            .as_ref()
            .map(|s| (s.record.clone(), s.view().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FixedDocumentId;
    use crate::task::FixedClock;
    use chrono::{FixedOffset, TimeZone};
    use std::time::Duration;

    fn state() -> AppState {
        let config = AppConfig {
            generation_delay: Duration::ZERO,
            ..AppConfig::default()
        };
        let clock = FixedClock(
            FixedOffset::east_opt(7 * 3600)
                .unwrap()
                .with_ymd_and_hms(2026, 10, 19, 9, 41, 0)
                .unwrap(),
        );
        AppState::with_parts(
            config,
            TaskGenerator::with_clock(clock),
            Box::new(FixedDocumentId("ABCDEFGH1".to_string())),
            ExportPipeline::new(),
        )
    }

    #[tokio::test]
    async fn submit_replaces_session() {
        let state = state();
        assert!(state.current().await.is_none());

        state.submit("0811", JobCategory::Single, "1000").await.unwrap();
        let (record, view) = state
            .submit("0822", JobCategory::Penta, "2000")
            .await
            .unwrap();

        let (current, current_view) = state.current().await.unwrap();
        assert_eq!(current, record);
        assert_eq!(current_view, view);
        assert_eq!(current.phone_number(), "0822");
        assert_eq!(view.account.product_price, "Rp2.000");
    }

    #[tokio::test]
    async fn rejected_submission_keeps_previous_session() {
        let state = state();
        state.submit("0811", JobCategory::Single, "1000").await.unwrap();

        let err = state.submit("", JobCategory::Single, "1000").await.unwrap_err();
        assert_eq!(err.field(), "phoneNumber");
        assert_eq!(state.current().await.unwrap().0.phone_number(), "0811");
    }

    #[tokio::test(start_paused = true)]
    async fn submit_waits_generation_delay() {
        let mut state = state();
        state.config.generation_delay = Duration::from_millis(800);

        let started = tokio::time::Instant::now();
        state.submit("0811", JobCategory::Single, "1000").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(800));
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_submission_returns_without_delay() {
        let mut state = state();
        state.config.generation_delay = Duration::from_millis(800);

        let started = tokio::time::Instant::now();
        let err = state.submit("", JobCategory::Single, "1000").await.unwrap_err();
        assert_eq!(err.field(), "phoneNumber");
        assert!(started.elapsed() < Duration::from_millis(800));
        assert!(state.current().await.is_none());
    }
}
