//! Test helpers for integration tests
//!
//! A `TestBot` runs the real JSON stores in a temporary directory with in-memory
//! chat, question, and settings collaborators. Reopening it on the same directory
//! stands in for a process restart.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use potd_core::{LiveReactionEvent, Snowflake, TaskEmoji};
use potd_service::services::testing::{
    default_settings, test_options, FakeChat, FakeQuestions, FakeSettings, POTD_CHANNEL,
};
use potd_service::{
    LiveOutcome, LiveReactionService, PotdReport, PotdService, ServiceContext,
    ServiceContextBuilder,
};
use potd_store::{JsonCursorStore, JsonMessageRegistryStore};
use serde_json::Value;
use tempfile::TempDir;

use crate::fixtures::BOT_USER;

pub const CURSOR_FILE: &str = "lastFetchedIndex.json";
pub const REGISTRY_FILE: &str = "potdMessageIds.json";

/// One bot process over a state directory
pub struct TestBot {
    pub chat: Arc<FakeChat>,
    pub questions: Arc<FakeQuestions>,
    pub settings: Arc<FakeSettings>,
    pub ctx: ServiceContext,
    dir: Arc<TempDir>,
}

impl TestBot {
    /// Start against a fresh state directory
    pub fn start(questions: FakeQuestions) -> Result<Self> {
        let dir = Arc::new(tempfile::tempdir()?);
        Ok(Self::open(
            dir,
            Arc::new(questions),
            Arc::new(FakeChat::new()),
            Arc::new(FakeSettings::new(default_settings())),
        ))
    }

    /// Start a new process on the same state directory and collaborators
    ///
    /// The ledger and live state start empty, as after a real restart.
    pub fn restart(&self) -> Self {
        Self::open(
            self.dir.clone(),
            self.questions.clone(),
            self.chat.clone(),
            self.settings.clone(),
        )
    }

    fn open(
        dir: Arc<TempDir>,
        questions: Arc<FakeQuestions>,
        chat: Arc<FakeChat>,
        settings: Arc<FakeSettings>,
    ) -> Self {
        let ctx = ServiceContextBuilder::new()
            .question_source(questions.clone())
            .settings_source(settings.clone())
            .cursor_store(Arc::new(JsonCursorStore::new(dir.path().join(CURSOR_FILE))))
            .registry_store(Arc::new(JsonMessageRegistryStore::new(
                dir.path().join(REGISTRY_FILE),
            )))
            .chat(chat.clone())
            .options(test_options())
            .build()
            .expect("all collaborators are set");
        ctx.live_state().set_bot_user(BOT_USER);

        Self {
            chat,
            questions,
            settings,
            ctx,
            dir,
        }
    }

    pub fn potd(&self) -> PotdService<'_> {
        PotdService::new(&self.ctx)
    }

    /// Boot sequence of the real process: settings, then the initial backfill
    pub async fn boot(&self) -> Result<()> {
        self.potd().load_settings().await?;
        self.potd().rebuild_backfill().await?;
        Ok(())
    }

    pub async fn run_day(&self, date: NaiveDate) -> Result<PotdReport> {
        Ok(self.potd().run_potd_on(date).await?)
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.path().join(file)
    }

    pub fn state_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Parsed content of a state file
    pub fn read_json(&self, file: &str) -> Result<Value> {
        let raw = std::fs::read_to_string(self.path(file))?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_raw(&self, file: &str, content: &str) -> Result<()> {
        std::fs::write(self.path(file), content)?;
        Ok(())
    }

    /// Registry ids as stored on disk
    pub fn registry_on_disk(&self) -> Result<Vec<i64>> {
        let value = self.read_json(REGISTRY_FILE)?;
        let ids = value["messageList"]
            .as_array()
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .filter_map(|id| id.parse().ok())
                    .collect()
            })
            .unwrap_or_default();
        Ok(ids)
    }

    /// Deliver a gateway reaction-add to the live handler
    pub fn react(&self, message_id: Snowflake, user: i64, task: usize) -> LiveOutcome {
        let event = LiveReactionEvent::added(
            POTD_CHANNEL,
            message_id,
            Snowflake::new(user),
            emoji(task),
            false,
        );
        LiveReactionService::new(&self.ctx).handle(&event)
    }

    /// Deliver a gateway reaction-remove to the live handler
    pub fn unreact(&self, message_id: Snowflake, user: i64, task: usize) -> LiveOutcome {
        let event =
            LiveReactionEvent::removed(POTD_CHANNEL, message_id, Snowflake::new(user), emoji(task));
        LiveReactionService::new(&self.ctx).handle(&event)
    }

    pub fn count(&self, user: i64) -> u32 {
        self.ctx.ledger().lock().count(Snowflake::new(user))
    }

    /// Text of every message sent to `channel_id`, in order
    pub fn sent_to(&self, channel_id: Snowflake) -> Vec<String> {
        self.chat
            .sent()
            .into_iter()
            .filter(|m| m.channel_id == channel_id)
            .map(|m| m.content)
            .collect()
    }
}

pub fn emoji(task: usize) -> &'static str {
    TaskEmoji::for_task(task).map_or("❓", TaskEmoji::as_str)
}

/// Message id of a `Posted` report
pub fn posted_id(report: &PotdReport) -> Option<Snowflake> {
    match report {
        PotdReport::Posted { message_id, .. } => *message_id,
        _ => None,
    }
}
