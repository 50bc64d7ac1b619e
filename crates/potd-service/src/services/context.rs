//! Service context - dependency container for services
//!
//! Holds every collaborator, the shared reaction ledger, and the runtime options.

use std::sync::Arc;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use potd_common::AppConfig;
use potd_core::traits::{
    ChatClient, CursorStore, MessageRegistryStore, QuestionSource, SettingsSource,
};
use tokio::sync::Mutex as AsyncMutex;

use super::error::{ServiceError, ServiceResult};
use super::ledger::{ReactionLedger, SharedLedger};
use super::live::LiveState;

/// Tunables the services read at runtime
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    /// Questions per announcement
    pub batch_size: u32,
    /// Entries shown on the leaderboard
    pub leaderboard_limit: usize,
    /// Leaderboard entries per message
    pub leaderboard_chunk_size: usize,
    /// Pause between messages during a backfill scan
    pub backfill_delay: Duration,
    /// Users requested per reaction page
    pub reaction_page_size: u32,
    /// Maximum ids collected when seeding the registry from channel history
    pub message_scan_limit: usize,
    /// Timezone announcement dates are rendered in
    pub utc_offset: FixedOffset,
}

impl ServiceOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            batch_size: config.potd.batch_size,
            leaderboard_limit: config.leaderboard.limit,
            leaderboard_chunk_size: config.leaderboard.chunk_size,
            backfill_delay: Duration::from_millis(config.backfill.delay_ms),
            reaction_page_size: config.backfill.reaction_page_size,
            message_scan_limit: config.backfill.message_scan_limit,
            utc_offset: config.schedule.offset(),
        }
    }
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            batch_size: 2,
            leaderboard_limit: 50,
            leaderboard_chunk_size: 20,
            backfill_delay: Duration::from_secs(1),
            reaction_page_size: 100,
            message_scan_limit: 200,
            utc_offset: FixedOffset::east_opt(330 * 60).unwrap_or_else(|| Utc.fix()),
        }
    }
}

/// Service context containing all dependencies
///
/// Cloning is cheap; every clone shares the same ledger, live state, and
/// announcement guard.
#[derive(Clone)]
pub struct ServiceContext {
    // Collaborators
    question_source: Arc<dyn QuestionSource>,
    settings_source: Arc<dyn SettingsSource>,
    cursor_store: Arc<dyn CursorStore>,
    registry_store: Arc<dyn MessageRegistryStore>,
    chat: Arc<dyn ChatClient>,

    // Shared state
    ledger: SharedLedger,
    live_state: Arc<LiveState>,
    potd_guard: Arc<AsyncMutex<()>>,

    options: ServiceOptions,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        question_source: Arc<dyn QuestionSource>,
        settings_source: Arc<dyn SettingsSource>,
        cursor_store: Arc<dyn CursorStore>,
        registry_store: Arc<dyn MessageRegistryStore>,
        chat: Arc<dyn ChatClient>,
        options: ServiceOptions,
    ) -> Self {
        Self {
            question_source,
            settings_source,
            cursor_store,
            registry_store,
            chat,
            ledger: ReactionLedger::new().shared(),
            live_state: Arc::new(LiveState::default()),
            potd_guard: Arc::new(AsyncMutex::new(())),
            options,
        }
    }

    // === Collaborators ===

    /// Get the question source
    pub fn question_source(&self) -> &dyn QuestionSource {
        self.question_source.as_ref()
    }

    /// Get the settings source
    pub fn settings_source(&self) -> &dyn SettingsSource {
        self.settings_source.as_ref()
    }

    /// Get the cursor store
    pub fn cursor_store(&self) -> &dyn CursorStore {
        self.cursor_store.as_ref()
    }

    /// Get the message registry store
    pub fn registry_store(&self) -> &dyn MessageRegistryStore {
        self.registry_store.as_ref()
    }

    /// Get the chat platform client
    pub fn chat(&self) -> &dyn ChatClient {
        self.chat.as_ref()
    }

    // === Shared State ===

    /// Get the shared reaction ledger
    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    /// Get the live event filter state
    pub fn live_state(&self) -> &LiveState {
        self.live_state.as_ref()
    }

    /// Guard serializing cursor decisions and their persistence
    pub fn potd_guard(&self) -> &AsyncMutex<()> {
        self.potd_guard.as_ref()
    }

    // === Options ===

    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("collaborators", &"...")
            .field("ledger_entries", &self.ledger.lock().len())
            .field("options", &self.options)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    question_source: Option<Arc<dyn QuestionSource>>,
    settings_source: Option<Arc<dyn SettingsSource>>,
    cursor_store: Option<Arc<dyn CursorStore>>,
    registry_store: Option<Arc<dyn MessageRegistryStore>>,
    chat: Option<Arc<dyn ChatClient>>,
    options: Option<ServiceOptions>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn question_source(mut self, source: Arc<dyn QuestionSource>) -> Self {
        self.question_source = Some(source);
        self
    }

    pub fn settings_source(mut self, source: Arc<dyn SettingsSource>) -> Self {
        self.settings_source = Some(source);
        self
    }

    pub fn cursor_store(mut self, store: Arc<dyn CursorStore>) -> Self {
        self.cursor_store = Some(store);
        self
    }

    pub fn registry_store(mut self, store: Arc<dyn MessageRegistryStore>) -> Self {
        self.registry_store = Some(store);
        self
    }

    pub fn chat(mut self, chat: Arc<dyn ChatClient>) -> Self {
        self.chat = Some(chat);
        self
    }

    pub fn options(mut self, options: ServiceOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.question_source
                .ok_or_else(|| ServiceError::validation("question_source is required"))?,
            self.settings_source
                .ok_or_else(|| ServiceError::validation("settings_source is required"))?,
            self.cursor_store
                .ok_or_else(|| ServiceError::validation("cursor_store is required"))?,
            self.registry_store
                .ok_or_else(|| ServiceError::validation("registry_store is required"))?,
            self.chat
                .ok_or_else(|| ServiceError::validation("chat is required"))?,
            self.options.unwrap_or_default(),
        ))
    }
}
