//! In-memory collaborators for tests
//!
//! Enabled for this crate's unit tests and, through the `test-support` feature, for
//! the integration test crate.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use potd_core::{
    ChannelInfo, ChannelMessage, ChatClient, Cursor, CursorStore, DomainError,
    MessageRegistryStore, PortResult, QuestionRow, QuestionSource, ReactionCount, ReactionUser,
    Settings, SettingsSource, Snowflake, TaskEmoji,
};

use super::context::{ServiceContext, ServiceOptions};

pub const POTD_CHANNEL: Snowflake = Snowflake::new(100);
pub const TEST_CHANNEL: Snowflake = Snowflake::new(200);
pub const LEADERBOARD_CHANNEL: Snowflake = Snowflake::new(300);
pub const ROLE: Snowflake = Snowflake::new(900);
pub const BOT_USER: Snowflake = Snowflake::new(1);

/// Settings used unless a test overrides them
pub fn default_settings() -> Settings {
    Settings {
        potd_channel_id: POTD_CHANNEL,
        test_channel_id: TEST_CHANNEL,
        leaderboard_channel_id: LEADERBOARD_CHANNEL,
        role_ids: vec![ROLE],
        debug: false,
        leaderboard_enabled: true,
    }
}

// ============================================================================
// Chat
// ============================================================================

/// A message the fake received through `send_message`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub content: String,
}

#[derive(Default)]
struct ChatState {
    history: HashMap<Snowflake, BTreeSet<Snowflake>>,
    reactions: HashMap<Snowflake, BTreeMap<TaskEmoji, Vec<ReactionUser>>>,
    sent: Vec<SentMessage>,
    bot_reactions: Vec<(Snowflake, TaskEmoji)>,
    broken_messages: HashSet<Snowflake>,
    failing_pages: HashSet<(Snowflake, TaskEmoji, Option<Snowflake>)>,
    next_id: i64,
}

/// Chat platform held in memory
#[derive(Default)]
pub struct FakeChat {
    state: Mutex<ChatState>,
    fail_sends: AtomicBool,
    fail_reacts: AtomicBool,
    reaction_page_requests: AtomicUsize,
}

impl FakeChat {
    pub fn new() -> Self {
        let chat = Self::default();
        chat.state.lock().next_id = 10_000;
        chat
    }

    /// Put a message into a channel's history
    pub fn add_message(&self, channel_id: Snowflake, message_id: Snowflake) {
        let mut state = self.state.lock();
        state.history.entry(channel_id).or_default().insert(message_id);
        state.reactions.entry(message_id).or_default();
    }

    /// Record reactions with `emoji` by the given human and bot users
    pub fn add_reactors(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: TaskEmoji,
        humans: &[i64],
        bots: &[i64],
    ) {
        self.add_message(channel_id, message_id);
        let mut state = self.state.lock();
        let users = state
            .reactions
            .entry(message_id)
            .or_default()
            .entry(emoji)
            .or_default();
        users.extend(humans.iter().map(|id| ReactionUser::new(Snowflake::new(*id), false)));
        users.extend(bots.iter().map(|id| ReactionUser::new(Snowflake::new(*id), true)));
        users.sort_by_key(|u| u.id);
    }

    /// Make every fetch of this message fail
    pub fn break_message(&self, message_id: Snowflake) {
        self.state.lock().broken_messages.insert(message_id);
    }

    /// Make the reaction page of `message_id` and `emoji` that starts after `after` fail
    pub fn fail_reaction_page(
        &self,
        message_id: Snowflake,
        emoji: TaskEmoji,
        after: Option<Snowflake>,
    ) {
        self.state
            .lock()
            .failing_pages
            .insert((message_id, emoji, after));
    }

    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reacts(&self, fail: bool) {
        self.fail_reacts.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.state.lock().sent.clone()
    }

    pub fn bot_reactions(&self) -> Vec<(Snowflake, TaskEmoji)> {
        self.state.lock().bot_reactions.clone()
    }

    pub fn reaction_page_requests(&self) -> usize {
        self.reaction_page_requests.load(Ordering::SeqCst)
    }

    fn check_message(state: &ChatState, message_id: Snowflake) -> PortResult<()> {
        if state.broken_messages.contains(&message_id) {
            return Err(DomainError::ChatError("injected failure".to_string()));
        }
        if !state.reactions.contains_key(&message_id) {
            return Err(DomainError::MessageNotFound(message_id));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatClient for FakeChat {
    async fn fetch_channel(&self, channel_id: Snowflake) -> PortResult<ChannelInfo> {
        Ok(ChannelInfo {
            id: channel_id,
            name: Some(format!("channel-{channel_id}")),
        })
    }

    async fn send_message(&self, channel_id: Snowflake, content: &str) -> PortResult<Snowflake> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(DomainError::ChatError("send failed".to_string()));
        }
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = Snowflake::new(state.next_id);
        state.sent.push(SentMessage {
            id,
            channel_id,
            content: content.to_string(),
        });
        state.history.entry(channel_id).or_default().insert(id);
        state.reactions.entry(id).or_default();
        Ok(id)
    }

    async fn react_to_message(
        &self,
        _channel_id: Snowflake,
        message_id: Snowflake,
        emoji: TaskEmoji,
    ) -> PortResult<()> {
        if self.fail_reacts.load(Ordering::SeqCst) {
            return Err(DomainError::ChatError("react failed".to_string()));
        }
        self.state.lock().bot_reactions.push((message_id, emoji));
        Ok(())
    }

    async fn fetch_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PortResult<ChannelMessage> {
        let state = self.state.lock();
        Self::check_message(&state, message_id)?;

        let mut message = ChannelMessage::new(message_id, channel_id);
        if let Some(by_emoji) = state.reactions.get(&message_id) {
            message.reactions = by_emoji
                .iter()
                .map(|(emoji, users)| ReactionCount::new(emoji.as_str(), users.len() as u32, false))
                .collect();
        }
        Ok(message)
    }

    async fn fetch_reaction_users(
        &self,
        _channel_id: Snowflake,
        message_id: Snowflake,
        emoji: TaskEmoji,
        after: Option<Snowflake>,
        limit: u32,
    ) -> PortResult<Vec<ReactionUser>> {
        self.reaction_page_requests.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock();
        Self::check_message(&state, message_id)?;
        if state.failing_pages.contains(&(message_id, emoji, after)) {
            return Err(DomainError::ChatError("reaction page failed".to_string()));
        }

        Ok(state
            .reactions
            .get(&message_id)
            .and_then(|by_emoji| by_emoji.get(&emoji))
            .map(|users| {
                users
                    .iter()
                    .filter(|u| after.map_or(true, |a| u.id > a))
                    .take(limit as usize)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn fetch_channel_messages(
        &self,
        channel_id: Snowflake,
        before: Option<Snowflake>,
        limit: u32,
    ) -> PortResult<Vec<Snowflake>> {
        let state = self.state.lock();
        Ok(state
            .history
            .get(&channel_id)
            .map(|ids| {
                ids.iter()
                    .rev()
                    .filter(|id| before.map_or(true, |b| **id < b))
                    .take(limit as usize)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }
}

// ============================================================================
// Question and settings sources
// ============================================================================

/// Question sheet held in memory
#[derive(Default)]
pub struct FakeQuestions {
    rows: Mutex<Vec<QuestionRow>>,
    unavailable: AtomicBool,
    fetches: AtomicUsize,
}

impl FakeQuestions {
    pub fn new(rows: Vec<QuestionRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn set_rows(&self, rows: Vec<QuestionRow>) {
        *self.rows.lock() = rows;
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuestionSource for FakeQuestions {
    async fn fetch_rows(&self) -> PortResult<Vec<QuestionRow>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::SourceUnavailable("sheet offline".to_string()));
        }
        Ok(self.rows.lock().clone())
    }
}

/// Settings that can be changed or broken between triggers
pub struct FakeSettings {
    settings: Mutex<Option<Settings>>,
}

impl FakeSettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(Some(settings)),
        }
    }

    pub fn set(&self, settings: Settings) {
        *self.settings.lock() = Some(settings);
    }

    /// Make every following fetch fail
    pub fn break_source(&self) {
        *self.settings.lock() = None;
    }
}

#[async_trait]
impl SettingsSource for FakeSettings {
    async fn fetch(&self) -> PortResult<Settings> {
        self.settings
            .lock()
            .clone()
            .ok_or_else(|| DomainError::MissingSetting("potd_channel".to_string()))
    }
}

// ============================================================================
// Stores
// ============================================================================

#[derive(Default)]
pub struct MemoryCursorStore {
    cursor: Mutex<Option<Cursor>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryCursorStore {
    pub fn with_cursor(cursor: Cursor) -> Self {
        Self {
            cursor: Mutex::new(Some(cursor)),
            ..Self::default()
        }
    }

    pub fn current(&self) -> Option<Cursor> {
        *self.cursor.lock()
    }

    pub fn set(&self, cursor: Cursor) {
        *self.cursor.lock() = Some(cursor);
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CursorStore for MemoryCursorStore {
    async fn load(&self) -> Cursor {
        self.cursor.lock().unwrap_or_default()
    }

    async fn save(&self, cursor: &Cursor) -> PortResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(DomainError::StorageError("read-only".to_string()));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.cursor.lock() = Some(*cursor);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryRegistryStore {
    ids: Mutex<Vec<Snowflake>>,
    fail_saves: AtomicBool,
}

impl MemoryRegistryStore {
    pub fn with_ids(ids: Vec<Snowflake>) -> Self {
        Self {
            ids: Mutex::new(ids),
            ..Self::default()
        }
    }

    pub fn ids(&self) -> Vec<Snowflake> {
        self.ids.lock().clone()
    }

    pub fn set_ids(&self, ids: Vec<Snowflake>) {
        *self.ids.lock() = ids;
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl MessageRegistryStore for MemoryRegistryStore {
    async fn load_all(&self) -> Vec<Snowflake> {
        self.ids.lock().clone()
    }

    async fn save_all(&self, ids: &[Snowflake]) -> PortResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(DomainError::StorageError("read-only".to_string()));
        }
        *self.ids.lock() = ids.to_vec();
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

/// A context wired to in-memory collaborators, with handles to each of them
pub struct TestHarness {
    pub chat: Arc<FakeChat>,
    pub questions: Arc<FakeQuestions>,
    pub settings: Arc<FakeSettings>,
    pub cursor: Arc<MemoryCursorStore>,
    pub registry: Arc<MemoryRegistryStore>,
    pub ctx: ServiceContext,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    pub fn with_rows(rows: Vec<QuestionRow>) -> Self {
        let chat = Arc::new(FakeChat::new());
        let questions = Arc::new(FakeQuestions::new(rows));
        let settings = Arc::new(FakeSettings::new(default_settings()));
        let cursor = Arc::new(MemoryCursorStore::default());
        let registry = Arc::new(MemoryRegistryStore::default());

        let ctx = ServiceContext::new(
            questions.clone(),
            settings.clone(),
            cursor.clone(),
            registry.clone(),
            chat.clone(),
            test_options(),
        );

        Self {
            chat,
            questions,
            settings,
            cursor,
            registry,
            ctx,
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Default options without backfill pacing
pub fn test_options() -> ServiceOptions {
    ServiceOptions {
        backfill_delay: Duration::ZERO,
        ..ServiceOptions::default()
    }
}

/// Rows labelled `labels`, each with a distinct link
pub fn rows(labels: &[&str]) -> Vec<QuestionRow> {
    labels
        .iter()
        .map(|l| QuestionRow::new(*l, format!("https://example.com/{}", l.replace(' ', "-"))))
        .collect()
}
