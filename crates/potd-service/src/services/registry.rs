//! Message registry
//!
//! Ordered, append-only record of announcements that count toward the leaderboard.

use futures::TryStreamExt;
use potd_core::Snowflake;
use tracing::{debug, info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::pagination::message_id_pages;

/// Largest page the history endpoint serves
const HISTORY_PAGE_SIZE: u32 = 100;

/// Message registry service
pub struct MessageRegistry<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageRegistry<'a> {
    /// Create a new MessageRegistry
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Registered ids in send order; empty when nothing readable is stored
    pub async fn load_all(&self) -> Vec<Snowflake> {
        self.ctx.registry_store().load_all().await
    }

    /// Record a delivered announcement
    ///
    /// Rewrites the whole record. No deduplication.
    #[instrument(skip(self))]
    pub async fn append(&self, message_id: Snowflake) -> ServiceResult<()> {
        let mut ids = self.load_all().await;
        ids.push(message_id);
        self.ctx.registry_store().save_all(&ids).await?;

        debug!(count = ids.len(), "Message registered");
        Ok(())
    }

    /// Collect up to the scan limit of message ids from `channel_id`, newest first
    #[instrument(skip(self))]
    pub async fn scan_channel(&self, channel_id: Snowflake) -> ServiceResult<Vec<Snowflake>> {
        let limit = self.ctx.options().message_scan_limit;
        let page_size = HISTORY_PAGE_SIZE.min(u32::try_from(limit).unwrap_or(u32::MAX)).max(1);

        let mut pages = Box::pin(message_id_pages(self.ctx.chat(), channel_id, page_size));
        let mut ids = Vec::new();
        while ids.len() < limit {
            match pages.try_next().await? {
                Some(page) => ids.extend(page),
                None => break,
            }
        }
        ids.truncate(limit);

        info!(count = ids.len(), "Channel history scanned");
        Ok(ids)
    }

    /// Replace the registry with the given ids
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn replace(&self, ids: &[Snowflake]) -> ServiceResult<()> {
        self.ctx.registry_store().save_all(ids).await?;
        Ok(())
    }
}
