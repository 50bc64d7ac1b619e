//! Bot setup and initialization
//!
//! Builds the service context from configuration and runs the long-lived tasks.

use std::sync::Arc;
use std::time::Duration;

use potd_api::DiscordClient;
use potd_common::{AppConfig, AppError, SettingsSourceKind};
use potd_core::SettingsSource;
use potd_gateway::{GatewayClient, GatewayOptions};
use potd_service::{PotdService, ServiceContext, ServiceContextBuilder, ServiceOptions};
use potd_sheets::{
    EnvSettingsSource, ServiceAccountTokenProvider, SheetQuestionSource, SheetSettingsSource,
    SheetsClient,
};
use potd_store::{JsonCursorStore, JsonMessageRegistryStore};
use tracing::info;

use crate::{commands, schedule};

/// Initialize every collaborator and create the service context
pub fn create_context(config: &AppConfig) -> Result<ServiceContext, AppError> {
    let timeout = Duration::from_secs(config.discord.request_timeout_secs);

    let chat = DiscordClient::new(&config.discord).map_err(|e| AppError::Chat(e.to_string()))?;

    info!(file = %config.sheets.credentials_file, "Loading service account");
    let tokens = ServiceAccountTokenProvider::from_file(&config.sheets.credentials_file, timeout)
        .map_err(AppError::config)?;
    let sheets =
        SheetsClient::new(&config.sheets, Arc::new(tokens), timeout).map_err(AppError::config)?;

    let settings_source: Arc<dyn SettingsSource> = match config.settings_source {
        SettingsSourceKind::Sheet => Arc::new(SheetSettingsSource::new(
            sheets.clone(),
            config.sheets.settings_range.as_str(),
        )),
        SettingsSourceKind::Env => Arc::new(EnvSettingsSource::new()),
    };
    let question_source = SheetQuestionSource::new(sheets, config.sheets.question_range.as_str());

    let ctx = ServiceContextBuilder::new()
        .question_source(Arc::new(question_source))
        .settings_source(settings_source)
        .cursor_store(Arc::new(JsonCursorStore::new(&config.storage.cursor_file)))
        .registry_store(Arc::new(JsonMessageRegistryStore::new(
            &config.storage.message_registry_file,
        )))
        .chat(Arc::new(chat))
        .options(ServiceOptions::from_config(config))
        .build()?;

    Ok(ctx)
}

/// Run the bot until a fatal error or Ctrl-C
///
/// Settings are checked and the ledger is backfilled before the gateway starts,
/// so live events always land on a built ledger.
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let ctx = create_context(&config)?;
    let potd = PotdService::new(&ctx);

    let settings = potd.load_settings().await?;
    info!(
        potd_channel = %settings.potd_channel_id,
        debug = settings.debug,
        "Settings loaded"
    );

    let stats = potd.rebuild_backfill().await?;
    info!(
        messages = stats.messages_scanned,
        users = stats.users,
        reactions = stats.reactions_counted,
        "Initial backfill complete"
    );

    let gateway = GatewayClient::new(GatewayOptions::from_config(&config.discord), ctx.clone());

    tokio::select! {
        result = gateway.run() => result.map_err(|e| AppError::Gateway(e.to_string())),
        result = schedule::run(&ctx, &config.schedule) => result,
        result = commands::listen(&ctx, tokio::io::stdin()) => result,
        signal = tokio::signal::ctrl_c() => {
            signal.map_err(AppError::internal)?;
            info!("Shutdown requested");
            Ok(())
        }
    }
}
