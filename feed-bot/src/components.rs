//! Component factory: builds BotComponents from config. Isolates assembly
//! logic from the runner.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use teloxide::prelude::*;
use tokio::sync::watch;
use tracing::{error, info, instrument};

use storage::ConfigRepository;

use crate::chain::HandlerChain;
use crate::config::BotConfig;
use crate::core::Bot as CoreBot;
use crate::feed::FeedClient;
use crate::handlers::{AuthHandler, CommandHandler};
use crate::refresher::FeedRefresher;
use crate::service::FeedBotService;

/// Core dependencies for run_bot / FeedBot; produced by the component factory.
pub struct BotComponents {
    pub repo: Arc<ConfigRepository>,
    pub teloxide_bot: Bot,
    pub bot_adapter: Arc<dyn CoreBot>,
    pub bot_username: Arc<tokio::sync::RwLock<Option<String>>>,
    pub refresher: Arc<FeedRefresher>,
    pub service: Arc<FeedBotService>,
    /// Scheduler side of the refresh-period channel; the service holds the sender.
    pub period_rx: watch::Receiver<Duration>,
}

/// Builds BotComponents: repository, Telegram bot, feed client, refresher,
/// service, and the refresh-period channel seeded from the persisted interval.
#[instrument(skip(config))]
pub async fn build_bot_components(config: &BotConfig) -> Result<BotComponents> {
    let repo = Arc::new(
        ConfigRepository::new(&config.database_url)
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    database_url = %config.database_url,
                    "Failed to initialize configuration storage"
                );
                anyhow::anyhow!("Failed to initialize configuration storage: {}", e)
            })?,
    );

    let teloxide_bot = {
        let bot = Bot::new(config.bot_token.clone());
        if let Some(ref url_str) = config.telegram_api_url {
            match reqwest::Url::parse(url_str) {
                Ok(url) => bot.set_api_url(url),
                Err(e) => {
                    error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                    bot
                }
            }
        } else {
            bot
        }
    };

    let bot_username = Arc::new(tokio::sync::RwLock::new(None));
    let bot_adapter: Arc<dyn CoreBot> =
        Arc::new(crate::telegram::TelegramBotAdapter::new(teloxide_bot.clone()));

    let feed_client = FeedClient::new()
        .map_err(|e| anyhow::anyhow!("Failed to build feed HTTP client: {}", e))?;
    let refresher = Arc::new(FeedRefresher::new(
        repo.clone(),
        bot_adapter.clone(),
        feed_client,
    ));

    let initial_state = repo.setup_state().await.map_err(|e| {
        anyhow::anyhow!("Failed to read setup state during init: {}", e)
    })?;
    info!(
        configured = initial_state.configured,
        feeds = initial_state.feeds.len(),
        refresh_interval_secs = initial_state.refresh_interval,
        "Setup state loaded"
    );

    let (period_tx, period_rx) =
        watch::channel(Duration::from_secs(initial_state.refresh_interval));
    let service = Arc::new(FeedBotService::new(
        repo.clone(),
        refresher.clone(),
        period_tx,
    ));

    Ok(BotComponents {
        repo,
        teloxide_bot,
        bot_adapter,
        bot_username,
        refresher,
        service,
        period_rx,
    })
}

/// Builds the handler chain: auth/scope gate first, then command execution.
pub fn build_handler_chain(components: &BotComponents, scope_chat_id: Option<i64>) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(AuthHandler::new(
            components.bot_adapter.clone(),
            scope_chat_id,
        )))
        .add_handler(Arc::new(CommandHandler::new(
            components.service.clone(),
            components.bot_adapter.clone(),
            components.bot_username.clone(),
        )))
}
