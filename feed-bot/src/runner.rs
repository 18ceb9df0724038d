//! Main entry: init logging, validate config, build components, run the REPL
//! with the scheduler alongside.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

use crate::chain::HandlerChain;
use crate::components::{build_bot_components, build_handler_chain, BotComponents};
use crate::config::BotConfig;
use crate::core::{init_tracing, BotError, Message as CoreMessage};
use crate::scheduler::run_scheduler;

/// FeedBot: config, components, and handler chain, assembled but not running.
/// Integration tests drive [`FeedBot::handle_core_message`] directly.
pub struct FeedBot {
    pub config: BotConfig,
    pub components: BotComponents,
    pub handler_chain: HandlerChain,
}

impl FeedBot {
    /// Creates a FeedBot from config without starting the REPL or scheduler.
    pub async fn new(config: BotConfig) -> Result<Self> {
        config.validate()?;
        let components = build_bot_components(&config).await?;
        let handler_chain = build_handler_chain(&components, config.scope_chat_id);
        Ok(Self {
            config,
            components,
            handler_chain,
        })
    }

    /// Drives the handler chain with a core message (for integration tests).
    pub async fn handle_core_message(&self, message: &CoreMessage) -> Result<(), BotError> {
        self.handler_chain.handle(message).await.map(|_| ())
    }
}

/// Runs the bot: logging, components, handler chain, scheduler, REPL.
///
/// Returns when the REPL ends or on a fatal storage error from either the
/// scheduler or the message path; the store handle is released on every exit.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;

    if let Some(parent) = std::path::Path::new(&config.log_file).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    init_tracing(&config.log_file)?;

    info!(
        database_url = %config.database_url,
        scope_chat_id = ?config.scope_chat_id,
        "Initializing bot"
    );

    let components = build_bot_components(&config).await?;
    let handler_chain = build_handler_chain(&components, config.scope_chat_id);

    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<BotError>(1);

    let scheduler = tokio::spawn(run_scheduler(
        components.refresher.clone(),
        components.period_rx.clone(),
    ));

    info!("Bot started successfully");

    let repl = crate::telegram::run_repl(
        components.teloxide_bot.clone(),
        handler_chain,
        components.bot_username.clone(),
        shutdown_tx,
    );

    let result: Result<()> = tokio::select! {
        result = repl => result,
        result = scheduler => match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                error!(error = %e, "Scheduler stopped on storage failure");
                Err(e.into())
            }
            Err(e) => Err(anyhow::anyhow!("Scheduler task panicked: {}", e)),
        },
        Some(e) = shutdown_rx.recv() => {
            error!(error = %e, "Fatal handler error, shutting down");
            Err(e.into())
        }
    };

    // Release the store handle on the way out, whatever ended the run.
    close_repo(&components.repo).await;
    result
}

async fn close_repo(repo: &Arc<storage::ConfigRepository>) {
    info!("Releasing configuration store");
    repo.close().await;
}
