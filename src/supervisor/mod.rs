//! The Supervisor module manages the lifecycle of the blockpulse application.
//!
//! It owns the long-running services (the HTTP server and the tip watcher),
//! starts them into a `JoinSet`, listens for shutdown signals (Ctrl+C or
//! SIGTERM) and orchestrates a clean shutdown. If a supervised task fails,
//! the remaining services are shut down rather than continuing in a
//! partially-functional state.

mod builder;

use std::sync::Arc;

use thiserror::Error;
use tokio::signal;

pub use builder::SupervisorBuilder;

use crate::aggregator::BlockRangeAggregator;
use crate::config::AppConfig;
use crate::feed::{BlockFeed, TipWatcher};
use crate::http_server::{self, AppState};
use crate::providers::traits::ChainDataSource;

/// Represents the set of errors that can occur during the supervisor's
/// operation.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// A required configuration was not provided to the `SupervisorBuilder`.
    #[error("Missing configuration for Supervisor")]
    MissingConfig,

    /// A chain data source was not provided to the `SupervisorBuilder`.
    #[error("Missing chain data source for Supervisor")]
    MissingDataSource,

    /// A price lookup was not provided to the `SupervisorBuilder`.
    #[error("Missing price lookup for Supervisor")]
    MissingPriceLookup,
}

/// The primary runtime manager for the application.
///
/// Owns all major components and is responsible for their startup, shutdown
/// and health monitoring. Once `run` is called it becomes the main process
/// loop for the entire application.
pub struct Supervisor {
    /// Shared application configuration.
    config: Arc<AppConfig>,

    /// The chain data source the tip watcher polls.
    data_source: Arc<dyn ChainDataSource>,

    /// The block range aggregator shared by the HTTP API and the tip watcher.
    aggregator: Arc<BlockRangeAggregator>,

    /// The live block feed.
    feed: Arc<BlockFeed>,

    /// A token used to signal a graceful shutdown to all supervised tasks.
    cancellation_token: tokio_util::sync::CancellationToken,

    /// A set of all spawned tasks that the supervisor is actively managing.
    join_set: tokio::task::JoinSet<()>,
}

impl Supervisor {
    /// Creates a new Supervisor instance with all its required components.
    ///
    /// This is typically called by the `SupervisorBuilder` after it has
    /// assembled all the necessary dependencies.
    pub fn new(
        config: AppConfig,
        data_source: Arc<dyn ChainDataSource>,
        aggregator: Arc<BlockRangeAggregator>,
        feed: Arc<BlockFeed>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            data_source,
            aggregator,
            feed,
            cancellation_token: tokio_util::sync::CancellationToken::new(),
            join_set: tokio::task::JoinSet::new(),
        }
    }

    /// Returns a new `SupervisorBuilder` instance.
    ///
    /// This is the public entry point for creating a supervisor.
    pub fn builder() -> SupervisorBuilder {
        SupervisorBuilder::new()
    }

    /// Starts the supervisor and all its managed services.
    ///
    /// Spawns a signal handler, the HTTP server (when enabled) and the tip
    /// watcher, then monitors task health until shutdown is requested or a
    /// task fails.
    pub async fn run(mut self) -> Result<(), SupervisorError> {
        // Clone the token for the signal handler task.
        let cancellation_token = self.cancellation_token.clone();

        // Spawn a task to listen for shutdown signals.
        self.join_set.spawn(async move {
            let ctrl_c = signal::ctrl_c();
            #[cfg(unix)]
            let terminate = async {
                signal::unix::signal(signal::unix::SignalKind::terminate())
                    .expect("Failed to register SIGTERM handler")
                    .recv()
                    .await;
            };
            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                _ = ctrl_c => tracing::info!("SIGINT (Ctrl+C) received, initiating graceful shutdown."),
                _ = terminate => tracing::info!("SIGTERM received, initiating graceful shutdown."),
            }

            // Notify all other tasks to begin shutting down.
            cancellation_token.cancel();
        });

        // Spawn the HTTP server as a background task, if enabled.
        if self.config.server.enabled {
            let server_config = self.config.server.clone();
            let state = AppState {
                aggregator: Arc::clone(&self.aggregator),
                feed: Arc::clone(&self.feed),
                default_page_limit: self.config.default_page_limit,
            };
            let http_cancellation_token = self.cancellation_token.clone();
            self.join_set.spawn(async move {
                tokio::select! {
                    _ = http_server::run_server(&server_config, state) => {},
                    _ = http_cancellation_token.cancelled() => {
                        tracing::info!("HTTP server received shutdown signal.");
                    }
                }
            });
        }

        // Spawn the TipWatcher service feeding the live block feed.
        let tip_watcher = TipWatcher::new(
            Arc::clone(&self.aggregator),
            Arc::clone(&self.data_source),
            Arc::clone(&self.feed),
            self.config.polling_interval,
            self.cancellation_token.clone(),
        );
        self.join_set.spawn(async move {
            tip_watcher.run().await;
        });

        // Main loop: monitor task health and the shutdown signal.
        loop {
            tokio::select! {
                maybe_result = self.join_set.join_next() => {
                    match maybe_result {
                        Some(Ok(_)) => {
                            // Task completed successfully, continue monitoring.
                        }
                        Some(Err(e)) => {
                            tracing::error!("A critical task failed: {:?}. Initiating shutdown.", e);
                            self.cancellation_token.cancel();
                        }
                        None => {
                            // All tasks have completed.
                            break;
                        }
                    }
                }
                _ = self.cancellation_token.cancelled() => {
                    // Cancellation requested externally, break the loop.
                    break;
                }
            }
        }

        // Graceful shutdown: give the remaining tasks a bounded window to
        // finish. There is no persistent state to flush; the feed's dedup
        // window is deliberately process-local.
        let shutdown_timeout = self.config.shutdown_timeout;
        if tokio::time::timeout(shutdown_timeout, self.join_set.shutdown()).await.is_err() {
            tracing::warn!(
                "Tasks did not stop within the timeout of {:?}. Continuing shutdown.",
                shutdown_timeout
            );
        }

        tracing::info!("Supervisor shutdown complete.");
        Ok(())
    }
}
