//! Client factory
//!
//! Builds a [`ChatModel`](crate::traits::ChatModel) through a
//! [`ModelConnector`], retrying failed connects with linear backoff. The whole
//! build, waits included, is bounded by the configuration timeout.

use ::backoff::backoff::Backoff;
use std::time::Duration;

use crate::config::ModelConfig;
use crate::error::ClientCreationError;
use crate::retry::LinearBackoff;
use crate::traits::ModelConnector;

/// Default wait unit between construction attempts.
pub const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct ClientFactory<C> {
    connector: C,
    backoff_unit: Duration,
}

impl<C: ModelConnector> ClientFactory<C> {
    pub const fn new(connector: C) -> Self {
        Self {
            connector,
            backoff_unit: DEFAULT_BACKOFF_UNIT,
        }
    }

    /// Override the backoff unit (the n-th wait is `n × unit`).
    pub const fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    pub const fn connector(&self) -> &C {
        &self.connector
    }

    /// Connect, retrying up to `config.max_retries` times.
    ///
    /// Fails with [`ClientCreationError::Timeout`] once `config.timeout`
    /// elapses, whatever attempts remain.
    pub async fn build(&self, config: &ModelConfig) -> Result<C::Model, ClientCreationError> {
        let total = config.max_retries.saturating_add(1);
        let mut attempts = 0u32;

        let attempt_loop = async {
            let mut backoff = LinearBackoff::new(self.backoff_unit);
            loop {
                attempts += 1;
                match self.connector.connect(config).await {
                    Ok(model) => {
                        if attempts > 1 {
                            tracing::info!(
                                attempt = attempts,
                                model = %config.model,
                                "chat model created after retry"
                            );
                        }
                        return Ok(model);
                    }
                    Err(err) if attempts < total => {
                        let delay = backoff.next_backoff().unwrap_or(self.backoff_unit);
                        tracing::warn!(
                            attempt = attempts,
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "failed to create chat model, retrying"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    Err(err) => {
                        tracing::error!(
                            attempts,
                            error = %err,
                            "failed to create chat model"
                        );
                        return Err(ClientCreationError::Exhausted {
                            attempts,
                            source: Box::new(err),
                        });
                    }
                }
            }
        };

        let outcome = tokio::time::timeout(config.timeout, attempt_loop).await;
        match outcome {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    timeout_ms = config.timeout.as_millis() as u64,
                    attempts,
                    "chat model creation timed out"
                );
                Err(ClientCreationError::Timeout {
                    timeout: config.timeout,
                    attempts,
                })
            }
        }
    }
}
