//! Sends the default conversation once with retries, then streams it to stdout.
//!
//! Configuration comes from the `OPENAI_*` environment variables. Ctrl-C
//! cancels a pending retry wait or an in-flight stream.

use std::process::ExitCode;

use chatguard::error::error_chain_message;
use chatguard::observability::{TracingConfig, init_tracing};
use chatguard::prelude::*;
use chatguard::providers::openai_compatible::create_chat_model;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing(&TracingConfig::from_env());

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received, cancelling");
                cancel.cancel();
            }
        });
    }

    let config = match ModelConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let model = match create_chat_model(&config).await {
        Ok(model) => model,
        Err(e) => {
            tracing::error!(error = %error_chain_message(&e), "failed to create chat model");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(model = %config.model, "chat model ready");

    let messages = create_messages_from_template();

    match generate_with_retry(&model, &messages, &RetryPolicy::default(), &cancel).await {
        Ok(reply) => tracing::info!(content = %reply.content, "generate result"),
        Err(e) => {
            tracing::error!(error = %error_chain_message(&e), attempts = ?e.attempts(), "generate failed");
            return ExitCode::FAILURE;
        }
    }

    let reader = match stream(&model, &messages).await {
        Ok(reader) => reader,
        Err(e) => {
            tracing::error!(error = %e, "stream failed");
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = tokio::io::stdout();
    let outcome = report_stream(reader, &mut stdout, &cancel).await;
    println!();
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_cancelled() => {
            tracing::info!("stream cancelled");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %error_chain_message(&e), "stream report failed");
            ExitCode::FAILURE
        }
    }
}
