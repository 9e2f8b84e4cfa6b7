//! Logs command handler
//!
//! Resolves the application, then either dumps its recent logs or tails
//! them until interrupted or until the stream reports an error.

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::*;
use logtail_actor::{Actor, ActorError, ApplicationResolver, LogStream, RecentLogOrder};
use logtail_client::{ControllerClient, LogCacheClient};
use logtail_core::domain::log::LogMessage;
use tracing::debug;

use crate::config::Config;
use crate::display::{print_log_message, print_warnings};

/// Handle the logs command
///
/// # Arguments
/// * `app_name` - The application name
/// * `recent` - Dump recent logs instead of tailing
/// * `sort` - Sort recent logs by timestamp
/// * `config` - The CLI configuration
pub async fn handle_logs_command(
    app_name: &str,
    recent: bool,
    sort: bool,
    config: &Config,
) -> Result<()> {
    let order = if sort {
        RecentLogOrder::Chronological
    } else {
        RecentLogOrder::AsReturned
    };

    let actor = Actor::new(controller_client(config)).with_recent_order(order);
    let log_cache = log_cache_client(config);

    println!(
        "{}",
        format!("Retrieving logs for app {}...", app_name).bold()
    );
    println!();

    if recent {
        display_recent_logs(&actor, app_name, &config.space_guid, &log_cache).await
    } else {
        stream_logs(&actor, app_name, &config.space_guid, log_cache).await
    }
}

/// Fetch and print the recent logs of an application
async fn display_recent_logs<R: ApplicationResolver>(
    actor: &Actor<R>,
    app_name: &str,
    space_guid: &str,
    log_cache: &LogCacheClient,
) -> Result<()> {
    let (result, warnings) = actor
        .get_recent_logs_for_application_by_name_and_space(app_name, space_guid, log_cache)
        .await;
    print_warnings(&warnings);

    let messages = match result {
        Ok(messages) => messages,
        Err(error) => {
            let context = failure_context(&error, "Failed to retrieve recent logs");
            return Err(error).context(context);
        }
    };

    if messages.is_empty() {
        println!("{}", "No recent logs found.".yellow());
    }

    for message in &messages {
        print_log_message(message);
    }

    Ok(())
}

/// Tail the logs of an application
///
/// Runs until Ctrl-C, until both channels close, or until the first stream
/// error, which cancels the stream and is returned.
async fn stream_logs<R: ApplicationResolver>(
    actor: &Actor<R>,
    app_name: &str,
    space_guid: &str,
    log_cache: LogCacheClient,
) -> Result<()> {
    let (result, warnings) = actor
        .get_streaming_logs_for_application_by_name_and_space(
            app_name,
            space_guid,
            Arc::new(log_cache),
        )
        .await;
    print_warnings(&warnings);

    let stream = match result {
        Ok(stream) => stream,
        Err(error) => {
            let context = failure_context(&error, "Failed to stream logs");
            return Err(error).context(context);
        }
    };

    consume_stream(stream, tokio::signal::ctrl_c(), print_log_message).await
}

/// Drain a log stream until both channels close or `interrupt` fires
async fn consume_stream<F>(
    stream: LogStream,
    interrupt: F,
    mut on_message: impl FnMut(&LogMessage),
) -> Result<()>
where
    F: Future,
{
    let (mut messages, mut errors, cancel) = stream.into_parts();
    let mut messages_open = true;
    let mut errors_open = true;

    tokio::pin!(interrupt);

    while messages_open || errors_open {
        tokio::select! {
            message = messages.recv(), if messages_open => match message {
                Some(message) => on_message(&message),
                None => messages_open = false,
            },
            error = errors.recv(), if errors_open => match error {
                Some(error) => {
                    cancel.cancel();
                    return Err(error).context("Failed to stream logs");
                }
                None => errors_open = false,
            },
            _ = &mut interrupt => {
                debug!("Interrupted, stopping log stream");
                cancel.cancel();
                break;
            }
        }
    }

    Ok(())
}

/// Describe a failed operation, hinting at the likely cause
fn failure_context(error: &ActorError, action: &str) -> String {
    let Some(client_error) = error.client_error() else {
        return action.to_string();
    };

    if client_error.is_not_found() {
        format!("{} (check the application name and --space)", action)
    } else if client_error.is_unauthorized() {
        format!("{} (check LOGTAIL_ACCESS_TOKEN)", action)
    } else if client_error.is_server_error() {
        format!("{} (the service is unavailable, try again later)", action)
    } else {
        action.to_string()
    }
}

fn controller_client(config: &Config) -> ControllerClient {
    let client = ControllerClient::new(&config.api_url);
    match &config.access_token {
        Some(token) => client.with_access_token(token),
        None => client,
    }
}

fn log_cache_client(config: &Config) -> LogCacheClient {
    let client = LogCacheClient::new(&config.log_cache_url);
    match &config.access_token {
        Some(token) => client.with_access_token(token),
        None => client,
    }
}
