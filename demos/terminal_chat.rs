//! Terminal Chat Example
//!
//! This example demonstrates how to:
//! - Load configuration and pick a notification relay
//! - Render the dialog from the event stream
//! - Feed free text and numbered quick replies to the engine
//!
//! Without `CONTACT_DIALOG__RELAY__*` variables the submission is only logged.

use anyhow::Context;
use contact_dialog::{AppConfig, ConversationEngine, DialogDomainEvent, ResponseOutcome, Sender};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = AppConfig::load().context("loading configuration")?;
    if config.relay.is_none() {
        println!("(no relay configured, submissions are logged locally)\n");
    }
    let relay = config.notification_relay().context("building notification relay")?;

    let mut engine = ConversationEngine::new(relay, config.pacing.pacer()?);
    let mut events = engine.subscribe();

    let renderer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                DialogDomainEvent::TypingChanged(e) if e.is_typing => println!("  ..."),
                DialogDomainEvent::MessageAppended(e) if e.message.sender == Sender::Bot => {
                    println!("bot> {}", e.message.text);
                    for (i, option) in e.message.options.iter().enumerate() {
                        println!("      [{}] {}", i + 1, option);
                    }
                }
                DialogDomainEvent::NavigationRequested(e) => {
                    println!("-> opening {}", e.target.destination());
                }
                _ => {}
            }
        }
    });

    engine.initialize().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let options = engine
            .transcript()
            .iter()
            .rev()
            .find(|m| m.is_bot())
            .map(|m| m.options.clone())
            .unwrap_or_default();

        let picked = line
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| options.get(i).cloned());

        let outcome = match picked {
            Some(option) => engine.select_option(option).await?,
            None => engine.submit_text(line).await?,
        };

        if let ResponseOutcome::Navigated(Some(_)) = outcome {
            break;
        }
    }

    drop(engine);
    renderer.await?;
    Ok(())
}
