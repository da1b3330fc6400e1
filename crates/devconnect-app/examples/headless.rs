//! Headless chat client for manual verification against a live backend.
//!
//! Connects, registers the identity, hydrates the unread badges, optionally
//! opens one conversation and sends one message, and logs every inbound
//! event until Ctrl-C logs out.
//!
//! ```sh
//! cargo run --example headless -- --user-id 665f1c2e9b1d4a0012a34567 \
//!     --peer 665f1c2e9b1d4a0012a39999 --message "hello from the core"
//! ```

use clap::Parser;
use devconnect_app::{AppEvent, Participant, Runtime};
use devconnect_client::{HttpChatApi, ServiceConfig, SessionManager};
use devconnect_proto::UserId;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Headless devConnect chat client
#[derive(Parser, Debug)]
#[command(name = "headless")]
#[command(about = "Drives the chat core against a live devConnect backend")]
struct Args {
    /// Service base URL
    #[arg(long, default_value = "http://localhost:7777")]
    base_url: String,

    /// Local account id to register the session under
    #[arg(long)]
    user_id: String,

    /// Display name carried by outgoing messages
    #[arg(long, default_value = "Headless")]
    first_name: String,

    /// Avatar URL carried by outgoing messages
    #[arg(long, default_value = "")]
    photo_url: String,

    /// Peer account id to open a conversation with
    #[arg(long)]
    peer: Option<String>,

    /// Message to send once the conversation is open
    #[arg(long)]
    message: Option<String>,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config = ServiceConfig::new(args.base_url);
    let manager = SessionManager::new(config.clone());
    let api = HttpChatApi::new(config);

    // Acquire the session up front; the runtime reuses this same handle.
    let session = manager.connection().await?;
    let mut inbound = session.subscribe();
    tokio::spawn(async move {
        loop {
            match inbound.recv().await {
                Ok(event) => tracing::info!(?event, "inbound"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "inbound log lagged");
                },
                Err(RecvError::Closed) => break,
            }
        }
    });

    let local = Participant {
        id: UserId::from(args.user_id),
        first_name: args.first_name,
        photo_url: args.photo_url,
    };
    let runtime = Runtime::new(manager, api, local);
    let commands = runtime.commands();

    if let Some(peer) = args.peer {
        commands.send(AppEvent::ConversationOpened { peer: UserId::from(peer) }).await?;
        if let Some(message) = args.message {
            commands.send(AppEvent::DraftChanged(message)).await?;
            commands.send(AppEvent::DraftSubmitted).await?;
        }
    }

    let logout = commands.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("logging out");
            let _ = logout.send(AppEvent::LoggedOut).await;
        }
    });

    Ok(runtime.run().await?)
}
