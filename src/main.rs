#![recursion_limit = "256"]
//! # Main Entry Point
//!
//! Loads the configuration, sets up logging, builds the router with the bundled
//! commands and wires Matrix message and reaction events into it.

use anyhow::Result;
use clap::Parser;
use matrix_sdk::{
    Client,
    config::SyncSettings,
    room::Room,
    ruma::events::{
        reaction::OriginalSyncReactionEvent,
        room::{
            member::{MembershipState, StrippedRoomMemberEvent},
            message::OriginalSyncRoomMessageEvent,
        },
    },
};
use std::sync::Arc;

use cmdlr::application::logging;
use cmdlr::application::router::RouterBuilder;
use cmdlr::domain::config::AppConfig;
use cmdlr::domain::traits::ChatProvider;
use cmdlr::infrastructure::matrix::MatrixService;
use cmdlr::interface::commands::{self, help};

#[derive(Parser, Debug)]
#[command(version, about = "Prefix command bot for Matrix")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "data/config.yaml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load Configuration
    let config = AppConfig::load(&cli.config)?;

    // 2. Logging Setup
    let _guard = logging::init(&config.logging)?;
    tracing::info!("Starting cmdlr...");

    // 3. Router
    let router = commands::register(RouterBuilder::from_config(&config.router)).build()?;
    tracing::info!(
        "Router ready with {} commands, prefixes {:?}",
        router.commands().len(),
        router.prefixes()
    );

    // 4. Matrix Setup
    let matrix = &config.services.matrix;
    let client = Client::builder()
        .homeserver_url(&matrix.homeserver)
        .build()
        .await?;

    let mut login = client
        .matrix_auth()
        .login_username(&matrix.username, &matrix.password);
    if let Some(name) = &matrix.display_name {
        login = login.initial_device_display_name(name);
    }
    login.send().await?;
    tracing::info!("Logged in as {}", matrix.username);

    let service = Arc::new(MatrixService::new(
        client.clone(),
        matrix.display_name.clone(),
    ));

    // Skip the backlog so old commands are not replayed on start.
    let response = client.sync_once(SyncSettings::default()).await?;

    // 5. Event Handlers
    let msg_router = router.clone();
    let msg_service = service.clone();
    let bot_users = Arc::new(config.router.bot_users.clone());
    client.add_event_handler(move |ev: OriginalSyncRoomMessageEvent, room: Room| {
        let router = msg_router.clone();
        let service = msg_service.clone();
        let bot_users = bot_users.clone();
        async move {
            let Some(event) = service.message_event(&ev, &room, &bot_users) else {
                return;
            };
            tracing::debug!("Received message from {}: {}", event.author_id, event.content);
            let chat: Arc<dyn ChatProvider> = service;
            router.dispatch(chat, event).await;
        }
    });

    let reaction_router = router.clone();
    let reaction_service = service.clone();
    client.add_event_handler(move |ev: OriginalSyncReactionEvent, room: Room| {
        let router = reaction_router.clone();
        let service = reaction_service.clone();
        async move {
            let event = MatrixService::reaction_event(&ev, &room);
            let chat: Arc<dyn ChatProvider> = service;
            if let Err(e) = help::handle_reaction(&router, chat, &event).await {
                tracing::error!("Failed to handle reaction: {:#}", e);
            }
        }
    });

    // Handle Invites
    client.add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
        if ev.content.membership == MembershipState::Invite {
            if let Err(e) = room.join().await {
                tracing::warn!("Failed to join {}: {}", room.room_id(), e);
            }
        }
    });

    // 6. Sync Loop
    let settings = SyncSettings::default().token(response.next_batch);
    client.sync(settings).await?;
    Ok(())
}
