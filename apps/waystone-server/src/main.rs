use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use waystone_chat::{route_chat_message, ChatMessage, ChatMessageEvent, PreviousMessage, Session};
use waystone_common::{Identity, ServerConfig, SessionId, TextComponent};
use waystone_world::World;

#[derive(Parser)]
#[command(name = "waystone-server", about = "Waystone world server core")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open (or initialize) a world, drive the tick loop, then save
    Run {
        /// World root directory
        #[arg(short, long, default_value = "world")]
        world: String,
        /// Seed used when initializing a fresh world
        #[arg(short, long, default_value = "0")]
        seed: i64,
        /// Number of ticks to drive before saving
        #[arg(short, long, default_value = "100")]
        ticks: u64,
    },
    /// Print level metadata without taking the session lock
    Info {
        /// World root directory
        #[arg(short, long, default_value = "world")]
        world: String,
    },
}

/// Dummy session logging every delivery; stands in for network sessions
/// until the protocol layer is wired up.
struct LogSession;

impl Session for LogSession {
    fn player_chat_message(
        &self,
        message: &ChatMessage,
        sender: &Identity,
        channel: &str,
        index: i32,
        previous: &[PreviousMessage],
    ) {
        tracing::info!(
            sender = %sender.name,
            channel,
            index,
            history = previous.len(),
            "chat: {}",
            message.body
        );
    }

    fn disguised_chat_message(&self, content: &TextComponent, sender: &Identity, channel: &str) {
        tracing::info!(sender = %sender.name, channel, "chat: {}", content.text);
    }

    fn system_message(&self, content: &TextComponent) {
        tracing::info!("system: {}", content.text);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Run { world, seed, ticks } => {
            let config = ServerConfig {
                level_name: world,
                seed,
                ..ServerConfig::default()
            };
            let world = World::open(&config)?;

            world
                .broadcast()
                .add_dummy(SessionId::new(), Arc::new(LogSession));
            world
                .broadcast()
                .system_chat_message(&TextComponent::plain("server started"));

            // Feed one event through the router the way the session layer
            // would on an incoming chat packet.
            let event = ChatMessageEvent {
                sender: Identity::new("console"),
                message: ChatMessage::signed("hello world"),
                index: 0,
            };
            route_chat_message(&event, &config, world.broadcast());

            for _ in 0..ticks {
                world.increment_time();
            }
            let (world_age, day_time) = world.time();
            println!(
                "world age: {world_age}, day time: {day_time}, loaded chunks: {}",
                world.loaded_chunks()
            );

            world.save()?;
        }
        Commands::Info { world } => {
            let level = waystone_level::Level::open(&world)?;
            println!("name: {}", level.name());
            println!("version: {}", level.version());
            println!("seed: {}", level.seed());
            println!("time: {} (day time {})", level.time(), level.day_time());
        }
    }

    Ok(())
}
