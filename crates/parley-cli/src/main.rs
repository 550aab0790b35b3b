//! parley CLI: Terminal chat client for an external chat API

use clap::{Parser, Subcommand};
use parley_core::{send_flow, ChatStore, ClientConfig, HttpApiClient, Role};

/// Chat with an external assistant API from the terminal
#[derive(Parser)]
#[command(name = "parley")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Override the API base URL from the config file
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Send one message and print the assistant reply
    Send {
        /// Message text
        #[arg(long, short)]
        message: String,

        /// Continue an existing conversation
        #[arg(long)]
        conversation: Option<i64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List conversations
    Conversations {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a conversation's messages
    Show {
        /// Conversation id
        id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default config file
    Init,
}

fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.api_url.clone());

    match cli.command {
        None | Some(Commands::Tui) => {
            // Default: open TUI
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            if let Err(e) = rt.block_on(parley_tui::run_tui(config)) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Send {
            message,
            conversation,
            json,
        }) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(cmd_send(&config, &message, conversation, json));
        }
        Some(Commands::Conversations { json }) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(cmd_conversations(&config, json));
        }
        Some(Commands::Show { id, json }) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(cmd_show(&config, id, json));
        }
        Some(Commands::Init) => {
            cmd_init(&config);
        }
    }
}

/// Load the config file, applying the `--api-url` override.
fn load_config(api_url: Option<String>) -> ClientConfig {
    let path = ClientConfig::default_path();
    let mut config = match ClientConfig::load_or_default(&path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config from {}: {e}", path.display());
            std::process::exit(1);
        }
    };
    if let Some(url) = api_url {
        config.base_url = url;
    }
    config
}

fn build_client(config: &ClientConfig) -> HttpApiClient {
    match HttpApiClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

async fn cmd_send(config: &ClientConfig, message: &str, conversation: Option<i64>, json: bool) {
    let client = build_client(config);

    let mut store = ChatStore::new();
    store.set_conversation_id(conversation);
    send_flow(&mut store, &client, message).await;

    let Some(reply) = store.messages.iter().rev().find(|m| m.role == Role::Assistant) else {
        // Blank message: the flow refuses to send anything
        eprintln!("Error: message is empty");
        std::process::exit(1);
    };

    if json {
        let output = serde_json::json!({
            "conversation_id": store.conversation_id,
            "reply": reply.content,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).expect("failed to serialize")
        );
        return;
    }

    println!("{}", reply.content);
}

async fn cmd_conversations(config: &ClientConfig, json: bool) {
    let client = build_client(config);

    let conversations = match client.list_conversations().await {
        Ok(list) => list,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&conversations).expect("failed to serialize")
        );
        return;
    }

    if conversations.is_empty() {
        println!("No conversations");
        return;
    }

    println!("Conversations\n");
    for conversation in &conversations {
        print!("  #{}  {}", conversation.id, conversation.display_title());
        if let Some(created) = conversation.created_at {
            print!("  ({})", created.format("%Y-%m-%d %H:%M"));
        }
        println!();
    }
    println!("\n{} conversation(s)", conversations.len());
}

async fn cmd_show(config: &ClientConfig, id: i64, json: bool) {
    let client = build_client(config);

    let messages = match client.fetch_conversation(id).await {
        Ok(messages) => messages,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&messages).expect("failed to serialize")
        );
        return;
    }

    for msg in &messages {
        let speaker = match msg.role {
            Role::User => "you",
            Role::Assistant => "assistant",
        };
        println!("{speaker}: {}", msg.content);
        println!();
    }
}

fn cmd_init(config: &ClientConfig) {
    let path = ClientConfig::default_path();
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return;
    }

    match config.save(&path) {
        Ok(()) => println!("Created {}", path.display()),
        Err(e) => {
            eprintln!("Failed to write config: {e}");
            std::process::exit(1);
        }
    }
}
