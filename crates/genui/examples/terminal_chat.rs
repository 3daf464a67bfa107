//! # Terminal chat – prose and Sandpack calls in a shell
//!
//! Talks to the Sandpack assistant from the command line. Prose streams in as
//! it arrives; a `show_sandpack_editor` call is printed as the code it would
//! render.
//!
//! ```bash
//! export OPENAI_API_KEY=sk-…      # mandatory
//! export GENUI_MODEL=gpt-4o-mini  # optional
//! RUST_LOG=genui_core=debug cargo run -p genui --example terminal_chat
//! ```
//!
//! Type a message and press enter. `/edit <code>` opens the editor with your
//! own code after the configured delay, `/quit` leaves.

use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};

use genui::{
    ChatSession, Dispatcher, PresentationBridge, SessionConfig, openai::OpenAiAdapterBuilder,
    sandpack::default_registry,
};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Prints the unseen suffix of each text update.
#[derive(Default)]
struct TerminalBridge {
    printed: Mutex<usize>,
}

impl TerminalBridge {
    fn reset(&self) {
        if let Ok(mut printed) = self.printed.lock() {
            *printed = 0;
        }
    }
}

impl PresentationBridge for TerminalBridge {
    fn text_update(&self, text: &str, is_final: bool) {
        let Ok(mut printed) = self.printed.lock() else {
            return;
        };

        if *printed == 0 {
            print!("Assistant: ");
        }
        print!("{}", text.get(*printed..).unwrap_or_default());
        *printed = text.len();

        if is_final {
            println!();
            *printed = 0;
        }
        io::stdout().flush().ok();
    }

    fn function_call_result(&self, name: &str, arguments: &Value) {
        println!("\n[{name}]");
        match arguments.get("code").and_then(Value::as_str) {
            Some(code) => println!("{code}"),
            None => println!("{arguments:#}"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // 1. Backend and session (needs `OPENAI_API_KEY` in the env).
    let backend = OpenAiAdapterBuilder::new_from_env().build()?;
    let mut session = ChatSession::new(
        Dispatcher::new(backend),
        Arc::new(default_registry()?),
        SessionConfig::from_env()?,
    );
    let bridge = Arc::new(TerminalBridge::default());

    // 2. One line per user message.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print!("You: ");
    io::stdout().flush().ok();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();

        if line == "/quit" {
            break;
        } else if let Some(code) = line.strip_prefix("/edit ") {
            session.show_sandpack_editor(code, bridge.clone());
        } else if !line.is_empty() {
            if let Err(err) = session.submit_user_message(line, bridge.as_ref()).await {
                bridge.reset();
                eprintln!("\nError: {err}");
            }
        }

        print!("You: ");
        io::stdout().flush().ok();
    }

    session.join_background().await?;
    println!("\n{} turns recorded.", session.history().len());
    Ok(())
}
