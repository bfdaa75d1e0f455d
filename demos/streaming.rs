//! Streaming completion example with a live sink and a retry policy.
//!
//! Run with:
//! ```bash
//! export OPENAI_API_KEY="your-api-key"
//! cargo run --example streaming
//! ```

use std::io::Write;

use chatstream::{ChatClient, ChatMessage, ClientConfig, RetryPolicy};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let api_key =
        std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY environment variable must be set");

    let client = ChatClient::new(
        ClientConfig::new(api_key)
            .with_model("gpt-4o-mini".to_string())
            .with_temperature(0.9),
    );

    let policy = RetryPolicy::default();
    let completion = policy
        .run(|| {
            client.complete_stream_with(
                vec![ChatMessage::user(
                    "Draft three short headline options for a landing page about home coffee roasting.",
                )],
                |delta, _accumulated| {
                    print!("{delta}");
                    let _ = std::io::stdout().flush();
                },
            )
        })
        .await?;

    println!();
    println!(
        "model: {}, total tokens: {:?}",
        completion.model, completion.usage.total_tokens
    );

    Ok(())
}
