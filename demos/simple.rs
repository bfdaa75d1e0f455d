//! Non-streaming completion example.
//!
//! Run with:
//! ```bash
//! export OPENAI_API_KEY="your-api-key"
//! cargo run --example simple
//! ```

use chatstream::{ChatClient, ChatMessage, ClientConfig};

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
            .with_temperature(0.7)
            .with_max_tokens(200),
    );

    let messages = vec![
        ChatMessage::system("You are a concise copywriter."),
        ChatMessage::user("Write a one-line tagline for a neighborhood bakery."),
    ];

    match client.complete(messages).await {
        Ok(completion) => {
            println!("{}", completion.content);
            println!(
                "model: {}, total tokens: {:?}",
                completion.model, completion.usage.total_tokens
            );
        }
        Err(err) => {
            eprintln!("[{}] {}", err.code(), err);
            eprintln!("hint: {}", err.solution());
        }
    }

    Ok(())
}
