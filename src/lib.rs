//! # chatstream - Streaming chat-completions client
//!
//! A small, pragmatic Rust library for calling OpenAI-compatible
//! chat-completion endpoints and ingesting their responses, streaming or not.
//!
//! ## Features
//! - Async-first, tokio compatible
//! - SSE transport decoding that is safe across arbitrary chunk boundaries
//!   (lines and multi-byte characters split mid-chunk are reassembled intact)
//! - Incremental delta aggregation with a per-call sink callback
//! - Failure classification into actionable categories with remediation text
//! - Opt-in bounded retry decorator; the core itself never retries
//!
//! ## Architecture
//!
//! Three cooperating layers per call:
//!
//! 1. **Transport decoding** ([`sse`]): chunked response bytes become complete
//!    SSE frame bodies.
//! 2. **Interpretation** ([`stream`]): frame bodies become content deltas and
//!    usage updates, accumulated into a final [`Completion`].
//! 3. **Classification** ([`error`]): any failure becomes a structured
//!    [`Error`] carrying a machine-readable code and a remediation string.
//!
//! Each call owns all of its state; the crate keeps no globals. Configuration
//! is explicit via [`ClientConfig`].
//!
//! ## Example
//! ```no_run
//! use chatstream::{ChatClient, ChatMessage, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ChatClient::new(
//!         ClientConfig::new(std::env::var("OPENAI_API_KEY")?)
//!             .with_model("gpt-4o-mini".to_string()),
//!     );
//!
//!     let completion = client
//!         .complete_stream_with(
//!             vec![ChatMessage::user("Say hello in five words")],
//!             |delta, _accumulated| print!("{delta}"),
//!         )
//!         .await?;
//!
//!     println!("\nmodel: {}", completion.model);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod retry;
pub mod sse;
pub mod stream;

// Re-exports for convenience
pub use client::{ChatClient, DEFAULT_API_BASE, DEFAULT_MODEL};
pub use config::{ClientConfig, SecretString};
pub use error::{Error, ErrorDetails, MalformedKind};
pub use model::{ChatMessage, Completion, Role, Usage};
pub use retry::RetryPolicy;
pub use stream::{StreamCollector, StreamSink};
