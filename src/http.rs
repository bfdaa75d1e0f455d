//! HTTP client construction shared by the streaming and non-streaming paths.

use reqwest::{Client, RequestBuilder};
use std::collections::HashMap;

use crate::config::ClientConfig;

/// Build a configured HTTP client from a [`ClientConfig`].
///
/// Applies the timeout and proxy, when set. The timeout is the caller's only
/// cancellation mechanism; the core imposes none of its own.
pub fn build_http_client(config: &ClientConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder();

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(proxy_url) = &config.proxy {
        if let Ok(proxy) = reqwest::Proxy::all(proxy_url) {
            builder = builder.proxy(proxy);
        }
    }

    builder.build()
}

/// Add extra headers to a request if specified in the configuration.
pub fn add_extra_headers(
    mut request: RequestBuilder,
    extra_headers: &Option<HashMap<String, String>>,
) -> RequestBuilder {
    if let Some(headers) = extra_headers {
        for (key, value) in headers {
            request = request.header(key, value);
        }
    }
    request
}
