//! Shared HTTP request executor used by every engine.

use async_trait::async_trait;
use reqwest::{Client, Proxy, RequestBuilder};
use std::time::Duration;
use tracing::debug;

use crate::config::ConfigBag;
use crate::error::{LingoError, Result};

/// Per-request transport settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub timeout: Option<Duration>,
    /// Full proxy URL, used for both http and https
    pub proxy: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestOptions {
    pub fn from_config(config: &ConfigBag) -> Self {
        let proxy = if config.proxy_enabled() {
            config.proxy().map(|p| format!("http://{}/", p))
        } else {
            None
        };

        Self {
            timeout: config.connection_timeout(),
            proxy,
            user_agent: None,
        }
    }

    pub fn with_user_agent(mut self, agent: &str) -> Self {
        self.user_agent = Some(agent.to_string());
        self
    }
}

/// Issues one request and returns the body of a successful response
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpExecutor: Send + Sync {
    async fn get(&mut self, url: &str, options: &RequestOptions) -> Result<String>;

    async fn post_form(
        &mut self,
        url: &str,
        form: &[(String, String)],
        options: &RequestOptions,
    ) -> Result<String>;
}

struct Session {
    client: Client,
    proxy: Option<String>,
    user_agent: Option<String>,
}

/// `reqwest` backed executor; the client is built on first use and reused
#[derive(Default)]
pub struct ReqwestExecutor {
    session: Option<Session>,
}

impl ReqwestExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&mut self, options: &RequestOptions) -> Result<Client> {
        let reusable = self.session.as_ref().is_some_and(|s| {
            s.proxy == options.proxy && s.user_agent == options.user_agent
        });

        if !reusable {
            debug!(
                "Creating HTTP session (proxy: {})",
                options.proxy.as_deref().unwrap_or("none")
            );
            let mut builder = Client::builder();
            if let Some(proxy) = &options.proxy {
                builder = builder.proxy(Proxy::all(proxy)?);
            }
            if let Some(agent) = &options.user_agent {
                builder = builder.user_agent(agent);
            }
            self.session = Some(Session {
                client: builder.build()?,
                proxy: options.proxy.clone(),
                user_agent: options.user_agent.clone(),
            });
        }

        self.session
            .as_ref()
            .map(|s| s.client.clone())
            .ok_or_else(|| LingoError::Transport("HTTP session unavailable".to_string()))
    }

    async fn send(request: RequestBuilder, url: &str, options: &RequestOptions) -> Result<String> {
        let request = match options.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                LingoError::Transport(format!("Request to {} timed out", url))
            } else {
                LingoError::Transport(format!("HTTP request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LingoError::Transport(format!(
                "{} responded with {}",
                url, status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| LingoError::Transport(format!("Failed to read response: {}", e)))
    }
}

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
    async fn get(&mut self, url: &str, options: &RequestOptions) -> Result<String> {
        debug!("GET {}", url);
        let client = self.client(options)?;
        Self::send(client.get(url), url, options).await
    }

    async fn post_form(
        &mut self,
        url: &str,
        form: &[(String, String)],
        options: &RequestOptions,
    ) -> Result<String> {
        debug!("POST {}", url);
        let client = self.client(options)?;
        Self::send(client.post(url).form(form), url, options).await
    }
}
