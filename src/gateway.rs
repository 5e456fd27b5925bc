//! REST client for the SA-AI chat gateway
//!
//! Implements the documented contract: list/get/create/update/delete over
//! chat resources, an append-message operation, and the login/signup
//! endpoints. Every chat route carries the session's bearer token; any
//! non-2xx response is mapped to a structured error carrying the actual
//! HTTP status, with 401 mapped to [`SachatError::Auth`] so callers can
//! trigger the forced-logout procedure without inspecting error text.
//!
//! The base URL is injectable, which lets tests point the client at a
//! wiremock server.

use crate::error::{Result, SachatError};
use crate::types::{Chat, Message};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default request timeout; a non-responding gateway surfaces as a
/// generic transport failure after this elapses
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Request body for creating a chat
#[derive(Debug, Serialize)]
struct CreateChatRequest<'a> {
    title: &'a str,
    messages: &'a [Message],
}

/// Partial update body for a chat
///
/// Only the present fields are sent; the gateway treats the body as a
/// partial update.
#[derive(Debug, Default, Serialize)]
pub struct UpdateChatRequest {
    /// New title, if changing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Replacement message list, if changing (empty list clears the chat)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
}

/// Request body for appending a message
#[derive(Debug, Serialize)]
struct AppendMessageRequest<'a> {
    role: &'a str,
    content: &'a str,
}

/// Credentials for `/auth/login`
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Credentials for `/auth/signup`
#[derive(Debug, Serialize)]
struct SignupRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

/// User record inside an auth response
#[derive(Debug, Deserialize)]
pub struct AuthUser {
    /// Server-side user identifier
    #[serde(alias = "_id")]
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
}

/// Successful login/signup response
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    /// The authenticated user
    pub user: AuthUser,
    /// Bearer token for subsequent requests
    pub token: String,
}

/// HTTP client for the chat gateway
///
/// # Examples
///
/// ```no_run
/// use sachat::gateway::ChatGateway;
///
/// # async fn example() -> sachat::error::Result<()> {
/// let gateway = ChatGateway::new("https://api.example.com/api", "tok")?;
/// let chats = gateway.list_chats().await?;
/// # Ok(())
/// # }
/// ```
pub struct ChatGateway {
    client: Client,
    base_url: String,
    token: String,
}

impl ChatGateway {
    /// Creates a gateway client with the default timeout
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, token, DEFAULT_TIMEOUT)
    }

    /// Creates a gateway client with an explicit timeout
    pub fn with_timeout(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SachatError::Http)?;
        Ok(Self {
            client,
            base_url: trim_base(base_url.into()),
            token: token.into(),
        })
    }

    /// Lists all chats for the authenticated user
    pub async fn list_chats(&self) -> Result<Vec<Chat>> {
        tracing::debug!("GET /chat");
        let response = self
            .client
            .get(format!("{}/chat", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(SachatError::Http)?;
        let response = check_status(response).await?;
        let chats = response.json().await.map_err(SachatError::Http)?;
        Ok(chats)
    }

    /// Fetches a single chat with its full message list
    pub async fn get_chat(&self, id: &str) -> Result<Chat> {
        tracing::debug!("GET /chat/{}", id);
        let response = self
            .client
            .get(format!("{}/chat/{}", self.base_url, id))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(SachatError::Http)?;
        let response = check_status(response).await?;
        let chat = response.json().await.map_err(SachatError::Http)?;
        Ok(chat)
    }

    /// Creates a chat; the response carries the server-assigned id
    pub async fn create_chat(&self, title: &str, messages: &[Message]) -> Result<Chat> {
        tracing::debug!("POST /chat");
        let response = self
            .client
            .post(format!("{}/chat", self.base_url))
            .bearer_auth(&self.token)
            .json(&CreateChatRequest { title, messages })
            .send()
            .await
            .map_err(SachatError::Http)?;
        let response = check_status(response).await?;
        let chat = response.json().await.map_err(SachatError::Http)?;
        Ok(chat)
    }

    /// Applies a partial update to a chat
    pub async fn update_chat(&self, id: &str, update: &UpdateChatRequest) -> Result<Chat> {
        tracing::debug!("PUT /chat/{}", id);
        let response = self
            .client
            .put(format!("{}/chat/{}", self.base_url, id))
            .bearer_auth(&self.token)
            .json(update)
            .send()
            .await
            .map_err(SachatError::Http)?;
        let response = check_status(response).await?;
        let chat = response.json().await.map_err(SachatError::Http)?;
        Ok(chat)
    }

    /// Deletes a chat
    pub async fn delete_chat(&self, id: &str) -> Result<()> {
        tracing::debug!("DELETE /chat/{}", id);
        let response = self
            .client
            .delete(format!("{}/chat/{}", self.base_url, id))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(SachatError::Http)?;
        check_status(response).await?;
        Ok(())
    }

    /// Appends a user message to a chat
    ///
    /// The gateway may answer with the updated chat (possibly already
    /// containing the assistant reply) or a bare ack; the body is ignored
    /// either way and the next read reconciles through the cache.
    pub async fn send_message(&self, id: &str, content: &str) -> Result<()> {
        tracing::debug!("POST /chat/{}/message", id);
        let response = self
            .client
            .post(format!("{}/chat/{}/message", self.base_url, id))
            .bearer_auth(&self.token)
            .json(&AppendMessageRequest {
                role: "user",
                content,
            })
            .send()
            .await
            .map_err(SachatError::Http)?;
        check_status(response).await?;
        Ok(())
    }

    /// Logs in with email and password
    ///
    /// Runs without a token; the returned token seeds the session.
    pub async fn login(base_url: &str, email: &str, password: &str) -> Result<AuthResponse> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(SachatError::Http)?;
        let response = client
            .post(format!("{}/auth/login", trim_base(base_url.to_string())))
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(SachatError::Http)?;
        let response = check_status(response).await?;
        let auth = response.json().await.map_err(SachatError::Http)?;
        Ok(auth)
    }

    /// Registers a new account
    pub async fn signup(
        base_url: &str,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(SachatError::Http)?;
        let response = client
            .post(format!("{}/auth/signup", trim_base(base_url.to_string())))
            .json(&SignupRequest {
                name,
                email,
                password,
            })
            .send()
            .await
            .map_err(SachatError::Http)?;
        let response = check_status(response).await?;
        let auth = response.json().await.map_err(SachatError::Http)?;
        Ok(auth)
    }
}

fn trim_base(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}

/// Maps a non-2xx response into a structured error
///
/// 401 becomes [`SachatError::Auth`]; everything else becomes
/// [`SachatError::Gateway`] with the status and body text.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let code = status.as_u16();
    if code == 401 {
        tracing::warn!("Gateway rejected credentials (HTTP 401)");
        return Err(SachatError::Auth(code).into());
    }
    let message = response.text().await.unwrap_or_default();
    let message = if message.is_empty() {
        status.to_string()
    } else {
        message
    };
    Err(SachatError::Gateway {
        status: code,
        message,
    }
    .into())
}
