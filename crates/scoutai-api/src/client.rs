// HTTP client for the ScoutAI backend (`/api/*` JSON endpoints).

use std::time::Duration;

use reqwest::header::COOKIE;
use reqwest::{RequestBuilder, StatusCode};
use scoutai_core::config::Config;
use scoutai_core::player::Player;
use scoutai_scouting::chatbot::conversation_starters;
use scoutai_scouting::filters::{quick_search, PlayerFilter, SortOrder, StatRange, MAX_LIMIT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::error::{server_message, ApiError};

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Reply from `/chatbot/chat`. The server sends criteria values as strings,
/// so they stay untyped here.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub criteria: Value,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SuggestionsResponse {
    suggestions: Vec<String>,
}

/// Body of `/health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

fn put_text(body: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        body.insert(key.to_string(), json!(v));
    }
}

fn put_range(body: &mut Map<String, Value>, prefix: &str, range: &StatRange) {
    if let Some(min) = range.min {
        body.insert(format!("{prefix}_min"), json!(min));
    }
    if let Some(max) = range.max {
        body.insert(format!("{prefix}_max"), json!(max));
    }
}

/// JSON body for `POST /filter_players`. Unset criteria are omitted.
pub fn filter_body(filter: &PlayerFilter) -> Value {
    let mut body = Map::new();
    put_text(&mut body, "style", &filter.style);
    put_text(&mut body, "position", &filter.position);
    put_text(&mut body, "Squad", &filter.squad);
    put_text(&mut body, "league", &filter.league);
    put_text(&mut body, "playerName", &filter.player_name);
    if let Some(min) = filter.min_age {
        body.insert("minAge".into(), json!(min));
    }
    if let Some(max) = filter.max_age {
        body.insert("maxAge".into(), json!(max));
    }
    if let Some(budget) = filter.budget {
        body.insert("budget".into(), json!(budget));
    }
    put_range(&mut body, "goals", &filter.goals);
    put_range(&mut body, "assists", &filter.assists);
    put_range(&mut body, "xg", &filter.xg);
    put_range(&mut body, "tackles", &filter.tackles);
    let order = match filter.sort_order {
        SortOrder::Asc => "asc",
        SortOrder::Desc => "desc",
    };
    body.insert("sort_order".into(), json!(order));
    Value::Object(body)
}

/// `Cookie` header value for a configured session. A bare value is taken to
/// be the Flask `session` cookie.
pub fn cookie_header(session: &str) -> String {
    let session = session.trim();
    if session.contains('=') {
        session.to_string()
    } else {
        format!("session={session}")
    }
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Async client for the backend. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session_cookie: Option<String>,
}

impl ApiClient {
    /// Build a client for `base_url` (including the `/api` prefix).
    pub fn new(
        base_url: &str,
        timeout: Duration,
        session_cookie: Option<String>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|source| ApiError::Transport {
                url: base_url.to_string(),
                source,
            })?;
        Ok(Self::with_http(http, base_url, session_cookie))
    }

    /// Wrap an already configured `reqwest::Client`.
    pub fn with_http(http: reqwest::Client, base_url: &str, session_cookie: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_cookie: session_cookie.filter(|c| !c.trim().is_empty()),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(
            &config.api.base_url,
            Duration::from_secs(config.api.timeout_secs),
            config.credentials.session_cookie.clone(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn with_session(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.session_cookie {
            Some(cookie) => request.header(COOKIE, cookie_header(cookie)),
            None => request,
        }
    }

    /// Send `request` and decode a JSON body, mapping HTTP failures to
    /// [`ApiError`].
    async fn send<T: DeserializeOwned>(&self, url: &str, request: RequestBuilder) -> Result<T, ApiError> {
        let transport = |source| ApiError::Transport {
            url: url.to_string(),
            source,
        };
        let response = self.with_session(request).send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        debug!(url, status = status.as_u16(), bytes = body.len(), "api response");

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                message: server_message(&body)
                    .or_else(|| status.canonical_reason().map(str::to_string))
                    .unwrap_or_default(),
            });
        }
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// `POST /filter_players`.
    ///
    /// The server caps results at 100 and has no notion of `priced_only` or
    /// a custom limit; both are applied here after the call.
    pub async fn filter_players(&self, filter: &PlayerFilter) -> Result<Vec<Player>, ApiError> {
        filter.validate()?;
        let url = self.url("filter_players");
        let mut players: Vec<Player> = self
            .send(&url, self.http.post(&url).json(&filter_body(filter)))
            .await?;
        if filter.priced_only {
            players.retain(|p| p.market_value.is_some_and(|v| v > 0.0));
        }
        players.truncate(filter.effective_limit());
        Ok(players)
    }

    /// [`filter_players`](Self::filter_players) narrowed to names or clubs
    /// containing `query`.
    ///
    /// The full server page is fetched before narrowing so the limit counts
    /// matches only, as the offline search does.
    pub async fn filter_players_matching(
        &self,
        filter: &PlayerFilter,
        query: &str,
    ) -> Result<Vec<Player>, ApiError> {
        let page = PlayerFilter {
            limit: MAX_LIMIT,
            ..filter.clone()
        };
        let found = self.filter_players(&page).await?;
        let mut players: Vec<Player> = quick_search(&found, query).into_iter().cloned().collect();
        players.truncate(filter.effective_limit());
        Ok(players)
    }

    /// `GET /players/{id}`. A 404 is `Ok(None)`.
    pub async fn get_player(&self, player_id: i64) -> Result<Option<Player>, ApiError> {
        let url = self.url(&format!("players/{player_id}"));
        match self.send(&url, self.http.get(&url)).await {
            Ok(player) => Ok(Some(player)),
            Err(ApiError::Status { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// `GET /players/search?q=..&limit=..`.
    pub async fn search_players(&self, query: &str, limit: usize) -> Result<Vec<Player>, ApiError> {
        let url = self.url("players/search");
        let request = self
            .http
            .get(&url)
            .query(&[("q", query.to_string()), ("limit", limit.to_string())]);
        self.send(&url, request).await
    }

    /// `GET /players/all`.
    pub async fn all_players(&self) -> Result<Vec<Player>, ApiError> {
        let url = self.url("players/all");
        self.send(&url, self.http.get(&url)).await
    }

    /// `POST /chatbot/chat`.
    pub async fn chat(&self, message: &str) -> Result<ChatResponse, ApiError> {
        let url = self.url("chatbot/chat");
        self.send(&url, self.http.post(&url).json(&json!({ "message": message })))
            .await
    }

    /// `GET /chatbot/suggestions`, falling back to the built-in starters on
    /// any failure.
    pub async fn suggestions(&self) -> Vec<String> {
        let url = self.url("chatbot/suggestions");
        match self.send::<SuggestionsResponse>(&url, self.http.get(&url)).await {
            Ok(r) if !r.suggestions.is_empty() => r.suggestions,
            Ok(_) => fallback_suggestions(),
            Err(e) => {
                warn!("using built-in chat suggestions: {}", e);
                fallback_suggestions()
            }
        }
    }

    /// `GET /health`. An unhealthy backend answers 503 with a status body;
    /// that body is returned rather than treated as an error.
    pub async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        let url = self.url("health");
        let transport = |source| ApiError::Transport {
            url: url.clone(),
            source,
        };
        let response = self.http.get(&url).send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        match serde_json::from_str::<HealthStatus>(&body) {
            Ok(health) => Ok(health),
            Err(source) if status.is_success() => Err(ApiError::Decode { url, source }),
            Err(_) => Err(ApiError::Status {
                status: status.as_u16(),
                message: server_message(&body).unwrap_or_else(|| "API unavailable".to_string()),
                url,
            }),
        }
    }
}

fn fallback_suggestions() -> Vec<String> {
    conversation_starters().iter().map(|s| s.to_string()).collect()
}
