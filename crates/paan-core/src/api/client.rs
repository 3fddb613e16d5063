//! API client for the portal's Supabase project.
//!
//! `SupabaseClient` reads section tables, member profiles and event
//! registrations, and exchanges an email/password for a session.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, warn};

use crate::auth::SessionData;
use crate::models::{AccessHub, Event, MarketIntel, Offer, Opportunity, Registration, Resource, Update, User};
use crate::sections::Section;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// PostgREST prefix for table reads
const REST_PATH: &str = "rest/v1";

/// GoTrue prefix for authentication
const AUTH_PATH: &str = "auth/v1";

/// Profiles table holding each member's selected tier
const PROFILES_TABLE: &str = "profiles";

/// Event registrations table
const REGISTRATIONS_TABLE: &str = "event_registrations";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

#[derive(Debug, Deserialize)]
struct AuthResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    email: Option<String>,
}

/// Supabase REST client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
    token: Option<String>,
}

impl SupabaseClient {
    /// Create a client for a project URL (`https://<ref>.supabase.co`) and its anon key
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            token: None,
        })
    }

    /// Create a new client with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            anon_key: self.anon_key.clone(),
            token: Some(token),
        }
    }

    fn rest_url(&self, table: &str, query: &str) -> String {
        format!("{}/{}/{}?{}", self.base_url, REST_PATH, table, query)
    }

    /// Headers for every request: the anon key always, and the member token
    /// as bearer when signed in (the anon key otherwise).
    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        headers.insert("apikey", header::HeaderValue::from_str(&self.anon_key)?);
        let bearer = self.token.as_deref().unwrap_or(&self.anon_key);
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", bearer))?,
        );
        Ok(headers)
    }

    /// Sign in with email and password and return session data
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<SessionData> {
        let url = format!("{}/{}/token?grant_type=password", self.base_url, AUTH_PATH);
        let body = serde_json::json!({ "email": email, "password": password });

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send authentication request")?;

        let response = Self::check_response(response).await?;
        let auth: AuthResponse = response.json().await.context("Failed to parse auth response")?;

        Ok(session_from_auth(auth, email))
    }

    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(response: reqwest::Response) -> Result<Option<reqwest::Response>> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .get(url)
                .headers(self.auth_headers()?)
                .send()
                .await
                .with_context(|| format!("Failed to send GET request to {}", url))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    return response
                        .json()
                        .await
                        .with_context(|| format!("Failed to parse JSON response from {}", url));
                }
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(url = url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2;
                }
            }
        }
    }

    // ===== Data Fetching Methods =====

    /// Fetch every row of a section's table
    pub async fn fetch_section<T: DeserializeOwned>(&self, section: Section) -> Result<Vec<T>> {
        let url = self.rest_url(section.table(), "select=*");
        let rows: Vec<T> = self
            .get(&url)
            .await
            .with_context(|| format!("Failed to fetch {}", section.title()))?;
        debug!(section = %section, count = rows.len(), "Fetched section rows");
        Ok(rows)
    }

    pub async fn fetch_events(&self) -> Result<Vec<Event>> {
        self.fetch_section(Section::Events).await
    }

    pub async fn fetch_offers(&self) -> Result<Vec<Offer>> {
        self.fetch_section(Section::Offers).await
    }

    pub async fn fetch_resources(&self) -> Result<Vec<Resource>> {
        self.fetch_section(Section::Resources).await
    }

    pub async fn fetch_market_intel(&self) -> Result<Vec<MarketIntel>> {
        self.fetch_section(Section::MarketIntel).await
    }

    pub async fn fetch_opportunities(&self) -> Result<Vec<Opportunity>> {
        self.fetch_section(Section::Opportunities).await
    }

    pub async fn fetch_updates(&self) -> Result<Vec<Update>> {
        self.fetch_section(Section::Updates).await
    }

    pub async fn fetch_access_hubs(&self) -> Result<Vec<AccessHub>> {
        self.fetch_section(Section::AccessHubs).await
    }

    /// Fetch a member's profile. `None` when no profile row exists yet.
    pub async fn fetch_profile(&self, user_id: &str) -> Result<Option<User>> {
        let url = self.rest_url(PROFILES_TABLE, &format!("select=*&id=eq.{}", user_id));
        let mut rows: Vec<User> = self.get(&url).await.context("Failed to fetch profile")?;
        if rows.is_empty() {
            warn!(user_id = user_id, "No profile found for user");
            return Ok(None);
        }
        Ok(Some(rows.swap_remove(0)))
    }

    /// Fetch the events a member has registered for
    pub async fn fetch_registrations(&self, user_id: &str) -> Result<Vec<Registration>> {
        let url = self.rest_url(REGISTRATIONS_TABLE, &format!("select=*&user_id=eq.{}", user_id));
        self.get(&url).await.context("Failed to fetch event registrations")
    }
}

fn session_from_auth(auth: AuthResponse, email: &str) -> SessionData {
    SessionData {
        access_token: auth.access_token,
        refresh_token: auth.refresh_token,
        user_id: auth.user.id,
        email: auth.user.email.unwrap_or_else(|| email.to_string()),
        expires_in: auth.expires_in.unwrap_or(3600),
        created_at: Utc::now(),
    }
}
