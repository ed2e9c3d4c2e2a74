//! The lookup client.
//!
//! [`SteamLookup`] owns its configuration, its transport, and its
//! [`LookupCache`]. Nothing is shared between two clients. Each operation
//! checks the credential, validates its input, consults the cache, and on a
//! miss performs its upstream call(s). Only successful records are cached.

use std::time::Instant;

use crate::cache::LookupCache;
use crate::config::ClientConfig;
use crate::error::LookupError;
use crate::profile::{self, ProfileRecord};
use crate::reputation::{self, ReputationRecord};
use crate::steamid::{self, Classified, SteamId64};
use crate::transport::{HttpResponse, HttpTransport, Transport, TransportError};
use crate::vanity;

const PLAYER_BANS_PATH: &str = "ISteamUser/GetPlayerBans/v1/";
const PLAYER_SUMMARIES_PATH: &str = "ISteamUser/GetPlayerSummaries/v0002/";
const RESOLVE_VANITY_PATH: &str = "ISteamUser/ResolveVanityURL/v0001/";

/// Resolves Steam identifiers and aggregates profile and ban data.
pub struct SteamLookup<T: Transport = HttpTransport> {
    config: ClientConfig,
    transport: T,
    cache: LookupCache,
}

impl SteamLookup<HttpTransport> {
    /// Create a client backed by a reqwest transport using the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> SteamLookup<T> {
    /// Create a client over an arbitrary transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let cache = if config.cache_enabled {
            LookupCache::new(config.cache_ttl(), config.cache_max_entries)
        } else {
            LookupCache::disabled()
        };

        Self {
            config,
            transport,
            cache,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn cache(&self) -> &LookupCache {
        &self.cache
    }

    /// Drop every cached record.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Ban status for a canonical SteamID64.
    ///
    /// Alternate id forms and vanity names are rejected; resolve them with
    /// [`Self::to_canonical_identifier`] first.
    pub async fn get_reputation(&self, identifier: &str) -> Result<ReputationRecord, LookupError> {
        let key = self.credential()?;
        let id = SteamId64::parse(identifier)?;

        if let Some(hit) = self.cache.reputation().and_then(|c| c.get(identifier)) {
            return Ok(hit);
        }

        let url = self.api_url(PLAYER_BANS_PATH, &[("key", key), ("steamids", identifier)])?;
        let resp = self.fetch("player_bans", &url).await?;
        if resp.status != 200 {
            return Err(LookupError::UnexpectedStatus {
                status: resp.status,
            });
        }

        let mut record = reputation::parse_player_bans(resp.status, &resp.body)?;
        if self.config.debug {
            record.steamid64 = Some(id);
        }

        if let Some(cache) = self.cache.reputation() {
            cache.insert(id.to_string(), record.clone());
        }
        tracing::debug!(steamid64 = %id, "reputation resolved");
        Ok(record)
    }

    /// Reconciled public profile for a canonical SteamID64.
    ///
    /// The markup and structured documents are fetched concurrently. A
    /// missing-profile signal from the markup source or a missing
    /// structured entry fails the lookup; any other markup failure is
    /// tolerated and the record is built from the structured entry alone.
    pub async fn get_profile(&self, identifier: &str) -> Result<ProfileRecord, LookupError> {
        let key = self.credential()?;
        let id = SteamId64::parse(identifier)?;

        if let Some(hit) = self.cache.profile().and_then(|c| c.get(identifier)) {
            return Ok(hit);
        }

        let markup_url = format!(
            "{}/profiles/{id}/?xml=true",
            self.config.community_base.trim_end_matches('/')
        );
        let summary_url =
            self.api_url(PLAYER_SUMMARIES_PATH, &[("key", key), ("steamids", identifier)])?;

        let (markup_resp, summary_resp) = tokio::join!(
            self.fetch("profile_markup", &markup_url),
            self.fetch("player_summaries", &summary_url),
        );

        let markup = match markup_resp {
            Ok(resp) => match profile::parse_markup(resp.status, &resp.body) {
                Ok(doc) => {
                    if let Some(message) = doc.not_found() {
                        return Err(LookupError::UserNotFound {
                            status: resp.status,
                            message: message.to_string(),
                        });
                    }
                    if resp.status == 200 {
                        Some(doc)
                    } else {
                        tracing::warn!(steamid64 = %id, status = resp.status, "markup source returned unexpected status, using structured source only");
                        None
                    }
                }
                Err(e) => {
                    tracing::warn!(steamid64 = %id, error = %e, "markup source undecodable, using structured source only");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(steamid64 = %id, error = %e, "markup source unavailable, using structured source only");
                None
            }
        };

        let summary_resp = summary_resp?;
        if summary_resp.status != 200 {
            return Err(LookupError::UnexpectedStatus {
                status: summary_resp.status,
            });
        }
        let summary = profile::parse_player_summary(summary_resp.status, &summary_resp.body)?;

        let record = profile::reconcile(id, &self.config.community_base, markup.as_ref(), &summary);

        if let Some(cache) = self.cache.profile() {
            cache.insert(id.to_string(), record.clone());
        }
        tracing::debug!(steamid64 = %id, in_game = record.in_game, "profile resolved");
        Ok(record)
    }

    /// Resolve a vanity name to its SteamID64.
    pub async fn resolve_vanity(&self, name: &str) -> Result<SteamId64, LookupError> {
        let key = self.credential()?;
        if name.trim().is_empty() {
            return Err(LookupError::invalid("vanity name must not be empty"));
        }

        if let Some(hit) = self.cache.vanity().and_then(|c| c.get(name)) {
            return Ok(hit);
        }

        let url = self.api_url(RESOLVE_VANITY_PATH, &[("key", key), ("vanityurl", name)])?;
        let resp = self.fetch("resolve_vanity", &url).await?;
        if resp.status != 200 {
            return Err(LookupError::UnexpectedStatus {
                status: resp.status,
            });
        }

        let id = vanity::parse_vanity(resp.status, &resp.body)?;
        if let Some(cache) = self.cache.vanity() {
            cache.insert(name.to_string(), id);
        }
        tracing::debug!(vanity = name, steamid64 = %id, "vanity resolved");
        Ok(id)
    }

    /// Convert any supported identifier form to a SteamID64.
    ///
    /// SteamID64, SteamID3 and SteamID2 inputs convert locally; anything else
    /// is resolved as a vanity name. A failed vanity resolution is reported
    /// as [`LookupError::UnresolvedIdentifier`], except a missing credential,
    /// which is reported as is.
    pub async fn to_canonical_identifier(&self, data: &str) -> Result<SteamId64, LookupError> {
        match steamid::classify(data)? {
            Classified::Canonical(id) => Ok(id),
            Classified::Vanity(name) => match self.resolve_vanity(&name).await {
                Ok(id) => Ok(id),
                Err(e @ LookupError::Configuration(_)) => Err(e),
                Err(e) => Err(LookupError::UnresolvedIdentifier {
                    input: data.to_string(),
                    reason: e.to_string(),
                }),
            },
        }
    }

    fn credential(&self) -> Result<&str, LookupError> {
        self.config
            .credential()
            .ok_or_else(LookupError::missing_credential)
    }

    fn api_url(&self, path: &str, params: &[(&str, &str)]) -> Result<String, LookupError> {
        let base = format!("{}/{path}", self.config.api_base.trim_end_matches('/'));
        url::Url::parse_with_params(&base, params)
            .map(String::from)
            .map_err(|e| LookupError::Configuration(format!("invalid API base URL '{base}': {e}")))
    }

    /// One upstream call, with timing, metrics and optional payload logging.
    async fn fetch(&self, endpoint: &'static str, url: &str) -> Result<HttpResponse, TransportError> {
        let start = Instant::now();
        let result = self.transport.get(url).await;
        let duration_ms = start.elapsed().as_millis() as u64;
        crate::metrics::record_upstream_call(endpoint, result.is_ok(), duration_ms);

        match &result {
            Ok(resp) => {
                tracing::debug!(endpoint, status = resp.status, duration_ms, "upstream call");
                if self.config.debug {
                    tracing::debug!(endpoint, body = %resp.body, "upstream body");
                }
            }
            Err(e) => {
                tracing::debug!(endpoint, status = ?e.status, error = %e, duration_ms, "upstream call failed");
            }
        }
        result
    }
}
