//! steamlookup: Steam player identity resolution and profile aggregation.
//!
//! Normalizes any of the four textual Steam identifier forms (SteamID64,
//! SteamID3, SteamID2, vanity name) to a canonical SteamID64, then builds:
//!
//! - a **reputation** record from the ban-status endpoint;
//! - a **profile** record reconciled from the community markup document and
//!   the player-summary document, fetched concurrently.
//!
//! Results are cached per client with a TTL (30 minutes by default).
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use steamlookup::{ClientConfig, SteamLookup};
//!
//! let client = SteamLookup::new(ClientConfig::default().with_credential("KEY"))?;
//! let id = client.to_canonical_identifier("STEAM_0:0:84447").await?;
//! let profile = client.get_profile(&id.to_string()).await?;
//! println!("{:?}", profile.persona_name);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod profile;
pub mod reputation;
pub mod states;
pub mod steamid;
pub mod transport;
pub mod vanity;

pub use client::SteamLookup;
pub use config::ClientConfig;
pub use error::{ErrorEnvelope, LookupError};
pub use profile::{GameInfo, ProfileRecord};
pub use reputation::ReputationRecord;
pub use states::{CommunityVisibility, OnlineState};
pub use steamid::{IdentifierVariants, SteamId64};
pub use transport::{HttpResponse, HttpTransport, Transport, TransportError};
