//! Profile documents and field reconciliation.
//!
//! A profile is assembled from two documents for the same account:
//!
//! - the community **markup** document (`/profiles/<id>/?xml=true`), which
//!   carries the community-facing fields and uses lowercase state words;
//! - the **structured** player-summary document, which carries numeric state
//!   codes and the account creation time.
//!
//! Every reconciled field follows the same precedence: the markup value when
//! present, else the structured value, else `None`. Presence is decided by
//! `Option`, never by truthiness, so `0` and `false` survive. Markup text that
//! is empty (an empty tag or empty CDATA) counts as absent.

use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::states::{CommunityVisibility, OnlineState};
use crate::steamid::{IdentifierVariants, SteamId64};

/// Markup error text meaning the account does not exist.
pub const PROFILE_NOT_FOUND: &str = "The specified profile could not be found.";

/// Fixed prefix of the markup source's game link; the remainder is the app id.
pub const GAME_LINK_PREFIX: &str = "https://steamcommunity.com/app/";

const IN_GAME: &str = "in-game";

/// Reconciled public profile of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub custom_url: Option<String>,
    pub url: String,
    pub persona_name: Option<String>,
    pub in_game: bool,
    pub game_info: Option<GameInfo>,
    /// Numeric [`OnlineState`] code as a string.
    pub online_state: Option<String>,
    /// Numeric [`CommunityVisibility`] code as a string.
    pub privacy: Option<String>,
    pub avatar: Option<String>,
    pub avatar_mid: Option<String>,
    pub avatar_small: Option<String>,
    pub account_limited: Option<bool>,
    pub member_since: Option<String>,
    /// Unix timestamp.
    pub profile_created: Option<i64>,
    pub location: Option<String>,
    pub real_name: Option<String>,
    pub comment_permissions: bool,
    pub identifiers: IdentifierVariants,
}

/// Game the account is currently playing, from the markup source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    pub name: Option<String>,
    pub appid: Option<String>,
    pub icon: Option<String>,
    pub logo: Option<String>,
    pub logo_small: Option<String>,
}

// ---------------------------------------------------------------------------
// Markup document
// ---------------------------------------------------------------------------

/// Decoded community markup document.
///
/// The same shape decodes both `<profile>` and `<response><error>` roots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MarkupProfile {
    #[serde(rename = "steamID")]
    pub persona_name: Option<String>,
    #[serde(rename = "onlineState")]
    pub online_state: Option<String>,
    #[serde(rename = "privacyState")]
    pub privacy_state: Option<String>,
    #[serde(rename = "avatarIcon")]
    pub avatar_icon: Option<String>,
    #[serde(rename = "avatarMedium")]
    pub avatar_medium: Option<String>,
    #[serde(rename = "avatarFull")]
    pub avatar_full: Option<String>,
    #[serde(rename = "isLimitedAccount")]
    pub is_limited_account: Option<String>,
    #[serde(rename = "customURL")]
    pub custom_url: Option<String>,
    #[serde(rename = "memberSince")]
    pub member_since: Option<String>,
    pub location: Option<String>,
    pub realname: Option<String>,
    #[serde(rename = "inGameInfo")]
    pub in_game_info: Option<MarkupGame>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MarkupGame {
    #[serde(rename = "gameName")]
    pub name: Option<String>,
    #[serde(rename = "gameLink")]
    pub link: Option<String>,
    #[serde(rename = "gameIcon")]
    pub icon: Option<String>,
    #[serde(rename = "gameLogo")]
    pub logo: Option<String>,
    #[serde(rename = "gameLogoSmall")]
    pub logo_small: Option<String>,
}

impl MarkupProfile {
    /// The not-found message, when the document signals a missing account.
    pub fn not_found(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| *e == PROFILE_NOT_FOUND)
    }
}

/// Decode a markup body.
pub fn parse_markup(status: u16, body: &str) -> Result<MarkupProfile, LookupError> {
    quick_xml::de::from_str(body).map_err(|e| LookupError::malformed(status, e))
}

// ---------------------------------------------------------------------------
// Structured document
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PlayerSummariesDocument {
    #[serde(default)]
    response: PlayerSummariesResponse,
}

#[derive(Debug, Default, Deserialize)]
struct PlayerSummariesResponse {
    #[serde(default)]
    players: Vec<PlayerSummary>,
}

/// One entry of the player-summary document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlayerSummary {
    pub personaname: Option<String>,
    pub personastate: Option<i64>,
    pub communityvisibilitystate: Option<i64>,
    pub avatar: Option<String>,
    pub avatarmedium: Option<String>,
    pub avatarfull: Option<String>,
    pub realname: Option<String>,
    pub timecreated: Option<i64>,
    pub commentpermission: Option<i64>,
}

/// Decode a 200 player-summary body, requiring one entry.
pub fn parse_player_summary(status: u16, body: &str) -> Result<PlayerSummary, LookupError> {
    let document: PlayerSummariesDocument =
        serde_json::from_str(body).map_err(|e| LookupError::malformed(status, e))?;

    document
        .response
        .players
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::UserNotFound {
            status,
            message: "Steam did not return with a user".to_string(),
        })
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// First present value: markup before structured.
fn prefer<T>(markup: Option<T>, structured: Option<T>) -> Option<T> {
    markup.or(structured)
}

/// Markup text, with empty content treated as absent.
fn text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn limited_flag(value: &Option<String>) -> Option<bool> {
    match text(value).as_deref() {
        Some("1") => Some(true),
        Some("0") => Some(false),
        _ => None,
    }
}

/// Strip the fixed game-link prefix; links of any other shape yield `None`.
pub fn app_id_from_link(link: &str) -> Option<String> {
    link.strip_prefix(GAME_LINK_PREFIX)
        .map(|rest| rest.trim_end_matches('/'))
        .filter(|rest| !rest.is_empty())
        .map(str::to_string)
}

fn game_info(game: &MarkupGame) -> GameInfo {
    GameInfo {
        name: text(&game.name),
        appid: text(&game.link).as_deref().and_then(app_id_from_link),
        icon: text(&game.icon),
        logo: text(&game.logo),
        logo_small: text(&game.logo_small),
    }
}

/// Merge the two documents into one record.
///
/// `markup` is `None` when the markup source was unavailable; the record is
/// then built from the structured entry alone.
pub fn reconcile(
    id: SteamId64,
    community_base: &str,
    markup: Option<&MarkupProfile>,
    summary: &PlayerSummary,
) -> ProfileRecord {
    let empty = MarkupProfile::default();
    let markup = markup.unwrap_or(&empty);

    let online_word = text(&markup.online_state);
    let online_state = prefer(
        online_word
            .as_deref()
            .and_then(OnlineState::from_markup_word)
            .map(|s| s.code()),
        summary.personastate,
    );
    let privacy = prefer(
        text(&markup.privacy_state)
            .as_deref()
            .and_then(CommunityVisibility::from_markup_word)
            .map(|v| v.code()),
        summary.communityvisibilitystate,
    );

    let in_game = online_word.as_deref() == Some(IN_GAME);
    let game_info = if in_game {
        Some(
            markup
                .in_game_info
                .as_ref()
                .map(game_info)
                .unwrap_or_else(|| game_info(&MarkupGame::default())),
        )
    } else {
        None
    };

    ProfileRecord {
        custom_url: text(&markup.custom_url),
        url: format!("{}/profiles/{id}", community_base.trim_end_matches('/')),
        persona_name: prefer(text(&markup.persona_name), summary.personaname.clone()),
        in_game,
        game_info,
        online_state: online_state.map(|code| code.to_string()),
        privacy: privacy.map(|code| code.to_string()),
        avatar: prefer(text(&markup.avatar_full), summary.avatarfull.clone()),
        avatar_mid: prefer(text(&markup.avatar_medium), summary.avatarmedium.clone()),
        avatar_small: prefer(text(&markup.avatar_icon), summary.avatar.clone()),
        account_limited: limited_flag(&markup.is_limited_account),
        member_since: text(&markup.member_since),
        profile_created: summary.timecreated,
        location: text(&markup.location),
        real_name: prefer(text(&markup.realname), summary.realname.clone()),
        comment_permissions: summary.commentpermission.is_some_and(|c| c != 0),
        identifiers: id.variants(),
    }
}
