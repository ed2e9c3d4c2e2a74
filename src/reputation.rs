//! Ban-status decoding for the reputation lookup.
//!
//! The ban-status endpoint answers with `{"players": [ ... ]}` holding at most
//! one entry for a single requested id. Fields map one-to-one onto
//! [`ReputationRecord`] except `EconomyBan`, a free-form string whose value
//! `"banned"` means the account is economy banned.
//!
//! Every ban category is tri-state: `Some(true)`, `Some(false)`, or `None`
//! when the upstream entry omits the field. An absent category is never
//! reported as "not banned".

use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::steamid::SteamId64;

/// Ban summary for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationRecord {
    pub vac_banned: Option<bool>,
    pub number_vac_bans: Option<u32>,
    pub economy_banned: Option<bool>,
    pub community_banned: Option<bool>,
    pub number_game_bans: Option<u32>,
    /// Present only when the client runs in debug mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steamid64: Option<SteamId64>,
}

#[derive(Debug, Deserialize)]
struct PlayerBansDocument {
    #[serde(default)]
    players: Vec<PlayerBans>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PlayerBans {
    #[serde(rename = "VACBanned")]
    vac_banned: Option<bool>,
    #[serde(rename = "NumberOfVACBans")]
    number_of_vac_bans: Option<u32>,
    economy_ban: Option<String>,
    community_banned: Option<bool>,
    number_of_game_bans: Option<u32>,
}

impl From<PlayerBans> for ReputationRecord {
    fn from(bans: PlayerBans) -> Self {
        Self {
            vac_banned: bans.vac_banned,
            number_vac_bans: bans.number_of_vac_bans,
            economy_banned: bans.economy_ban.as_deref().map(is_economy_banned),
            community_banned: bans.community_banned,
            number_game_bans: bans.number_of_game_bans,
            steamid64: None,
        }
    }
}

fn is_economy_banned(value: &str) -> bool {
    value == "banned"
}

/// Decode a 200 ban-status body into a record.
///
/// `status` is carried into [`LookupError::UserNotFound`] when the document
/// holds no player entry.
pub fn parse_player_bans(status: u16, body: &str) -> Result<ReputationRecord, LookupError> {
    let document: PlayerBansDocument =
        serde_json::from_str(body).map_err(|e| LookupError::malformed(status, e))?;

    document
        .players
        .into_iter()
        .next()
        .map(ReputationRecord::from)
        .ok_or_else(|| LookupError::UserNotFound {
            status,
            message: "Steam did not return with a user".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_record() {
        let body = r#"{"players":[{"SteamId":"76561197960434622","CommunityBanned":false,
            "VACBanned":false,"NumberOfVACBans":0,"DaysSinceLastBan":0,
            "NumberOfGameBans":0,"EconomyBan":"none"}]}"#;
        let record = parse_player_bans(200, body).unwrap();
        assert_eq!(
            record,
            ReputationRecord {
                vac_banned: Some(false),
                number_vac_bans: Some(0),
                economy_banned: Some(false),
                community_banned: Some(false),
                number_game_bans: Some(0),
                steamid64: None,
            }
        );
    }

    #[test]
    fn test_economy_banned_string() {
        let body = r#"{"players":[{"VACBanned":true,"NumberOfVACBans":2,
            "EconomyBan":"banned","CommunityBanned":true,"NumberOfGameBans":1}]}"#;
        let record = parse_player_bans(200, body).unwrap();
        assert_eq!(record.economy_banned, Some(true));
        assert_eq!(record.vac_banned, Some(true));
        assert_eq!(record.number_vac_bans, Some(2));
        assert_eq!(record.number_game_bans, Some(1));
    }

    #[test]
    fn test_probation_is_not_banned() {
        let body = r#"{"players":[{"EconomyBan":"probation"}]}"#;
        let record = parse_player_bans(200, body).unwrap();
        assert_eq!(record.economy_banned, Some(false));
    }

    #[test]
    fn test_missing_categories_are_unknown() {
        let body = r#"{"players":[{"VACBanned":false}]}"#;
        let record = parse_player_bans(200, body).unwrap();
        assert_eq!(record.vac_banned, Some(false));
        assert_eq!(record.economy_banned, None);
        assert_eq!(record.community_banned, None);
        assert_eq!(record.number_game_bans, None);
    }

    #[test]
    fn test_no_player_is_user_not_found() {
        let err = parse_player_bans(200, r#"{"players":[]}"#).unwrap_err();
        assert!(matches!(err, LookupError::UserNotFound { status: 200, .. }));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = parse_player_bans(200, "<html>").unwrap_err();
        assert!(matches!(err, LookupError::MalformedResponse { .. }));
    }

    #[test]
    fn test_debug_field_skipped_when_absent() {
        let record = parse_player_bans(200, r#"{"players":[{}]}"#).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("steamid64").is_none());
        assert!(json["vac_banned"].is_null());
    }
}
