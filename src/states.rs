//! Numeric state codes carried by profile records, with display labels.
//!
//! [`crate::ProfileRecord`] stores `online_state` and `privacy` as string-typed
//! numeric codes. These tables let callers render them, and hold the word
//! tables used to translate the markup source's lowercase state words.

use serde::{Deserialize, Serialize};

/// Persona state as reported by the player-summary endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnlineState {
    Offline,
    Online,
    Busy,
    Away,
    Snooze,
    LookingToTrade,
    LookingToPlay,
    Invisible,
    Max,
}

impl OnlineState {
    const ALL: [Self; 9] = [
        Self::Offline,
        Self::Online,
        Self::Busy,
        Self::Away,
        Self::Snooze,
        Self::LookingToTrade,
        Self::LookingToPlay,
        Self::Invisible,
        Self::Max,
    ];

    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn code(&self) -> i64 {
        *self as i64
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Offline => "Offline",
            Self::Online => "Online",
            Self::Busy => "Busy",
            Self::Away => "Away",
            Self::Snooze => "Snooze",
            Self::LookingToTrade => "Looking To Trade",
            Self::LookingToPlay => "Looking To Play",
            Self::Invisible => "Invisible",
            Self::Max => "Max",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Translate a markup-source state word. `in-game` counts as online.
    pub fn from_markup_word(word: &str) -> Option<Self> {
        match word {
            "offline" => Some(Self::Offline),
            "online" | "in-game" => Some(Self::Online),
            _ => None,
        }
    }
}

/// Community profile visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommunityVisibility {
    Invalid,
    Private,
    FriendsOnly,
    Public,
}

impl CommunityVisibility {
    const ALL: [Self; 4] = [Self::Invalid, Self::Private, Self::FriendsOnly, Self::Public];

    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn code(&self) -> i64 {
        *self as i64
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Invalid => "Invalid",
            Self::Private => "Private",
            Self::FriendsOnly => "Friends Only",
            Self::Public => "Public",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Translate a markup-source privacy word.
    pub fn from_markup_word(word: &str) -> Option<Self> {
        match word {
            "invalid" => Some(Self::Invalid),
            "private" => Some(Self::Private),
            "friendsonly" => Some(Self::FriendsOnly),
            "public" => Some(Self::Public),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_online_codes() {
        assert_eq!(OnlineState::from_code(0), Some(OnlineState::Offline));
        assert_eq!(OnlineState::from_code(8), Some(OnlineState::Max));
        assert_eq!(OnlineState::from_code(9), None);
        assert_eq!(OnlineState::from_code(-1), None);
        assert_eq!(OnlineState::LookingToPlay.code(), 6);
    }

    #[test]
    fn test_in_game_is_online() {
        assert_eq!(
            OnlineState::from_markup_word("in-game"),
            OnlineState::from_markup_word("online")
        );
        assert_eq!(OnlineState::from_markup_word("Online"), None);
    }

    #[test]
    fn test_labels_round_trip() {
        for code in 0..=8 {
            let state = OnlineState::from_code(code).unwrap();
            assert_eq!(OnlineState::from_label(state.label()), Some(state));
        }
        assert_eq!(
            CommunityVisibility::from_label("Friends Only"),
            Some(CommunityVisibility::FriendsOnly)
        );
    }

    #[test]
    fn test_privacy_words() {
        assert_eq!(CommunityVisibility::from_markup_word("public").map(|v| v.code()), Some(3));
        assert_eq!(CommunityVisibility::from_markup_word("friendsonly").map(|v| v.code()), Some(2));
        assert_eq!(CommunityVisibility::from_markup_word("private").map(|v| v.code()), Some(1));
        assert_eq!(CommunityVisibility::from_markup_word("unknown"), None);
    }
}
