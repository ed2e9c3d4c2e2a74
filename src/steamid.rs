//! Steam identifier classification and conversion.
//!
//! Three textual encodings name the same account:
//!
//! - **SteamID64**: `76561197960434622`, the canonical form used as the cache
//!   key and upstream parameter.
//! - **SteamID3**: `[U:1:168894]`, the account number in brackets.
//! - **SteamID2**: `STEAM_0:0:84447`, the account number split into its low bit
//!   and the remaining high bits.
//!
//! Anything else is treated as a vanity name and must be resolved upstream.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::LookupError;

/// Offset between an individual account number and its SteamID64.
pub const STEAMID64_BASE: u64 = 76_561_197_960_265_728;

static STEAMID64_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^765[0-9]{14}$").expect("valid SteamID64 pattern"));

static STEAMID3_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[U:1:([0-9]+)\]$").expect("valid SteamID3 pattern"));

static STEAMID2_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^STEAM_[0-5]:([01]):([0-9]+)$").expect("valid SteamID2 pattern")
});

/// A validated canonical SteamID64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SteamId64(u64);

impl SteamId64 {
    /// Validate a string against the canonical pattern.
    pub fn parse(input: &str) -> Result<Self, LookupError> {
        if !STEAMID64_RE.is_match(input) {
            return Err(LookupError::invalid("Not a valid SteamID64"));
        }
        input
            .parse::<u64>()
            .map(Self)
            .map_err(|_| LookupError::invalid("Not a valid SteamID64"))
    }

    /// Whether `input` is already in canonical form.
    pub fn is_valid(input: &str) -> bool {
        STEAMID64_RE.is_match(input)
    }

    pub fn from_account_id(account_id: u32) -> Self {
        Self(STEAMID64_BASE + u64::from(account_id))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The 32-bit account number, when this id lies in the individual range.
    pub fn account_id(&self) -> Option<u32> {
        self.0
            .checked_sub(STEAMID64_BASE)
            .and_then(|acct| u32::try_from(acct).ok())
    }

    /// `STEAM_0:<low bit>:<high bits>` rendering.
    pub fn steam2(&self) -> Option<String> {
        self.account_id()
            .map(|acct| format!("STEAM_0:{}:{}", acct & 1, acct >> 1))
    }

    /// `[U:1:<account>]` rendering.
    pub fn steam3(&self) -> Option<String> {
        self.account_id().map(|acct| format!("[U:1:{acct}]"))
    }

    pub fn variants(&self) -> IdentifierVariants {
        IdentifierVariants {
            steamid64: self.to_string(),
            steam2: self.steam2(),
            steam3: self.steam3(),
        }
    }
}

impl fmt::Display for SteamId64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SteamId64 {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for SteamId64 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SteamId64 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Alternate textual renderings of one canonical id, for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierVariants {
    pub steamid64: String,
    pub steam2: Option<String>,
    pub steam3: Option<String>,
}

/// Outcome of classifying an arbitrary identifier string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// One of the three numeric encodings, converted to canonical form.
    Canonical(SteamId64),
    /// No numeric pattern matched; needs upstream resolution.
    Vanity(String),
}

/// Recognize which encoding `input` uses and convert numeric encodings.
///
/// The canonical pattern is checked first, then SteamID3, then SteamID2.
/// A string that matches a numeric pattern but encodes an account number
/// outside 32 bits is rejected rather than sent to vanity resolution.
pub fn classify(input: &str) -> Result<Classified, LookupError> {
    if input.trim().is_empty() {
        return Err(LookupError::invalid("identifier must not be empty"));
    }

    if STEAMID64_RE.is_match(input) {
        return SteamId64::parse(input).map(Classified::Canonical);
    }

    if let Some(caps) = STEAMID3_RE.captures(input) {
        let account_id = parse_account(&caps[1], input)?;
        return Ok(Classified::Canonical(SteamId64::from_account_id(account_id)));
    }

    if let Some(caps) = STEAMID2_RE.captures(input) {
        let low: u64 = if &caps[1] == "1" { 1 } else { 0 };
        let high = caps[2]
            .parse::<u64>()
            .map_err(|_| out_of_range(input))?;
        let account_id = high
            .checked_mul(2)
            .and_then(|v| v.checked_add(low))
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| out_of_range(input))?;
        return Ok(Classified::Canonical(SteamId64::from_account_id(account_id)));
    }

    Ok(Classified::Vanity(input.to_string()))
}

fn parse_account(digits: &str, input: &str) -> Result<u32, LookupError> {
    digits.parse::<u32>().map_err(|_| out_of_range(input))
}

fn out_of_range(input: &str) -> LookupError {
    LookupError::invalid(format!("account number out of range in '{input}'"))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("76561197960434622")]
    #[case("76561198154631702")]
    #[case("76500000000000000")]
    fn test_canonical_unchanged(#[case] input: &str) {
        let classified = classify(input).unwrap();
        assert_eq!(classified, Classified::Canonical(SteamId64::parse(input).unwrap()));
        if let Classified::Canonical(id) = classified {
            assert_eq!(id.to_string(), input);
        }
    }

    #[rstest]
    #[case("[U:1:130392443]", "76561198090658171")]
    #[case("[U:1:168894]", "76561197960434622")]
    #[case("STEAM_0:0:84447", "76561197960434622")]
    #[case("STEAM_1:0:84447", "76561197960434622")]
    #[case("STEAM_0:1:65196221", "76561198090658171")]
    fn test_alternate_forms_convert(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(
            classify(input).unwrap(),
            Classified::Canonical(SteamId64::parse(expected).unwrap())
        );
    }

    #[rstest]
    #[case("STEAM_0:0:97182987")]
    #[case("STEAM_0:1:65196221")]
    #[case("[U:1:36603369]")]
    #[case("[U:1:23239734]")]
    fn test_alternate_forms_round_trip(#[case] input: &str) {
        let Classified::Canonical(id) = classify(input).unwrap() else {
            panic!("expected canonical id for {input}");
        };
        let rendered = if input.starts_with('[') {
            id.steam3()
        } else {
            id.steam2()
        };
        assert_eq!(rendered.as_deref(), Some(input));
    }

    #[rstest]
    #[case("_armoreddragon_")]
    #[case("EvilPeople")]
    #[case("10101010101")]
    #[case("765611980521164051")]
    #[case("[U:2:123]")]
    #[case("STEAM_6:0:1")]
    fn test_unmatched_is_vanity(#[case] input: &str) {
        assert_eq!(classify(input).unwrap(), Classified::Vanity(input.to_string()));
    }

    #[test]
    fn test_empty_is_invalid() {
        assert!(matches!(classify(""), Err(LookupError::InvalidArgument(_))));
        assert!(matches!(classify("  "), Err(LookupError::InvalidArgument(_))));
    }

    #[test]
    fn test_account_overflow_is_invalid() {
        assert!(matches!(
            classify("[U:1:4294967296]"),
            Err(LookupError::InvalidArgument(_))
        ));
        assert!(matches!(
            classify("STEAM_0:1:2147483648"),
            Err(LookupError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_canonical() {
        assert!(SteamId64::parse("10101010101").is_err());
        assert!(SteamId64::parse("765611980521164051").is_err());
        assert!(SteamId64::parse(" 76561197960434622").is_err());
    }

    #[test]
    fn test_variants() {
        let id = SteamId64::parse("76561197960434622").unwrap();
        let v = id.variants();
        assert_eq!(v.steamid64, "76561197960434622");
        assert_eq!(v.steam2.as_deref(), Some("STEAM_0:0:84447"));
        assert_eq!(v.steam3.as_deref(), Some("[U:1:168894]"));
    }

    #[test]
    fn test_variants_below_individual_range() {
        let id = SteamId64::parse("76500000000000000").unwrap();
        assert_eq!(id.account_id(), None);
        assert_eq!(id.steam2(), None);
    }

    #[test]
    fn test_serde_as_string() {
        let id = SteamId64::parse("76561197960434622").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"76561197960434622\"");
        let back: SteamId64 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
