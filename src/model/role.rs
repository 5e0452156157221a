use serde::{Deserialize, Serialize};
use std::fmt;

/// 可確定的軌道用途
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackRole {
    Main,
    Forced,
    Full,
    AudioDescription,
}

impl TrackRole {
    #[must_use]
    pub const fn as_token(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Forced => "forced",
            Self::Full => "full",
            Self::AudioDescription => "audiodesc",
        }
    }
}

/// 用途判定結果
///
/// 顯示名稱是自由文字，判定本質上可能失敗；
/// 無法判定時為 `Unknown`，呼叫端必須明確處理。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RoleAssignment {
    Known(TrackRole),
    Unknown,
}

impl RoleAssignment {
    pub const UNKNOWN_TOKEN: &'static str = "unknown";

    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Known(role) => role.as_token(),
            Self::Unknown => Self::UNKNOWN_TOKEN,
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "main" => Some(Self::Known(TrackRole::Main)),
            "forced" => Some(Self::Known(TrackRole::Forced)),
            "full" => Some(Self::Known(TrackRole::Full)),
            "audiodesc" => Some(Self::Known(TrackRole::AudioDescription)),
            Self::UNKNOWN_TOKEN => Some(Self::Unknown),
            _ => None,
        }
    }

    #[must_use]
    pub const fn known(self) -> Option<TrackRole> {
        match self {
            Self::Known(role) => Some(role),
            Self::Unknown => None,
        }
    }

    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for RoleAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl From<RoleAssignment> for String {
    fn from(role: RoleAssignment) -> Self {
        role.token().to_string()
    }
}

impl TryFrom<String> for RoleAssignment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_token(&value).ok_or_else(|| format!("未知的用途標記: {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_tokens_are_reversible() {
        for role in [
            RoleAssignment::Known(TrackRole::Main),
            RoleAssignment::Known(TrackRole::Forced),
            RoleAssignment::Known(TrackRole::Full),
            RoleAssignment::Known(TrackRole::AudioDescription),
            RoleAssignment::Unknown,
        ] {
            assert_eq!(RoleAssignment::from_token(role.token()), Some(role));
        }
        assert_eq!(RoleAssignment::from_token("audio_desc"), None);
    }

    #[test]
    fn test_role_serde_as_token() {
        let json = serde_json::to_string(&RoleAssignment::Known(TrackRole::Forced)).unwrap();
        assert_eq!(json, "\"forced\"");
        let parsed: RoleAssignment = serde_json::from_str("\"unknown\"").unwrap();
        assert!(parsed.is_unknown());
        assert!(serde_json::from_str::<RoleAssignment>("\"bogus\"").is_err());
    }
}
