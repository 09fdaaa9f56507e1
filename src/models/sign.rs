use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the twelve zodiac signs, carrying the numeric id the upstream
/// site expects in its `sign` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown zodiac sign: {0}")]
pub struct UnknownSign(pub String);

impl ZodiacSign {
    pub const ALL: [Self; 12] = [
        Self::Aries,
        Self::Taurus,
        Self::Gemini,
        Self::Cancer,
        Self::Leo,
        Self::Virgo,
        Self::Libra,
        Self::Scorpio,
        Self::Sagittarius,
        Self::Capricorn,
        Self::Aquarius,
        Self::Pisces,
    ];

    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Aries => 1,
            Self::Taurus => 2,
            Self::Gemini => 3,
            Self::Cancer => 4,
            Self::Leo => 5,
            Self::Virgo => 6,
            Self::Libra => 7,
            Self::Scorpio => 8,
            Self::Sagittarius => 9,
            Self::Capricorn => 10,
            Self::Aquarius => 11,
            Self::Pisces => 12,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }

    /// Lower-case form used as the storage key.
    #[must_use]
    pub fn key(self) -> String {
        self.name().to_lowercase()
    }
}

impl FromStr for ZodiacSign {
    type Err = UnknownSign;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|sign| sign.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownSign(s.to_string()))
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_any_casing() {
        for sign in ZodiacSign::ALL {
            let name = sign.name();
            assert_eq!(name.parse::<ZodiacSign>(), Ok(sign));
            assert_eq!(name.to_lowercase().parse::<ZodiacSign>(), Ok(sign));
            assert_eq!(name.to_uppercase().parse::<ZodiacSign>(), Ok(sign));
        }
        assert_eq!("sAgItTaRiUs".parse::<ZodiacSign>(), Ok(ZodiacSign::Sagittarius));
    }

    #[test]
    fn test_unknown_sign_is_error() {
        for bad in ["", "ophiuchus", "aries2", "leo the lion", "13"] {
            assert_eq!(
                bad.parse::<ZodiacSign>(),
                Err(UnknownSign(bad.to_string())),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn test_ids_are_stable() {
        let ids: Vec<u8> = ZodiacSign::ALL.iter().map(|s| s.id()).collect();
        assert_eq!(ids, (1..=12).collect::<Vec<u8>>());
        assert_eq!(ZodiacSign::Capricorn.id(), 10);
    }
}
