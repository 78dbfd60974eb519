use serde::{Deserialize, Serialize};

use crate::pipeline::extraction::ExtractionError;

/// Macro to generate enum with as_str + std::str::FromStr + Display pattern.
/// Parsing ignores ASCII case and surrounding whitespace.
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident, $err:path { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        $(#[$meta])*
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ExtractionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $(
                    if s.eq_ignore_ascii_case($s) {
                        return Ok(Self::$variant);
                    }
                )+
                Err($err(s.into()))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(
    /// Which kind of analysis produced a response.
    #[serde(rename_all = "snake_case")]
    Domain, ExtractionError::UnknownDomain {
        Diagnosis => "diagnosis",
        Prescription => "prescription",
        Radiology => "radiology",
    }
);

str_enum!(
    /// Coarse likelihood (conditions) or urgency (tests) tag.
    Level, ExtractionError::InvalidLevel {
        High => "High",
        Medium => "Medium",
        Low => "Low",
    }
);

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Diagnosis, Domain::Prescription, Domain::Radiology];
}

impl Level {
    /// Lenient reading of a level word taken from model output.
    /// Accepts `moderate` for Medium; anything unrecognised yields `default`.
    pub fn parse_or(word: &str, default: Level) -> Level {
        let word = word.trim();
        if word.eq_ignore_ascii_case("moderate") {
            return Level::Medium;
        }
        word.parse().unwrap_or(default)
    }
}
