//! Octal file permission bits

use crate::error::{Error, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Highest value accepted as permission bits (setuid/setgid/sticky included)
const MAX_MODE: u32 = 0o7777;

/// Unix permission bits for a secret file
///
/// In YAML a mode may be written as an integer with octal digits (`0640`,
/// `640`) or as a string (`"0640"`, `"0o640"`). Integers are read digit by
/// digit as octal, since YAML 1.2 would otherwise parse `0640` as decimal.
/// A mode of zero means "not set".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileMode(u32);

impl FileMode {
    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether a non-zero mode was configured
    pub const fn is_set(self) -> bool {
        self.0 != 0
    }

    /// Parse octal digits, with or without a `0`/`0o` prefix
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let digits = trimmed
            .strip_prefix("0o")
            .or_else(|| trimmed.strip_prefix("0O"))
            .unwrap_or(trimmed)
            .trim_start_matches('0');

        if digits.is_empty() {
            return if trimmed.is_empty() {
                Err(Error::invalid_mode(value))
            } else {
                Ok(Self(0))
            };
        }

        let bits = u32::from_str_radix(digits, 8).map_err(|_| Error::invalid_mode(value))?;
        if bits > MAX_MODE {
            return Err(Error::invalid_mode(value));
        }
        Ok(Self(bits))
    }
}

impl FromStr for FileMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}

impl Serialize for FileMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FileMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(FileModeVisitor)
    }
}

struct FileModeVisitor;

impl Visitor<'_> for FileModeVisitor {
    type Value = FileMode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an octal file mode such as 0640 or \"0640\"")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<FileMode, E> {
        FileMode::parse(&v.to_string()).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<FileMode, E> {
        if v < 0 {
            return Err(E::custom(Error::invalid_mode(v.to_string())));
        }
        self.visit_u64(v as u64)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<FileMode, E> {
        FileMode::parse(v).map_err(E::custom)
    }
}
