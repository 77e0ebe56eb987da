//! MAC address type with parsing for the notations switches emit.

use crate::ParseError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cisco dotted notation: three groups of four hex digits.
static DOTTED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9A-Fa-f]{4})\.([0-9A-Fa-f]{4})\.([0-9A-Fa-f]{4})$")
        .expect("Invalid regex pattern")
});

/// A 48-bit Ethernet MAC address.
///
/// # Examples
///
/// ```
/// use switchctl_types::MacAddress;
///
/// let mac: MacAddress = "300a.60a0.324b".parse().unwrap();
/// assert_eq!(mac.to_string(), "30:0a:60:a0:32:4b");
/// assert_eq!(mac.to_dotted(), "300a.60a0.324b");
///
/// let mac2: MacAddress = "30-0A-60-A0-32-4B".parse().unwrap();
/// assert_eq!(mac, mac2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Creates a new MAC address from raw bytes.
    pub const fn new(bytes: [u8; 6]) -> Self {
        MacAddress(bytes)
    }

    /// Returns the raw bytes of the MAC address.
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Parses only the dotted `xxxx.yyyy.zzzz` notation.
    ///
    /// Operator input for fleet lookups is restricted to this form.
    pub fn parse_dotted(s: &str) -> Result<Self, ParseError> {
        let caps = DOTTED_RE
            .captures(s)
            .ok_or_else(|| ParseError::InvalidMacAddress(s.to_string()))?;

        let mut bytes = [0u8; 6];
        for group in 0..3 {
            let word = u16::from_str_radix(&caps[group + 1], 16)
                .map_err(|_| ParseError::InvalidMacAddress(s.to_string()))?;
            bytes[group * 2..group * 2 + 2].copy_from_slice(&word.to_be_bytes());
        }
        Ok(MacAddress(bytes))
    }

    /// Formats the address in Cisco dotted notation (`300a.60a0.324b`).
    pub fn to_dotted(&self) -> String {
        format!(
            "{:02x}{:02x}.{:02x}{:02x}.{:02x}{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for MacAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains('.') {
            return Self::parse_dotted(s);
        }

        let separator = if s.contains(':') { ':' } else { '-' };
        let parts: Vec<&str> = s.split(separator).collect();
        if parts.len() != 6 {
            return Err(ParseError::InvalidMacAddress(s.to_string()));
        }

        let mut bytes = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            if part.len() != 2 {
                return Err(ParseError::InvalidMacAddress(s.to_string()));
            }
            bytes[i] = u8::from_str_radix(part, 16)
                .map_err(|_| ParseError::InvalidMacAddress(s.to_string()))?;
        }

        Ok(MacAddress(bytes))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> String {
        mac.to_string()
    }
}
