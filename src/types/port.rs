//! Port types with validation and parsing.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortRange` is the normalized, strictly ascending set of ports a scan covers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated network port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange(value))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl FromStr for Port {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let value: u16 = s
            .parse()
            .map_err(|_| PortError::InvalidFormat(s.to_string()))?;
        Self::try_from(value)
    }
}

/// Error type for port specification parsing.
///
/// Every variant is a flavor of an invalid port specification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u16),
    #[error("invalid port number: {0:?}")]
    InvalidFormat(String),
    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidRange(u16, u16),
    #[error("empty port specification")]
    Empty,
}

/// An inclusive, strictly ascending range of ports.
///
/// Parsed from either a single port (`"80"`) or exactly two dash-separated
/// ports (`"1-1024"`). A valid range always holds at least one port.
/// Serializes as its textual specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PortRange {
    start: Port,
    end: Port,
}

impl PortRange {
    /// Create a new port range.
    pub fn new(start: Port, end: Port) -> Result<Self, PortError> {
        if start > end {
            Err(PortError::InvalidRange(start.0, end.0))
        } else {
            Ok(Self { start, end })
        }
    }

    /// Create a range containing a single port.
    pub const fn single(port: Port) -> Self {
        Self {
            start: port,
            end: port,
        }
    }

    /// Parse a port specification (`"N"` or `"A-B"`).
    pub fn parse(spec: &str) -> Result<Self, PortError> {
        spec.parse()
    }

    /// First port of the range.
    pub const fn start(&self) -> Port {
        self.start
    }

    /// Last port of the range (inclusive).
    pub const fn end(&self) -> Port {
        self.end
    }

    /// Get the number of ports in this range.
    pub const fn len(&self) -> usize {
        (self.end.0 - self.start.0) as usize + 1
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Check whether `port` falls inside this range.
    pub fn contains(&self, port: Port) -> bool {
        self.start <= port && port <= self.end
    }

    /// Iterate over all ports in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Port> {
        (self.start.0..=self.end.0).map(Port)
    }
}

impl FromStr for PortRange {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PortError::Empty);
        }

        match s.split_once('-') {
            None => Ok(Self::single(s.parse()?)),
            Some((start, end)) => {
                if end.contains('-') {
                    return Err(PortError::InvalidFormat(s.to_string()));
                }
                Self::new(start.parse()?, end.parse()?)
            }
        }
    }
}

impl TryFrom<String> for PortRange {
    type Error = PortError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PortRange> for String {
    fn from(range: PortRange) -> Self {
        range.to_string()
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ports(spec: &str) -> Vec<u16> {
        PortRange::parse(spec)
            .unwrap()
            .iter()
            .map(Port::as_u16)
            .collect()
    }

    #[test]
    fn test_port_validation() {
        assert!(Port::new(0).is_none());
        assert!(Port::new(1).is_some());
        assert!(Port::new(65535).is_some());
        assert_eq!(Port::try_from(0), Err(PortError::OutOfRange(0)));
    }

    #[test]
    fn test_single_port() {
        assert_eq!(ports("80"), vec![80]);
        assert_eq!(ports(" 443 "), vec![443]);
    }

    #[test]
    fn test_range_is_inclusive() {
        let range = PortRange::parse("9000-9005").unwrap();
        assert_eq!(range.len(), 6);
        assert_eq!(ports("9000-9005"), vec![9000, 9001, 9002, 9003, 9004, 9005]);
        assert_eq!(ports("7-7"), vec![7]);
    }

    #[test]
    fn test_full_range() {
        let range = PortRange::parse("1-65535").unwrap();
        assert_eq!(range.len(), 65535);
        assert_eq!(range.iter().last(), Port::new(65535));
    }

    #[test]
    fn test_rejects_zero_bound() {
        assert_eq!(PortRange::parse("0-10"), Err(PortError::OutOfRange(0)));
        assert_eq!(PortRange::parse("0"), Err(PortError::OutOfRange(0)));
    }

    #[test]
    fn test_rejects_descending_range() {
        assert_eq!(PortRange::parse("10-5"), Err(PortError::InvalidRange(10, 5)));
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(PortRange::parse(""), Err(PortError::Empty));
        assert_eq!(PortRange::parse("   "), Err(PortError::Empty));
        assert!(matches!(PortRange::parse("abc"), Err(PortError::InvalidFormat(_))));
        assert!(matches!(PortRange::parse("1-2-3"), Err(PortError::InvalidFormat(_))));
        assert!(matches!(PortRange::parse("-5"), Err(PortError::InvalidFormat(_))));
        assert!(matches!(PortRange::parse("80,443"), Err(PortError::InvalidFormat(_))));
        assert!(matches!(PortRange::parse("70000"), Err(PortError::InvalidFormat(_))));
    }

    #[test]
    fn test_deserialization_validates() {
        assert_eq!(serde_json::from_str::<Port>("443").unwrap(), Port::new(443).unwrap());
        assert!(serde_json::from_str::<Port>("0").is_err());

        let range: PortRange = serde_json::from_str(r#""9000-9005""#).unwrap();
        assert_eq!(range.len(), 6);
        assert!(serde_json::from_str::<PortRange>(r#""10-5""#).is_err());
        assert!(serde_json::from_str::<PortRange>(r#"{"start":10,"end":5}"#).is_err());
    }

    #[test]
    fn test_serializes_as_text() {
        assert_eq!(serde_json::to_string(&Port::new(22).unwrap()).unwrap(), "22");
        let range = PortRange::parse("20-25").unwrap();
        assert_eq!(serde_json::to_string(&range).unwrap(), r#""20-25""#);
    }

    #[test]
    fn test_contains_and_display() {
        let range = PortRange::parse("20-25").unwrap();
        assert!(range.contains(Port::new(22).unwrap()));
        assert!(!range.contains(Port::new(26).unwrap()));
        assert_eq!(range.to_string(), "20-25");
        assert_eq!(PortRange::parse("80").unwrap().to_string(), "80");
    }
}
