//! EXPOSE port specifications

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Id, Markers, Space};

/// Transport protocol of an exposed port
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
    Sctp,
}

impl Protocol {
    /// Parse a protocol name, ignoring case
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "tcp" => Some(Self::Tcp),
            "udp" => Some(Self::Udp),
            "sctp" => Some(Self::Sctp),
            _ => None,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
            Self::Sctp => "sctp",
        })
    }
}

/// `N`, `N/proto`, `N-M` or `N-M/proto`
///
/// `text` is the source of truth. The numeric fields are derived from it on
/// a best-effort basis and stay `None` for variables or malformed numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub text: String,
    pub start: Option<u16>,
    pub end: Option<u16>,
    pub protocol: Protocol,
}

impl Port {
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        let (range, protocol) = match text.split_once('/') {
            Some((range, protocol)) => (range, Protocol::parse(protocol).unwrap_or_default()),
            None => (text.as_str(), Protocol::Tcp),
        };
        let (start, end) = match range.split_once('-') {
            Some((start, end)) => (parse_number(start), parse_number(end)),
            None => (parse_number(range), None),
        };

        Self {
            id: Id::random(),
            prefix: Space::EMPTY,
            markers: Markers::EMPTY,
            start,
            end,
            protocol,
            text,
        }
    }

    pub fn with_prefix(mut self, prefix: Space) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn is_range(&self) -> bool {
        self.text.split('/').next().is_some_and(|range| range.contains('-'))
    }
}

fn parse_number(text: &str) -> Option<u16> {
    if text.contains('$') {
        return None;
    }
    text.parse().ok()
}
