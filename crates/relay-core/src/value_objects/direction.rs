//! Sides of the relay and the direction an event travels between them

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two organizations taking part in the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The organization whose issues are the origin of truth
    Source,
    /// The organization receiving mirrored copies
    Hub,
}

impl Side {
    /// The other side of the relay
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Source => Self::Hub,
            Self::Hub => Self::Source,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Hub => "hub",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of an inbound event, fixed by the ingress route that received it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    SourceToHub,
    HubToSource,
}

impl Direction {
    /// Build the direction for an event raised on `origin`
    #[must_use]
    pub fn from_origin(origin: Side) -> Self {
        match origin {
            Side::Source => Self::SourceToHub,
            Side::Hub => Self::HubToSource,
        }
    }

    /// Side the event was raised on
    #[must_use]
    pub fn origin(self) -> Side {
        match self {
            Self::SourceToHub => Side::Source,
            Self::HubToSource => Side::Hub,
        }
    }

    /// Side that receives the relayed mutation
    #[must_use]
    pub fn target(self) -> Side {
        self.origin().opposite()
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SourceToHub => "source_to_hub",
            Self::HubToSource => "hub_to_source",
        }
    }

    /// Parse the persisted representation
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "source_to_hub" => Some(Self::SourceToHub),
            "hub_to_source" => Some(Self::HubToSource),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
