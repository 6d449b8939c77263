use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EndpointError;

/// Which body a definition describes.
///
/// Requests and responses are versioned independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Request,
    Response,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Request => "request",
            MessageKind::Response => "response",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "request" => Ok(MessageKind::Request),
            "response" => Ok(MessageKind::Response),
            _ => Err(EndpointError::UnknownMessageKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Request".parse::<MessageKind>().unwrap(), MessageKind::Request);
        assert_eq!("RESPONSE".parse::<MessageKind>().unwrap(), MessageKind::Response);
        assert!(matches!(
            "body".parse::<MessageKind>(),
            Err(EndpointError::UnknownMessageKind(_))
        ));
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&MessageKind::Response).unwrap(),
            "\"response\""
        );
    }
}
