/// Spotify URIs (`spotify:<kind>:<id>`)
use crate::error::{JukeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a URI points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UriKind {
    /// A single track, queueable
    Track,
    /// Album context
    Album,
    /// Artist context (plays the artist's top tracks)
    Artist,
    /// Playlist context
    Playlist,
}

impl UriKind {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Album => "album",
            Self::Artist => "artist",
            Self::Playlist => "playlist",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "track" => Some(Self::Track),
            "album" => Some(Self::Album),
            "artist" => Some(Self::Artist),
            "playlist" => Some(Self::Playlist),
            _ => None,
        }
    }

    /// Whether playback can be started from this kind of context
    pub fn is_context(&self) -> bool {
        !matches!(self, Self::Track)
    }
}

/// A validated Spotify URI
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MusicUri {
    kind: UriKind,
    id: String,
}

impl MusicUri {
    /// Parse `spotify:(track|album|artist|playlist):<alphanumeric id>`
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || JukeError::InvalidUri(input.to_string());

        let mut parts = input.trim().split(':');
        let (Some("spotify"), Some(kind), Some(id), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let kind = UriKind::parse(kind).ok_or_else(invalid)?;
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(invalid());
        }

        Ok(Self {
            kind,
            id: id.to_string(),
        })
    }

    /// Parse a URI that must point at a single track
    pub fn track(input: &str) -> Result<Self> {
        let uri = Self::parse(input)?;
        if uri.kind == UriKind::Track {
            Ok(uri)
        } else {
            Err(JukeError::InvalidUri(format!("{} is not a track", input)))
        }
    }

    /// Parse a URI that playback can start from (album, artist or playlist)
    pub fn context(input: &str) -> Result<Self> {
        let uri = Self::parse(input)?;
        if uri.kind.is_context() {
            Ok(uri)
        } else {
            Err(JukeError::InvalidUri(format!(
                "{} cannot be used as a playback context",
                input
            )))
        }
    }

    /// Object kind named by the URI
    pub fn kind(&self) -> UriKind {
        self.kind
    }

    /// Base-62 object id, the last URI segment
    ///
    /// ```
    /// use juke_core::{MusicUri, UriKind};
    ///
    /// let uri = MusicUri::parse("spotify:album:4m2880jivSbbyEGAKfITCa").unwrap();
    /// assert_eq!(uri.kind(), UriKind::Album);
    /// assert_eq!(uri.id(), "4m2880jivSbbyEGAKfITCa");
    /// ```
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for MusicUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spotify:{}:{}", self.kind.as_str(), self.id)
    }
}

impl FromStr for MusicUri {
    type Err = JukeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MusicUri {
    type Error = JukeError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<MusicUri> for String {
    fn from(uri: MusicUri) -> Self {
        uri.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_track_uri() {
        let uri = MusicUri::parse("spotify:track:4uLU6hMCjMI75M1A2tKUQC").unwrap();
        assert_eq!(uri.kind(), UriKind::Track);
        assert_eq!(uri.id(), "4uLU6hMCjMI75M1A2tKUQC");
        assert_eq!(uri.to_string(), "spotify:track:4uLU6hMCjMI75M1A2tKUQC");
    }

    #[test]
    fn test_rejects_malformed_uris() {
        for bad in [
            "",
            "spotify:track:",
            "spotify:episode:abc",
            "spotify:track:abc:def",
            "https://open.spotify.com/track/abc",
            "spotify:track:abc-def",
        ] {
            assert!(MusicUri::parse(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_track_and_context_constraints() {
        assert!(MusicUri::track("spotify:track:abc").is_ok());
        assert!(MusicUri::track("spotify:playlist:abc").is_err());

        assert!(MusicUri::context("spotify:playlist:37i9dQZF1DXcBWIGoYBM5M").is_ok());
        assert!(MusicUri::context("spotify:album:abc").is_ok());
        assert!(MusicUri::context("spotify:track:abc").is_err());
    }
}
