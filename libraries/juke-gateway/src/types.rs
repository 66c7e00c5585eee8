//! Types for Spotify Web API responses and the summaries handed to the UI.

use serde::{Deserialize, Serialize};

// =============================================================================
// Token Endpoint Types
// =============================================================================

/// Response from the accounts service token endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    /// Only present when the provider rotates the refresh token
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token validity in seconds
    pub expires_in: u64,
}

/// Error body from the token endpoint (`{"error": "invalid_grant", ...}`).
#[derive(Debug, Deserialize)]
pub(crate) struct TokenErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

// =============================================================================
// Web API Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub tracks: Paging<ApiTrack>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiTrack {
    /// `null` for local files
    #[serde(default)]
    pub id: Option<String>,
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ApiArtist>,
    #[serde(default)]
    pub album: Option<ApiAlbum>,
    #[serde(default)]
    pub duration_ms: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiArtist {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiAlbum {
    pub name: String,
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaybackStateResponse {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub progress_ms: Option<u64>,
    /// Episodes and ads come through with a different shape; only tracks are kept
    #[serde(default)]
    pub item: Option<serde_json::Value>,
    #[serde(default)]
    pub device: Option<Device>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DevicesResponse {
    #[serde(default)]
    pub devices: Vec<Device>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiPlaylist {
    pub id: String,
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub tracks: Option<ApiPlaylistTracks>,
    #[serde(default)]
    pub images: Option<Vec<ImageRef>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiPlaylistTracks {
    pub total: u32,
}

// =============================================================================
// UI Types
// =============================================================================

/// Album art reference.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageRef {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

/// A search result or now-playing track.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TrackSummary {
    pub id: String,
    pub uri: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub album_art: Vec<ImageRef>,
    pub duration_ms: u64,
}

impl TrackSummary {
    /// Artist names joined for display
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }

    /// Duration as `m:ss`
    pub fn formatted_duration(&self) -> String {
        let total_secs = self.duration_ms / 1000;
        format!("{}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl From<ApiTrack> for TrackSummary {
    fn from(track: ApiTrack) -> Self {
        let (album, album_art) = match track.album {
            Some(album) => (Some(album.name), album.images),
            None => (None, Vec::new()),
        };

        Self {
            id: track.id.unwrap_or_default(),
            uri: track.uri,
            name: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            album,
            album_art,
            duration_ms: track.duration_ms,
        }
    }
}

/// A playback target as reported by `/me/player/devices`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Device {
    /// Can be `null` for restricted devices
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_restricted: bool,
    #[serde(default)]
    pub is_private_session: bool,
    #[serde(default)]
    pub volume_percent: Option<u8>,
    #[serde(default)]
    pub supports_volume: bool,
}

/// What is playing on the host's account right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackSnapshot {
    pub is_playing: bool,
    pub progress_ms: Option<u64>,
    pub track: Option<TrackSummary>,
    pub device: Option<Device>,
}

impl From<PlaybackStateResponse> for PlaybackSnapshot {
    fn from(state: PlaybackStateResponse) -> Self {
        let track = state
            .item
            .and_then(|item| serde_json::from_value::<ApiTrack>(item).ok())
            .map(TrackSummary::from);

        Self {
            is_playing: state.is_playing,
            progress_ms: state.progress_ms,
            track,
            device: state.device,
        }
    }
}

/// Whether the host has somewhere to play music.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "devices", rename_all = "snake_case")]
pub enum DeviceAvailability {
    /// Spotify is not open anywhere
    NoDevices,
    /// Devices are online but none is playing
    Inactive(Vec<Device>),
    /// The device playback control will act on
    Active(Device),
}

impl DeviceAvailability {
    /// Fold a device list into availability
    pub fn from_devices(mut devices: Vec<Device>) -> Self {
        if devices.is_empty() {
            return Self::NoDevices;
        }

        match devices.iter().position(|d| d.is_active) {
            Some(index) => Self::Active(devices.swap_remove(index)),
            None => Self::Inactive(devices),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// Status line for the host dashboard
    pub fn status_message(&self) -> String {
        match self {
            Self::NoDevices => "No Spotify device found. Open Spotify on any device (phone, computer, ...) and play a song.".to_string(),
            Self::Inactive(devices) => {
                let names: Vec<&str> = devices.iter().map(|d| d.name.as_str()).collect();
                format!(
                    "Devices found ({}), but none is active. Play a song on any of them.",
                    names.join(", ")
                )
            }
            Self::Active(device) => {
                format!("Active device: {} ({})", device.name, device.device_type)
            }
        }
    }
}

/// Spotify profile of the party host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// `premium`, `free`, ...
    #[serde(default)]
    pub product: Option<String>,
}

impl UserProfile {
    /// Name to show in the party header
    pub fn display_name_or_id(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }

    pub fn is_premium(&self) -> bool {
        self.product.as_deref() == Some("premium")
    }
}

/// One of the host's playlists, offered as background music.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub uri: String,
    pub name: String,
    pub track_count: u32,
    pub image: Option<ImageRef>,
}

impl From<ApiPlaylist> for PlaylistSummary {
    fn from(playlist: ApiPlaylist) -> Self {
        Self {
            id: playlist.id,
            uri: playlist.uri,
            name: playlist.name,
            track_count: playlist.tracks.map(|t| t.total).unwrap_or(0),
            image: playlist.images.and_then(|images| images.into_iter().next()),
        }
    }
}
