//! Playback control for a party's host account.

use crate::error::{GatewayError, Result};
use crate::gateway::PartyGateway;
use crate::request::RequestSpec;
use crate::types::{Device, DeviceAvailability, DevicesResponse, PlaybackSnapshot, PlaybackStateResponse};
use juke_core::{CredentialStore, JukeError, MusicUri, PartyCode};
use serde_json::json;
use tracing::{debug, info};

/// Attach `device_id` to a playback command, or leave it for the active device
fn on_device(spec: RequestSpec, device_id: Option<&str>) -> Result<RequestSpec> {
    match device_id.map(str::trim) {
        None => Ok(spec),
        Some("") => Err(JukeError::invalid_input("device id is empty").into()),
        Some(id) => Ok(spec.with_query("device_id", id)),
    }
}

impl<S: CredentialStore + ?Sized> PartyGateway<S> {
    /// Add a track to the end of the host's play queue.
    ///
    /// The URI is checked before the credential store or network is touched.
    pub async fn enqueue_track(&self, party_code: &PartyCode, track_uri: &str) -> Result<()> {
        self.enqueue_track_on(party_code, track_uri, None).await
    }

    /// Queue a track on a specific device, or the active one when `device_id` is `None`.
    pub async fn enqueue_track_on(
        &self,
        party_code: &PartyCode,
        track_uri: &str,
        device_id: Option<&str>,
    ) -> Result<()> {
        let uri = MusicUri::track(track_uri)?;

        let spec = RequestSpec::post("/me/player/queue").with_query("uri", uri.to_string());
        let spec = on_device(spec, device_id)?.playback_control();
        self.execute(party_code, &spec).await?;

        info!(party_code = %party_code, uri = %uri, device_id, "Track queued");
        Ok(())
    }

    /// Replace whatever is playing with a single track.
    pub async fn play_track(&self, party_code: &PartyCode, track_uri: &str) -> Result<()> {
        self.play_track_on(party_code, track_uri, None).await
    }

    pub async fn play_track_on(
        &self,
        party_code: &PartyCode,
        track_uri: &str,
        device_id: Option<&str>,
    ) -> Result<()> {
        let uri = MusicUri::track(track_uri)?;

        let spec = RequestSpec::put("/me/player/play").with_json(json!({ "uris": [uri.to_string()] }));
        let spec = on_device(spec, device_id)?.playback_control();
        self.execute(party_code, &spec).await?;

        info!(party_code = %party_code, uri = %uri, device_id, "Track playing");
        Ok(())
    }

    pub async fn pause(&self, party_code: &PartyCode) -> Result<()> {
        self.pause_on(party_code, None).await
    }

    pub async fn pause_on(&self, party_code: &PartyCode, device_id: Option<&str>) -> Result<()> {
        self.control(party_code, RequestSpec::put("/me/player/pause"), device_id)
            .await
    }

    pub async fn resume(&self, party_code: &PartyCode) -> Result<()> {
        self.resume_on(party_code, None).await
    }

    pub async fn resume_on(&self, party_code: &PartyCode, device_id: Option<&str>) -> Result<()> {
        self.control(party_code, RequestSpec::put("/me/player/play"), device_id)
            .await
    }

    pub async fn skip_next(&self, party_code: &PartyCode) -> Result<()> {
        self.skip_next_on(party_code, None).await
    }

    pub async fn skip_next_on(&self, party_code: &PartyCode, device_id: Option<&str>) -> Result<()> {
        self.control(party_code, RequestSpec::post("/me/player/next"), device_id)
            .await
    }

    pub async fn skip_previous(&self, party_code: &PartyCode) -> Result<()> {
        self.control(party_code, RequestSpec::post("/me/player/previous"), None)
            .await
    }

    /// Current playback, or `None` when nothing is playing on any device.
    pub async fn get_playback_state(&self, party_code: &PartyCode) -> Result<Option<PlaybackSnapshot>> {
        let spec = RequestSpec::get("/me/player").playback_control();

        let body = match self.execute(party_code, &spec).await {
            Ok(Some(body)) => body,
            Ok(None) | Err(GatewayError::NoActiveDevice) => return Ok(None),
            Err(e) => return Err(e),
        };

        let state: PlaybackStateResponse = serde_json::from_value(body)
            .map_err(|e| GatewayError::Parse(format!("Failed to parse playback state: {}", e)))?;
        Ok(Some(state.into()))
    }

    /// Devices currently visible to the host account.
    pub async fn list_devices(&self, party_code: &PartyCode) -> Result<Vec<Device>> {
        let response: DevicesResponse = self
            .execute_json(party_code, &RequestSpec::get("/me/player/devices"))
            .await?;
        debug!(party_code = %party_code, count = response.devices.len(), "Listed devices");
        Ok(response.devices)
    }

    /// Whether the host has an active device to play on.
    pub async fn device_availability(&self, party_code: &PartyCode) -> Result<DeviceAvailability> {
        let devices = self.list_devices(party_code).await?;
        Ok(DeviceAvailability::from_devices(devices))
    }

    /// Start an album, artist or playlist on the active device.
    pub async fn start_context_playback(&self, party_code: &PartyCode, context_uri: &str) -> Result<()> {
        let uri = MusicUri::context(context_uri)?;

        let spec = RequestSpec::put("/me/player/play")
            .with_json(json!({ "context_uri": uri.to_string() }))
            .playback_control();
        self.execute(party_code, &spec).await?;

        info!(party_code = %party_code, uri = %uri, "Context playback started");
        Ok(())
    }

    /// Move playback to a device, optionally starting it.
    pub async fn transfer_playback(
        &self,
        party_code: &PartyCode,
        device_id: &str,
        play: bool,
    ) -> Result<()> {
        let device_id = device_id.trim();
        if device_id.is_empty() {
            return Err(JukeError::invalid_input("device id is empty").into());
        }

        let spec = RequestSpec::put("/me/player")
            .with_json(json!({ "device_ids": [device_id], "play": play }))
            .playback_control();
        self.execute(party_code, &spec).await?;

        info!(party_code = %party_code, device_id, "Playback transferred");
        Ok(())
    }

    async fn control(
        &self,
        party_code: &PartyCode,
        spec: RequestSpec,
        device_id: Option<&str>,
    ) -> Result<()> {
        let spec = on_device(spec, device_id)?.playback_control();
        self.execute(party_code, &spec).await?;
        debug!(party_code = %party_code, path = %spec.path, "Playback command sent");
        Ok(())
    }
}
