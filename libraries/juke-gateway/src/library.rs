//! Catalog and account lookups.

use crate::error::Result;
use crate::gateway::PartyGateway;
use crate::request::RequestSpec;
use crate::types::{ApiPlaylist, Paging, PlaylistSummary, SearchResponse, TrackSummary, UserProfile};
use juke_core::{normalize_search_query, CredentialStore, PartyCode};
use tracing::debug;

/// Largest page the Web API hands out
const MAX_PAGE_LIMIT: u32 = 50;

impl<S: CredentialStore + ?Sized> PartyGateway<S> {
    /// Search the catalog for tracks.
    ///
    /// Results keep the upstream order. A blank query returns an empty list
    /// without touching the credential store or the network.
    pub async fn search_tracks(&self, party_code: &PartyCode, query: &str) -> Result<Vec<TrackSummary>> {
        let Some(query) = normalize_search_query(query) else {
            return Ok(Vec::new());
        };

        let spec = RequestSpec::get("/search")
            .with_query("q", query)
            .with_query("type", "track")
            .with_query("limit", self.config().gateway.search_limit.to_string());

        let response: SearchResponse = self.execute_json(party_code, &spec).await?;
        let tracks: Vec<TrackSummary> = response
            .tracks
            .items
            .into_iter()
            .map(TrackSummary::from)
            .collect();

        debug!(party_code = %party_code, count = tracks.len(), "Search completed");
        Ok(tracks)
    }

    /// Profile of the host account behind the party.
    pub async fn current_user(&self, party_code: &PartyCode) -> Result<UserProfile> {
        self.execute_json(party_code, &RequestSpec::get("/me")).await
    }

    /// The host's playlists, first page only. `limit` is clamped to 1..=50.
    pub async fn list_playlists(&self, party_code: &PartyCode, limit: u32) -> Result<Vec<PlaylistSummary>> {
        let limit = limit.clamp(1, MAX_PAGE_LIMIT);
        let spec = RequestSpec::get("/me/playlists").with_query("limit", limit.to_string());

        let page: Paging<ApiPlaylist> = self.execute_json(party_code, &spec).await?;
        Ok(page.items.into_iter().map(PlaylistSummary::from).collect())
    }
}
