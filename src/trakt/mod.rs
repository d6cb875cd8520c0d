//! Trakt side of the migration
//!
//! - `client`: the authenticated REST client and history payloads
//! - `oauth`: the manual-code flow that yields a bearer token
//! - `importer`: CSV reading, film resolution and the history write

mod client;
mod importer;
mod oauth;

pub use client::{
    api_headers, HistoryItem, HistoryPayload, SyncCounts, SyncNotFound, SyncResponse,
    TraktClient, TraktIds,
};
pub use importer::{
    read_watch_csv, read_watch_entries, ImportReport, Importer, PlannedAddition, WatchEntry,
};
pub use oauth::{authorize_url, exchange_code, TokenResponse};
