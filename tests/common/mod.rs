//! In-memory record-store fixture shared by the integration suites.
//!
//! Implements the collaborator contracts against a `Vec`-backed store:
//! tracks carry a unique title and a release year (the event ordering),
//! artists are protected from deletion while an album references them,
//! and readings are the validated model (a reading value must not be
//! negative - but only `validate` checks that, `save` never does).

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use ormlift::attr::{FieldAccess, Value};
use ormlift::error::{OrmError, ValidationError};
use ormlift::model::ModelOps;
use ormlift::queryset::RowSet;

// =============================================================================
// Rows, payloads, filters
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRow {
    pub id: u64,
    pub title: String,
    pub released: i64,
}

#[derive(Debug, Clone)]
pub struct NewTrack {
    pub title: String,
    pub released: i64,
}

pub fn new_track(title: &str, released: i64) -> NewTrack {
    NewTrack {
        title: title.to_string(),
        released,
    }
}

#[derive(Debug, Clone, Default)]
pub struct TrackFilter {
    pub id: Option<u64>,
    pub title: Option<String>,
}

pub fn by_title(title: &str) -> TrackFilter {
    TrackFilter {
        id: None,
        title: Some(title.to_string()),
    }
}

pub fn by_id(id: u64) -> TrackFilter {
    TrackFilter {
        id: Some(id),
        title: None,
    }
}

pub fn all_tracks() -> TrackFilter {
    TrackFilter::default()
}

impl TrackFilter {
    fn matches(&self, row: &TrackRow) -> bool {
        self.id.is_none_or(|id| id == row.id)
            && self.title.as_ref().is_none_or(|title| *title == row.title)
    }
}

impl FieldAccess for TrackRow {
    const TYPE_NAME: &'static str = "TrackRow";

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::Int(self.id as i64)),
            "title" => Some(Value::Text(self.title.clone())),
            "released" => Some(Value::Int(self.released)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistRow {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct NewArtist {
    pub name: String,
}

pub fn new_artist(name: &str) -> NewArtist {
    NewArtist {
        name: name.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArtistFilter {
    pub name: Option<String>,
}

pub fn by_name(name: &str) -> ArtistFilter {
    ArtistFilter {
        name: Some(name.to_string()),
    }
}

impl ArtistFilter {
    fn matches(&self, row: &ArtistRow) -> bool {
        self.name.as_ref().is_none_or(|name| *name == row.name)
    }
}

#[derive(Debug, Clone)]
struct AlbumRow {
    id: u64,
    title: String,
    artist_id: u64,
}

#[derive(Debug, Clone)]
struct ReadingRow {
    id: u64,
    value: i64,
}

// =============================================================================
// Store
// =============================================================================

#[derive(Default)]
struct State {
    tracks: Vec<TrackRow>,
    artists: Vec<ArtistRow>,
    albums: Vec<AlbumRow>,
    readings: Vec<ReadingRow>,
    next_id: u64,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Handle to the shared in-memory store. Cheap to clone; every set handed
/// out stays bound to the same state.
#[derive(Clone, Default)]
pub struct MemoryDb {
    state: Arc<Mutex<State>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracks(&self) -> TrackSet {
        TrackSet { db: self.clone() }
    }

    pub fn artists(&self) -> ArtistSet {
        ArtistSet { db: self.clone() }
    }

    pub fn track_count(&self) -> usize {
        self.state.lock().unwrap().tracks.len()
    }

    pub fn artist_count(&self) -> usize {
        self.state.lock().unwrap().artists.len()
    }

    pub fn reading_count(&self) -> usize {
        self.state.lock().unwrap().readings.len()
    }

    /// Stores an album referencing `artist_id`, protecting that artist
    /// from deletion.
    pub fn add_album(&self, title: &str, artist_id: u64) {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.albums.push(AlbumRow {
            id,
            title: title.to_string(),
            artist_id,
        });
    }

    /// Rewrites a reading's stored value behind any live model instance.
    pub fn set_reading_value(&self, id: u64, value: i64) {
        let mut state = self.state.lock().unwrap();
        if let Some(row) = state.readings.iter_mut().find(|row| row.id == id) {
            row.value = value;
        }
    }
}

// =============================================================================
// Track collection
// =============================================================================

#[derive(Clone)]
pub struct TrackSet {
    db: MemoryDb,
}

impl RowSet for TrackSet {
    type Row = TrackRow;
    type NewRow = NewTrack;
    type Filter = TrackFilter;

    fn get(&self, filter: &TrackFilter) -> Result<TrackRow, OrmError> {
        let state = self.db.state.lock().unwrap();
        let mut matches = state.tracks.iter().filter(|row| filter.matches(row));
        match (matches.next(), matches.next()) {
            (Some(row), None) => Ok(row.clone()),
            (Some(_), Some(_)) => Err(OrmError::MultipleRows),
            (None, _) => Err(OrmError::NotFound),
        }
    }

    fn earliest(&self) -> Result<TrackRow, OrmError> {
        let state = self.db.state.lock().unwrap();
        state
            .tracks
            .iter()
            .min_by_key(|row| (row.released, row.id))
            .cloned()
            .ok_or(OrmError::NotFound)
    }

    fn latest(&self) -> Result<TrackRow, OrmError> {
        let state = self.db.state.lock().unwrap();
        state
            .tracks
            .iter()
            .max_by_key(|row| (row.released, row.id))
            .cloned()
            .ok_or(OrmError::NotFound)
    }

    fn first(&self) -> Result<TrackRow, OrmError> {
        let state = self.db.state.lock().unwrap();
        state
            .tracks
            .iter()
            .min_by_key(|row| row.id)
            .cloned()
            .ok_or(OrmError::NotFound)
    }

    fn last(&self) -> Result<TrackRow, OrmError> {
        let state = self.db.state.lock().unwrap();
        state
            .tracks
            .iter()
            .max_by_key(|row| row.id)
            .cloned()
            .ok_or(OrmError::NotFound)
    }

    fn create(&self, row: NewTrack) -> Result<TrackRow, OrmError> {
        let mut state = self.db.state.lock().unwrap();
        if state.tracks.iter().any(|stored| stored.title == row.title) {
            return Err(OrmError::integrity(format!(
                "duplicate track title '{}'",
                row.title
            )));
        }
        let id = state.next_id();
        let stored = TrackRow {
            id,
            title: row.title,
            released: row.released,
        };
        state.tracks.push(stored.clone());
        Ok(stored)
    }

    fn get_or_create(
        &self,
        filter: &TrackFilter,
        defaults: NewTrack,
    ) -> Result<(TrackRow, bool), OrmError> {
        match self.get(filter) {
            Ok(row) => Ok((row, false)),
            Err(OrmError::NotFound) => self.create(defaults).map(|row| (row, true)),
            Err(error) => Err(error),
        }
    }

    fn update_or_create(
        &self,
        filter: &TrackFilter,
        defaults: NewTrack,
    ) -> Result<(TrackRow, bool), OrmError> {
        match self.get(filter) {
            Ok(existing) => {
                let mut state = self.db.state.lock().unwrap();
                if state
                    .tracks
                    .iter()
                    .any(|stored| stored.id != existing.id && stored.title == defaults.title)
                {
                    return Err(OrmError::integrity(format!(
                        "duplicate track title '{}'",
                        defaults.title
                    )));
                }
                let row = state
                    .tracks
                    .iter_mut()
                    .find(|stored| stored.id == existing.id)
                    .expect("row fetched above");
                row.title = defaults.title;
                row.released = defaults.released;
                Ok((row.clone(), false))
            }
            Err(OrmError::NotFound) => self.create(defaults).map(|row| (row, true)),
            Err(error) => Err(error),
        }
    }

    fn delete(&self, filter: &TrackFilter) -> Result<u64, OrmError> {
        let mut state = self.db.state.lock().unwrap();
        let before = state.tracks.len();
        state.tracks.retain(|row| !filter.matches(row));
        Ok((before - state.tracks.len()) as u64)
    }

    fn bulk_create(&self, rows: Vec<NewTrack>) -> Result<Vec<TrackRow>, OrmError> {
        let mut state = self.db.state.lock().unwrap();
        for (index, row) in rows.iter().enumerate() {
            let dup_stored = state.tracks.iter().any(|stored| stored.title == row.title);
            let dup_batch = rows[..index].iter().any(|prior| prior.title == row.title);
            if dup_stored || dup_batch {
                return Err(OrmError::integrity(format!(
                    "duplicate track title '{}'",
                    row.title
                )));
            }
        }
        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let id = state.next_id();
            let created = TrackRow {
                id,
                title: row.title,
                released: row.released,
            };
            state.tracks.push(created.clone());
            stored.push(created);
        }
        Ok(stored)
    }
}

// =============================================================================
// Artist collection (protect-on-delete)
// =============================================================================

#[derive(Clone)]
pub struct ArtistSet {
    db: MemoryDb,
}

impl RowSet for ArtistSet {
    type Row = ArtistRow;
    type NewRow = NewArtist;
    type Filter = ArtistFilter;

    fn get(&self, filter: &ArtistFilter) -> Result<ArtistRow, OrmError> {
        let state = self.db.state.lock().unwrap();
        let mut matches = state.artists.iter().filter(|row| filter.matches(row));
        match (matches.next(), matches.next()) {
            (Some(row), None) => Ok(row.clone()),
            (Some(_), Some(_)) => Err(OrmError::MultipleRows),
            (None, _) => Err(OrmError::NotFound),
        }
    }

    fn earliest(&self) -> Result<ArtistRow, OrmError> {
        self.first()
    }

    fn latest(&self) -> Result<ArtistRow, OrmError> {
        self.last()
    }

    fn first(&self) -> Result<ArtistRow, OrmError> {
        let state = self.db.state.lock().unwrap();
        state
            .artists
            .iter()
            .min_by_key(|row| row.id)
            .cloned()
            .ok_or(OrmError::NotFound)
    }

    fn last(&self) -> Result<ArtistRow, OrmError> {
        let state = self.db.state.lock().unwrap();
        state
            .artists
            .iter()
            .max_by_key(|row| row.id)
            .cloned()
            .ok_or(OrmError::NotFound)
    }

    fn create(&self, row: NewArtist) -> Result<ArtistRow, OrmError> {
        let mut state = self.db.state.lock().unwrap();
        if state.artists.iter().any(|stored| stored.name == row.name) {
            return Err(OrmError::integrity(format!(
                "duplicate artist name '{}'",
                row.name
            )));
        }
        let id = state.next_id();
        let stored = ArtistRow { id, name: row.name };
        state.artists.push(stored.clone());
        Ok(stored)
    }

    fn get_or_create(
        &self,
        filter: &ArtistFilter,
        defaults: NewArtist,
    ) -> Result<(ArtistRow, bool), OrmError> {
        match self.get(filter) {
            Ok(row) => Ok((row, false)),
            Err(OrmError::NotFound) => self.create(defaults).map(|row| (row, true)),
            Err(error) => Err(error),
        }
    }

    fn update_or_create(
        &self,
        filter: &ArtistFilter,
        defaults: NewArtist,
    ) -> Result<(ArtistRow, bool), OrmError> {
        match self.get(filter) {
            Ok(existing) => {
                let mut state = self.db.state.lock().unwrap();
                let row = state
                    .artists
                    .iter_mut()
                    .find(|stored| stored.id == existing.id)
                    .expect("row fetched above");
                row.name = defaults.name;
                Ok((row.clone(), false))
            }
            Err(OrmError::NotFound) => self.create(defaults).map(|row| (row, true)),
            Err(error) => Err(error),
        }
    }

    fn delete(&self, filter: &ArtistFilter) -> Result<u64, OrmError> {
        let mut state = self.db.state.lock().unwrap();
        let doomed: Vec<u64> = state
            .artists
            .iter()
            .filter(|row| filter.matches(row))
            .map(|row| row.id)
            .collect();
        for artist_id in &doomed {
            if let Some(album) = state
                .albums
                .iter()
                .find(|album| album.artist_id == *artist_id)
            {
                return Err(OrmError::protected(format!(
                    "album '{}' references artist {artist_id}",
                    album.title
                )));
            }
        }
        let before = state.artists.len();
        state.artists.retain(|row| !doomed.contains(&row.id));
        Ok((before - state.artists.len()) as u64)
    }

    fn bulk_create(&self, rows: Vec<NewArtist>) -> Result<Vec<ArtistRow>, OrmError> {
        let mut state = self.db.state.lock().unwrap();
        for (index, row) in rows.iter().enumerate() {
            let dup_stored = state.artists.iter().any(|stored| stored.name == row.name);
            let dup_batch = rows[..index].iter().any(|prior| prior.name == row.name);
            if dup_stored || dup_batch {
                return Err(OrmError::integrity(format!(
                    "duplicate artist name '{}'",
                    row.name
                )));
            }
        }
        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let id = state.next_id();
            let created = ArtistRow { id, name: row.name };
            state.artists.push(created.clone());
            stored.push(created);
        }
        Ok(stored)
    }
}

// =============================================================================
// Validated model instance
// =============================================================================

/// A sensor reading; `validate` rejects negative values, `save` does not.
pub struct Reading {
    db: MemoryDb,
    pub id: Option<u64>,
    pub value: i64,
}

impl Reading {
    pub fn new(db: &MemoryDb, value: i64) -> Self {
        Self {
            db: db.clone(),
            id: None,
            value,
        }
    }
}

impl ModelOps for Reading {
    fn save(&mut self) -> Result<(), OrmError> {
        let mut state = self.db.state.lock().unwrap();
        match self.id {
            Some(id) => match state.readings.iter_mut().find(|row| row.id == id) {
                Some(row) => {
                    row.value = self.value;
                    Ok(())
                }
                None => Err(OrmError::NotFound),
            },
            None => {
                let id = state.next_id();
                state.readings.push(ReadingRow {
                    id,
                    value: self.value,
                });
                self.id = Some(id);
                Ok(())
            }
        }
    }

    fn delete(&mut self) -> Result<(), OrmError> {
        let Some(id) = self.id else {
            return Err(OrmError::NotFound);
        };
        let mut state = self.db.state.lock().unwrap();
        let before = state.readings.len();
        state.readings.retain(|row| row.id != id);
        if state.readings.len() == before {
            return Err(OrmError::NotFound);
        }
        self.id = None;
        Ok(())
    }

    fn validate(&self) -> Result<(), OrmError> {
        if self.value < 0 {
            return Err(ValidationError::field("value", "cannot be negative").into());
        }
        Ok(())
    }

    fn reload(&mut self) -> Result<(), OrmError> {
        let Some(id) = self.id else {
            return Err(OrmError::NotFound);
        };
        let state = self.db.state.lock().unwrap();
        match state.readings.iter().find(|row| row.id == id) {
            Some(row) => {
                self.value = row.value;
                Ok(())
            }
            None => Err(OrmError::NotFound),
        }
    }
}

// =============================================================================
// Async adapter
// =============================================================================

#[cfg(feature = "async")]
pub use asynchronous::AsyncTrackSet;

#[cfg(feature = "async")]
mod asynchronous {
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use ormlift::error::OrmError;
    use ormlift::queryset::{AsyncRowSet, RowSet};

    use super::{NewTrack, TrackFilter, TrackRow, TrackSet};

    /// Suspends exactly once, then resolves. Keeps the store untouched
    /// until the adapter's future is polled past its suspension point.
    pub struct YieldOnce {
        yielded: bool,
    }

    pub fn yield_once() -> YieldOnce {
        YieldOnce { yielded: false }
    }

    impl Future for YieldOnce {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<()> {
            if self.yielded {
                Poll::Ready(())
            } else {
                self.yielded = true;
                context.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    /// The track collection under the asynchronous calling convention.
    ///
    /// Every operation suspends once before touching the store, so a
    /// future dropped at its first poll has had no effect.
    #[derive(Clone)]
    pub struct AsyncTrackSet {
        inner: TrackSet,
    }

    impl AsyncTrackSet {
        pub fn new(inner: TrackSet) -> Self {
            Self { inner }
        }
    }

    impl AsyncRowSet for AsyncTrackSet {
        type Row = TrackRow;
        type NewRow = NewTrack;
        type Filter = TrackFilter;

        async fn get(&self, filter: &TrackFilter) -> Result<TrackRow, OrmError> {
            yield_once().await;
            self.inner.get(filter)
        }

        async fn earliest(&self) -> Result<TrackRow, OrmError> {
            yield_once().await;
            self.inner.earliest()
        }

        async fn latest(&self) -> Result<TrackRow, OrmError> {
            yield_once().await;
            self.inner.latest()
        }

        async fn first(&self) -> Result<TrackRow, OrmError> {
            yield_once().await;
            self.inner.first()
        }

        async fn last(&self) -> Result<TrackRow, OrmError> {
            yield_once().await;
            self.inner.last()
        }

        async fn create(&self, row: NewTrack) -> Result<TrackRow, OrmError> {
            yield_once().await;
            self.inner.create(row)
        }

        async fn get_or_create(
            &self,
            filter: &TrackFilter,
            defaults: NewTrack,
        ) -> Result<(TrackRow, bool), OrmError> {
            yield_once().await;
            self.inner.get_or_create(filter, defaults)
        }

        async fn update_or_create(
            &self,
            filter: &TrackFilter,
            defaults: NewTrack,
        ) -> Result<(TrackRow, bool), OrmError> {
            yield_once().await;
            self.inner.update_or_create(filter, defaults)
        }

        async fn delete(&self, filter: &TrackFilter) -> Result<u64, OrmError> {
            yield_once().await;
            self.inner.delete(filter)
        }

        async fn bulk_create(&self, rows: Vec<NewTrack>) -> Result<Vec<TrackRow>, OrmError> {
            yield_once().await;
            self.inner.bulk_create(rows)
        }
    }
}
