use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::{debug, warn};
use thiserror::Error;

/// Autocomplete vocabularies offered by inline editors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestionKind {
    Tags,
    Projects,
    Contexts,
}

#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("suggestion source unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read suggestions: {0}")]
    Io(#[from] std::io::Error),
}

/// Where suggestions come from (the host's task index, usually)
pub trait SuggestionSource {
    fn fetch(&self, kind: SuggestionKind) -> Result<Vec<String>, SuggestionError>;
}

impl<F> SuggestionSource for F
where
    F: Fn(SuggestionKind) -> Result<Vec<String>, SuggestionError>,
{
    fn fetch(&self, kind: SuggestionKind) -> Result<Vec<String>, SuggestionError> {
        self(kind)
    }
}

struct Entry {
    values: Vec<String>,
    fetched_at: Instant,
}

/// Lazily filled, time-limited cache of suggestion lists. Owned by one
/// table and cleared when it detaches.
pub struct SuggestionCache {
    source: Option<Box<dyn SuggestionSource>>,
    ttl: Duration,
    entries: HashMap<SuggestionKind, Entry>,
}

impl SuggestionCache {
    pub fn new(ttl: Duration) -> Self {
        SuggestionCache {
            source: None,
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn set_source(&mut self, source: impl SuggestionSource + 'static) {
        self.source = Some(Box::new(source));
        self.entries.clear();
    }

    pub fn get(&mut self, kind: SuggestionKind) -> Vec<String> {
        self.get_at(kind, Instant::now())
    }

    /// Cached values while fresh at `now`, otherwise a new fetch. A failed
    /// fetch yields nothing and is not cached, so the next call retries.
    pub fn get_at(&mut self, kind: SuggestionKind, now: Instant) -> Vec<String> {
        let fresh = self
            .entries
            .get(&kind)
            .filter(|entry| now.saturating_duration_since(entry.fetched_at) < self.ttl);
        if let Some(entry) = fresh {
            return entry.values.clone();
        }

        let Some(source) = &self.source else {
            debug!("no suggestion source for {kind:?}");
            return Vec::new();
        };
        match source.fetch(kind) {
            Ok(mut values) => {
                values.sort();
                values.dedup();
                self.entries.insert(
                    kind,
                    Entry {
                        values: values.clone(),
                        fetched_at: now,
                    },
                );
                values
            }
            Err(e) => {
                warn!("fetching {kind:?} suggestions failed: {e}");
                self.entries.remove(&kind);
                Vec::new()
            }
        }
    }

    pub fn is_cached(&self, kind: SuggestionKind) -> bool {
        self.entries.contains_key(&kind)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
