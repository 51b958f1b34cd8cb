use chrono::Utc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Revision metadata attached to a `w:ins`/`w:del`/`w:rPrChange`.
#[derive(Debug, Clone)]
pub struct Revision {
    pub id: u32,
    pub author: String,
    /// ISO-8601 UTC timestamp, e.g. `2026-07-28T00:00:00Z`.
    pub date: String,
}

impl Revision {
    pub fn now(id: u32, author: impl Into<String>) -> Self {
        Revision {
            id,
            author: author.into(),
            date: now_iso8601(),
        }
    }
}

pub fn now_iso8601() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Process-wide revision id counter, starting at 1000 per §3, guarded by an
/// atomic fetch-add rather than a bare global so concurrent calls on
/// different threads (§5) can't hand out the same id.
static NEXT_REVISION_ID: AtomicU32 = AtomicU32::new(1000);

pub fn next_revision_id() -> u32 {
    NEXT_REVISION_ID.fetch_add(1, Ordering::SeqCst)
}

/// Resets the counter. Exists for tests; production callers never need it
/// since ids only need to be unique within one output document, not across
/// the process lifetime.
pub fn reset_revision_id_counter() {
    NEXT_REVISION_ID.store(1000, Ordering::SeqCst);
}

/// Bumps the counter so it starts past the highest id already present in a
/// document being re-processed, avoiding collisions with pre-existing
/// tracked changes the caller didn't ask to touch.
pub fn ensure_counter_past(max_seen: u32) {
    let mut current = NEXT_REVISION_ID.load(Ordering::SeqCst);
    while max_seen >= current {
        match NEXT_REVISION_ID.compare_exchange(
            current,
            max_seen + 1,
            Ordering::SeqCst,
            Ordering::SeqCst,
        ) {
            Ok(_) => break,
            Err(observed) => current = observed,
        }
    }
}
