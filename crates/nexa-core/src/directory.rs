//! Session enumeration for the history view.
//!
//! Reads the same store the controller writes to, independently. Reserved
//! keys (preferences) are never surfaced as sessions.

use tracing::warn;

use crate::error::Result;
use crate::models::{Content, Part};
use crate::prefs::THEME_KEY;
use crate::store::SessionStore;

/// Keys that live in the store but are not sessions.
pub const RESERVED_KEYS: &[&str] = &[THEME_KEY];

/// Label shown when a stored session has no usable first part.
pub const MISSING_LABEL: &str = "No prompt";

/// One row of the history list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    pub key: String,
    pub label: String,
}

/// Whether a key is reserved for non-session data.
pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// List stored sessions with their display labels, in key order.
///
/// The label is the text of the first part of the first stored content,
/// i.e. the prompt that started the session. Entries that fail to parse
/// get [`MISSING_LABEL`] instead of breaking the whole listing.
pub fn list_sessions(store: &impl SessionStore) -> Result<Vec<SessionEntry>> {
    let mut entries = Vec::new();
    for key in store.list_keys()? {
        if is_reserved(&key) {
            continue;
        }
        let Some(raw) = store.get(&key)? else {
            continue;
        };
        if raw.is_empty() {
            continue;
        }
        let label = session_label(&key, &raw);
        entries.push(SessionEntry { key, label });
    }
    Ok(entries)
}

fn session_label(key: &str, raw: &str) -> String {
    let contents: Vec<Content> = match serde_json::from_str(raw) {
        Ok(contents) => contents,
        Err(err) => {
            warn!(session = %key, error = %err, "stored session is malformed, using placeholder label");
            return MISSING_LABEL.to_string();
        }
    };
    contents
        .first()
        .and_then(Content::first_text)
        .filter(|text| !text.is_empty())
        .map_or_else(|| MISSING_LABEL.to_string(), str::to_string)
}

/// Remove one session. Callers re-run [`list_sessions`] to refresh any
/// cached view.
pub fn delete_session(store: &impl SessionStore, key: &str) -> Result<()> {
    store.delete(key)
}

/// Rewrite a session's label by replacing the first part of its first
/// stored content. All other turns are left untouched. Missing or empty
/// sessions are a no-op.
pub fn rename_session(store: &impl SessionStore, key: &str, new_label: &str) -> Result<()> {
    let Some(raw) = store.get(key)? else {
        return Ok(());
    };
    let mut contents: Vec<Content> = serde_json::from_str(&raw)?;
    let Some(first) = contents.first_mut() else {
        return Ok(());
    };
    if first.parts.is_empty() {
        first.parts.push(Part::text(new_label));
    } else {
        first.parts[0] = Part::text(new_label);
    }
    store.set(key, &serde_json::to_string(&contents)?)
}

/// Delete every stored session, leaving reserved keys alone.
pub fn clear_all(store: &impl SessionStore) -> Result<()> {
    for key in store.list_keys()? {
        if !is_reserved(&key) {
            store.delete(&key)?;
        }
    }
    Ok(())
}
