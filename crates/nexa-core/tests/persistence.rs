//! Persistence tests - verify sessions survive store reopen.

use std::time::Duration;

use async_trait::async_trait;
use nexa_core::models::{Author, Content, Role};
use nexa_core::session::ChatSession;
use nexa_core::store::{FileStore, SessionStore};
use nexa_core::{GeneratedImage, ReplyGenerator, Result};

const TIMEOUT: Duration = Duration::from_secs(5);

struct ImageOnlyGenerator;

#[async_trait]
impl ReplyGenerator for ImageOnlyGenerator {
    async fn generate_text(&self, _contents: &[Content]) -> Result<String> {
        Ok("a plain reply".to_string())
    }

    async fn generate_image(&self, _prompt: &str) -> Result<GeneratedImage> {
        Ok(GeneratedImage {
            mime_type: "image/jpeg".to_string(),
            data: "aW1hZ2UgYnl0ZXM=".to_string(),
        })
    }
}

#[test]
fn entries_survive_store_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");

    // Phase 1: write
    {
        let store = FileStore::open(dir.path()).expect("open");
        store
            .set("abc-123", r#"[{"role":"user","parts":[{"text":"hi"}]}]"#)
            .expect("set");
    }

    // Phase 2: reopen and verify
    {
        let store = FileStore::open(dir.path()).expect("reopen");
        let value = store.get("abc-123").expect("get").expect("present");
        let contents: Vec<Content> = serde_json::from_str(&value).expect("parse");
        assert_eq!(contents[0].role, Role::User);
        assert_eq!(contents[0].first_text(), Some("hi"));
    }
}

#[test]
fn overwrite_replaces_the_whole_value() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::open(dir.path()).expect("open");

    store.set("key", "old value with extra length").expect("set");
    store.set("key", "new").expect("overwrite");

    assert_eq!(store.get("key").expect("get"), Some("new".to_string()));
    assert_eq!(store.list_keys().expect("list"), ["key"]);
}

#[tokio::test]
async fn session_reloads_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let key = "abc-123";

    // Phase 1: run a turn and drop the session
    {
        let store = FileStore::open(dir.path()).expect("open");
        let mut session = ChatSession::open(store, key, TIMEOUT);
        session
            .send(&ImageOnlyGenerator, "tell me a story")
            .await
            .expect("send");
        assert_eq!(session.messages().len(), 2);
    }

    // Phase 2: reopen and verify the rebuilt list
    {
        let store = FileStore::open(dir.path()).expect("reopen");
        let session = ChatSession::open(store, key, TIMEOUT);
        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].author, Author::Assistant);
        assert_eq!(messages[0].text, "a plain reply");
        assert_eq!(messages[1].author, Author::User);
        assert_eq!(messages[1].text, "tell me a story");
    }
}

#[tokio::test]
async fn generated_image_survives_persist_and_reload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let key = "img-session";

    {
        let store = FileStore::open(dir.path()).expect("open");
        let mut session = ChatSession::open(store, key, TIMEOUT);
        session
            .send(&ImageOnlyGenerator, "/imagine a lighthouse")
            .await
            .expect("send");

        let reply = &session.messages()[0];
        assert_eq!(
            reply.image.as_deref(),
            Some("data:image/jpeg;base64,aW1hZ2UgYnl0ZXM=")
        );
    }

    {
        let store = FileStore::open(dir.path()).expect("reopen");
        let session = ChatSession::open(store, key, TIMEOUT);
        let reply = &session.messages()[0];

        let attachment = reply.attachment.as_ref().expect("attachment");
        assert_eq!(attachment.mime_type, "image/jpeg");
        assert_eq!(attachment.data, "aW1hZ2UgYnl0ZXM=");
        assert_eq!(
            reply.image.as_deref(),
            Some("data:image/jpeg;base64,aW1hZ2UgYnl0ZXM=")
        );
    }
}

#[test]
fn absent_key_loads_an_empty_session() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::open(dir.path()).expect("open");

    let session = ChatSession::open(store, "never-written", TIMEOUT);
    assert!(session.messages().is_empty());
}
