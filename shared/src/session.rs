//! Chat session identity
//!
//! The chat proxy scopes history by an opaque session id owned by the
//! client. The provider is injected rather than kept as module-level
//! state, and ids come from a collision-resistant generator.

use uuid::Uuid;

/// Source of fresh session identifiers
pub trait SessionIds {
    fn next(&self) -> String;
}

/// UUID v4 backed provider
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSessionIds;

impl SessionIds for RandomSessionIds {
    fn next(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Lazy-init, create-once session handle for one chat surface
#[derive(Debug, Default)]
pub struct ChatSession<P: SessionIds> {
    provider: P,
    id: Option<String>,
}

impl<P: SessionIds> ChatSession<P> {
    pub fn new(provider: P) -> Self {
        Self { provider, id: None }
    }

    /// Restore a previously issued id (e.g. from client storage).
    pub fn restore(provider: P, id: String) -> Self {
        Self {
            provider,
            id: Some(id),
        }
    }

    /// The session id, generated on first use and stable afterwards.
    pub fn get_or_create(&mut self) -> &str {
        self.id
            .get_or_insert_with(|| self.provider.next())
            .as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedIds(&'static str);

    impl SessionIds for FixedIds {
        fn next(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn session_id_is_created_once() {
        let mut session = ChatSession::new(RandomSessionIds);
        let first = session.get_or_create().to_string();
        assert_eq!(session.get_or_create(), first);
    }

    #[test]
    fn restored_session_keeps_its_id() {
        let mut session = ChatSession::restore(FixedIds("fresh"), "stored".into());
        assert_eq!(session.get_or_create(), "stored");
    }
}
