//! Session id generation.

use uuid::Uuid;

/// Mints fresh session identifiers for callers that do not supply their own.
///
/// Ids are UUID-v4 with a `session-` prefix so they are recognizable in logs
/// and in `list_sessions` output.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdGenerator;

impl IdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Generates a new unique session id.
    #[must_use]
    pub fn generate_session_id(&self) -> String {
        format!("session-{}", Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_prefixed() {
        let generator = IdGenerator::new();
        let a = generator.generate_session_id();
        let b = generator.generate_session_id();
        assert!(a.starts_with("session-"));
        assert_ne!(a, b);
    }
}
