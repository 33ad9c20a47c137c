use std::collections::HashMap;

use crate::domain::AuthorProfile;

/// Boundary to the external author registry. A missing author id aborts
/// export of that entity only; a placeholder profile is never substituted.
pub trait AuthorRegistry {
    fn lookup(&self, author_id: &str) -> Option<AuthorProfile>;
}

/// In-memory author registry used in tests and batch runs that preload the
/// author table.
#[derive(Debug, Default)]
pub struct InMemoryAuthorRegistry {
    authors: HashMap<String, AuthorProfile>,
}

impl InMemoryAuthorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, author_id: impl Into<String>, profile: AuthorProfile) {
        self.authors.insert(author_id.into(), profile);
    }
}

impl AuthorRegistry for InMemoryAuthorRegistry {
    fn lookup(&self, author_id: &str) -> Option<AuthorProfile> {
        self.authors.get(author_id).cloned()
    }
}
