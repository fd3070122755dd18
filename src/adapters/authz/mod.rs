//! Authorization collaborator
//!
//! Decides whether a caller may start an export for a project. Checked
//! before a job exists, never inside the pipeline.

use crate::config::AuthorizationConfig;
use crate::domain::ids::{Principal, ProjectId};
use crate::domain::Result;
use async_trait::async_trait;
use std::collections::HashSet;

/// Authorization trait
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Whether `principal` may export `project_id`
    async fn can_export(&self, principal: &Principal, project_id: &ProjectId) -> Result<bool>;
}

/// Allow-list authorizer
///
/// Entries are either a bare principal (any project) or
/// `principal@project` (one project). An empty list allows everyone.
#[derive(Debug, Clone, Default)]
pub struct AllowListAuthorizer {
    entries: HashSet<String>,
}

impl AllowListAuthorizer {
    /// Creates an authorizer from allow-list entries
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates an authorizer from configuration
    pub fn from_config(config: &AuthorizationConfig) -> Self {
        Self::new(config.allowed_principals.iter().cloned())
    }
}

#[async_trait]
impl Authorizer for AllowListAuthorizer {
    async fn can_export(&self, principal: &Principal, project_id: &ProjectId) -> Result<bool> {
        if self.entries.is_empty() {
            return Ok(true);
        }
        let scoped = format!("{principal}@{project_id}");
        Ok(self.entries.contains(principal.as_str()) || self.entries.contains(&scoped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(s: &str) -> Principal {
        Principal::new(s).unwrap()
    }

    fn project(s: &str) -> ProjectId {
        ProjectId::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_empty_list_allows_all() {
        let authz = AllowListAuthorizer::default();
        assert!(authz.can_export(&principal("anyone"), &project("p")).await.unwrap());
    }

    #[tokio::test]
    async fn test_bare_and_scoped_entries() {
        let authz = AllowListAuthorizer::new(["alice", "bob@bridge-1"]);

        assert!(authz.can_export(&principal("alice"), &project("x")).await.unwrap());
        assert!(authz
            .can_export(&principal("bob"), &project("bridge-1"))
            .await
            .unwrap());
        assert!(!authz
            .can_export(&principal("bob"), &project("bridge-2"))
            .await
            .unwrap());
        assert!(!authz.can_export(&principal("carol"), &project("x")).await.unwrap());
    }
}
