use std::collections::HashSet;

use crate::types::dto::auth::CurrentUserResponse;

/// Client-side session state: the cached profile and permission set
///
/// Populated from a `current-user` payload after login. Any API response
/// carrying `needsRefresh: true` marks the cache stale; callers must
/// re-fetch before trusting `has_permission` again.
#[derive(Debug, Default, Clone)]
pub struct SessionContext {
    profile: Option<CurrentUserResponse>,
    permissions: HashSet<String>,
    stale: bool,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the cache from a freshly fetched capability snapshot
    pub fn populate(&mut self, snapshot: CurrentUserResponse) {
        self.permissions = snapshot.permissions.iter().cloned().collect();
        self.profile = Some(snapshot);
        self.stale = false;
    }

    /// Note a server response; `needs_refresh` invalidates the cache
    pub fn observe_response(&mut self, needs_refresh: bool) {
        if needs_refresh {
            self.stale = true;
        }
    }

    /// Whether the cached permission set can no longer be trusted
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Replace the cache after a refresh fetch
    pub fn apply_refresh(&mut self, snapshot: CurrentUserResponse) {
        self.populate(snapshot);
    }

    /// Drop everything on logout
    pub fn clear(&mut self) {
        self.profile = None;
        self.permissions.clear();
        self.stale = false;
    }

    pub fn profile(&self) -> Option<&CurrentUserResponse> {
        self.profile.as_ref()
    }

    /// Whether the cached set contains a permission key
    ///
    /// Answers from the cache even when stale; check `is_stale` first when
    /// the decision matters.
    pub fn has_permission(&self, key: &str) -> bool {
        self.permissions.contains(key)
    }

    pub fn is_logged_in(&self) -> bool {
        self.profile.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(permissions: &[&str]) -> CurrentUserResponse {
        CurrentUserResponse {
            name: "Admin".to_string(),
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            role: "Admin".to_string(),
            status: "Active".to_string(),
            user_id: "identity-1".to_string(),
            permissions: permissions.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_populate_and_query() {
        let mut ctx = SessionContext::new();
        assert!(!ctx.is_logged_in());

        ctx.populate(snapshot(&["user:update", "report:view"]));
        assert!(ctx.is_logged_in());
        assert!(ctx.has_permission("user:update"));
        assert!(!ctx.has_permission("user:delete"));
        assert!(!ctx.is_stale());
    }

    #[test]
    fn test_needs_refresh_marks_stale_until_refreshed() {
        let mut ctx = SessionContext::new();
        ctx.populate(snapshot(&["user:update"]));

        ctx.observe_response(false);
        assert!(!ctx.is_stale());

        ctx.observe_response(true);
        assert!(ctx.is_stale());
        // Stale cache still answers from its last snapshot
        assert!(ctx.has_permission("user:update"));

        ctx.apply_refresh(snapshot(&["user:update", "user:delete"]));
        assert!(!ctx.is_stale());
        assert!(ctx.has_permission("user:delete"));
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut ctx = SessionContext::new();
        ctx.populate(snapshot(&["user:update"]));
        ctx.observe_response(true);

        ctx.clear();
        assert!(!ctx.is_logged_in());
        assert!(!ctx.has_permission("user:update"));
        assert!(!ctx.is_stale());
    }
}
