use crate::client::SessionContext;

/// How a gated element degrades when its required permission is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Remove the element entirely
    Hide,
    /// Keep it visible but inert
    Disable,
    /// Leave it interactive; the server still rejects the action
    Show,
}

/// One UI element whose visibility or enablement depends on a permission
#[derive(Debug, Clone)]
pub struct GatedElement {
    pub id: String,
    pub required: String,
    pub policy: FallbackPolicy,
    pub visible: bool,
    pub enabled: bool,
}

impl GatedElement {
    pub fn new(id: &str, required: &str, policy: FallbackPolicy) -> Self {
        Self {
            id: id.to_string(),
            required: required.to_string(),
            policy,
            visible: true,
            enabled: true,
        }
    }
}

/// Re-evaluates every registered element against the cached permission set
///
/// Runs after login, after any refresh, and whenever new gated elements
/// appear (table rows, modals). A single pass over a registration list
/// rather than per-element subscriptions.
#[derive(Debug, Default)]
pub struct UiReconciler {
    elements: Vec<GatedElement>,
}

impl UiReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a gated element; it stays in its default full state until
    /// the next `reconcile` pass
    pub fn register(&mut self, element: GatedElement) {
        self.elements.push(element);
    }

    /// Apply the cache to every element per its fallback policy
    pub fn reconcile(&mut self, session: &SessionContext) {
        for element in &mut self.elements {
            let granted = session.has_permission(&element.required);
            match element.policy {
                FallbackPolicy::Hide => {
                    element.visible = granted;
                    element.enabled = granted;
                }
                FallbackPolicy::Disable => {
                    element.visible = true;
                    element.enabled = granted;
                }
                FallbackPolicy::Show => {
                    element.visible = true;
                    element.enabled = true;
                }
            }
        }
    }

    pub fn element(&self, id: &str) -> Option<&GatedElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn elements(&self) -> &[GatedElement] {
        &self.elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::dto::auth::CurrentUserResponse;

    fn session(permissions: &[&str]) -> SessionContext {
        let mut ctx = SessionContext::new();
        ctx.populate(CurrentUserResponse {
            name: "Admin".to_string(),
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            role: "Admin".to_string(),
            status: "Active".to_string(),
            user_id: "identity-1".to_string(),
            permissions: permissions.iter().map(|s| s.to_string()).collect(),
        });
        ctx
    }

    #[test]
    fn test_hide_policy_removes_ungranted_element() {
        let mut ui = UiReconciler::new();
        ui.register(GatedElement::new(
            "delete-user-btn",
            "user:delete",
            FallbackPolicy::Hide,
        ));

        let ctx = session(&["user:update"]);
        ui.reconcile(&ctx);

        let button = ui.element("delete-user-btn").unwrap();
        assert!(!button.visible);
        assert!(!button.enabled);
    }

    #[test]
    fn test_disable_policy_keeps_element_visible() {
        let mut ui = UiReconciler::new();
        ui.register(GatedElement::new(
            "edit-role-btn",
            "role:update",
            FallbackPolicy::Disable,
        ));

        ui.reconcile(&session(&[]));
        let button = ui.element("edit-role-btn").unwrap();
        assert!(button.visible);
        assert!(!button.enabled);
    }

    #[test]
    fn test_show_policy_defers_to_server() {
        let mut ui = UiReconciler::new();
        ui.register(GatedElement::new(
            "export-btn",
            "report:export",
            FallbackPolicy::Show,
        ));

        ui.reconcile(&session(&[]));
        let button = ui.element("export-btn").unwrap();
        assert!(button.visible);
        assert!(button.enabled);
    }

    #[test]
    fn test_refresh_after_grant_makes_element_reappear() {
        let mut ui = UiReconciler::new();
        ui.register(GatedElement::new(
            "delete-user-btn",
            "user:delete",
            FallbackPolicy::Hide,
        ));

        let mut ctx = session(&["user:update"]);
        ui.reconcile(&ctx);
        assert!(!ui.element("delete-user-btn").unwrap().visible);

        // A role mutation on the server signals needsRefresh; the client
        // re-fetches its capability snapshot and reconciles again
        ctx.observe_response(true);
        assert!(ctx.is_stale());
        ctx.apply_refresh(CurrentUserResponse {
            name: "Admin".to_string(),
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            role: "Admin".to_string(),
            status: "Active".to_string(),
            user_id: "identity-1".to_string(),
            permissions: vec!["user:update".to_string(), "user:delete".to_string()],
        });
        ui.reconcile(&ctx);

        assert!(ui.element("delete-user-btn").unwrap().visible);
        assert!(ui.element("delete-user-btn").unwrap().enabled);
    }

    #[test]
    fn test_late_registered_element_is_gated_on_next_pass() {
        let mut ui = UiReconciler::new();
        let ctx = session(&[]);
        ui.reconcile(&ctx);

        // A modal opens and registers its own gated controls
        ui.register(GatedElement::new(
            "modal-save-btn",
            "role:update",
            FallbackPolicy::Hide,
        ));
        assert!(ui.element("modal-save-btn").unwrap().visible);

        ui.reconcile(&ctx);
        assert!(!ui.element("modal-save-btn").unwrap().visible);
    }
}
