//! Route rules and redirect targets for the event-planner screens.

use serde::Serialize;

use eventhub_auth::{NavigationOutcome, RouteTable};

pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// What the rendering layer should do with a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "path", rename_all = "snake_case")]
pub enum Navigation {
    /// Render the requested route.
    Render(String),
    /// Replace the location with this path.
    Redirect(String),
}

impl Navigation {
    pub fn path(&self) -> &str {
        match self {
            Navigation::Render(path) | Navigation::Redirect(path) => path,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Navigation::Redirect(_))
    }
}

/// Translate a guard outcome into a concrete path.
pub fn resolve(outcome: NavigationOutcome, requested: &str) -> Navigation {
    match outcome {
        NavigationOutcome::Allow => Navigation::Render(requested.to_string()),
        NavigationOutcome::RedirectLogin => Navigation::Redirect(LOGIN_PATH.to_string()),
        NavigationOutcome::RedirectRoleHome(role) => Navigation::Redirect(role.home_route().to_string()),
        NavigationOutcome::RedirectUnauthorized => Navigation::Redirect(UNAUTHORIZED_PATH.to_string()),
    }
}

/// Built-in authorization rules for every guarded screen.
pub fn default_routes() -> RouteTable {
    use eventhub_auth::Role::{Admin, Organizer, User};

    RouteTable::new()
        // attendee
        .with_route("/user/dashboard", [User])
        .with_route("/user/events", [User])
        .with_route("/user/registrations", [User])
        .with_route("/user/feedback", [User])
        // organizer
        .with_route("/organizer/dashboard", [Organizer])
        .with_route("/organizer/events", [Organizer])
        .with_route("/organizer/events/new", [Organizer])
        .with_route("/organizer/feedback", [Organizer])
        .with_route("/organizer/analytics", [Organizer])
        // admin
        .with_route("/admin/dashboard", [Admin])
        .with_route("/admin/events/review", [Admin])
        .with_route("/admin/users", [Admin])
        .with_route("/admin/analytics", [Admin])
        // shared
        .with_route("/events", [User, Organizer, Admin])
        .with_route("/profile", [User, Organizer, Admin])
        .with_route("/analytics", [Organizer, Admin])
}
