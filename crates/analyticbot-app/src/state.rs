// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::SessionRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Chat,
    Admin,
}

impl Route {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Chat => "/chat",
            Self::Admin => "/admin",
        }
    }

    /// Resolves a path the way the router does: `/` and unknown paths land on chat.
    pub fn from_path(path: &str) -> Self {
        match path {
            "/admin" => Self::Admin,
            _ => Self::Chat,
        }
    }

    /// Translation key for the navigation label.
    pub const fn label_key(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Admin => "admin_dashboard",
        }
    }
}

/// Routes visible in the navigation for `role`.
pub fn nav_items(role: SessionRole) -> &'static [Route] {
    if role.is_admin() {
        &[Route::Chat, Route::Admin]
    } else {
        &[Route::Chat]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub role: SessionRole,
    pub route: Route,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            role: SessionRole::User,
            route: Route::Chat,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    SwitchRole(SessionRole),
    ToggleRole,
    Navigate(Route),
    NextRoute,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    RoleChanged(SessionRole),
    RouteChanged(Route),
    RouteRedirected { requested: Route, to: Route },
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::SwitchRole(role) => self.switch_role(role),
            AppCommand::ToggleRole => self.switch_role(self.role.toggled()),
            AppCommand::Navigate(route) => self.navigate(route),
            AppCommand::NextRoute => {
                let items = nav_items(self.role);
                let current = items
                    .iter()
                    .position(|route| *route == self.route)
                    .unwrap_or(0);
                let next = items[(current + 1) % items.len()];
                if next == self.route {
                    return Vec::new();
                }
                self.navigate(next)
            }
            AppCommand::SetStatus(message) => vec![self.set_status(message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn switch_role(&mut self, role: SessionRole) -> Vec<AppEvent> {
        if role == self.role {
            return Vec::new();
        }
        self.role = role;
        let mut events = vec![AppEvent::RoleChanged(role)];
        if self.route == Route::Admin && !role.is_admin() {
            self.route = Route::Chat;
            events.push(AppEvent::RouteChanged(Route::Chat));
        }
        events
    }

    fn navigate(&mut self, route: Route) -> Vec<AppEvent> {
        if route == Route::Admin && !self.role.is_admin() {
            self.route = Route::Chat;
            return vec![AppEvent::RouteRedirected {
                requested: route,
                to: Route::Chat,
            }];
        }
        self.route = route;
        vec![AppEvent::RouteChanged(route)]
    }

    fn set_status(&mut self, message: String) -> AppEvent {
        self.status_line = Some(message.clone());
        AppEvent::StatusUpdated(message)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppState, Route, nav_items};
    use crate::SessionRole;

    #[test]
    fn non_admin_is_redirected_from_admin_route() {
        let mut state = AppState::default();

        let events = state.dispatch(AppCommand::Navigate(Route::Admin));
        assert_eq!(state.route, Route::Chat);
        assert_eq!(
            events,
            vec![AppEvent::RouteRedirected {
                requested: Route::Admin,
                to: Route::Chat,
            }],
        );
    }

    #[test]
    fn admin_can_open_admin_route() {
        let mut state = AppState {
            role: SessionRole::Admin,
            ..AppState::default()
        };

        let events = state.dispatch(AppCommand::Navigate(Route::Admin));
        assert_eq!(state.route, Route::Admin);
        assert_eq!(events, vec![AppEvent::RouteChanged(Route::Admin)]);
    }

    #[test]
    fn dropping_admin_role_leaves_admin_route() {
        let mut state = AppState {
            role: SessionRole::Admin,
            route: Route::Admin,
            status_line: None,
        };

        let events = state.dispatch(AppCommand::ToggleRole);
        assert_eq!(state.role, SessionRole::User);
        assert_eq!(state.route, Route::Chat);
        assert_eq!(
            events,
            vec![
                AppEvent::RoleChanged(SessionRole::User),
                AppEvent::RouteChanged(Route::Chat),
            ],
        );
    }

    #[test]
    fn switching_to_same_role_is_silent() {
        let mut state = AppState::default();
        assert!(state.dispatch(AppCommand::SwitchRole(SessionRole::User)).is_empty());
    }

    #[test]
    fn next_route_cycles_only_visible_routes() {
        let mut user = AppState::default();
        assert!(user.dispatch(AppCommand::NextRoute).is_empty());
        assert_eq!(user.route, Route::Chat);

        let mut admin = AppState {
            role: SessionRole::Admin,
            ..AppState::default()
        };
        admin.dispatch(AppCommand::NextRoute);
        assert_eq!(admin.route, Route::Admin);
        admin.dispatch(AppCommand::NextRoute);
        assert_eq!(admin.route, Route::Chat);
    }

    #[test]
    fn nav_items_are_role_gated() {
        assert_eq!(nav_items(SessionRole::User), &[Route::Chat]);
        assert_eq!(nav_items(SessionRole::Admin), &[Route::Chat, Route::Admin]);
    }

    #[test]
    fn root_path_resolves_to_chat() {
        assert_eq!(Route::from_path("/"), Route::Chat);
        assert_eq!(Route::from_path("/admin"), Route::Admin);
        assert_eq!(Route::from_path(Route::Chat.path()), Route::Chat);
    }

    #[test]
    fn status_set_and_clear() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::SetStatus("saved".to_owned()));
        assert_eq!(state.status_line.as_deref(), Some("saved"));
        let events = state.dispatch(AppCommand::ClearStatus);
        assert_eq!(state.status_line, None);
        assert_eq!(events, vec![AppEvent::StatusCleared]);
    }
}
