//! Services the application page talks to: routing, user alerts and modals.

use crate::models::CommentPeriod;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pages the application view can send the user to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    Applications,
    /// Full map, optionally focused on one application
    Map { application: Option<String> },
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Applications => write!(f, "/applications"),
            Route::Map {
                application: Some(id),
            } => write!(f, "/map;application={id}"),
            Route::Map { application: None } => write!(f, "/map"),
        }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Blocking user notification
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backdrop {
    /// Clicking the backdrop closes the modal
    Dismissible,
    /// Clicking the backdrop does nothing
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalSize {
    Small,
    Default,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalOptions {
    pub backdrop: Backdrop,
    pub size: ModalSize,
}

impl ModalOptions {
    /// Options used for the add-comment modal
    pub const ADD_COMMENT: ModalOptions = ModalOptions {
        backdrop: Backdrop::Static,
        size: ModalSize::Large,
    };
}

/// How a modal was closed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalOutcome {
    /// Closed after a save, with the modal's result
    Saved(String),
    /// Closed without saving, with the dismiss reason
    Dismissed(String),
}

#[async_trait]
pub trait ModalService: Send + Sync {
    /// Opens the add-comment form for `period` and resolves when it closes
    async fn open_add_comment(&self, period: CommentPeriod, options: ModalOptions)
        -> ModalOutcome;
}

/// A tab of the application page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabLink {
    pub label: &'static str,
    pub link: &'static str,
}

pub const TAB_LINKS: [TabLink; 3] = [
    TabLink {
        label: "Application",
        link: "application",
    },
    TabLink {
        label: "Commenting",
        link: "commenting",
    },
    TabLink {
        label: "Decisions",
        link: "decisions",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Applications.to_string(), "/applications");
        assert_eq!(
            Route::Map {
                application: Some("5a1b".to_string())
            }
            .to_string(),
            "/map;application=5a1b"
        );
        assert_eq!(Route::Map { application: None }.to_string(), "/map");
    }

    #[test]
    fn test_tab_links() {
        let labels: Vec<_> = TAB_LINKS.iter().map(|tab| tab.label).collect();
        assert_eq!(labels, vec!["Application", "Commenting", "Decisions"]);
        assert_eq!(TAB_LINKS[2].link, "decisions");
    }
}
