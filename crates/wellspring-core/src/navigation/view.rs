//! Screen selection.
//!
//! The router holds exactly one current [`View`]. Navigation is explicit and
//! flat: `back()` always lands on the dashboard, there is no history stack.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Dashboard,
    Mood,
    Relax,
    Journal,
    /// Has no screen of its own yet; resolves to the dashboard.
    Profile,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Dashboard,
        View::Mood,
        View::Relax,
        View::Journal,
        View::Profile,
    ];

    /// The view that is actually shown for this navigation target.
    pub fn resolve(self) -> View {
        match self {
            View::Profile => View::Dashboard,
            other => other,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Mood => "mood",
            View::Relax => "relax",
            View::Journal => "journal",
            View::Profile => "profile",
        }
    }

    /// Label in the navigation bar.
    pub fn nav_label(self) -> &'static str {
        match self {
            View::Dashboard => "Home",
            View::Mood => "Mood",
            View::Relax => "Relax",
            View::Journal => "Journal",
            View::Profile => "Profile",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Dashboard | View::Profile => "Dashboard",
            View::Mood => "How are you feeling?",
            View::Relax => "Relaxation Tools",
            View::Journal => "Personal Journal",
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for View {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dashboard" | "home" => Ok(View::Dashboard),
            "mood" => Ok(View::Mood),
            "relax" => Ok(View::Relax),
            "journal" => Ok(View::Journal),
            "profile" => Ok(View::Profile),
            other => Err(ValidationError::InvalidValue {
                field: "view".into(),
                message: format!("unknown view '{other}'"),
            }),
        }
    }
}

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: View,
    pub to: View,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }

    pub fn left(&self, view: View) -> bool {
        self.changed() && self.from == view
    }

    pub fn entered(&self, view: View) -> bool {
        self.changed() && self.to == view
    }
}

#[derive(Debug, Clone, Default)]
pub struct Router {
    current: View,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently shown view. Never [`View::Profile`].
    pub fn current(&self) -> View {
        self.current
    }

    pub fn navigate(&mut self, target: View) -> Transition {
        let from = self.current;
        self.current = target.resolve();
        if from != self.current {
            debug!(%from, to = %self.current, "view changed");
        }
        Transition {
            from,
            to: self.current,
        }
    }

    /// Leave the current screen for its fixed parent, the dashboard.
    pub fn back(&mut self) -> Transition {
        self.navigate(View::Dashboard)
    }

    /// Whether the navigation bar highlights `item`.
    pub fn is_active(&self, item: View) -> bool {
        item == self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_dashboard() {
        assert_eq!(Router::new().current(), View::Dashboard);
    }

    #[test]
    fn profile_redirects_to_dashboard() {
        let mut router = Router::new();
        router.navigate(View::Journal);
        let t = router.navigate(View::Profile);
        assert_eq!(t.to, View::Dashboard);
        assert_eq!(router.current(), View::Dashboard);
    }

    #[test]
    fn back_ignores_history() {
        let mut router = Router::new();
        router.navigate(View::Mood);
        router.navigate(View::Relax);
        router.navigate(View::Journal);
        assert_eq!(router.back().to, View::Dashboard);
        assert_eq!(router.back().to, View::Dashboard);
    }

    #[test]
    fn transition_reports_left_and_entered() {
        let mut router = Router::new();
        let t = router.navigate(View::Relax);
        assert!(t.entered(View::Relax));
        assert!(t.left(View::Dashboard));
        let t = router.navigate(View::Relax);
        assert!(!t.changed());
    }

    #[test]
    fn parses_view_ids() {
        assert_eq!("relax".parse::<View>().unwrap(), View::Relax);
        assert_eq!("Home".parse::<View>().unwrap(), View::Dashboard);
        assert!("settings".parse::<View>().is_err());
    }
}
