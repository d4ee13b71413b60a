//! navigation::routes
//!
//! The two screen graphs and the screens in them.

use serde::Serialize;
use std::fmt;

/// A set of screens mounted together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Graph {
    /// Shown when nobody is signed in.
    Auth,
    /// Shown when a session is present.
    App,
}

impl Graph {
    /// The graph for a given session presence.
    pub fn for_presence(signed_in: bool) -> Self {
        if signed_in {
            Graph::App
        } else {
            Graph::Auth
        }
    }

    /// The screen a fresh stack starts on.
    pub fn root(self) -> Screen {
        match self {
            Graph::Auth => Screen::SignIn,
            Graph::App => Screen::Dashboard,
        }
    }

    pub fn screens(self) -> &'static [Screen] {
        match self {
            Graph::Auth => &[Screen::SignIn, Screen::SignUp],
            Graph::App => &[Screen::Dashboard, Screen::Profile],
        }
    }

    pub fn contains(self, screen: Screen) -> bool {
        screen.graph() == self
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Graph::Auth => write!(f, "auth"),
            Graph::App => write!(f, "app"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Screen {
    SignIn,
    SignUp,
    Dashboard,
    Profile,
}

impl Screen {
    /// The graph this screen belongs to.
    pub fn graph(self) -> Graph {
        match self {
            Screen::SignIn | Screen::SignUp => Graph::Auth,
            Screen::Dashboard | Screen::Profile => Graph::App,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Screen::SignIn => "SignIn",
            Screen::SignUp => "SignUp",
            Screen::Dashboard => "Dashboard",
            Screen::Profile => "Profile",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_picks_graph() {
        assert_eq!(Graph::for_presence(false), Graph::Auth);
        assert_eq!(Graph::for_presence(true), Graph::App);
    }

    #[test]
    fn roots() {
        assert_eq!(Graph::Auth.root(), Screen::SignIn);
        assert_eq!(Graph::App.root(), Screen::Dashboard);
    }

    #[test]
    fn graphs_partition_screens() {
        for graph in [Graph::Auth, Graph::App] {
            for screen in graph.screens() {
                assert!(graph.contains(*screen));
                assert_eq!(screen.graph(), graph);
            }
            assert!(graph.contains(graph.root()));
        }
        assert!(!Graph::Auth.contains(Screen::Profile));
        assert!(!Graph::App.contains(Screen::SignUp));
    }

    #[test]
    fn display() {
        assert_eq!(Graph::App.to_string(), "app");
        assert_eq!(Screen::SignUp.to_string(), "SignUp");
    }
}
