//! navigation::gate
//!
//! Chooses the active screen graph from session presence.
//!
//! The gate never stores "signed in" itself. [`NavigationGate::active_graph`]
//! reads the session store on every call, and the screen stack is reset by a
//! store subscription whenever presence flips. Each mounted screen owns a
//! [`CancellationToken`]; unmounting a screen (back navigation or a graph
//! swap) cancels it so in-flight requests started there are discarded.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::routes::{Graph, Screen};
use super::NavigationError;
use crate::session::{SessionStore, Subscription};

/// Back navigation, as seen by form pipelines.
pub trait Navigator: Send + Sync {
    /// Pop the top screen. Returns false at the root of a graph.
    fn go_back(&self) -> bool;
}

struct Mounted {
    screen: Screen,
    token: CancellationToken,
}

impl Mounted {
    fn new(screen: Screen) -> Self {
        Self {
            screen,
            token: CancellationToken::new(),
        }
    }
}

struct Stack {
    graph: Graph,
    entries: Vec<Mounted>,
}

impl Stack {
    fn rooted(graph: Graph) -> Self {
        Self {
            graph,
            entries: vec![Mounted::new(graph.root())],
        }
    }

    fn unmount_all(&mut self) {
        for entry in self.entries.drain(..) {
            entry.token.cancel();
        }
    }
}

pub struct NavigationGate {
    store: SessionStore,
    stack: Arc<Mutex<Stack>>,
    _subscription: Subscription,
}

impl NavigationGate {
    /// Attach a gate to `store`. The stack starts at the root of the graph
    /// matching the current session and follows every presence change.
    pub fn attach(store: SessionStore) -> Self {
        let stack = Arc::new(Mutex::new(Stack::rooted(Graph::for_presence(
            store.is_present(),
        ))));

        let watched = Arc::clone(&stack);
        let subscription = store.subscribe(move |session| {
            let graph = Graph::for_presence(session.is_some());
            let mut stack = watched.lock().unwrap_or_else(PoisonError::into_inner);
            if stack.graph != graph {
                info!(from = %stack.graph, to = %graph, "switching screen graph");
                stack.unmount_all();
                *stack = Stack::rooted(graph);
            }
        });

        Self {
            store,
            stack,
            _subscription: subscription,
        }
    }

    /// `App` iff a session is present.
    pub fn active_graph(&self) -> Graph {
        Graph::for_presence(self.store.is_present())
    }

    /// The graph to show, or `None` while the session is still being
    /// restored.
    pub fn mounted(&self) -> Option<Graph> {
        self.store.is_restored().then(|| self.active_graph())
    }

    /// Push `screen` onto the stack.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::NotInGraph` if `screen` is not part of the
    /// active graph.
    pub fn navigate(&self, screen: Screen) -> Result<(), NavigationError> {
        let active = self.active_graph();
        if !active.contains(screen) {
            return Err(NavigationError::NotInGraph {
                screen,
                graph: active,
            });
        }

        debug!(%screen, "navigate");
        self.lock_stack().entries.push(Mounted::new(screen));
        Ok(())
    }

    pub fn can_go_back(&self) -> bool {
        self.lock_stack().entries.len() > 1
    }

    pub fn current_screen(&self) -> Screen {
        let top = self.lock_stack().entries.last().map(|m| m.screen);
        top.unwrap_or_else(|| self.active_graph().root())
    }

    /// Screens from root to top.
    pub fn stack(&self) -> Vec<Screen> {
        self.lock_stack().entries.iter().map(|m| m.screen).collect()
    }

    /// Cancellation token of the top screen. Cancelled when that screen is
    /// unmounted.
    pub fn mount_token(&self) -> CancellationToken {
        match self.lock_stack().entries.last() {
            Some(top) => top.token.clone(),
            None => {
                let token = CancellationToken::new();
                token.cancel();
                token
            }
        }
    }

    pub fn session_store(&self) -> &SessionStore {
        &self.store
    }

    fn lock_stack(&self) -> MutexGuard<'_, Stack> {
        self.stack.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for NavigationGate {
    fn go_back(&self) -> bool {
        let mut stack = self.lock_stack();
        if stack.entries.len() <= 1 {
            return false;
        }

        if let Some(popped) = stack.entries.pop() {
            debug!(screen = %popped.screen, "back");
            popped.token.cancel();
        }
        true
    }
}

impl std::fmt::Debug for NavigationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationGate")
            .field("mounted", &self.mounted())
            .field("stack", &self.stack())
            .finish()
    }
}
