//! Collaborators the machine talks to while running effects.

use crate::snapshot::Snapshot;
use std::sync::{Arc, Mutex, PoisonError};

/// Location history the step cursor is mirrored into.
pub trait Navigator {
    /// Add a new location on top of the current one.
    fn push(&self, path: &str);

    /// Swap the current location without adding history.
    fn replace(&self, path: &str);
}

/// Receives the snapshot when the final step is submitted.
pub trait CompletionSink {
    fn complete(&self, snapshot: &Snapshot);
}

#[derive(Debug, Default)]
struct Stack {
    entries: Vec<String>,
    index: usize,
}

/// In-memory browser-style history with back/forward.
///
/// Clones share the same stack.
///
/// # Example
///
/// ```rust
/// use chatform::effects::{BrowserHistory, Navigator};
///
/// let history = BrowserHistory::new("/email");
/// history.push("/phone");
///
/// assert_eq!(history.back(), Some("/email".to_string()));
/// assert_eq!(history.forward(), Some("/phone".to_string()));
/// assert_eq!(history.forward(), None);
/// ```
#[derive(Clone, Debug)]
pub struct BrowserHistory {
    stack: Arc<Mutex<Stack>>,
}

impl BrowserHistory {
    pub fn new(initial: &str) -> Self {
        Self {
            stack: Arc::new(Mutex::new(Stack {
                entries: vec![initial.to_string()],
                index: 0,
            })),
        }
    }

    fn with_stack<T>(&self, f: impl FnOnce(&mut Stack) -> T) -> T {
        let mut stack = self.stack.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut stack)
    }

    pub fn current(&self) -> String {
        self.with_stack(|stack| stack.entries[stack.index].clone())
    }

    /// Step back one entry, returning the new location.
    pub fn back(&self) -> Option<String> {
        self.with_stack(|stack| {
            stack.index = stack.index.checked_sub(1)?;
            Some(stack.entries[stack.index].clone())
        })
    }

    /// Step forward one entry, returning the new location.
    pub fn forward(&self) -> Option<String> {
        self.with_stack(|stack| {
            if stack.index + 1 >= stack.entries.len() {
                return None;
            }
            stack.index += 1;
            Some(stack.entries[stack.index].clone())
        })
    }

    pub fn len(&self) -> usize {
        self.with_stack(|stack| stack.entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Navigator for BrowserHistory {
    fn push(&self, path: &str) {
        self.with_stack(|stack| {
            stack.entries.truncate(stack.index + 1);
            stack.entries.push(path.to_string());
            stack.index = stack.entries.len() - 1;
        });
    }

    fn replace(&self, path: &str) {
        self.with_stack(|stack| stack.entries[stack.index] = path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_discards_forward_entries() {
        let history = BrowserHistory::new("/email");
        history.push("/phone");
        history.push("/moved");
        history.back();
        history.back();
        history.push("/phone");

        assert_eq!(history.len(), 2);
        assert_eq!(history.current(), "/phone");
        assert_eq!(history.forward(), None);
    }

    #[test]
    fn replace_keeps_length() {
        let history = BrowserHistory::new("/");
        history.replace("/email");

        assert_eq!(history.len(), 1);
        assert_eq!(history.current(), "/email");
        assert_eq!(history.back(), None);
    }

    #[test]
    fn clones_share_the_stack() {
        let history = BrowserHistory::new("/email");
        let shared = history.clone();
        shared.push("/phone");

        assert_eq!(history.current(), "/phone");
    }
}
