//! Bidirectional mapping between steps and location paths.
//!
//! The route table replaces ad-hoc path string matching with an explicit
//! table validated once at startup: every step must have exactly one path
//! and no two steps may share a path.

use super::step::Step;
use thiserror::Error;

/// Path the application starts on when nothing more specific is given.
pub const ROOT_PATH: &str = "/";

/// Errors found while validating a route table.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RouteError {
    #[error("Step '{0}' has no route")]
    MissingStep(Step),

    #[error("Step '{0}' is routed more than once")]
    DuplicateStep(Step),

    #[error("Path '{path}' is used by both '{first}' and '{second}'")]
    DuplicatePath {
        path: String,
        first: Step,
        second: Step,
    },

    #[error("Path '{0}' must start with '/' and name a segment")]
    InvalidPath(String),

    #[error("Path '{path}' of '{step}' resolves to '{resolved}'")]
    Ambiguous {
        path: String,
        step: Step,
        resolved: Step,
    },
}

/// Validated step to path table.
///
/// # Example
///
/// ```rust
/// use chatform::core::{RouteTable, Step};
///
/// let routes = RouteTable::standard();
///
/// assert_eq!(routes.path_for(Step::Phone), "/phone");
/// assert_eq!(routes.step_for_path("/app/moved"), Step::Moved);
/// assert_eq!(routes.step_for_path("/unknown"), Step::Email);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RouteTable {
    routes: Vec<(Step, String)>,
}

impl RouteTable {
    /// Validate `routes` and build the table.
    pub fn new<P: Into<String>>(routes: Vec<(Step, P)>) -> Result<Self, RouteError> {
        let mut table: Vec<(Step, String)> = Vec::with_capacity(routes.len());

        for (step, path) in routes {
            let path = path.into();
            if !path.starts_with('/') || path.len() < 2 {
                return Err(RouteError::InvalidPath(path));
            }
            if table.iter().any(|(existing, _)| *existing == step) {
                return Err(RouteError::DuplicateStep(step));
            }
            if let Some((first, _)) = table.iter().find(|(_, existing)| *existing == path) {
                return Err(RouteError::DuplicatePath {
                    path,
                    first: *first,
                    second: step,
                });
            }
            table.push((step, path));
        }

        if let Some(missing) = Step::ALL
            .into_iter()
            .find(|step| !table.iter().any(|(routed, _)| routed == step))
        {
            return Err(RouteError::MissingStep(missing));
        }

        table.sort_by_key(|(step, _)| *step);
        let table = Self { routes: table };

        // Lookup is by substring, so a path may be captured by another route.
        for (step, path) in table.iter() {
            let resolved = table.step_for_path(path);
            if resolved != step {
                return Err(RouteError::Ambiguous {
                    path: path.to_string(),
                    step,
                    resolved,
                });
            }
        }
        Ok(table)
    }

    /// The stock table: `/email`, `/phone`, `/moved`.
    pub fn standard() -> Self {
        Self {
            routes: vec![
                (Step::Email, "/email".to_string()),
                (Step::Phone, "/phone".to_string()),
                (Step::Moved, "/moved".to_string()),
            ],
        }
    }

    pub fn path_for(&self, step: Step) -> &str {
        self.routes
            .iter()
            .find(|(routed, _)| *routed == step)
            .map(|(_, path)| path.as_str())
            .unwrap_or(ROOT_PATH)
    }

    /// Map a location back to a step.
    ///
    /// A path matches when it contains a route's path. Later steps are
    /// tried first, and unmatched paths fall back to the first step.
    pub fn step_for_path(&self, path: &str) -> Step {
        self.routes
            .iter()
            .rev()
            .find(|(_, route)| path.contains(route.as_str()))
            .map(|(step, _)| *step)
            .unwrap_or(Step::FIRST)
    }

    /// Path that replaces the root location on startup.
    pub fn initial_path(&self) -> &str {
        self.path_for(Step::FIRST)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Step, &str)> {
        self.routes.iter().map(|(step, path)| (*step, path.as_str()))
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}
