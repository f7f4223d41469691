//! Tool finders: name → [`Tool`] resolution
//!
//! Finders are composed in a chain of responsibility. The first finder that
//! knows a name wins; an unknown name is simply absent, never an error.
//!
//! ```text
//! compose([builtin, installers, bundles, programs])
//!     find("javac") ─▶ builtin? ─▶ installers? ─▶ bundles? ─▶ programs? ─▶ None
//! ```

use std::fmt;
use std::sync::Arc;

use super::entities::Tool;

/// Maps a tool name to a runnable [`Tool`]
pub trait ToolFinder: Send + Sync {
    /// Find the tool matching `name`
    ///
    /// The default walks [`tools`](Self::tools) and returns the first match.
    fn find(&self, name: &str) -> Option<Tool> {
        self.tools().into_iter().find(|tool| tool.matches(name))
    }

    /// Every tool this finder can produce
    fn tools(&self) -> Vec<Tool>;
}

/// A fixed list of tools
#[derive(Debug, Clone, Default)]
pub struct ToolTable {
    tools: Vec<Tool>,
}

impl ToolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl FromIterator<Tool> for ToolTable {
    fn from_iter<I: IntoIterator<Item = Tool>>(iter: I) -> Self {
        Self {
            tools: iter.into_iter().collect(),
        }
    }
}

impl ToolFinder for ToolTable {
    fn find(&self, name: &str) -> Option<Tool> {
        self.tools.iter().find(|tool| tool.matches(name)).cloned()
    }

    fn tools(&self) -> Vec<Tool> {
        self.tools.clone()
    }
}

/// Ordered composition of finders
#[derive(Clone, Default)]
pub struct ChainFinder {
    finders: Vec<Arc<dyn ToolFinder>>,
}

impl ChainFinder {
    pub fn len(&self) -> usize {
        self.finders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.finders.is_empty()
    }
}

impl ToolFinder for ChainFinder {
    fn find(&self, name: &str) -> Option<Tool> {
        self.finders.iter().find_map(|finder| finder.find(name))
    }

    fn tools(&self) -> Vec<Tool> {
        self.finders.iter().flat_map(|finder| finder.tools()).collect()
    }
}

impl fmt::Debug for ChainFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainFinder")
            .field("finders", &self.finders.len())
            .finish()
    }
}

/// Compose finders so that earlier ones take precedence
pub fn compose<I>(finders: I) -> ChainFinder
where
    I: IntoIterator<Item = Arc<dyn ToolFinder>>,
{
    ChainFinder {
        finders: finders.into_iter().collect(),
    }
}
