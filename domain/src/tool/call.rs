//! Tool call: an immutable `(name, arguments)` request to invoke a tool
//!
//! Every mutator borrows the call and returns a new one; the original is never
//! touched. Arguments live behind an `Arc<[String]>` so copies are cheap and
//! re-setting an identical argument list hands back the very same allocation.
//!
//! Tweaks are plain functions `ToolCall -> ToolCall`. They can be applied to a
//! call directly, at an argument position, or only to the call occupying a
//! given index of a batch (see [`apply_positional_tweaks`]).

use std::fmt;
use std::sync::Arc;

use crate::core::error::DomainError;

/// Function that derives a new call from an existing one
pub type Tweak = Arc<dyn Fn(ToolCall) -> ToolCall + Send + Sync>;

/// Wrap a closure into a [`Tweak`]
pub fn tweak<F>(f: F) -> Tweak
where
    F: Fn(ToolCall) -> ToolCall + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A request to run the tool `name` with an ordered list of arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToolCall {
    name: String,
    arguments: Arc<[String]>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::<String>::new().into(),
        }
    }

    /// Create a call from raw argument strings (no validation)
    pub fn of<I, S>(name: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            arguments: arguments
                .into_iter()
                .map(Into::into)
                .collect::<Vec<String>>()
                .into(),
        }
    }

    /// Parse a `tool-name [tool-args...]` line, splitting on whitespace
    pub fn parse_line(line: &str) -> Result<Self, DomainError> {
        let mut parts = line.split_whitespace();
        let name = parts
            .next()
            .ok_or_else(|| DomainError::InvalidArgument(format!("No tool name in: {:?}", line)))?;
        Ok(Self::of(name, parts))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Whether both calls share the same argument allocation
    pub fn shares_arguments_with(&self, other: &ToolCall) -> bool {
        Arc::ptr_eq(&self.arguments, &other.arguments)
    }

    /// Replace the argument list
    ///
    /// An identical list (same allocation or equal contents) returns a copy of
    /// this call that keeps the existing allocation.
    pub fn with_arguments(&self, arguments: impl Into<Arc<[String]>>) -> Self {
        let arguments = arguments.into();
        if Arc::ptr_eq(&self.arguments, &arguments) || *self.arguments == *arguments {
            return self.clone();
        }
        Self {
            name: self.name.clone(),
            arguments,
        }
    }

    /// Append a single argument; blank strings are rejected
    pub fn with(&self, argument: impl Into<String>) -> Result<Self, DomainError> {
        let argument = self.checked(argument.into())?;
        Ok(self.appended([argument]))
    }

    /// Append an option followed by one or more values
    pub fn with_option<I, S>(&self, option: impl Into<String>, values: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let option = self.checked(option.into())?;
        let values = values
            .into_iter()
            .map(|value| self.checked(value.into()))
            .collect::<Result<Vec<_>, _>>()?;
        if values.is_empty() {
            return Err(DomainError::InvalidArgument(format!(
                "Option `{}` of tool `{}` needs at least one value",
                option, self.name
            )));
        }
        Ok(self.appended(std::iter::once(option).chain(values)))
    }

    /// Append the expansion of every element produced by `mapper`
    pub fn with_all<I, T, F, R>(&self, items: I, mut mapper: F) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(T) -> R,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        let mut expanded = Vec::new();
        for item in items {
            for argument in mapper(item) {
                expanded.push(self.checked(argument.into())?);
            }
        }
        if expanded.is_empty() {
            return Ok(self.clone());
        }
        Ok(self.appended(expanded))
    }

    /// Apply `then` only when `condition` holds
    pub fn when<F>(&self, condition: bool, then: F) -> Result<Self, DomainError>
    where
        F: FnOnce(&Self) -> Result<Self, DomainError>,
    {
        if condition { then(self) } else { Ok(self.clone()) }
    }

    pub fn with_tweak(&self, tweak: &Tweak) -> Self {
        tweak(self.clone())
    }

    /// Apply `tweak` to the call truncated at `position`, then re-append the rest
    ///
    /// This injects whatever the tweak adds at that argument position.
    pub fn with_tweak_at(&self, position: usize, tweak: &Tweak) -> Self {
        let position = position.min(self.arguments.len());
        let head = Self {
            name: self.name.clone(),
            arguments: self.arguments[..position].to_vec().into(),
        };
        tweak(head).appended(self.arguments[position..].iter().cloned())
    }

    pub fn with_tweaks(&self, tweaks: &[Tweak]) -> Self {
        tweaks
            .iter()
            .fold(self.clone(), |call, tweak| tweak(call))
    }

    /// Render name and arguments joined by `separator`
    pub fn to_command_line(&self, separator: &str) -> String {
        if self.arguments.is_empty() {
            return self.name.clone();
        }
        let mut line = self.name.clone();
        for argument in self.arguments.iter() {
            line.push_str(separator);
            line.push_str(argument);
        }
        line
    }

    fn checked(&self, argument: String) -> Result<String, DomainError> {
        if argument.trim().is_empty() {
            return Err(DomainError::InvalidArgument(format!(
                "Blank argument for tool `{}`",
                self.name
            )));
        }
        Ok(argument)
    }

    fn appended(&self, extra: impl IntoIterator<Item = String>) -> Self {
        let mut arguments = self.arguments.to_vec();
        arguments.extend(extra);
        Self {
            name: self.name.clone(),
            arguments: arguments.into(),
        }
    }
}

impl fmt::Display for ToolCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_command_line(" "))
    }
}

/// A tweak bound to one position of a batch of calls
#[derive(Clone)]
pub struct PositionalTweak {
    pub index: usize,
    pub tweak: Tweak,
}

impl PositionalTweak {
    pub fn new(index: usize, tweak: Tweak) -> Self {
        Self { index, tweak }
    }
}

impl fmt::Debug for PositionalTweak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionalTweak")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

/// Apply each tweak only to the call sitting at its index in `calls`
pub fn apply_positional_tweaks(calls: Vec<ToolCall>, tweaks: &[PositionalTweak]) -> Vec<ToolCall> {
    calls
        .into_iter()
        .enumerate()
        .map(|(index, call)| {
            tweaks
                .iter()
                .filter(|t| t.index == index)
                .fold(call, |call, t| (t.tweak)(call))
        })
        .collect()
}
