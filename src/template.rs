//! Command templates and the placeholders they may contain.

use crate::error::PipeError;
use std::fmt;
use std::path::Path;

/// A literal token in a template that is replaced with an artifact path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// Path of the file holding the piped stdin bytes.
    In,
    /// Path of the file the command is expected to write.
    Out,
}

impl Placeholder {
    pub const ALL: [Placeholder; 2] = [Placeholder::In, Placeholder::Out];

    pub fn token(self) -> &'static str {
        match self {
            Placeholder::In => "%in",
            Placeholder::Out => "%out",
        }
    }

    fn index(self) -> usize {
        match self {
            Placeholder::In => 0,
            Placeholder::Out => 1,
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Independent presence flags, one per [`Placeholder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaceholderSet {
    present: [bool; Placeholder::ALL.len()],
}

impl PlaceholderSet {
    pub fn contains(&self, placeholder: Placeholder) -> bool {
        self.present[placeholder.index()]
    }

    pub fn insert(&mut self, placeholder: Placeholder) {
        self.present[placeholder.index()] = true;
    }

    pub fn is_empty(&self) -> bool {
        !self.present.iter().any(|p| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = Placeholder> + '_ {
        Placeholder::ALL.into_iter().filter(|p| self.contains(*p))
    }
}

impl fmt::Display for PlaceholderSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<&str> = self.iter().map(Placeholder::token).collect();
        write!(f, "[{}]", tokens.join(", "))
    }
}

/// The raw command string supplied by the caller, prior to substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    text: String,
    placeholders: PlaceholderSet,
}

impl CommandTemplate {
    /// Joins the given words with single spaces and detects placeholders.
    ///
    /// Fails with [`PipeError::EmptyTemplate`] when nothing but whitespace remains,
    /// and with [`PipeError::NoPlaceholders`] when neither `%in` nor `%out` occurs.
    pub fn from_args<I, S>(words: I) -> Result<Self, PipeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let text = words
            .into_iter()
            .map(|word| word.as_ref().to_owned())
            .collect::<Vec<String>>()
            .join(" ");
        Self::new(text)
    }

    pub fn new(text: impl Into<String>) -> Result<Self, PipeError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(PipeError::EmptyTemplate);
        }

        let mut placeholders = PlaceholderSet::default();
        for placeholder in Placeholder::ALL {
            if text.contains(placeholder.token()) {
                placeholders.insert(placeholder);
            }
        }

        if placeholders.is_empty() {
            return Err(PipeError::NoPlaceholders);
        }

        Ok(Self { text, placeholders })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn placeholders(&self) -> PlaceholderSet {
        self.placeholders
    }

    pub fn uses(&self, placeholder: Placeholder) -> bool {
        self.placeholders.contains(placeholder)
    }

    /// Replaces every occurrence of each present placeholder with the path
    /// returned by `path_for`. Placeholders for which `path_for` yields `None`
    /// are left untouched.
    pub fn resolve<'a, F>(&self, mut path_for: F) -> String
    where
        F: FnMut(Placeholder) -> Option<&'a Path>,
    {
        // `%out` never overlaps `%in`, so replacement order does not matter.
        let mut resolved = self.text.clone();
        for placeholder in self.placeholders.iter() {
            if let Some(path) = path_for(placeholder) {
                resolved = resolved.replace(placeholder.token(), &path.to_string_lossy());
            }
        }
        resolved
    }
}
