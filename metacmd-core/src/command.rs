//! Meta command descriptors.

use serde::Serialize;

use crate::section::Section;

/// Description and parameter usage of a command or alias.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Desc {
    /// One-line description shown in the listing. May be empty.
    pub desc: String,
    /// Parameter usage, e.g. `"[FILE]"`. May be empty.
    pub params: String,
}

impl Desc {
    pub fn new(desc: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            desc: desc.into(),
            params: params.into(),
        }
    }

    /// A silent alias exists but is not advertised in the listing.
    pub fn is_silent(&self) -> bool {
        self.desc.is_empty() && self.params.is_empty()
    }

    /// Text appended after the invocation token: `" " + params`, or nothing.
    pub fn params_suffix(&self) -> String {
        if self.params.is_empty() {
            String::new()
        } else {
            format!(" {}", self.params)
        }
    }
}

/// An alternate invocation name for a meta command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alias {
    /// Raw alias key as registered; surrounding whitespace is ignored when
    /// resolving or displaying it.
    pub key: String,
    #[serde(flatten)]
    pub desc: Desc,
}

impl Alias {
    /// The alias name with surrounding whitespace removed.
    pub fn name(&self) -> &str {
        self.key.trim()
    }
}

/// A backslash meta command and its aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaCommand {
    /// Invocation name without the leading backslash, e.g. `"conninfo"`.
    pub name: String,
    pub section: Section,
    #[serde(flatten)]
    pub desc: Desc,
    /// Aliases in registration order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<Alias>,
}

impl MetaCommand {
    pub fn new(
        name: impl Into<String>,
        section: Section,
        desc: impl Into<String>,
        params: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            section,
            desc: Desc::new(desc, params),
            aliases: Vec::new(),
        }
    }

    /// Add an alias. Passing an empty description and params registers a
    /// silent alias.
    pub fn with_alias(
        mut self,
        key: impl Into<String>,
        desc: impl Into<String>,
        params: impl Into<String>,
    ) -> Self {
        self.aliases.push(Alias {
            key: key.into(),
            desc: Desc::new(desc, params),
        });
        self
    }

    /// Every name this command answers to: its own name followed by the
    /// trimmed alias names, silent ones included.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(Alias::name))
    }

    /// Aliases that appear in the listing, ordered case-insensitively.
    ///
    /// Silent aliases are dropped. Keys that compare equal ignoring case keep
    /// their registration order.
    pub fn listed_aliases(&self) -> Vec<&Alias> {
        let mut listed: Vec<&Alias> = self
            .aliases
            .iter()
            .filter(|alias| !alias.desc.is_silent())
            .collect();
        listed.sort_by_cached_key(|alias| alias.key.to_lowercase());
        listed
    }
}
