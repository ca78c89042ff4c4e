//! Meta command registry.
//!
//! Holds structured metadata for every backslash meta command, enabling the
//! sectioned help listing, alias resolution, and tab completion. A registry
//! is built once (built-in commands plus any configured ones) and then only
//! read.

use std::collections::{HashMap, HashSet};
use std::io::Write;

use crate::command::MetaCommand;
use crate::error::{ListingError, RegistryError};
use crate::listing;
use crate::section::Section;

/// Maximum edit distance for "did you mean" suggestions.
const MAX_SUGGEST_DISTANCE: usize = 3;

/// Registry holding all meta commands in registration order.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<MetaCommand>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Create a registry pre-populated with the built-in commands.
    pub fn with_defaults() -> Self {
        Self {
            commands: builtin_commands(),
        }
    }

    /// Register a single command.
    ///
    /// Fails if the name or an alias is empty after trimming, if an alias key
    /// is repeated within `cmd`,
    /// or if the name or any alias is already taken by another command.
    pub fn register(&mut self, cmd: MetaCommand) -> Result<(), RegistryError> {
        if cmd.name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }

        // Alias keys that trim to the command's own name are usage variants
        // (`"c "` next to `"c"`), so only raw keys must be unique within a
        // command.
        let mut keys = HashSet::new();
        for alias in &cmd.aliases {
            if alias.name().is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if !keys.insert(alias.key.as_str()) {
                return Err(RegistryError::Duplicate {
                    name: alias.key.clone(),
                    existing: cmd.name.clone(),
                });
            }
        }

        let taken: HashMap<&str, &str> = self
            .commands
            .iter()
            .flat_map(|existing| existing.names().map(move |name| (name, existing.name.as_str())))
            .collect();
        if let Some((name, owner)) = cmd
            .names()
            .find_map(|name| taken.get(name).map(|owner| (name, *owner)))
        {
            return Err(RegistryError::Duplicate {
                name: name.to_string(),
                existing: owner.to_string(),
            });
        }

        tracing::trace!(name = %cmd.name, section = %cmd.section, "Registered meta command");
        self.commands.push(cmd);
        Ok(())
    }

    /// Commands in `section`, in registration order.
    pub fn commands_in(&self, section: Section) -> impl Iterator<Item = &MetaCommand> {
        self.commands.iter().filter(move |cmd| cmd.section == section)
    }

    /// Resolve a command by name or alias. The leading backslash is optional.
    pub fn lookup(&self, input: &str) -> Option<&MetaCommand> {
        let wanted = strip_marker(input);
        self.commands
            .iter()
            .find(|cmd| cmd.names().any(|name| name == wanted))
    }

    /// Return `\name` completions for every name or alias starting with
    /// `prefix`. The leading backslash is optional.
    pub fn completions(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.trim_start();
        let prefix = prefix.strip_prefix('\\').unwrap_or(prefix);
        let mut results: Vec<String> = self
            .commands
            .iter()
            .flat_map(|cmd| cmd.names())
            .filter(|name| name.starts_with(prefix))
            .map(|name| format!("\\{name}"))
            .collect();
        results.sort();
        results.dedup();
        results
    }

    /// Return all registered commands.
    pub fn all(&self) -> &[MetaCommand] {
        &self.commands
    }

    /// Return the number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Suggest the closest command name or alias for an unknown input.
    pub fn suggest(&self, input: &str) -> Option<&str> {
        let wanted = strip_marker(input);
        let mut best: Option<(&str, usize)> = None;

        for name in self.commands.iter().flat_map(|cmd| cmd.names()) {
            let dist = edit_distance(wanted, name);
            if dist <= MAX_SUGGEST_DISTANCE && best.is_none_or(|(_, d)| dist < d) {
                best = Some((name, dist));
            }
        }

        best.map(|(name, _)| name)
    }

    /// Write the sectioned help listing to `w`.
    pub fn listing<W: Write + ?Sized>(&self, w: &mut W) -> Result<(), ListingError> {
        listing::write_listing(self, w)
    }

    /// Render the sectioned help listing into a string.
    pub fn listing_string(&self) -> String {
        listing::render(self)
    }
}

fn strip_marker(input: &str) -> &str {
    let input = input.trim();
    input.strip_prefix('\\').unwrap_or(input).trim()
}

/// Simple Levenshtein edit distance for command suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();
    let b_len = b_bytes.len();

    let mut prev = (0..=b_len).collect::<Vec<_>>();
    let mut curr = vec![0; b_len + 1];

    for (i, &ca) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_bytes.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// The built-in meta commands of the interactive shell.
fn builtin_commands() -> Vec<MetaCommand> {
    use Section::*;

    vec![
        // General
        MetaCommand::new("q", General, "quit", "").with_alias("quit", "", ""),
        MetaCommand::new("copyright", General, "show usage and distribution terms", ""),
        MetaCommand::new("drivers", General, "show database drivers available", ""),
        // Query Execute
        MetaCommand::new(
            "g",
            QueryExecute,
            "execute query (and send results to file or |pipe)",
            "[(OPTIONS)] [FILE] or ;",
        )
        .with_alias("go", "", "")
        .with_alias(
            "G",
            "as \\g, but forces vertical output mode",
            "[(OPTIONS)] [FILE]",
        )
        .with_alias(
            "gx",
            "as \\g, but forces expanded output mode",
            "[(OPTIONS)] [FILE]",
        )
        .with_alias(
            "gexec",
            "execute query and execute each value of the result",
            "",
        )
        .with_alias(
            "gset",
            "execute query and store results in variables",
            "[PREFIX]",
        ),
        MetaCommand::new(
            "crosstabview",
            QueryExecute,
            "execute query and display results in crosstab",
            "[(OPTIONS)] [COLUMNS]",
        ),
        MetaCommand::new(
            "watch",
            QueryExecute,
            "execute query every specified interval",
            "[(OPTIONS)] [DURATION]",
        ),
        // Query Buffer
        MetaCommand::new(
            "e",
            QueryBuffer,
            "edit the query buffer (or file) with external editor",
            "[FILE] [LINE]",
        )
        .with_alias("edit", "", ""),
        MetaCommand::new("p", QueryBuffer, "show the contents of the query buffer", "")
            .with_alias("print", "", "")
            .with_alias(
                "raw",
                "show the raw (non-interpolated) contents of the query buffer",
                "",
            ),
        MetaCommand::new("r", QueryBuffer, "reset (clear) the query buffer", "")
            .with_alias("reset", "", ""),
        MetaCommand::new("w", QueryBuffer, "write query buffer to file", "FILE")
            .with_alias("write", "", ""),
        // Help
        MetaCommand::new("?", Help, "show help on backslash commands", "[commands]")
            .with_alias("? options", "show help on command-line options", "")
            .with_alias("? variables", "show help on special variables", ""),
        // Input/Output
        MetaCommand::new(
            "copy",
            InputOutput,
            "copy query from source url to table on destination url",
            "SRC DST QUERY TABLE",
        )
        .with_alias(
            "copy ",
            "copy query from source url to columns of table on destination url",
            "SRC DST QUERY TABLE(A,...)",
        ),
        MetaCommand::new(
            "echo",
            InputOutput,
            "write string to standard output (-n for no newline)",
            "[-n] [STRING]",
        )
        .with_alias(
            "qecho",
            "write string to \\o output stream (-n for no newline)",
            "[-n] [STRING]",
        )
        .with_alias(
            "warn",
            "write string to standard error (-n for no newline)",
            "[-n] [STRING]",
        ),
        MetaCommand::new("o", InputOutput, "send all query results to file or |pipe", "[FILE]")
            .with_alias("out", "", ""),
        MetaCommand::new("i", InputOutput, "execute commands from file", "FILE")
            .with_alias("include", "", "")
            .with_alias("ir", "as \\i, but relative to location of current script", "FILE")
            .with_alias("include_relative", "", ""),
        // Informational
        MetaCommand::new(
            "d[S+]",
            Informational,
            "list tables, views, and sequences or describe table, view, sequence, or index",
            "[NAME]",
        )
        .with_alias("da[S+]", "list aggregates", "[PATTERN]")
        .with_alias("df[S+]", "list functions", "[PATTERN]")
        .with_alias("di[S+]", "list indexes", "[PATTERN]")
        .with_alias("dm[S+]", "list materialized views", "[PATTERN]")
        .with_alias("dn[S+]", "list schemas", "[PATTERN]")
        .with_alias("ds[S+]", "list sequences", "[PATTERN]")
        .with_alias("dt[S+]", "list tables", "[PATTERN]")
        .with_alias("dv[S+]", "list views", "[PATTERN]")
        .with_alias("l[+]", "list databases", ""),
        MetaCommand::new("ss[+]", Informational, "show stats for a table or a query", "[TABLE|QUERY] [k]"),
        // Formatting
        MetaCommand::new("pset", Formatting, "set table output option", "[NAME [VALUE]]")
            .with_alias(
                "a",
                "toggle between unaligned and aligned output mode",
                "",
            )
            .with_alias("C", "set table title, or unset if none", "[STRING]")
            .with_alias(
                "f",
                "show or set field separator for unaligned query output",
                "[STRING]",
            )
            .with_alias("H", "toggle HTML output mode", "")
            .with_alias(
                "T",
                "set HTML <table> tag attributes, or unset if none",
                "[STRING]",
            )
            .with_alias("t", "show only rows", "[on|off]")
            .with_alias("x", "toggle expanded output", "[on|off|auto]"),
        // Transaction
        MetaCommand::new("begin", Transaction, "begin a transaction", "").with_alias(
            "begin ",
            "begin a transaction with isolation level",
            "[-read-only] [ISOLATION]",
        ),
        MetaCommand::new("commit", Transaction, "commit current transaction", ""),
        MetaCommand::new(
            "rollback",
            Transaction,
            "rollback (abort) current transaction",
            "",
        )
        .with_alias("abort", "", ""),
        // Connection
        MetaCommand::new("c", Connection, "connect to database url", "DSN")
            .with_alias(
                "c ",
                "connect to database with driver and parameters",
                "DRIVER PARAMS...",
            )
            .with_alias("connect", "", ""),
        MetaCommand::new("Z", Connection, "close database connection", "")
            .with_alias("disconnect", "", ""),
        MetaCommand::new(
            "password",
            Connection,
            "change the password for a user",
            "[USERNAME]",
        )
        .with_alias("passwd", "", ""),
        MetaCommand::new(
            "conninfo",
            Connection,
            "display information about the current database connection",
            "",
        ),
        // Operating System
        MetaCommand::new("cd", OperatingSystem, "change the current working directory", "[DIR]"),
        MetaCommand::new(
            "setenv",
            OperatingSystem,
            "set or unset environment variable",
            "NAME [VALUE]",
        ),
        MetaCommand::new(
            "!",
            OperatingSystem,
            "execute command in shell or start interactive shell",
            "[COMMAND]",
        ),
        MetaCommand::new("timing", OperatingSystem, "toggle timing of commands", "[on|off]"),
        // Variables
        MetaCommand::new(
            "prompt",
            Variables,
            "prompt user to set variable",
            "[-TYPE] VAR [PROMPT]",
        ),
        MetaCommand::new(
            "set",
            Variables,
            "set internal variable, or list all if no parameters",
            "[NAME [VALUE]]",
        ),
        MetaCommand::new("unset", Variables, "unset (delete) internal variable", "NAME"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_new_is_empty() {
        let registry = CommandRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_with_defaults_populates() {
        let registry = CommandRegistry::with_defaults();
        assert!(!registry.is_empty());
        assert!(registry.len() >= 30, "Expected at least 30 built-in commands");
    }

    #[test]
    fn test_all_sections_have_commands() {
        let registry = CommandRegistry::with_defaults();
        for section in Section::all() {
            let count = registry.commands_in(*section).count();
            assert!(count > 0, "Section {} has no commands", section.label());
        }
    }

    #[test]
    fn test_builtins_register_cleanly() {
        // Re-registering every built-in through `register` proves that
        // names and aliases are unique across the built-in set.
        let mut registry = CommandRegistry::new();
        for cmd in builtin_commands() {
            let name = cmd.name.clone();
            registry
                .register(cmd)
                .unwrap_or_else(|e| panic!("built-in \\{name} rejected: {e}"));
        }
        assert_eq!(registry.len(), CommandRegistry::with_defaults().len());
    }

    #[test]
    fn test_lookup_by_name() {
        let registry = CommandRegistry::with_defaults();
        let cmd = registry.lookup("conninfo").unwrap();
        assert_eq!(cmd.section, Section::Connection);
    }

    #[test]
    fn test_lookup_with_marker_and_whitespace() {
        let registry = CommandRegistry::with_defaults();
        assert_eq!(registry.lookup("\\q").unwrap().name, "q");
        assert_eq!(registry.lookup("  \\set ").unwrap().name, "set");
    }

    #[test]
    fn test_lookup_by_alias() {
        let registry = CommandRegistry::with_defaults();
        assert_eq!(registry.lookup("gx").unwrap().name, "g");
        assert_eq!(registry.lookup("\\quit").unwrap().name, "q");
        assert_eq!(registry.lookup("? options").unwrap().name, "?");
    }

    #[test]
    fn test_lookup_unknown_returns_none() {
        let registry = CommandRegistry::with_defaults();
        assert!(registry.lookup("\\nonexistent").is_none());
        assert!(registry.lookup("").is_none());
    }

    #[test]
    fn test_register_rejects_duplicate_name() {
        let mut registry = CommandRegistry::with_defaults();
        let err = registry
            .register(MetaCommand::new("set", Section::General, "again", ""))
            .unwrap_err();
        assert!(
            matches!(&err, RegistryError::Duplicate { name, existing } if name == "set" && existing == "set")
        );
    }

    #[test]
    fn test_register_rejects_alias_colliding_with_existing() {
        let mut registry = CommandRegistry::with_defaults();
        let err = registry
            .register(
                MetaCommand::new("leave", Section::General, "leave", "").with_alias(" quit ", "", ""),
            )
            .unwrap_err();
        assert!(
            matches!(&err, RegistryError::Duplicate { name, existing } if name == "quit" && existing == "q")
        );
        assert!(registry.lookup("leave").is_none());
    }

    #[test]
    fn test_register_rejects_empty_name() {
        let mut registry = CommandRegistry::new();
        let err = registry
            .register(MetaCommand::new("  ", Section::General, "blank", ""))
            .unwrap_err();
        assert!(matches!(err, RegistryError::EmptyName));
    }

    #[test]
    fn test_register_rejects_blank_alias() {
        let mut registry = CommandRegistry::new();
        let err = registry
            .register(MetaCommand::new("cmd", Section::General, "", "").with_alias("   ", "blank alias", ""))
            .unwrap_err();
        assert!(matches!(err, RegistryError::EmptyName));
        assert!(registry.is_empty());
        assert!(registry.lookup("\\").is_none());
    }

    #[test]
    fn test_register_allows_usage_variant_of_own_name() {
        let mut registry = CommandRegistry::new();
        registry
            .register(
                MetaCommand::new("x", Section::General, "one form", "A")
                    .with_alias("x ", "another form", "A B"),
            )
            .unwrap();
        assert_eq!(registry.lookup("x").unwrap().aliases.len(), 1);
    }

    #[test]
    fn test_register_rejects_repeated_alias_key() {
        let mut registry = CommandRegistry::new();
        let err = registry
            .register(
                MetaCommand::new("x", Section::General, "", "")
                    .with_alias("y", "first", "")
                    .with_alias("y", "second", ""),
            )
            .unwrap_err();
        assert!(matches!(&err, RegistryError::Duplicate { name, existing } if name == "y" && existing == "x"));
    }

    #[test]
    fn test_builtin_usage_variants_listed() {
        let registry = CommandRegistry::with_defaults();
        let listing = registry.listing_string();
        assert!(listing.contains("  \\c DSN "));
        assert!(listing.contains("  \\c DRIVER PARAMS... "));
        assert!(listing.contains("  \\begin [-read-only] [ISOLATION] "));
    }

    #[test]
    fn test_commands_in_keeps_registration_order() {
        let mut registry = CommandRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry
                .register(MetaCommand::new(name, Section::Variables, "", ""))
                .unwrap();
        }
        registry
            .register(MetaCommand::new("other", Section::General, "", ""))
            .unwrap();
        let names: Vec<_> = registry
            .commands_in(Section::Variables)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_completions_prefix_g() {
        let registry = CommandRegistry::with_defaults();
        let completions = registry.completions("\\g");
        for expected in ["\\g", "\\gexec", "\\gset", "\\gx", "\\go"] {
            assert!(
                completions.iter().any(|c| c == expected),
                "Missing {} in completions: {:?}",
                expected,
                completions
            );
        }
        assert!(!completions.iter().any(|c| c == "\\G"));
    }

    #[test]
    fn test_completions_marker_only() {
        let registry = CommandRegistry::with_defaults();
        let completions = registry.completions("\\");
        let unique: HashSet<&str> = registry
            .all()
            .iter()
            .flat_map(|cmd| cmd.names())
            .collect();
        assert_eq!(completions.len(), unique.len());
        let mut sorted = completions.clone();
        sorted.sort();
        assert_eq!(completions, sorted);
    }

    #[test]
    fn test_suggest_close_match() {
        let registry = CommandRegistry::with_defaults();
        assert_eq!(registry.suggest("\\conninf"), Some("conninfo"));
        assert_eq!(registry.suggest("comit"), Some("commit"));
    }

    #[test]
    fn test_suggest_no_match() {
        let registry = CommandRegistry::with_defaults();
        assert!(registry.suggest("\\xyzabcdefgh").is_none());
    }

    #[test]
    fn test_edit_distance_identical() {
        assert_eq!(edit_distance("hello", "hello"), 0);
    }

    #[test]
    fn test_edit_distance_one_char() {
        assert_eq!(edit_distance("commit", "comit"), 1);
    }

    #[test]
    fn test_edit_distance_different() {
        assert_eq!(edit_distance("abc", "xyz"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
    }

    #[test]
    fn test_listing_string_contains_all_sections() {
        let registry = CommandRegistry::with_defaults();
        let listing = registry.listing_string();
        for section in Section::all() {
            assert!(
                listing.lines().any(|line| line == section.label()),
                "Listing missing section heading: {}",
                section.label()
            );
        }
    }

    #[test]
    fn test_listing_hides_silent_aliases() {
        let registry = CommandRegistry::with_defaults();
        let listing = registry.listing_string();
        assert!(listing.contains("  \\q "));
        assert!(!listing.contains("\\quit"));
        assert!(!listing.contains("\\connect"));
    }
}
