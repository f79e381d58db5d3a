//! Lenient line parser for ddclient.conf.
//!
//! The file has no formal grammar. Lines are classified one at a time:
//!
//! - `# ... Domain ...` comments open a new domain block,
//! - inside a block, `login=`, `password=` and comma-separated host lists
//!   fill the current domain,
//! - before the first block, `key=value` lines set recognized globals.
//!
//! Everything else is skipped. Parsing text never fails.

use crate::config::{Configuration, DomainEntry, GlobalKey};

const COMMENT: char = '#';
const MARKER: &str = "Domain";
const LOGIN_PREFIX: &str = "login=";
const PASSWORD_PREFIX: &str = "password=";

/// Where the parser is in the file. The transition to `InDomain` is one-way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserState {
    /// Before the first domain marker.
    Globals,
    /// Inside a domain block; holds the domain being built.
    InDomain(DomainEntry),
}

/// Incremental parser. Feed trimmed or untrimmed lines, then call
/// [`finish`](Self::finish).
#[derive(Debug)]
pub struct Parser {
    state: ParserState,
    config: Configuration,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            state: ParserState::Globals,
            config: Configuration::default(),
        }
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Domains completed so far (the one under construction is not included).
    pub fn completed(&self) -> &[DomainEntry] {
        &self.config.domains
    }

    /// Classify and apply one line.
    pub fn feed_line(&mut self, raw: &str) {
        let line = raw.trim();
        if line.is_empty() {
            return;
        }

        if is_domain_marker(line) {
            self.flush();
            self.state = ParserState::InDomain(DomainEntry {
                name: marker_name(line).to_string(),
                ..DomainEntry::default()
            });
            return;
        }

        match &mut self.state {
            ParserState::InDomain(domain) => apply_domain_line(domain, line),
            ParserState::Globals => apply_global_line(&mut self.config, line),
        }
    }

    /// Move the domain under construction, if any, into the configuration.
    /// Only called right before a new block opens or at end of input.
    fn flush(&mut self) {
        if let ParserState::InDomain(domain) =
            std::mem::replace(&mut self.state, ParserState::Globals)
        {
            tracing::trace!(domain = %domain.name, hosts = domain.hosts.len(), "Finished domain block");
            self.config.domains.push(domain);
        }
    }

    /// Flush the open block and return the result.
    pub fn finish(mut self) -> Configuration {
        self.flush();
        self.config
    }
}

/// Parse ddclient.conf text.
///
/// Unknown keys, unknown in-block lines and stray text are ignored, so the
/// result may be empty or partially filled but is always a configuration.
pub fn parse(text: &str) -> Configuration {
    let mut parser = Parser::new();
    for line in text.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}

/// A trimmed comment line containing `Domain` (case-sensitive) anywhere.
pub fn is_domain_marker(line: &str) -> bool {
    line.starts_with(COMMENT) && line.contains(MARKER)
}

/// Name carried by a marker line: leading `#`s and whitespace removed.
pub fn marker_name(line: &str) -> &str {
    line.trim().trim_start_matches(COMMENT).trim()
}

fn apply_domain_line(domain: &mut DomainEntry, line: &str) {
    if line.starts_with(LOGIN_PREFIX) {
        domain.login = value_after_eq(line).to_string();
    } else if line.starts_with(PASSWORD_PREFIX) {
        domain.password = value_after_eq(line).to_string();
    } else if line.contains(',') {
        // Additive: a second host line extends rather than replaces.
        domain
            .hosts
            .extend(line.split(',').map(|h| h.trim().to_string()));
    } else {
        tracing::trace!(line, "Ignoring unrecognized line in domain block");
    }
}

fn apply_global_line(config: &mut Configuration, line: &str) {
    let Some((key, value)) = line.split_once('=') else {
        return;
    };

    match key.trim().parse::<GlobalKey>() {
        Ok(key) => config.globals.set(key, Some(value.trim().to_string())),
        Err(_) => tracing::debug!(key = key.trim(), "Dropping unrecognized global setting"),
    }
}

fn value_after_eq(line: &str) -> &str {
    line.split_once('=').map(|(_, v)| v.trim()).unwrap_or("")
}
