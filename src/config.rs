//! Configuration model for ddclient.conf.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The global settings this crate understands.
///
/// Declaration order is the order keys are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalKey {
    Daemon,
    Ssl,
    Use,
    Web,
    Protocol,
    Server,
}

impl GlobalKey {
    /// All keys in output order.
    pub const ALL: [GlobalKey; 6] = [
        GlobalKey::Daemon,
        GlobalKey::Ssl,
        GlobalKey::Use,
        GlobalKey::Web,
        GlobalKey::Protocol,
        GlobalKey::Server,
    ];

    /// Key as written in the file.
    pub fn as_str(&self) -> &'static str {
        match self {
            GlobalKey::Daemon => "daemon",
            GlobalKey::Ssl => "ssl",
            GlobalKey::Use => "use",
            GlobalKey::Web => "web",
            GlobalKey::Protocol => "protocol",
            GlobalKey::Server => "server",
        }
    }
}

impl fmt::Display for GlobalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GlobalKey {
    type Err = ConfigError;

    /// Exact, case-sensitive match against the six key names.
    fn from_str(s: &str) -> Result<Self> {
        GlobalKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

/// Global settings preceding the domain blocks.
///
/// `None` means the key is absent and will not be written; `Some("")` is
/// written as `key=`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daemon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#use: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}

impl GlobalSettings {
    /// Get the value for a key.
    pub fn get(&self, key: GlobalKey) -> Option<&str> {
        self.slot(key).as_deref()
    }

    /// Set or clear the value for a key.
    pub fn set(&mut self, key: GlobalKey, value: Option<String>) {
        *self.slot_mut(key) = value;
    }

    /// Present keys with their values, in output order.
    pub fn iter(&self) -> impl Iterator<Item = (GlobalKey, &str)> + '_ {
        GlobalKey::ALL
            .into_iter()
            .filter_map(move |key| self.get(key).map(|value| (key, value)))
    }

    fn slot(&self, key: GlobalKey) -> &Option<String> {
        match key {
            GlobalKey::Daemon => &self.daemon,
            GlobalKey::Ssl => &self.ssl,
            GlobalKey::Use => &self.r#use,
            GlobalKey::Web => &self.web,
            GlobalKey::Protocol => &self.protocol,
            GlobalKey::Server => &self.server,
        }
    }

    fn slot_mut(&mut self, key: GlobalKey) -> &mut Option<String> {
        match key {
            GlobalKey::Daemon => &mut self.daemon,
            GlobalKey::Ssl => &mut self.ssl,
            GlobalKey::Use => &mut self.r#use,
            GlobalKey::Web => &mut self.web,
            GlobalKey::Protocol => &mut self.protocol,
            GlobalKey::Server => &mut self.server,
        }
    }
}

/// One managed DNS domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEntry {
    /// Display label, taken from the `# ...` comment that opens the block.
    pub name: String,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
    /// Host names in file order. Duplicates are kept.
    #[serde(default)]
    pub hosts: Vec<String>,
}

impl DomainEntry {
    /// Build an entry the way the editor does: fields are trimmed and the
    /// name must not be blank.
    pub fn new(
        name: impl Into<String>,
        login: impl Into<String>,
        password: impl Into<String>,
        hosts: Vec<String>,
    ) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ConfigError::EmptyDomainName);
        }

        Ok(Self {
            name,
            login: login.into().trim().to_string(),
            password: password.into().trim().to_string(),
            hosts,
        })
    }

    /// Apply `edit` on top of this entry, with the same validation as
    /// [`DomainEntry::new`].
    pub fn edited(&self, edit: DomainEdit) -> Result<Self> {
        Self::new(
            edit.name.unwrap_or_else(|| self.name.clone()),
            edit.login.unwrap_or_else(|| self.login.clone()),
            edit.password.unwrap_or_else(|| self.password.clone()),
            edit.hosts.unwrap_or_else(|| self.hosts.clone()),
        )
    }

    /// Whether the `# {name}` line written for this entry is read back as a
    /// domain marker with the same name.
    pub fn has_marker_name(&self) -> bool {
        let header = format!("# {}", self.name);
        crate::parser::is_domain_marker(&header)
            && crate::parser::marker_name(&header) == self.name
    }

    /// Hosts as shown to users: comma-space separated.
    pub fn host_list(&self) -> String {
        self.hosts.join(", ")
    }
}

/// Partial update for a [`DomainEntry`]. `None` fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainEdit {
    pub name: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub hosts: Option<Vec<String>>,
}

/// Split a user-entered host list on commas, dropping blank elements.
pub fn parse_host_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .collect()
}

/// A whole ddclient.conf: global settings plus domain blocks in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub globals: GlobalSettings,
    #[serde(default)]
    pub domains: Vec<DomainEntry>,
}

impl Configuration {
    /// Empty configuration: no globals, no domains.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global(&self, key: GlobalKey) -> Option<&str> {
        self.globals.get(key)
    }

    /// Set a global from an editor field. Blank input clears the key.
    pub fn set_global(&mut self, key: GlobalKey, value: Option<String>) {
        let value = value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        self.globals.set(key, value);
    }

    /// Append a domain at the end of the list.
    pub fn add_domain(&mut self, domain: DomainEntry) {
        self.domains.push(domain);
    }

    /// Replace the domain at `index`, keeping its position.
    pub fn update_domain(&mut self, index: usize, domain: DomainEntry) -> Result<()> {
        let len = self.domains.len();
        let slot = self
            .domains
            .get_mut(index)
            .ok_or(ConfigError::DomainIndex { index, len })?;
        *slot = domain;
        Ok(())
    }

    /// Remove and return the domain at `index`.
    pub fn remove_domain(&mut self, index: usize) -> Result<DomainEntry> {
        if index >= self.domains.len() {
            return Err(ConfigError::DomainIndex {
                index,
                len: self.domains.len(),
            });
        }
        Ok(self.domains.remove(index))
    }

    /// Index of the first domain named `name`.
    pub fn find_domain(&self, name: &str) -> Option<usize> {
        self.domains.iter().position(|d| d.name == name)
    }

    /// Like [`find_domain`](Self::find_domain), but an error when missing.
    pub fn domain_index(&self, name: &str) -> Result<usize> {
        self.find_domain(name)
            .ok_or_else(|| ConfigError::UnknownDomain(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> DomainEntry {
        DomainEntry::new(name, "user", "pw", vec!["a.example.com".to_string()]).unwrap()
    }

    #[test]
    fn test_global_key_order() {
        let names: Vec<_> = GlobalKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, ["daemon", "ssl", "use", "web", "protocol", "server"]);
    }

    #[test]
    fn test_global_key_from_str_is_exact() {
        assert_eq!("use".parse::<GlobalKey>().unwrap(), GlobalKey::Use);
        assert!("Use".parse::<GlobalKey>().is_err());
        assert!("login".parse::<GlobalKey>().is_err());
    }

    #[test]
    fn test_settings_iter_skips_absent() {
        let mut globals = GlobalSettings::default();
        globals.set(GlobalKey::Server, Some("dyn.example.com".to_string()));
        globals.set(GlobalKey::Daemon, Some(String::new()));

        let present: Vec<_> = globals.iter().collect();
        assert_eq!(
            present,
            [(GlobalKey::Daemon, ""), (GlobalKey::Server, "dyn.example.com")]
        );
    }

    #[test]
    fn test_set_global_blank_clears() {
        let mut config = Configuration::new();
        config.set_global(GlobalKey::Ssl, Some(" yes ".to_string()));
        assert_eq!(config.global(GlobalKey::Ssl), Some("yes"));

        config.set_global(GlobalKey::Ssl, Some("   ".to_string()));
        assert_eq!(config.global(GlobalKey::Ssl), None);
    }

    #[test]
    fn test_domain_requires_name() {
        assert!(matches!(
            DomainEntry::new("  ", "", "", Vec::new()),
            Err(ConfigError::EmptyDomainName)
        ));
    }

    #[test]
    fn test_marker_name() {
        assert!(entry("Home Domain").has_marker_name());
        assert!(!entry("home").has_marker_name());
        assert!(entry("#Tagged Domain").has_marker_name());

        let padded = DomainEntry {
            name: " Padded Domain".to_string(),
            ..DomainEntry::default()
        };
        assert!(!padded.has_marker_name());
    }

    #[test]
    fn test_edit_keeps_omitted_fields() {
        let current = DomainEntry::new(
            "Home Domain",
            "me",
            "old",
            vec!["a.example.com".to_string(), "b.example.com".to_string()],
        )
        .unwrap();

        let edited = current
            .edited(DomainEdit {
                password: Some(" new ".to_string()),
                ..DomainEdit::default()
            })
            .unwrap();
        assert_eq!(edited.name, "Home Domain");
        assert_eq!(edited.login, "me");
        assert_eq!(edited.password, "new");
        assert_eq!(edited.hosts, current.hosts);

        let renamed = current
            .edited(DomainEdit {
                name: Some("Work Domain".to_string()),
                hosts: Some(Vec::new()),
                ..DomainEdit::default()
            })
            .unwrap();
        assert_eq!(renamed.name, "Work Domain");
        assert_eq!(renamed.password, "old");
        assert!(renamed.hosts.is_empty());

        assert!(matches!(
            current.edited(DomainEdit {
                name: Some(" ".to_string()),
                ..DomainEdit::default()
            }),
            Err(ConfigError::EmptyDomainName)
        ));
    }

    #[test]
    fn test_parse_host_list_drops_blanks() {
        assert_eq!(
            parse_host_list(" a.example.com ,, b.example.com, "),
            ["a.example.com", "b.example.com"]
        );
        assert!(parse_host_list("").is_empty());
    }

    #[test]
    fn test_domain_editing() {
        let mut config = Configuration::new();
        config.add_domain(entry("First Domain"));
        config.add_domain(entry("Second Domain"));
        config.add_domain(entry("First Domain"));

        assert_eq!(config.find_domain("First Domain"), Some(0));
        assert_eq!(config.find_domain("Second Domain"), Some(1));

        config.update_domain(1, entry("Renamed Domain")).unwrap();
        assert_eq!(config.domains[1].name, "Renamed Domain");

        let removed = config.remove_domain(0).unwrap();
        assert_eq!(removed.name, "First Domain");
        assert_eq!(config.domains.len(), 2);
        assert_eq!(config.domains[1].name, "First Domain");

        assert!(matches!(
            config.remove_domain(5),
            Err(ConfigError::DomainIndex { index: 5, len: 2 })
        ));
        assert!(config.update_domain(2, entry("x")).is_err());
        assert!(matches!(
            config.domain_index("missing"),
            Err(ConfigError::UnknownDomain(_))
        ));
    }
}
