//! Writes a [`Configuration`] back to ddclient.conf text.

use crate::config::Configuration;

/// Render the configuration.
///
/// Present globals come first in fixed key order, then a blank line, then
/// one block per domain followed by its own blank line. Every line is
/// right-trimmed and ends with `\n`.
pub fn serialize(config: &Configuration) -> String {
    let mut lines: Vec<String> = config
        .globals
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();

    lines.push(String::new());

    for domain in &config.domains {
        lines.push(format!("# {}", domain.name));
        lines.push(format!("login={}", domain.login));
        lines.push(format!("password={}", domain.password));
        lines.push(domain.host_list());
        lines.push(String::new());
    }

    let mut out = String::new();
    for line in &lines {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
