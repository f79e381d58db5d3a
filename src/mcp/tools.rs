//! MCP tool definitions.

use serde::Serialize;
use serde_json::json;

#[derive(Debug, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

const GLOBAL_KEYS: [&str; 6] = ["daemon", "ssl", "use", "web", "protocol", "server"];

/// Get all available MCP tools.
pub fn get_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "ddclient_show".to_string(),
            description: "Show the loaded ddclient configuration: global settings and domain entries. Set raw=true for the file text instead.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "raw": {
                        "type": "boolean",
                        "description": "Return the serialized ddclient.conf text",
                        "default": false
                    }
                },
                "required": []
            }),
        },
        ToolDefinition {
            name: "ddclient_set_global".to_string(),
            description: "Set a global setting. Omit value (or pass an empty string) to remove the key.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "key": {
                        "type": "string",
                        "description": "Global setting name",
                        "enum": GLOBAL_KEYS
                    },
                    "value": {
                        "type": "string",
                        "description": "New value"
                    }
                },
                "required": ["key"]
            }),
        },
        ToolDefinition {
            name: "ddclient_add_domain".to_string(),
            description: "Append a domain entry. The name should contain \"Domain\" so the block is recognized when the file is read back.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Domain display name, e.g. \"Home Domain\"" },
                    "login": { "type": "string", "default": "" },
                    "password": { "type": "string", "default": "" },
                    "hosts": { "type": "string", "description": "Comma-separated host names", "default": "" }
                },
                "required": ["name"]
            }),
        },
        ToolDefinition {
            name: "ddclient_update_domain".to_string(),
            description: "Edit the first domain entry with the given name. Fields that are omitted keep their value.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Current domain name" },
                    "new_name": { "type": "string" },
                    "login": { "type": "string" },
                    "password": { "type": "string" },
                    "hosts": { "type": "string", "description": "Comma-separated host names" }
                },
                "required": ["name"]
            }),
        },
        ToolDefinition {
            name: "ddclient_remove_domain".to_string(),
            description: "Remove the first domain entry with the given name.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Domain name to remove" }
                },
                "required": ["name"]
            }),
        },
        ToolDefinition {
            name: "ddclient_save".to_string(),
            description: "Write the configuration to disk, to the file it was loaded from or to the given path.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": { "type": "string", "description": "Destination path (export)" }
                },
                "required": []
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GlobalKey;

    #[test]
    fn test_tool_names_are_unique() {
        let tools = get_tools();
        let mut names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), tools.len());
    }

    #[test]
    fn test_key_enum_matches_model() {
        let model: Vec<_> = GlobalKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(model, GLOBAL_KEYS);
    }
}
