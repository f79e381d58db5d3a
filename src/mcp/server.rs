//! MCP JSON-RPC 2.0 server over stdio.

use crate::config::{parse_host_list, Configuration, DomainEdit, DomainEntry, GlobalKey};
use crate::error::{ConfigError, Result};
use crate::serializer::serialize;
use crate::store::{ConfigStore, FileStore, SYSTEM_CONFIG_PATH};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tokio::sync::Mutex;

/// MCP Server holding one configuration for the session.
pub struct McpServer {
    config: Mutex<Configuration>,
    path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[serde(rename = "jsonrpc")]
    _jsonrpc: String,
    id: Option<serde_json::Value>,
    method: String,
    #[serde(default)]
    params: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

impl JsonRpcError {
    fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: -32602,
            message: message.into(),
            data: None,
        }
    }
}

impl From<ConfigError> for JsonRpcError {
    fn from(e: ConfigError) -> Self {
        Self {
            code: -32000,
            message: e.to_string(),
            data: None,
        }
    }
}

type ToolResult = std::result::Result<serde_json::Value, JsonRpcError>;

/// Wrap a value as MCP text content.
fn text_content(text: String) -> ToolResult {
    Ok(serde_json::json!({
        "content": [{
            "type": "text",
            "text": text
        }]
    }))
}

fn json_content(value: &impl Serialize) -> ToolResult {
    let text = serde_json::to_string_pretty(value).map_err(|e| JsonRpcError {
        code: -32603,
        message: e.to_string(),
        data: None,
    })?;
    text_content(text)
}

fn str_arg<'a>(arguments: &'a serde_json::Value, name: &str) -> Option<&'a str> {
    arguments.get(name).and_then(|v| v.as_str())
}

fn required_str<'a>(
    arguments: &'a serde_json::Value,
    name: &str,
) -> std::result::Result<&'a str, JsonRpcError> {
    str_arg(arguments, name)
        .ok_or_else(|| JsonRpcError::invalid_params(format!("Missing {}", name)))
}

impl McpServer {
    /// Create a new MCP server for `config`, saving back to `path` if known.
    pub fn new(config: Configuration, path: Option<PathBuf>) -> Self {
        Self {
            config: Mutex::new(config),
            path,
        }
    }

    /// Run the MCP server over stdio.
    pub async fn run(&self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock()).await?;
        Ok(())
    }

    /// Serve newline-delimited requests from `input` until EOF.
    pub async fn serve<R: BufRead, W: Write>(&self, input: R, mut output: W) -> io::Result<()> {
        tracing::info!("ddclient-conf MCP server started");

        for line in input.lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    tracing::warn!("Error reading stdin: {}", e);
                    continue;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => JsonRpcResponse {
                    jsonrpc: "2.0".to_string(),
                    id: None,
                    result: None,
                    error: Some(JsonRpcError {
                        code: -32700,
                        message: format!("Parse error: {}", e),
                        data: None,
                    }),
                },
            };

            writeln!(output, "{}", serde_json::to_string(&response)?)?;
            output.flush()?;
        }

        Ok(())
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::debug!(method = %request.method, "MCP request");

        let result = match request.method.as_str() {
            "initialize" => self.handle_initialize(),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(request.params).await,
            _ => Err(JsonRpcError {
                code: -32601,
                message: format!("Method not found: {}", request.method),
                data: None,
            }),
        };

        match result {
            Ok(value) => JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id: request.id,
                result: Some(value),
                error: None,
            },
            Err(error) => JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id: request.id,
                result: None,
                error: Some(error),
            },
        }
    }

    fn handle_initialize(&self) -> ToolResult {
        Ok(serde_json::json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": "ddclient-conf",
                "version": env!("CARGO_PKG_VERSION")
            }
        }))
    }

    fn handle_tools_list(&self) -> ToolResult {
        let tools = super::tools::get_tools();
        Ok(serde_json::json!({ "tools": tools }))
    }

    async fn handle_tools_call(&self, params: serde_json::Value) -> ToolResult {
        let name = params
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| JsonRpcError::invalid_params("Missing tool name"))?;

        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or(serde_json::json!({}));

        match name {
            "ddclient_show" => self.tool_show(arguments).await,
            "ddclient_set_global" => self.tool_set_global(arguments).await,
            "ddclient_add_domain" => self.tool_add_domain(arguments).await,
            "ddclient_update_domain" => self.tool_update_domain(arguments).await,
            "ddclient_remove_domain" => self.tool_remove_domain(arguments).await,
            "ddclient_save" => self.tool_save(arguments).await,
            _ => Err(JsonRpcError::invalid_params(format!("Unknown tool: {}", name))),
        }
    }

    async fn tool_show(&self, arguments: serde_json::Value) -> ToolResult {
        let raw = arguments
            .get("raw")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let config = self.config.lock().await;
        if raw {
            text_content(serialize(&config))
        } else {
            json_content(&*config)
        }
    }

    async fn tool_set_global(&self, arguments: serde_json::Value) -> ToolResult {
        let key: GlobalKey = required_str(&arguments, "key")?
            .parse()
            .map_err(|e: ConfigError| JsonRpcError::invalid_params(e.to_string()))?;
        let value = str_arg(&arguments, "value").map(str::to_string);

        let mut config = self.config.lock().await;
        config.set_global(key, value);
        json_content(&config.globals)
    }

    async fn tool_add_domain(&self, arguments: serde_json::Value) -> ToolResult {
        let domain = DomainEntry::new(
            required_str(&arguments, "name")?,
            str_arg(&arguments, "login").unwrap_or(""),
            str_arg(&arguments, "password").unwrap_or(""),
            parse_host_list(str_arg(&arguments, "hosts").unwrap_or("")),
        )?;

        if !domain.has_marker_name() {
            tracing::warn!(domain = %domain.name, "Name lacks \"Domain\"; block will not be recognized on reload");
        }

        let mut config = self.config.lock().await;
        config.add_domain(domain.clone());
        json_content(&domain)
    }

    async fn tool_update_domain(&self, arguments: serde_json::Value) -> ToolResult {
        let name = required_str(&arguments, "name")?;

        let mut config = self.config.lock().await;
        let index = config.domain_index(name)?;
        let updated = config.domains[index].edited(DomainEdit {
            name: str_arg(&arguments, "new_name").map(str::to_string),
            login: str_arg(&arguments, "login").map(str::to_string),
            password: str_arg(&arguments, "password").map(str::to_string),
            hosts: str_arg(&arguments, "hosts").map(parse_host_list),
        })?;

        config.update_domain(index, updated.clone())?;
        json_content(&updated)
    }

    async fn tool_remove_domain(&self, arguments: serde_json::Value) -> ToolResult {
        let name = required_str(&arguments, "name")?;

        let mut config = self.config.lock().await;
        let index = config.domain_index(name)?;
        let removed = config.remove_domain(index)?;
        json_content(&removed)
    }

    async fn tool_save(&self, arguments: serde_json::Value) -> ToolResult {
        let path = str_arg(&arguments, "path")
            .map(PathBuf::from)
            .or_else(|| self.path.clone())
            .unwrap_or_else(|| PathBuf::from(SYSTEM_CONFIG_PATH));

        let config = self.config.lock().await;
        FileStore.save(&config, &path)?;
        text_content(format!("Configuration saved to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use serde_json::json;

    fn server() -> McpServer {
        let config = parse("ssl=yes\n\n# Home Domain\nlogin=me\npassword=pw\na.example.com, b.example.com\n");
        McpServer::new(config, None)
    }

    fn call(name: &str, arguments: serde_json::Value) -> JsonRpcRequest {
        JsonRpcRequest {
            _jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: "tools/call".to_string(),
            params: json!({ "name": name, "arguments": arguments }),
        }
    }

    fn text_of(response: &JsonRpcResponse) -> String {
        response.result.as_ref().unwrap()["content"][0]["text"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_show_raw() {
        let server = server();
        let response = server
            .handle_request(call("ddclient_show", json!({ "raw": true })))
            .await;
        assert_eq!(
            text_of(&response),
            "ssl=yes\n\n# Home Domain\nlogin=me\npassword=pw\na.example.com, b.example.com\n\n"
        );
    }

    #[tokio::test]
    async fn test_set_global_and_clear() {
        let server = server();
        server
            .handle_request(call(
                "ddclient_set_global",
                json!({ "key": "protocol", "value": "dyndns2" }),
            ))
            .await;
        server
            .handle_request(call("ddclient_set_global", json!({ "key": "ssl" })))
            .await;

        let config = server.config.lock().await;
        assert_eq!(config.global(GlobalKey::Protocol), Some("dyndns2"));
        assert_eq!(config.global(GlobalKey::Ssl), None);
    }

    #[tokio::test]
    async fn test_set_unknown_key_is_invalid_params() {
        let response = server()
            .handle_request(call("ddclient_set_global", json!({ "key": "pid" })))
            .await;
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_domain_lifecycle() {
        let server = server();

        server
            .handle_request(call(
                "ddclient_add_domain",
                json!({ "name": "Work Domain", "login": "w", "hosts": "x.example.com, y.example.com" }),
            ))
            .await;
        server
            .handle_request(call(
                "ddclient_update_domain",
                json!({ "name": "Home Domain", "password": "new" }),
            ))
            .await;

        {
            let config = server.config.lock().await;
            assert_eq!(config.domains.len(), 2);
            assert_eq!(config.domains[0].password, "new");
            assert_eq!(config.domains[0].login, "me");
            assert_eq!(config.domains[0].hosts.len(), 2);
            assert_eq!(config.domains[1].hosts, ["x.example.com", "y.example.com"]);
        }

        server
            .handle_request(call("ddclient_remove_domain", json!({ "name": "Home Domain" })))
            .await;
        let config = server.config.lock().await;
        assert_eq!(config.domains.len(), 1);
        assert_eq!(config.domains[0].name, "Work Domain");
    }

    #[tokio::test]
    async fn test_add_domain_requires_name() {
        let response = server()
            .handle_request(call("ddclient_add_domain", json!({ "name": "  " })))
            .await;
        let error = response.error.unwrap();
        assert_eq!(error.code, -32000);
        assert_eq!(error.message, "Domain name is required");
    }

    #[tokio::test]
    async fn test_remove_unknown_domain() {
        let response = server()
            .handle_request(call("ddclient_remove_domain", json!({ "name": "Nope" })))
            .await;
        assert_eq!(response.error.unwrap().code, -32000);
    }

    #[tokio::test]
    async fn test_save_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.conf");

        let response = server()
            .handle_request(call(
                "ddclient_save",
                json!({ "path": path.to_str().unwrap() }),
            ))
            .await;
        assert!(response.error.is_none());
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .starts_with("ssl=yes\n"));
    }

    #[tokio::test]
    async fn test_serve_loop() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#,
            "\n\n",
            "not json\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"bogus"}"#,
            "\n",
        );
        let mut output = Vec::new();
        server().serve(input.as_bytes(), &mut output).await.unwrap();

        let lines: Vec<serde_json::Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["result"]["serverInfo"]["name"], "ddclient-conf");
        assert_eq!(lines[1]["error"]["code"], -32700);
        assert_eq!(lines[2]["error"]["code"], -32601);
        assert_eq!(lines[2]["id"], 2);
    }
}
