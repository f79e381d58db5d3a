//! # ddclient-conf
//!
//! Reads and writes `ddclient.conf`, the configuration file of the ddclient
//! dynamic DNS client.
//!
//! The file is a handful of global `key=value` settings followed by one block
//! per domain:
//!
//! ```text
//! daemon=300
//! ssl=yes
//!
//! # Home Domain
//! login=bob
//! password=secret
//! home.example.com, vpn.example.com
//! ```
//!
//! [`parse`] never fails on text; unknown lines are dropped. [`serialize`]
//! writes the canonical layout, so `parse(serialize(c))` gives back `c` for
//! anything the format can express.
//!
//! ## Usage
//!
//! ```bash
//! # Print the discovered configuration
//! ddclient-conf show
//!
//! # Change a global setting
//! ddclient-conf set protocol dyndns2
//!
//! # Add a domain
//! ddclient-conf add-domain --name "Home Domain" --login bob --password secret \
//!     --hosts "home.example.com, vpn.example.com"
//!
//! # Start MCP server (for AI assistants)
//! ddclient-conf mcp
//! ```

pub mod config;
pub mod error;
pub mod mcp;
pub mod parser;
pub mod serializer;
pub mod store;

pub use config::{Configuration, DomainEdit, DomainEntry, GlobalKey, GlobalSettings};
pub use error::{ConfigError, Result};
pub use parser::parse;
pub use serializer::serialize;
pub use store::{load, save};
