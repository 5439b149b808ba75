//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-kagi server.

pub mod kagi_search;
