//! Extension page resolution and refresh protocol.
//!
//! This module decides which plugin-contributed page an organization exposes
//! for a route, which render target follows from that decision, and how a
//! hosted page asks for its organization to be reloaded. Mounting, sandboxing
//! and executing extension code belong to the host container.

pub mod dispatch;
pub mod refresh;
pub mod resolver;
