//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the server and its clients: the joined message record, history pages,
//! real-time events and wire-level validation errors.
//!
//! # Overview
//!
//! Everything here is plain serializable data with no server dependencies,
//! so client code can depend on `roomlog` with `default-features = false`.

/// Message data structures
pub mod message;

/// Real-time event envelope
pub mod event;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use message::{Author, Message, MessagePage, MessageType};
pub use event::{EventType, RealtimeEvent};
pub use error::SharedError;
