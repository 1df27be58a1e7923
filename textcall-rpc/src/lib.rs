//! Textcall RPC
//!
//! This crate provides a small unary rpc client where the wire serialization
//! of each method is pluggable: a method is described by a `MethodDescriptor`
//! binding its wire name to a `Codec` for the request and a `Codec` for the
//! response, instead of being welded to one binary message encoding. The
//! `textcall-json` crate provides a human-readable JSON codec, and other
//! encodings are similarly straightforward to add.
//!
//! A `Channel` is one plaintext tcp connection to a server. It is a cheap
//! clone-able handle; every stub built over it shares the same connection and
//! calls issued concurrently are correlated by call id. A call suspends the
//! caller until the response arrives or the transport fails it. There are no
//! implicit retries.
//!
//! * See example-greeter for a complete client and server for a `Greeter`
//!   service carried as JSON.
//!
//! Failures are typed: a non-success status from the server (`Error::Rpc`) is
//! distinguishable from a response that arrived but could not be parsed
//! (`Error::Decode`), so callers can tell a failing server from an unreadable
//! payload.

#![deny(missing_docs)]

mod codec;
mod error;
mod method;
mod status;

pub mod client;
pub mod wire;

pub use codec::Codec;
pub use error::{DecodeError, Error, Result};
pub use method::{CallKind, MethodDescriptor};
pub use status::Status;
