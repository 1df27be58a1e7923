//! A `Greeter` service carried as JSON instead of a binary message encoding.
//!
//! This is the textcall analogue of the canonical hello-world rpc: the
//! `Greeter/SayHello` method is bound to `JsonCodec` request and response
//! marshalling, so the payloads on the wire are human-readable text. The
//! client side is a composition of a channel handle, a stub, and a small
//! lifecycle wrapper; the server side is a minimal demo used by the server
//! binary and the end-to-end tests.

pub mod client;
pub mod messages;
pub mod server;
pub mod stub;
