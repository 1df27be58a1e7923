use crate::DecodeError;

/// Converts typed record values to and from wire payload bytes.
///
/// A codec is a pure function of its input: implementations hold no mutable
/// state, so one instance may serve concurrent calls without locking.
pub trait Codec: Send + Sync {
    /// The record type this codec carries.
    type Value;

    /// Serialize a record into payload bytes.
    ///
    /// Record types are fixed at compile time, so a record that cannot be
    /// serialized is a programming error rather than a runtime condition.
    fn encode(&self, value: &Self::Value) -> Vec<u8>;

    /// Parse payload bytes into a record.
    ///
    /// Malformed or truncated payloads are rejected outright; a partially
    /// populated record is never produced.
    fn decode(&self, buffer: &[u8]) -> std::result::Result<Self::Value, DecodeError>;
}
