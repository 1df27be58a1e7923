/// The shape of an rpc exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// One request message, one response message, no streaming.
    Unary,
}

/// Immutable binding of an rpc method's wire name, call kind, and the codecs
/// for its request and response payloads.
///
/// Build one descriptor per method, in a `static`, and hand the same instance
/// to every call: it is the single source of truth for the method's wire
/// contract. A descriptor carries no retry or caching behavior.
#[derive(Debug)]
pub struct MethodDescriptor<ReqC, RespC> {
    name: &'static str,
    kind: CallKind,
    request_codec: ReqC,
    response_codec: RespC,
}

impl<ReqC, RespC> MethodDescriptor<ReqC, RespC> {
    /// Bind a unary method. `name` must exactly match the string the serving
    /// side routes on, conventionally `"<Service>/<Method>"`; a mismatch
    /// surfaces from the server as `Status::Unimplemented`, not from here.
    pub const fn unary(name: &'static str, request_codec: ReqC, response_codec: RespC) -> Self {
        Self {
            name,
            kind: CallKind::Unary,
            request_codec,
            response_codec,
        }
    }

    /// The wire name of the method.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The call kind of this method.
    pub fn kind(&self) -> CallKind {
        self.kind
    }

    /// The codec for request payloads.
    pub fn request_codec(&self) -> &ReqC {
        &self.request_codec
    }

    /// The codec for response payloads.
    pub fn response_codec(&self) -> &RespC {
        &self.response_codec
    }
}
