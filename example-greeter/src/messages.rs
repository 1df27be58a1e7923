//! Greeter records and the method descriptor binding them to JSON codecs.

use textcall_json::JsonCodec;
use textcall_rpc::MethodDescriptor;

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HelloRequest {
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HelloReply {
    pub message: String,
}

/// The one descriptor every `SayHello` call shares. The wire name must match
/// what the server routes on exactly.
pub static METHOD_SAY_HELLO: MethodDescriptor<JsonCodec<HelloRequest>, JsonCodec<HelloReply>> =
    MethodDescriptor::unary("Greeter/SayHello", JsonCodec::new(), JsonCodec::new());
