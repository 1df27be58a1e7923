use textcall_rpc::client::{CallOptions, Channel};
use textcall_rpc::Result;

use crate::messages::{HelloRequest, HelloReply, METHOD_SAY_HELLO};

/// Call handle for the `Greeter` service.
///
/// Holds a clone of the channel and a `CallOptions` value, nothing else. It
/// owns no connection state, so it is cheap to clone and discard; its
/// lifetime is scoped by whoever owns the channel.
#[derive(Debug, Clone)]
pub struct GreeterStub {
    channel: Channel,
    call_options: CallOptions,
}

impl GreeterStub {
    /// A stub over `channel` with default call options.
    pub fn bind(channel: &Channel) -> Self {
        Self {
            channel: channel.clone(),
            call_options: CallOptions::default(),
        }
    }

    /// A new stub over the same channel with different call options. The
    /// original stub is untouched.
    pub fn rebind(&self, call_options: CallOptions) -> Self {
        Self {
            channel: self.channel.clone(),
            call_options,
        }
    }

    /// One unary `Greeter/SayHello` exchange. Suspends until the reply
    /// arrives or the transport fails the call; transport failures propagate
    /// to the caller untouched.
    pub async fn say_hello(&self, request: &HelloRequest) -> Result<HelloReply> {
        self.channel
            .unary(&METHOD_SAY_HELLO, &self.call_options, request)
            .await
    }
}
