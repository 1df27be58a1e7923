use std::time::Duration;

use textcall_rpc::client::{connect, Channel, Configuration};
use textcall_rpc::Result;

use crate::messages::HelloRequest;
use crate::stub::GreeterStub;

/// How long `shutdown` waits for in-flight calls before giving up.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Owns the channel's lifecycle: connect, greet any number of times, then
/// shut down exactly once.
#[derive(Debug)]
pub struct HelloClient {
    channel: Channel,
    stub: GreeterStub,
}

impl HelloClient {
    /// Open a plaintext channel to the greeter at `host:port` and bind a
    /// stub over it. Connection failures propagate; a client you could not
    /// connect is not usable.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let channel = connect(host, port, &Configuration::default()).await?;
        let stub = GreeterStub::bind(&channel);
        Ok(Self { channel, stub })
    }

    /// Say hello to the server.
    ///
    /// A failed rpc is logged with its status and swallowed, so one bad call
    /// never keeps the caller from an orderly shutdown. The reply message is
    /// returned when there is one.
    pub async fn greet(&self, name: &str) -> Option<String> {
        let request = HelloRequest {
            name: name.to_owned(),
        };
        let response = match self.stub.say_hello(&request).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("RPC failed: {e}");
                return None;
            }
        };
        log::info!("{}", response.message);
        Some(response.message)
    }

    /// Release the channel, waiting up to [`SHUTDOWN_GRACE`] for in-flight
    /// work. Overrunning the grace period is logged and swallowed; shutdown
    /// always completes.
    pub async fn shutdown(self) {
        if let Err(e) = self.channel.shutdown(SHUTDOWN_GRACE).await {
            log::warn!("channel did not drain within {SHUTDOWN_GRACE:?}: {e}");
        }
    }
}
