/// Configuration for a textcall rpc channel.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub(crate) max_frame_length: usize,
    pub(crate) max_queued_outbound_calls: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            max_frame_length: 4 << 20,
            max_queued_outbound_calls: 256,
        }
    }
}

impl Configuration {
    /// Max frame length limits the max message size. Frames claiming more
    /// than this are treated as corruption and drop the connection.
    ///
    /// Default: 4MiB
    pub fn max_frame_length(&mut self, max_frame_length: usize) {
        self.max_frame_length = max_frame_length;
    }

    /// Max calls that will be queued up waiting for send on the channel.
    ///
    /// Default: 256
    pub fn max_queued_outbound_calls(&mut self, max_queued_outbound_calls: usize) {
        self.max_queued_outbound_calls = max_queued_outbound_calls;
    }
}
