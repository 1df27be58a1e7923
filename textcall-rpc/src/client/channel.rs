use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use super::{CallOptions, Configuration};
use crate::wire::{self, RequestFrame, ResponseFrame};
use crate::{Codec, Error, MethodDescriptor, Result, Status};

type InFlightCalls = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<ResponseFrame>>>>>;

/// Open a plaintext channel to `host:port` and spawn its connection driver.
///
/// Establishment failures are fatal to the channel and propagate to the
/// caller; nothing is retried here.
pub async fn connect(host: &str, port: u16, configuration: &Configuration) -> Result<Channel> {
    log::trace!("new channel {host}:{port}, {configuration:?}");

    let stream = TcpStream::connect((host, port)).await?;
    stream.set_nodelay(true)?;

    let (submission_queue, outbound_calls) =
        mpsc::channel(configuration.max_queued_outbound_calls);
    let in_flight: InFlightCalls = Default::default();
    let is_alive = Arc::new(AtomicBool::new(true));
    let shutdown = CancellationToken::new();

    let driver = tokio::spawn(drive_connection(
        stream,
        outbound_calls,
        in_flight.clone(),
        is_alive.clone(),
        shutdown.clone(),
        configuration.max_frame_length,
    ));

    Ok(Channel {
        submission_queue,
        in_flight,
        next_call_id: Arc::new(AtomicU64::new(1)),
        is_alive,
        shutdown,
        driver: Arc::new(Mutex::new(Some(driver))),
    })
}

/// A handle to one plaintext connection to a server.
///
/// Cloning is cheap and every clone shares the connection: stubs hold clones,
/// never the connection itself. Calls issued concurrently from any number of
/// clones are correlated by call id and are not serialized against each
/// other. The owner of the channel's lifecycle calls [`Channel::shutdown`]
/// exactly once.
#[derive(Debug, Clone)]
pub struct Channel {
    submission_queue: mpsc::Sender<RequestFrame>,
    in_flight: InFlightCalls,
    next_call_id: Arc<AtomicU64>,
    is_alive: Arc<AtomicBool>,
    shutdown: CancellationToken,
    driver: Arc<Mutex<Option<tokio::task::JoinHandle<()>>>>,
}

impl Channel {
    /// Whether the connection is still up and accepting calls.
    pub fn is_alive(&self) -> bool {
        self.is_alive.load(Ordering::Relaxed)
    }

    /// Send a unary rpc and await its response.
    ///
    /// The caller suspends until the response arrives or the transport fails
    /// the call: deadline expiry surfaces as `Status::DeadlineExceeded`, a
    /// lost connection as `Error::ConnectionIsClosed`, a non-success status
    /// as `Error::Rpc`, and an unreadable payload as `Error::Decode`. There
    /// are no implicit retries.
    pub async fn unary<ReqC, RespC>(
        &self,
        method: &MethodDescriptor<ReqC, RespC>,
        options: &CallOptions,
        request: &ReqC::Value,
    ) -> Result<RespC::Value>
    where
        ReqC: Codec,
        RespC: Codec,
    {
        if !self.is_alive() {
            // early-out if the connection is closed
            return Err(Error::ConnectionIsClosed);
        }

        let payload = method.request_codec().encode(request);
        let call_id = self.next_call_id.fetch_add(1, Ordering::Relaxed);
        let (completor, completion) = oneshot::channel();
        self.in_flight
            .lock()
            .expect("mutex works")
            .insert(call_id, completor);

        let frame = RequestFrame {
            call_id,
            method: method.name().to_owned(),
            payload: payload.into(),
        };
        if self.submission_queue.send(frame).await.is_err() {
            self.abandon(call_id);
            return Err(Error::ConnectionIsClosed);
        }

        let response = match options.deadline() {
            Some(deadline) => match tokio::time::timeout(deadline, completion).await {
                Ok(completed) => completed,
                Err(_elapsed) => {
                    log::debug!("call {call_id} to {} hit its deadline", method.name());
                    self.abandon(call_id);
                    return Err(Error::Rpc(Status::DeadlineExceeded));
                }
            },
            None => completion.await,
        };
        let response = response.map_err(|_completor_dropped| Error::ConnectionIsClosed)??;

        match response.status {
            Status::Ok => Ok(method.response_codec().decode(&response.payload)?),
            status => Err(Error::Rpc(status)),
        }
    }

    /// Shut the channel down, giving in-flight calls up to `grace` to
    /// complete.
    ///
    /// New calls are refused immediately. When the grace period elapses
    /// before the in-flight calls drain, the connection is torn down anyway
    /// and `Error::ShutdownTimeout` is returned; this function never blocks
    /// past the bound waiting for completion. Calls still pending at
    /// teardown complete with `Error::ConnectionIsClosed`.
    pub async fn shutdown(self, grace: Duration) -> Result<()> {
        self.is_alive.store(false, Ordering::Relaxed);
        let drained = tokio::time::timeout(grace, self.drained()).await;
        self.shutdown.cancel();

        let driver = self.driver.lock().expect("mutex works").take();
        if let Some(driver) = driver {
            if drained.is_err() {
                // calls are still in flight past the bound; stop mid-work
                driver.abort();
            }
            let _ = driver.await;
        }
        // the driver fails leftovers when it exits normally; an aborted
        // driver never reaches that path, so sweep here as well
        fail_in_flight(&self.in_flight);

        match drained {
            Ok(()) => Ok(()),
            Err(_elapsed) => Err(Error::ShutdownTimeout),
        }
    }

    async fn drained(&self) {
        let mut poll = tokio::time::interval(Duration::from_millis(20));
        loop {
            poll.tick().await;
            if self.in_flight.lock().expect("mutex works").is_empty() {
                return;
            }
        }
    }

    fn abandon(&self, call_id: u64) {
        self.in_flight.lock().expect("mutex works").remove(&call_id);
    }
}

/// Owns the socket: writes queued request frames and completes in-flight
/// calls with the response frames it reads. Exits when the peer hangs up,
/// the stream is corrupt, shutdown is requested, or every channel handle is
/// dropped; on the way out it fails whatever is still in flight.
async fn drive_connection(
    stream: TcpStream,
    mut outbound_calls: mpsc::Receiver<RequestFrame>,
    in_flight: InFlightCalls,
    is_alive: Arc<AtomicBool>,
    shutdown: CancellationToken,
    max_frame_length: usize,
) {
    let (mut read_half, mut write_half) = stream.into_split();
    let mut read_buffer = BytesMut::with_capacity(16 * 1024);
    let mut write_buffer = BytesMut::new();

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                log::debug!("channel shutdown requested");
                break;
            }
            queued = outbound_calls.recv() => {
                let Some(frame) = queued else {
                    log::debug!("all channel handles dropped");
                    break;
                };
                wire::encode_request(&frame, &mut write_buffer);
                if let Err(e) = write_half.write_all_buf(&mut write_buffer).await {
                    log::warn!("write failure: {e:?}");
                    break;
                }
            }
            read = read_half.read_buf(&mut read_buffer) => {
                match read {
                    Ok(0) => {
                        log::debug!("connection closed by peer");
                        break;
                    }
                    Ok(_) => {
                        if complete_responses(&mut read_buffer, &in_flight, max_frame_length)
                            .is_err()
                        {
                            break;
                        }
                    }
                    Err(e) => {
                        log::warn!("read failure: {e:?}");
                        break;
                    }
                }
            }
        }
    }

    is_alive.store(false, Ordering::Relaxed);
    fail_in_flight(&in_flight);
}

fn fail_in_flight(in_flight: &InFlightCalls) {
    for (call_id, completor) in in_flight.lock().expect("mutex works").drain() {
        log::debug!("failing in-flight call {call_id}: connection is closed");
        let _ = completor.send(Err(Error::ConnectionIsClosed));
    }
}

fn complete_responses(
    read_buffer: &mut BytesMut,
    in_flight: &InFlightCalls,
    max_frame_length: usize,
) -> std::result::Result<(), wire::FrameError> {
    loop {
        match wire::decode_response(read_buffer, max_frame_length) {
            Ok(Some(frame)) => {
                match in_flight
                    .lock()
                    .expect("mutex works")
                    .remove(&frame.call_id)
                {
                    Some(completor) => {
                        let _ = completor.send(Ok(frame));
                    }
                    // the call may have hit its deadline while this response was in transit
                    None => log::debug!("response for unknown call {}", frame.call_id),
                }
            }
            Ok(None) => return Ok(()),
            Err(e) => {
                log::error!("response stream is corrupt: {e}");
                return Err(e);
            }
        }
    }
}
