//! A minimal greeter server speaking the textcall frame format with JSON
//! payloads. Backs the `greeter-server` binary and the end-to-end tests.

use bytes::BytesMut;
use textcall_json::JsonCodec;
use textcall_rpc::wire::{self, RequestFrame, ResponseFrame};
use textcall_rpc::{Codec, Status};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::messages::{HelloReply, HelloRequest};

const MAX_FRAME_LENGTH: usize = 4 << 20;

static REQUEST_CODEC: JsonCodec<HelloRequest> = JsonCodec::new();
static REPLY_CODEC: JsonCodec<HelloReply> = JsonCodec::new();

/// Accept connections forever, answering `Greeter/SayHello` on each.
pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    loop {
        let (stream, address) = listener.accept().await?;
        log::info!("new connection {address}");
        tokio::spawn(async move {
            if let Err(e) = serve_connection(stream).await {
                log::debug!("connection {address} ended: {e:?}");
            }
        });
    }
}

async fn serve_connection(mut stream: TcpStream) -> std::io::Result<()> {
    let mut read_buffer = BytesMut::with_capacity(16 * 1024);
    let mut write_buffer = BytesMut::new();
    loop {
        if 0 == stream.read_buf(&mut read_buffer).await? {
            return Ok(());
        }
        loop {
            match wire::decode_request(&mut read_buffer, MAX_FRAME_LENGTH) {
                Ok(Some(request)) => {
                    let response = respond(request);
                    wire::encode_response(&response, &mut write_buffer);
                }
                Ok(None) => break,
                Err(e) => {
                    log::warn!("request stream is corrupt: {e}");
                    return Ok(());
                }
            }
        }
        stream.write_all_buf(&mut write_buffer).await?;
    }
}

fn respond(request: RequestFrame) -> ResponseFrame {
    match request.method.as_str() {
        "Greeter/SayHello" => match REQUEST_CODEC.decode(&request.payload) {
            Ok(hello) => {
                let reply = HelloReply {
                    message: format!("Hello {}", hello.name),
                };
                ResponseFrame {
                    call_id: request.call_id,
                    status: Status::Ok,
                    payload: REPLY_CODEC.encode(&reply).into(),
                }
            }
            Err(e) => {
                log::warn!("undecodable request for call {}: {e}", request.call_id);
                ResponseFrame {
                    call_id: request.call_id,
                    status: Status::InvalidArgument,
                    payload: Default::default(),
                }
            }
        },
        unknown => {
            log::warn!("unknown method {unknown}");
            ResponseFrame {
                call_id: request.call_id,
                status: Status::Unimplemented,
                payload: Default::default(),
            }
        }
    }
}
