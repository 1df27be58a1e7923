//! End-to-end tests: the hello client against the demo greeter server, and
//! against servers that misbehave.

use bytes::BytesMut;
use example_greeter::client::HelloClient;
use example_greeter::server;
use textcall_rpc::wire::{self, RequestFrame, ResponseFrame};
use textcall_rpc::Status;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn listen() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("can bind an ephemeral port");
    let port = listener
        .local_addr()
        .expect("listener has an address")
        .port();
    (listener, port)
}

async fn read_request(stream: &mut TcpStream, buffer: &mut BytesMut) -> RequestFrame {
    loop {
        if let Some(frame) =
            wire::decode_request(buffer, 1 << 20).expect("request stream is well formed")
        {
            return frame;
        }
        let read = stream.read_buf(buffer).await.expect("read works");
        assert_ne!(0, read, "client hung up mid-request");
    }
}

#[tokio::test]
async fn greet_round_trips_hello_world() {
    let (listener, port) = listen().await;
    let _server = tokio::spawn(server::serve(listener));

    let client = HelloClient::connect("127.0.0.1", port)
        .await
        .expect("connect works");
    assert_eq!(Some("Hello World".to_owned()), client.greet("World").await);
    client.shutdown().await;
}

#[tokio::test]
async fn the_descriptor_name_goes_on_the_wire() {
    let (listener, port) = listen().await;
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept works");
        let mut buffer = BytesMut::new();
        let request = read_request(&mut stream, &mut buffer).await;
        assert_eq!("Greeter/SayHello", request.method);

        let mut response = BytesMut::new();
        wire::encode_response(
            &ResponseFrame {
                call_id: request.call_id,
                status: Status::Ok,
                payload: bytes::Bytes::from_static(br#"{"message":"Hello World"}"#),
            },
            &mut response,
        );
        stream
            .write_all_buf(&mut response)
            .await
            .expect("write works");
    });

    let client = HelloClient::connect("127.0.0.1", port)
        .await
        .expect("connect works");
    assert_eq!(Some("Hello World".to_owned()), client.greet("World").await);
    client.shutdown().await;

    server.await.expect("server task succeeds");
}

#[tokio::test]
async fn greet_is_fail_soft() {
    // a server that fails every call outright
    let (listener, port) = listen().await;
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept works");
        let mut buffer = BytesMut::new();
        let request = read_request(&mut stream, &mut buffer).await;

        let mut response = BytesMut::new();
        wire::encode_response(
            &ResponseFrame {
                call_id: request.call_id,
                status: Status::Internal,
                payload: Default::default(),
            },
            &mut response,
        );
        stream
            .write_all_buf(&mut response)
            .await
            .expect("write works");
    });

    let client = HelloClient::connect("127.0.0.1", port)
        .await
        .expect("connect works");
    // the failure is logged, not raised; the caller continues
    assert_eq!(None, client.greet("World").await);
    // and the channel is still released in an orderly way
    client.shutdown().await;

    server.await.expect("server task succeeds");
}

#[tokio::test]
async fn unknown_methods_get_unimplemented_from_the_demo_server() {
    let (listener, port) = listen().await;
    let _server = tokio::spawn(server::serve(listener));

    use textcall_json::JsonCodec;
    use textcall_rpc::client::{connect, CallOptions, Configuration};
    use textcall_rpc::{Error, MethodDescriptor};

    #[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
    struct Empty {}

    static METHOD_MISSING: MethodDescriptor<JsonCodec<Empty>, JsonCodec<Empty>> =
        MethodDescriptor::unary("Greeter/Missing", JsonCodec::new(), JsonCodec::new());

    let channel = connect("127.0.0.1", port, &Configuration::default())
        .await
        .expect("connect works");
    let result = channel
        .unary(&METHOD_MISSING, &CallOptions::new(), &Empty {})
        .await;
    assert!(
        matches!(result, Err(Error::Rpc(Status::Unimplemented))),
        "got {result:?}"
    );
}
