use example_greeter::client::HelloClient;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    runtime.block_on(run_main())
}

async fn run_main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let endpoint = std::env::var("ENDPOINT").unwrap_or_else(|_| "127.0.0.1:15001".to_string());
    let (host, port) = endpoint
        .rsplit_once(':')
        .ok_or("ENDPOINT must look like host:port")?;
    let port: u16 = port.parse()?;
    let name = std::env::var("NAME").unwrap_or_else(|_| "World".to_string());

    let client = HelloClient::connect(host, port).await?;
    // a failed greeting is logged by the client; shutdown runs regardless
    client.greet(&name).await;
    client.shutdown().await;

    Ok(())
}
