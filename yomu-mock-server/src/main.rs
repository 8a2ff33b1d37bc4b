use anyhow::Context;
use std::net::SocketAddr;
use yomu_mock_server::MockServer;

/// A couple of accounts and some prose so the UI has something to show
fn seed(server: &MockServer) {
    server.test_create_user("alice", "hunter2");
    server.test_create_user("bob", "123456");
    for _ in 0..4 {
        let post = server.test_create_post("alice", &lipsum::lipsum_title(), &lipsum::lipsum(60));
        for author in ["bob", "alice", "bob"] {
            server.test_create_comment(&post, author, &lipsum::lipsum(12));
        }
    }
    tracing::info!("seeded demo data, log in as alice/hunter2 or bob/123456");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let server = MockServer::new();
    seed(&server);

    let port = match std::env::var("YOMU_MOCK_PORT") {
        Ok(port) => port.parse().context("parsing YOMU_MOCK_PORT")?,
        Err(_) => 3000,
    };
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("listening on {}", addr);
    axum::Server::bind(&addr)
        .serve(yomu_mock_server::app(server).into_make_service())
        .await
        .context("serving axum webserver")
}
