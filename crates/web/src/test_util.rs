//! Local mock servers for exercising the clients in tests.

use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_mock_server(app: Router) -> String {
    let addr = SocketAddr::from(([127, 0, 0, 1], 0));
    let listener = TcpListener::bind(addr).await.unwrap();
    let server_addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", server_addr)
}
