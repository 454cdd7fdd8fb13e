use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Allocate a free port on localhost.
/// This is required to avoid port collisions when running tests in parallel.
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Stand-in for the game server's listening socket. Accepts and drops.
pub struct GameServer {
    port: u16,
    task: JoinHandle<()>,
}

impl GameServer {
    pub async fn listen(port: u16) -> Self {
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .expect("failed to bind game port");

        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                drop(stream);
            }
        });

        Self { port, task }
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Drop for GameServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
