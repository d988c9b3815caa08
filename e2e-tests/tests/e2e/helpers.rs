use spam_rs::api::ApiServer;
use spam_rs::Predictor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Path of the demo model shipped with spam-rs
pub fn shipped_model_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../spam-rs/models/nb_spam_ham.json")
}

/// A spam-rs server running on an ephemeral port for the duration of a test
pub struct TestEnv {
    pub base_url: String,
    pub client: reqwest::Client,
    handle: JoinHandle<()>,
}

impl TestEnv {
    /// Start a server with the shipped model
    pub async fn with_shipped_model() -> Result<Self, String> {
        Self::start(Predictor::load(shipped_model_path())).await
    }

    /// Start a server whose model failed to load
    pub async fn degraded() -> Result<Self, String> {
        Self::start(Predictor::unavailable("model file not found")).await
    }

    /// Start a server around `predictor` and wait until it answers /health
    pub async fn start(predictor: Predictor) -> Result<Self, String> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| format!("Failed to bind test listener: {}", e))?;
        let addr = listener
            .local_addr()
            .map_err(|e| format!("Failed to read local address: {}", e))?;

        let server = ApiServer::new(Arc::new(predictor), addr.to_string());
        let handle = tokio::spawn(async move {
            if let Err(e) = server.serve(listener).await {
                tracing::error!("Test server stopped: {}", e);
            }
        });

        let env = Self {
            base_url: format!("http://{}", addr),
            client: reqwest::Client::new(),
            handle,
        };
        env.wait_for_service(5).await?;
        Ok(env)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Wait for the health route to respond
    pub async fn wait_for_service(&self, timeout_secs: u64) -> Result<(), String> {
        let url = self.url("/health");
        let start = std::time::Instant::now();

        loop {
            if start.elapsed().as_secs() > timeout_secs {
                return Err(format!("Timeout waiting for service: {}", url));
            }

            match self.client.get(&url).send().await {
                Ok(_) => return Ok(()),
                Err(_) => sleep(Duration::from_millis(50)).await,
            }
        }
    }

    /// POST a JSON body to /predict, returning status and parsed body
    pub async fn predict(&self, body: serde_json::Value) -> Result<(u16, serde_json::Value), String> {
        let response = self
            .client
            .post(self.url("/predict"))
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        let status = response.status().as_u16();
        let body = response
            .json()
            .await
            .map_err(|e| format!("Invalid JSON response: {}", e))?;
        Ok((status, body))
    }
}

impl Drop for TestEnv {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
