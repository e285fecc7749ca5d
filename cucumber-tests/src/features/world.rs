use cucumber::World as CucumberWorld;
use formstore_core::config::FormstoreConfig;
use formstore_core::FormstoreServerBuilder;
use serde_json::Value;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Last HTTP exchange seen by a scenario
#[derive(Debug, Default, Clone)]
pub struct LastResponse {
    pub status: u16,
    pub allow: Option<String>,
    pub body: Value,
}

/// World shared by the steps of one scenario
///
/// Owns a live server bound to 127.0.0.1:0 and the temporary directory
/// holding its SQLite database. Both go away when the scenario ends.
#[derive(Debug, Default, CucumberWorld)]
pub struct FormstoreWorld {
    pub base_url: Option<String>,
    pub data_dir: Option<TempDir>,
    pub server: Option<JoinHandle<()>>,
    pub last_response: Option<LastResponse>,
    pub last_id: Option<i64>,
}

impl FormstoreWorld {
    /// Start a server with every built-in variant on a fresh database
    pub async fn start_server(&mut self) -> Result<(), String> {
        let dir = tempfile::tempdir().map_err(|e| format!("Failed to create temp dir: {}", e))?;
        let mut config = FormstoreConfig::default();
        config.storage.database = dir.path().join("formstore.db").to_string_lossy().into_owned();

        let server = FormstoreServerBuilder::with_config(config)
            .build()
            .await
            .map_err(|e| format!("Failed to build server: {:#}", e))?;
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| format!("Failed to bind: {}", e))?;
        let addr = listener.local_addr().map_err(|e| e.to_string())?;

        self.server = Some(tokio::spawn(async move {
            if let Err(e) = server.serve_with_listener(listener).await {
                eprintln!("❌ Server stopped: {:#}", e);
            }
        }));
        self.base_url = Some(format!("http://{}", addr));
        self.data_dir = Some(dir);
        Ok(())
    }

    /// Send a request and record status, `Allow` header and JSON body
    pub async fn make_request(&mut self, method: &str, path: &str, body: Option<Value>) -> Result<(), String> {
        let base_url = self.base_url.as_ref().ok_or("Server not started")?;
        let url = format!("{}{}", base_url, path);
        let client = reqwest::Client::new();

        let request = match method {
            "GET" => client.get(&url),
            "POST" => client.post(&url),
            "PUT" => client.put(&url),
            "DELETE" => client.delete(&url),
            "PATCH" => client.patch(&url),
            other => return Err(format!("Unsupported method: {}", other)),
        };
        let request = match body {
            Some(body) => request.json(&body),
            None => request,
        };

        let response = request.send().await.map_err(|e| format!("{} {} failed: {}", method, path, e))?;
        let status = response.status().as_u16();
        let allow = response
            .headers()
            .get("allow")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await.map_err(|e| e.to_string())?;
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };

        self.last_response = Some(LastResponse { status, allow, body });
        Ok(())
    }

    pub fn response(&self) -> &LastResponse {
        self.last_response.as_ref().expect("no response recorded")
    }
}

impl Drop for FormstoreWorld {
    fn drop(&mut self) {
        if let Some(server) = self.server.take() {
            server.abort();
        }
    }
}
