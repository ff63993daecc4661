#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<Option<TestServer>> = OnceLock::new();
static COUNTER: AtomicUsize = AtomicUsize::new(0);

const TEST_SECRET: &str = "jobly-integration-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    _child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_jobly-api"));
        cmd.env("APP_ENV", "test")
            .env("PORT", port.to_string())
            .env("SECRET_KEY", TEST_SECRET)
            .env("DATABASE_RUN_MIGRATIONS", "true")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;
        Ok(Self {
            port,
            base_url,
            _child: child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// A name no other test (in this run or an earlier one) has used.
    /// The trailing dash keeps one name from being a substring of another.
    pub fn unique(&self, prefix: &str) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        format!(
            "{}{:x}-{}-",
            prefix,
            millis & 0xff_ffff_ffff,
            COUNTER.fetch_add(1, Ordering::SeqCst)
        )
    }
}

/// Starts the server once per test binary. `None` when no database is
/// configured, in which case callers skip.
pub async fn ensure_server() -> Result<Option<&'static TestServer>> {
    let server = SERVER.get_or_init(|| {
        let _ = dotenvy::dotenv();
        if std::env::var("DATABASE_URL").is_err() {
            eprintln!("DATABASE_URL not set; skipping integration test");
            return None;
        }
        // The test process signs tokens with the same secret as the server
        std::env::set_var("SECRET_KEY", TEST_SECRET);
        Some(TestServer::spawn().expect("failed to spawn server binary"))
    });

    match server {
        Some(server) => {
            server.wait_ready(Duration::from_secs(15)).await?;
            Ok(Some(server))
        }
        None => Ok(None),
    }
}

pub fn admin_token() -> String {
    jobly_api::auth::create_token("test-admin", true).expect("token")
}

pub fn user_token(username: &str) -> String {
    jobly_api::auth::create_token(username, false).expect("token")
}
