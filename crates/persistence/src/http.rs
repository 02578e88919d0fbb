//! Client for the remote scenario REST API.
//!
//! `GET /scenarios` -> `{scenarios}`, `POST /scenarios` -> `{scenario}`,
//! `GET|PUT|DELETE /scenarios/:id`. Identity is resolved outside this crate;
//! an optional bearer token is forwarded as-is.

use crate::{DbScenario, RepoError, ScenarioPayload, ScenarioRepository};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Clone, Debug)]
pub struct HttpConfig {
    /// API root, e.g. `https://planner.example.org/api`.
    pub base_url: String,
    pub bearer_token: Option<String>,
    pub timeout: Duration,
}

impl HttpConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HttpScenarioRepository {
    client: reqwest::Client,
    config: HttpConfig,
    base: Url,
}

#[derive(Deserialize)]
struct ListResponse {
    scenarios: Vec<DbScenario>,
}

#[derive(Deserialize)]
struct ScenarioResponse {
    scenario: DbScenario,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl From<reqwest::Error> for RepoError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RepoError::Decode(e.to_string())
        } else {
            RepoError::Transport(e.to_string())
        }
    }
}

impl HttpScenarioRepository {
    pub fn new(config: HttpConfig) -> Result<Self, RepoError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| RepoError::Transport(format!("invalid api url {}: {e}", config.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(RepoError::Transport(format!(
                "api url {} cannot carry a path",
                config.base_url
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            config,
            base,
        })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Base URL plus `segments`, each percent-encoded as a single segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // `new` rejects bases that cannot carry a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// URL of one scenario. Ids that would collapse onto another path are
    /// refused before any request is sent.
    fn scenario_url(&self, id: &str) -> Result<Url, RepoError> {
        if id.is_empty() || id == "." || id == ".." {
            return Err(RepoError::NotFound(format!("invalid scenario id {id:?}")));
        }
        Ok(self.url(&["scenarios", id]))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "scenario api request");
        let req = self
            .client
            .request(method, url)
            .header("Accept", "application/json");
        match &self.config.bearer_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Turn a non-success response into `RepoError::Http`, preferring the
    /// server's `{error}` message when present.
    async fn check(resp: Response) -> Result<Response, RepoError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        warn!(status = status.as_u16(), %message, "scenario api error");
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RepoError::NotFound(message));
        }
        Err(RepoError::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, RepoError> {
        let resp = Self::check(resp).await?;
        resp.json::<T>()
            .await
            .map_err(|e| RepoError::Decode(e.to_string()))
    }
}

impl ScenarioRepository for HttpScenarioRepository {
    async fn list(&self) -> Result<Vec<DbScenario>, RepoError> {
        let resp = self.request(Method::GET, self.url(&["scenarios"])).send().await?;
        Ok(Self::decode::<ListResponse>(resp).await?.scenarios)
    }

    async fn create(&self, payload: &ScenarioPayload) -> Result<DbScenario, RepoError> {
        let resp = self
            .request(Method::POST, self.url(&["scenarios"]))
            .json(payload)
            .send()
            .await?;
        Ok(Self::decode::<ScenarioResponse>(resp).await?.scenario)
    }

    async fn get(&self, id: &str) -> Result<DbScenario, RepoError> {
        let resp = self.request(Method::GET, self.scenario_url(id)?).send().await?;
        Ok(Self::decode::<ScenarioResponse>(resp).await?.scenario)
    }

    async fn update(&self, id: &str, payload: &ScenarioPayload) -> Result<DbScenario, RepoError> {
        let resp = self
            .request(Method::PUT, self.scenario_url(id)?)
            .json(payload)
            .send()
            .await?;
        Ok(Self::decode::<ScenarioResponse>(resp).await?.scenario)
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let resp = self
            .request(Method::DELETE, self.scenario_url(id)?)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response and return the raw request.
    async fn one_shot_server(
        status_line: &'static str,
        body: String,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 16 * 1024];
            let mut req = Vec::new();
            loop {
                let n = sock.read(&mut buf).await.unwrap();
                req.extend_from_slice(&buf[..n]);
                if n == 0 || request_complete(&req) {
                    break;
                }
            }
            let resp = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            sock.write_all(resp.as_bytes()).await.unwrap();
            sock.shutdown().await.ok();
            String::from_utf8_lossy(&req).to_string()
        });
        (format!("http://{addr}/api"), handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(split) = text.find("\r\n\r\n") else {
            return false;
        };
        let headers = text[..split].to_ascii_lowercase();
        let len = headers
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        raw.len() >= split + 4 + len
    }

    fn scenario_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "user_id": "u1",
            "name": "Plan",
            "description": null,
            "params": {"sim_rooms": 3},
            "results_snapshot": {},
            "is_default": false,
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z"
        })
    }

    fn payload() -> ScenarioPayload {
        ScenarioPayload {
            name: "Plan".into(),
            description: None,
            params: json!({"sim_rooms": 3}),
            results: json!({}),
        }
    }

    #[test]
    fn urls_join_cleanly() {
        let repo = HttpScenarioRepository::new(HttpConfig::new("http://h/api/")).unwrap();
        assert_eq!(repo.url(&["scenarios"]).as_str(), "http://h/api/scenarios");
        let bare = HttpScenarioRepository::new(HttpConfig::new("http://h")).unwrap();
        assert_eq!(bare.url(&["scenarios"]).as_str(), "http://h/scenarios");
    }

    #[test]
    fn scenario_ids_are_encoded_not_filtered() {
        let repo = HttpScenarioRepository::new(HttpConfig::new("http://h/api")).unwrap();
        let slashed = repo.scenario_url("a/b").unwrap();
        assert_eq!(slashed.as_str(), "http://h/api/scenarios/a%2Fb");
        assert_ne!(slashed, repo.scenario_url("ab").unwrap());
        assert_eq!(
            repo.scenario_url("plan é").unwrap().as_str(),
            "http://h/api/scenarios/plan%20%C3%A9"
        );
        assert_eq!(
            repo.scenario_url("abc-1/../x").unwrap().as_str(),
            "http://h/api/scenarios/abc-1%2F..%2Fx"
        );
        for bad in ["", ".", ".."] {
            assert!(matches!(repo.scenario_url(bad), Err(RepoError::NotFound(_))));
        }
    }

    #[test]
    fn bad_base_url_is_rejected() {
        assert!(HttpScenarioRepository::new(HttpConfig::new("not a url")).is_err());
        assert!(HttpScenarioRepository::new(HttpConfig::new("mailto:ops@example.org")).is_err());
    }

    #[tokio::test]
    async fn empty_id_never_reaches_the_collection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let repo = HttpScenarioRepository::new(HttpConfig::new(format!("http://{addr}/api"))).unwrap();
        assert!(matches!(repo.delete("").await, Err(RepoError::NotFound(_))));
        let pending = tokio::time::timeout(Duration::from_millis(50), listener.accept()).await;
        assert!(pending.is_err(), "no request should have been sent");
    }

    #[tokio::test]
    async fn create_posts_payload_and_decodes() {
        let body = json!({ "scenario": scenario_json("s-1") }).to_string();
        let (base, server) = one_shot_server("201 Created", body).await;
        let mut cfg = HttpConfig::new(base);
        cfg.bearer_token = Some("tok".into());
        let repo = HttpScenarioRepository::new(cfg).unwrap();
        let created = repo.create(&payload()).await.unwrap();
        assert_eq!(created.id, "s-1");
        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /api/scenarios "));
        assert!(raw.to_ascii_lowercase().contains("authorization: bearer tok"));
        assert!(raw.contains("\"name\":\"Plan\""));
    }

    #[tokio::test]
    async fn server_error_maps_to_http_error() {
        let body = json!({ "error": "database unavailable" }).to_string();
        let (base, server) = one_shot_server("500 Internal Server Error", body).await;
        let repo = HttpScenarioRepository::new(HttpConfig::new(base)).unwrap();
        let err = repo.create(&payload()).await.unwrap_err();
        assert_eq!(
            err,
            RepoError::Http {
                status: 500,
                message: "database unavailable".into()
            }
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn list_decodes_envelope() {
        let body = json!({ "scenarios": [scenario_json("a"), scenario_json("b")] }).to_string();
        let (base, server) = one_shot_server("200 OK", body).await;
        let repo = HttpScenarioRepository::new(HttpConfig::new(base)).unwrap();
        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(server.await.unwrap().starts_with("GET /api/scenarios "));
    }

    #[tokio::test]
    async fn missing_scenario_is_not_found() {
        let (base, server) = one_shot_server("404 Not Found", String::new()).await;
        let repo = HttpScenarioRepository::new(HttpConfig::new(base)).unwrap();
        assert!(matches!(repo.get("nope").await, Err(RepoError::NotFound(_))));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let repo = HttpScenarioRepository::new(HttpConfig::new(format!("http://{addr}"))).unwrap();
        assert!(matches!(repo.list().await, Err(RepoError::Transport(_))));
    }
}
