use reqwest::Client;
use std::time::Duration;

/// Rate-limited GET client. Every request waits `delay` before it is sent,
/// and any failure is logged and reported as `None`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    delay: Duration,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration, delay: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client, delay })
    }

    pub async fn fetch(&self, url: &str) -> Option<String> {
        tokio::time::sleep(self.delay).await;
        log::info!("Fetching {}", url);

        match self.get_html(url).await {
            Ok(html) => Some(html),
            Err(e) => {
                log::error!("Error fetching {}: {}", url, e);
                None
            }
        }
    }

    async fn get_html(&self, url: &str) -> Result<String, reqwest::Error> {
        self.client
            .get(url)
            .send()
            .await
            .inspect_err(|e| log::debug!("HTTP error: {e:?}"))?
            .error_for_status()?
            .text()
            .await
            .inspect_err(|e| log::debug!("Decode error: {e:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher(delay: Duration) -> HttpFetcher {
        HttpFetcher::new("idleg-test", Duration::from_secs(5), delay).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/senate/membership/"))
            .and(header("user-agent", "idleg-test"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/senate/membership/", mock_server.uri());
        let body = fetcher(Duration::ZERO).fetch(&url).await;

        assert_eq!(body.as_deref(), Some("<html>ok</html>"));
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/house/membership/", mock_server.uri());
        assert!(fetcher(Duration::ZERO).fetch(&url).await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_not_found_is_none() {
        let mock_server = MockServer::start().await;

        let url = format!("{}/missing/", mock_server.uri());
        assert!(fetcher(Duration::ZERO).fetch(&url).await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let fetcher =
            HttpFetcher::new("idleg-test", Duration::from_millis(200), Duration::ZERO).unwrap();
        let url = format!("{}/senate/membership/", mock_server.uri());

        assert!(fetcher.fetch(&url).await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_none() {
        let fetcher = fetcher(Duration::ZERO);
        assert!(fetcher.fetch("http://127.0.0.1:1/").await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_waits_before_every_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&mock_server)
            .await;

        let fetcher = fetcher(Duration::from_millis(150));
        let url = mock_server.uri();

        let started = Instant::now();
        fetcher.fetch(&url).await;
        assert!(started.elapsed() >= Duration::from_millis(150));

        let started = Instant::now();
        fetcher.fetch(&url).await;
        assert!(started.elapsed() >= Duration::from_millis(150));
    }
}
