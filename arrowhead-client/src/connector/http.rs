use std::time::Duration;
use arrowhead_shared::{CoreSystem, ServerConfig};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use super::{parse_payload, Connector, CoreRequest, CoreResponse};
use crate::credentials::Pkcs12Credentials;
use crate::error::{ClientError, Result};

/// Timeout applied to every Core request unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// reqwest-backed connector.
///
/// # Example
///
/// ```no_run
/// use arrowhead_client::{HttpConnector, Pkcs12Credentials, DEFAULT_TIMEOUT};
/// use arrowhead_shared::ServerConfig;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Pkcs12Credentials::new(
///     "certs/sensor.p12",
///     "secret",
///     "certs/sensor.pub",
///     "certs/ca.pem",
/// );
/// let connector = HttpConnector::pkcs12(ServerConfig::default(), &credentials, DEFAULT_TIMEOUT)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpConnector {
    server: ServerConfig,
    http: HttpClient,
}

impl HttpConnector {
    /// Connector without a client certificate.
    ///
    /// # Errors
    ///
    /// Returns an error if a Core URL is not http(s) or the HTTP client
    /// cannot be created.
    pub fn new(server: ServerConfig, timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Self::from_client(server, http)
    }

    /// Connector authenticating with a PKCS#12 client certificate and
    /// trusting only the configured certificate authority.
    pub fn pkcs12(
        server: ServerConfig,
        credentials: &Pkcs12Credentials,
        timeout: Duration,
    ) -> Result<Self> {
        let http = HttpClient::builder()
            .use_native_tls()
            .identity(credentials.identity()?)
            .add_root_certificate(credentials.ca_certificate()?)
            .timeout(timeout)
            .build()?;

        tracing::debug!(p12file = %credentials.p12file.display(), "Loaded client certificate");
        Self::from_client(server, http)
    }

    /// Wrap an already configured reqwest client.
    pub fn from_client(server: ServerConfig, http: HttpClient) -> Result<Self> {
        for core in CoreSystem::ALL {
            let url = server.url(core);
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ClientError::InvalidUrl(format!(
                    "{} URL must start with http:// or https://, got: {}",
                    core, url
                )));
            }
        }

        Ok(Self { server, http })
    }
}

#[async_trait]
impl Connector for HttpConnector {
    fn server(&self) -> &ServerConfig {
        &self.server
    }

    async fn send(&self, request: CoreRequest) -> Result<CoreResponse> {
        let mut builder = self.http.request(request.method(), &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(CoreResponse::new(status, parse_payload(&body)))
    }
}
