//! RPC client for the key management control plane.
//!
//! [`KmsClient`] is the seam the command adapters call through; it is a
//! single-attempt `request -> response | error` call with no retries.
//! [`WsKmsClient`] implements it over WebSocket using the JSON envelopes
//! from `kmsctl-proto`.
//!
//! # Example
//!
//! ```rust,no_run
//! use kmsctl::client::{ClientSettings, KmsClient, WsKmsClient};
//! use kmsctl_proto::{KeyIdRequest, KmsRequest};
//!
//! # async fn example() -> Result<(), kmsctl::client::RpcError> {
//! let client = WsKmsClient::new(ClientSettings::new("ws://localhost:8443"));
//! let response = client
//!     .call(KmsRequest::DescribeKey(KeyIdRequest { key_id: "1234abcd".into() }))
//!     .await?;
//! println!("{:?}", response.operation());
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use kmsctl_proto::{KmsRequest, KmsResponse, ProtoError, ReplyEnvelope, RequestEnvelope};
use thiserror::Error;
use tokio::net::{lookup_host, TcpStream};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{client_async_tls, MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace, warn};

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Faults below the service layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The endpoint is not a usable WebSocket URL.
    #[error("invalid endpoint {url}: {reason}")]
    InvalidEndpoint {
        /// Endpoint as configured.
        url: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The endpoint host name did not resolve.
    #[error("could not resolve host {host}")]
    NameResolution {
        /// Host being resolved.
        host: String,
        /// Resolver error.
        #[source]
        source: std::io::Error,
    },

    /// TCP connection could not be established.
    #[error("could not connect to {addr}")]
    Connect {
        /// Address being connected to.
        addr: String,
        /// Socket error.
        #[source]
        source: std::io::Error,
    },

    /// The WebSocket upgrade failed.
    #[error("WebSocket handshake with {url} failed")]
    Handshake {
        /// Endpoint URL.
        url: String,
        /// Handshake error.
        #[source]
        source: tungstenite::Error,
    },

    /// A deadline elapsed.
    #[error("{0} timed out")]
    Timeout(String),

    /// The connection closed or broke mid-request.
    #[error("connection closed: {0}")]
    Closed(String),

    /// The peer sent something that is not a valid reply.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtoError),
}

impl TransportError {
    /// Whether the fault means the endpoint could not be reached at all, as
    /// opposed to a peer that answered with garbage.
    #[must_use]
    pub const fn is_connectivity(&self) -> bool {
        !matches!(self, Self::Protocol(_))
    }

    /// Network diagnostic advice for the user.
    #[must_use]
    pub const fn hint(&self) -> &'static str {
        match self {
            Self::InvalidEndpoint { .. } => {
                "Check the --endpoint value; it must be a ws:// or wss:// URL"
            }
            Self::NameResolution { .. } => {
                "Check the endpoint host name and your DNS configuration"
            }
            Self::Connect { .. } => {
                "Check that the endpoint is running and reachable from this network"
            }
            Self::Handshake { .. } => {
                "Check that the endpoint speaks WebSocket and that its TLS certificate is trusted"
            }
            Self::Timeout(_) => {
                "The endpoint did not answer in time; check connectivity or raise --request-timeout"
            }
            Self::Closed(_) => "The endpoint dropped the connection; retry the command",
            Self::Protocol(_) => "The endpoint sent a reply this client does not understand",
        }
    }
}

/// Outcome of a failed RPC call.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The request never got a service answer.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service answered with a rejection.
    #[error("{code}: {message}")]
    Service {
        /// Remote error code.
        code: String,
        /// Remote error message.
        message: String,
    },
}

/// One call per remote operation, single attempt.
pub trait KmsClient: Send + Sync {
    /// Send `request` and wait for its response.
    fn call(
        &self,
        request: KmsRequest,
    ) -> impl Future<Output = Result<KmsResponse, RpcError>> + Send;
}

/// Explicit connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// WebSocket endpoint URL.
    pub endpoint: String,
    /// Region every request is addressed to.
    pub region: Option<String>,
    /// Bound on name resolution, TCP connect and the WebSocket upgrade, each.
    pub connect_timeout: Duration,
    /// Bound on one request round-trip.
    pub request_timeout: Duration,
}

impl ClientSettings {
    /// Settings for `endpoint` with default timeouts and no region.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            region: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Address requests to `region`.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Override the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

/// WebSocket client; connects lazily on the first call.
pub struct WsKmsClient {
    settings: ClientSettings,
    ws: Mutex<Option<WsStream>>,
}

impl std::fmt::Debug for WsKmsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsKmsClient")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl WsKmsClient {
    /// Create a client. No network activity happens until the first call.
    #[must_use]
    pub fn new(settings: ClientSettings) -> Self {
        Self {
            settings,
            ws: Mutex::new(None),
        }
    }

    /// The settings this client was built with.
    #[must_use]
    pub const fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    async fn connect(&self) -> Result<WsStream, TransportError> {
        let url = self.settings.endpoint.clone();
        let connect_timeout = self.settings.connect_timeout;

        let request = url
            .as_str()
            .into_client_request()
            .map_err(|e| TransportError::InvalidEndpoint {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        let uri = request.uri();
        let default_port = match uri.scheme_str() {
            Some("ws") => 80,
            Some("wss") => 443,
            _ => {
                return Err(TransportError::InvalidEndpoint {
                    url,
                    reason: "must start with ws:// or wss://".into(),
                });
            }
        };
        let host = uri
            .host()
            .map(|h| h.trim_start_matches('[').trim_end_matches(']').to_string())
            .ok_or_else(|| TransportError::InvalidEndpoint {
                url: url.clone(),
                reason: "missing host".into(),
            })?;
        let port = uri.port_u16().unwrap_or(default_port);

        debug!(host = %host, port, "resolving endpoint");
        let addrs: Vec<SocketAddr> = timeout(connect_timeout, lookup_host((host.as_str(), port)))
            .await
            .map_err(|_| TransportError::Timeout(format!("resolving {host}")))?
            .map_err(|source| TransportError::NameResolution {
                host: host.clone(),
                source,
            })?
            .collect();
        if addrs.is_empty() {
            return Err(TransportError::NameResolution {
                host,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses found"),
            });
        }

        debug!(?addrs, "connecting to endpoint");
        let stream = timeout(connect_timeout, TcpStream::connect(&addrs[..]))
            .await
            .map_err(|_| TransportError::Timeout(format!("connecting to {host}:{port}")))?
            .map_err(|source| TransportError::Connect {
                addr: format!("{host}:{port}"),
                source,
            })?;

        let (ws, _response) = timeout(connect_timeout, client_async_tls(request, stream))
            .await
            .map_err(|_| TransportError::Timeout(format!("WebSocket handshake with {url}")))?
            .map_err(|source| TransportError::Handshake {
                url: url.clone(),
                source,
            })?;

        debug!(url = %url, "WebSocket connected");
        Ok(ws)
    }

    async fn round_trip(
        &self,
        ws: &mut WsStream,
        envelope: &RequestEnvelope,
    ) -> Result<ReplyEnvelope, TransportError> {
        let operation = envelope.request.operation();
        let json = envelope.to_json()?;

        trace!(%operation, request_id = %envelope.request_id, "sending request");
        ws.send(Message::Text(json)).await.map_err(closed)?;

        let reply = timeout(self.settings.request_timeout, read_reply(ws))
            .await
            .map_err(|_| TransportError::Timeout(format!("request '{operation}'")))??;

        if reply.request_id != envelope.request_id {
            return Err(TransportError::Protocol(ProtoError::Decoding(format!(
                "reply for request {} while waiting for {}",
                reply.request_id, envelope.request_id
            ))));
        }

        trace!(%operation, "received reply");
        Ok(reply)
    }
}

impl KmsClient for WsKmsClient {
    async fn call(&self, request: KmsRequest) -> Result<KmsResponse, RpcError> {
        let envelope = RequestEnvelope::new(request, self.settings.region.clone());

        let mut guard = self.ws.lock().await;
        if guard.is_none() {
            *guard = Some(self.connect().await?);
        }
        let Some(ws) = guard.as_mut() else {
            return Err(TransportError::Closed("no connection".into()).into());
        };

        let reply = match self.round_trip(ws, &envelope).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "dropping connection after transport fault");
                *guard = None;
                return Err(e.into());
            }
        };

        match reply.into_result().map_err(TransportError::from)? {
            Ok(response) => Ok(response),
            Err(fault) => Err(RpcError::Service {
                code: fault.code,
                message: fault.message,
            }),
        }
    }
}

/// Wait for the next text frame, skipping control frames.
async fn read_reply(ws: &mut WsStream) -> Result<ReplyEnvelope, TransportError> {
    loop {
        let frame = ws
            .next()
            .await
            .ok_or_else(|| TransportError::Closed("connection closed".into()))?
            .map_err(closed)?;
        match frame {
            Message::Text(text) => return Ok(ReplyEnvelope::from_json(&text)?),
            Message::Ping(_) | Message::Pong(_) => {}
            Message::Close(_) => {
                return Err(TransportError::Closed("connection closed by server".into()));
            }
            Message::Binary(_) | Message::Frame(_) => {
                return Err(TransportError::Protocol(ProtoError::Decoding(
                    "unexpected binary message".into(),
                )));
            }
        }
    }
}

fn closed(err: tungstenite::Error) -> TransportError {
    TransportError::Closed(err.to_string())
}
