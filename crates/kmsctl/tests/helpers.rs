//! Test helpers: an in-process control plane speaking the wire protocol.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use futures::{SinkExt, StreamExt};
use kmsctl_proto::{
    EmptyResponse, KeyMetadata, KeyMetadataResponse, KeySpec, KeyState, KeyUsage, KmsRequest,
    KmsResponse, ReplyEnvelope, RequestEnvelope,
};
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

/// What the fake control plane sends back for one request.
pub enum Reply {
    /// A well-formed response.
    Response(KmsResponse),
    /// A service rejection.
    Fault(&'static str, &'static str),
    /// A raw text frame.
    Raw(String),
    /// Nothing at all.
    Silence,
}

type Handler = dyn Fn(&KmsRequest) -> Reply + Send + Sync;

/// Control plane running on its own thread and runtime, so both sync
/// binary tests and async client tests can use it.
pub struct FakeControlPlane {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RequestEnvelope>>>,
    connections: Arc<AtomicUsize>,
}

impl FakeControlPlane {
    /// Start serving; `handler` answers every request.
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&KmsRequest) -> Reply + Send + Sync + 'static,
    {
        let handler: Arc<Handler> = Arc::new(handler);
        let requests = Arc::new(Mutex::new(vec![]));
        let connections = Arc::new(AtomicUsize::new(0));
        let (addr_tx, addr_rx) = mpsc::channel();

        let (recorded, accepted) = (requests.clone(), connections.clone());
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("runtime");
            runtime.block_on(async move {
                let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
                addr_tx.send(listener.local_addr().expect("addr")).expect("send addr");

                while let Ok((stream, _)) = listener.accept().await {
                    accepted.fetch_add(1, Ordering::SeqCst);
                    let (handler, recorded) = (handler.clone(), recorded.clone());
                    tokio::spawn(async move {
                        let Ok(mut ws) = accept_async(stream).await else {
                            return;
                        };
                        while let Some(Ok(Message::Text(text))) = ws.next().await {
                            let envelope = RequestEnvelope::from_json(&text).expect("request");
                            let reply = handler(&envelope.request);
                            let id = envelope.request_id;
                            recorded.lock().expect("lock").push(envelope);

                            let frame = match reply {
                                Reply::Response(response) => {
                                    ReplyEnvelope::ok(id, response).to_json().expect("encode")
                                }
                                Reply::Fault(code, message) => {
                                    ReplyEnvelope::error(id, code, message).to_json().expect("encode")
                                }
                                Reply::Raw(text) => text,
                                Reply::Silence => continue,
                            };
                            if ws.send(Message::Text(frame)).await.is_err() {
                                return;
                            }
                        }
                    });
                }
            });
        });

        let addr = addr_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("server address");
        Self {
            addr,
            requests,
            connections,
        }
    }

    /// WebSocket URL of this server.
    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<RequestEnvelope> {
        self.requests.lock().expect("lock").clone()
    }

    /// Connections accepted so far.
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

/// A plausible key description.
pub fn key_metadata(key_id: &str) -> KeyMetadata {
    KeyMetadata {
        key_id: key_id.to_string(),
        arn: format!("arn:kms:eu-west-1:111122223333:key/{key_id}"),
        creation_date: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().expect("date"),
        enabled: true,
        description: "integration key".into(),
        key_usage: KeyUsage::EncryptDecrypt,
        key_spec: KeySpec::SymmetricDefault,
        key_state: KeyState::Enabled,
        deletion_date: None,
        pending_deletion_window_in_days: None,
    }
}

/// Answers `DescribeKey` with [`key_metadata`], `DeleteAlias` with an empty
/// payload and rejects everything else.
pub fn describe_and_delete(request: &KmsRequest) -> Reply {
    match request {
        KmsRequest::DescribeKey(req) if req.key_id == "missing" => {
            Reply::Fault("NotFoundException", "Key 'missing' does not exist")
        }
        KmsRequest::DescribeKey(req) => Reply::Response(KmsResponse::DescribeKey(
            KeyMetadataResponse {
                key_metadata: key_metadata(&req.key_id),
            },
        )),
        KmsRequest::DeleteAlias(_) => Reply::Response(KmsResponse::DeleteAlias(EmptyResponse {})),
        _ => Reply::Fault("UnsupportedOperationException", "not implemented by the fake"),
    }
}
