//! Test doubles shared by the unit tests.

use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use kmsctl_proto::{
    EmptyResponse, KeyMetadata, KeyMetadataResponse, KeySpec, KeyState, KeyUsage, KmsRequest,
    KmsResponse, Operation,
};

use crate::client::{KmsClient, RpcError};

type Responder = dyn Fn(&KmsRequest) -> Result<KmsResponse, RpcError> + Send + Sync;

/// Fake client answering from a closure and recording every request.
pub struct StubClient {
    respond: Box<Responder>,
    calls: Arc<Mutex<Vec<KmsRequest>>>,
}

impl StubClient {
    /// Answer every request with `respond`.
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&KmsRequest) -> Result<KmsResponse, RpcError> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            calls: Arc::new(Mutex::new(vec![])),
        }
    }

    /// Answer every request with an empty payload of the matching operation.
    pub fn empty() -> Self {
        Self::new(|request| Ok(empty_response(request.operation())))
    }

    /// Number of requests sent so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("lock").len()
    }

    /// Requests sent so far.
    pub fn calls(&self) -> Vec<KmsRequest> {
        self.calls.lock().expect("lock").clone()
    }
}

impl KmsClient for StubClient {
    async fn call(&self, request: KmsRequest) -> Result<KmsResponse, RpcError> {
        let result = (self.respond)(&request);
        self.calls.lock().expect("lock").push(request);
        result
    }
}

/// Client whose calls never complete.
pub struct PendingClient;

impl KmsClient for PendingClient {
    async fn call(&self, _request: KmsRequest) -> Result<KmsResponse, RpcError> {
        futures::future::pending().await
    }
}

/// A plausible key description.
pub fn key_metadata(key_id: &str) -> KeyMetadata {
    KeyMetadata {
        key_id: key_id.to_string(),
        arn: format!("arn:kms:eu-west-1:111122223333:key/{key_id}"),
        creation_date: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().expect("date"),
        enabled: true,
        description: "test key".into(),
        key_usage: KeyUsage::EncryptDecrypt,
        key_spec: KeySpec::SymmetricDefault,
        key_state: KeyState::Enabled,
        deletion_date: None,
        pending_deletion_window_in_days: None,
    }
}

/// `DescribeKey` response for `key_id`.
pub fn describe_response(key_id: &str) -> KmsResponse {
    KmsResponse::DescribeKey(KeyMetadataResponse {
        key_metadata: key_metadata(key_id),
    })
}

/// Payload-less response for `operation`; panics for operations that carry
/// one.
pub fn empty_response(operation: Operation) -> KmsResponse {
    let empty = EmptyResponse {};
    match operation {
        Operation::UpdateKeyDescription => KmsResponse::UpdateKeyDescription(empty),
        Operation::EnableKey => KmsResponse::EnableKey(empty),
        Operation::DisableKey => KmsResponse::DisableKey(empty),
        Operation::EnableKeyRotation => KmsResponse::EnableKeyRotation(empty),
        Operation::DisableKeyRotation => KmsResponse::DisableKeyRotation(empty),
        Operation::CreateAlias => KmsResponse::CreateAlias(empty),
        Operation::UpdateAlias => KmsResponse::UpdateAlias(empty),
        Operation::DeleteAlias => KmsResponse::DeleteAlias(empty),
        other => panic!("{other} has a payload"),
    }
}
