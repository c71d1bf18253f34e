//! Request and reply messages for key and alias operations.
//!
//! # Example
//!
//! ```rust
//! use kmsctl_proto::{KeyIdRequest, KmsRequest, RequestEnvelope};
//!
//! let request = KmsRequest::DescribeKey(KeyIdRequest { key_id: "1234abcd".into() });
//! let envelope = RequestEnvelope::new(request, Some("eu-west-1".into()));
//! let json = envelope.to_json().unwrap();
//! assert!(json.contains(r#""operation":"DescribeKey""#));
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::types::{AliasListEntry, KeyListEntry, KeyMetadata, KeySpec, KeyState, KeyUsage};
use crate::ProtoError;

/// Protocol version spoken by this crate.
pub const PROTOCOL_VERSION: u32 = 1;

/// Remote operations exposed by the control plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Create a new key.
    CreateKey,
    /// Describe a single key.
    DescribeKey,
    /// List keys, one page at a time.
    ListKeys,
    /// Replace a key's description.
    UpdateKeyDescription,
    /// Enable a disabled key.
    EnableKey,
    /// Disable a key.
    DisableKey,
    /// Schedule a key for deletion after a waiting period.
    ScheduleKeyDeletion,
    /// Cancel a pending deletion, restoring the key in a disabled state.
    CancelKeyDeletion,
    /// Report whether automatic rotation is enabled.
    GetKeyRotationStatus,
    /// Turn on automatic rotation.
    EnableKeyRotation,
    /// Turn off automatic rotation.
    DisableKeyRotation,
    /// Create an alias for a key.
    CreateAlias,
    /// Point an existing alias at another key.
    UpdateAlias,
    /// Delete an alias.
    DeleteAlias,
    /// List aliases, one page at a time.
    ListAliases,
}

impl Operation {
    /// Returns the wire name of the operation.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateKey => "CreateKey",
            Self::DescribeKey => "DescribeKey",
            Self::ListKeys => "ListKeys",
            Self::UpdateKeyDescription => "UpdateKeyDescription",
            Self::EnableKey => "EnableKey",
            Self::DisableKey => "DisableKey",
            Self::ScheduleKeyDeletion => "ScheduleKeyDeletion",
            Self::CancelKeyDeletion => "CancelKeyDeletion",
            Self::GetKeyRotationStatus => "GetKeyRotationStatus",
            Self::EnableKeyRotation => "EnableKeyRotation",
            Self::DisableKeyRotation => "DisableKeyRotation",
            Self::CreateAlias => "CreateAlias",
            Self::UpdateAlias => "UpdateAlias",
            Self::DeleteAlias => "DeleteAlias",
            Self::ListAliases => "ListAliases",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Request carrying only a key identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyIdRequest {
    /// Key id, key ARN, alias name or alias ARN.
    pub key_id: String,
}

/// Parameters for creating a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateKeyRequest {
    /// Description stored with the key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Permitted usage; the service default applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_usage: Option<KeyUsage>,
    /// Key material type; the service default applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_spec: Option<KeySpec>,
}

/// Page request for listing keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListKeysRequest {
    /// Maximum number of entries in the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Continuation cursor from a previous page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}

/// Page request for listing aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListAliasesRequest {
    /// Only list aliases pointing at this key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    /// Maximum number of entries in the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Continuation cursor from a previous page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}

/// Replace a key's description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateKeyDescriptionRequest {
    /// Target key.
    pub key_id: String,
    /// New description.
    pub description: String,
}

/// Schedule a key for deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleKeyDeletionRequest {
    /// Target key.
    pub key_id: String,
    /// Waiting period in days; the service default applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_window_in_days: Option<u32>,
}

/// Turn on automatic rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnableKeyRotationRequest {
    /// Target key.
    pub key_id: String,
    /// Rotation period in days; the service default applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_period_in_days: Option<u32>,
}

/// Create or retarget an alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AliasRequest {
    /// Alias name, prefixed with `alias/`.
    pub alias_name: String,
    /// Key the alias should point at.
    pub target_key_id: String,
}

/// Delete an alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteAliasRequest {
    /// Alias name, prefixed with `alias/`.
    pub alias_name: String,
}

/// A typed request for one remote operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", content = "payload")]
pub enum KmsRequest {
    /// See [`Operation::CreateKey`].
    CreateKey(CreateKeyRequest),
    /// See [`Operation::DescribeKey`].
    DescribeKey(KeyIdRequest),
    /// See [`Operation::ListKeys`].
    ListKeys(ListKeysRequest),
    /// See [`Operation::UpdateKeyDescription`].
    UpdateKeyDescription(UpdateKeyDescriptionRequest),
    /// See [`Operation::EnableKey`].
    EnableKey(KeyIdRequest),
    /// See [`Operation::DisableKey`].
    DisableKey(KeyIdRequest),
    /// See [`Operation::ScheduleKeyDeletion`].
    ScheduleKeyDeletion(ScheduleKeyDeletionRequest),
    /// See [`Operation::CancelKeyDeletion`].
    CancelKeyDeletion(KeyIdRequest),
    /// See [`Operation::GetKeyRotationStatus`].
    GetKeyRotationStatus(KeyIdRequest),
    /// See [`Operation::EnableKeyRotation`].
    EnableKeyRotation(EnableKeyRotationRequest),
    /// See [`Operation::DisableKeyRotation`].
    DisableKeyRotation(KeyIdRequest),
    /// See [`Operation::CreateAlias`].
    CreateAlias(AliasRequest),
    /// See [`Operation::UpdateAlias`].
    UpdateAlias(AliasRequest),
    /// See [`Operation::DeleteAlias`].
    DeleteAlias(DeleteAliasRequest),
    /// See [`Operation::ListAliases`].
    ListAliases(ListAliasesRequest),
}

impl KmsRequest {
    /// The operation this request invokes.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::CreateKey(_) => Operation::CreateKey,
            Self::DescribeKey(_) => Operation::DescribeKey,
            Self::ListKeys(_) => Operation::ListKeys,
            Self::UpdateKeyDescription(_) => Operation::UpdateKeyDescription,
            Self::EnableKey(_) => Operation::EnableKey,
            Self::DisableKey(_) => Operation::DisableKey,
            Self::ScheduleKeyDeletion(_) => Operation::ScheduleKeyDeletion,
            Self::CancelKeyDeletion(_) => Operation::CancelKeyDeletion,
            Self::GetKeyRotationStatus(_) => Operation::GetKeyRotationStatus,
            Self::EnableKeyRotation(_) => Operation::EnableKeyRotation,
            Self::DisableKeyRotation(_) => Operation::DisableKeyRotation,
            Self::CreateAlias(_) => Operation::CreateAlias,
            Self::UpdateAlias(_) => Operation::UpdateAlias,
            Self::DeleteAlias(_) => Operation::DeleteAlias,
            Self::ListAliases(_) => Operation::ListAliases,
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Response carrying a key description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyMetadataResponse {
    /// The key.
    pub key_metadata: KeyMetadata,
}

/// One page of keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListKeysResponse {
    /// Keys in this page.
    pub keys: Vec<KeyListEntry>,
    /// Cursor for the next page, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_marker: Option<String>,
    /// Whether more pages exist.
    #[serde(default)]
    pub truncated: bool,
}

/// One page of aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListAliasesResponse {
    /// Aliases in this page.
    pub aliases: Vec<AliasListEntry>,
    /// Cursor for the next page, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_marker: Option<String>,
    /// Whether more pages exist.
    #[serde(default)]
    pub truncated: bool,
}

/// Result of scheduling a key deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleKeyDeletionResponse {
    /// Key that was scheduled.
    pub key_id: String,
    /// When the key will be deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_date: Option<DateTime<Utc>>,
    /// New key state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_state: Option<KeyState>,
    /// Effective waiting period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_window_in_days: Option<u32>,
}

/// Result of cancelling a key deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CancelKeyDeletionResponse {
    /// Key that was restored.
    pub key_id: String,
}

/// Rotation status of a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyRotationStatusResponse {
    /// Whether automatic rotation is on.
    pub key_rotation_enabled: bool,
    /// Key the status belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    /// Rotation period in days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_period_in_days: Option<u32>,
    /// Next scheduled rotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_rotation_date: Option<DateTime<Utc>>,
}

/// Response of operations that return no payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyResponse {}

/// A typed response from one remote operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", content = "payload")]
pub enum KmsResponse {
    /// See [`Operation::CreateKey`].
    CreateKey(KeyMetadataResponse),
    /// See [`Operation::DescribeKey`].
    DescribeKey(KeyMetadataResponse),
    /// See [`Operation::ListKeys`].
    ListKeys(ListKeysResponse),
    /// See [`Operation::UpdateKeyDescription`].
    UpdateKeyDescription(EmptyResponse),
    /// See [`Operation::EnableKey`].
    EnableKey(EmptyResponse),
    /// See [`Operation::DisableKey`].
    DisableKey(EmptyResponse),
    /// See [`Operation::ScheduleKeyDeletion`].
    ScheduleKeyDeletion(ScheduleKeyDeletionResponse),
    /// See [`Operation::CancelKeyDeletion`].
    CancelKeyDeletion(CancelKeyDeletionResponse),
    /// See [`Operation::GetKeyRotationStatus`].
    GetKeyRotationStatus(KeyRotationStatusResponse),
    /// See [`Operation::EnableKeyRotation`].
    EnableKeyRotation(EmptyResponse),
    /// See [`Operation::DisableKeyRotation`].
    DisableKeyRotation(EmptyResponse),
    /// See [`Operation::CreateAlias`].
    CreateAlias(EmptyResponse),
    /// See [`Operation::UpdateAlias`].
    UpdateAlias(EmptyResponse),
    /// See [`Operation::DeleteAlias`].
    DeleteAlias(EmptyResponse),
    /// See [`Operation::ListAliases`].
    ListAliases(ListAliasesResponse),
}

impl KmsResponse {
    /// The operation that produced this response.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::CreateKey(_) => Operation::CreateKey,
            Self::DescribeKey(_) => Operation::DescribeKey,
            Self::ListKeys(_) => Operation::ListKeys,
            Self::UpdateKeyDescription(_) => Operation::UpdateKeyDescription,
            Self::EnableKey(_) => Operation::EnableKey,
            Self::DisableKey(_) => Operation::DisableKey,
            Self::ScheduleKeyDeletion(_) => Operation::ScheduleKeyDeletion,
            Self::CancelKeyDeletion(_) => Operation::CancelKeyDeletion,
            Self::GetKeyRotationStatus(_) => Operation::GetKeyRotationStatus,
            Self::EnableKeyRotation(_) => Operation::EnableKeyRotation,
            Self::DisableKeyRotation(_) => Operation::DisableKeyRotation,
            Self::CreateAlias(_) => Operation::CreateAlias,
            Self::UpdateAlias(_) => Operation::UpdateAlias,
            Self::DeleteAlias(_) => Operation::DeleteAlias,
            Self::ListAliases(_) => Operation::ListAliases,
        }
    }

    /// The response payload as a JSON object keyed by PascalCase field names.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized.
    pub fn payload(&self) -> Result<Value, ProtoError> {
        let mut tagged =
            serde_json::to_value(self).map_err(|e| ProtoError::Encoding(e.to_string()))?;
        tagged
            .get_mut("payload")
            .map(Value::take)
            .ok_or_else(|| ProtoError::Encoding("response has no payload".into()))
    }
}

// ============================================================================
// Envelopes
// ============================================================================

/// A request as it travels on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Correlates the reply with this request.
    pub request_id: Uuid,
    /// Protocol version spoken by the client.
    pub protocol_version: u32,
    /// Region the request is addressed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// The operation and its parameters.
    pub request: KmsRequest,
}

impl RequestEnvelope {
    /// Wrap a request with a fresh request id.
    #[must_use]
    pub fn new(request: KmsRequest, region: Option<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            protocol_version: PROTOCOL_VERSION,
            region,
            request,
        }
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, ProtoError> {
        serde_json::to_string(self).map_err(|e| ProtoError::Encoding(e.to_string()))
    }

    /// Deserialize from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> Result<Self, ProtoError> {
        serde_json::from_str(json).map_err(|e| ProtoError::Decoding(e.to_string()))
    }
}

/// Error reported by the service for a request it received but declined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceFault {
    /// Machine readable error code, e.g. `NotFoundException`.
    pub code: String,
    /// Human readable explanation.
    pub message: String,
}

/// A reply as it travels on the wire. Exactly one of `response` and
/// `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyEnvelope {
    /// Id of the request this reply answers.
    pub request_id: Uuid,
    /// Successful result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<KmsResponse>,
    /// Service-side rejection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ServiceFault>,
}

impl ReplyEnvelope {
    /// A successful reply.
    #[must_use]
    pub const fn ok(request_id: Uuid, response: KmsResponse) -> Self {
        Self {
            request_id,
            response: Some(response),
            error: None,
        }
    }

    /// A rejection.
    #[must_use]
    pub fn error(request_id: Uuid, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            request_id,
            response: None,
            error: Some(ServiceFault {
                code: code.into(),
                message: message.into(),
            }),
        }
    }

    /// Split into the service outcome.
    ///
    /// # Errors
    ///
    /// Returns the fault when the service declined the request, or a decoding
    /// error when the reply carries neither or both outcomes.
    pub fn into_result(self) -> Result<Result<KmsResponse, ServiceFault>, ProtoError> {
        match (self.response, self.error) {
            (Some(response), None) => Ok(Ok(response)),
            (None, Some(fault)) => Ok(Err(fault)),
            (Some(_), Some(_)) => Err(ProtoError::Decoding(
                "reply carries both a response and an error".into(),
            )),
            (None, None) => Err(ProtoError::Decoding(
                "reply carries neither a response nor an error".into(),
            )),
        }
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, ProtoError> {
        serde_json::to_string(self).map_err(|e| ProtoError::Encoding(e.to_string()))
    }

    /// Deserialize from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> Result<Self, ProtoError> {
        serde_json::from_str(json).map_err(|e| ProtoError::Decoding(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_envelope_omits_unset_fields() {
        let envelope = RequestEnvelope::new(
            KmsRequest::ListKeys(ListKeysRequest {
                limit: Some(50),
                marker: None,
            }),
            None,
        );
        let value: Value = serde_json::from_str(&envelope.to_json().expect("encode")).expect("json");

        assert_eq!(value["request"]["operation"], "ListKeys");
        assert_eq!(value["request"]["payload"]["Limit"], 50);
        assert!(value["request"]["payload"].get("Marker").is_none());
        assert!(value.get("region").is_none());
        assert_eq!(value["protocol_version"], PROTOCOL_VERSION);
    }

    #[test]
    fn request_envelope_decodes_what_it_encodes() {
        let envelope = RequestEnvelope::new(
            KmsRequest::DeleteAlias(DeleteAliasRequest {
                alias_name: "alias/Example".into(),
            }),
            Some("eu-west-1".into()),
        );
        let decoded = RequestEnvelope::from_json(&envelope.to_json().expect("encode")).expect("decode");
        assert_eq!(decoded, envelope);
        assert_eq!(decoded.request.operation(), Operation::DeleteAlias);
    }

    #[test]
    fn reply_with_error_splits_into_fault() {
        let json = r#"{
            "request_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "error": {"code": "NotFoundException", "message": "Alias alias/x is not found."}
        }"#;
        let reply = ReplyEnvelope::from_json(json).expect("decode");
        let fault = reply.into_result().expect("well formed").expect_err("fault");
        assert_eq!(fault.code, "NotFoundException");
    }

    #[test]
    fn reply_with_neither_outcome_is_malformed() {
        let reply = ReplyEnvelope {
            request_id: Uuid::new_v4(),
            response: None,
            error: None,
        };
        assert!(matches!(reply.into_result(), Err(ProtoError::Decoding(_))));
    }

    #[test]
    fn reply_decodes_list_page() {
        let json = r#"{
            "request_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "response": {
                "operation": "ListAliases",
                "payload": {
                    "Aliases": [{"AliasName": "alias/app", "AliasArn": "arn:kms:alias/app", "TargetKeyId": "k1"}],
                    "NextMarker": "page-2",
                    "Truncated": true
                }
            }
        }"#;
        let response = ReplyEnvelope::from_json(json)
            .expect("decode")
            .into_result()
            .expect("well formed")
            .expect("ok");

        match response {
            KmsResponse::ListAliases(page) => {
                assert_eq!(page.aliases.len(), 1);
                assert_eq!(page.next_marker.as_deref(), Some("page-2"));
                assert!(page.truncated);
            }
            other => panic!("expected ListAliases, got {other:?}"),
        }
    }

    #[test]
    fn payload_strips_operation_tag() {
        let response = KmsResponse::CancelKeyDeletion(CancelKeyDeletionResponse {
            key_id: "1234abcd".into(),
        });
        let payload = response.payload().expect("payload");
        assert_eq!(payload, serde_json::json!({"KeyId": "1234abcd"}));
    }

    #[test]
    fn empty_payload_is_empty_object() {
        let payload = KmsResponse::DeleteAlias(EmptyResponse {}).payload().expect("payload");
        assert_eq!(payload, serde_json::json!({}));
    }

    #[test]
    fn operation_names_match_serde_tags() {
        let request = KmsRequest::GetKeyRotationStatus(KeyIdRequest { key_id: "k".into() });
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["operation"], request.operation().name());
        assert_eq!(
            serde_json::to_value(Operation::ScheduleKeyDeletion).expect("serialize"),
            "ScheduleKeyDeletion"
        );
    }

    proptest::proptest! {
        #[test]
        fn prop_garbage_replies_are_decoding_errors(text in "\\PC{0,64}") {
            if let Err(err) = ReplyEnvelope::from_json(&text) {
                proptest::prop_assert!(matches!(err, ProtoError::Decoding(_)));
            }
        }

        #[test]
        fn prop_request_ids_survive_the_wire(key_id in "[a-zA-Z0-9/_-]{1,40}") {
            let envelope = RequestEnvelope::new(
                KmsRequest::DescribeKey(KeyIdRequest { key_id }),
                None,
            );
            let decoded = RequestEnvelope::from_json(&envelope.to_json().expect("encode"))
                .expect("decode");
            proptest::prop_assert_eq!(decoded.request_id, envelope.request_id);
        }
    }
}
