//! # kmsctl-proto
//!
//! Wire protocol between `kmsctl` and a key management control plane.
//!
//! Every remote operation is one request/reply exchange. Requests and
//! replies travel as JSON text frames:
//!
//! ```text
//! ┌────────┐   RequestEnvelope    ┌───────────────┐
//! │ kmsctl │─────────────────────►│ control plane │
//! │        │◄─────────────────────│               │
//! └────────┘    ReplyEnvelope     └───────────────┘
//! ```
//!
//! Payload field names are PascalCase (`KeyId`, `NextMarker`, ...), which is
//! also the vocabulary the CLI uses for output selectors.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod messages;
pub mod types;

pub use error::ProtoError;
pub use messages::{
    AliasRequest, CancelKeyDeletionResponse, CreateKeyRequest, DeleteAliasRequest,
    EmptyResponse, EnableKeyRotationRequest, KeyIdRequest, KeyMetadataResponse,
    KeyRotationStatusResponse, KmsRequest, KmsResponse, ListAliasesRequest, ListAliasesResponse,
    ListKeysRequest, ListKeysResponse, Operation, ReplyEnvelope, RequestEnvelope,
    ScheduleKeyDeletionRequest, ScheduleKeyDeletionResponse, ServiceFault,
    UpdateKeyDescriptionRequest, PROTOCOL_VERSION,
};
pub use types::{AliasListEntry, KeyListEntry, KeyMetadata, KeySpec, KeyState, KeyUsage};
