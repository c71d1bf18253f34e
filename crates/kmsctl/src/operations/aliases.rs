//! Alias operations.

use kmsctl_proto::{AliasRequest, DeleteAliasRequest, KmsRequest, ListAliasesRequest, Operation};

use super::{wire_u32, Cursor, Impact, InputSpec, OperationDescriptor, LIMIT, MARKER};
use crate::context::ExecutionContext;
use crate::error::ValidationError;

const ALIAS_NAME: InputSpec = InputSpec::required(
    "AliasName",
    "alias-name",
    "Alias name, starting with alias/",
);

const TARGET_KEY_ID: InputSpec = InputSpec::required(
    "TargetKeyId",
    "target-key-id",
    "Key id or key ARN the alias points at",
);

/// Alias operations, in help order.
pub static OPERATIONS: &[OperationDescriptor] = &[
    OperationDescriptor {
        operation: Operation::CreateAlias,
        command: "create-alias",
        about: "Create an alias for a key",
        impact: Impact::Medium,
        inputs: &[ALIAS_NAME, TARGET_KEY_ID],
        response_fields: &[],
        default_field: None,
        cursor: None,
        target_fields: &["AliasName", "TargetKeyId"],
        build: create_alias,
    },
    OperationDescriptor {
        operation: Operation::UpdateAlias,
        command: "update-alias",
        about: "Point an existing alias at a different key",
        impact: Impact::Medium,
        inputs: &[ALIAS_NAME, TARGET_KEY_ID],
        response_fields: &[],
        default_field: None,
        cursor: None,
        target_fields: &["AliasName", "TargetKeyId"],
        build: update_alias,
    },
    OperationDescriptor {
        operation: Operation::DeleteAlias,
        command: "delete-alias",
        about: "Delete an alias; the key itself is unaffected",
        impact: Impact::High,
        inputs: &[ALIAS_NAME],
        response_fields: &[],
        default_field: None,
        cursor: None,
        target_fields: &["AliasName"],
        build: delete_alias,
    },
    OperationDescriptor {
        operation: Operation::ListAliases,
        command: "list-aliases",
        about: "List aliases, one page at a time",
        impact: Impact::None,
        inputs: &[
            InputSpec::optional("KeyId", "key-id", "Only list aliases of this key"),
            LIMIT,
            MARKER,
        ],
        response_fields: &["Aliases", "NextMarker", "Truncated"],
        default_field: Some("Aliases"),
        cursor: Some(Cursor {
            field: "NextMarker",
            flag: "marker",
        }),
        target_fields: &[],
        build: list_aliases,
    },
];

fn alias(ctx: &ExecutionContext) -> Result<AliasRequest, ValidationError> {
    Ok(AliasRequest {
        alias_name: ctx.required_str("AliasName")?.to_string(),
        target_key_id: ctx.required_str("TargetKeyId")?.to_string(),
    })
}

fn create_alias(ctx: &ExecutionContext) -> Result<KmsRequest, ValidationError> {
    alias(ctx).map(KmsRequest::CreateAlias)
}

fn update_alias(ctx: &ExecutionContext) -> Result<KmsRequest, ValidationError> {
    alias(ctx).map(KmsRequest::UpdateAlias)
}

fn delete_alias(ctx: &ExecutionContext) -> Result<KmsRequest, ValidationError> {
    Ok(KmsRequest::DeleteAlias(DeleteAliasRequest {
        alias_name: ctx.required_str("AliasName")?.to_string(),
    }))
}

fn list_aliases(ctx: &ExecutionContext) -> Result<KmsRequest, ValidationError> {
    Ok(KmsRequest::ListAliases(ListAliasesRequest {
        key_id: ctx.str("KeyId").map(str::to_string),
        limit: wire_u32(ctx, "Limit")?,
        marker: ctx.str("Marker").map(str::to_string),
    }))
}
