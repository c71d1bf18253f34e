//! Key lifecycle and rotation operations.

use kmsctl_proto::{
    CreateKeyRequest, EnableKeyRotationRequest, KeyIdRequest, KeySpec, KeyUsage, KmsRequest,
    ListKeysRequest, Operation, ScheduleKeyDeletionRequest, UpdateKeyDescriptionRequest,
};

use super::{wire_u32, Cursor, Impact, InputSpec, OperationDescriptor, KEY_ID, LIMIT, MARKER};
use crate::context::ExecutionContext;
use crate::error::ValidationError;

const KEY_METADATA_FIELDS: &[&str] = &["KeyMetadata"];

/// Key operations, in help order.
pub static OPERATIONS: &[OperationDescriptor] = &[
    OperationDescriptor {
        operation: Operation::CreateKey,
        command: "create-key",
        about: "Create a new key",
        impact: Impact::Medium,
        inputs: &[
            InputSpec::optional("Description", "description", "Description stored with the key"),
            InputSpec::token("KeyUsage", "key-usage", "Permitted key usage", KeyUsage::TOKENS),
            InputSpec::token("KeySpec", "key-spec", "Key material type", KeySpec::TOKENS),
        ],
        response_fields: KEY_METADATA_FIELDS,
        default_field: Some("KeyMetadata"),
        cursor: None,
        target_fields: &["Description"],
        build: create_key,
    },
    OperationDescriptor {
        operation: Operation::DescribeKey,
        command: "get-key",
        about: "Show the metadata of a key",
        impact: Impact::None,
        inputs: &[KEY_ID],
        response_fields: KEY_METADATA_FIELDS,
        default_field: Some("KeyMetadata"),
        cursor: None,
        target_fields: &["KeyId"],
        build: describe_key,
    },
    OperationDescriptor {
        operation: Operation::ListKeys,
        command: "list-keys",
        about: "List keys, one page at a time",
        impact: Impact::None,
        inputs: &[LIMIT, MARKER],
        response_fields: &["Keys", "NextMarker", "Truncated"],
        default_field: Some("Keys"),
        cursor: Some(Cursor {
            field: "NextMarker",
            flag: "marker",
        }),
        target_fields: &[],
        build: list_keys,
    },
    OperationDescriptor {
        operation: Operation::UpdateKeyDescription,
        command: "update-key-description",
        about: "Replace the description of a key",
        impact: Impact::Medium,
        inputs: &[
            KEY_ID,
            InputSpec::required("Description", "description", "New description"),
        ],
        response_fields: &[],
        default_field: None,
        cursor: None,
        target_fields: &["KeyId"],
        build: update_key_description,
    },
    OperationDescriptor {
        operation: Operation::EnableKey,
        command: "enable-key",
        about: "Enable a key for use",
        impact: Impact::Medium,
        inputs: &[KEY_ID],
        response_fields: &[],
        default_field: None,
        cursor: None,
        target_fields: &["KeyId"],
        build: enable_key,
    },
    OperationDescriptor {
        operation: Operation::DisableKey,
        command: "disable-key",
        about: "Disable a key, blocking all use",
        impact: Impact::Medium,
        inputs: &[KEY_ID],
        response_fields: &[],
        default_field: None,
        cursor: None,
        target_fields: &["KeyId"],
        build: disable_key,
    },
    OperationDescriptor {
        operation: Operation::ScheduleKeyDeletion,
        command: "schedule-key-deletion",
        about: "Schedule a key for deletion after a waiting period",
        impact: Impact::High,
        inputs: &[
            KEY_ID,
            InputSpec::integer(
                "PendingWindowInDays",
                "pending-window-in-days",
                "Waiting period before deletion (7-30 days)",
                None,
                7,
                30,
            ),
        ],
        response_fields: &["KeyId", "DeletionDate", "KeyState", "PendingWindowInDays"],
        default_field: Some("DeletionDate"),
        cursor: None,
        target_fields: &["KeyId"],
        build: schedule_key_deletion,
    },
    OperationDescriptor {
        operation: Operation::CancelKeyDeletion,
        command: "cancel-key-deletion",
        about: "Cancel a scheduled deletion, restoring the key disabled",
        impact: Impact::Medium,
        inputs: &[KEY_ID],
        response_fields: &["KeyId"],
        default_field: Some("KeyId"),
        cursor: None,
        target_fields: &["KeyId"],
        build: cancel_key_deletion,
    },
    OperationDescriptor {
        operation: Operation::GetKeyRotationStatus,
        command: "get-key-rotation-status",
        about: "Show whether automatic rotation is enabled for a key",
        impact: Impact::None,
        inputs: &[KEY_ID],
        response_fields: &[
            "KeyRotationEnabled",
            "KeyId",
            "RotationPeriodInDays",
            "NextRotationDate",
        ],
        default_field: Some("KeyRotationEnabled"),
        cursor: None,
        target_fields: &["KeyId"],
        build: get_key_rotation_status,
    },
    OperationDescriptor {
        operation: Operation::EnableKeyRotation,
        command: "enable-key-rotation",
        about: "Turn on automatic rotation for a key",
        impact: Impact::Medium,
        inputs: &[
            KEY_ID,
            InputSpec::integer(
                "RotationPeriodInDays",
                "rotation-period-in-days",
                "Days between rotations (90-2560)",
                None,
                90,
                2560,
            ),
        ],
        response_fields: &[],
        default_field: None,
        cursor: None,
        target_fields: &["KeyId"],
        build: enable_key_rotation,
    },
    OperationDescriptor {
        operation: Operation::DisableKeyRotation,
        command: "disable-key-rotation",
        about: "Turn off automatic rotation for a key",
        impact: Impact::Medium,
        inputs: &[KEY_ID],
        response_fields: &[],
        default_field: None,
        cursor: None,
        target_fields: &["KeyId"],
        build: disable_key_rotation,
    },
];

fn key_id(ctx: &ExecutionContext) -> Result<KeyIdRequest, ValidationError> {
    Ok(KeyIdRequest {
        key_id: ctx.required_str("KeyId")?.to_string(),
    })
}

fn create_key(ctx: &ExecutionContext) -> Result<KmsRequest, ValidationError> {
    Ok(KmsRequest::CreateKey(CreateKeyRequest {
        description: ctx.str("Description").map(str::to_string),
        key_usage: ctx.parsed::<KeyUsage>("KeyUsage")?,
        key_spec: ctx.parsed::<KeySpec>("KeySpec")?,
    }))
}

fn describe_key(ctx: &ExecutionContext) -> Result<KmsRequest, ValidationError> {
    key_id(ctx).map(KmsRequest::DescribeKey)
}

fn list_keys(ctx: &ExecutionContext) -> Result<KmsRequest, ValidationError> {
    Ok(KmsRequest::ListKeys(ListKeysRequest {
        limit: wire_u32(ctx, "Limit")?,
        marker: ctx.str("Marker").map(str::to_string),
    }))
}

fn update_key_description(ctx: &ExecutionContext) -> Result<KmsRequest, ValidationError> {
    Ok(KmsRequest::UpdateKeyDescription(UpdateKeyDescriptionRequest {
        key_id: ctx.required_str("KeyId")?.to_string(),
        description: ctx.required_str("Description")?.to_string(),
    }))
}

fn enable_key(ctx: &ExecutionContext) -> Result<KmsRequest, ValidationError> {
    key_id(ctx).map(KmsRequest::EnableKey)
}

fn disable_key(ctx: &ExecutionContext) -> Result<KmsRequest, ValidationError> {
    key_id(ctx).map(KmsRequest::DisableKey)
}

fn schedule_key_deletion(ctx: &ExecutionContext) -> Result<KmsRequest, ValidationError> {
    Ok(KmsRequest::ScheduleKeyDeletion(ScheduleKeyDeletionRequest {
        key_id: ctx.required_str("KeyId")?.to_string(),
        pending_window_in_days: wire_u32(ctx, "PendingWindowInDays")?,
    }))
}

fn cancel_key_deletion(ctx: &ExecutionContext) -> Result<KmsRequest, ValidationError> {
    key_id(ctx).map(KmsRequest::CancelKeyDeletion)
}

fn get_key_rotation_status(ctx: &ExecutionContext) -> Result<KmsRequest, ValidationError> {
    key_id(ctx).map(KmsRequest::GetKeyRotationStatus)
}

fn enable_key_rotation(ctx: &ExecutionContext) -> Result<KmsRequest, ValidationError> {
    Ok(KmsRequest::EnableKeyRotation(EnableKeyRotationRequest {
        key_id: ctx.required_str("KeyId")?.to_string(),
        rotation_period_in_days: wire_u32(ctx, "RotationPeriodInDays")?,
    }))
}

fn disable_key_rotation(ctx: &ExecutionContext) -> Result<KmsRequest, ValidationError> {
    key_id(ctx).map(KmsRequest::DisableKeyRotation)
}
