// RPC error taxonomy shared by every handler and hook
use serde_json::{json, Value};
use thiserror::Error;

/// Status codes understood by runtime callers (gRPC status space)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum RpcCode {
    Ok = 0,                 // OK
    Cancelled = 1,          // The operation was cancelled (typically by the caller).
    Unknown = 2,            // Unknown error; mostly used when an error is not categorized.
    InvalidArgument = 3,    // Client specified an invalid argument.
    DeadlineExceeded = 4,   // Deadline expired before the operation could complete.
    NotFound = 5,           // Some requested entity was not found.
    AlreadyExists = 6,      // The entity that a client attempted to create already exists.
    PermissionDenied = 7,   // The caller does not have permission to execute the specified operation.
    ResourceExhausted = 8,  // Some resource has been exhausted, like a quota.
    FailedPrecondition = 9, // The system is not in a state required for the operation.
    Aborted = 10,           // Aborted, typically due to a concurrency issue like a transaction failure.
    OutOfRange = 11,        // Operation was attempted past the valid range.
    Unimplemented = 12,     // Operation is not implemented or not supported/enabled.
    Internal = 13,          // Internal errors; these should be rare.
    Unavailable = 14,       // Service is currently unavailable.
    DataLoss = 15,          // Unrecoverable data loss or corruption.
    Unauthenticated = 16,   // The request does not have valid authentication credentials.
}

impl RpcCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Canonical upper-case name, e.g. `NOT_FOUND`
    pub fn name(self) -> &'static str {
        match self {
            RpcCode::Ok => "OK",
            RpcCode::Cancelled => "CANCELLED",
            RpcCode::Unknown => "UNKNOWN",
            RpcCode::InvalidArgument => "INVALID_ARGUMENT",
            RpcCode::DeadlineExceeded => "DEADLINE_EXCEEDED",
            RpcCode::NotFound => "NOT_FOUND",
            RpcCode::AlreadyExists => "ALREADY_EXISTS",
            RpcCode::PermissionDenied => "PERMISSION_DENIED",
            RpcCode::ResourceExhausted => "RESOURCE_EXHAUSTED",
            RpcCode::FailedPrecondition => "FAILED_PRECONDITION",
            RpcCode::Aborted => "ABORTED",
            RpcCode::OutOfRange => "OUT_OF_RANGE",
            RpcCode::Unimplemented => "UNIMPLEMENTED",
            RpcCode::Internal => "INTERNAL",
            RpcCode::Unavailable => "UNAVAILABLE",
            RpcCode::DataLoss => "DATA_LOSS",
            RpcCode::Unauthenticated => "UNAUTHENTICATED",
        }
    }
}

/// Closed set of failures an RPC or hook may report to its caller.
///
/// Lower-level errors (storage, SQL, JSON) are logged where they happen and
/// replaced by one of these; their text never reaches the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RpcError {
    #[error("user not found")]
    UserNotFound,

    #[error("not found")]
    NotFound,

    #[error("metadata size limit can not exceed 16KB")]
    MetadataSizeLimit,

    #[error("unmarshalling error")]
    UnmarshallingError,

    #[error("marshalling error")]
    MarshallingError,

    #[error("internal error")]
    InternalError,

    #[error("rpc is only callable via server to server")]
    S2SPermissionDenied,
}

impl RpcError {
    /// Wire status code bound to this kind
    pub fn code(&self) -> RpcCode {
        match self {
            RpcError::UserNotFound => RpcCode::NotFound,
            RpcError::NotFound => RpcCode::NotFound,
            RpcError::MetadataSizeLimit => RpcCode::InvalidArgument,
            RpcError::UnmarshallingError => RpcCode::Internal,
            RpcError::MarshallingError => RpcCode::Internal,
            RpcError::InternalError => RpcCode::Internal,
            RpcError::S2SPermissionDenied => RpcCode::PermissionDenied,
        }
    }

    /// Client-safe message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Variant name, shown next to the message in operator output
    pub fn kind(&self) -> &'static str {
        match self {
            RpcError::UserNotFound => "UserNotFound",
            RpcError::NotFound => "NotFound",
            RpcError::MetadataSizeLimit => "MetadataSizeLimit",
            RpcError::UnmarshallingError => "UnmarshallingError",
            RpcError::MarshallingError => "MarshallingError",
            RpcError::InternalError => "InternalError",
            RpcError::S2SPermissionDenied => "S2SPermissionDenied",
        }
    }

    /// Convert to the error body returned to callers
    pub fn to_json(&self) -> Value {
        json!({
            "code": self.code().as_i32(),
            "message": self.message(),
        })
    }
}

pub type RpcResult = Result<String, RpcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_bind_to_status_codes() {
        assert_eq!(RpcError::UserNotFound.code().as_i32(), 5);
        assert_eq!(RpcError::NotFound.code().as_i32(), 5);
        assert_eq!(RpcError::MetadataSizeLimit.code().as_i32(), 3);
        assert_eq!(RpcError::UnmarshallingError.code().as_i32(), 13);
        assert_eq!(RpcError::MarshallingError.code().as_i32(), 13);
        assert_eq!(RpcError::InternalError.code().as_i32(), 13);
        assert_eq!(RpcError::S2SPermissionDenied.code().as_i32(), 7);
    }

    #[test]
    fn status_space_bounds() {
        assert_eq!(RpcCode::Ok.as_i32(), 0);
        assert_eq!(RpcCode::Unauthenticated.as_i32(), 16);
        assert_eq!(RpcCode::PermissionDenied.name(), "PERMISSION_DENIED");
    }

    #[test]
    fn kind_names_the_variant() {
        assert_eq!(RpcError::UserNotFound.kind(), "UserNotFound");
        assert_eq!(RpcError::S2SPermissionDenied.kind(), "S2SPermissionDenied");
        assert_eq!(format!("{:?}", RpcError::MetadataSizeLimit), RpcError::MetadataSizeLimit.kind());
    }

    #[test]
    fn wire_body_carries_code_and_message() {
        let body = RpcError::S2SPermissionDenied.to_json();
        assert_eq!(body["code"], 7);
        assert_eq!(body["message"], "rpc is only callable via server to server");
    }
}
