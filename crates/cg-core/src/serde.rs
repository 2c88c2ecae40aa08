//! JSON and YAML helpers mapping failures onto [`CgError::Serde`](crate::CgError::Serde).

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::{CgError, ErrorInfo};

fn serde_error(code: &str, err: impl ToString) -> CgError {
    CgError::Serde(ErrorInfo::new(code, err.to_string()))
}

/// Serializes a value into compact JSON bytes.
pub fn to_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, CgError> {
    serde_json::to_vec(value).map_err(|err| serde_error("json_serialize", err))
}

/// Serializes a value into indented JSON bytes for files meant to be read by people.
pub fn to_pretty_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, CgError> {
    serde_json::to_vec_pretty(value).map_err(|err| serde_error("json_serialize", err))
}

/// Deserializes a value from JSON bytes.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, CgError> {
    serde_json::from_slice(data).map_err(|err| serde_error("json_deserialize", err))
}

/// Serializes a value into YAML.
pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String, CgError> {
    serde_yaml::to_string(value).map_err(|err| serde_error("yaml_serialize", err))
}

/// Deserializes a YAML payload into the requested type.
pub fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, CgError> {
    serde_yaml::from_slice(data).map_err(|err| serde_error("yaml_deserialize", err))
}
