//! Request and response types for the DEK provisioning function.
//!
//! The request arrives either as a bare JSON object or wrapped in an
//! API-gateway proxy event (`{"body": "<json string>"}`). The response is
//! always an API-gateway style envelope with `statusCode = 200`; callers tell
//! success from failure by inspecting the body.

use serde::{Deserialize, Serialize};

use crate::error::ProvisionError;

/// Transport status used for every response, success or failure.
pub const STATUS_OK: u16 = 200;

/// Fixed `message` value of the failure body.
pub const FAILURE_MESSAGE: &str = "error";

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Incoming invocation payload.
///
/// Every field is optional at the wire level so that a missing field surfaces
/// as a [`ProvisionError::Validation`] naming it, not as a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DekRequest {
    /// ARN of an existing AWS KMS key used to wrap the DEK.
    #[serde(default)]
    pub kms_key_arn: Option<String>,
    /// AWS region code of the KMS key.
    #[serde(default)]
    pub kms_key_region: Option<String>,
    /// Human-readable alternate name stored on the new key document.
    #[serde(default)]
    pub dek_alt_name: Option<String>,
}

/// A request whose three fields are known to be present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub kms_key_arn: String,
    pub kms_key_region: String,
    pub dek_alt_name: String,
}

/// AWS master key descriptor passed to key creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterKeyDescriptor {
    /// KMS key ARN.
    pub key: String,
    /// KMS key region.
    pub region: String,
}

impl DekRequest {
    /// Extract the request from a raw invocation event.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Validation`] if the event is not a JSON
    /// object, or if its `body` string is not a JSON object.
    pub fn from_event(event: serde_json::Value) -> Result<Self, ProvisionError> {
        let payload = match event {
            serde_json::Value::Object(mut map) => match map.remove("body") {
                Some(serde_json::Value::String(body)) => serde_json::from_str(&body)
                    .map_err(|e| {
                        ProvisionError::Validation(format!("request body is not valid JSON: {e}"))
                    })?,
                Some(other) => {
                    map.insert("body".into(), other);
                    serde_json::Value::Object(map)
                }
                None => serde_json::Value::Object(map),
            },
            other => other,
        };

        if !payload.is_object() {
            return Err(ProvisionError::Validation(
                "request must be a JSON object".into(),
            ));
        }

        serde_json::from_value(payload)
            .map_err(|e| ProvisionError::Validation(format!("malformed request: {e}")))
    }

    /// Check that all three fields are present and non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Validation`] naming every missing field.
    pub fn validate(self) -> Result<ValidatedRequest, ProvisionError> {
        let mut missing = Vec::new();
        let kms_key_arn = present(self.kms_key_arn, "kmsKeyArn", &mut missing);
        let kms_key_region = present(self.kms_key_region, "kmsKeyRegion", &mut missing);
        let dek_alt_name = present(self.dek_alt_name, "dekAltName", &mut missing);

        match (kms_key_arn, kms_key_region, dek_alt_name) {
            (Some(kms_key_arn), Some(kms_key_region), Some(dek_alt_name)) => Ok(ValidatedRequest {
                kms_key_arn,
                kms_key_region,
                dek_alt_name,
            }),
            _ => Err(ProvisionError::Validation(format!(
                "missing required field(s): {}",
                missing.join(", ")
            ))),
        }
    }
}

fn present(value: Option<String>, name: &'static str, missing: &mut Vec<&'static str>) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v),
        _ => {
            missing.push(name);
            None
        }
    }
}

impl ValidatedRequest {
    /// Build the master key descriptor for this request.
    pub fn master_key(&self) -> MasterKeyDescriptor {
        MasterKeyDescriptor {
            key: self.kms_key_arn.clone(),
            region: self.kms_key_region.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// JSON document carried (as a string) in [`ResponseEnvelope::body`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Success {
        #[serde(rename = "dataKeyUUID")]
        data_key_uuid: String,
    },
    Failure {
        message: String,
        error: String,
    },
}

/// API-gateway style response returned from every invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub body: String,
}

impl ResponseEnvelope {
    /// Envelope carrying the textual UUID of a newly created key.
    pub fn success(data_key_uuid: impl Into<String>) -> Self {
        Self::with_body(&ResponseBody::Success {
            data_key_uuid: data_key_uuid.into(),
        })
    }

    /// Envelope carrying a stringified failure.
    pub fn failure(error: &ProvisionError) -> Self {
        Self::with_body(&ResponseBody::Failure {
            message: FAILURE_MESSAGE.into(),
            error: error.to_string(),
        })
    }

    /// Decode [`Self::body`] back into a [`ResponseBody`].
    pub fn parsed_body(&self) -> Result<ResponseBody, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    fn with_body(body: &ResponseBody) -> Self {
        // A String-only enum cannot fail to serialise.
        let body = serde_json::to_string(body).unwrap_or_default();
        Self {
            status_code: STATUS_OK,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_request() -> serde_json::Value {
        json!({
            "kmsKeyArn": "arn:aws:kms:ap-south-1:111122223333:key/abc",
            "kmsKeyRegion": "ap-south-1",
            "dekAltName": "service-x-dek"
        })
    }

    #[test]
    fn bare_event_is_accepted() {
        let req = DekRequest::from_event(full_request()).unwrap();
        assert_eq!(req.kms_key_region.as_deref(), Some("ap-south-1"));
        let valid = req.validate().unwrap();
        assert_eq!(valid.dek_alt_name, "service-x-dek");
    }

    #[test]
    fn proxy_event_body_is_unwrapped() {
        let event = json!({
            "httpMethod": "POST",
            "body": full_request().to_string(),
        });
        let req = DekRequest::from_event(event).unwrap();
        assert_eq!(
            req.kms_key_arn.as_deref(),
            Some("arn:aws:kms:ap-south-1:111122223333:key/abc")
        );
    }

    #[test]
    fn proxy_event_with_invalid_body_is_validation_error() {
        let event = json!({ "body": "{not json" });
        let err = DekRequest::from_event(event).unwrap_err();
        assert!(matches!(err, ProvisionError::Validation(_)));
    }

    #[test]
    fn non_object_event_is_validation_error() {
        let err = DekRequest::from_event(json!(["kmsKeyArn"])).unwrap_err();
        assert!(matches!(err, ProvisionError::Validation(_)));
    }

    #[test]
    fn empty_arn_is_named() {
        let req = DekRequest::from_event(json!({
            "kmsKeyArn": "",
            "kmsKeyRegion": "ap-south-1",
            "dekAltName": "x"
        }))
        .unwrap();
        let err = req.validate().unwrap_err();
        let text = err.to_string();
        assert!(text.contains("kmsKeyArn"), "got: {text}");
        assert!(!text.contains("kmsKeyRegion"));
        assert!(!text.contains("dekAltName"));
    }

    #[test]
    fn every_missing_field_is_named() {
        let err = DekRequest::default().validate().unwrap_err();
        let text = err.to_string();
        assert!(text.contains("kmsKeyArn, kmsKeyRegion, dekAltName"), "got: {text}");
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let req = DekRequest {
            kms_key_arn: Some("arn".into()),
            kms_key_region: Some("   ".into()),
            dek_alt_name: Some("alias".into()),
        };
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("kmsKeyRegion"));
    }

    #[test]
    fn master_key_descriptor_mirrors_request() {
        let valid = DekRequest::from_event(full_request())
            .unwrap()
            .validate()
            .unwrap();
        let mk = valid.master_key();
        assert_eq!(mk.key, "arn:aws:kms:ap-south-1:111122223333:key/abc");
        assert_eq!(mk.region, "ap-south-1");
    }

    #[test]
    fn success_envelope_shape() {
        let env = ResponseEnvelope::success("0f8fad5b-d9cb-469f-a165-70867728950e");
        assert_eq!(env.status_code, 200);
        assert_eq!(
            env.body,
            r#"{"dataKeyUUID":"0f8fad5b-d9cb-469f-a165-70867728950e"}"#
        );
        let wire = serde_json::to_value(&env).unwrap();
        assert_eq!(wire["statusCode"], 200);
    }

    #[test]
    fn failure_envelope_is_still_200() {
        let env = ResponseEnvelope::failure(&ProvisionError::Credential("no provider".into()));
        assert_eq!(env.status_code, STATUS_OK);
        match env.parsed_body().unwrap() {
            ResponseBody::Failure { message, error } => {
                assert_eq!(message, "error");
                assert!(error.contains("no provider"));
            }
            other => panic!("expected failure body, got {other:?}"),
        }
    }
}
