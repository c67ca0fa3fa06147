use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Return code the backend uses for a successful call.
pub const SUCCESS_CODE: &str = "0000";

/// Response wrapper shared by all JSON endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "retCode")]
    pub ret_code: String,
    #[serde(rename = "retMsg", default)]
    pub ret_msg: String,
    #[serde(default)]
    pub entity: Option<T>,
}

/// Why an envelope did not yield a usable entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("backend rejected request: code={code} msg={msg}")]
    Rejected { code: String, msg: String },
    #[error("response carried no entity")]
    MissingEntity,
}

impl<T> Envelope<T> {
    /// Build a success envelope around `entity`.
    pub fn success(entity: T) -> Self {
        Self {
            ret_code: SUCCESS_CODE.to_string(),
            ret_msg: "success".to_string(),
            entity: Some(entity),
        }
    }

    /// Build an error envelope without entity.
    pub fn failure(code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            ret_code: code.into(),
            ret_msg: msg.into(),
            entity: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.ret_code == SUCCESS_CODE
    }

    /// Extract the entity of a successful response.
    ///
    /// A non-success code and a missing entity are both failures.
    pub fn into_entity(self) -> Result<T, EnvelopeError> {
        if !self.is_success() {
            return Err(EnvelopeError::Rejected {
                code: self.ret_code,
                msg: self.ret_msg,
            });
        }
        self.entity.ok_or(EnvelopeError::MissingEntity)
    }

    /// Check the return code only; used by endpoints that answer with an empty entity.
    pub fn into_ack(self) -> Result<(), EnvelopeError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(EnvelopeError::Rejected {
                code: self.ret_code,
                msg: self.ret_msg,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_with_entity() {
        let env: Envelope<u32> =
            serde_json::from_value(json!({"retCode": "0000", "retMsg": "ok", "entity": 7}))
                .unwrap();
        assert!(env.is_success());
        assert_eq!(env.into_entity(), Ok(7));
    }

    #[test]
    fn error_code_is_rejected() {
        let env: Envelope<u32> =
            serde_json::from_value(json!({"retCode": "9999", "retMsg": "boom"})).unwrap();
        assert_eq!(
            env.into_entity(),
            Err(EnvelopeError::Rejected {
                code: "9999".into(),
                msg: "boom".into()
            })
        );
    }

    #[test]
    fn null_entity_is_missing() {
        let env: Envelope<u32> =
            serde_json::from_value(json!({"retCode": "0000", "retMsg": "", "entity": null}))
                .unwrap();
        assert_eq!(env.clone().into_entity(), Err(EnvelopeError::MissingEntity));
        assert_eq!(env.into_ack(), Ok(()));
    }

    #[test]
    fn ack_ignores_entity_but_checks_code() {
        let env: Envelope<serde_json::Value> = Envelope::failure("1001", "config failed");
        assert!(env.into_ack().is_err());
    }
}
