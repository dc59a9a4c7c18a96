/**
 * Account Handler Types
 *
 * Request bodies accepted by the account endpoints. Register and Login take
 * url-encoded forms; the account updates take JSON. Missing fields default
 * to empty strings so that the service answers with its own validation
 * message instead of a generic extractor rejection.
 */

use serde::{Deserialize, Serialize};

/// Register form
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    /// Card access code the account is bound to
    #[serde(rename = "accessCode")]
    pub access_code: String,
}

/// Login form
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Body shared by PATCH /username and PATCH /password.
///
/// Each endpoint reads only the fields it needs.
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateAuthUserRequest {
    pub username: String,
    pub current_password: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_uses_camel_case() {
        let request: UpdateAuthUserRequest =
            serde_json::from_str(r#"{"currentPassword":"a","newPassword":"b"}"#).unwrap();
        assert_eq!(request.current_password, "a");
        assert_eq!(request.new_password, "b");
        assert!(request.username.is_empty());
    }

    #[test]
    fn test_register_form_access_code_name() {
        let form: RegisterForm =
            serde_json::from_str(r#"{"username":"drummer","accessCode":"AC-001"}"#).unwrap();
        assert_eq!(form.access_code, "AC-001");
        assert!(form.password.is_empty());
    }
}
