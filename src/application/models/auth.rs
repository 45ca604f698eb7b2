/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 13/5/25
******************************************************************************/
use serde::Deserialize;
use std::fmt;

/// Result of exchanging init data for a bearer token.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "isNewUser", default)]
    pub is_new_user: bool,
}

impl fmt::Display for LoginData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"accessToken\":\"[REDACTED]\",\"isNewUser\":{}}}",
            self.is_new_user
        )
    }
}
