use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct MeData {
    pub user: UserInfo,
}

/// Remaining lifetime and liveness of the game account.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    /// Unix timestamp, in seconds, at which the account dies.
    #[serde(rename = "deathDate", default)]
    pub death_date: f64,
    #[serde(rename = "isAlive", default)]
    pub is_alive: bool,
}
