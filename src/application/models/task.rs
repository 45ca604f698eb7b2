/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 13/5/25
******************************************************************************/
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of in-game task, as sent in the task's `type` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum TaskKind {
    /// Put the gem marker in the profile name.
    #[serde(rename = "REGEX_STRING")]
    ProfileRename,
    #[serde(rename = "SUBSCRIPTION_TG")]
    ChannelSubscribe,
    #[serde(rename = "INVITE_FRIENDS")]
    InviteFriends,
    #[serde(rename = "BOOST_TG")]
    Boost,
    /// Anything else; completed by simply claiming it.
    #[default]
    #[serde(other)]
    Generic,
}

impl TaskKind {
    /// Invite and boost tasks need a human and are never claimed.
    pub fn is_automatable(&self) -> bool {
        match self {
            TaskKind::Generic | TaskKind::ProfileRename | TaskKind::ChannelSubscribe => true,
            TaskKind::InviteFriends | TaskKind::Boost => false,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskKind::ProfileRename => "REGEX_STRING",
            TaskKind::ChannelSubscribe => "SUBSCRIPTION_TG",
            TaskKind::InviteFriends => "INVITE_FRIENDS",
            TaskKind::Boost => "BOOST_TG",
            TaskKind::Generic => "GENERIC",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    pub uuid: String,
    #[serde(rename = "taskName", default)]
    pub task_name: String,
    #[serde(rename = "type", default)]
    pub kind: TaskKind,
    #[serde(rename = "isCompleted", default)]
    pub is_completed: bool,
    #[serde(rename = "secondsAmount", default)]
    pub seconds_amount: f64,
    #[serde(default)]
    pub link: Option<String>,
}

impl Task {
    pub fn is_pending(&self) -> bool {
        !self.is_completed && self.kind.is_automatable()
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"uuid\":\"{}\",\"taskName\":\"{}\",\"type\":\"{}\",\"isCompleted\":{},\"secondsAmount\":{}}}",
            self.uuid, self.task_name, self.kind, self.is_completed, self.seconds_amount
        )
    }
}

#[derive(Debug, Serialize)]
pub struct CompleteTaskRequest<'a> {
    pub uuid: &'a str,
}
