use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static MOBILE_AGENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Android|webOS|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini")
        .expect("mobile user-agent pattern is valid")
});

/// Coarse device classification used to pick the delivery order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

impl DeviceClass {
    pub fn from_user_agent(user_agent: &str) -> Self {
        if MOBILE_AGENT.is_match(user_agent) {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        self == DeviceClass::Mobile
    }
}
