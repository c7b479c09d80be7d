//! Notifications between resources

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Action;
use crate::{Error, Result};

static TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z0-9_]+)\[(.+)\]\s*$").unwrap());

/// When a notified action runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timing {
    /// At the end of the run, once per target and action
    #[default]
    Delayed,
    /// Right after the notifying resource
    #[serde(alias = "immediate")]
    Immediately,
}

/// "When this resource is updated, run `action` on `type[name]`."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub action: Action,
    pub target_type: String,
    pub target_name: String,
    pub timing: Timing,
}

impl Notification {
    /// Build a notification from a `type[name]` target reference.
    pub fn new(action: impl Into<Action>, target: &str, timing: Timing) -> Result<Self> {
        let (target_type, target_name) =
            parse_target(target).ok_or_else(|| Error::NotificationTarget {
                resource: "<declaration>".into(),
                target: target.to_string(),
            })?;
        Ok(Self {
            action: action.into(),
            target_type,
            target_name,
            timing,
        })
    }

    pub fn target(&self) -> String {
        format!("{}[{}]", self.target_type, self.target_name)
    }
}

/// Split `service[nginx]` into `("service", "nginx")`.
pub fn parse_target(target: &str) -> Option<(String, String)> {
    let captures = TARGET.captures(target)?;
    Some((captures[1].to_string(), captures[2].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_type_and_name() {
        assert_eq!(
            parse_target("service[nginx]"),
            Some(("service".into(), "nginx".into()))
        );
        assert_eq!(
            parse_target("file[/etc/app/[weird].conf]"),
            Some(("file".into(), "/etc/app/[weird].conf".into()))
        );
        assert_eq!(parse_target("nginx"), None);
    }

    #[test]
    fn timing_defaults_to_delayed() {
        let n = Notification::new("restart", "service[nginx]", Timing::default()).unwrap();
        assert_eq!(n.timing, Timing::Delayed);
        assert_eq!(n.target(), "service[nginx]");
    }
}
