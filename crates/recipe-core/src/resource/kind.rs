//! Built-in resource types and their action sets
//!
//! Types not listed here are still legal; they accept any action and pass
//! through the dispatcher untouched.

/// A known resource type with its fixed action set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceKind {
    pub name: &'static str,
    pub actions: &'static [&'static str],
    pub default_action: &'static str,
}

impl ResourceKind {
    pub fn allows(&self, action: &str) -> bool {
        self.actions.contains(&action)
    }
}

const FILE_ACTIONS: &[&str] = &["create", "create_if_missing", "delete", "touch", "nothing"];

static KINDS: &[ResourceKind] = &[
    ResourceKind {
        name: "file",
        actions: FILE_ACTIONS,
        default_action: "create",
    },
    ResourceKind {
        name: "template",
        actions: FILE_ACTIONS,
        default_action: "create",
    },
    ResourceKind {
        name: "cookbook_file",
        actions: FILE_ACTIONS,
        default_action: "create",
    },
    ResourceKind {
        name: "remote_file",
        actions: FILE_ACTIONS,
        default_action: "create",
    },
    ResourceKind {
        name: "directory",
        actions: &["create", "delete", "nothing"],
        default_action: "create",
    },
    ResourceKind {
        name: "remote_directory",
        actions: &["create", "create_if_missing", "delete", "nothing"],
        default_action: "create",
    },
    ResourceKind {
        name: "link",
        actions: &["create", "delete", "nothing"],
        default_action: "create",
    },
    ResourceKind {
        name: "cron",
        actions: &["create", "delete", "nothing"],
        default_action: "create",
    },
    ResourceKind {
        name: "env",
        actions: &["create", "delete", "modify", "nothing"],
        default_action: "create",
    },
    ResourceKind {
        name: "user",
        actions: &["create", "remove", "modify", "manage", "lock", "unlock", "nothing"],
        default_action: "create",
    },
    ResourceKind {
        name: "group",
        actions: &["create", "remove", "modify", "manage", "nothing"],
        default_action: "create",
    },
    ResourceKind {
        name: "execute",
        actions: &["run", "nothing"],
        default_action: "run",
    },
    ResourceKind {
        name: "script",
        actions: &["run", "nothing"],
        default_action: "run",
    },
    ResourceKind {
        name: "package",
        actions: &["install", "upgrade", "remove", "purge", "nothing"],
        default_action: "install",
    },
    ResourceKind {
        name: "service",
        actions: &[
            "enable", "disable", "start", "stop", "restart", "reload", "nothing",
        ],
        default_action: "nothing",
    },
    ResourceKind {
        name: "log",
        actions: &["write", "nothing"],
        default_action: "write",
    },
    ResourceKind {
        name: "route",
        actions: &["add", "delete", "nothing"],
        default_action: "add",
    },
    ResourceKind {
        name: "git",
        actions: &["sync", "checkout", "export", "nothing"],
        default_action: "sync",
    },
    ResourceKind {
        name: "mount",
        actions: &["mount", "umount", "remount", "enable", "disable", "nothing"],
        default_action: "mount",
    },
    ResourceKind {
        name: "ifconfig",
        actions: &["add", "delete", "enable", "disable", "nothing"],
        default_action: "add",
    },
    ResourceKind {
        name: "http_request",
        actions: &["get", "put", "post", "delete", "head", "options", "nothing"],
        default_action: "get",
    },
];

/// Look up a built-in type by name.
pub fn lookup(resource_type: &str) -> Option<&'static ResourceKind> {
    KINDS.iter().find(|kind| kind.name == resource_type)
}

/// Names of all built-in types.
pub fn known_types() -> impl Iterator<Item = &'static str> {
    KINDS.iter().map(|kind| kind.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_allows_nothing_and_its_default() {
        for kind in KINDS {
            assert!(kind.allows("nothing"), "{} lacks :nothing", kind.name);
            assert!(
                kind.allows(kind.default_action),
                "{} default :{} not in its action set",
                kind.name,
                kind.default_action
            );
        }
    }

    #[test]
    fn unknown_types_have_no_kind() {
        assert!(lookup("my_custom_lwrp").is_none());
        assert!(lookup("template").is_some());
    }
}
