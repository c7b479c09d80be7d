//! Named `<action>_<type>` matchers for the common resource types
//!
//! Each is a thin wrapper over [`resource_matcher`]; any other pair can be
//! built directly with it.

use crate::matcher::{ResourceExpectation, resource_matcher};

fn expect(action: &str, resource_type: &str, name: &str) -> ResourceExpectation {
    resource_matcher(action, resource_type).named(name)
}

/// Also satisfied by a `template` of the same name.
pub fn create_file(name: &str) -> ResourceExpectation {
    expect("create", "file", name)
}

pub fn create_file_if_missing(name: &str) -> ResourceExpectation {
    expect("create_if_missing", "file", name)
}

pub fn delete_file(name: &str) -> ResourceExpectation {
    expect("delete", "file", name)
}

pub fn touch_file(name: &str) -> ResourceExpectation {
    expect("touch", "file", name)
}

pub fn create_directory(name: &str) -> ResourceExpectation {
    expect("create", "directory", name)
}

pub fn delete_directory(name: &str) -> ResourceExpectation {
    expect("delete", "directory", name)
}

pub fn create_template(name: &str) -> ResourceExpectation {
    expect("create", "template", name)
}

pub fn create_cookbook_file(name: &str) -> ResourceExpectation {
    expect("create", "cookbook_file", name)
}

pub fn create_remote_file(name: &str) -> ResourceExpectation {
    expect("create", "remote_file", name)
}

pub fn create_link(name: &str) -> ResourceExpectation {
    expect("create", "link", name)
}

pub fn delete_link(name: &str) -> ResourceExpectation {
    expect("delete", "link", name)
}

pub fn install_package(name: &str) -> ResourceExpectation {
    expect("install", "package", name)
}

pub fn upgrade_package(name: &str) -> ResourceExpectation {
    expect("upgrade", "package", name)
}

pub fn remove_package(name: &str) -> ResourceExpectation {
    expect("remove", "package", name)
}

pub fn purge_package(name: &str) -> ResourceExpectation {
    expect("purge", "package", name)
}

pub fn enable_service(name: &str) -> ResourceExpectation {
    expect("enable", "service", name)
}

pub fn disable_service(name: &str) -> ResourceExpectation {
    expect("disable", "service", name)
}

pub fn start_service(name: &str) -> ResourceExpectation {
    expect("start", "service", name)
}

pub fn stop_service(name: &str) -> ResourceExpectation {
    expect("stop", "service", name)
}

pub fn restart_service(name: &str) -> ResourceExpectation {
    expect("restart", "service", name)
}

pub fn reload_service(name: &str) -> ResourceExpectation {
    expect("reload", "service", name)
}

pub fn run_execute(name: &str) -> ResourceExpectation {
    expect("run", "execute", name)
}

pub fn run_script(name: &str) -> ResourceExpectation {
    expect("run", "script", name)
}

pub fn create_user(name: &str) -> ResourceExpectation {
    expect("create", "user", name)
}

pub fn remove_user(name: &str) -> ResourceExpectation {
    expect("remove", "user", name)
}

pub fn create_group(name: &str) -> ResourceExpectation {
    expect("create", "group", name)
}

pub fn create_cron(name: &str) -> ResourceExpectation {
    expect("create", "cron", name)
}

pub fn write_log(name: &str) -> ResourceExpectation {
    expect("write", "log", name)
}
