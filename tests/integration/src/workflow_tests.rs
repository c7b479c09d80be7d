//! Multi-cookbook run-lists exercising includes, assets and notifications together.

use pretty_assertions::assert_eq;
use recipe_core::{Runner, RunnerOptions};
use recipe_matchers::{
    RunMatcher, RunnerExt, create_directory, create_file_with_content, create_template,
    enable_service, install_package, restart_service, run_execute,
};
use recipe_test_utils::TestCookbook;

const BASE: &str = r#"
[[resources]]
type = "package"
name = "curl"
action = "install"

[[resources]]
type = "directory"
name = "srv"
action = "create"
"#;

const WEB: &str = r#"
include_recipe = ["base"]

[[resources]]
type = "package"
name = "nginx"
action = "install"

[resources.attributes]
version = "{{ node.web.version }}"

[[resources]]
type = "template"
name = "srv/index.html"

[resources.attributes]
source = "index.html.j2"

[resources.attributes.variables]
title = "welcome"

[[resources.notifies]]
action = "restart"
resource = "service[nginx]"

[[resources]]
type = "service"
name = "nginx"
action = "enable"
"#;

fn sandbox() -> TestCookbook {
    let sandbox = TestCookbook::new();
    sandbox.write_recipe("base", "default", BASE);
    sandbox.write_recipe("web", "default", WEB);
    sandbox.write_template("web", "index.html.j2", "<h1>{{ title }} to {{ node.fqdn }}</h1>\n");
    sandbox
}

fn options(sandbox: &TestCookbook) -> RunnerOptions {
    RunnerOptions::new(sandbox.cookbook_path())
        .root(sandbox.root())
        .attribute("web", serde_json::json!({ "version": "1.25.0" }))
}

fn ledger_lines(runner: &Runner) -> Vec<String> {
    runner
        .ledger()
        .all()
        .map(|entry| format!("{}[{}] :{}", entry.resource_type(), entry.name(), entry.action()))
        .collect()
}

#[test]
fn record_only_run_lists_every_declaration() {
    let sandbox = sandbox();

    let mut runner = Runner::new(options(&sandbox)).unwrap();
    runner.converge(["web"]).unwrap();

    assert_eq!(
        ledger_lines(&runner),
        vec![
            "package[curl] :install",
            "directory[srv] :create",
            "package[nginx] :install",
            "template[srv/index.html] :create",
            "service[nginx] :enable",
        ]
    );
    runner
        .expect(&install_package("nginx").with_attribute("version", "1.25.0"))
        .unwrap();
    runner.expect(&enable_service("nginx")).unwrap();
    runner.expect_none(&restart_service("nginx")).unwrap();
    assert!(!sandbox.root().join("srv").exists());
}

#[test]
fn rendered_content_is_matched_without_writing() {
    let sandbox = sandbox();

    let mut runner = Runner::new(options(&sandbox)).unwrap();
    runner.converge(["web"]).unwrap();

    runner
        .expect(&create_file_with_content(
            "srv/index.html",
            "<h1>welcome to recipespec.local</h1>",
        ))
        .unwrap();
    assert!(create_template("srv/index.html").matches(&runner));
}

#[test]
fn stepping_into_assets_fires_delayed_notifications() {
    let sandbox = sandbox();

    let mut runner =
        Runner::new(options(&sandbox).step_into(["directory", "template"])).unwrap();
    runner.converge(["web"]).unwrap();

    sandbox.assert_file_contains("srv/index.html", "welcome to recipespec.local");
    assert!(create_directory("srv").matches(&runner));
    assert_eq!(
        ledger_lines(&runner).last().map(String::as_str),
        Some("service[nginx] :restart")
    );
    runner.expect(&restart_service("nginx")).unwrap();
    runner.expect_none(&run_execute("anything")).unwrap();
}

#[test]
fn converging_again_starts_a_fresh_ledger() {
    let sandbox = sandbox();

    let mut runner = Runner::new(options(&sandbox)).unwrap();
    runner.converge(["web"]).unwrap();
    assert_eq!(runner.ledger().len(), 5);

    runner.converge(["base"]).unwrap();
    assert_eq!(
        ledger_lines(&runner),
        vec!["package[curl] :install", "directory[srv] :create"]
    );
    runner.expect_none(&install_package("nginx")).unwrap();
}
