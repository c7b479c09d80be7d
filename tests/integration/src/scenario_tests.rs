//! End-to-end scenarios: a cookbook on disk, a runner, and matchers over the ledger.
//!
//! Each scenario starts from a fresh sandbox so nothing leaks between them.

use pretty_assertions::assert_eq;
use recipe_core::{Runner, RunnerOptions};
use recipe_matchers::{AssertionFailure, create_file, delete_file, expect_that, owned_by};
use recipe_test_utils::{OwnershipSnapshot, TestCookbook};

const HELLO_CREATE: &str = r#"
[[resources]]
type = "file"
name = "hello-world.txt"
action = "create"

[resources.attributes]
content = "hello world"
"#;

const HELLO_DELETE: &str = r#"
[[resources]]
type = "file"
name = "hello-world.txt"
action = "delete"
"#;

fn options(sandbox: &TestCookbook) -> RunnerOptions {
    RunnerOptions::new(sandbox.cookbook_path()).root(sandbox.root())
}

// =============================================================================
// Record-only convergence
// =============================================================================

#[test]
fn created_file_is_expected_and_delete_is_not() {
    let sandbox = TestCookbook::new();
    sandbox.write_recipe("example", "default", HELLO_CREATE);

    let mut runner = Runner::new(options(&sandbox)).unwrap();
    runner.converge(["example::default"]).unwrap();

    expect_that(&runner, &create_file("hello-world.txt")).unwrap();
    assert_eq!(
        expect_that(&runner, &delete_file("hello-world.txt")).unwrap_err(),
        AssertionFailure::Missing(
            "No file resource named 'hello-world.txt' with action :delete found.".into()
        )
    );
    sandbox.assert_file_not_exists("hello-world.txt");
}

#[test]
fn recorded_delete_keeps_the_file() {
    let sandbox = TestCookbook::new();
    sandbox.write_recipe("example", "default", HELLO_DELETE);
    sandbox.write_file("hello-world.txt", "still here");

    let mut runner = Runner::new(options(&sandbox)).unwrap();
    runner.converge(["example::default"]).unwrap();

    expect_that(&runner, &delete_file("hello-world.txt")).unwrap();
    sandbox.assert_file_contains("hello-world.txt", "still here");
}

// =============================================================================
// Step-into convergence
// =============================================================================

#[test]
fn stepped_into_delete_removes_the_file() {
    let sandbox = TestCookbook::new();
    sandbox.write_recipe("example", "default", HELLO_DELETE);
    sandbox.write_file("hello-world.txt", "doomed");

    let mut runner = Runner::new(options(&sandbox).step_into(["file"])).unwrap();
    runner.converge(["example::default"]).unwrap();

    expect_that(&runner, &delete_file("hello-world.txt")).unwrap();
    sandbox.assert_file_not_exists("hello-world.txt");
}

// =============================================================================
// Ownership
// =============================================================================

#[cfg(unix)]
#[test]
fn declared_ownership_is_recorded_but_never_applied() {
    let sandbox = TestCookbook::new();
    sandbox.write_recipe(
        "example",
        "default",
        r#"
[[resources]]
type = "file"
name = "owned.txt"

[resources.attributes]
owner = "user"
group = "group"
"#,
    );
    let owned = sandbox.write_file("owned.txt", "data");
    let before = OwnershipSnapshot::take([&owned]);

    let mut runner = Runner::new(options(&sandbox)).unwrap();
    runner.converge(["example"]).unwrap();

    assert_eq!(OwnershipSnapshot::take([&owned]), before);
    expect_that(&runner, &owned_by("user", "group").file("owned.txt")).unwrap();
}
