//! Assertion entry points

use recipe_core::Runner;
use tracing::debug;

use crate::error::{AssertionFailure, Result};
use crate::matcher::RunMatcher;

/// Pass when `matcher` matches the converged run.
pub fn expect_that<M: RunMatcher + ?Sized>(runner: &Runner, matcher: &M) -> Result {
    if matcher.matches(runner) {
        Ok(())
    } else {
        let message = matcher.failure_message(runner);
        debug!("{runner}: {message}");
        Err(AssertionFailure::Missing(message))
    }
}

/// Pass when `matcher` does not match the converged run.
pub fn expect_not<M: RunMatcher + ?Sized>(runner: &Runner, matcher: &M) -> Result {
    if matcher.matches(runner) {
        let message = matcher.negated_failure_message(runner);
        debug!("{runner}: {message}");
        Err(AssertionFailure::Unexpected(message))
    } else {
        Ok(())
    }
}

/// Fluent assertions on a runner.
pub trait RunnerExt {
    fn expect<M: RunMatcher + ?Sized>(&self, matcher: &M) -> Result;
    fn expect_none<M: RunMatcher + ?Sized>(&self, matcher: &M) -> Result;
}

impl RunnerExt for Runner {
    fn expect<M: RunMatcher + ?Sized>(&self, matcher: &M) -> Result {
        expect_that(self, matcher)
    }

    fn expect_none<M: RunMatcher + ?Sized>(&self, matcher: &M) -> Result {
        expect_not(self, matcher)
    }
}
