//! Runner configuration

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use recipe_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Result;
use crate::dispatch::StepInto;

/// Where cookbooks live: one directory or an ordered search list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CookbookPath {
    Single(PathBuf),
    Multiple(Vec<PathBuf>),
}

impl CookbookPath {
    /// Search order.
    pub fn paths(&self) -> Vec<&Path> {
        match self {
            Self::Single(path) => vec![path.as_path()],
            Self::Multiple(paths) => paths.iter().map(PathBuf::as_path).collect(),
        }
    }
}

impl From<&str> for CookbookPath {
    fn from(path: &str) -> Self {
        Self::Single(path.into())
    }
}

impl From<PathBuf> for CookbookPath {
    fn from(path: PathBuf) -> Self {
        Self::Single(path)
    }
}

impl From<&Path> for CookbookPath {
    fn from(path: &Path) -> Self {
        Self::Single(path.to_path_buf())
    }
}

impl From<Vec<PathBuf>> for CookbookPath {
    fn from(paths: Vec<PathBuf>) -> Self {
        Self::Multiple(paths)
    }
}

/// Log verbosity for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error | Self::Fatal => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
        };
        f.write_str(name)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim_start_matches(':').to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// Options for building a [`Runner`](crate::Runner)
///
/// The cookbook path is always explicit; there is no inference from the
/// calling file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerOptions {
    pub cookbook_path: CookbookPath,
    #[serde(default)]
    pub log_level: LogLevel,
    /// Evaluate nothing: converge resets the run-list and returns
    #[serde(default)]
    pub dry_run: bool,
    /// Resource types that really execute
    #[serde(default)]
    pub step_into: StepInto,
    /// Base for relative resource paths; the working directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    /// Deep-merged over the simulated facts
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl RunnerOptions {
    pub fn new(cookbook_path: impl Into<CookbookPath>) -> Self {
        Self {
            cookbook_path: cookbook_path.into(),
            log_level: LogLevel::default(),
            dry_run: false,
            step_into: StepInto::new(),
            root: None,
            attributes: Map::new(),
        }
    }

    /// Load options from a TOML, JSON or YAML file.
    ///
    /// Relative cookbook paths and `root` are resolved against the file's
    /// directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = NormalizedPath::new(path.as_ref());
        let mut options: Self = ConfigStore::new().load(&path)?;

        if let Some(base) = path.parent() {
            let base = base.to_native();
            let rebase = |p: &PathBuf| if p.is_relative() { base.join(p) } else { p.clone() };
            options.cookbook_path = match &options.cookbook_path {
                CookbookPath::Single(p) => CookbookPath::Single(rebase(p)),
                CookbookPath::Multiple(ps) => CookbookPath::Multiple(ps.iter().map(rebase).collect()),
            };
            options.root = options.root.as_ref().map(rebase);
        }
        Ok(options)
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn step_into<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for resource_type in types {
            self.step_into.insert(resource_type);
        }
        self
    }

    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn builder_sets_every_field() {
        let options = RunnerOptions::new("cookbooks")
            .log_level(LogLevel::Debug)
            .dry_run(true)
            .step_into(["execute", "file"])
            .root("/srv")
            .attribute("app", json!({"port": 80}));

        assert_eq!(options.cookbook_path, CookbookPath::Single("cookbooks".into()));
        assert_eq!(options.log_level, LogLevel::Debug);
        assert!(options.dry_run);
        assert!(options.step_into.contains("execute"));
        assert_eq!(options.root, Some(PathBuf::from("/srv")));
        assert_eq!(options.attributes["app"]["port"], 80);
    }

    #[rstest]
    #[case("debug", LogLevel::Debug)]
    #[case(":info", LogLevel::Info)]
    #[case("WARN", LogLevel::Warn)]
    #[case("fatal", LogLevel::Fatal)]
    fn parses_log_levels(#[case] input: &str, #[case] expected: LogLevel) {
        assert_eq!(input.parse::<LogLevel>().unwrap(), expected);
    }

    #[test]
    fn fatal_filters_like_error() {
        assert_eq!(LogLevel::Fatal.as_filter(), "error");
        assert_eq!(LogLevel::default().as_filter(), "warn");
    }

    #[test]
    fn deserializes_with_defaults() {
        let options: RunnerOptions =
            toml::from_str(r#"cookbook_path = ["a", "b"]"#).unwrap();

        assert_eq!(options.cookbook_path.paths(), vec![Path::new("a"), Path::new("b")]);
        assert_eq!(options.log_level, LogLevel::Warn);
        assert!(options.step_into.is_empty());
        assert!(!options.dry_run);
    }

    #[test]
    fn load_rebases_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("recipespec.toml");
        std::fs::write(
            &file,
            "cookbook_path = \"cookbooks\"\nstep_into = [\"file\"]\nlog_level = \"info\"\n",
        )
        .unwrap();

        let options = RunnerOptions::load(&file).unwrap();
        let CookbookPath::Single(path) = &options.cookbook_path else {
            panic!("expected a single cookbook path");
        };
        assert!(path.ends_with("cookbooks"));
        assert!(path.is_absolute());
        assert!(options.step_into.contains("file"));
        assert_eq!(options.log_level, LogLevel::Info);
    }
}
