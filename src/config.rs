//! Configuration: skip lists, extensions, patterns, and report defaults.
//!
//! Every value has a built-in default, so the optional `.glean.yaml` only
//! needs the keys it overrides:
//!
//! ```yaml
//! endpoints:
//!   prefix: /api/
//! docs:
//!   min_lines: 5
//! logging:
//!   format: json
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GleanError;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = ".glean.yaml";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GleanConfig {
    /// Doc-comment extraction settings.
    pub docs: DocsConfig,
    /// Client-side endpoint reference settings.
    pub endpoints: EndpointsConfig,
    /// Controller route settings.
    pub routes: RoutesConfig,
    /// CSS property report settings.
    pub css: CssConfig,
    /// Barrel generator settings.
    pub barrel: BarrelConfig,
    /// File checklist settings.
    pub list: ListConfig,
    /// Undocumented-file list settings.
    pub undocumented: UndocumentedConfig,
    /// Logging defaults (overridden by CLI flags and `GLEAN_LOG`).
    pub logging: LoggingConfig,
}

impl GleanConfig {
    /// Loads configuration.
    ///
    /// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] in
    /// `cwd` is used when present and built-in defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`GleanError::Config`] if the file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self, GleanError> {
        let path: PathBuf = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = cwd.join(DEFAULT_CONFIG_FILE);
                if !candidate.is_file() {
                    return Ok(Self::default());
                }
                candidate
            }
        };
        let text = std::fs::read_to_string(&path)
            .map_err(|e| GleanError::Config { path: path.clone(), reason: e.to_string() })?;
        Self::from_yaml(&text).map_err(|reason| GleanError::Config { path, reason })
    }

    /// Parses configuration from YAML text. Empty text yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns the parser message when the YAML is malformed.
    pub fn from_yaml(text: &str) -> Result<Self, String> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| e.to_string())
    }
}

/// Extension and skip-list pair for one scanned language.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanTarget {
    /// Accepted file extensions, without the leading dot.
    pub extensions: Vec<String>,
    /// Directory names never descended into.
    pub skip_dirs: Vec<String>,
}

/// Doc-comment extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DocsConfig {
    /// A file is written only when its records serialize to more lines than this.
    pub min_lines: usize,
    /// TypeScript / JavaScript sources.
    pub typescript: ScanTarget,
    /// C# sources.
    pub csharp: ScanTarget,
    /// Python sources.
    pub python: ScanTarget,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            min_lines: 3,
            typescript: ScanTarget {
                extensions: strings(&["ts", "tsx", "js", "jsx"]),
                skip_dirs: strings(&[
                    "node_modules",
                    ".git",
                    ".svn",
                    ".hg",
                    "dist",
                    "build",
                    ".next",
                    ".nuxt",
                    "coverage",
                    ".nyc_output",
                    ".cache",
                    "venv",
                    "env",
                    ".venv",
                    ".env",
                    "__pycache__",
                    ".pytest_cache",
                    ".mypy_cache",
                    ".tox",
                    ".eggs",
                    "site-packages",
                ]),
            },
            csharp: ScanTarget {
                extensions: strings(&["cs"]),
                skip_dirs: strings(&[
                    "bin",
                    "obj",
                    ".git",
                    ".svn",
                    ".hg",
                    "dist",
                    "build",
                    "node_modules",
                    "__pycache__",
                    ".pytest_cache",
                    ".mypy_cache",
                    ".tox",
                    ".eggs",
                    "site-packages",
                    "packages",
                    "TestResults",
                ]),
            },
            python: ScanTarget {
                extensions: strings(&["py"]),
                skip_dirs: strings(&[
                    "venv",
                    "env",
                    ".venv",
                    ".env",
                    "__pycache__",
                    ".git",
                    ".svn",
                    ".hg",
                    "node_modules",
                    ".pytest_cache",
                    ".mypy_cache",
                    "build",
                    "dist",
                    ".tox",
                    ".eggs",
                    "site-packages",
                    "lib",
                    "lib64",
                ]),
            },
        }
    }
}

/// Client-side endpoint reference settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EndpointsConfig {
    /// Path prefix that marks an endpoint reference.
    pub prefix: String,
    /// Characters that end a captured endpoint.
    pub terminators: String,
    /// Scanned extensions.
    pub extensions: Vec<String>,
    /// Directory names never descended into.
    pub skip_dirs: Vec<String>,
    /// Subdirectory preferred over the whole tree when it exists.
    pub source_dir: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            prefix: "/Api/".to_string(),
            terminators: " \t\r\n+\"'`{(,)".to_string(),
            extensions: strings(&["ts", "tsx"]),
            skip_dirs: strings(&["node_modules"]),
            source_dir: "src".to_string(),
        }
    }
}

/// Controller route settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoutesConfig {
    /// Case-insensitive file-name suffix identifying controllers.
    pub file_suffix: String,
    /// Directory names never descended into.
    pub skip_dirs: Vec<String>,
    /// H1 of the combined referenced/unreferenced report.
    pub title: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            file_suffix: "controller.cs".to_string(),
            skip_dirs: strings(&["bin", "obj"]),
            title: "API Reference".to_string(),
        }
    }
}

/// One property family: a name and the property stems that belong to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyFamily {
    /// Family name used in report headings and file names.
    pub name: String,
    /// A property joins the family when it equals a stem or starts with `<stem>-`.
    pub properties: Vec<String>,
}

/// CSS property report settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CssConfig {
    /// Scanned extensions.
    pub extensions: Vec<String>,
    /// Directory names never descended into.
    pub skip_dirs: Vec<String>,
    /// Families in classification priority order.
    pub families: Vec<PropertyFamily>,
    /// Family whose values are tallied into the used-colors report.
    pub color_family: String,
}

impl Default for CssConfig {
    fn default() -> Self {
        let family = |name: &str, properties: &[&str]| PropertyFamily {
            name: name.to_string(),
            properties: strings(properties),
        };
        Self {
            extensions: strings(&["css", "scss"]),
            skip_dirs: strings(&["node_modules", ".git"]),
            families: vec![
                family(
                    "color",
                    &[
                        "color",
                        "background-color",
                        "border-color",
                        "outline-color",
                        "text-shadow",
                        "fill",
                        "stroke",
                    ],
                ),
                family(
                    "background",
                    &[
                        "background",
                        "background-image",
                        "background-position",
                        "background-size",
                        "background-repeat",
                        "background-attachment",
                        "background-origin",
                        "background-clip",
                    ],
                ),
                family("spacing", &["margin", "padding", "gap", "column-gap", "row-gap"]),
                family("border", &["border", "outline", "box-shadow"]),
                family(
                    "typography",
                    &[
                        "font",
                        "font-size",
                        "font-weight",
                        "font-style",
                        "font-family",
                        "line-height",
                        "letter-spacing",
                        "text-align",
                        "text-transform",
                        "text-decoration",
                        "text-indent",
                        "white-space",
                    ],
                ),
                family(
                    "layout",
                    &[
                        "display",
                        "position",
                        "top",
                        "right",
                        "bottom",
                        "left",
                        "z-index",
                        "float",
                        "clear",
                        "flex",
                        "flex-direction",
                        "flex-wrap",
                        "flex-flow",
                        "justify-content",
                        "align-items",
                        "align-content",
                        "align-self",
                        "order",
                        "grid",
                        "grid-template",
                        "grid-template-columns",
                        "grid-template-rows",
                        "grid-template-areas",
                        "grid-area",
                        "grid-column",
                        "grid-row",
                        "grid-auto-flow",
                        "grid-auto-rows",
                        "grid-auto-columns",
                    ],
                ),
                family(
                    "size",
                    &["width", "height", "min-width", "max-width", "min-height", "max-height", "box-sizing"],
                ),
                family("transform", &["transform", "transform-origin", "transition", "animation"]),
                family(
                    "misc",
                    &["opacity", "cursor", "overflow", "overflow-x", "overflow-y", "visibility", "pointer-events"],
                ),
            ],
            color_family: "color".to_string(),
        }
    }
}

/// Barrel generator settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BarrelConfig {
    /// Directory names never descended into (hidden directories are always skipped).
    pub skip_dirs: Vec<String>,
    /// Extensions re-exported from the barrel.
    pub extensions: Vec<String>,
    /// Barrel file name.
    pub index_file: String,
}

impl Default for BarrelConfig {
    fn default() -> Self {
        Self {
            skip_dirs: strings(&["node_modules", "dist", "build"]),
            extensions: strings(&["ts", "tsx"]),
            index_file: "index.ts".to_string(),
        }
    }
}

/// File checklist settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListConfig {
    /// Extensions listed when `--ext` is not given.
    pub extensions: Vec<String>,
    /// Directory names never descended into.
    pub skip_dirs: Vec<String>,
    /// Report file name under `_outputs/lists`.
    pub file_name: String,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            extensions: strings(&["scss"]),
            skip_dirs: strings(&["node_modules", ".git"]),
            file_name: "file_list.md".to_string(),
        }
    }
}

/// Undocumented-file list settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UndocumentedConfig {
    /// A file whose name contains any of these is never listed.
    pub excluded_patterns: Vec<String>,
    /// H1 of the report.
    pub title: String,
}

impl Default for UndocumentedConfig {
    fn default() -> Self {
        Self {
            excluded_patterns: strings(&["routing.module.ts", ".module.ts"]),
            title: "Undocumented files".to_string(),
        }
    }
}

/// Logging defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `glean=debug`.
    pub level: String,
    /// Output format: `pretty`, `compact`, or `json`.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "compact".to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        assert_eq!(GleanConfig::from_yaml("").unwrap(), GleanConfig::default());
    }

    #[test]
    fn partial_yaml_overrides_only_named_keys() {
        let cfg = GleanConfig::from_yaml("endpoints:\n  prefix: /api/v2/\ndocs:\n  min_lines: 0\n")
            .unwrap();
        assert_eq!(cfg.endpoints.prefix, "/api/v2/");
        assert_eq!(cfg.endpoints.skip_dirs, vec!["node_modules"]);
        assert_eq!(cfg.docs.min_lines, 0);
        assert_eq!(cfg.docs.csharp.extensions, vec!["cs"]);
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        assert!(GleanConfig::from_yaml("docs: [unclosed").is_err());
    }

    #[test]
    fn load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = GleanConfig::load(None, dir.path()).unwrap();
        assert_eq!(cfg.routes.title, "API Reference");
    }

    #[test]
    fn load_reads_default_file_from_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "routes:\n  title: Mine\n").unwrap();
        let cfg = GleanConfig::load(None, dir.path()).unwrap();
        assert_eq!(cfg.routes.title, "Mine");
    }

    #[test]
    fn explicit_missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GleanConfig::load(Some(&dir.path().join("nope.yaml")), dir.path()).unwrap_err();
        assert!(matches!(err, GleanError::Config { .. }));
    }

    #[test]
    fn list_and_undocumented_sections_have_defaults() {
        let cfg = GleanConfig::from_yaml("list:\n  extensions: [css]\n").unwrap();
        assert_eq!(cfg.list.extensions, vec!["css"]);
        assert_eq!(cfg.list.file_name, "file_list.md");
        assert!(cfg.undocumented.excluded_patterns.contains(&".module.ts".to_string()));
    }

    #[test]
    fn color_family_is_first() {
        let css = CssConfig::default();
        assert_eq!(css.families[0].name, css.color_family);
    }
}
