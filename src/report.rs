use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Metadata about an analyzed function definition.
/// Captured for every `def` (and `async def`) anywhere in a file,
/// including methods and functions nested inside other functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRecord {
    /// The function name as written in the source.
    pub name: String,
    /// Positional parameter names, in declaration order.
    pub args: Vec<String>,
    /// How many of those parameters carry a default value.
    /// Always `<= args.len()`.
    pub defaults_count: usize,
    /// The docstring, if the first statement of the body is a string literal.
    pub docstring: Option<String>,
    /// 1-indexed line number of the `def` keyword.
    pub lineno: usize,
    /// Decorator display names, in application order.
    /// Resolved to a simple identifier: `@name`, `@mod.name` and
    /// `@factory(...)` all collapse to the trailing name.
    pub decorators: Vec<String>,
}

/// Metadata about an analyzed class definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRecord {
    /// The class name as written in the source.
    pub name: String,
    /// Function definitions in the class body itself, in declaration order.
    /// Functions nested deeper (inside a method) are not methods.
    pub methods: Vec<FunctionRecord>,
    /// The class docstring, if present.
    pub docstring: Option<String>,
    /// 1-indexed line number of the `class` keyword.
    pub lineno: usize,
    /// Base-class display names. Empty when the class declares no bases.
    pub bases: Vec<String>,
}

/// Per-file extraction result. Produced only when the file parsed cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleReport {
    /// Path relative to the analyzed root, with `/` separators.
    /// Unique key within a ProjectReport.
    pub file_path: String,
    /// Total line count of the source file.
    pub lines_of_code: usize,
    /// Every function definition found in this file, at any nesting depth.
    pub functions: Vec<FunctionRecord>,
    /// Every class definition found in this file, at any nesting depth.
    pub classes: Vec<ClassRecord>,
    /// Raw import strings: `"a.b"` for `import a.b`, `"m.x"` for
    /// `from m import x`, bare `"x"` for a relative `from . import x`.
    pub imports: Vec<String>,
}

/// A function entry in the project-wide flattened view,
/// tagged with the module it was declared in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFunction {
    /// Relative path of the owning module.
    pub module: String,
    #[serde(flatten)]
    pub record: FunctionRecord,
}

/// A class entry in the project-wide flattened view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectClass {
    /// Relative path of the owning module.
    pub module: String,
    #[serde(flatten)]
    pub record: ClassRecord,
}

/// A recoverable per-file failure: the file could not be decoded as UTF-8
/// or did not parse. The file contributes no ModuleReport and the run
/// continues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The file that was skipped.
    pub file: PathBuf,
    /// Decode or parse error detail.
    pub message: String,
}

/// Project-level header of a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// Basename of the analyzed root directory.
    pub name: String,
    /// When the analysis ran.
    pub analysis_date: DateTime<Utc>,
    /// Number of files that produced a ModuleReport.
    /// Files skipped with a Diagnostic are not counted.
    pub total_files: usize,
}

/// Aggregate result of one analysis run.
///
/// Functions and classes are kept twice on purpose: once under their
/// owning ModuleReport and once in the flattened project-wide lists.
/// Downstream renderers need both views and this saves them the join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectReport {
    pub project_info: ProjectInfo,
    /// One entry per successfully parsed file, in traversal order.
    pub modules: Vec<ModuleReport>,
    /// All functions across the project, tagged with their module.
    pub functions: Vec<ProjectFunction>,
    /// All classes across the project, tagged with their module.
    pub classes: Vec<ProjectClass>,
    /// External dependency names: leading segments of imported module
    /// paths, minus the standard-library exclusion set. Sorted.
    pub dependencies: Vec<String>,
    /// Recent commit log lines, empty when git was unavailable.
    pub git_history: Vec<String>,
    /// Files that were skipped, with the reason.
    pub diagnostics: Vec<Diagnostic>,
}
