use crate::git;
use crate::report::{
    Diagnostic, ModuleReport, ProjectClass, ProjectFunction, ProjectInfo, ProjectReport,
};
use crate::utils::{relative_display, LineIndex};
use crate::visitor::ModuleVisitor;
use anyhow::{bail, Context, Result};
use chrono::Utc;
use rustpython_parser::{parse, Mode};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;
use std::time::Duration;
use walkdir::{DirEntry, WalkDir};

lazy_static::lazy_static! {
    /// Standard-library module names subtracted from the dependency
    /// candidates. Importing any of these never makes it an external
    /// dependency.
    static ref STDLIB_MODULES: HashSet<&'static str> = [
        "os", "sys", "json", "datetime", "typing", "ast", "subprocess",
        "inspect", "logging", "argparse", "asyncio", "pathlib", "re",
        "collections", "itertools", "functools", "math", "io", "time",
        "unittest", "abc", "enum", "dataclasses",
    ]
    .into_iter()
    .collect();

    /// Directory names never descended into: virtual environments,
    /// dependency caches and build output.
    static ref SKIP_DIRS: HashSet<&'static str> = [
        "__pycache__", "venv", "env", ".env", "node_modules", "dist", "build",
    ]
    .into_iter()
    .collect();
}

/// Configuration for an analysis run.
///
/// The exclusion tables are plain fields rather than process-wide state,
/// so a caller (or a test) can swap in its own sets.
pub struct AnalyzerConfig {
    /// Module names filtered out of the external dependency list.
    pub stdlib_exclusions: HashSet<String>,
    /// Directory names pruned during traversal. Hidden directories
    /// (leading `.`) are always pruned regardless of this set.
    pub skip_dirs: HashSet<String>,
    /// Upper bound on the git history subprocess.
    pub history_timeout: Duration,
    /// Whether to attempt fetching git history at all.
    pub fetch_history: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            stdlib_exclusions: STDLIB_MODULES.iter().map(|s| s.to_string()).collect(),
            skip_dirs: SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
            history_timeout: Duration::from_secs(30),
            fetch_history: true,
        }
    }
}

/// The project analyzer.
///
/// Walks a directory of Python sources, parses each file and extracts a
/// structured inventory suitable for feeding a documentation renderer.
pub struct DocGen {
    pub config: AnalyzerConfig,
}

impl Default for DocGen {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl DocGen {
    /// Creates a new `DocGen` analyzer with the given configuration.
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Runs the analysis on the given project root.
    ///
    /// This method:
    /// 1. Validates the root path (the only hard failure).
    /// 2. Fetches recent git history, best-effort.
    /// 3. Walks the tree in sorted order, pruning hidden and excluded
    ///    directories, visiting only `.py` files.
    /// 4. Parses each file and walks its syntax tree exhaustively; a file
    ///    that fails to decode or parse becomes a diagnostic and the run
    ///    continues.
    /// 5. Subtracts the standard-library set from the dependency
    ///    candidates and returns the finished `ProjectReport`.
    pub fn analyze(&self, root: &Path) -> Result<ProjectReport> {
        let meta = fs::metadata(root)
            .with_context(|| format!("cannot read project root {}", root.display()))?;
        if !meta.is_dir() {
            bail!("project root {} is not a directory", root.display());
        }

        let git_history = if self.config.fetch_history {
            git::recent_history(root, self.config.history_timeout)
        } else {
            Vec::new()
        };

        let mut modules = Vec::new();
        let mut functions = Vec::new();
        let mut classes = Vec::new();
        let mut diagnostics = Vec::new();
        // Candidates go into a BTreeSet so the final list is deduplicated
        // and sorted without a separate pass.
        let mut candidates: BTreeSet<String> = BTreeSet::new();

        // Sorted traversal keeps module order (and therefore the whole
        // report) deterministic across runs.
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| self.keep_entry(entry));

        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            if path.extension().map_or(true, |ext| ext != "py") {
                continue;
            }
            // __init__.py marks a package directory; it rarely holds
            // documentable declarations.
            if entry.file_name() == "__init__.py" {
                continue;
            }

            // Explicit UTF-8 decode; a binary or mis-encoded file is a
            // diagnostic, not a fatal error.
            let source = match fs::read_to_string(path) {
                Ok(source) => source,
                Err(err) => {
                    diagnostics.push(Diagnostic {
                        file: path.to_path_buf(),
                        message: err.to_string(),
                    });
                    continue;
                }
            };

            let relative = relative_display(path, root);

            let module = match parse(&source, Mode::Module, &relative) {
                Ok(rustpython_ast::Mod::Module(module)) => module,
                // Mode::Module only ever yields a module node.
                Ok(_) => continue,
                Err(err) => {
                    diagnostics.push(Diagnostic {
                        file: path.to_path_buf(),
                        message: err.to_string(),
                    });
                    continue;
                }
            };

            let line_index = LineIndex::new(&source);
            let mut visitor = ModuleVisitor::new(&line_index);
            visitor.visit_module(&module.body);

            // Dual bookkeeping: every declaration lands both under its
            // module and in the project-wide flattened lists, tagged with
            // the owning module path.
            for record in &visitor.functions {
                functions.push(ProjectFunction {
                    module: relative.clone(),
                    record: record.clone(),
                });
            }
            for record in &visitor.classes {
                classes.push(ProjectClass {
                    module: relative.clone(),
                    record: record.clone(),
                });
            }
            candidates.extend(visitor.dependency_candidates.drain(..));

            modules.push(ModuleReport {
                file_path: relative,
                lines_of_code: source.lines().count(),
                functions: visitor.functions,
                classes: visitor.classes,
                imports: visitor.imports,
            });
        }

        // Dependency finalization: drop standard-library names once, after
        // the whole tree has been visited.
        let dependencies: Vec<String> = candidates
            .into_iter()
            .filter(|name| !self.config.stdlib_exclusions.contains(name.as_str()))
            .collect();

        Ok(ProjectReport {
            project_info: ProjectInfo {
                name: project_name(root),
                analysis_date: Utc::now(),
                total_files: modules.len(),
            },
            modules,
            functions,
            classes,
            dependencies,
            git_history,
            diagnostics,
        })
    }

    /// Traversal filter: prunes hidden directories and the configured
    /// skip list. The root itself (depth 0) is always kept, whatever its
    /// name, and files are decided later by extension.
    fn keep_entry(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        !name.starts_with('.') && !self.config.skip_dirs.contains(name.as_ref())
    }
}

/// Basename of the analyzed root, resolved through the absolute path so
/// `.` and trailing separators still yield a usable project name.
fn project_name(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| root.display().to_string())
}
