// Lib file to expose modules for testing and external usage.
// This file serves as the root for the library crate.

/// Module containing the core analyzer logic.
/// This includes the `DocGen` struct and its methods for running the analysis.
pub mod analyzer;

/// Module containing the AST visitor implementation.
/// This is responsible for traversing the Python AST and collecting data.
pub mod visitor;

/// Module defining the report data structures.
/// This includes `ProjectReport`, `ModuleReport`, `FunctionRecord`, etc.
pub mod report;

/// Module for best-effort git history retrieval.
pub mod git;

/// Module containing utility functions.
/// This includes line number mapping and path display helpers.
pub mod utils;
