use codedoc_rs::report::{ClassRecord, FunctionRecord};
use codedoc_rs::utils::LineIndex;
use codedoc_rs::visitor::ModuleVisitor;
use rustpython_parser::{parse, Mode};

struct Extracted {
    functions: Vec<FunctionRecord>,
    classes: Vec<ClassRecord>,
    imports: Vec<String>,
    candidates: Vec<String>,
}

/// Parses a snippet and runs the module visitor over it.
fn extract(source: &str) -> Extracted {
    let line_index = LineIndex::new(source);
    let mut visitor = ModuleVisitor::new(&line_index);
    let tree = parse(source, Mode::Module, "test.py").expect("Failed to parse");
    if let rustpython_ast::Mod::Module(module) = tree {
        visitor.visit_module(&module.body);
    }
    Extracted {
        functions: visitor.functions,
        classes: visitor.classes,
        imports: visitor.imports,
        candidates: visitor.dependency_candidates,
    }
}

#[test]
fn test_parameters_in_declaration_order() {
    let source = r#"
def connect(host, port=5432, timeout=30):
    pass
"#;
    let result = extract(source);
    let func = &result.functions[0];

    assert_eq!(func.args, vec!["host", "port", "timeout"]);
    assert_eq!(func.defaults_count, 2);
    assert!(func.defaults_count <= func.args.len());
    assert_eq!(func.lineno, 2);
}

#[test]
fn test_positional_only_parameters_included() {
    let source = r#"
def blend(base, /, overlay, alpha=0.5):
    pass
"#;
    let func = &extract(source).functions[0];
    assert_eq!(func.args, vec!["base", "overlay", "alpha"]);
    assert_eq!(func.defaults_count, 1);
}

#[test]
fn test_docstrings_extracted() {
    let source = r#"
def documented():
    """Does the thing."""
    pass

def undocumented():
    pass

class Widget:
    """A widget."""
"#;
    let result = extract(source);

    assert_eq!(
        result.functions[0].docstring.as_deref(),
        Some("Does the thing.")
    );
    assert_eq!(result.functions[1].docstring, None);
    assert_eq!(result.classes[0].docstring.as_deref(), Some("A widget."));
}

#[test]
fn test_decorator_resolution_forms() {
    let source = r#"
@staticmethod
@functools.wraps
@app.route("/home", methods=["GET"])
def handler():
    pass
"#;
    let func = &extract(source).functions[0];

    // Bare name, attribute access, and a call wrapping an attribute all
    // resolve to the trailing simple name; call arguments are ignored.
    assert_eq!(func.decorators, vec!["staticmethod", "wraps", "route"]);
}

#[test]
fn test_unresolvable_decorator_dropped_silently() {
    let source = r#"
@(lambda f: f)
def odd():
    pass
"#;
    let func = &extract(source).functions[0];
    assert!(func.decorators.is_empty());
}

#[test]
fn test_class_without_bases_has_empty_list() {
    let source = r#"
class Standalone:
    pass
"#;
    let class = &extract(source).classes[0];
    assert!(class.bases.is_empty());
}

#[test]
fn test_base_class_resolution() {
    let source = r#"
class Model(Base, abc.ABC):
    pass
"#;
    let class = &extract(source).classes[0];
    assert_eq!(class.bases, vec!["Base", "ABC"]);
}

#[test]
fn test_subscripted_base_dropped() {
    let source = r#"
class Container(Generic[T]):
    pass
"#;
    // A subscript is neither a name nor an attribute, so it yields nothing.
    let class = &extract(source).classes[0];
    assert!(class.bases.is_empty());
}

#[test]
fn test_methods_are_direct_body_functions_only() {
    let source = r#"
class Service:
    def start(self):
        def helper():
            pass
        helper()

    def stop(self):
        pass
"#;
    let result = extract(source);
    let class = &result.classes[0];

    // `helper` is nested inside a method, not a method itself.
    let method_names: Vec<&str> = class.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(method_names, vec!["start", "stop"]);

    // The flattened list still sees all three, nesting intentionally lost.
    let all_names: Vec<&str> = result.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(all_names, vec!["start", "helper", "stop"]);
}

#[test]
fn test_async_functions_recorded() {
    let source = r#"
async def fetch(url):
    pass

class Client:
    async def get(self, path):
        pass
"#;
    let result = extract(source);

    let names: Vec<&str> = result.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["fetch", "get"]);
    assert_eq!(result.classes[0].methods[0].name, "get");
}

#[test]
fn test_declarations_inside_control_flow_found() {
    let source = r#"
import sys

if sys.platform == "win32":
    import winreg

    def windows_only():
        pass

try:
    import ujson
except ImportError:
    import json
"#;
    let result = extract(source);

    assert_eq!(result.functions[0].name, "windows_only");
    assert!(result.imports.contains(&"winreg".to_string()));
    assert!(result.imports.contains(&"ujson".to_string()));
    assert!(result.imports.contains(&"json".to_string()));
}

#[test]
fn test_nested_class_recorded_once() {
    let source = r#"
class Outer:
    class Inner:
        def method(self):
            pass
"#;
    let result = extract(source);

    let names: Vec<&str> = result.classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Outer", "Inner"]);
    // Inner's method belongs to Inner, not Outer.
    assert!(result.classes[0].methods.is_empty());
    assert_eq!(result.classes[1].methods.len(), 1);
}

#[test]
fn test_plain_import_records_full_dotted_name() {
    let source = "import os.path\nimport requests\n";
    let result = extract(source);

    assert_eq!(result.imports, vec!["os.path", "requests"]);
    assert_eq!(result.candidates, vec!["os", "requests"]);
}

#[test]
fn test_from_import_records_module_dot_symbol() {
    let source = "from collections import OrderedDict, defaultdict\n";
    let result = extract(source);

    assert_eq!(
        result.imports,
        vec!["collections.OrderedDict", "collections.defaultdict"]
    );
    assert_eq!(result.candidates, vec!["collections"]);
}

#[test]
fn test_relative_imports_record_bare_names_without_candidates() {
    let source = "from . import sibling\nfrom .helpers import util\n";
    let result = extract(source);

    assert_eq!(result.imports, vec!["sibling", "helpers.util"]);
    // The current package is never an external dependency.
    assert!(result.candidates.is_empty());
}

#[test]
fn test_line_numbers_are_one_indexed() {
    let source = "\n\ndef third_line(): pass\n";
    let func = &extract(source).functions[0];
    assert_eq!(func.lineno, 3);
}
