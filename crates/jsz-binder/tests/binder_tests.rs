use crate::*;
use jsz_common::LineMap;
use jsz_parser::{NodeData, NodeIndex, ParseOutput, ParserState, descendants};

fn parse(source: &str, module: bool) -> ParseOutput {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    parser.set_module(module);
    let output = parser.parse();
    assert!(
        !output.diagnostics.has_errors(),
        "unexpected parse errors: {:?}",
        output.diagnostics.diagnostics()
    );
    output
}

fn bind_with(source: &str, options: BinderOptions) -> (ParseOutput, Result<BinderState, BindError>) {
    let output = parse(source, options.is_module);
    let mut binder = BinderState::new("test.js", options);
    let line_map = LineMap::build(source);
    let result = binder
        .bind_source_file(&output.arena, output.root, &line_map)
        .map(|()| binder);
    (output, result)
}

fn bind(source: &str) -> (ParseOutput, BinderState) {
    let (output, result) = bind_with(source, BinderOptions::default());
    match result {
        Ok(binder) => (output, binder),
        Err(err) => panic!("unexpected bind error: {err}"),
    }
}

fn bind_error(source: &str) -> BindError {
    match bind_with(source, BinderOptions::default()).1 {
        Ok(_) => panic!("expected a bind error for {source:?}"),
        Err(err) => err,
    }
}

/// Identifier nodes named `name`, in source order.
fn idents(output: &ParseOutput, name: &str) -> Vec<NodeIndex> {
    descendants(&output.arena, output.root)
        .into_iter()
        .filter(|&idx| output.arena.identifier_name(idx) == Some(name))
        .collect()
}

fn function_named(output: &ParseOutput, name: &str) -> NodeIndex {
    descendants(&output.arena, output.root)
        .into_iter()
        .find(|&idx| match output.arena.data(idx) {
            Some(NodeData::FunctionDeclaration(f)) => output.arena.identifier_name(f.name) == Some(name),
            _ => false,
        })
        .unwrap_or_else(|| panic!("no function named {name}"))
}

#[test]
fn test_var_redeclaration_shares_one_binding() {
    let (out, binder) = bind("var x = f(); var x = g(); x;");
    let root = binder.root_scope();
    let id = binder.scope(root).names["x"];
    let x = binder.binding(id);
    assert_eq!(x.orig.len(), 2);
    assert_eq!(x.assignments, 2);
    assert_eq!(x.references.len(), 1);
    assert!(x.flags.contains(BindingFlags::REDECLARED));
    assert!(x.is_global());
    for occurrence in idents(&out, "x") {
        assert_eq!(binder.binding_of(occurrence), Some(id));
    }
}

#[test]
fn test_lexical_redeclaration_is_an_error() {
    let err = bind_error("let a; var a;");
    assert_eq!(err.kind, BindErrorKind::Redeclaration);
    assert_eq!(err.name, "a");
    assert_eq!((err.line, err.column), (1, 12));
    assert_eq!(err.to_string(), "test.js:1:12: Identifier 'a' has already been declared.");

    let nested = bind_error("{ let b; { var b; } }");
    assert_eq!(nested.kind, BindErrorKind::Redeclaration);

    let later = bind_error("{ var c; let c; }");
    assert_eq!(later.kind, BindErrorKind::Redeclaration);
}

#[test]
fn test_catch_parameter_may_be_redeclared_by_var() {
    let (_, binder) = bind("try {} catch (e) { var e = 1; }");
    let root = binder.root_scope();
    assert!(binder.scope(root).names.contains_key("e"));
}

#[test]
fn test_function_declarations_are_hoisted() {
    let (out, binder) = bind("f(); function f() {}");
    let occurrences = idents(&out, "f");
    assert_eq!(occurrences.len(), 2);
    let reference = binder.binding_of(occurrences[0]);
    assert!(reference.is_some());
    assert_eq!(reference, binder.binding_of(occurrences[1]));
    let binding = binder.binding(reference.unwrap());
    assert_eq!(binding.kind, DeclKind::Function);
    assert!(!binding.is_undeclared());
    assert!(binder.scope(binder.root_scope()).functions.contains_key("f"));
}

#[test]
fn test_block_functions_are_block_scoped() {
    let (out, binder) = bind("{ function h() {} } h;");
    let occurrences = idents(&out, "h");
    let declared = binder.binding_of(occurrences[0]).unwrap();
    let referenced = binder.binding_of(occurrences[1]).unwrap();
    assert_ne!(declared, referenced);
    assert!(binder.binding(referenced).is_undeclared());
}

#[test]
fn test_use_before_declaration() {
    let err = bind_error("x; let x = 1;");
    assert_eq!(err.kind, BindErrorKind::UseBeforeDeclaration);
    assert_eq!((err.line, err.column), (1, 1));

    // Reads from a nested function may run after initialization.
    let (_, binder) = bind("function g() { return x; } let x = 1;");
    assert!(binder.scope(binder.root_scope()).names.contains_key("x"));
}

#[test]
fn test_label_errors() {
    assert_eq!(
        bind_error("a: for (;;) { break b; }").kind,
        BindErrorKind::UndefinedLabel
    );
    assert_eq!(bind_error("a: a: ;").kind, BindErrorKind::DuplicateLabel);
    assert_eq!(
        bind_error("a: { (function () { break a; }); }").kind,
        BindErrorKind::UndefinedLabel
    );
    bind("outer: for (;;) { for (;;) { continue outer; } }");
}

#[test]
fn test_undeclared_names_become_globals() {
    let (_, binder) = bind("function f() { return g + h + g; }");
    assert_eq!(binder.globals.len(), 2);
    let g = binder.binding(binder.globals["g"]);
    assert!(g.is_undeclared());
    assert!(g.is_global());
    assert_eq!(g.references.len(), 2);
    assert_eq!(g.kind, DeclKind::Global);
}

#[test]
fn test_eval_pins_enclosing_scopes_only() {
    let (out, binder) = bind(
        "function outer() { var a = 1; function inner() { eval('a'); } }
         function other() { var b; }",
    );
    let outer = binder.scope_of(function_named(&out, "outer")).unwrap();
    let inner = binder.scope_of(function_named(&out, "inner")).unwrap();
    let other = binder.scope_of(function_named(&out, "other")).unwrap();
    assert!(binder.scope(inner).uses_eval);
    assert!(binder.scope(outer).uses_eval);
    assert!(binder.scope(binder.root_scope()).uses_eval);
    assert!(!binder.scope(other).uses_eval);

    let a = binder.scope(outer).names["a"];
    assert!(binder.is_pinned(a));
}

#[test]
fn test_eval_reference_without_call() {
    let source = "function f() { var e = eval; }";
    let (out, binder) = bind(source);
    let f = binder.scope_of(function_named(&out, "f")).unwrap();
    assert!(!binder.scope(f).uses_eval);

    let options = BinderOptions {
        treat_eval_as_unknown: true,
        ..BinderOptions::default()
    };
    let (out, result) = bind_with(source, options);
    let binder = result.unwrap();
    let f = binder.scope_of(function_named(&out, "f")).unwrap();
    assert!(binder.scope(f).uses_eval);
}

#[test]
fn test_with_pins_scope() {
    let (out, binder) = bind("function w(o) { with (o) { x; } }");
    let w = binder.scope_of(function_named(&out, "w")).unwrap();
    assert!(binder.scope(w).uses_with);
    assert!(binder.scope(w).is_pinned());
}

#[test]
fn test_enclosed_sets() {
    let (out, binder) = bind("var a; function f() { return a; }");
    let a = binder.scope(binder.root_scope()).names["a"];
    let f = binder.scope_of(function_named(&out, "f")).unwrap();
    assert!(binder.scope(f).enclosed.contains(&a));
    assert!(binder.scope(binder.root_scope()).enclosed.contains(&a));
}

#[test]
fn test_implicit_arguments_binding() {
    let (out, binder) = bind("function f() { return () => arguments; }");
    let f = binder.scope_of(function_named(&out, "f")).unwrap();
    assert!(binder.scope(f).uses_arguments);
    let arguments = binder.scope(f).names["arguments"];
    assert_eq!(binder.binding(arguments).kind, DeclKind::Arguments);
    let reference = idents(&out, "arguments")[0];
    assert_eq!(binder.binding_of(reference), Some(arguments));
    assert!(binder.globals.is_empty());
}

#[test]
fn test_function_expression_name_is_shadowed_by_var() {
    let (out, binder) = bind("(function f() { var f = 1; return f; });");
    let occurrences = idents(&out, "f");
    assert_eq!(occurrences.len(), 3);
    let var_binding = binder.binding_of(occurrences[1]).unwrap();
    assert_eq!(binder.binding(var_binding).kind, DeclKind::Var);
    assert_eq!(binder.binding_of(occurrences[2]), Some(var_binding));
}

#[test]
fn test_module_export_kinds() {
    let options = BinderOptions {
        is_module: true,
        ..BinderOptions::default()
    };
    let (_, result) = bind_with(
        "export var a = 1; var b = 2; export { b }; export default function c() {}",
        options,
    );
    let binder = result.unwrap();
    let names = &binder.scope(binder.root_scope()).names;
    let kind = |name: &str| binder.binding(names[name]).export;
    assert_eq!(kind("a"), ExportKind::NoMangle);
    assert_eq!(kind("b"), ExportKind::WantMangle);
    assert_eq!(kind("c"), ExportKind::WantMangle);
    assert!(!binder.binding(names["a"]).is_global());
}

#[test]
fn test_module_constructs_outside_module_top_level() {
    assert_eq!(
        bind_error("import x from 'y';").kind,
        BindErrorKind::ModuleOnlyConstruct
    );
    let options = BinderOptions {
        is_module: true,
        ..BinderOptions::default()
    };
    let (_, result) = bind_with("{ export var a; }", options);
    assert_eq!(result.unwrap_err().kind, BindErrorKind::ModuleOnlyConstruct);
}

#[test]
fn test_compat_mode_redefines_catch_parameter() {
    let options = BinderOptions {
        compatibility_mode: true,
        ..BinderOptions::default()
    };
    let (out, result) = bind_with("function f() { try {} catch (e) { e; } }", options);
    let binder = result.unwrap();
    let f = binder.scope_of(function_named(&out, "f")).unwrap();
    let occurrences = idents(&out, "e");
    let param = binder.binding_of(occurrences[0]).unwrap();
    let redefined = binder.binding(param).redefined.unwrap();
    assert_eq!(binder.binding(redefined).kind, DeclKind::Var);
    assert_eq!(binder.binding(redefined).scope, f);
    assert_eq!(binder.binding_of(occurrences[1]), Some(redefined));
    assert!(binder.scope(f).enclosed.contains(&redefined));
}

#[test]
fn test_scopes_preorder() {
    let (_, binder) = bind("function a() { { let x; } } function b() {}");
    let order = binder.scopes_preorder();
    assert_eq!(order.len(), binder.scopes.len());
    assert_eq!(order[0], binder.root_scope());
    for pair in order.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[test]
fn test_binding_is_idempotent() {
    let source = "var a = 1; function f(b) { { let c = a; var d = c + b; } try { g(d); } catch (e) { e; } return arguments; } f(a);";
    let output = parse(source, false);
    let line_map = LineMap::build(source);
    let mut first = BinderState::new("test.js", BinderOptions::default());
    let mut second = BinderState::new("test.js", BinderOptions::default());
    for binder in [&mut first, &mut second] {
        if let Err(err) = binder.bind_source_file(&output.arena, output.root, &line_map) {
            panic!("unexpected bind error: {err}");
        }
    }

    assert_eq!(first.scopes.len(), second.scopes.len());
    assert_eq!(first.bindings.len(), second.bindings.len());
    for (a, b) in first.bindings.iter().zip(&second.bindings) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.scope, b.scope);
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.references, b.references, "references of {}", a.name);
        assert_eq!(a.assignments, b.assignments, "assignments of {}", a.name);
    }
    for (a, b) in first.scopes.iter().zip(&second.scopes) {
        assert_eq!(a.enclosed, b.enclosed);
    }
    for idx in descendants(&output.arena, output.root) {
        assert_eq!(first.binding_of(idx), second.binding_of(idx));
    }
}

#[test]
fn test_nested_var_is_enclosed_by_its_block() {
    let (out, binder) = bind("function f() { { let y = g(); var x = h(y); } return x; }");
    let f = binder.scope_of(function_named(&out, "f")).unwrap();
    let x = binder.scope(f).names["x"];
    let block = binder
        .scopes
        .iter()
        .find(|scope| scope.parent == Some(f) && scope.names.contains_key("y"))
        .unwrap();
    assert!(block.enclosed.contains(&x));
    assert!(binder.scope(f).enclosed.contains(&x));
}

#[test]
fn test_block_let_sharing_a_hoisted_var_name_is_rejected() {
    assert_eq!(
        bind_error("function f(){{let f=g();var f=h(f)}return f}").kind,
        BindErrorKind::Redeclaration
    );
}

#[test]
fn test_compat_mode_widens_loop_headers() {
    let source = "function f() { for (let i = 0; i < 3; i++) { g(function () { return 1; }); } }";
    let options = BinderOptions {
        compatibility_mode: true,
        ..BinderOptions::default()
    };
    let (out, result) = bind_with(source, options);
    let binder = result.unwrap();
    let i = binder.binding_of(idents(&out, "i")[0]).unwrap();
    let closure = descendants(&out.arena, out.root)
        .into_iter()
        .find(|&idx| matches!(out.arena.data(idx), Some(NodeData::FunctionExpression(_))))
        .unwrap();
    let closure = binder.scope_of(closure).unwrap();
    assert!(binder.scope(closure).enclosed.contains(&i));

    let (out, binder) = bind(source);
    let closure = descendants(&out.arena, out.root)
        .into_iter()
        .find(|&idx| matches!(out.arena.data(idx), Some(NodeData::FunctionExpression(_))))
        .unwrap();
    let closure = binder.scope_of(closure).unwrap();
    let i = binder.binding_of(idents(&out, "i")[0]).unwrap();
    assert!(!binder.scope(closure).enclosed.contains(&i));
}
