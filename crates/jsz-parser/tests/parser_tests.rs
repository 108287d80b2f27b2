use crate::*;

fn parse(source: &str) -> ParseOutput {
    let output = ParserState::new("test.js".to_string(), source.to_string()).parse();
    assert!(
        !output.diagnostics.has_errors(),
        "unexpected parse errors: {:?}",
        output.diagnostics.diagnostics()
    );
    output
}

fn parse_module(source: &str) -> ParseOutput {
    let mut parser = ParserState::new("test.mjs".to_string(), source.to_string());
    parser.set_module(true);
    parser.parse()
}

fn statements(output: &ParseOutput) -> Vec<NodeIndex> {
    match output.arena.data(output.root) {
        Some(NodeData::SourceFile { statements, .. }) => statements.clone(),
        other => panic!("expected source file, got {other:?}"),
    }
}

fn expression_of(output: &ParseOutput, statement: NodeIndex) -> &NodeData {
    match output.arena.data(statement) {
        Some(NodeData::ExpressionStatement { expression }) => {
            output.arena.data(*expression).unwrap()
        }
        other => panic!("expected expression statement, got {other:?}"),
    }
}

#[test]
fn test_parse_var_declarations() {
    let out = parse("var a = 1, b; let [c, d] = e; const {f, g: h = 2} = i;");
    let stmts = statements(&out);
    assert_eq!(stmts.len(), 3);
    match out.arena.data(stmts[0]) {
        Some(NodeData::VariableStatement { kind, declarations }) => {
            assert_eq!(*kind, VarKind::Var);
            assert_eq!(declarations.len(), 2);
        }
        other => panic!("{other:?}"),
    }
    match out.arena.data(stmts[2]) {
        Some(NodeData::VariableStatement { kind, declarations }) => {
            assert_eq!(*kind, VarKind::Const);
            let Some(NodeData::VariableDeclarator { name, .. }) = out.arena.data(declarations[0])
            else {
                panic!("declarator expected");
            };
            assert!(matches!(
                out.arena.data(*name),
                Some(NodeData::ObjectPattern { .. })
            ));
        }
        other => panic!("{other:?}"),
    }
}

#[test]
fn test_operator_precedence() {
    let out = parse("a + b * c;");
    let stmts = statements(&out);
    let NodeData::Binary { op, right, .. } = expression_of(&out, stmts[0]) else {
        panic!("binary expected");
    };
    assert_eq!(*op, BinaryOp::Add);
    assert!(matches!(
        out.arena.data(*right),
        Some(NodeData::Binary {
            op: BinaryOp::Mul,
            ..
        })
    ));
}

#[test]
fn test_exponent_is_right_associative() {
    let out = parse("a ** b ** c;");
    let stmts = statements(&out);
    let NodeData::Binary { left, right, .. } = expression_of(&out, stmts[0]) else {
        panic!("binary expected");
    };
    assert!(matches!(
        out.arena.data(*left),
        Some(NodeData::Identifier { .. })
    ));
    assert!(matches!(
        out.arena.data(*right),
        Some(NodeData::Binary {
            op: BinaryOp::Exp,
            ..
        })
    ));
}

#[test]
fn test_arrow_functions() {
    let out = parse("f = (a, b = 1) => a + b; g = x => { return x }; h = async y => y;");
    let stmts = statements(&out);
    let NodeData::Assign { value, .. } = expression_of(&out, stmts[0]) else {
        panic!("assign expected");
    };
    let Some(NodeData::ArrowFunction(f)) = out.arena.data(*value) else {
        panic!("arrow expected");
    };
    assert_eq!(f.params.len(), 2);
    assert!(f.expression_body);

    let NodeData::Assign { value, .. } = expression_of(&out, stmts[2]) else {
        panic!("assign expected");
    };
    let Some(NodeData::ArrowFunction(f)) = out.arena.data(*value) else {
        panic!("arrow expected");
    };
    assert!(f.is_async);
}

#[test]
fn test_destructuring_assignment_becomes_pattern() {
    let out = parse("[a, ...b] = c; ({d, e: f = 1} = g);");
    let stmts = statements(&out);
    let NodeData::Assign { target, .. } = expression_of(&out, stmts[0]) else {
        panic!("assign expected");
    };
    let Some(NodeData::ArrayPattern { elements }) = out.arena.data(*target) else {
        panic!("array pattern expected");
    };
    assert!(matches!(
        out.arena.data(elements[1]),
        Some(NodeData::Rest { .. })
    ));

    let NodeData::Assign { target, .. } = expression_of(&out, stmts[1]) else {
        panic!("assign expected");
    };
    assert!(matches!(
        out.arena.data(*target),
        Some(NodeData::ObjectPattern { .. })
    ));
}

#[test]
fn test_statements_and_labels() {
    let out = parse(
        "outer: for (var i = 0; i < 10; i++) { for (const k in o) { continue outer; } }\n\
         for (let x of xs) break;\n\
         switch (a) { case 1: b(); default: c(); }\n\
         try { t() } catch ({message}) { } finally { }\n\
         do x(); while (y)\n\
         with (o) p;",
    );
    let stmts = statements(&out);
    assert_eq!(stmts.len(), 6);
    assert!(matches!(
        out.arena.data(stmts[0]),
        Some(NodeData::Labeled { .. })
    ));
    assert!(matches!(
        out.arena.data(stmts[1]),
        Some(NodeData::ForOf { .. })
    ));
    assert!(matches!(
        out.arena.data(stmts[5]),
        Some(NodeData::With { .. })
    ));
}

#[test]
fn test_asi_for_return() {
    let out = parse("function f() { return\n1 }");
    let stmts = statements(&out);
    let Some(NodeData::FunctionDeclaration(f)) = out.arena.data(stmts[0]) else {
        panic!("function expected");
    };
    let Some(NodeData::Block { statements }) = out.arena.data(f.body) else {
        panic!("block expected");
    };
    assert_eq!(statements.len(), 2);
    assert!(matches!(
        out.arena.data(statements[0]),
        Some(NodeData::Return { argument }) if argument.is_none()
    ));
}

#[test]
fn test_classes() {
    let out = parse(
        "class A extends B { constructor() { super() } static s = 1; #p; get x() { return 1 } static { init() } }",
    );
    let stmts = statements(&out);
    let Some(NodeData::ClassDeclaration(c)) = out.arena.data(stmts[0]) else {
        panic!("class expected");
    };
    assert!(c.extends.is_some());
    assert_eq!(c.members.len(), 5);
    assert!(matches!(
        out.arena.data(c.members[0]),
        Some(NodeData::MethodDefinition {
            kind: MethodKind::Constructor,
            ..
        })
    ));
    assert!(matches!(
        out.arena.data(c.members[4]),
        Some(NodeData::StaticBlock { .. })
    ));
}

#[test]
fn test_templates_and_optional_chaining() {
    let out = parse("x = `a${b}c${d + `e${f}`}`; y = o?.p?.[q]?.(r);");
    let stmts = statements(&out);
    let NodeData::Assign { value, .. } = expression_of(&out, stmts[0]) else {
        panic!("assign expected");
    };
    let Some(NodeData::TemplateLiteral {
        quasis,
        expressions,
    }) = out.arena.data(*value)
    else {
        panic!("template expected");
    };
    assert_eq!(quasis, &vec!["a".to_string(), "c".to_string(), String::new()]);
    assert_eq!(expressions.len(), 2);

    let NodeData::Assign { value, .. } = expression_of(&out, stmts[1]) else {
        panic!("assign expected");
    };
    assert!(matches!(
        out.arena.data(*value),
        Some(NodeData::Call { optional: true, .. })
    ));
}

#[test]
fn test_module_import_export() {
    let out = parse_module(
        "import d, {a as b, c} from 'm'; import * as ns from 'n';\n\
         export const x = 1; export {b as y}; export default function () {}\n\
         export * from 'o';",
    );
    assert!(!out.diagnostics.has_errors());
    let stmts = statements(&out);
    assert_eq!(stmts.len(), 6);
    match out.arena.data(stmts[0]) {
        Some(NodeData::ImportDeclaration { specifiers, source }) => {
            assert_eq!(source, "m");
            assert_eq!(specifiers.len(), 3);
        }
        other => panic!("{other:?}"),
    }
    assert!(matches!(
        out.arena.data(stmts[4]),
        Some(NodeData::ExportDefault { .. })
    ));
    assert!(matches!(
        out.arena.data(out.root),
        Some(NodeData::SourceFile {
            is_module: true,
            ..
        })
    ));
}

#[test]
fn test_parse_errors_are_reported() {
    let out = ParserState::new("bad.js".to_string(), "var = ;".to_string()).parse();
    assert!(out.diagnostics.has_errors());
    assert_eq!(
        out.diagnostics.diagnostics()[0].code,
        jsz_common::diagnostics::diagnostic_codes::IDENTIFIER_EXPECTED
    );
}

#[test]
fn test_invalid_assignment_target() {
    let out = ParserState::new("bad.js".to_string(), "1 = 2;".to_string()).parse();
    assert!(
        out.diagnostics
            .with_code(jsz_common::diagnostics::diagnostic_codes::INVALID_ASSIGNMENT_TARGET)
            .count()
            == 1
    );
}
