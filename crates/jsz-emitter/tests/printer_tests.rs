use crate::Printer;
use jsz_parser::ParserState;

fn print_with(source: &str, module: bool) -> String {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    parser.set_module(module);
    let output = parser.parse();
    assert!(
        !output.diagnostics.has_errors(),
        "unexpected parse errors: {:?}",
        output.diagnostics.diagnostics()
    );
    Printer::print(&output.arena, output.root)
}

fn print(source: &str) -> String {
    print_with(source, false)
}

#[test]
fn test_last_semicolon_is_omitted() {
    assert_eq!(print("var a = 1, b;"), "var a=1,b");
    assert_eq!(print("a(); b();"), "a();b()");
    assert_eq!(print("function f(a, b) { return a + b; }"), "function f(a,b){return a+b}");
}

#[test]
fn test_parentheses_follow_precedence() {
    assert_eq!(print("(a + b) * c;"), "(a+b)*c");
    assert_eq!(print("a + (b * c);"), "a+b*c");
    assert_eq!(print("a - (b - c);"), "a-(b-c)");
    assert_eq!(print("f((a, b));"), "f((a,b))");
    assert_eq!(print("x = a ? b : c;"), "x=a?b:c");
    assert_eq!(print("a ?? (b || c);"), "a??(b||c)");
    assert_eq!(print("(-a) ** 2;"), "(-a)**2");
}

#[test]
fn test_adjacent_operators_stay_apart() {
    assert_eq!(print("a - -b;"), "a- -b");
    assert_eq!(print("a + +b;"), "a+ +b");
    assert_eq!(print("typeof x;"), "typeof x");
    assert_eq!(print("void 0;"), "void 0");
}

#[test]
fn test_booleans_print_as_negated_numbers() {
    assert_eq!(print("x = true; y = false;"), "x=!0;y=!1");
}

#[test]
fn test_statement_level_functions_and_objects_are_wrapped() {
    assert_eq!(print("(function () {})();"), "(function(){}())");
    assert_eq!(print("({}).toString();"), "({}.toString())");
    assert_eq!(print("f = () => ({});"), "f=()=>({})");
}

#[test]
fn test_number_members_keep_their_dot() {
    assert_eq!(print("(1).toString();"), "1..toString()");
    assert_eq!(print("(1.5).toFixed();"), "1.5.toFixed()");
}

#[test]
fn test_new_callee_with_call_is_wrapped() {
    assert_eq!(print("new (f())();"), "new(f())()");
    assert_eq!(print("new a.B(1);"), "new a.B(1)");
}

#[test]
fn test_loops_and_labels() {
    assert_eq!(print("for (var i = 0; i < n; i++) ;"), "for(var i=0;i<n;i++);");
    assert_eq!(print("a: for (;;) break a;"), "a:for(;;)break a");
    assert_eq!(print("do x(); while (y);"), "do x();while(y)");
    assert_eq!(print("for (const k in o) f(k);"), "for(const k in o)f(k)");
}

#[test]
fn test_destructuring_uses_shorthand_when_names_match() {
    assert_eq!(print("var {a, b: c = 1} = o;"), "var{a,b:c=1}=o");
    assert_eq!(print("var [x, , y] = arr;"), "var[x,,y]=arr");
}

#[test]
fn test_classes_separate_fields() {
    assert_eq!(
        print("class A extends B { static x = 1; get y() { return 2; } }"),
        "class A extends B{static x=1;get y(){return 2}}"
    );
}

#[test]
fn test_templates_print_raw() {
    assert_eq!(print("`a${b}c`;"), "`a${b}c`");
}

#[test]
fn test_modules_print_compactly() {
    assert_eq!(
        print_with("import a, {b as c, d} from \"m\"; export {c as e};", true),
        "import a,{b as c,d}from\"m\";export{c as e}"
    );
    assert_eq!(print_with("import \"m\";", true), "import\"m\"");
    assert_eq!(print_with("export default function () {}", true), "export default function(){}");
}

#[test]
fn test_try_and_switch() {
    assert_eq!(
        print("try { a(); } catch (e) { b(e); } finally { c(); }"),
        "try{a()}catch(e){b(e)}finally{c()}"
    );
    assert_eq!(
        print("switch (x) { case 1: a(); break; default: b(); }"),
        "switch(x){case 1:a();break;default:b()}"
    );
}
