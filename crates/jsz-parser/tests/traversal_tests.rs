use crate::*;

fn parse(source: &str) -> ParseOutput {
    ParserState::new("test.js".to_string(), source.to_string()).parse()
}

fn identifier_names(arena: &NodeArena, nodes: &[NodeIndex]) -> Vec<String> {
    nodes
        .iter()
        .filter_map(|&n| arena.identifier_name(n).map(str::to_string))
        .collect()
}

#[test]
fn test_children_follow_evaluation_order() {
    let out = parse("for (init; test; update) body;");
    let Some(NodeData::SourceFile { statements, .. }) = out.arena.data(out.root) else {
        panic!("source file expected");
    };
    let kids = children(&out.arena, statements[0]);
    let names: Vec<String> = kids
        .iter()
        .map(|&k| match out.arena.data(k) {
            Some(NodeData::Identifier { name }) => name.clone(),
            Some(NodeData::ExpressionStatement { expression }) => out
                .arena
                .identifier_name(*expression)
                .unwrap_or_default()
                .to_string(),
            other => panic!("{other:?}"),
        })
        .collect();
    assert_eq!(names, vec!["init", "test", "body", "update"]);

    let rev = children_rev(&out.arena, statements[0]);
    assert_eq!(rev.first(), kids.last());
}

#[test]
fn test_descendants_pre_order() {
    let out = parse("a(b, c + d);");
    let all = descendants(&out.arena, out.root);
    assert_eq!(identifier_names(&out.arena, &all), vec!["a", "b", "c", "d"]);
}

#[test]
fn test_visit_can_replace_nodes() {
    let mut out = parse("x + y;");
    let mut seen_post = 0;
    visit(
        &mut out.arena,
        out.root,
        &mut |arena, idx| {
            if arena.identifier_name(idx) == Some("x") {
                arena.replace(idx, NodeData::NumericLiteral { value: 1.0 });
            }
            VisitAction::Continue
        },
        &mut |_, _| seen_post += 1,
    );
    let all = descendants(&out.arena, out.root);
    assert_eq!(identifier_names(&out.arena, &all), vec!["y"]);
    assert!(
        all.iter()
            .any(|&n| matches!(out.arena.data(n), Some(NodeData::NumericLiteral { value }) if *value == 1.0))
    );
    assert_eq!(seen_post, all.len());
}

#[test]
fn test_skip_children() {
    let mut out = parse("function f() { inner; } outer;");
    let mut visited = Vec::new();
    visit(
        &mut out.arena,
        out.root,
        &mut |arena, idx| {
            if let Some(name) = arena.identifier_name(idx) {
                visited.push(name.to_string());
            }
            if arena.is_function_like(idx) {
                VisitAction::SkipChildren
            } else {
                VisitAction::Continue
            }
        },
        &mut |_, _| {},
    );
    assert_eq!(visited, vec!["outer"]);
}
