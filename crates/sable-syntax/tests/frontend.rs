//! Whole-program tests through the public API.

use sable_syntax::{
    Ast, Diagnostics, DiagnosticsConfig, Error, Message, NodeId, NodeKind, SourceFile, TokenKind,
};

const PROGRAM: &str = "\
var count : nat = 0, limit : nat = 10;
var ready : bool = false;

while count < limit do
    count += 1;
    if count == 5:
        ready = true
    elif count > 7 do
        log(count, limit - count)
    else:
        ready = not ready and count <> 3
    end
end

return ready
";

fn walk(ast: &Ast<'_>, id: NodeId, visit: &mut dyn FnMut(NodeId)) {
    visit(id);
    let children = if ast.kind(id).is_list() {
        ast.children(id)
    } else {
        ast.left(id).into_iter().chain(ast.right(id)).collect()
    };
    for child in children {
        walk(ast, child, visit);
    }
}

#[test]
fn test_program_parses_cleanly() {
    let file = SourceFile::new("program.sbl", PROGRAM);
    let diagnostics = Diagnostics::buffered(file, DiagnosticsConfig::default());
    let ast = sable_syntax::parse(file, &diagnostics).unwrap();
    assert!(!diagnostics.has_errors(), "{:?}", diagnostics.records());

    let root = ast.root().unwrap();
    let statements = ast.children(root);
    let kinds: Vec<NodeKind> = statements.iter().map(|&id| ast.kind(id)).collect();
    assert_eq!(
        kinds,
        vec![NodeKind::VarList, NodeKind::VarList, NodeKind::While, NodeKind::Return]
    );

    let declarations = ast.children(statements[0]);
    assert_eq!(declarations.len(), 2);
    assert_eq!(ast.content(declarations[1]), "limit");
    let ty = ast.left(declarations[1]).unwrap();
    assert_eq!((ast.kind(ty), ast.content(ty)), (NodeKind::Type, "nat"));

    let body = ast.right(statements[2]).unwrap();
    let branches = ast.children(ast.children(body)[1]);
    assert_eq!(branches.len(), 3);
    assert_eq!(ast.left(branches[2]), None);

    let mut calls = Vec::new();
    walk(&ast, root, &mut |id| {
        if ast.kind(id) == NodeKind::Call {
            calls.push((ast.content(id), ast.children(id).len()));
        }
    });
    assert_eq!(calls, vec![("log", 2)]);
}

#[test]
fn test_spans_point_into_source() {
    let file = SourceFile::new("program.sbl", PROGRAM);
    let diagnostics = Diagnostics::buffered(file, DiagnosticsConfig::default());
    let ast = sable_syntax::parse(file, &diagnostics).unwrap();

    walk(&ast, ast.root().unwrap(), &mut |id| {
        let node = ast.node(id);
        if matches!(node.kind, NodeKind::Ident | NodeKind::Literal | NodeKind::Type) {
            let span = node.span;
            assert_eq!(&PROGRAM[span.start as usize..span.end as usize], node.content);
        }
    });
}

#[test]
fn test_multiple_errors_are_collected_and_rendered() {
    let source = "var x : text = 1;\nx = (2 + ;\ny = 3 @ 4\n";
    let file = SourceFile::new("broken.sbl", source);
    let diagnostics = Diagnostics::buffered(file, DiagnosticsConfig::default());
    let ast = sable_syntax::parse(file, &diagnostics).unwrap();
    assert!(ast.root().is_some());

    let records = diagnostics.records();
    let summary: Vec<(usize, usize, Message)> =
        records.iter().map(|r| (r.row, r.column, r.message)).collect();
    assert_eq!(
        summary,
        vec![
            (1, 9, Message::Expected("a valid type")),
            (2, 10, Message::Expected("another expression term")),
            (2, 10, Message::ExpectedToken(TokenKind::RParen)),
            (3, 7, Message::InvalidSymbol),
        ]
    );

    // Nothing is rendered until the context is finalized.
    assert_eq!(diagnostics.take_output(), "");
    diagnostics.finalize().unwrap();
    let output = diagnostics.take_output();
    assert_eq!(output.matches("ERROR: broken.sbl").count(), 4);
    assert!(output.contains(" 1 | var x : text = 1;\n   |         ^~~~ expected a valid type\n"));
}

#[test]
fn test_fatal_error_stops_the_parse() {
    let source = "var a : int = 1;\nwhile a < 3 do\n    a += 1;\n";
    let file = SourceFile::new("eof.sbl", source);
    let diagnostics = Diagnostics::buffered(file, DiagnosticsConfig::default());

    let (name, diagnostic) = match sable_syntax::parse(file, &diagnostics) {
        Err(Error::Fatal { file, diagnostic }) => (file, diagnostic),
        Err(other) => panic!("expected a fatal diagnostic, got {other}"),
        Ok(_) => panic!("expected the parse to fail"),
    };
    assert_eq!(name, "eof.sbl");
    assert_eq!(diagnostic.message, Message::ExpectedToken(TokenKind::End));
    assert_eq!(diagnostic.row, 4);

    // Rendered eagerly, before the error reached the caller.
    let output = diagnostics.take_output();
    assert!(output.starts_with("ERROR: eof.sbl at line 4, column 1\n"));
    assert!(output.contains("expected 'end'"));
}

#[test]
fn test_deeply_nested_expression() {
    let depth = 200;
    let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    let file = SourceFile::new("deep.sbl", &source);
    let diagnostics = Diagnostics::buffered(file, DiagnosticsConfig::default());
    let ast = sable_syntax::parse(file, &diagnostics).unwrap();

    let root = ast.root().unwrap();
    let only = ast.children(root)[0];
    assert_eq!((ast.kind(only), ast.content(only)), (NodeKind::Literal, "1"));
    assert!(!diagnostics.has_errors());
}

#[test]
fn test_long_block_grows() {
    let source: String = (0..100).map(|i| format!("x{i} = {i};\n")).collect();
    let file = SourceFile::new("long.sbl", &source);
    let diagnostics = Diagnostics::buffered(file, DiagnosticsConfig::default());
    let ast = sable_syntax::parse(file, &diagnostics).unwrap();

    let statements = ast.children(ast.root().unwrap());
    assert_eq!(statements.len(), 100);
    let last = statements[99];
    assert_eq!(ast.kind(last), NodeKind::Assign);
    assert_eq!(ast.content(ast.left(last).unwrap()), "x99");
}
