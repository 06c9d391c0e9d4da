//! Tests for the GML parser facade: scenario coverage over the whole
//! pipeline. Component-level tests live next to their modules.

use gml_ast::{Location, Node, NodeKind};
use gml_error::ParseFailure;

use crate::{ParseOptions, parse, parse_with_trivia};

fn parse_ok(source: &str) -> Node {
    match parse(source, &ParseOptions::default()) {
        Ok(program) => program,
        Err(err) => panic!("expected {source:?} to parse, got: {err}"),
    }
}

fn parse_err(source: &str) -> ParseFailure {
    match parse(source, &ParseOptions::default()) {
        Ok(_) => panic!("expected {source:?} to fail"),
        Err(err) => err,
    }
}

fn body(program: &Node) -> &[Node] {
    match &program.kind {
        NodeKind::Program { body, .. } => body,
        other => panic!("expected Program, got {}", other.type_name()),
    }
}

fn single_stmt(program: &Node) -> &Node {
    let stmts = body(program);
    assert_eq!(stmts.len(), 1, "expected one statement, got {}", stmts.len());
    &stmts[0]
}

fn expr_of(stmt: &Node) -> &Node {
    match &stmt.kind {
        NodeKind::ExpressionStatement { expression } => expression,
        other => panic!("expected ExpressionStatement, got {}", other.type_name()),
    }
}

fn identifier_name(node: &Node) -> &str {
    match &node.kind {
        NodeKind::Identifier { name, .. } => name,
        other => panic!("expected Identifier, got {}", other.type_name()),
    }
}

#[test]
fn var_declaration_shape() {
    // Scenario: `var x = 1;`
    let program = parse_ok("var x = 1;");
    let NodeKind::VariableDeclaration { kind, declarations } = &single_stmt(&program).kind else {
        panic!("expected VariableDeclaration");
    };
    assert_eq!(kind, "var");
    assert_eq!(declarations.len(), 1);
    let NodeKind::VariableDeclarator { id, init } = &declarations[0].kind else {
        panic!("expected VariableDeclarator");
    };
    assert_eq!(identifier_name(id), "x");
    let NodeKind::Literal { value } = &init.as_ref().unwrap().kind else {
        panic!("expected Literal init");
    };
    assert_eq!(value, "1");

    let NodeKind::Program { comments, .. } = &program.kind else { unreachable!() };
    assert_eq!(comments.as_deref(), Some(&[][..]));
}

#[test]
fn static_declaration_keeps_its_kind() {
    let program = parse_ok("static hp = 100;");
    let NodeKind::VariableDeclaration { kind, .. } = &single_stmt(&program).kind else {
        panic!("expected VariableDeclaration");
    };
    assert_eq!(kind, "static");
}

#[test]
fn sanitized_condition_reports_original_indices() {
    // Scenario: `if (x = y)` is rewritten to `==`, indices point at the
    // author's text.
    let source = "if (x = y) { z = 1; }";
    let program = parse_ok(source);
    let NodeKind::IfStatement { test, .. } = &single_stmt(&program).kind else {
        panic!("expected IfStatement");
    };
    let NodeKind::BinaryExpression { operator, left, .. } = &test.kind else {
        panic!("expected BinaryExpression test, got {}", test.type_name());
    };
    assert_eq!(operator, "==");
    // `x` sits at offset 4 in the original source.
    assert_eq!(left.start, Some(Location::Index(4)));
    assert_eq!(identifier_name(left), "x");
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    // Scenario: `a + b * c` nests the product on the right, no synthetic
    // parens anywhere.
    let program = parse_ok("a + b * c");
    let NodeKind::BinaryExpression { operator, left, right } =
        &expr_of(single_stmt(&program)).kind
    else {
        panic!("expected BinaryExpression");
    };
    assert_eq!(operator, "+");
    assert_eq!(identifier_name(left), "a");
    let NodeKind::BinaryExpression { operator: inner, .. } = &right.kind else {
        panic!("expected nested BinaryExpression");
    };
    assert_eq!(inner, "*");
}

#[test]
fn user_parens_survive_without_synthetic_flag() {
    // Scenario: `(a + b) * c` keeps the author's parentheses.
    let program = parse_ok("(a + b) * c");
    let NodeKind::BinaryExpression { operator, left, .. } = &expr_of(single_stmt(&program)).kind
    else {
        panic!("expected BinaryExpression");
    };
    assert_eq!(operator, "*");
    let NodeKind::ParenthesizedExpression { expression, synthetic, position } = &left.kind else {
        panic!("expected ParenthesizedExpression, got {}", left.type_name());
    };
    assert_eq!(*synthetic, None);
    assert_eq!(*position, None);
    let NodeKind::BinaryExpression { operator: inner, .. } = &expression.kind else {
        panic!("expected inner BinaryExpression");
    };
    assert_eq!(inner, "+");
}

#[test]
fn subtraction_chains_nest_left() {
    let program = parse_ok("a - b - c");
    let NodeKind::BinaryExpression { left, right, .. } = &expr_of(single_stmt(&program)).kind
    else {
        panic!("expected BinaryExpression");
    };
    assert!(matches!(left.kind, NodeKind::BinaryExpression { .. }));
    assert_eq!(identifier_name(right), "c");
}

#[test]
fn null_coalescing_chains_nest_right() {
    let program = parse_ok("a ?? b ?? c");
    let NodeKind::BinaryExpression { left, right, .. } = &expr_of(single_stmt(&program)).kind
    else {
        panic!("expected BinaryExpression");
    };
    assert_eq!(identifier_name(left), "a");
    assert!(matches!(right.kind, NodeKind::BinaryExpression { .. }));
}

#[test]
fn globalvar_marks_later_references() {
    // Scenario: `globalvar g1, g2;` flags the reference inside `f`.
    let program = parse_ok("globalvar g1, g2; function f() { return g1; }");
    let stmts = body(&program);

    let NodeKind::GlobalVarStatement { declarations, kind } = &stmts[0].kind else {
        panic!("expected GlobalVarStatement");
    };
    assert_eq!(kind, "globalvar");
    assert_eq!(declarations.len(), 2);
    for decl in declarations {
        let NodeKind::VariableDeclarator { id, .. } = &decl.kind else { panic!() };
        let NodeKind::Identifier { is_global_identifier, .. } = &id.kind else { panic!() };
        assert_eq!(*is_global_identifier, Some(true));
    }

    let NodeKind::FunctionDeclaration { body: fn_body, .. } = &stmts[1].kind else {
        panic!("expected FunctionDeclaration");
    };
    let NodeKind::BlockStatement { body: block } = &fn_body.kind else { panic!() };
    let NodeKind::ReturnStatement { argument } = &block[0].kind else { panic!() };
    let NodeKind::Identifier { name, is_global_identifier, .. } =
        &argument.as_ref().unwrap().kind
    else {
        panic!("expected Identifier return argument");
    };
    assert_eq!(name, "g1");
    assert_eq!(*is_global_identifier, Some(true));
}

#[test]
fn missing_parameters_materialize_from_commas() {
    // Scenario: `function M(,a,,b,){}` with leading, embedded and trailing
    // omissions.
    let program = parse_ok("function M(,a,,b,){}");
    let NodeKind::FunctionDeclaration { params, has_trailing_comma, .. } =
        &single_stmt(&program).kind
    else {
        panic!("expected FunctionDeclaration");
    };
    assert_eq!(params.len(), 5);
    assert!(matches!(params[0].kind, NodeKind::MissingOptionalArgument {}));
    assert_eq!(identifier_name(&params[1]), "a");
    assert!(matches!(params[2].kind, NodeKind::MissingOptionalArgument {}));
    assert_eq!(identifier_name(&params[3]), "b");
    assert!(matches!(params[4].kind, NodeKind::MissingOptionalArgument {}));
    assert!(has_trailing_comma);
}

#[test]
fn missing_arguments_materialize_from_commas() {
    let program = parse_ok("f(a,,b)");
    let NodeKind::CallExpression { arguments, .. } = &expr_of(single_stmt(&program)).kind else {
        panic!("expected CallExpression");
    };
    assert_eq!(arguments.len(), 3);
    assert!(matches!(arguments[1].kind, NodeKind::MissingOptionalArgument {}));
}

#[test]
fn empty_call_has_no_arguments() {
    let program = parse_ok("f()");
    let NodeKind::CallExpression { arguments, .. } = &expr_of(single_stmt(&program)).kind else {
        panic!("expected CallExpression");
    };
    assert!(arguments.is_empty());
}

#[test]
fn truncated_condition_raises_a_syntax_error() {
    // Scenario: `if (x` fails inside the expression rule.
    let err = parse_err("if (x");
    let syntax = match err {
        ParseFailure::Syntax(e) => e,
        other => panic!("expected a syntax error, got {other}"),
    };
    assert_eq!(syntax.rule, "expression");
    assert!(syntax.message.starts_with("Syntax Error (line 1, column "), "{}", syntax.message);
    assert_eq!(syntax.wrong_symbol, "end of file");
}

#[test]
fn macro_declaration_is_global_with_raw_tokens() {
    // Scenario: `#macro PI 3.14`
    let program = parse_ok("#macro PI 3.14");
    let NodeKind::MacroDeclaration { name, tokens } = &single_stmt(&program).kind else {
        panic!("expected MacroDeclaration");
    };
    let NodeKind::Identifier { name, is_global_identifier, .. } = &name.kind else { panic!() };
    assert_eq!(name, "PI");
    assert_eq!(*is_global_identifier, Some(true));
    assert_eq!(tokens, "3.14");
}

#[test]
fn macro_body_continues_across_backslash() {
    let program = parse_ok("#macro LONG 1 + \\\n2\nvar x;");
    let stmts = body(&program);
    assert_eq!(stmts.len(), 2);
    let NodeKind::MacroDeclaration { tokens, .. } = &stmts[0].kind else {
        panic!("expected MacroDeclaration");
    };
    assert_eq!(tokens, "1 + \\\n2");
}

#[test]
fn global_member_access_registers_the_name() {
    let program = parse_ok("global.score = 1; x = score;");
    let stmts = body(&program);
    let NodeKind::ExpressionStatement { expression } = &stmts[1].kind else { panic!() };
    let NodeKind::AssignmentExpression { right, .. } = &expression.kind else { panic!() };
    let NodeKind::Identifier { is_global_identifier, .. } = &right.kind else { panic!() };
    assert_eq!(*is_global_identifier, Some(true));
}

#[test]
fn member_dot_spans_the_full_receiver() {
    let source = "foo.bar.baz";
    let program = parse_ok(source);
    let expr = expr_of(single_stmt(&program));
    assert!(matches!(expr.kind, NodeKind::MemberDotExpression { .. }));
    assert_eq!(expr.start, Some(Location::Index(0)));
    assert_eq!(expr.end, Some(Location::Index(source.len() - 1)));
}

#[test]
fn accessor_text_is_preserved() {
    let program = parse_ok("grid[# 1, 2]");
    let NodeKind::MemberIndexExpression { accessor, property, .. } =
        &expr_of(single_stmt(&program)).kind
    else {
        panic!("expected MemberIndexExpression");
    };
    assert_eq!(accessor, "[#");
    assert_eq!(property.len(), 2);
}

#[test]
fn plain_index_accessor() {
    let program = parse_ok("arr[0]");
    let NodeKind::MemberIndexExpression { accessor, property, .. } =
        &expr_of(single_stmt(&program)).kind
    else {
        panic!("expected MemberIndexExpression");
    };
    assert_eq!(accessor, "[");
    assert_eq!(property.len(), 1);
}

#[test]
fn pascal_assignment_normalizes_to_equals() {
    let program = parse_ok("x := 1;");
    let NodeKind::AssignmentExpression { operator, .. } = &expr_of(single_stmt(&program)).kind
    else {
        panic!("expected AssignmentExpression");
    };
    assert_eq!(operator, "=");
}

#[test]
fn word_not_normalizes_to_bang() {
    let program = parse_ok("x = not y;");
    let NodeKind::AssignmentExpression { right, .. } = &expr_of(single_stmt(&program)).kind
    else {
        panic!("expected AssignmentExpression");
    };
    let NodeKind::UnaryExpression { operator, prefix, .. } = &right.kind else {
        panic!("expected UnaryExpression");
    };
    assert_eq!(operator, "!");
    assert!(prefix);
}

#[test]
fn postfix_inc_dec_becomes_a_statement() {
    let program = parse_ok("x++;");
    let NodeKind::IncDecStatement { operator, prefix, argument } = &single_stmt(&program).kind
    else {
        panic!("expected IncDecStatement, got {}", single_stmt(&program).type_name());
    };
    assert_eq!(operator, "++");
    assert!(!prefix);
    assert_eq!(identifier_name(argument), "x");
}

#[test]
fn prefix_inc_dec_becomes_a_statement() {
    let program = parse_ok("--y;");
    let NodeKind::IncDecStatement { operator, prefix, .. } = &single_stmt(&program).kind else {
        panic!("expected IncDecStatement");
    };
    assert_eq!(operator, "--");
    assert!(prefix);
}

#[test]
fn inc_dec_on_a_literal_is_rejected_with_the_dedicated_message() {
    let err = parse_err("++1;");
    let syntax = match err {
        ParseFailure::Syntax(e) => e,
        other => panic!("expected a syntax error, got {other}"),
    };
    assert!(
        syntax.message.ends_with("++, -- can only be used on a variable-addressing expression"),
        "{}",
        syntax.message
    );
}

#[test]
fn inc_dec_inside_an_expression_stays_an_expression() {
    let program = parse_ok("y = x++;");
    let NodeKind::AssignmentExpression { right, .. } = &expr_of(single_stmt(&program)).kind
    else {
        panic!("expected AssignmentExpression");
    };
    assert!(matches!(right.kind, NodeKind::IncDecExpression { .. }));
}

#[test]
fn bare_identifier_statement() {
    let program = parse_ok("foo;");
    let NodeKind::IdentifierStatement { name } = &single_stmt(&program).kind else {
        panic!("expected IdentifierStatement, got {}", single_stmt(&program).type_name());
    };
    assert_eq!(identifier_name(name), "foo");
}

#[test]
fn missing_closing_brace_is_reported_at_the_opener() {
    let err = parse_err("function f() {\n  return 1;\n");
    let syntax = match err {
        ParseFailure::Syntax(e) => e,
        other => panic!("expected a syntax error, got {other}"),
    };
    assert_eq!(syntax.rule, "closeBlock");
    assert!(syntax.message.contains("missing associated closing brace"));
    // The opener sits on line 1, column 13.
    assert_eq!(syntax.line, 1);
    assert_eq!(syntax.column, 13);
}

#[test]
fn unexpected_token_in_parameters_mentions_parameters() {
    let err = parse_err("function f(1) {}");
    let syntax = match err {
        ParseFailure::Syntax(e) => e,
        other => panic!("expected a syntax error, got {other}"),
    };
    assert_eq!(syntax.rule, "parameterList");
    assert!(syntax.message.contains("in function parameters, expected an identifier"));
    assert_eq!(syntax.wrong_symbol, "'1'");
}

#[test]
fn lexer_error_surfaces_before_parsing() {
    let err = parse_err("var § = 1;");
    assert!(matches!(err, ParseFailure::Lexer(_)), "got {err}");
}

#[test]
fn begin_end_blocks_are_braces() {
    let program = parse_ok("if (x) begin exit; end");
    let NodeKind::IfStatement { consequent, .. } = &single_stmt(&program).kind else {
        panic!("expected IfStatement");
    };
    let NodeKind::BlockStatement { body } = &consequent.kind else {
        panic!("expected BlockStatement");
    };
    assert!(matches!(body[0].kind, NodeKind::ExitStatement {}));
}

#[test]
fn do_until_loop() {
    let program = parse_ok("do { i += 1; } until (i > 9);");
    let NodeKind::DoUntilStatement { body: loop_body, test } = &single_stmt(&program).kind else {
        panic!("expected DoUntilStatement");
    };
    assert!(matches!(loop_body.kind, NodeKind::BlockStatement { .. }));
    assert!(matches!(test.kind, NodeKind::BinaryExpression { .. }));
}

#[test]
fn for_loop_slots() {
    let program = parse_ok("for (var i = 0; i < 10; i += 1) { f(i); }");
    let NodeKind::ForStatement { init, test, update, body: loop_body } =
        &single_stmt(&program).kind
    else {
        panic!("expected ForStatement");
    };
    assert!(matches!(init.as_ref().unwrap().kind, NodeKind::VariableDeclaration { .. }));
    assert!(matches!(test.as_ref().unwrap().kind, NodeKind::BinaryExpression { .. }));
    assert!(matches!(update.as_ref().unwrap().kind, NodeKind::AssignmentExpression { .. }));
    assert!(matches!(loop_body.kind, NodeKind::BlockStatement { .. }));
}

#[test]
fn empty_for_header() {
    let program = parse_ok("for (;;) { exit; }");
    let NodeKind::ForStatement { init, test, update, .. } = &single_stmt(&program).kind else {
        panic!("expected ForStatement");
    };
    assert!(init.is_none());
    assert!(test.is_none());
    assert!(update.is_none());
}

#[test]
fn switch_cases_and_default() {
    let program = parse_ok("switch (x) { case 1: a(); break; case 2: case 3: b(); default: c(); }");
    let NodeKind::SwitchStatement { discriminant, cases } = &single_stmt(&program).kind else {
        panic!("expected SwitchStatement");
    };
    assert_eq!(identifier_name(discriminant), "x");
    assert_eq!(cases.len(), 4);
    let NodeKind::SwitchCase { test, body } = &cases[0].kind else { panic!() };
    assert!(test.is_some());
    assert_eq!(body.len(), 2);
    let NodeKind::SwitchCase { test, body } = &cases[3].kind else { panic!() };
    assert!(test.is_none(), "default case has no test");
    assert_eq!(body.len(), 1);
}

#[test]
fn try_catch_finally() {
    let program = parse_ok("try { f(); } catch (err) { g(err); } finally { h(); }");
    let NodeKind::TryStatement { block, handler, finalizer } = &single_stmt(&program).kind else {
        panic!("expected TryStatement");
    };
    assert!(matches!(block.kind, NodeKind::BlockStatement { .. }));
    let NodeKind::CatchClause { param, body } = &handler.as_ref().unwrap().kind else {
        panic!("expected CatchClause");
    };
    assert_eq!(identifier_name(param.as_ref().unwrap()), "err");
    assert!(matches!(body.kind, NodeKind::BlockStatement { .. }));
    let NodeKind::Finalizer { body } = &finalizer.as_ref().unwrap().kind else {
        panic!("expected Finalizer");
    };
    assert!(matches!(body.kind, NodeKind::BlockStatement { .. }));
}

#[test]
fn throw_and_delete() {
    let program = parse_ok("throw err; delete inst;");
    let stmts = body(&program);
    assert!(matches!(stmts[0].kind, NodeKind::ThrowStatement { .. }));
    assert!(matches!(stmts[1].kind, NodeKind::DeleteStatement { .. }));
}

#[test]
fn enum_with_trailing_comma() {
    let program = parse_ok("enum Color { Red = 1, Green, Blue, }");
    let NodeKind::EnumDeclaration { name, members, has_trailing_comma } =
        &single_stmt(&program).kind
    else {
        panic!("expected EnumDeclaration");
    };
    assert_eq!(identifier_name(name), "Color");
    assert_eq!(members.len(), 3);
    assert!(has_trailing_comma);
    let NodeKind::EnumMember { initializer, .. } = &members[0].kind else { panic!() };
    assert!(initializer.is_some());
    let NodeKind::EnumMember { initializer, .. } = &members[1].kind else { panic!() };
    assert!(initializer.is_none());
}

#[test]
fn constructor_with_parent_clause() {
    let program = parse_ok("function Child(a) : Parent(a) constructor { hp = a; }");
    let NodeKind::ConstructorDeclaration { id, parent, params, .. } =
        &single_stmt(&program).kind
    else {
        panic!("expected ConstructorDeclaration, got {}", single_stmt(&program).type_name());
    };
    assert_eq!(identifier_name(id.as_ref().unwrap()), "Child");
    assert_eq!(params.len(), 1);
    let NodeKind::ConstructorParentClause { id: parent_id, params: parent_args, .. } =
        &parent.as_ref().unwrap().kind
    else {
        panic!("expected ConstructorParentClause");
    };
    assert_eq!(identifier_name(parent_id), "Parent");
    assert_eq!(parent_args.len(), 1);
}

#[test]
fn parentless_constructor() {
    let program = parse_ok("function Thing() constructor {}");
    let NodeKind::ConstructorDeclaration { parent, .. } = &single_stmt(&program).kind else {
        panic!("expected ConstructorDeclaration");
    };
    assert!(parent.is_none());
}

#[test]
fn function_records_its_name_location() {
    let source = "function frobnicate() {}";
    let program = parse_ok(source);
    let NodeKind::FunctionDeclaration { id_location, .. } = &single_stmt(&program).kind else {
        panic!("expected FunctionDeclaration");
    };
    let range = id_location.unwrap();
    assert_eq!(range.start.unwrap().index(), source.find("frobnicate").unwrap());
}

#[test]
fn new_expression_keeps_arguments() {
    let program = parse_ok("inst = new Enemy(x, y);");
    let NodeKind::AssignmentExpression { right, .. } = &expr_of(single_stmt(&program)).kind
    else {
        panic!("expected AssignmentExpression");
    };
    let NodeKind::NewExpression { expression, arguments } = &right.kind else {
        panic!("expected NewExpression");
    };
    assert_eq!(identifier_name(expression), "Enemy");
    assert_eq!(arguments.len(), 2);
}

#[test]
fn ternary_expression() {
    let program = parse_ok("x = a > 0 ? a : -a;");
    let NodeKind::AssignmentExpression { right, .. } = &expr_of(single_stmt(&program)).kind
    else {
        panic!("expected AssignmentExpression");
    };
    assert!(matches!(right.kind, NodeKind::TernaryExpression { .. }));
}

#[test]
fn array_and_struct_literals() {
    let program = parse_ok("x = [1, 2, 3,]; y = { a: 1, \"b\": 2 };");
    let stmts = body(&program);
    let NodeKind::AssignmentExpression { right, .. } = &expr_of(&stmts[0]).kind else { panic!() };
    let NodeKind::ArrayExpression { elements, has_trailing_comma } = &right.kind else {
        panic!("expected ArrayExpression");
    };
    assert_eq!(elements.len(), 3);
    assert!(has_trailing_comma);

    let NodeKind::AssignmentExpression { right, .. } = &expr_of(&stmts[1]).kind else { panic!() };
    let NodeKind::StructExpression { properties, has_trailing_comma } = &right.kind else {
        panic!("expected StructExpression");
    };
    assert_eq!(properties.len(), 2);
    assert!(!has_trailing_comma);
    let NodeKind::Property { name, .. } = &properties[1].kind else { panic!() };
    assert!(matches!(&name.kind, NodeKind::Literal { value } if value == "\"b\""));
}

#[test]
fn template_string_atoms_interleave() {
    let program = parse_ok("s = $\"hp {hp} of {max_hp}\";");
    let NodeKind::AssignmentExpression { right, .. } = &expr_of(single_stmt(&program)).kind
    else {
        panic!("expected AssignmentExpression");
    };
    let NodeKind::TemplateStringExpression { atoms } = &right.kind else {
        panic!("expected TemplateStringExpression");
    };
    assert_eq!(atoms.len(), 4);
    assert!(matches!(&atoms[0].kind, NodeKind::TemplateStringText { value } if value == "hp "));
    assert!(matches!(&atoms[1].kind, NodeKind::Identifier { .. }));
    assert!(matches!(&atoms[2].kind, NodeKind::TemplateStringText { value } if value == " of "));
    assert!(matches!(&atoms[3].kind, NodeKind::Identifier { .. }));
}

#[test]
fn string_literal_keeps_original_escape_casing() {
    let source = r#"s = "line\None";"#;
    let program = parse_ok(source);
    let NodeKind::AssignmentExpression { right, .. } = &expr_of(single_stmt(&program)).kind
    else {
        panic!("expected AssignmentExpression");
    };
    let NodeKind::Literal { value } = &right.kind else { panic!("expected Literal") };
    assert_eq!(value, r#""line\None""#);
}

#[test]
fn region_statements() {
    let program = parse_ok("#region Movement\nx = 1;\n#endregion");
    let stmts = body(&program);
    assert_eq!(stmts.len(), 3);
    let NodeKind::RegionStatement { name } = &stmts[0].kind else {
        panic!("expected RegionStatement");
    };
    assert_eq!(name.as_deref(), Some("Movement"));
    assert!(matches!(&stmts[2].kind, NodeKind::EndRegionStatement { name: None }));
}

#[test]
fn define_payload_classification() {
    let program = parse_ok("#define region Player\n#define scr_attack\n#define ???\nx = 1;");
    let stmts = body(&program);
    // The unparsable payload is elided: two defines plus the assignment.
    assert_eq!(stmts.len(), 3);
    let NodeKind::DefineStatement { replacement_directive, name } = &stmts[0].kind else {
        panic!("expected DefineStatement");
    };
    assert_eq!(replacement_directive, "#region");
    assert_eq!(name, "Player");
    let NodeKind::DefineStatement { replacement_directive, name } = &stmts[1].kind else {
        panic!("expected DefineStatement");
    };
    assert_eq!(replacement_directive, "#macro");
    assert_eq!(name, "scr_attack");
}

#[test]
fn define_end_region_forms() {
    let program = parse_ok("#define endregion\n#define end region\nx = 1;");
    let stmts = body(&program);
    for stmt in &stmts[..2] {
        let NodeKind::DefineStatement { replacement_directive, .. } = &stmt.kind else {
            panic!("expected DefineStatement");
        };
        assert_eq!(replacement_directive, "#endregion");
    }
}

#[test]
fn raw_directives_are_elided() {
    let program = parse_ok("#event create\nx = 1;");
    assert_eq!(body(&program).len(), 1);
}

#[test]
fn comments_attach_to_the_program_in_order() {
    let source = "// top\nvar x; // after\n/* tail */";
    let program = parse_ok(source);
    let NodeKind::Program { comments, .. } = &program.kind else { unreachable!() };
    let comments = comments.as_ref().unwrap();
    assert_eq!(comments.len(), 3);
    assert!(comments[0].is_top_comment);
    assert!(comments[2].is_bottom_comment);
    let starts: Vec<_> = comments.iter().map(|c| c.start.unwrap().index()).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
}

#[test]
fn comment_option_off_leaves_no_list() {
    let options = ParseOptions::default().without_comments();
    let program = parse("// hi\nvar x;", &options).unwrap();
    let NodeKind::Program { comments, .. } = &program.kind else { unreachable!() };
    assert!(comments.is_none());
}

#[test]
fn locations_off_strips_everything() {
    let options = ParseOptions::default().without_locations();
    let program = parse("var x = f(1);", &options).unwrap();
    gml_ast::visit::walk(&program, &mut |node| {
        assert!(node.start.is_none());
        assert!(node.end.is_none());
    });
}

#[test]
fn full_locations_keep_line_and_index() {
    let options = ParseOptions::default().with_full_locations();
    let program = parse("var x;\nvar y;", &options).unwrap();
    let second = &body(&program)[1];
    let start = second.start.unwrap();
    assert_eq!(start.line(), Some(2));
    assert_eq!(start.index(), 7);
}

#[test]
fn simplified_locations_are_bare_indices() {
    let program = parse_ok("var x;");
    let stmt = single_stmt(&program);
    assert_eq!(stmt.start, Some(Location::Index(0)));
    assert_eq!(stmt.end, Some(Location::Index(5)));
}

#[test]
fn location_ranges_are_ordered() {
    let source = "function f(a, b) { return a + b * 2; }";
    let program = parse_ok(source);
    gml_ast::visit::walk(&program, &mut |node| {
        let (Some(start), Some(end)) = (node.start, node.end) else { return };
        assert!(start.index() <= end.index(), "{} range inverted", node.type_name());
        assert!(end.index() < source.len());
    });
}

#[test]
fn node_text_covers_the_concrete_syntax() {
    let source = "x = a + b;";
    let program = parse_ok(source);
    let NodeKind::AssignmentExpression { right, .. } = &expr_of(single_stmt(&program)).kind
    else {
        panic!("expected AssignmentExpression");
    };
    let from = right.start.unwrap().index();
    let to = right.end.unwrap().index();
    assert_eq!(&source[from..=to], "a + b");
}

#[test]
fn scope_tracker_without_metadata_is_rejected() {
    struct Noop;
    impl crate::ScopeTracker for Noop {
        fn is_enabled(&self) -> bool {
            true
        }
        fn enter_scope(&mut self, _: &str) {}
        fn exit_scope(&mut self, _: &str) {}
        fn declare(&mut self, _: &str, _: &str) {}
        fn reference(&mut self, _: &str, _: &str) {}
    }
    let options = ParseOptions {
        create_scope_tracker: Some(Box::new(|| Box::new(Noop))),
        ..ParseOptions::default()
    };
    let err = parse("var x;", &options).unwrap_err();
    assert!(matches!(err, ParseFailure::InvalidArgument(_)));
}

#[test]
fn identifier_metadata_stamps_declarations_and_references() {
    let options = ParseOptions::default().with_identifier_metadata();
    let program = parse("var hp = 1; dmg = hp;", &options).unwrap();
    let stmts = body(&program);

    let NodeKind::VariableDeclaration { declarations, .. } = &stmts[0].kind else { panic!() };
    let NodeKind::VariableDeclarator { id, .. } = &declarations[0].kind else { panic!() };
    let NodeKind::Identifier { scope_id, classifications, declaration, .. } = &id.kind else {
        panic!()
    };
    assert_eq!(*scope_id, Some(0));
    assert!(declaration.is_none());
    let tags = classifications.as_ref().unwrap();
    assert!(tags.iter().any(|t| t == "declaration"));
    assert!(tags.iter().any(|t| t == "variable"));

    let NodeKind::AssignmentExpression { right, .. } = &expr_of(&stmts[1]).kind else { panic!() };
    let NodeKind::Identifier { declaration, classifications, .. } = &right.kind else { panic!() };
    let link = declaration.as_ref().expect("reference links to its declaration");
    assert_eq!(link.scope_id, 0);
    assert!(classifications.as_ref().unwrap().iter().any(|t| t == "reference"));
}

#[test]
fn function_parameters_live_in_the_function_scope() {
    let options = ParseOptions::default().with_identifier_metadata();
    let program = parse("function f(a) { return a; }", &options).unwrap();
    let NodeKind::FunctionDeclaration { params, body: fn_body, .. } =
        &single_stmt(&program).kind
    else {
        panic!("expected FunctionDeclaration");
    };
    let NodeKind::Identifier { scope_id: param_scope, .. } = &params[0].kind else { panic!() };
    let NodeKind::BlockStatement { body: block } = &fn_body.kind else { panic!() };
    let NodeKind::ReturnStatement { argument } = &block[0].kind else { panic!() };
    let NodeKind::Identifier { declaration, .. } = &argument.as_ref().unwrap().kind else {
        panic!()
    };
    assert_eq!(declaration.as_ref().unwrap().scope_id, param_scope.unwrap());
    assert_ne!(param_scope.unwrap(), 0);
}

#[test]
fn metadata_off_leaves_identifiers_bare() {
    let program = parse_ok("var x = 1;");
    gml_ast::visit::walk(&program, &mut |node| {
        if let NodeKind::Identifier { scope_id, classifications, declaration, .. } = &node.kind {
            assert!(scope_id.is_none());
            assert!(classifications.is_none());
            assert!(declaration.is_none());
        }
    });
}

#[test]
fn serialized_tree_uses_stable_type_tags() {
    let program = parse_ok("var x = 1;");
    let json = serde_json::to_value(&program).unwrap();
    assert_eq!(json["type"], "Program");
    assert_eq!(json["body"][0]["type"], "VariableDeclaration");
    assert_eq!(json["body"][0]["kind"], "var");
    assert_eq!(json["body"][0]["declarations"][0]["type"], "VariableDeclarator");
    assert_eq!(json["body"][0]["declarations"][0]["id"]["name"], "x");
    assert_eq!(json["body"][0]["declarations"][0]["init"]["value"], "1");
}

#[test]
fn parse_with_trivia_returns_the_whitespace_list() {
    let outcome = parse_with_trivia("x = 1;\ny = 2;", &ParseOptions::default()).unwrap();
    assert!(outcome.whitespaces.iter().any(|ws| ws.is_newline));
    assert!(outcome.comments.is_empty());
}

#[test]
fn empty_source_yields_an_empty_program() {
    let program = parse_ok("");
    assert!(body(&program).is_empty());
}

#[test]
fn only_trivia_yields_an_empty_program_with_comments() {
    let program = parse_ok("  // just a note\n");
    assert!(body(&program).is_empty());
    let NodeKind::Program { comments, .. } = &program.kind else { unreachable!() };
    let comments = comments.as_ref().unwrap();
    assert_eq!(comments.len(), 1);
    assert!(comments[0].is_top_comment);
    assert!(comments[0].is_bottom_comment);
}

#[test]
fn statements_without_semicolons() {
    let program = parse_ok("x = 1\ny = 2\nf(x)");
    assert_eq!(body(&program).len(), 3);
}

#[test]
fn with_statement_scopes_its_body() {
    let program = parse_ok("with (other) { hp -= 1; }");
    let NodeKind::WithStatement { object, .. } = &single_stmt(&program).kind else {
        panic!("expected WithStatement");
    };
    assert_eq!(identifier_name(object), "other");
}

#[test]
fn refactor_suggestions_flow_from_the_parsed_tree() {
    let program = parse_ok("#macro maxHp 10\nfunction DoThing() {}\nvar camelName = 1;");
    let suggestions = crate::refactor::naming_suggestions(&program);
    let by_original: Vec<_> =
        suggestions.iter().map(|s| (s.original.as_str(), s.suggestion.as_str())).collect();
    assert!(by_original.contains(&("maxHp", "MAX_HP")));
    assert!(by_original.contains(&("DoThing", "do_thing")));
    assert!(by_original.contains(&("camelName", "camel_name")));
}

#[test]
fn comment_surroundings_partition_the_source() {
    // Between two comments, `trailing_ws + code + leading_ws` is exactly the
    // source slice.
    let source = "x = 1; // one\ny = 2; /* two */";
    let outcome = parse_with_trivia(source, &ParseOptions::default()).unwrap();
    let [c1, c2] = &outcome.comments[..] else { panic!("expected two comments") };
    let between = &source[c1.end.unwrap().index() + 1..c2.start.unwrap().index()];
    let code = "y = 2;";
    assert_eq!(format!("{}{code}{}", c1.trailing_ws, c2.leading_ws), between);
}

#[test]
fn comments_keep_original_positions_after_sanitization() {
    // The insertion shifts everything after it by one; comment locations
    // must still point into the author's text.
    let source = "if (a = b) { exit; } // done";
    let program = parse_ok(source);
    let NodeKind::Program { comments, .. } = &program.kind else { unreachable!() };
    let comment = &comments.as_ref().unwrap()[0];
    assert_eq!(comment.start.unwrap().index(), source.find("//").unwrap());
}

#[test]
fn string_containing_equals_survives_sanitization() {
    let source = "if (s = \"a = b\") { exit; }";
    let program = parse_ok(source);
    let NodeKind::IfStatement { test, .. } = &single_stmt(&program).kind else { panic!() };
    let NodeKind::BinaryExpression { operator, right, .. } = &test.kind else { panic!() };
    assert_eq!(operator, "==");
    let NodeKind::Literal { value } = &right.kind else { panic!("expected string literal") };
    assert_eq!(value, "\"a = b\"");
}

#[test]
fn nested_function_scopes_resolve_to_the_nearest_declaration() {
    let options = ParseOptions::default().with_identifier_metadata();
    let source = "var v = 1; function outer() { var v = 2; function inner() { return v; } }";
    let program = parse(source, &options).unwrap();

    let NodeKind::FunctionDeclaration { body: outer_body, .. } = &body(&program)[1].kind else {
        panic!("expected outer FunctionDeclaration");
    };
    let NodeKind::BlockStatement { body: outer_stmts } = &outer_body.kind else { panic!() };
    let NodeKind::VariableDeclaration { declarations, .. } = &outer_stmts[0].kind else {
        panic!()
    };
    let NodeKind::VariableDeclarator { id, .. } = &declarations[0].kind else { panic!() };
    let NodeKind::Identifier { scope_id: outer_scope, .. } = &id.kind else { panic!() };

    let NodeKind::FunctionDeclaration { body: inner_body, .. } = &outer_stmts[1].kind else {
        panic!("expected inner FunctionDeclaration");
    };
    let NodeKind::BlockStatement { body: inner_stmts } = &inner_body.kind else { panic!() };
    let NodeKind::ReturnStatement { argument } = &inner_stmts[0].kind else { panic!() };
    let NodeKind::Identifier { declaration, .. } = &argument.as_ref().unwrap().kind else {
        panic!()
    };
    // The inner reference resolves to outer's local, not the program-level one.
    assert_eq!(declaration.as_ref().unwrap().scope_id, outer_scope.unwrap());
    assert_ne!(outer_scope.unwrap(), 0);
}

#[test]
fn custom_scope_tracker_sees_the_walk() {
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log(Rc<RefCell<Vec<String>>>);
    impl crate::ScopeTracker for Log {
        fn is_enabled(&self) -> bool {
            true
        }
        fn enter_scope(&mut self, kind: &str) {
            self.0.borrow_mut().push(format!("enter:{kind}"));
        }
        fn exit_scope(&mut self, kind: &str) {
            self.0.borrow_mut().push(format!("exit:{kind}"));
        }
        fn declare(&mut self, name: &str, kind: &str) {
            self.0.borrow_mut().push(format!("declare:{kind}:{name}"));
        }
        fn reference(&mut self, name: &str, _kind: &str) {
            self.0.borrow_mut().push(format!("reference:{name}"));
        }
    }

    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let options = ParseOptions {
        get_identifier_metadata: true,
        create_scope_tracker: Some(Box::new(move || Box::new(Log(Rc::clone(&sink))))),
        ..ParseOptions::default()
    };

    parse("function f(a) { return a; }", &options).unwrap();

    let events = log.borrow();
    assert!(events.contains(&"enter:function".to_string()));
    assert!(events.contains(&"exit:function".to_string()));
    assert!(events.contains(&"declare:parameter:a".to_string()));
    assert!(events.contains(&"reference:a".to_string()));
}

#[test]
fn whitespace_list_reflects_the_hidden_channel() {
    let outcome = parse_with_trivia("x;  \ny;", &ParseOptions::default()).unwrap();
    let values: Vec<_> = outcome.whitespaces.iter().map(|w| w.value.as_str()).collect();
    assert_eq!(values, ["  ", "\n"]);
    assert!(!outcome.whitespaces[0].is_newline);
    assert!(outcome.whitespaces[1].is_newline);
}

#[test]
fn equal_precedence_chains_carry_no_synthetic_parens() {
    // `+` and `-` share a row; `<<` sits on it too. Left associativity all
    // around, so nothing needs wrapping.
    let program = parse_ok("x = a + b - c << d;");
    gml_ast::visit::walk(&program, &mut |node| {
        if let NodeKind::ParenthesizedExpression { synthetic, .. } = &node.kind {
            assert_eq!(*synthetic, None);
        }
    });
}

#[test]
fn hex_and_binary_literals_keep_their_spelling() {
    let program = parse_ok("mask = 0xFF & 0b1010;");
    let NodeKind::AssignmentExpression { right, .. } = &expr_of(single_stmt(&program)).kind
    else {
        panic!()
    };
    let NodeKind::BinaryExpression { left, right, .. } = &right.kind else { panic!() };
    assert!(matches!(&left.kind, NodeKind::Literal { value } if value == "0xFF"));
    assert!(matches!(&right.kind, NodeKind::Literal { value } if value == "0b1010"));
}

#[test]
fn chained_calls_and_members_nest_leftward() {
    let program = parse_ok("a.b(1).c[2]");
    let expr = expr_of(single_stmt(&program));
    // Outermost is the index access, then the dot, then the call.
    let NodeKind::MemberIndexExpression { object, .. } = &expr.kind else {
        panic!("expected MemberIndexExpression, got {}", expr.type_name());
    };
    let NodeKind::MemberDotExpression { object, .. } = &object.kind else {
        panic!("expected MemberDotExpression");
    };
    let NodeKind::CallExpression { object, .. } = &object.kind else {
        panic!("expected CallExpression");
    };
    assert!(matches!(object.kind, NodeKind::MemberDotExpression { .. }));
}

#[test]
fn else_if_chains_nest_in_the_alternate_slot() {
    let program = parse_ok("if (a) x = 1; else if (b) x = 2; else x = 3;");
    let NodeKind::IfStatement { alternate, .. } = &single_stmt(&program).kind else { panic!() };
    let NodeKind::IfStatement { alternate: inner, .. } = &alternate.as_ref().unwrap().kind
    else {
        panic!("expected nested IfStatement");
    };
    assert!(inner.is_some());
}

#[test]
fn function_expression_as_argument() {
    let program = parse_ok("call_later(1, function() { exit; });");
    let NodeKind::CallExpression { arguments, .. } = &expr_of(single_stmt(&program)).kind else {
        panic!()
    };
    assert_eq!(arguments.len(), 2);
    assert!(matches!(arguments[1].kind, NodeKind::FunctionDeclaration { .. }));
}

#[test]
fn realistic_script_parses_end_to_end() {
    let source = r#"// Player state handling.
#macro MAX_HP 100
#region State

globalvar game_paused;

enum PlayerState {
    Idle,
    Running = 2,
    Dead,
}

function Player(start_x, start_y) : Actor(start_x, start_y) constructor {
    hp = MAX_HP;
    state = PlayerState.Idle;

    static heal = function(amount) {
        hp = min(hp + amount, MAX_HP);
        return hp;
    };
}

function step_player(p, dt = 1) {
    if (game_paused) exit;

    with (p) {
        switch (state) {
            case PlayerState.Idle:
                if (abs(input_x()) > 0.1) state = PlayerState.Running;
                break;
            case PlayerState.Running: {
                x += input_x() * spd * dt;
                if (hp <= 0) state = PlayerState.Dead;
                break;
            }
            default:
                exit;
        }
    }

    for (var i = 0; i < array_length(p.effects); i += 1) {
        var fx = p.effects[i];
        fx.ttl -= dt;
        if (fx.ttl <= 0) {
            array_delete(p.effects, i, 1);
            i -= 1;
        }
    }

    /* Debug overlay. */
    show_debug_message($"hp {p.hp} state {p.state}");
}

#endregion
"#;

    let outcome = parse_with_trivia(source, &ParseOptions::default()).unwrap();
    let stmts = body(&outcome.program);
    // macro, region, globalvar, enum, two functions, endregion
    assert_eq!(stmts.len(), 7);

    assert!(matches!(stmts[0].kind, NodeKind::MacroDeclaration { .. }));
    assert!(matches!(stmts[1].kind, NodeKind::RegionStatement { .. }));
    assert!(matches!(stmts[2].kind, NodeKind::GlobalVarStatement { .. }));
    assert!(matches!(stmts[3].kind, NodeKind::EnumDeclaration { .. }));
    assert!(matches!(stmts[4].kind, NodeKind::ConstructorDeclaration { .. }));
    assert!(matches!(stmts[5].kind, NodeKind::FunctionDeclaration { .. }));
    assert!(matches!(stmts[6].kind, NodeKind::EndRegionStatement { .. }));

    // MAX_HP and game_paused became global; later references carry the flag.
    let mut flagged = Vec::new();
    gml_ast::visit::walk(&outcome.program, &mut |node| {
        if let NodeKind::Identifier { name, is_global_identifier: Some(true), .. } = &node.kind {
            flagged.push(name.clone());
        }
    });
    assert!(flagged.iter().filter(|n| n.as_str() == "MAX_HP").count() >= 3);
    assert!(flagged.iter().filter(|n| n.as_str() == "game_paused").count() >= 2);

    // Every node's slice stays inside the file and the ends stay ordered.
    gml_ast::visit::walk(&outcome.program, &mut |node| {
        if let (Some(start), Some(end)) = (node.start, node.end) {
            assert!(start.index() <= end.index());
            assert!(end.index() < source.len());
        }
    });

    // The file-leading comment and the block comment both survived.
    assert_eq!(outcome.comments.len(), 2);
    assert!(outcome.comments[0].is_top_comment);
    assert_eq!(outcome.comments[1].value, " Debug overlay. ");
}

#[test]
fn default_parameters_lower_as_pairs() {
    let program = parse_ok("function f(a, b = 2) {}");
    let NodeKind::FunctionDeclaration { params, .. } = &single_stmt(&program).kind else {
        panic!()
    };
    assert_eq!(params.len(), 2);
    let NodeKind::DefaultParameter { left, right } = &params[1].kind else {
        panic!("expected DefaultParameter");
    };
    assert_eq!(identifier_name(left), "b");
    assert!(matches!(&right.kind, NodeKind::Literal { value } if value == "2"));
}
