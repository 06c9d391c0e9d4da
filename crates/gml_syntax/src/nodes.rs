//! Typed wrappers around [`ResolvedNode`].
//!
//! Each struct represents one node kind and exposes its children by role, so
//! consumers read `if_stmt.consequent()` instead of counting children. The
//! wrappers are views; building the owned AST from them is the lowering's
//! job.

use crate::SyntaxKind;
use crate::ast::{ast_node, child_node, child_token, has_child_token, nth_child_node};
use crate::{ResolvedNode, ResolvedToken};

ast_node!(
    /// Root node of a parsed source file.
    Program,
    ROOT
);

impl Program {
    /// Statement children in source order.
    pub fn statements(&self) -> impl Iterator<Item = &ResolvedNode> {
        self.0.children()
    }
}

ast_node!(
    /// `{ … }` or `begin … end`.
    Block,
    BLOCK
);

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = &ResolvedNode> {
        self.0.children()
    }
}

ast_node!(IfStmt, IF_STMT);

impl IfStmt {
    pub fn condition(&self) -> Option<&ResolvedNode> {
        child_node(&self.0, SyntaxKind::is_expression)
    }

    pub fn consequent(&self) -> Option<&ResolvedNode> {
        // The condition comes first; the consequent is the next node.
        nth_child_node(&self.0, |_| true, 1)
    }

    pub fn alternate(&self) -> Option<&ResolvedNode> {
        nth_child_node(&self.0, |_| true, 2)
    }
}

ast_node!(WhileStmt, WHILE_STMT);

impl WhileStmt {
    pub fn condition(&self) -> Option<&ResolvedNode> {
        self.0.children().next()
    }

    pub fn body(&self) -> Option<&ResolvedNode> {
        nth_child_node(&self.0, |_| true, 1)
    }
}

ast_node!(RepeatStmt, REPEAT_STMT);

impl RepeatStmt {
    pub fn count(&self) -> Option<&ResolvedNode> {
        self.0.children().next()
    }

    pub fn body(&self) -> Option<&ResolvedNode> {
        nth_child_node(&self.0, |_| true, 1)
    }
}

ast_node!(DoUntilStmt, DO_UNTIL_STMT);

impl DoUntilStmt {
    pub fn body(&self) -> Option<&ResolvedNode> {
        self.0.children().next()
    }

    pub fn condition(&self) -> Option<&ResolvedNode> {
        nth_child_node(&self.0, |_| true, 1)
    }
}

ast_node!(WithStmt, WITH_STMT);

impl WithStmt {
    pub fn object(&self) -> Option<&ResolvedNode> {
        self.0.children().next()
    }

    pub fn body(&self) -> Option<&ResolvedNode> {
        nth_child_node(&self.0, |_| true, 1)
    }
}

ast_node!(
    /// `for (init; condition; update) body`. The header slots are separated
    /// by semicolon tokens, so children are assigned by counting separators.
    ForStmt,
    FOR_STMT
);

impl ForStmt {
    fn header_slot(&self, want: usize) -> Option<&ResolvedNode> {
        let mut semicolons = 0usize;
        for element in self.0.children_with_tokens() {
            match element {
                cstree::util::NodeOrToken::Token(token) => match token.kind() {
                    SyntaxKind::SEMICOLON => semicolons += 1,
                    SyntaxKind::RPAREN => break,
                    _ => {}
                },
                cstree::util::NodeOrToken::Node(node) => {
                    if semicolons == want {
                        return Some(node);
                    }
                }
            }
        }
        None
    }

    pub fn init(&self) -> Option<&ResolvedNode> {
        self.header_slot(0)
    }

    pub fn condition(&self) -> Option<&ResolvedNode> {
        self.header_slot(1)
    }

    pub fn update(&self) -> Option<&ResolvedNode> {
        self.header_slot(2)
    }

    /// The loop body: the node after the closing parenthesis.
    pub fn body(&self) -> Option<&ResolvedNode> {
        let mut past_header = false;
        for element in self.0.children_with_tokens() {
            match element {
                cstree::util::NodeOrToken::Token(token) if token.kind() == SyntaxKind::RPAREN => {
                    past_header = true;
                }
                cstree::util::NodeOrToken::Node(node) if past_header => return Some(node),
                _ => {}
            }
        }
        None
    }
}

ast_node!(SwitchStmt, SWITCH_STMT);

impl SwitchStmt {
    pub fn discriminant(&self) -> Option<&ResolvedNode> {
        child_node(&self.0, |kind| kind != SyntaxKind::SWITCH_CASE)
    }

    pub fn cases(&self) -> impl Iterator<Item = SwitchCase> + '_ {
        self.0.children().filter_map(|node| {
            use crate::ast::AstNode;
            SwitchCase::cast(node.clone())
        })
    }
}

ast_node!(
    /// One `case expr:` or `default:` arm with its statements.
    SwitchCase,
    SWITCH_CASE
);

impl SwitchCase {
    pub fn is_default(&self) -> bool {
        has_child_token(&self.0, SyntaxKind::DEFAULT_KW)
    }

    pub fn test(&self) -> Option<&ResolvedNode> {
        if self.is_default() { None } else { self.0.children().next() }
    }

    pub fn body(&self) -> impl Iterator<Item = &ResolvedNode> {
        let skip = usize::from(self.test().is_some());
        self.0.children().skip(skip)
    }
}

ast_node!(TryStmt, TRY_STMT);

impl TryStmt {
    pub fn block(&self) -> Option<&ResolvedNode> {
        child_node(&self.0, |kind| {
            !matches!(kind, SyntaxKind::CATCH_CLAUSE | SyntaxKind::FINALIZER)
        })
    }

    pub fn handler(&self) -> Option<CatchClause> {
        use crate::ast::AstNode;
        self.0.children().find_map(|node| CatchClause::cast(node.clone()))
    }

    pub fn finalizer(&self) -> Option<Finalizer> {
        use crate::ast::AstNode;
        self.0.children().find_map(|node| Finalizer::cast(node.clone()))
    }
}

ast_node!(CatchClause, CATCH_CLAUSE);

impl CatchClause {
    /// The bound error variable, when the clause has one.
    pub fn param(&self) -> Option<&ResolvedNode> {
        child_node(&self.0, |kind| kind == SyntaxKind::NAME_EXPR)
    }

    pub fn body(&self) -> Option<&ResolvedNode> {
        child_node(&self.0, |kind| kind != SyntaxKind::NAME_EXPR)
    }
}

ast_node!(Finalizer, FINALIZER);

impl Finalizer {
    pub fn body(&self) -> Option<&ResolvedNode> {
        self.0.children().next()
    }
}

ast_node!(
    /// `var …` / `static …` declaration list.
    VarDecl,
    VAR_DECL
);

impl VarDecl {
    /// `"var"` or `"static"`.
    pub fn kind_text(&self) -> Option<&str> {
        child_token(&self.0, SyntaxKind::VAR_KW)
            .or_else(|| child_token(&self.0, SyntaxKind::STATIC_KW))
            .map(ResolvedToken::text)
    }

    pub fn declarators(&self) -> impl Iterator<Item = VarDeclarator> + '_ {
        self.0.children().filter_map(|node| {
            use crate::ast::AstNode;
            VarDeclarator::cast(node.clone())
        })
    }
}

ast_node!(VarDeclarator, VAR_DECLARATOR);

impl VarDeclarator {
    pub fn name_node(&self) -> Option<&ResolvedNode> {
        child_node(&self.0, |kind| kind == SyntaxKind::NAME_EXPR)
    }

    pub fn initializer(&self) -> Option<&ResolvedNode> {
        nth_child_node(&self.0, |_| true, 1)
    }
}

ast_node!(GlobalVarStmt, GLOBAL_VAR_STMT);

impl GlobalVarStmt {
    pub fn declarators(&self) -> impl Iterator<Item = VarDeclarator> + '_ {
        self.0.children().filter_map(|node| {
            use crate::ast::AstNode;
            VarDeclarator::cast(node.clone())
        })
    }
}

ast_node!(EnumDecl, ENUM_DECL);

impl EnumDecl {
    pub fn name_node(&self) -> Option<&ResolvedNode> {
        child_node(&self.0, |kind| kind == SyntaxKind::NAME_EXPR)
    }

    pub fn members(&self) -> impl Iterator<Item = EnumMember> + '_ {
        self.0.children().filter_map(|node| {
            use crate::ast::AstNode;
            EnumMember::cast(node.clone())
        })
    }
}

ast_node!(EnumMember, ENUM_MEMBER);

impl EnumMember {
    pub fn name_node(&self) -> Option<&ResolvedNode> {
        child_node(&self.0, |kind| kind == SyntaxKind::NAME_EXPR)
    }

    pub fn initializer(&self) -> Option<&ResolvedNode> {
        nth_child_node(&self.0, |_| true, 1)
    }
}

ast_node!(MacroDecl, MACRO_DECL);

impl MacroDecl {
    pub fn name_node(&self) -> Option<&ResolvedNode> {
        child_node(&self.0, |kind| kind == SyntaxKind::NAME_EXPR)
    }
}

ast_node!(
    /// Function or constructor declaration; the `constructor` keyword (or a
    /// parent clause) separates the two forms.
    FunctionDecl,
    FUNCTION_DECL
);

impl FunctionDecl {
    pub fn name_node(&self) -> Option<&ResolvedNode> {
        self.0
            .children()
            .take_while(|child| child.kind() != SyntaxKind::PARAM_LIST)
            .find(|child| child.kind() == SyntaxKind::NAME_EXPR)
    }

    pub fn param_list(&self) -> Option<&ResolvedNode> {
        child_node(&self.0, |kind| kind == SyntaxKind::PARAM_LIST)
    }

    pub fn parent_clause(&self) -> Option<ConstructorParent> {
        use crate::ast::AstNode;
        self.0.children().find_map(|node| ConstructorParent::cast(node.clone()))
    }

    pub fn is_constructor(&self) -> bool {
        has_child_token(&self.0, SyntaxKind::CONSTRUCTOR_KW) || self.parent_clause().is_some()
    }

    pub fn body(&self) -> Option<&ResolvedNode> {
        child_node(&self.0, |kind| kind == SyntaxKind::BLOCK)
    }
}

ast_node!(
    /// The `: Parent(args)` clause of a constructor.
    ConstructorParent,
    CONSTRUCTOR_PARENT
);

impl ConstructorParent {
    pub fn name_node(&self) -> Option<&ResolvedNode> {
        child_node(&self.0, |kind| kind == SyntaxKind::NAME_EXPR)
    }

    pub fn arg_list(&self) -> Option<&ResolvedNode> {
        child_node(&self.0, |kind| kind == SyntaxKind::ARG_LIST)
    }
}
