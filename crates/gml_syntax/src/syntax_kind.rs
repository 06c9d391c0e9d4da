use cstree::Syntax;
#[cfg(feature = "serde")]
use serde_derive::Serialize;

pub type Gml = SyntaxKind;
pub type SyntaxNode = cstree::syntax::SyntaxNode<Gml>;
pub type SyntaxToken = cstree::syntax::SyntaxToken<Gml>;
pub type SyntaxElement = cstree::syntax::SyntaxElement<Gml>;
pub type ResolvedNode = cstree::syntax::ResolvedNode<Gml>;
pub type ResolvedToken = cstree::syntax::ResolvedToken<Gml>;
pub type ResolvedElement = cstree::syntax::ResolvedElement<Gml>;

/// Node and token kinds for the GML concrete syntax tree.
///
/// Like the rest of the rowan/cstree family, node kinds and token kinds
/// share a single enum so the tree carries one uniform kind type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Syntax)]
#[repr(u32)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // Nodes
    ROOT,
    BLOCK,
    IF_STMT,
    WHILE_STMT,
    DO_UNTIL_STMT,
    FOR_STMT,
    REPEAT_STMT,
    WITH_STMT,
    SWITCH_STMT,
    SWITCH_CASE, // both `case expr:` and `default:` arms
    CONTINUE_STMT,
    BREAK_STMT,
    EXIT_STMT,
    RETURN_STMT,
    THROW_STMT,
    TRY_STMT,
    CATCH_CLAUSE,
    FINALIZER,
    DELETE_STMT,
    EXPR_STMT,
    MACRO_DECL,
    DEFINE_STMT,
    REGION_STMT,
    END_REGION_STMT,
    RAW_DIRECTIVE, // #event / #target / #include lines, elided from the AST
    GLOBAL_VAR_STMT,
    ENUM_DECL,
    ENUM_MEMBER,
    VAR_DECL,
    VAR_DECLARATOR,
    FUNCTION_DECL,
    CONSTRUCTOR_PARENT, // `: Parent(args)` clause before `constructor`
    PARAM_LIST,
    DEFAULT_PARAM,
    ARG_LIST,
    CALL_EXPR,
    NEW_EXPR,
    MEMBER_DOT_EXPR,
    MEMBER_INDEX_EXPR,
    PAREN_EXPR,
    UNARY_EXPR,
    INC_DEC_EXPR,
    BINARY_EXPR,
    TERNARY_EXPR,
    ASSIGNMENT_EXPR,
    ARRAY_EXPR,
    STRUCT_EXPR,
    PROPERTY,
    TEMPLATE_STRING,
    NAME_EXPR, // identifier (or instance keyword) in expression position
    LITERAL,

    // Error node used in parsing
    ERROR,

    // --- TOKEN KINDS ---
    // Hidden channel
    WHITESPACE,
    LINE_TERMINATOR,
    SINGLE_LINE_COMMENT,
    MULTI_LINE_COMMENT,

    // Literal tokens
    INTEGER,
    DECIMAL,
    HEX,
    BINARY_LIT,
    STRING,
    TEMPLATE_START, // `$"`
    TEMPLATE_TEXT,
    TEMPLATE_END, // closing `"` of a template string

    IDENTIFIER,

    // Keywords
    IF_KW,
    ELSE_KW,
    VAR_KW,
    GLOBALVAR_KW,
    WHILE_KW,
    DO_KW,
    UNTIL_KW,
    FOR_KW,
    REPEAT_KW,
    WITH_KW,
    SWITCH_KW,
    CASE_KW,
    DEFAULT_KW,
    BREAK_KW,
    CONTINUE_KW,
    EXIT_KW,
    RETURN_KW,
    THROW_KW,
    TRY_KW,
    CATCH_KW,
    FINALLY_KW,
    DELETE_KW,
    NEW_KW,
    FUNCTION_KW,
    CONSTRUCTOR_KW,
    ENUM_KW,
    AND_KW,
    OR_KW,
    NOT_KW,
    MOD_KW,
    DIV_KW,
    BEGIN_KW,
    END_KW,
    UNDEFINED_KW,
    TRUE_KW,
    FALSE_KW,
    NOONE_KW,
    GLOBAL_KW,
    SELF_KW,
    OTHER_KW,
    ALL_KW,
    STATIC_KW,

    // Operators
    PLUS,
    MINUS,
    STAR,
    SLASH,
    PERCENT,
    CARET,
    AMP,
    PIPE,
    TILDE,
    BANG,
    LT,
    LT_EQ,
    GT,
    GT_EQ,
    EQ2,     // ==
    BANG_EQ, // !=
    LT_GT,   // <>
    SHL,     // <<
    SHR,     // >>
    AMP2,    // &&
    PIPE2,   // ||
    QUESTION2,    // ??
    EQ,           // =
    COLON_EQ,     // :=
    PLUS_EQ,
    MINUS_EQ,
    STAR_EQ,
    SLASH_EQ,
    PERCENT_EQ,
    SHL_EQ,
    SHR_EQ,
    AMP_EQ,
    CARET_EQ,
    PIPE_EQ,
    QUESTION2_EQ, // ??=
    PLUS2,        // ++
    MINUS2,       // --

    // Punctuation
    LPAREN,
    RPAREN,
    LBRACE,
    RBRACE,
    RBRACKET,
    COMMA,
    SEMICOLON,
    COLON,
    DOT,
    QUESTION,
    AT,
    BACKSLASH, // macro line continuation

    // Accessor-opening brackets
    LBRACKET,
    LBRACKET_AT,       // [@
    LBRACKET_HASH,     // [#
    LBRACKET_PIPE,     // [|
    LBRACKET_QUESTION, // [?
    LBRACKET_DOLLAR,   // [$

    // Directives
    MACRO_DIRECTIVE,      // #macro
    REGION_DIRECTIVE,     // #region
    END_REGION_DIRECTIVE, // #endregion
    DEFINE_DIRECTIVE,     // #define
    EVENT_DIRECTIVE,      // #event
    TARGET_DIRECTIVE,     // #target
    INCLUDE_DIRECTIVE,    // #include
    DIRECTIVE_BODY,       // raw payload of a to-end-of-line directive

    ERROR_TOKEN,
    EOF,
}

impl SyntaxKind {
    /// Hidden-channel tokens: whitespace, line terminators and comments.
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::WHITESPACE
                | SyntaxKind::LINE_TERMINATOR
                | SyntaxKind::SINGLE_LINE_COMMENT
                | SyntaxKind::MULTI_LINE_COMMENT
        )
    }

    #[inline]
    pub fn is_comment(self) -> bool {
        matches!(self, SyntaxKind::SINGLE_LINE_COMMENT | SyntaxKind::MULTI_LINE_COMMENT)
    }

    /// Literal tokens that lower to a `Literal` AST node.
    #[inline]
    pub fn is_literal_token(self) -> bool {
        matches!(
            self,
            SyntaxKind::INTEGER
                | SyntaxKind::DECIMAL
                | SyntaxKind::HEX
                | SyntaxKind::BINARY_LIT
                | SyntaxKind::STRING
                | SyntaxKind::UNDEFINED_KW
                | SyntaxKind::TRUE_KW
                | SyntaxKind::FALSE_KW
                | SyntaxKind::NOONE_KW
        )
    }

    /// Instance keywords that lower to plain identifiers (`global.x`, `self.hp`).
    #[inline]
    pub fn is_instance_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::GLOBAL_KW | SyntaxKind::SELF_KW | SyntaxKind::OTHER_KW | SyntaxKind::ALL_KW
        )
    }

    /// Any token usable as an identifier in expression position.
    #[inline]
    pub fn is_any_identifier(self) -> bool {
        self == SyntaxKind::IDENTIFIER || self.is_instance_keyword()
    }

    /// Node kinds that occupy statement positions.
    #[inline]
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            SyntaxKind::BLOCK
                | SyntaxKind::IF_STMT
                | SyntaxKind::WHILE_STMT
                | SyntaxKind::DO_UNTIL_STMT
                | SyntaxKind::FOR_STMT
                | SyntaxKind::REPEAT_STMT
                | SyntaxKind::WITH_STMT
                | SyntaxKind::SWITCH_STMT
                | SyntaxKind::CONTINUE_STMT
                | SyntaxKind::BREAK_STMT
                | SyntaxKind::EXIT_STMT
                | SyntaxKind::RETURN_STMT
                | SyntaxKind::THROW_STMT
                | SyntaxKind::TRY_STMT
                | SyntaxKind::DELETE_STMT
                | SyntaxKind::EXPR_STMT
                | SyntaxKind::MACRO_DECL
                | SyntaxKind::DEFINE_STMT
                | SyntaxKind::REGION_STMT
                | SyntaxKind::END_REGION_STMT
                | SyntaxKind::RAW_DIRECTIVE
                | SyntaxKind::GLOBAL_VAR_STMT
                | SyntaxKind::ENUM_DECL
                | SyntaxKind::VAR_DECL
                | SyntaxKind::FUNCTION_DECL
        )
    }

    /// Node kinds that occupy expression positions.
    #[inline]
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            SyntaxKind::NAME_EXPR
                | SyntaxKind::LITERAL
                | SyntaxKind::PAREN_EXPR
                | SyntaxKind::UNARY_EXPR
                | SyntaxKind::INC_DEC_EXPR
                | SyntaxKind::BINARY_EXPR
                | SyntaxKind::TERNARY_EXPR
                | SyntaxKind::ASSIGNMENT_EXPR
                | SyntaxKind::CALL_EXPR
                | SyntaxKind::NEW_EXPR
                | SyntaxKind::MEMBER_DOT_EXPR
                | SyntaxKind::MEMBER_INDEX_EXPR
                | SyntaxKind::ARRAY_EXPR
                | SyntaxKind::STRUCT_EXPR
                | SyntaxKind::TEMPLATE_STRING
                | SyntaxKind::FUNCTION_DECL
        )
    }

    /// Opening brackets of index expressions, including typed accessors.
    #[inline]
    pub fn is_accessor_open(self) -> bool {
        matches!(
            self,
            SyntaxKind::LBRACKET
                | SyntaxKind::LBRACKET_AT
                | SyntaxKind::LBRACKET_HASH
                | SyntaxKind::LBRACKET_PIPE
                | SyntaxKind::LBRACKET_QUESTION
                | SyntaxKind::LBRACKET_DOLLAR
        )
    }

    /// Compound and simple assignment operator tokens.
    #[inline]
    pub fn is_assignment_op(self) -> bool {
        matches!(
            self,
            SyntaxKind::EQ
                | SyntaxKind::COLON_EQ
                | SyntaxKind::PLUS_EQ
                | SyntaxKind::MINUS_EQ
                | SyntaxKind::STAR_EQ
                | SyntaxKind::SLASH_EQ
                | SyntaxKind::PERCENT_EQ
                | SyntaxKind::SHL_EQ
                | SyntaxKind::SHR_EQ
                | SyntaxKind::AMP_EQ
                | SyntaxKind::CARET_EQ
                | SyntaxKind::PIPE_EQ
                | SyntaxKind::QUESTION2_EQ
        )
    }

    /// Keyword for the corresponding identifier text, if any.
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        let kind = match text {
            "if" => SyntaxKind::IF_KW,
            "else" => SyntaxKind::ELSE_KW,
            "var" => SyntaxKind::VAR_KW,
            "globalvar" => SyntaxKind::GLOBALVAR_KW,
            "while" => SyntaxKind::WHILE_KW,
            "do" => SyntaxKind::DO_KW,
            "until" => SyntaxKind::UNTIL_KW,
            "for" => SyntaxKind::FOR_KW,
            "repeat" => SyntaxKind::REPEAT_KW,
            "with" => SyntaxKind::WITH_KW,
            "switch" => SyntaxKind::SWITCH_KW,
            "case" => SyntaxKind::CASE_KW,
            "default" => SyntaxKind::DEFAULT_KW,
            "break" => SyntaxKind::BREAK_KW,
            "continue" => SyntaxKind::CONTINUE_KW,
            "exit" => SyntaxKind::EXIT_KW,
            "return" => SyntaxKind::RETURN_KW,
            "throw" => SyntaxKind::THROW_KW,
            "try" => SyntaxKind::TRY_KW,
            "catch" => SyntaxKind::CATCH_KW,
            "finally" => SyntaxKind::FINALLY_KW,
            "delete" => SyntaxKind::DELETE_KW,
            "new" => SyntaxKind::NEW_KW,
            "function" => SyntaxKind::FUNCTION_KW,
            "constructor" => SyntaxKind::CONSTRUCTOR_KW,
            "enum" => SyntaxKind::ENUM_KW,
            "and" => SyntaxKind::AND_KW,
            "or" => SyntaxKind::OR_KW,
            "not" => SyntaxKind::NOT_KW,
            "mod" => SyntaxKind::MOD_KW,
            "div" => SyntaxKind::DIV_KW,
            "begin" => SyntaxKind::BEGIN_KW,
            "end" => SyntaxKind::END_KW,
            "undefined" => SyntaxKind::UNDEFINED_KW,
            "true" => SyntaxKind::TRUE_KW,
            "false" => SyntaxKind::FALSE_KW,
            "noone" => SyntaxKind::NOONE_KW,
            "global" => SyntaxKind::GLOBAL_KW,
            "self" => SyntaxKind::SELF_KW,
            "other" => SyntaxKind::OTHER_KW,
            "all" => SyntaxKind::ALL_KW,
            "static" => SyntaxKind::STATIC_KW,
            _ => return None,
        };
        Some(kind)
    }
}
