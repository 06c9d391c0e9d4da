//! Advisory naming suggestions.
//!
//! A read-only walk over the finished AST that proposes conventional
//! casings: SCREAMING_SNAKE_CASE for macros, snake_case for functions and
//! variables, PascalCase for constructors. Suggestions reference source
//! offsets and never mutate the tree.

use gml_ast::{Node, NodeKind, visit};

/// One naming suggestion. `suggestion_type` is the `type` tag of the node
/// the name belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingSuggestion {
    pub suggestion_type: &'static str,
    pub original: String,
    pub suggestion: String,
    pub start: usize,
    pub stop: usize,
}

/// Collects naming suggestions for the whole tree.
pub fn naming_suggestions(program: &Node) -> Vec<NamingSuggestion> {
    let mut out = Vec::new();
    visit::walk(program, &mut |node| {
        let (target, convert): (&Node, fn(&str) -> String) = match &node.kind {
            NodeKind::MacroDeclaration { name, .. } => (name, to_screaming_snake_case),
            NodeKind::FunctionDeclaration { id: Some(id), .. } => (id, to_snake_case),
            NodeKind::VariableDeclarator { id, .. } => (id, to_snake_case),
            NodeKind::ConstructorDeclaration { id: Some(id), .. } => (id, to_pascal_case),
            _ => return,
        };
        let NodeKind::Identifier { name, .. } = &target.kind else { return };
        if name.is_empty() {
            return;
        }
        let suggestion = convert(name);
        if suggestion == *name {
            return;
        }
        out.push(NamingSuggestion {
            suggestion_type: node.type_name(),
            original: name.clone(),
            suggestion,
            start: target.start.map_or(0, |l| l.index()),
            stop: target.end.map_or(0, |l| l.index()),
        });
    });
    out
}

/// Splits on underscores and lower-to-upper camel boundaries.
fn words(name: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for c in name.chars() {
        if c == '_' {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_ascii_uppercase() && prev_lower && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn to_snake_case(name: &str) -> String {
    words(name).iter().map(|w| w.to_ascii_lowercase()).collect::<Vec<_>>().join("_")
}

fn to_screaming_snake_case(name: &str) -> String {
    words(name).iter().map(|w| w.to_ascii_uppercase()).collect::<Vec<_>>().join("_")
}

fn to_pascal_case(name: &str) -> String {
    words(name)
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_conversions() {
        assert_eq!(to_snake_case("myVarName"), "my_var_name");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
        assert_eq!(to_screaming_snake_case("maxHp"), "MAX_HP");
        assert_eq!(to_pascal_case("player_state"), "PlayerState");
        assert_eq!(to_pascal_case("PlayerState"), "PlayerState");
    }

    #[test]
    fn clean_names_produce_no_suggestions() {
        let id = Node::new(NodeKind::identifier("player_hp"));
        let decl = Node::new(NodeKind::VariableDeclarator { id: Box::new(id), init: None });
        let program = Node::new(NodeKind::Program { body: vec![decl], comments: None });
        assert!(naming_suggestions(&program).is_empty());
    }

    #[test]
    fn camel_case_variable_suggests_snake_case() {
        let id = Node::new(NodeKind::identifier("playerHp"));
        let decl = Node::new(NodeKind::VariableDeclarator { id: Box::new(id), init: None });
        let program = Node::new(NodeKind::Program { body: vec![decl], comments: None });
        let suggestions = naming_suggestions(&program);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].suggestion, "player_hp");
        assert_eq!(suggestions[0].suggestion_type, "VariableDeclarator");
    }
}
