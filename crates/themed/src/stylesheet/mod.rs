//! A small stylesheet tree.
//!
//! The tree keeps only what theming needs: rules with a raw selector and
//! declarations, and at-rules that either wrap more rules (`@media`,
//! `@supports`) or hold declarations directly (`@font-face`, `@page`).
//! Selectors and values are kept as written; nothing is validated,
//! normalized or flattened.
//!
//! ```rust
//! use themed::stylesheet::Stylesheet;
//!
//! let sheet = Stylesheet::parse(".title { color: @theme color; }").unwrap();
//! assert_eq!(sheet.rules()[0].selector, ".title");
//! assert_eq!(sheet.declarations()[0].value, "@theme color");
//! ```

mod parser;
mod printer;

use crate::error::{Location, Result};

/// At-rules whose block holds declarations rather than rules.
const DECLARATION_AT_RULES: &[&str] = &[
    "font-face",
    "page",
    "property",
    "counter-style",
    "font-palette-values",
    "viewport",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Rule(Rule),
    AtRule(AtRule),
}

/// A qualified rule: `selector { declarations }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
    pub location: Location,
}

impl Rule {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            declarations: Vec::new(),
            location: Location::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub location: Location,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            location: Location::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    pub name: String,
    pub prelude: String,
    pub body: AtRuleBody,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtRuleBody {
    /// `@import "x.css";`
    None,
    Rules(Vec<Node>),
    Declarations(Vec<Declaration>),
}

pub(crate) fn holds_declarations(at_rule_name: &str) -> bool {
    DECLARATION_AT_RULES
        .iter()
        .any(|name| name.eq_ignore_ascii_case(at_rule_name))
}

impl Stylesheet {
    /// Parses stylesheet text into a tree.
    ///
    /// # Errors
    ///
    /// [`ThemeError::Parse`](crate::ThemeError::Parse) when the text cannot be
    /// split into rules and declarations.
    pub fn parse(css: &str) -> Result<Self> {
        parser::parse(css)
    }

    pub fn push_rule(&mut self, rule: Rule) {
        self.nodes.push(Node::Rule(rule));
    }

    /// All rules, including those nested in at-rules, in source order.
    pub fn rules(&self) -> Vec<&Rule> {
        fn collect<'a>(nodes: &'a [Node], out: &mut Vec<&'a Rule>) {
            for node in nodes {
                match node {
                    Node::Rule(rule) => out.push(rule),
                    Node::AtRule(at_rule) => {
                        if let AtRuleBody::Rules(children) = &at_rule.body {
                            collect(children, out);
                        }
                    }
                }
            }
        }

        let mut out = Vec::new();
        collect(&self.nodes, &mut out);
        out
    }

    pub fn rules_mut(&mut self) -> Vec<&mut Rule> {
        fn collect<'a>(nodes: &'a mut [Node], out: &mut Vec<&'a mut Rule>) {
            for node in nodes {
                match node {
                    Node::Rule(rule) => out.push(rule),
                    Node::AtRule(at_rule) => {
                        if let AtRuleBody::Rules(children) = &mut at_rule.body {
                            collect(children, out);
                        }
                    }
                }
            }
        }

        let mut out = Vec::new();
        collect(&mut self.nodes, &mut out);
        out
    }

    /// Every declaration in the sheet, including those held directly by
    /// at-rules such as `@font-face`.
    pub fn declarations(&self) -> Vec<&Declaration> {
        fn collect<'a>(nodes: &'a [Node], out: &mut Vec<&'a Declaration>) {
            for node in nodes {
                match node {
                    Node::Rule(rule) => out.extend(rule.declarations.iter()),
                    Node::AtRule(at_rule) => match &at_rule.body {
                        AtRuleBody::Rules(children) => collect(children, out),
                        AtRuleBody::Declarations(declarations) => {
                            out.extend(declarations.iter())
                        }
                        AtRuleBody::None => {}
                    },
                }
            }
        }

        let mut out = Vec::new();
        collect(&self.nodes, &mut out);
        out
    }

    /// Mutable access to every declaration list in the sheet.
    pub fn declaration_lists_mut(&mut self) -> Vec<&mut Vec<Declaration>> {
        fn collect<'a>(nodes: &'a mut [Node], out: &mut Vec<&'a mut Vec<Declaration>>) {
            for node in nodes {
                match node {
                    Node::Rule(rule) => out.push(&mut rule.declarations),
                    Node::AtRule(at_rule) => match &mut at_rule.body {
                        AtRuleBody::Rules(children) => collect(children, out),
                        AtRuleBody::Declarations(declarations) => out.push(declarations),
                        AtRuleBody::None => {}
                    },
                }
            }
        }

        let mut out = Vec::new();
        collect(&mut self.nodes, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = r#"
        .a { color: red; }
        @media (min-width: 10px) {
            .b { color: blue; }
        }
        @font-face { font-family: x; }
    "#;

    #[test]
    fn test_rules_include_nested() {
        let sheet = Stylesheet::parse(SHEET).unwrap();
        let selectors: Vec<&str> = sheet.rules().iter().map(|r| r.selector.as_str()).collect();
        assert_eq!(selectors, vec![".a", ".b"]);
    }

    #[test]
    fn test_declarations_include_at_rule_bodies() {
        let sheet = Stylesheet::parse(SHEET).unwrap();
        let properties: Vec<&str> = sheet
            .declarations()
            .iter()
            .map(|d| d.property.as_str())
            .collect();
        assert_eq!(properties, vec!["color", "color", "font-family"]);
    }

    #[test]
    fn test_declaration_lists_mut() {
        let mut sheet = Stylesheet::parse(SHEET).unwrap();
        for list in sheet.declaration_lists_mut() {
            list.clear();
        }
        assert!(sheet.declarations().is_empty());
    }

    #[test]
    fn test_holds_declarations() {
        assert!(holds_declarations("font-face"));
        assert!(holds_declarations("Font-Face"));
        assert!(!holds_declarations("media"));
    }
}
