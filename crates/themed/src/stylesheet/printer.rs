use std::fmt::{self, Write};

use super::{AtRule, AtRuleBody, Declaration, Node, Rule, Stylesheet};

const INDENT: &str = "  ";

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_nodes(f, &self.nodes, 0)
    }
}

fn write_nodes(f: &mut impl Write, nodes: &[Node], depth: usize) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_char('\n')?;
        }
        match node {
            Node::Rule(rule) => write_rule(f, rule, depth)?,
            Node::AtRule(at_rule) => write_at_rule(f, at_rule, depth)?,
        }
    }
    Ok(())
}

fn write_rule(f: &mut impl Write, rule: &Rule, depth: usize) -> fmt::Result {
    let pad = INDENT.repeat(depth);
    writeln!(f, "{}{} {{", pad, rule.selector)?;
    write_declarations(f, &rule.declarations, depth + 1)?;
    writeln!(f, "{}}}", pad)
}

fn write_at_rule(f: &mut impl Write, at_rule: &AtRule, depth: usize) -> fmt::Result {
    let pad = INDENT.repeat(depth);
    let head = if at_rule.prelude.is_empty() {
        format!("@{}", at_rule.name)
    } else {
        format!("@{} {}", at_rule.name, at_rule.prelude)
    };

    match &at_rule.body {
        AtRuleBody::None => writeln!(f, "{}{};", pad, head),
        AtRuleBody::Declarations(declarations) => {
            writeln!(f, "{}{} {{", pad, head)?;
            write_declarations(f, declarations, depth + 1)?;
            writeln!(f, "{}}}", pad)
        }
        AtRuleBody::Rules(children) => {
            writeln!(f, "{}{} {{", pad, head)?;
            write_nodes(f, children, depth + 1)?;
            writeln!(f, "{}}}", pad)
        }
    }
}

fn write_declarations(f: &mut impl Write, declarations: &[Declaration], depth: usize) -> fmt::Result {
    let pad = INDENT.repeat(depth);
    for declaration in declarations {
        writeln!(f, "{}{}: {};", pad, declaration.property, declaration.value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::stylesheet::Stylesheet;

    #[test]
    fn test_print_rules() {
        let sheet = Stylesheet::parse(".a{color:red;width:1px}.b{}").unwrap();
        assert_eq!(
            sheet.to_string(),
            ".a {\n  color: red;\n  width: 1px;\n}\n\n.b {\n}\n"
        );
    }

    #[test]
    fn test_print_nested_at_rule() {
        let sheet =
            Stylesheet::parse("@media (min-width: 1px) { .a { color: red; } }").unwrap();
        assert_eq!(
            sheet.to_string(),
            "@media (min-width: 1px) {\n  .a {\n    color: red;\n  }\n}\n"
        );
    }

    #[test]
    fn test_print_statement_at_rule() {
        let sheet = Stylesheet::parse("@import \"x.css\";").unwrap();
        assert_eq!(sheet.to_string(), "@import \"x.css\";\n");
    }
}
