//! Stylesheet parsing on top of `cssparser`.
//!
//! The tokenizer handles comments, strings and nested blocks; this module only
//! records the raw text of selectors, at-rule preludes and declaration values
//! so the printed output stays close to the input.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, ParseErrorKind, Parser, ParserInput,
    ParserState, QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser,
};

use super::{holds_declarations, AtRule, AtRuleBody, Declaration, Node, Rule, Stylesheet};
use crate::error::{Location, Result, ThemeError};

pub(super) fn parse(css: &str) -> Result<Stylesheet> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut rule_parser = TopLevelParser;

    let mut nodes = Vec::new();
    for result in cssparser::StyleSheetParser::new(&mut parser, &mut rule_parser) {
        match result {
            Ok(node) => nodes.push(node),
            Err((error, _)) => return Err(convert_error(error)),
        }
    }

    Ok(Stylesheet { nodes })
}

fn convert_error(error: ParseError<'_, ThemeError>) -> ThemeError {
    let location = Location::from(error.location);
    match error.kind {
        ParseErrorKind::Custom(inner) => inner.at(location),
        ParseErrorKind::Basic(kind) => ThemeError::Parse {
            location: Some(location),
            message: format!("{:?}", kind),
        },
    }
}

/// Consumes the rest of `input` and returns its trimmed source text.
fn remaining_text<'i>(input: &mut Parser<'i, '_>) -> &'i str {
    let start = input.position();
    while input.next_including_whitespace_and_comments().is_ok() {}
    input.slice_from(start).trim()
}

/// Parses rules and at-rules, at the top level and inside `@media`-like
/// blocks.
struct TopLevelParser;

struct AtRulePrelude {
    name: String,
    prelude: String,
}

impl<'i> QualifiedRuleParser<'i> for TopLevelParser {
    type Prelude = String;
    type QualifiedRule = Node;
    type Error = ThemeError;

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Ok(remaining_text(input).to_string())
    }

    fn parse_block<'t>(
        &mut self,
        selector: Self::Prelude,
        start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        Ok(Node::Rule(Rule {
            selector,
            declarations: parse_declarations(input)?,
            location: start.source_location().into(),
        }))
    }
}

impl<'i> AtRuleParser<'i> for TopLevelParser {
    type Prelude = AtRulePrelude;
    type AtRule = Node;
    type Error = ThemeError;

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Ok(AtRulePrelude {
            name: name.as_ref().to_string(),
            prelude: remaining_text(input).to_string(),
        })
    }

    fn rule_without_block(
        &mut self,
        prelude: Self::Prelude,
        start: &ParserState,
    ) -> std::result::Result<Self::AtRule, ()> {
        Ok(Node::AtRule(AtRule {
            name: prelude.name,
            prelude: prelude.prelude,
            body: AtRuleBody::None,
            location: start.source_location().into(),
        }))
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<Self::AtRule, ParseError<'i, Self::Error>> {
        let body = if holds_declarations(&prelude.name) {
            AtRuleBody::Declarations(parse_declarations(input)?)
        } else {
            let mut children = Vec::new();
            for result in cssparser::StyleSheetParser::new(input, self) {
                children.push(result.map_err(|(error, _)| error)?);
            }
            AtRuleBody::Rules(children)
        };

        Ok(Node::AtRule(AtRule {
            name: prelude.name,
            prelude: prelude.prelude,
            body,
            location: start.source_location().into(),
        }))
    }
}

fn parse_declarations<'i>(
    input: &mut Parser<'i, '_>,
) -> std::result::Result<Vec<Declaration>, ParseError<'i, ThemeError>> {
    let mut declaration_parser = BodyParser;
    let mut declarations = Vec::new();
    for result in RuleBodyParser::new(input, &mut declaration_parser) {
        declarations.push(result.map_err(|(error, _)| error)?);
    }
    Ok(declarations)
}

/// Parses the declarations of a rule body. Nested rules are not supported.
struct BodyParser;

impl<'i> DeclarationParser<'i> for BodyParser {
    type Declaration = Declaration;
    type Error = ThemeError;

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let location = input.current_source_location().into();
        Ok(Declaration {
            property: name.as_ref().to_string(),
            value: remaining_text(input).to_string(),
            location,
        })
    }
}

impl<'i> AtRuleParser<'i> for BodyParser {
    type Prelude = ();
    type AtRule = Declaration;
    type Error = ThemeError;
}

impl<'i> QualifiedRuleParser<'i> for BodyParser {
    type Prelude = ();
    type QualifiedRule = Declaration;
    type Error = ThemeError;
}

impl<'i> RuleBodyItemParser<'i, Declaration, ThemeError> for BodyParser {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}
