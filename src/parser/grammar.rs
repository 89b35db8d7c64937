//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::parser::ast::*;
use crate::parser::lexer::Token;

/// Parse scene source code into an AST
pub fn parse(input: &str) -> Result<Document, Vec<crate::ParseError>> {
    let len = input.len();

    // Create a logos lexer and convert to token stream
    let token_iter = crate::parser::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    document_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn document_parser<'a, I>() -> impl Parser<'a, I, Document, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let identifier = select! {
        Token::Ident(s) => Identifier::new(s),
    }
    .map_with(|id, e| Spanned::new(id, span_range(&e.span())));

    let unsigned = select! {
        Token::Number(n) => n,
    };

    let signed = just(Token::Minus)
        .or_not()
        .then(unsigned.clone())
        .map(|(neg, n)| if neg.is_some() { -n } else { n });

    // Modifier values: numbers, booleans and bare words
    let value = choice((
        signed.map(Value::Number),
        just(Token::True).to(Value::Bool(true)),
        just(Token::False).to(Value::Bool(false)),
        select! { Token::Ident(s) => Value::Keyword(s) },
    ))
    .map_with(|v, e| Spanned::new(v, span_range(&e.span())));

    let modifier = identifier
        .clone()
        .then_ignore(just(Token::Colon))
        .then(value)
        .map_with(|(key, value), e| Spanned::new(Modifier { key, value }, span_range(&e.span())));

    let modifier_block = modifier
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::BracketOpen), just(Token::BracketClose));

    // ==================== Constraints ====================

    let viewport_edge = just(Token::Viewport)
        .map_with(|_, e| Spanned::new(Target::Viewport, span_range(&e.span())))
        .then_ignore(just(Token::Dot))
        .then(identifier.clone())
        .map(|(target, edge)| EdgeRef { target, edge });

    // `dialog.left`, or `main.body.left` for the parts of a window
    let control_edge = identifier
        .clone()
        .separated_by(just(Token::Dot))
        .at_least(2)
        .collect::<Vec<_>>()
        .try_map(|mut parts: Vec<Spanned<Identifier>>, span: SimpleSpan| {
            let edge = parts.pop().ok_or_else(|| Rich::custom(span, "expected an edge"))?;
            let (start, end) = match (parts.first(), parts.last()) {
                (Some(first), Some(last)) => (first.span.start, last.span.end),
                _ => return Err(Rich::custom(span, "expected a control name")),
            };
            let name = parts
                .iter()
                .map(|p| p.node.as_str())
                .collect::<Vec<_>>()
                .join(".");
            Ok(EdgeRef {
                target: Spanned::new(Target::Control(Identifier::new(name)), start..end),
                edge,
            })
        });

    let edge_ref = choice((viewport_edge, control_edge));

    // `+ 10` or `- 10`
    let distance = choice((just(Token::Plus).to(1.0), just(Token::Minus).to(-1.0)))
        .then(unsigned)
        .map(|(sign, n)| sign * n);

    let constrain_decl = just(Token::Constrain)
        .ignore_then(edge_ref.clone())
        .then_ignore(just(Token::Equals))
        .then(edge_ref)
        .then(distance.or_not())
        .then(modifier_block.clone().or_not())
        .map(|(((subject, anchor), distance), modifiers)| ConstrainDecl {
            subject,
            anchor,
            distance: distance.unwrap_or(0.0),
            modifiers: modifiers.unwrap_or_default(),
        });

    // ==================== Controls ====================

    let control_type = choice((
        just(Token::Control).to(ControlType::Control),
        just(Token::Label).to(ControlType::Label),
        just(Token::Image).to(ControlType::Image),
        just(Token::Button).to(ControlType::Button),
        just(Token::Panel).to(ControlType::Panel),
        just(Token::Window).to(ControlType::Window),
        just(Token::Scroll).to(ControlType::Scroll),
    ))
    .map_with(|ct, e| Spanned::new(ct, span_range(&e.span())));

    // Recursive statement parser
    let statement = recursive(|stmt| {
        let control_decl = just(Token::Decor)
            .or_not()
            .then(control_type)
            .then(identifier)
            .then(modifier_block.clone().or_not())
            .then(
                stmt.clone()
                    .repeated()
                    .collect::<Vec<_>>()
                    .delimited_by(just(Token::BraceOpen), just(Token::BraceClose))
                    .or_not(),
            )
            .map(|((((decor, control_type), name), modifiers), children)| ControlDecl {
                decoration: decor.is_some(),
                control_type,
                name,
                modifiers: modifiers.unwrap_or_default(),
                children: children.unwrap_or_default(),
            });

        choice((
            constrain_decl.clone().map(Statement::Constrain),
            control_decl.map(Statement::Control),
        ))
        .map_with(|s, e| Spanned::new(s, span_range(&e.span())))
        .boxed()
    });

    // Document is a list of statements
    statement
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
        .map(|statements| Document { statements })
}
