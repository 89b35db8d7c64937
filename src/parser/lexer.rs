//! Lexer for the scene description language using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Control keywords
    #[token("control")]
    Control,
    #[token("label")]
    Label,
    #[token("image")]
    Image,
    #[token("button")]
    Button,
    #[token("panel")]
    Panel,
    #[token("window")]
    Window,
    #[token("scroll")]
    Scroll,

    // Ownership prefix for decorations
    #[token("decor")]
    Decor,

    // Constraint keywords
    #[token("constrain")]
    Constrain,
    #[token("viewport")]
    Viewport,

    #[token("true")]
    True,
    #[token("false")]
    False,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("=")]
    Equals,

    // Delimiters
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,

    // Literals - identifiers must come after keywords
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),

    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    // Comments (skip)
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*/", logos::skip)]
    BlockComment,

    /// Input the lexer could not recognise; the parser reports it in place
    Error,
}

/// Lex input string into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .map(|(tok, span)| (tok.unwrap_or(Token::Error), span))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).map(|(t, _)| t).collect()
    }

    #[test]
    fn test_control_keywords() {
        assert_eq!(
            tokens("control label image button panel window scroll"),
            vec![
                Token::Control,
                Token::Label,
                Token::Image,
                Token::Button,
                Token::Panel,
                Token::Window,
                Token::Scroll
            ]
        );
    }

    #[test]
    fn test_keyword_prefixes_stay_identifiers() {
        assert_eq!(
            tokens("scroll_x labels panel2"),
            vec![
                Token::Ident("scroll_x".to_string()),
                Token::Ident("labels".to_string()),
                Token::Ident("panel2".to_string())
            ]
        );
    }

    #[test]
    fn test_constraint_statement() {
        assert_eq!(
            tokens("constrain ok.bottom_right = viewport.bottom_right - 10.5"),
            vec![
                Token::Constrain,
                Token::Ident("ok".to_string()),
                Token::Dot,
                Token::Ident("bottom_right".to_string()),
                Token::Equals,
                Token::Viewport,
                Token::Dot,
                Token::Ident("bottom_right".to_string()),
                Token::Minus,
                Token::Number(10.5)
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(tokens("panel // comment\nlabel"), vec![Token::Panel, Token::Label]);
        assert_eq!(tokens("panel /* block */ label"), vec![Token::Panel, Token::Label]);
    }

    #[test]
    fn test_unknown_input_becomes_error_token() {
        let lexed: Vec<_> = lex("panel @ label").collect();
        assert_eq!(lexed[1], (Token::Error, 6..7));
        assert_eq!(lexed.len(), 3);
    }
}
