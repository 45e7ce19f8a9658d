//! Lexer built on the `logos` crate.
//!
//! Identifiers (keywords included) and integer literals get their own
//! classes; string literals, operators and punctuation all land in
//! `Other` carrying their exact text, since the parser matches on text.

use logos::{Logos, SpannedIter};

use super::token::{Loc, Token, TokenClass};

#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"/\*([^*]|\*[^/])*\*/")]
enum RawToken {
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r#""(\\.|[^"\\])*""#)]
    Str,

    #[token("<<=")]
    #[token(">>=")]
    #[token("<<")]
    #[token(">>")]
    #[token("++")]
    #[token("--")]
    #[token("->")]
    #[token("<=")]
    #[token(">=")]
    #[token("==")]
    #[token("!=")]
    #[token("&&")]
    #[token("||")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("&=")]
    #[token("|=")]
    #[token("^=")]
    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    #[token("%")]
    #[token("&")]
    #[token("|")]
    #[token("^")]
    #[token("~")]
    #[token("!")]
    #[token("<")]
    #[token(">")]
    #[token("=")]
    #[token("?")]
    #[token(":")]
    #[token(";")]
    #[token(",")]
    #[token(".")]
    #[token("(")]
    #[token(")")]
    #[token("{")]
    #[token("}")]
    #[token("[")]
    #[token("]")]
    Punct,
}

pub struct Lexer<'a> {
    inner: SpannedIter<'a, RawToken>,
    src: &'a str,
    line_starts: Vec<usize>,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in src.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { inner: RawToken::lexer(src).spanned(), src, line_starts, done: false }
    }

    fn loc_of(&self, offset: usize) -> Loc {
        let line = self.line_starts.partition_point(|&s| s <= offset);
        let col = offset - self.line_starts[line - 1] + 1;
        Loc { line: line as u32, col: col as u32 }
    }

    /// Produce the next token. After the input is exhausted this keeps
    /// returning `Eof`, so the parser can resync without looping.
    pub fn next_token(&mut self) -> Token {
        if self.done {
            return Token::eof(self.loc_of(self.src.len()));
        }
        match self.inner.next() {
            Some((raw, span)) => {
                let loc = self.loc_of(span.start);
                let text = self.src[span].to_string();
                let class = match raw {
                    Ok(RawToken::Ident) => TokenClass::Ident,
                    Ok(RawToken::Int) => TokenClass::Int,
                    // a byte logos rejects flows through as a one-char
                    // Other token and is reported by the parser's resync
                    Ok(RawToken::Str) | Ok(RawToken::Punct) | Err(_) => TokenClass::Other,
                };
                Token { class, text, loc }
            }
            None => {
                self.done = true;
                Token::eof(self.loc_of(self.src.len()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(src: &str) -> Vec<String> {
        let mut lex = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let t = lex.next_token();
            if t.class == TokenClass::Eof {
                break;
            }
            out.push(t.text);
        }
        out
    }

    #[test]
    fn multichar_operators_lex_whole() {
        assert_eq!(texts("a <<= b >> 1"), ["a", "<<=", "b", ">>", "1"]);
        assert_eq!(texts("p->x++"), ["p", "->", "x", "++"]);
    }

    #[test]
    fn locations_are_line_and_column() {
        let mut lex = Lexer::new("int\n  x;");
        assert_eq!(lex.next_token().loc, Loc { line: 1, col: 1 });
        assert_eq!(lex.next_token().loc, Loc { line: 2, col: 3 });
    }

    #[test]
    fn comments_and_whitespace_skip() {
        assert_eq!(texts("a /* b */ c"), ["a", "c"]);
    }

    #[test]
    fn eof_repeats() {
        let mut lex = Lexer::new("x");
        lex.next_token();
        assert_eq!(lex.next_token().class, TokenClass::Eof);
        assert_eq!(lex.next_token().class, TokenClass::Eof);
    }
}
