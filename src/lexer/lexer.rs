use super::{
    token::{KEYWORDS, ONE_SYMBOL_TOKENS, TWO_SYMBOLS_TOKENS},
    LexerError, Token, TokenKind,
};
use crate::parser::Span;

#[derive(Debug)]
pub struct Lexer {
    tokens: Vec<Token>,
    // (byte offset, char) pairs, so spans stay byte-accurate on non-ASCII input
    chars: Vec<(usize, char)>,
    len: usize,
    index: usize,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            tokens: vec![],
            chars: input.char_indices().collect(),
            len: input.len(),
            index: 0,
        }
    }

    fn offset(&self, index: usize) -> usize {
        self.chars.get(index).map(|&(o, _)| o).unwrap_or(self.len)
    }

    fn peek(&self, n: usize) -> Option<char> {
        self.chars.get(self.index + n).map(|&(_, c)| c)
    }

    fn new_token(&mut self, kind: TokenKind, char_count: usize) {
        let start = self.offset(self.index);
        self.index += char_count;
        let end = self.offset(self.index);
        self.tokens.push(Token {
            kind,
            span: Span::new(start, end),
        });
    }

    fn take_while(&self, pred: impl Fn(char) -> bool) -> String {
        self.chars[self.index..]
            .iter()
            .map(|&(_, c)| c)
            .take_while(|&c| pred(c))
            .collect()
    }

    fn parse_number(&mut self) -> Result<(), LexerError> {
        let s = self.take_while(|c| c.is_ascii_digit());
        let count = s.chars().count();
        let value = s.parse().map_err(|_| LexerError::InvalidInteger {
            span: self.span_of(count).into(),
            literal: s.clone(),
        })?;
        self.new_token(TokenKind::Num(value), count);
        Ok(())
    }

    fn parse_identifier(&mut self) {
        let s = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let count = s.chars().count();

        if let Some(kind) = KEYWORDS.get(s.as_str()) {
            self.new_token(kind.clone(), count);
        } else {
            self.new_token(TokenKind::Ident(s), count);
        }
    }

    fn parse_string(&mut self) -> Result<(), LexerError> {
        let mut value = String::new();
        let mut i = 1;
        loop {
            match self.peek(i) {
                None => {
                    return Err(LexerError::UnterminatedString {
                        span: self.span_of(1).into(),
                    })
                }
                Some('"') => break,
                Some('\\') => {
                    match self.peek(i + 1) {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some(c @ ('"' | '\\')) => value.push(c),
                        Some(c) => {
                            value.push('\\');
                            value.push(c);
                        }
                        None => {
                            return Err(LexerError::UnterminatedString {
                                span: self.span_of(1).into(),
                            })
                        }
                    }
                    i += 2;
                }
                Some(c) => {
                    value.push(c);
                    i += 1;
                }
            }
        }
        self.new_token(TokenKind::Str(value), i + 1);
        Ok(())
    }

    fn skip_block_comment(&mut self) -> Result<(), LexerError> {
        let mut i = 2;
        loop {
            match (self.peek(i), self.peek(i + 1)) {
                (Some('*'), Some('/')) => break,
                (Some(_), _) => i += 1,
                (None, _) => {
                    return Err(LexerError::UnterminatedComment {
                        span: self.span_of(2).into(),
                    })
                }
            }
        }
        self.index += i + 2;
        Ok(())
    }

    fn span_of(&self, char_count: usize) -> Span {
        Span::new(
            self.offset(self.index),
            self.offset(self.index + char_count),
        )
    }

    fn _tokenize(&mut self) -> Result<(), LexerError> {
        while let Some(c) = self.peek(0) {
            let c2: String = [Some(c), self.peek(1)].into_iter().flatten().collect();

            if c.is_whitespace() {
                self.index += 1;
            } else if c2 == "//" {
                while self.peek(0).is_some_and(|c| c != '\n') {
                    self.index += 1;
                }
            } else if c2 == "/*" {
                self.skip_block_comment()?;
            } else if c.is_ascii_digit() {
                self.parse_number()?;
            } else if c.is_ascii_alphabetic() || c == '_' {
                self.parse_identifier();
            } else if c == '"' {
                self.parse_string()?;
            } else if let Some(kind) = TWO_SYMBOLS_TOKENS.get(c2.as_str()) {
                self.new_token(kind.clone(), 2);
            } else if let Some(kind) = ONE_SYMBOL_TOKENS.get(&c) {
                self.new_token(kind.clone(), 1);
            } else {
                return Err(LexerError::UnexpectedCharacter {
                    c,
                    span: self.span_of(1).into(),
                });
            }
        }
        Ok(())
    }

    pub fn tokenize(input: &str) -> Result<Vec<Token>, LexerError> {
        let mut lexer = Lexer::new(input);
        lexer._tokenize()?;

        Ok(lexer.tokens)
    }
}
