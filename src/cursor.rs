use crate::token::{Token, TokenKind};

/// Cursor over the lexer's token sequence with push-back.
///
/// Deferred tokens are replayed last-in-first-out before any further token is
/// pulled from the underlying sequence. Once both are exhausted the cursor
/// yields an end-of-stream token forever, so `peek` always has something to
/// show even when the lexer forgot to emit `Eos`.
pub(crate) struct TokenCursor {
    /// Remaining input, stored back to front so the next token is `last()`.
    upcoming: Vec<Token>,
    deferred: Vec<Token>,
    eos: Token,
}

impl TokenCursor {
    pub(crate) fn new<I: IntoIterator<Item = Token>>(tokens: I) -> Self {
        let mut upcoming: Vec<Token> = tokens.into_iter().collect();
        let (line, column) = upcoming.last().map_or((1, 1), |last| (last.line, last.column));
        upcoming.reverse();
        Self {
            upcoming,
            deferred: Vec::new(),
            eos: Token::new(TokenKind::Eos, line, column),
        }
    }

    /// The current token, without consuming it.
    pub(crate) fn peek(&self) -> &Token {
        self.lookahead(0)
    }

    /// The `n`-th token ahead of the cursor; `lookahead(0)` is `peek()`.
    pub(crate) fn lookahead(&self, n: usize) -> &Token {
        let deferred = self.deferred.len();
        if n < deferred {
            return self
                .deferred
                .get(deferred.saturating_sub(n).saturating_sub(1))
                .unwrap_or(&self.eos);
        }
        let n = n.saturating_sub(deferred);
        self.upcoming
            .len()
            .checked_sub(n)
            .and_then(|len| len.checked_sub(1))
            .and_then(|idx| self.upcoming.get(idx))
            .unwrap_or(&self.eos)
    }

    /// Consumes and returns the current token.
    pub(crate) fn advance(&mut self) -> Token {
        self.deferred
            .pop()
            .or_else(|| self.upcoming.pop())
            .unwrap_or_else(|| self.eos.clone())
    }

    /// Pushes `token` back so it is the next one returned.
    pub(crate) fn defer(&mut self, token: Token) {
        self.deferred.push(token);
    }
}
