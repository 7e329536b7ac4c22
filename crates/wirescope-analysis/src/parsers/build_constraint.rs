//! Build constraint evaluation.
//!
//! A file is left out of the index when its constraint cannot hold in a
//! build that does not set a given tag. Every other term is assumed to be
//! satisfiable, so platform constraints (`linux`, `amd64`) never exclude a
//! file.

/// Convert legacy `// +build` lines into a `//go:build` expression.
/// Space separates alternatives, comma separates conjuncts, and separate
/// lines are ANDed together.
pub fn from_plus_build_lines(lines: &[&str]) -> Option<String> {
    let clauses: Vec<String> = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let options: Vec<String> = line
                .split_whitespace()
                .map(|opt| opt.split(',').collect::<Vec<_>>().join(" && "))
                .collect();
            format!("({})", options.join(" || "))
        })
        .collect();
    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(" && "))
    }
}

/// Whether `expr` excludes the file when `tag` is not set.
/// Malformed expressions never exclude.
pub fn excludes_without(expr: &str, tag: &str) -> bool {
    let tokens = tokenize(expr);
    let mut parser = ExprParser {
        tokens: &tokens,
        pos: 0,
        tag,
    };
    match parser.or_expr() {
        Some(value) if parser.pos == tokens.len() => !value,
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    And,
    Or,
    Not,
    LParen,
    RParen,
}

fn tokenize(expr: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '!' => {
                chars.next();
                tokens.push(Token::Not);
            }
            '&' | '|' => {
                chars.next();
                if chars.peek() == Some(&c) {
                    chars.next();
                }
                tokens.push(if c == '&' { Token::And } else { Token::Or });
            }
            _ => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' || c == '.' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if ident.is_empty() {
                    // Unknown character; skip it.
                    chars.next();
                } else {
                    tokens.push(Token::Ident(ident));
                }
            }
        }
    }
    tokens
}

struct ExprParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    tag: &'a str,
}

impl ExprParser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn or_expr(&mut self) -> Option<bool> {
        let mut value = self.and_expr()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let rhs = self.and_expr()?;
            value = value || rhs;
        }
        Some(value)
    }

    fn and_expr(&mut self) -> Option<bool> {
        let mut value = self.unary()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let rhs = self.unary()?;
            value = value && rhs;
        }
        Some(value)
    }

    fn unary(&mut self) -> Option<bool> {
        match self.peek()?.clone() {
            Token::Not => {
                self.pos += 1;
                Some(!self.unary()?)
            }
            Token::LParen => {
                self.pos += 1;
                let value = self.or_expr()?;
                if self.peek() != Some(&Token::RParen) {
                    return None;
                }
                self.pos += 1;
                Some(value)
            }
            Token::Ident(name) => {
                self.pos += 1;
                Some(name != self.tag)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wireinject_files_are_excluded() {
        assert!(excludes_without("wireinject", "wireinject"));
        assert!(!excludes_without("!wireinject", "wireinject"));
        assert!(!excludes_without("linux && amd64", "wireinject"));
        assert!(excludes_without("wireinject && linux", "wireinject"));
        assert!(!excludes_without("wireinject || linux", "wireinject"));
    }

    #[test]
    fn malformed_expressions_never_exclude() {
        assert!(!excludes_without("(wireinject", "wireinject"));
        assert!(!excludes_without("&&", "wireinject"));
    }

    #[test]
    fn plus_build_lines_convert() {
        let expr = from_plus_build_lines(&["wireinject"]).unwrap();
        assert!(excludes_without(&expr, "wireinject"));

        let expr = from_plus_build_lines(&["linux,amd64 darwin", "!wireinject"]).unwrap();
        assert_eq!(expr, "(linux && amd64 || darwin) && (!wireinject)");
        assert!(!excludes_without(&expr, "wireinject"));
    }
}
