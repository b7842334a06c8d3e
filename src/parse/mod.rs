//! Parser for the textual schema form, e.g.
//! `add.out(Tensor self, Tensor other, *, Scalar alpha=1, Tensor(a!) out) -> Tensor(a!)`.

use crate::{
    errors::{GenError, GenResult},
    schema::{
        Annotation, Argument, Arguments, BaseOperatorName, BaseTy, FunctionSchema, OperatorName,
        Return, Type,
    },
    span::{Pos, SchemaSource, Span},
};

pub fn parse_schema(text: &str) -> GenResult<FunctionSchema> {
    Parser::new(text).parse()
}

fn is_valid_id_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub struct Parser<'a> {
    text: &'a str,
    src: Vec<char>,
    pos: Pos,
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str) -> Parser<'a> {
        Parser {
            text,
            src: text.chars().collect(),
            pos: Pos::new(),
        }
    }

    pub fn parse(mut self) -> GenResult<FunctionSchema> {
        self.skip_ws();
        let name = self.parse_name()?;
        let arguments = self.parse_arguments()?;
        let returns = self.parse_returns()?;
        self.skip_ws();
        if !self.is_eof() {
            let start = self.pos;
            return Err(self.error("unexpected trailing input after returns", start));
        }

        Ok(FunctionSchema {
            name,
            arguments,
            returns,
        })
    }

    fn is_eof(&self) -> bool {
        self.pos.offset >= self.src.len()
    }

    fn first(&self) -> char {
        self.src.get(self.pos.offset).copied().unwrap_or('\0')
    }

    fn second(&self) -> char {
        self.src.get(self.pos.offset + 1).copied().unwrap_or('\0')
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos.offset).copied()?;
        self.pos.offset += 1;
        self.pos.col += 1;
        Some(ch)
    }

    fn next_char_while(&mut self, mut f: impl FnMut(char) -> bool) -> String {
        let mut s = String::new();
        while !self.is_eof() && f(self.first()) {
            if let Some(ch) = self.next_char() {
                s.push(ch);
            }
        }
        s
    }

    fn skip_ws(&mut self) {
        self.next_char_while(char::is_whitespace);
    }

    fn error<S: ToString>(&self, msg: S, start: Pos) -> GenError {
        let mut end = self.pos;
        if end.offset == start.offset {
            end.offset += 1;
            end.col += 1;
        }
        GenError::parse(msg, SchemaSource::new(self.text, Span { start, end }))
    }

    fn expect(&mut self, ch: char) -> GenResult {
        self.skip_ws();
        let start = self.pos;
        if self.first() == ch {
            self.next_char();
            Ok(())
        } else if self.is_eof() {
            Err(self.error(format!("expected `{}` but reached end of schema", ch), start))
        } else {
            let found = self.first();
            self.next_char();
            Err(self.error(format!("expected `{}` but found `{}`", ch, found), start))
        }
    }

    fn ident(&mut self, what: &str) -> GenResult<String> {
        self.skip_ws();
        let start = self.pos;
        let id = self.next_char_while(is_valid_id_char);
        if id.is_empty() {
            return Err(self.error(format!("expected {}", what), start));
        }
        Ok(id)
    }

    fn parse_name(&mut self) -> GenResult<OperatorName> {
        let mut base = self.ident("operator name")?;
        let is_dunder = base.len() > 4 && base.starts_with("__") && base.ends_with("__");
        let inplace = !is_dunder && base.ends_with('_') && base.len() > 1;
        if inplace {
            base.pop();
        }

        let overload_name = if self.first() == '.' {
            self.next_char();
            self.ident("overload name")?
        } else {
            String::new()
        };

        Ok(OperatorName {
            name: BaseOperatorName { base, inplace },
            overload_name,
        })
    }

    fn parse_arguments(&mut self) -> GenResult<Arguments> {
        self.expect('(')?;
        let mut arguments = Arguments::default();
        self.skip_ws();
        if self.first() == ')' {
            self.next_char();
            return Ok(arguments);
        }

        let mut kwarg_only = false;
        loop {
            self.skip_ws();
            if self.first() == '*' && !is_valid_id_char(self.second()) {
                let start = self.pos;
                self.next_char();
                if kwarg_only {
                    return Err(self.error("duplicate keyword-only marker", start));
                }
                kwarg_only = true;
            } else {
                let arg = self.parse_argument()?;
                let is_write = arg.annotation.as_ref().map(|a| a.is_write).unwrap_or(false);
                if !kwarg_only {
                    arguments.positional.push(arg);
                } else if is_write || !arguments.out.is_empty() {
                    arguments.out.push(arg);
                } else {
                    arguments.kwarg_only.push(arg);
                }
            }

            self.skip_ws();
            let start = self.pos;
            match self.next_char() {
                Some(',') => continue,
                Some(')') => break,
                Some(ch) => {
                    return Err(self.error(
                        format!("expected `,` or `)` in argument list but found `{}`", ch),
                        start,
                    ))
                }
                None => return Err(self.error("unterminated argument list", start)),
            }
        }

        Ok(arguments)
    }

    fn parse_argument(&mut self) -> GenResult<Argument> {
        let (ty, annotation) = self.parse_type()?;
        let name = self.ident("argument name")?;
        self.skip_ws();
        let default = if self.first() == '=' {
            self.next_char();
            Some(self.parse_default()?)
        } else {
            None
        };

        Ok(Argument {
            name,
            ty,
            default,
            annotation,
        })
    }

    /// Reads a default value verbatim, stopping at the first `,` or `)`
    /// that is not nested inside brackets or quotes.
    fn parse_default(&mut self) -> GenResult<String> {
        let start = self.pos;
        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        let mut value = String::new();
        while !self.is_eof() {
            let ch = self.first();
            if let Some(q) = quote {
                if ch == q {
                    quote = None;
                }
            } else {
                match ch {
                    '\'' | '"' => quote = Some(ch),
                    '[' | '(' | '{' => depth += 1,
                    ']' | ')' | '}' if depth > 0 => depth -= 1,
                    ',' | ')' if depth == 0 => break,
                    _ => {}
                }
            }
            value.push(ch);
            self.next_char();
        }

        if quote.is_some() {
            return Err(self.error("unterminated string in default value", start));
        }

        let value = value.trim_end().to_string();
        if value.is_empty() {
            return Err(self.error("expected default value after `=`", start));
        }
        Ok(value)
    }

    fn parse_type(&mut self) -> GenResult<(Type, Option<Annotation>)> {
        self.skip_ws();
        let start = self.pos;
        let name = self.ident("type")?;
        let base = match BaseTy::from_name(&name) {
            Some(base) => base,
            None => return Err(self.error(format!("unknown type `{}`", name), start)),
        };

        let annotation = if self.first() == '(' {
            self.next_char();
            Some(self.parse_annotation()?)
        } else {
            None
        };

        let mut ty = Type::Base(base);
        loop {
            match self.first() {
                '?' => {
                    self.next_char();
                    ty = Type::optional(ty);
                }
                '[' => {
                    self.next_char();
                    let size_start = self.pos;
                    let digits = self.next_char_while(|c| c.is_ascii_digit());
                    let size = if digits.is_empty() {
                        None
                    } else {
                        match digits.parse::<usize>() {
                            Ok(n) => Some(n),
                            Err(_) => {
                                return Err(self.error("invalid list size", size_start));
                            }
                        }
                    };
                    self.expect(']')?;
                    ty = Type::list(ty, size);
                }
                _ => break,
            }
        }

        if annotation.is_some() && !ty.is_tensor_like() {
            return Err(self.error("alias annotations are only allowed on tensors", start));
        }
        Ok((ty, annotation))
    }

    fn parse_annotation(&mut self) -> GenResult<Annotation> {
        let mut alias_set = vec![self.ident("alias set")?];
        while self.first() == '|' {
            self.next_char();
            alias_set.push(self.ident("alias set")?);
        }

        let is_write = if self.first() == '!' {
            self.next_char();
            true
        } else {
            false
        };
        self.expect(')')?;
        Ok(Annotation {
            alias_set,
            is_write,
        })
    }

    fn parse_return(&mut self) -> GenResult<Return> {
        let (ty, annotation) = self.parse_type()?;
        self.skip_ws();
        let name = if is_valid_id_char(self.first()) {
            Some(self.ident("return name")?)
        } else {
            None
        };
        Ok(Return {
            name,
            ty,
            annotation,
        })
    }

    fn parse_returns(&mut self) -> GenResult<Vec<Return>> {
        self.skip_ws();
        let start = self.pos;
        if self.first() != '-' || self.second() != '>' {
            return Err(self.error("expected `->` after argument list", start));
        }
        self.next_char();
        self.next_char();
        self.skip_ws();

        if self.first() != '(' {
            return Ok(vec![self.parse_return()?]);
        }

        self.next_char();
        let mut returns = vec![];
        self.skip_ws();
        if self.first() == ')' {
            self.next_char();
            return Ok(returns);
        }

        loop {
            returns.push(self.parse_return()?);
            self.skip_ws();
            let start = self.pos;
            match self.next_char() {
                Some(',') => continue,
                Some(')') => break,
                _ => return Err(self.error("expected `,` or `)` in return list", start)),
            }
        }
        Ok(returns)
    }
}
