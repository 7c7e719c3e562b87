// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP/IFC tokenizer and entity scanner built with nom.
//!
//! Tokenization is zero-copy: string and enum tokens borrow from the input.

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit1, one_of},
    combinator::{map, map_res, opt, recognize},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use crate::error::{Error, Result};

/// STEP/IFC token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// Entity reference: #123
    EntityRef(u32),
    /// String literal: 'text' ('' escapes a quote)
    String(&'a str),
    /// Integer: 42
    Integer(i64),
    /// Float: 3.14, 0., 1.5E-10
    Float(f64),
    /// Enum: .TRUE., .UNKNOWN., .ELEMENT.
    Enum(&'a str),
    /// List: (1, 2, 3)
    List(Vec<Token<'a>>),
    /// Wrapped simple type: IFCLABEL('x'), IFCBOOLEAN(.T.)
    TypedValue(&'a str, Vec<Token<'a>>),
    /// Null value: $
    Null,
    /// Derived value: *
    Derived,
}

/// Parse entity reference: #123
fn entity_ref(input: &str) -> IResult<&str, Token> {
    map(
        preceded(char('#'), map_res(digit1, |s: &str| s.parse::<u32>())),
        Token::EntityRef,
    )(input)
}

/// Parse string literal: 'text' or "text".
/// A doubled quote inside the literal escapes a single quote.
fn string_literal(input: &str) -> IResult<&str, Token> {
    fn content(input: &str, quote: u8) -> IResult<&str, &str> {
        let bytes = input.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] == quote {
                if i + 1 < bytes.len() && bytes[i + 1] == quote {
                    i += 2; // Escaped quote, keep scanning
                    continue;
                }
                return Ok((&input[i..], &input[..i]));
            }
            i += 1;
        }

        // No closing quote
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )))
    }

    alt((
        map(
            delimited(char('\''), |i| content(i, b'\''), char('\'')),
            Token::String,
        ),
        map(
            delimited(char('"'), |i| content(i, b'"'), char('"')),
            Token::String,
        ),
    ))(input)
}

/// Parse integer: 42, -42
fn integer(input: &str) -> IResult<&str, Token> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i64>().map(Token::Integer)
    })(input)
}

/// Parse float: 3.14, -3.14, 1.5E-10, 0.
/// STEP allows a bare trailing dot with no decimal digits.
fn float(input: &str) -> IResult<&str, Token> {
    map_res(
        recognize(tuple((
            opt(char('-')),
            digit1,
            char('.'),
            opt(digit1),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |s: &str| s.parse::<f64>().map(Token::Float),
    )(input)
}

/// Parse enum: .TRUE., .ELEMENT.
fn enum_value(input: &str) -> IResult<&str, Token> {
    map(
        delimited(
            char('.'),
            take_while1(|c: char| c.is_alphanumeric() || c == '_'),
            char('.'),
        ),
        Token::Enum,
    )(input)
}

/// Parse wrapped simple type: IFCLABEL('x'), IFCBOOLEAN(.T.)
fn typed_value(input: &str) -> IResult<&str, Token> {
    map(
        pair(
            take_while1(|c: char| c.is_alphanumeric() || c == '_'),
            delimited(
                char('('),
                separated_list0(delimited(ws, char(','), ws), token),
                char(')'),
            ),
        ),
        |(type_name, args)| Token::TypedValue(type_name, args),
    )(input)
}

/// Parse list: (1, 2, 3), possibly nested
fn list(input: &str) -> IResult<&str, Token> {
    map(
        delimited(
            char('('),
            separated_list0(delimited(ws, char(','), ws), token),
            char(')'),
        ),
        Token::List,
    )(input)
}

fn null(input: &str) -> IResult<&str, Token> {
    map(char('$'), |_| Token::Null)(input)
}

fn derived(input: &str) -> IResult<&str, Token> {
    map(char('*'), |_| Token::Derived)(input)
}

/// Skip whitespace
fn ws(input: &str) -> IResult<&str, ()> {
    map(take_while(|c: char| c.is_whitespace()), |_| ())(input)
}

/// Parse one token with optional surrounding whitespace.
fn token(input: &str) -> IResult<&str, Token> {
    delimited(
        ws,
        alt((
            float, // Before integer: float owns the '.'
            integer,
            entity_ref,
            string_literal,
            enum_value,
            list,
            typed_value,
            null,
            derived,
        )),
        ws,
    )(input)
}

/// Parse a complete entity line: `#123=IFCWALL('guid',$,'name',...);`
///
/// Returns the entity id, the raw type name as written in the file
/// (e.g. `IFCWALL`), and the attribute tokens.
pub fn parse_entity(input: &str) -> Result<(u32, &str, Vec<Token>)> {
    let result: IResult<&str, (u32, &str, Vec<Token>)> = tuple((
        delimited(
            ws,
            preceded(char('#'), map_res(digit1, |s: &str| s.parse::<u32>())),
            ws,
        ),
        preceded(
            char('='),
            delimited(
                ws,
                take_while1(|c: char| c.is_alphanumeric() || c == '_'),
                ws,
            ),
        ),
        delimited(
            char('('),
            separated_list0(delimited(ws, char(','), ws), token),
            tuple((char(')'), ws, char(';'))),
        ),
    ))(input);

    match result {
        Ok((_, entity)) => Ok(entity),
        Err(e) => Err(Error::parse(0, format!("failed to parse entity: {}", e))),
    }
}

/// Linear entity scanner.
///
/// Walks the file content yielding `(id, type_name, start, end)` spans
/// without parsing attributes. O(n) over the file.
pub struct EntityScanner<'a> {
    content: &'a str,
    position: usize,
}

impl<'a> EntityScanner<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            position: 0,
        }
    }

    /// Scan for the next entity line.
    pub fn next_entity(&mut self) -> Option<(u32, &'a str, usize, usize)> {
        loop {
            let remaining = &self.content[self.position..];
            let start_offset = memchr::memchr(b'#', remaining.as_bytes())?;
            let line_start = self.position + start_offset;

            let line_content = &self.content[line_start..];
            let end_offset = memchr::memchr(b';', line_content.as_bytes())?;
            let line_end = line_start + end_offset + 1;

            // Entity id directly after '#'
            let id_start = line_start + 1;
            let id_end = self.content[id_start..line_end]
                .find(|c: char| !c.is_ascii_digit())
                .map(|i| id_start + i)
                .unwrap_or(line_end);

            let Ok(id) = self.content[id_start..id_end].parse::<u32>() else {
                // '#' inside a comment or string, resume after it
                self.position = line_start + 1;
                continue;
            };

            // Type name sits between '=' and '('
            let Some(eq_pos) = self.content[id_end..line_end].find('=') else {
                self.position = line_start + 1;
                continue;
            };
            let after_eq = id_end + eq_pos + 1;

            let Some(type_start) = self.content[after_eq..line_end]
                .find(|c: char| !c.is_whitespace())
                .map(|i| after_eq + i)
            else {
                self.position = line_end;
                continue;
            };

            let type_end = self.content[type_start..line_end]
                .find(|c: char| c == '(' || c.is_whitespace())
                .map(|i| type_start + i)
                .unwrap_or(line_end);

            let type_name = &self.content[type_start..type_end];

            self.position = line_end;
            return Some((id, type_name, line_start, line_end));
        }
    }

    /// Collect all entities of one type (case-insensitive).
    pub fn find_by_type(&mut self, target_type: &str) -> Vec<(u32, usize, usize)> {
        let mut results = Vec::new();

        while let Some((id, type_name, start, end)) = self.next_entity() {
            if type_name.eq_ignore_ascii_case(target_type) {
                results.push((id, start, end));
            }
        }

        results
    }

    /// Count entities per type name.
    pub fn count_by_type(&mut self) -> rustc_hash::FxHashMap<String, usize> {
        let mut counts = rustc_hash::FxHashMap::default();

        while let Some((_, type_name, _, _)) = self.next_entity() {
            *counts.entry(type_name.to_string()).or_insert(0) += 1;
        }

        counts
    }

    /// Reset scanner to the beginning of the content.
    pub fn reset(&mut self) {
        self.position = 0;
    }
}
