// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP/IFC Parser using nom
//!
//! Zero-copy tokenization and fast entity scanning.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1, one_of},
    combinator::{map, map_res, opt, recognize},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use crate::error::{Error, Result};

/// STEP/IFC Token
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// Entity reference: #123
    EntityRef(u32),
    /// String literal: 'text' (raw, escapes not yet resolved)
    String(&'a str),
    /// Integer: 42
    Integer(i64),
    /// Float: 3.14
    Float(f64),
    /// Enum: .TRUE., .FALSE., .UNKNOWN.
    Enum(&'a str),
    /// List: (1, 2, 3)
    List(Vec<Token<'a>>),
    /// Typed value: IFCPARAMETERVALUE(0.), IFCBOOLEAN(.T.)
    TypedValue(&'a str, Vec<Token<'a>>),
    /// Null value: $
    Null,
    /// Asterisk (derived value): *
    Derived,
}

/// Parse entity reference: #123
fn entity_ref(input: &str) -> IResult<&str, Token> {
    map(
        preceded(char('#'), map_res(digit1, |s: &str| s.parse::<u32>())),
        Token::EntityRef,
    )(input)
}

/// Parse string literal: 'text'
/// STEP uses '' to escape a single quote within a string
fn string_literal(input: &str) -> IResult<&str, Token> {
    fn parse_string_content(input: &str) -> IResult<&str, &str> {
        let bytes = input.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] == b'\'' {
                if bytes.get(i + 1) == Some(&b'\'') {
                    i += 2;
                    continue;
                }
                return Ok((&input[i..], &input[..i]));
            }
            i += 1;
        }

        Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )))
    }

    map(
        delimited(char('\''), parse_string_content, char('\'')),
        Token::String,
    )(input)
}

/// Parse integer: 42, -42, +42
fn integer(input: &str) -> IResult<&str, Token> {
    map_res(
        recognize(pair(opt(one_of("+-")), digit1)),
        |s: &str| s.parse::<i64>().map(Token::Integer),
    )(input)
}

/// Parse float: 3.14, -3.14, 1.5E-10, 0., 1.
/// STEP allows floats like "0." without decimal digits
fn float(input: &str) -> IResult<&str, Token> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            digit1,
            char('.'),
            opt(digit1),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |s: &str| fast_float::parse::<f64, _>(s).map(Token::Float),
    )(input)
}

/// Parse enum: .TRUE., .FALSE., .UNKNOWN., .ELEMENT.
fn enum_value(input: &str) -> IResult<&str, Token> {
    map(
        delimited(
            char('.'),
            take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
            char('.'),
        ),
        Token::Enum,
    )(input)
}

/// Parse null: $
fn null(input: &str) -> IResult<&str, Token> {
    map(char('$'), |_| Token::Null)(input)
}

/// Parse derived: *
fn derived(input: &str) -> IResult<&str, Token> {
    map(char('*'), |_| Token::Derived)(input)
}

/// Parse typed value: IFCPARAMETERVALUE(0.), IFCBOOLEAN(.T.)
fn typed_value(input: &str) -> IResult<&str, Token> {
    map(
        pair(
            take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
            delimited(
                char('('),
                separated_list0(delimited(ws, char(','), ws), token),
                char(')'),
            ),
        ),
        |(type_name, args)| Token::TypedValue(type_name, args),
    )(input)
}

/// Skip whitespace and `/* ... */` comments
fn ws(input: &str) -> IResult<&str, ()> {
    let mut rest = input.trim_start();
    while let Some(after) = rest.strip_prefix("/*") {
        match after.find("*/") {
            Some(end) => rest = after[end + 2..].trim_start(),
            None => break,
        }
    }
    Ok((rest, ()))
}

/// Parse a token with optional surrounding whitespace
fn token(input: &str) -> IResult<&str, Token> {
    delimited(
        ws,
        alt((
            float, // Try float before integer (float includes '.')
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

/// Parse list: (1, 2, 3) or nested lists
fn list(input: &str) -> IResult<&str, Token> {
    map(
        delimited(
            char('('),
            separated_list0(delimited(ws, char(','), ws), token),
            preceded(ws, char(')')),
        ),
        Token::List,
    )(input)
}

/// Parse a complete entity instance
/// Example: #123=IFCWALL('guid','owner',$,$,'name',$,$,$);
///
/// Returns the entity id, the upper-case type name and the attribute tokens.
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
                take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
                ws,
            ),
        ),
        delimited(
            char('('),
            separated_list0(delimited(ws, char(','), ws), token),
            tuple((ws, char(')'), ws, tag(";"))),
        ),
    ))(input);

    match result {
        Ok((_, (id, type_name, args))) => Ok((id, type_name, args)),
        Err(e) => Err(Error::parse(0, format!("Failed to parse entity: {}", e))),
    }
}

/// Parse a header record
/// Example: FILE_SCHEMA(('IFC4'));
pub fn parse_record(input: &str) -> Result<(&str, Vec<Token>)> {
    let result: IResult<&str, (&str, Vec<Token>)> = tuple((
        delimited(
            ws,
            take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
            ws,
        ),
        delimited(
            char('('),
            separated_list0(delimited(ws, char(','), ws), token),
            tuple((ws, char(')'), ws, tag(";"))),
        ),
    ))(input);

    match result {
        Ok((_, record)) => Ok(record),
        Err(e) => Err(Error::parse(0, format!("Failed to parse header record: {}", e))),
    }
}

/// True when `text` holds only whitespace and comments
pub(crate) fn is_blank(text: &str) -> bool {
    skip_blank(text).is_empty()
}

/// Remainder of `text` after leading whitespace and comments
pub(crate) fn skip_blank(text: &str) -> &str {
    match ws(text) {
        Ok((rest, ())) => rest,
        Err(_) => text,
    }
}

/// Resolve STEP string escapes (`''` and the `\X2\...\X0\` / `\X\hh` encodings)
pub fn decode_step_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find(['\'', '\\']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(after) = tail.strip_prefix("''") {
            out.push('\'');
            rest = after;
        } else if let Some(after) = tail.strip_prefix("\\\\") {
            out.push('\\');
            rest = after;
        } else if let Some(after) = tail.strip_prefix("\\X2\\") {
            let end = after.find("\\X0\\").unwrap_or(after.len());
            let hex = &after[..end];
            let units: Vec<u16> = hex
                .as_bytes()
                .chunks(4)
                .filter_map(|chunk| std::str::from_utf8(chunk).ok())
                .filter_map(|s| u16::from_str_radix(s, 16).ok())
                .collect();
            out.push_str(&String::from_utf16_lossy(&units));
            rest = after.get(end + 4..).unwrap_or("");
        } else if let Some(after) = tail.strip_prefix("\\X\\") {
            match after.get(..2).and_then(|h| u8::from_str_radix(h, 16).ok()) {
                Some(byte) => {
                    out.push(char::from(byte));
                    rest = &after[2..];
                }
                None => {
                    out.push_str("\\X\\");
                    rest = after;
                }
            }
        } else {
            out.push_str(&tail[..1]);
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    out
}

/// Entity scanner - finds entity instances without parsing their attributes
///
/// The terminating `;` is searched outside of quoted strings and comments,
/// so names such as `'Wall; east'` do not split an instance.
pub struct EntityScanner<'a> {
    content: &'a str,
    position: usize,
}

impl<'a> EntityScanner<'a> {
    /// Create a new scanner
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            position: 0,
        }
    }

    /// Scan the raw byte span of the next instance, `#` through `;`
    ///
    /// Yields an error for an instance that is never terminated.
    pub fn next_span(&mut self) -> Option<Result<(usize, usize)>> {
        let start = self.find_next_hash()?;

        match find_instance_end(self.content.as_bytes(), start) {
            Some(end) => {
                self.position = end;
                Some(Ok((start, end)))
            }
            None => {
                self.position = self.content.len();
                Some(Err(Error::parse(start, "unterminated entity instance")))
            }
        }
    }

    /// Advance to the next `#` that is not inside a comment
    fn find_next_hash(&mut self) -> Option<usize> {
        let bytes = self.content.as_bytes();
        let mut i = self.position;

        while i < bytes.len() {
            match bytes[i] {
                b'#' => return Some(i),
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    i = skip_comment(bytes, i);
                }
                _ => i += 1,
            }
        }

        self.position = bytes.len();
        None
    }
}

/// Return the index just past `*/`, or the end of input
#[inline]
fn skip_comment(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 2;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return i + 2;
        }
        i += 1;
    }
    bytes.len()
}

/// Find the byte just past the `;` that terminates the instance starting at `start`
pub(crate) fn find_instance_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start;
    let mut in_string = false;

    while i < bytes.len() {
        let b = bytes[i];

        if in_string {
            if b == b'\'' {
                // '' is an escaped quote, stay inside the string
                if bytes.get(i + 1) == Some(&b'\'') {
                    i += 2;
                    continue;
                }
                in_string = false;
            }
            i += 1;
            continue;
        }

        match b {
            b'\'' => in_string = true,
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = skip_comment(bytes, i);
                continue;
            }
            b';' => return Some(i + 1),
            _ => {}
        }
        i += 1;
    }

    None
}
