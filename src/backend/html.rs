//! Tolerant tokenizer for the ledger document.
//!
//! Only what the ledger needs is understood: tags with attributes, text,
//! comments and declarations. Every token keeps its byte span so new rows
//! can be spliced into the original text without re-rendering it.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_till1, take_until, take_while, take_while1},
    character::complete::{char, digit1, hex_digit1, multispace0, satisfy},
    combinator::{map, map_opt, map_res, opt, recognize, rest, value},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Start {
        name: String,
        attributes: Vec<(String, String)>,
        self_closing: bool
    },
    End {
        name: String
    },
    Text(&'a str),
    Comment,
    Declaration
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned<'a> {
    pub token: Token<'a>,
    pub start: usize,
    pub end: usize
}

/// Where the transaction container sits in a token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRegion {
    /// Token index of the container's start tag
    pub open: usize,
    /// Token index of the container's end tag, or the token count when
    /// the document ends first
    pub close: usize,
    /// Byte offset of the container's end tag, or the document length
    pub close_offset: usize,
    /// Byte offset of the first `</tbody>` directly inside the container
    pub body_close_offset: Option<usize>
}

// content of these is not markup
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// An unterminated comment runs to the end of the document.
fn comment(input: &str) -> IResult<&str, Token<'_>> {
    map(
        preceded(tag("<!--"), alt((terminated(take_until("-->"), tag("-->")), rest))),
        |_| Token::Comment
    )(input)
}

fn declaration(input: &str) -> IResult<&str, Token<'_>> {
    map(
        delimited(alt((tag("<!"), tag("<?"))), take_till(|c: char| c == '>'), char('>')),
        |_| Token::Declaration
    )(input)
}

fn tag_name(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            satisfy(|c: char| c.is_ascii_alphabetic()),
            take_while(|c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
        )),
        |name: &str| name.to_ascii_lowercase()
    )(input)
}

fn attribute_value(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_till(|c: char| c == '"'), char('"')),
        delimited(char('\''), take_till(|c: char| c == '\''), char('\'')),
        take_while1(|c: char| !c.is_whitespace() && !matches!(c, '>' | '"' | '\''))
    ))(input)
}

fn attribute(input: &str) -> IResult<&str, (String, String)> {
    map(
        pair(
            take_while1(|c: char| !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'')),
            opt(preceded(tuple((multispace0, char('='), multispace0)), attribute_value))
        ),
        |(name, val): (&str, Option<&str>)| {
            (name.to_ascii_lowercase(), decode_entities(val.unwrap_or_default()))
        }
    )(input)
}

/// Attributes need not be separated by whitespace: `href="x"class="y"`.
fn start_tag(input: &str) -> IResult<&str, Token<'_>> {
    map(
        tuple((
            char('<'),
            tag_name,
            many0(preceded(multispace0, attribute)),
            multispace0,
            opt(char('/')),
            char('>')
        )),
        |(_, name, attributes, _, slash, _)| Token::Start {
            name,
            attributes,
            self_closing: slash.is_some()
        }
    )(input)
}

/// Anything between the name and `>` of an end tag is ignored.
fn end_tag(input: &str) -> IResult<&str, Token<'_>> {
    map(
        delimited(tag("</"), tag_name, pair(take_till(|c: char| c == '>'), char('>'))),
        |name| Token::End { name }
    )(input)
}

/// `</` not followed by a name, as in `</ p>`, is dropped like a comment.
fn bogus_end_tag(input: &str) -> IResult<&str, Token<'_>> {
    map(
        tuple((tag("</"), take_till(|c: char| c == '>'), char('>'))),
        |_| Token::Comment
    )(input)
}

fn text(input: &str) -> IResult<&str, Token<'_>> {
    map(take_till1(|c: char| c == '<'), Token::Text)(input)
}

/// A `<` that does not open well formed markup is plain text, as in `1 < 2`.
fn lone_angle(input: &str) -> IResult<&str, Token<'_>> {
    map(recognize(char('<')), Token::Text)(input)
}

fn token(input: &str) -> IResult<&str, Token<'_>> {
    alt((comment, declaration, end_tag, bogus_end_tag, start_tag, text, lone_angle))(input)
}

/// Splits `doc` into spanned tokens covering every byte. Never fails:
/// markup that cannot be read is kept as text, and an element whose end
/// tag is missing simply runs to the end of the document.
pub fn tokenize(doc: &str) -> Vec<Spanned<'_>> {
    let mut tokens = Vec::new();
    let mut rest = doc;

    while !rest.is_empty() {
        let start = doc.len() - rest.len();
        let (next, parsed) = match token(rest) {
            Ok(parsed) => parsed,
            Err(_) => ("", Token::Text(rest))
        };

        let raw_text = match &parsed {
            Token::Start { name, self_closing: false, .. }
                if RAW_TEXT_ELEMENTS.contains(&name.as_str()) => Some(name.clone()),
            _ => None
        };
        tokens.push(Spanned { token: parsed, start, end: doc.len() - next.len() });
        rest = next;

        if let Some(name) = raw_text {
            let length = find_end_tag(rest, &name).unwrap_or(rest.len());
            if length > 0 {
                let at = doc.len() - rest.len();
                tokens.push(Spanned { token: Token::Text(&rest[..length]), start: at, end: at + length });
            }
            rest = &rest[length..];
        }
    }
    return tokens;
}

fn find_end_tag(haystack: &str, name: &str) -> Option<usize> {
    // ASCII lowercasing keeps byte offsets intact
    haystack.to_ascii_lowercase().find(&format!("</{}", name))
}

fn named_entity(input: &str) -> IResult<&str, char> {
    alt((
        value('&', tag("amp")),
        value('<', tag("lt")),
        value('>', tag("gt")),
        value('"', tag("quot")),
        value('\'', tag("apos")),
        value('\u{a0}', tag("nbsp"))
    ))(input)
}

fn numeric_entity(input: &str) -> IResult<&str, char> {
    map_opt(
        preceded(char('#'), alt((
            preceded(
                alt((char('x'), char('X'))),
                map_res(hex_digit1, |digits: &str| u32::from_str_radix(digits, 16))
            ),
            map_res(digit1, |digits: &str| digits.parse::<u32>())
        ))),
        std::char::from_u32
    )(input)
}

fn entity(input: &str) -> IResult<&str, char> {
    delimited(char('&'), alt((named_entity, numeric_entity)), char(';'))(input)
}

/// Replaces character references; anything unrecognised is left verbatim.
pub fn decode_entities(text: &str) -> String {
    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match entity(rest) {
            Ok((next, c)) => {
                decoded.push(c);
                rest = next;
            },
            Err(_) => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }
    decoded.push_str(rest);
    return decoded;
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Finds the element carrying `id` and its matching end tag.
/// Returns `None` when no element has that id. A container that is never
/// closed ends with the document; a self-closing slash on it is ignored.
pub fn locate_table(tokens: &[Spanned<'_>], id: &str) -> Option<TableRegion> {
    let (open, container) = tokens.iter().enumerate().find_map(|(index, spanned)| match &spanned.token {
        Token::Start { name, attributes, .. }
            if attributes.iter().any(|(key, val)| key == "id" && val == id) =>
                Some((index, name.as_str())),
        _ => None
    })?;

    let mut depth = 1usize;
    let mut body_close_offset = None;
    for (index, spanned) in tokens.iter().enumerate().skip(open + 1) {
        match &spanned.token {
            Token::Start { name, .. } if name == container => depth += 1,
            Token::End { name } if name == container => {
                depth -= 1;
                if depth == 0 {
                    return Some(TableRegion {
                        open,
                        close: index,
                        close_offset: spanned.start,
                        body_close_offset
                    });
                }
            },
            Token::End { name } if name == "tbody" && depth == 1 && body_close_offset.is_none() => {
                body_close_offset = Some(spanned.start);
            },
            _ => ()
        }
    }

    let close_offset = tokens.last().map_or(0, |last| last.end);
    return Some(TableRegion { open, close: tokens.len(), close_offset, body_close_offset });
}

fn close_cell(cell: &mut Option<String>, cells: &mut Vec<String>) {
    if let Some(text) = cell.take() {
        cells.push(normalize_whitespace(&text));
    }
}

/// Text of every `td` inside a `tr` of the region, in document order.
pub fn cells(tokens: &[Spanned<'_>], region: &TableRegion) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell: Option<String> = None;
    let mut in_row = false;

    for spanned in &tokens[region.open + 1..region.close] {
        match &spanned.token {
            Token::Start { name, self_closing, .. } if name == "tr" => {
                close_cell(&mut cell, &mut cells);
                in_row = !self_closing;
            },
            Token::End { name } if name == "tr" => {
                close_cell(&mut cell, &mut cells);
                in_row = false;
            },
            Token::Start { name, self_closing, .. } if name == "td" && in_row => {
                close_cell(&mut cell, &mut cells);
                cell = Some(String::new());
                if *self_closing {
                    close_cell(&mut cell, &mut cells);
                }
            },
            Token::End { name } if name == "td" => close_cell(&mut cell, &mut cells),
            Token::Text(text) => {
                if let Some(cell) = cell.as_mut() {
                    cell.push_str(&decode_entities(text));
                }
            },
            _ => ()
        }
    }
    close_cell(&mut cell, &mut cells);
    return cells;
}
