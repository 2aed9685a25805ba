use crate::cursor::Cursor;
use crate::limit::LimitTracker;
use arbor_core::Value;

pub(crate) struct RawError {
    pub(crate) offset: usize,
    pub(crate) message: &'static str,
}

impl RawError {
    fn new(offset: usize, message: &'static str) -> Self {
        Self { offset, message }
    }
}

type ParseOutcome = Result<Value, RawError>;

pub(crate) fn document(input: &str, mut limit: LimitTracker) -> ParseOutcome {
    let mut cursor = Cursor::new(input);
    let root = value(&mut cursor, &mut limit)?;
    cursor.skip_whitespace();
    if !cursor.at_end() {
        return Err(RawError::new(
            cursor.offset(),
            "unexpected trailing characters",
        ));
    }
    Ok(root)
}

fn value(cursor: &mut Cursor<'_>, limit: &mut LimitTracker) -> ParseOutcome {
    cursor.skip_whitespace();
    match cursor.peek() {
        Some(b'{') => object(cursor, limit),
        Some(b'[') => array(cursor, limit),
        Some(b'"') => string(cursor).map(Value::String),
        Some(_) => scalar(cursor),
        None => Err(RawError::new(cursor.offset(), "unexpected end of input")),
    }
}

fn object(cursor: &mut Cursor<'_>, limit: &mut LimitTracker) -> ParseOutcome {
    let open = cursor.offset();
    cursor.bump();
    limit.consume();
    if limit.limited() {
        return Err(RawError::new(open, "recursion limit exceeded"));
    }
    let mut members = Vec::new();
    cursor.skip_whitespace();
    if cursor.eat(b'}') {
        limit.release();
        return Ok(Value::Object(members));
    }
    loop {
        cursor.skip_whitespace();
        if cursor.peek() != Some(b'"') {
            return Err(RawError::new(cursor.offset(), "expected a member key"));
        }
        let key = string(cursor)?;
        cursor.skip_whitespace();
        if !cursor.eat(b':') {
            return Err(RawError::new(
                cursor.offset(),
                "expected ':' after member key",
            ));
        }
        let member = value(cursor, limit)?;
        members.push((key, member));
        cursor.skip_whitespace();
        if cursor.eat(b',') {
            continue;
        }
        if cursor.eat(b'}') {
            limit.release();
            return Ok(Value::Object(members));
        }
        return Err(RawError::new(cursor.offset(), "expected ',' or '}'"));
    }
}

fn array(cursor: &mut Cursor<'_>, limit: &mut LimitTracker) -> ParseOutcome {
    let open = cursor.offset();
    cursor.bump();
    limit.consume();
    if limit.limited() {
        return Err(RawError::new(open, "recursion limit exceeded"));
    }
    let mut elements = Vec::new();
    cursor.skip_whitespace();
    if cursor.eat(b']') {
        limit.release();
        return Ok(Value::Array(elements));
    }
    loop {
        elements.push(value(cursor, limit)?);
        cursor.skip_whitespace();
        if cursor.eat(b',') {
            continue;
        }
        if cursor.eat(b']') {
            limit.release();
            return Ok(Value::Array(elements));
        }
        return Err(RawError::new(cursor.offset(), "expected ',' or ']'"));
    }
}

/// `true`, `false`, `null` or a number; anything else the scan picks up is
/// rejected at its first byte.
fn scalar(cursor: &mut Cursor<'_>) -> ParseOutcome {
    let start = cursor.offset();
    let lexeme = cursor.take_unquoted();
    match lexeme {
        "" => Err(RawError::new(start, "unexpected character")),
        "true" => Ok(Value::Boolean(true)),
        "false" => Ok(Value::Boolean(false)),
        "null" => Ok(Value::Null),
        _ => number(lexeme).ok_or(RawError::new(start, "invalid literal")),
    }
}

/// The RFC 8259 number grammar: `-? (0 | [1-9][0-9]*) frac? exp?`.
/// Returns a real when the lexeme has a fraction or an exponent, an integer
/// otherwise; non-finite conversions are rejected.
fn number(lexeme: &str) -> Option<Value> {
    let bytes = lexeme.as_bytes();
    let mut at = 0;
    if bytes.get(at) == Some(&b'-') {
        at += 1;
    }
    match bytes.get(at) {
        Some(b'0') => at += 1,
        Some(b'1'..=b'9') => {
            while matches!(bytes.get(at), Some(b'0'..=b'9')) {
                at += 1;
            }
        }
        _ => return None,
    }
    let mut real = false;
    if bytes.get(at) == Some(&b'.') {
        at += 1;
        real = true;
        if !matches!(bytes.get(at), Some(b'0'..=b'9')) {
            return None;
        }
        while matches!(bytes.get(at), Some(b'0'..=b'9')) {
            at += 1;
        }
    }
    if matches!(bytes.get(at), Some(b'e' | b'E')) {
        at += 1;
        real = true;
        if matches!(bytes.get(at), Some(b'+' | b'-')) {
            at += 1;
        }
        if !matches!(bytes.get(at), Some(b'0'..=b'9')) {
            return None;
        }
        while matches!(bytes.get(at), Some(b'0'..=b'9')) {
            at += 1;
        }
    }
    if at != bytes.len() {
        return None;
    }
    let parsed: f64 = lexeme.parse().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    Some(if real {
        Value::real(parsed)
    } else {
        Value::integer(parsed)
    })
}

/// A quoted string, opening quote still pending. Decodes the eight
/// shorthand escapes and `\uXXXX`; raw control bytes are errors.
fn string(cursor: &mut Cursor<'_>) -> Result<String, RawError> {
    cursor.bump();
    let mut text = String::new();
    let mut run = cursor.offset();
    loop {
        match cursor.peek() {
            None => return Err(RawError::new(cursor.offset(), "unterminated string")),
            Some(b'"') => {
                text.push_str(cursor.slice_from(run));
                cursor.bump();
                return Ok(text);
            }
            Some(b'\\') => {
                text.push_str(cursor.slice_from(run));
                let escape = cursor.offset();
                cursor.bump();
                match cursor.take() {
                    Some(b'"') => text.push('"'),
                    Some(b'\\') => text.push('\\'),
                    Some(b'/') => text.push('/'),
                    Some(b'b') => text.push('\u{8}'),
                    Some(b'f') => text.push('\u{c}'),
                    Some(b'n') => text.push('\n'),
                    Some(b'r') => text.push('\r'),
                    Some(b't') => text.push('\t'),
                    Some(b'u') => text.push(code_point(cursor, escape)?),
                    _ => return Err(RawError::new(escape, "invalid escape sequence")),
                }
                run = cursor.offset();
            }
            Some(byte) if byte < 0x20 => {
                return Err(RawError::new(cursor.offset(), "control character in string"))
            }
            Some(_) => {
                cursor.bump();
            }
        }
    }
}

/// Four hex digits after `\u`. Escapes only reach the BMP; a code point
/// without a scalar value (an unpaired surrogate) becomes U+FFFD.
fn code_point(cursor: &mut Cursor<'_>, escape: usize) -> Result<char, RawError> {
    let mut code: u32 = 0;
    for _ in 0..4 {
        let digit = match cursor.take() {
            Some(byte) if byte.is_ascii_hexdigit() => (byte as char).to_digit(16),
            _ => None,
        };
        match digit {
            Some(digit) => code = code * 16 + digit,
            None => return Err(RawError::new(escape, "invalid unicode escape")),
        }
    }
    Ok(char::from_u32(code).unwrap_or('\u{fffd}'))
}
