//! The named predicates behind the `format` keyword.
//!
//! Every predicate is a plain function over the whole input; all the
//! recognised shapes are ASCII, so the checks run byte-wise and any
//! multibyte content simply fails the class tests (the email local part,
//! which admits arbitrary text, counts code points instead).

/// Look up a predicate by its `format` name.
pub fn by_name(name: &str) -> Option<fn(&str) -> bool> {
    Some(match name {
        "date" => is_date,
        "time" => is_time,
        "date-time" => is_date_time,
        "hostname" => is_hostname,
        "email" => is_email,
        "ipv4" => is_ipv4,
        "ipv6" => is_ipv6,
        "uuid" => is_uuid,
        "url" => is_url,
        "identifier" => is_identifier,
        _ => return None,
    })
}

fn digits(bytes: &[u8]) -> i64 {
    bytes
        .iter()
        .fold(0, |acc, byte| acc * 10 + i64::from(byte - b'0'))
}

fn is_leap(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i64, month: i64) -> i64 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if is_leap(year) {
                29
            } else {
                28
            }
        }
    }
}

/// `YYYY-MM-DD` prefix with a valid Gregorian date; returns the remainder.
fn parse_date(bytes: &[u8]) -> Option<&[u8]> {
    if bytes.len() < 10 {
        return None;
    }
    let (head, rest) = bytes.split_at(10);
    let shaped = head[0..4].iter().all(u8::is_ascii_digit)
        && head[4] == b'-'
        && head[5..7].iter().all(u8::is_ascii_digit)
        && head[7] == b'-'
        && head[8..10].iter().all(u8::is_ascii_digit);
    if !shaped {
        return None;
    }
    let year = digits(&head[0..4]);
    let month = digits(&head[5..7]);
    let day = digits(&head[8..10]);
    if !(1..=12).contains(&month) || day < 1 || day > days_in_month(year, month) {
        return None;
    }
    Some(rest)
}

/// `HH:MM:SS` prefix; returns the remainder.
fn parse_time(bytes: &[u8]) -> Option<&[u8]> {
    if bytes.len() < 8 {
        return None;
    }
    let (head, rest) = bytes.split_at(8);
    let shaped = head[0..2].iter().all(u8::is_ascii_digit)
        && head[2] == b':'
        && head[3..5].iter().all(u8::is_ascii_digit)
        && head[5] == b':'
        && head[6..8].iter().all(u8::is_ascii_digit);
    if !shaped {
        return None;
    }
    if digits(&head[0..2]) > 23 || digits(&head[3..5]) > 59 || digits(&head[6..8]) > 59 {
        return None;
    }
    Some(rest)
}

fn is_offset(bytes: &[u8]) -> bool {
    match bytes {
        [b'Z'] => true,
        [b'+' | b'-', h1, h2, b':', m1, m2] => {
            h1.is_ascii_digit() && h2.is_ascii_digit() && m1.is_ascii_digit() && m2.is_ascii_digit()
        }
        _ => false,
    }
}

fn time_with_offset(bytes: &[u8]) -> bool {
    match parse_time(bytes) {
        Some(rest) => rest.is_empty() || is_offset(rest),
        None => false,
    }
}

/// A valid Gregorian calendar date, `YYYY-MM-DD`.
pub fn is_date(text: &str) -> bool {
    matches!(parse_date(text.as_bytes()), Some(rest) if rest.is_empty())
}

/// `HH:MM:SS` with an optional `Z` / `+HH:MM` / `-HH:MM` suffix.
pub fn is_time(text: &str) -> bool {
    time_with_offset(text.as_bytes())
}

/// A date, a literal `T`, then a time.
pub fn is_date_time(text: &str) -> bool {
    match parse_date(text.as_bytes()) {
        Some([b'T', rest @ ..]) => time_with_offset(rest),
        _ => false,
    }
}

/// RFC 1123 host name: labels of 1-63 alphanumeric-or-hyphen characters,
/// 253 characters overall, no leading/trailing hyphen, no empty labels.
fn parse_hostname(bytes: &[u8]) -> Option<()> {
    if !bytes.first()?.is_ascii_alphanumeric() {
        return None;
    }
    let mut label = 0;
    let mut length = 0;
    for (at, &byte) in bytes.iter().enumerate() {
        if matches!(byte, b'-' | b'.') && matches!(bytes.get(at + 1), Some(b'-' | b'.')) {
            return None;
        }
        match byte {
            b'.' => label = 0,
            byte if byte == b'-' || byte.is_ascii_alphanumeric() => {
                if label == 63 || length >= 253 {
                    return None;
                }
                label += 1;
            }
            _ => return None,
        }
        length += 1;
    }
    if bytes.last() == Some(&b'-') {
        return None;
    }
    Some(())
}

pub fn is_hostname(text: &str) -> bool {
    parse_hostname(text.as_bytes()).is_some()
}

/// Local part of up to 63 code points that does not start with a space,
/// dot or `@` and does not end with a dot, then `@`, then a host name not
/// terminated by a dot.
pub fn is_email(text: &str) -> bool {
    let bytes = text.as_bytes();
    if matches!(bytes.first(), None | Some(b' ' | b'.' | b'@')) {
        return false;
    }
    let mut code_points = 0;
    let mut split = None;
    for (at, &byte) in bytes.iter().enumerate() {
        if byte == b'@' {
            split = Some(at);
            break;
        }
        if byte & 0xC0 != 0x80 {
            code_points += 1;
            if code_points > 63 {
                return false;
            }
        }
    }
    let Some(split) = split else {
        return false;
    };
    if bytes[split - 1] == b'.' {
        return false;
    }
    let domain = &bytes[split + 1..];
    parse_hostname(domain).is_some() && domain.last() != Some(&b'.')
}

fn parse_ipv4(bytes: &[u8]) -> bool {
    let mut parts = 0;
    for part in bytes.split(|&byte| byte == b'.') {
        parts += 1;
        if parts > 4
            || part.is_empty()
            || part.len() > 3
            || !part.iter().all(u8::is_ascii_digit)
            || digits(part) > 255
        {
            return false;
        }
    }
    parts == 4
}

/// Four dotted decimal octets, each 0-255.
pub fn is_ipv4(text: &str) -> bool {
    parse_ipv4(text.as_bytes())
}

/// Up to four hex digits followed by `:`; returns the offset past the `:`.
fn hextet_colon(bytes: &[u8], start: usize) -> Option<usize> {
    let mut at = start;
    while at - start < 4 && matches!(bytes.get(at), Some(byte) if byte.is_ascii_hexdigit()) {
        at += 1;
    }
    (bytes.get(at) == Some(&b':')).then_some(at + 1)
}

fn final_hextet(bytes: &[u8], required: bool) -> bool {
    if required && bytes.is_empty() {
        return false;
    }
    bytes.len() <= 4 && bytes.iter().all(u8::is_ascii_hexdigit)
}

/// 2-8 hextets with at most one `::` abbreviation and an optional
/// embedded IPv4 tail in the last 32 bits.
pub fn is_ipv6(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut colons = 0;
    let mut abbreviations = 0;
    let mut end = 0;
    while colons < 7 {
        let Some(next) = hextet_colon(bytes, end) else {
            break;
        };
        if colons > 0 && next == end + 1 {
            abbreviations += 1;
            if abbreviations > 1 {
                return false;
            }
        }
        colons += 1;
        end = next;
    }
    // A single leading colon only opens an abbreviation.
    if bytes.first() == Some(&b':') && bytes.get(1) != Some(&b':') {
        return false;
    }
    let rest = &bytes[end..];
    if colons == 6 && abbreviations == 0 {
        return parse_ipv4(rest);
    }
    if colons >= 5 && abbreviations == 1 {
        return final_hextet(rest, false);
    }
    if colons == 7 && abbreviations == 0 {
        return final_hextet(rest, true);
    }
    abbreviations == 1 && (final_hextet(rest, false) || parse_ipv4(rest))
}

/// `8-4-4-4-12` hex digits.
pub fn is_uuid(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    bytes.iter().enumerate().all(|(at, &byte)| match at {
        8 | 13 | 18 | 23 => byte == b'-',
        _ => byte.is_ascii_hexdigit(),
    })
}

fn is_url_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || b"-._~:/?#[]@!$&'()*+,;%=".contains(&byte)
}

/// `http://` or `https://` with a non-empty URL-safe body, 2048 characters
/// at most.
pub fn is_url(text: &str) -> bool {
    let rest = text
        .strip_prefix("http://")
        .or_else(|| text.strip_prefix("https://"));
    match rest {
        Some(rest) => {
            !rest.is_empty() && text.len() <= 2048 && text.bytes().all(is_url_byte)
        }
        None => false,
    }
}

/// Non-empty, not digit-initial, alphanumeric or underscore throughout.
pub fn is_identifier(text: &str) -> bool {
    let bytes = text.as_bytes();
    match bytes.first() {
        None | Some(b'0'..=b'9') => false,
        Some(_) => bytes
            .iter()
            .all(|byte| byte.is_ascii_alphanumeric() || *byte == b'_'),
    }
}
