use crate::Value;
use std::fmt;
use std::fmt::Display;
use std::fs::File;
use std::io;
use std::io::Write as _;
use std::path::Path;

/// How non-ASCII text is emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    /// Multibyte sequences pass through untouched.
    #[default]
    Utf8,
    /// Every non-ASCII code point is re-encoded as a `\uXXXX` escape.
    /// Code points beyond the BMP degrade to U+FFFD, since the escape
    /// form carries four hex digits.
    Ascii,
}

/// Serialisation builder returned by [`Value::serialize`].
///
/// Implements [`Display`] and [`ToString`]; chain [`indent`][Self::indent]
/// and [`ascii`][Self::ascii] to configure the output.
#[derive(Debug, Clone)]
pub struct Serialize<'a> {
    value: &'a Value,
    config: Config,
}

#[derive(Debug, Clone, Default)]
struct Config {
    indent: usize,
    encoding: Encoding,
}

impl<'a> Serialize<'a> {
    /// Spaces per nesting level, clamped to 0..=8. Zero means compact
    /// output with no whitespace at all; anything else adds newlines after
    /// every structural boundary and a trailing newline.
    pub fn indent(mut self, spaces: usize) -> Self {
        self.config.indent = spaces.min(8);
        self
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.config.encoding = encoding;
        self
    }

    /// Shorthand for `encoding(Encoding::Ascii)`.
    pub fn ascii(self) -> Self {
        self.encoding(Encoding::Ascii)
    }
}

struct State<'config, 'fmt, 'fmt2> {
    config: &'config Config,
    level: usize,
    output: &'fmt mut fmt::Formatter<'fmt2>,
}

impl State<'_, '_, '_> {
    fn write(&mut self, text: &str) -> fmt::Result {
        self.output.write_str(text)
    }

    fn new_line(&mut self) -> fmt::Result {
        if self.config.indent > 0 {
            self.write("\n")?;
            for _ in 0..self.level * self.config.indent {
                self.write(" ")?;
            }
        }
        Ok(())
    }

    fn value(&mut self, value: &Value) -> fmt::Result {
        match value {
            Value::Object(members) => self.container("{", "}", members.len(), |state, index| {
                let (key, value) = &members[index];
                state.string(key)?;
                state.write(if state.config.indent == 0 { ":" } else { ": " })?;
                state.value(value)
            }),
            Value::Array(elements) => self.container("[", "]", elements.len(), |state, index| {
                state.value(&elements[index])
            }),
            Value::String(text) => self.string(text),
            Value::Integer(n) => self.integer(n.0),
            Value::Real(n) => self.real(n.0),
            Value::Boolean(true) => self.write("true"),
            Value::Boolean(false) => self.write("false"),
            Value::Null => self.write("null"),
        }
    }

    fn container(
        &mut self,
        open: &str,
        close: &str,
        len: usize,
        serialize_one: impl Fn(&mut Self, usize) -> fmt::Result,
    ) -> fmt::Result {
        self.write(open)?;
        if len > 0 {
            self.level += 1;
            for index in 0..len {
                self.new_line()?;
                serialize_one(self, index)?;
                if index + 1 < len {
                    self.write(",")?;
                }
            }
            self.level -= 1;
            self.new_line()?;
        }
        self.write(close)
    }

    fn integer(&mut self, number: f64) -> fmt::Result {
        if number.is_finite() {
            write!(self.output, "{number:.0}")
        } else {
            self.write("null")
        }
    }

    fn real(&mut self, number: f64) -> fmt::Result {
        if !number.is_finite() {
            return self.write("null");
        }
        let text = number.to_string();
        self.write(&text)?;
        // The shortest representation of a whole number has no point or
        // exponent; restore one so a reparse keeps the real tag.
        if !text.contains(['.', 'e', 'E']) {
            self.write(".0")?;
        }
        Ok(())
    }

    fn string(&mut self, text: &str) -> fmt::Result {
        self.write("\"")?;
        let ascii = self.config.encoding == Encoding::Ascii;
        let mut rest = text;
        while let Some(split) =
            rest.find(|c: char| c < ' ' || c == '"' || c == '\\' || (ascii && !c.is_ascii()))
        {
            let (plain, tail) = rest.split_at(split);
            self.write(plain)?;
            let Some(c) = tail.chars().next() else { break };
            match c {
                '\x08' => self.write("\\b")?,
                '\x0C' => self.write("\\f")?,
                '\n' => self.write("\\n")?,
                '\r' => self.write("\\r")?,
                '\t' => self.write("\\t")?,
                '"' => self.write("\\\"")?,
                '\\' => self.write("\\\\")?,
                c => {
                    let code = if (c as u32) <= 0xFFFF { c as u32 } else { 0xFFFD };
                    write!(self.output, "\\u{code:04x}")?;
                }
            }
            rest = &tail[c.len_utf8()..];
        }
        self.write(rest)?;
        self.write("\"")
    }
}

impl Display for Serialize<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut state = State {
            config: &self.config,
            level: 0,
            output: f,
        };
        state.value(self.value)?;
        if self.config.indent > 0 {
            state.write("\n")?;
        }
        Ok(())
    }
}

/// Serialise with the default configuration: compact, UTF-8.
impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.serialize().fmt(f)
    }
}

impl Value {
    /// Returns a configurable serialisation builder.
    pub fn serialize(&self) -> Serialize<'_> {
        Serialize {
            value: self,
            config: Config::default(),
        }
    }

    /// Write the serialised tree to a stream.
    pub fn write(&self, output: &mut dyn io::Write, indent: usize) -> io::Result<()> {
        write!(output, "{}", self.serialize().indent(indent))
    }

    /// Write the compact form followed by a newline.
    pub fn write_line(&self, output: &mut dyn io::Write) -> io::Result<()> {
        writeln!(output, "{self}")
    }

    pub fn write_file(&self, path: impl AsRef<Path>, indent: usize) -> io::Result<()> {
        let mut file = File::create(path)?;
        self.write(&mut file, indent)
    }
}

/// Returns a quoted, escaped copy of `text`, as it would appear inside a
/// serialised document.
pub fn quote(text: &str) -> String {
    quote_with(text, Encoding::Utf8)
}

pub fn quote_with(text: &str, encoding: Encoding) -> String {
    struct Quoted<'a> {
        text: &'a str,
        config: Config,
    }
    impl Display for Quoted<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            State {
                config: &self.config,
                level: 0,
                output: f,
            }
            .string(self.text)
        }
    }
    Quoted {
        text,
        config: Config {
            indent: 0,
            encoding,
        },
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;
    use pretty_assertions::assert_eq;

    fn sample() -> Value {
        let mut doc = Value::object();
        doc.push_entry("a", Value::integer(1.0)).unwrap();
        let mut list = Value::array();
        list.push(Value::boolean(true)).unwrap();
        list.push(Value::null()).unwrap();
        list.push(Value::string("x")).unwrap();
        doc.push_entry("b", list).unwrap();
        doc
    }

    #[test]
    fn compact_output() {
        assert_eq!(sample().to_string(), r#"{"a":1,"b":[true,null,"x"]}"#);
    }

    #[test]
    fn indented_output() {
        let expected = expect![[r#"
            {
              "a": 1,
              "b": [
                true,
                null,
                "x"
              ]
            }
        "#]];
        expected.assert_eq(&sample().serialize().indent(2).to_string());
    }

    #[test]
    fn indent_is_clamped() {
        let one = Value::array();
        assert_eq!(
            one.serialize().indent(99).to_string(),
            one.serialize().indent(8).to_string()
        );
    }

    #[test]
    fn empty_iterables_stay_inline() {
        let mut doc = Value::object();
        doc.push_entry("o", Value::object()).unwrap();
        doc.push_entry("a", Value::array()).unwrap();
        let expected = expect![[r#"
            {
              "o": {},
              "a": []
            }
        "#]];
        expected.assert_eq(&doc.serialize().indent(2).to_string());
    }

    #[test]
    fn integers_and_reals_round_trip_their_tags() {
        assert_eq!(Value::integer(3.0).to_string(), "3");
        assert_eq!(Value::integer(-7.0).to_string(), "-7");
        assert_eq!(Value::real(3.0).to_string(), "3.0");
        assert_eq!(Value::real(1.5).to_string(), "1.5");
        assert_eq!(Value::real(-0.25).to_string(), "-0.25");
    }

    #[test]
    fn non_finite_numbers_are_never_emitted() {
        assert_eq!(Value::real(f64::NAN).to_string(), "null");
        assert_eq!(Value::real(f64::INFINITY).to_string(), "null");
    }

    #[test]
    fn control_characters_are_always_escaped() {
        let node = Value::string("a\tb\nc\u{1}");
        assert_eq!(node.to_string(), r#""a\tb\nc\u0001""#);
    }

    #[test]
    fn ascii_mode_escapes_multibyte() {
        let node = Value::string("caf\u{e9}");
        assert_eq!(node.to_string(), "\"caf\u{e9}\"");
        assert_eq!(node.serialize().ascii().to_string(), r#""caf\u00e9""#);
    }

    #[test]
    fn ascii_mode_replaces_astral_code_points() {
        let node = Value::string("\u{1F600}");
        assert_eq!(node.serialize().ascii().to_string(), r#""\ufffd""#);
    }

    #[test]
    fn quotes_and_backslashes() {
        assert_eq!(quote(r#"say "hi"\now"#), r#""say \"hi\"\\now""#);
    }

    #[test]
    fn keys_are_escaped_like_scalars() {
        let mut doc = Value::object();
        doc.push_entry("a\"b", Value::null()).unwrap();
        assert_eq!(doc.to_string(), r#"{"a\"b":null}"#);
    }
}
