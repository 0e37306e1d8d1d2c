use super::Printer;
use crate::ast::Literal;
use crate::error::SyntaxError;

impl Printer {
    // =========================================================================
    // Literals
    // =========================================================================

    pub(super) fn emit_literal(&mut self, literal: &Literal) -> Result<(), SyntaxError> {
        match literal {
            Literal::Null => self.write("NULL"),
            Literal::Bool(true) => self.write("TRUE"),
            Literal::Bool(false) => self.write("FALSE"),
            Literal::Integer(value) => self.emit_integer(*value),
            Literal::Float(value) => self.emit_float(*value),
            Literal::String(value) => self.emit_string_literal(value),
            Literal::Array(elements) => {
                self.write("array(");
                self.emit_comma_list(elements)?;
                self.write_char(')');
            }
            Literal::Hash(pairs) => {
                self.write("array(");
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit(key)?;
                    self.write(" => ");
                    self.emit(value)?;
                }
                self.write_char(')');
            }
            Literal::Range {
                start,
                end,
                exclusive,
            } => {
                let last = if *exclusive { end.checked_sub(1) } else { Some(*end) };
                // Nothing lies below `PHP_INT_MIN`, so `a...PHP_INT_MIN` is empty.
                let Some(last) = last else {
                    self.write("array()");
                    return Ok(());
                };
                self.write("range(");
                self.emit_integer(*start);
                self.write(", ");
                self.emit_integer(last);
                self.write_char(')');
            }
            Literal::Regex { pattern, flags } => {
                let mut text = String::with_capacity(pattern.len() + flags.len() + 2);
                text.push('/');
                text.push_str(pattern);
                text.push('/');
                // Ruby `m` (dot matches newline) is PCRE `s`.
                for flag in flags.chars() {
                    match flag {
                        'i' | 'x' => text.push(flag),
                        'm' => text.push('s'),
                        _ => {}
                    }
                }
                self.emit_string_literal(&text);
            }
        }
        Ok(())
    }

    /// PHP lexes `-9223372036854775808` as negation of an overflowing float.
    fn emit_integer(&mut self, value: i64) {
        if value == i64::MIN {
            self.write("PHP_INT_MIN");
        } else {
            self.write(&value.to_string());
        }
    }

    fn emit_float(&mut self, value: f64) {
        if value.is_nan() {
            self.write("NAN");
        } else if value.is_infinite() {
            self.write(if value > 0.0 { "INF" } else { "-INF" });
        } else {
            // Debug keeps a `.0` on integral values so PHP reads a float back.
            self.write(&format!("{value:?}"));
        }
    }

    pub(super) fn emit_string_literal(&mut self, text: &str) {
        self.write_char('"');
        self.emit_escaped_string(text);
        self.write_char('"');
    }

    /// Escape for a PHP double-quoted string. `$` is escaped so PHP does not
    /// interpolate.
    fn emit_escaped_string(&mut self, text: &str) {
        for ch in text.chars() {
            match ch {
                '\\' => self.write("\\\\"),
                '"' => self.write("\\\""),
                '$' => self.write("\\$"),
                '\n' => self.write("\\n"),
                '\r' => self.write("\\r"),
                '\t' => self.write("\\t"),
                '\x0b' => self.write("\\v"),
                '\x1b' => self.write("\\e"),
                '\x0c' => self.write("\\f"),
                c if c.is_ascii_control() => self.write(&format!("\\x{:02X}", c as u32)),
                c => self.write_char(c),
            }
        }
    }
}
