//! Per-character parser for `key = value` configuration lines.
//!
//! The parser is a finite-state machine driven over one logical line at a
//! time. Whitespace outside string literals is absorbed by a dedicated
//! `Skip` state that remembers which state to resume; the set of characters
//! accepted after the gap depends on that remembered state (a space inside
//! a key ends the key, a space inside a number ends the number).

use super::error::ParseError;
use super::value::{ConfigValue, ValueKind};

const MAX_KEY_LEN: usize = 127;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Leading whitespace, before the first key character.
    Start,
    /// Accumulating key characters.
    KeyOnly,
    /// After `=`, expecting the first value.
    StartValues,
    /// Inside an integer literal.
    ValueInt,
    /// Inside a real literal (a `.` has been seen).
    ValueReal,
    /// Inside a string literal.
    ValueString,
    /// After the closing quote of a string.
    EndString,
    /// Expecting the next array element (after `[` or `,`).
    ValueArray,
    /// After `]`; only whitespace, a comment or end-of-line may follow.
    ArrayEnd,
    /// Absorbing whitespace; `resume` holds the state to return to.
    Skip,
}

/// What the driver should do after feeding one character.
enum Flow {
    Continue,
    /// An unescaped `#` ended the line; the rest is a comment.
    Comment,
}

/// Typed accumulator for the elements of the current value list. The first
/// element fixes the variant; a later element of another base type is a
/// mixed-type error.
#[derive(Debug)]
enum Values {
    Empty,
    Int(Vec<i64>),
    Real(Vec<f64>),
    Str(Vec<String>),
}

#[derive(Debug)]
struct LineFsm {
    state: State,
    /// State that `Skip` resumes once non-whitespace input returns.
    resume: State,
    key: String,
    /// Scratch buffer for the lexeme currently being accumulated; cleared
    /// at every element boundary.
    scratch: String,
    values: Values,
    /// Whether the value list was opened with `[`.
    bracketed: bool,
    /// A backslash was seen inside a string literal.
    escaped: bool,
}

/// Parses one logical line.
///
/// Returns `Ok(Some((key, value)))` for a statement line, `Ok(None)` for a
/// blank or comment-only line, and a [`ParseError`] naming the offending
/// fragment otherwise. A failed line never yields a partial value.
pub fn parse_line(line: &str) -> Result<Option<(String, ConfigValue)>, ParseError> {
    let mut fsm = LineFsm::new();
    for c in line.chars() {
        match fsm.step(c)? {
            Flow::Continue => {}
            Flow::Comment => break,
        }
    }
    fsm.finish()
}

impl LineFsm {
    fn new() -> Self {
        Self {
            state: State::Start,
            resume: State::Start,
            key: String::new(),
            scratch: String::new(),
            values: Values::Empty,
            bracketed: false,
            escaped: false,
        }
    }

    fn step(&mut self, c: char) -> Result<Flow, ParseError> {
        match self.state {
            State::Start => match c {
                ' ' | '\t' => Ok(Flow::Continue),
                '#' => Ok(Flow::Comment),
                c if is_key_char(c) => {
                    self.key.push(c);
                    self.state = State::KeyOnly;
                    Ok(Flow::Continue)
                }
                c => Err(ParseError::BadKey(c.to_string())),
            },

            State::KeyOnly => match c {
                c if is_key_char(c) => {
                    self.key.push(c);
                    if self.key.len() > MAX_KEY_LEN {
                        return Err(ParseError::BadKey(self.key.clone()));
                    }
                    Ok(Flow::Continue)
                }
                '=' => {
                    self.state = State::StartValues;
                    Ok(Flow::Continue)
                }
                ' ' | '\t' => {
                    self.skip_from(State::KeyOnly);
                    Ok(Flow::Continue)
                }
                c => Err(ParseError::BadKey(self.key_fragment(c))),
            },

            State::StartValues | State::ValueArray => self.enter_value(c),

            State::ValueInt => match c {
                '0'..='9' => {
                    self.scratch.push(c);
                    Ok(Flow::Continue)
                }
                '.' => {
                    self.scratch.push(c);
                    self.state = State::ValueReal;
                    Ok(Flow::Continue)
                }
                ' ' | '\t' => {
                    self.skip_from(State::ValueInt);
                    Ok(Flow::Continue)
                }
                c => self.after_element(c, ValueKind::Integer),
            },

            State::ValueReal => match c {
                '0'..='9' => {
                    self.scratch.push(c);
                    Ok(Flow::Continue)
                }
                // A second '.' never forms a valid literal.
                '.' => Err(ParseError::BadValue(self.value_fragment(c))),
                ' ' | '\t' => {
                    self.skip_from(State::ValueReal);
                    Ok(Flow::Continue)
                }
                c => self.after_element(c, ValueKind::Real),
            },

            State::ValueString => {
                if self.escaped {
                    self.escaped = false;
                    self.scratch.push(c);
                } else if c == '\\' {
                    self.escaped = true;
                } else if c == '"' {
                    self.state = State::EndString;
                } else {
                    self.scratch.push(c);
                }
                Ok(Flow::Continue)
            }

            State::EndString => match c {
                ' ' | '\t' => {
                    self.skip_from(State::EndString);
                    Ok(Flow::Continue)
                }
                c => self.after_element(c, ValueKind::Str),
            },

            State::ArrayEnd => match c {
                ' ' | '\t' => {
                    self.skip_from(State::ArrayEnd);
                    Ok(Flow::Continue)
                }
                '#' => Ok(Flow::Comment),
                c => Err(ParseError::BadValue(c.to_string())),
            },

            State::Skip => {
                if c == ' ' || c == '\t' {
                    return Ok(Flow::Continue);
                }
                match self.resume {
                    // A gap inside a key only admits '='; anything else
                    // means the '=' never arrived.
                    State::KeyOnly => match c {
                        '=' => {
                            self.state = State::StartValues;
                            Ok(Flow::Continue)
                        }
                        _ => Err(ParseError::MissingEqSign(self.key.clone())),
                    },
                    // A gap after a numeric lexeme closes it; a digit here
                    // would silently glue two numbers together.
                    State::ValueInt => self.after_element(c, ValueKind::Integer),
                    State::ValueReal => self.after_element(c, ValueKind::Real),
                    resume => {
                        self.state = resume;
                        self.step(c)
                    }
                }
            }
        }
    }

    /// Handles a character where a value is expected (`StartValues` for the
    /// first value, `ValueArray` for subsequent elements).
    fn enter_value(&mut self, c: char) -> Result<Flow, ParseError> {
        match c {
            ' ' | '\t' => {
                self.skip_from(self.state);
                Ok(Flow::Continue)
            }
            '0'..='9' | '-' => {
                self.scratch.push(c);
                self.state = State::ValueInt;
                Ok(Flow::Continue)
            }
            '"' => {
                self.state = State::ValueString;
                Ok(Flow::Continue)
            }
            '[' if self.state == State::StartValues => {
                self.bracketed = true;
                self.state = State::ValueArray;
                Ok(Flow::Continue)
            }
            c => Err(ParseError::BadValue(self.value_fragment(c))),
        }
    }

    /// Handles the character that follows a closed element: a separator,
    /// an array terminator, or a trailing comment.
    fn after_element(&mut self, c: char, kind: ValueKind) -> Result<Flow, ParseError> {
        match c {
            ',' => {
                self.finish_element(kind)?;
                self.state = State::ValueArray;
                Ok(Flow::Continue)
            }
            ']' if self.bracketed => {
                self.finish_element(kind)?;
                self.state = State::ArrayEnd;
                Ok(Flow::Continue)
            }
            '#' if !self.bracketed => {
                self.finish_element(kind)?;
                self.state = State::ArrayEnd;
                Ok(Flow::Comment)
            }
            c => Err(ParseError::BadValue(self.value_fragment(c))),
        }
    }

    /// Converts the scratch lexeme into a typed element and appends it to
    /// the accumulator, clearing the scratch for the next element.
    fn finish_element(&mut self, kind: ValueKind) -> Result<(), ParseError> {
        match kind {
            ValueKind::Integer => {
                let parsed = self
                    .scratch
                    .parse::<i64>()
                    .map_err(|_| ParseError::BadValue(self.scratch.clone()))?;
                match &mut self.values {
                    Values::Empty => self.values = Values::Int(vec![parsed]),
                    Values::Int(items) => items.push(parsed),
                    _ => return Err(ParseError::BadValue(self.scratch.clone())),
                }
            }
            ValueKind::Real => {
                if self.scratch.ends_with('.') {
                    return Err(ParseError::BadValue(self.scratch.clone()));
                }
                let parsed = self
                    .scratch
                    .parse::<f64>()
                    .map_err(|_| ParseError::BadValue(self.scratch.clone()))?;
                match &mut self.values {
                    Values::Empty => self.values = Values::Real(vec![parsed]),
                    Values::Real(items) => items.push(parsed),
                    _ => return Err(ParseError::BadValue(self.scratch.clone())),
                }
            }
            ValueKind::Str => {
                let text = std::mem::take(&mut self.scratch);
                match &mut self.values {
                    Values::Empty => self.values = Values::Str(vec![text]),
                    Values::Str(items) => items.push(text),
                    _ => return Err(ParseError::BadValue(text)),
                }
            }
        }
        self.scratch.clear();
        Ok(())
    }

    /// Resolves the line once end-of-input is reached.
    fn finish(mut self) -> Result<Option<(String, ConfigValue)>, ParseError> {
        // End-of-line while skipping resolves exactly like end-of-line in
        // the remembered state.
        if self.state == State::Skip {
            self.state = self.resume;
        }

        match self.state {
            State::Start => Ok(None),
            State::KeyOnly => Err(ParseError::MissingEqSign(self.key)),
            State::StartValues => Err(ParseError::UndefinedValue(self.key)),
            // Unterminated array or a trailing comma promising an element.
            State::ValueArray => Err(ParseError::UndefinedValue(self.unfinished_fragment())),
            State::ValueString => Err(ParseError::UndefinedValue(self.scratch)),
            State::ValueInt => {
                if self.bracketed {
                    return Err(ParseError::UndefinedValue(self.unfinished_fragment()));
                }
                self.finish_element(ValueKind::Integer)?;
                self.build().map(Some)
            }
            State::ValueReal => {
                if self.scratch.ends_with('.') {
                    return Err(ParseError::UndefinedValue(self.scratch));
                }
                if self.bracketed {
                    return Err(ParseError::UndefinedValue(self.unfinished_fragment()));
                }
                self.finish_element(ValueKind::Real)?;
                self.build().map(Some)
            }
            State::EndString => {
                if self.bracketed {
                    return Err(ParseError::UndefinedValue(self.unfinished_fragment()));
                }
                self.finish_element(ValueKind::Str)?;
                self.build().map(Some)
            }
            State::ArrayEnd => self.build().map(Some),
            State::Skip => unreachable!("skip state resolved above"),
        }
    }

    /// Assembles the final `ConfigValue`: a bare single value stays scalar,
    /// anything bracketed or comma-separated becomes an array.
    fn build(self) -> Result<(String, ConfigValue), ParseError> {
        let value = match self.values {
            Values::Empty => return Err(ParseError::UndefinedValue(self.key)),
            Values::Int(mut items) => {
                if !self.bracketed && items.len() == 1 {
                    ConfigValue::Integer(items.pop().unwrap_or_default())
                } else {
                    ConfigValue::IntegerArray(items)
                }
            }
            Values::Real(mut items) => {
                if !self.bracketed && items.len() == 1 {
                    ConfigValue::Real(items.pop().unwrap_or_default())
                } else {
                    ConfigValue::RealArray(items)
                }
            }
            Values::Str(mut items) => {
                if !self.bracketed && items.len() == 1 {
                    ConfigValue::Str(items.pop().unwrap_or_default())
                } else {
                    ConfigValue::StrArray(items)
                }
            }
        };
        Ok((self.key, value))
    }

    fn skip_from(&mut self, resume: State) {
        self.resume = resume;
        self.state = State::Skip;
    }

    fn key_fragment(&self, c: char) -> String {
        format!("{}{c}", self.key)
    }

    fn value_fragment(&self, c: char) -> String {
        if self.scratch.is_empty() {
            c.to_string()
        } else {
            format!("{}{c}", self.scratch)
        }
    }

    fn unfinished_fragment(&self) -> String {
        if self.scratch.is_empty() {
            self.key.clone()
        } else {
            self.scratch.clone()
        }
    }
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}
