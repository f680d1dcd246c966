// Tagged-annotation wire format between classification and verbalization.
//
// An annotation is rendered as `class { field: "value" field: "value" }`,
// fields separated by single spaces, values double-quoted. Field order is
// significant: the verbalizer transducer only accepts fields in the order
// its grammar emits them, so `Annotation` preserves insertion order instead
// of sorting or hashing.

/// Error type for annotation string parsing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("empty annotation string")]
    Empty,
    #[error("expected '{{' after class name, found {found:?}")]
    MissingOpenBrace { found: String },
    #[error("missing closing '}}'")]
    MissingCloseBrace,
    #[error("expected ':' after field name {name:?}")]
    MissingColon { name: String },
    #[error("expected opening '\"' for field {name:?}")]
    MissingQuote { name: String },
    #[error("unterminated value for field {name:?}")]
    UnterminatedValue { name: String },
    #[error("trailing input after '}}': {rest:?}")]
    TrailingInput { rest: String },
}

/// A parsed tagged annotation: a semiotic class name plus an ordered list
/// of `(field, value)` pairs.
///
/// Values have no escaping: a double quote inside a value cannot be
/// represented in the wire format, so parsing stops at the first `"`.
/// Lexicon data containing quotes is therefore unsupported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    class: String,
    fields: Vec<(String, String)>,
}

impl Annotation {
    /// Create an empty annotation for the given semiotic class.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            fields: Vec::new(),
        }
    }

    /// Semiotic class name (e.g. "money").
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Append a field, preserving order. Repeated field names are kept as
    /// separate entries.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Builder-style variant of [`push`](Self::push).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// Value of the first field with the given name, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Number of fields with the given name.
    pub fn count(&self, name: &str) -> usize {
        self.fields.iter().filter(|(n, _)| n == name).count()
    }

    /// All fields in emission order.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Render the annotation in wire format:
    /// `class { name: "value" name: "value" }`.
    pub fn format(&self) -> String {
        let mut out = String::with_capacity(self.class.len() + 16 * self.fields.len() + 4);
        out.push_str(&self.class);
        out.push_str(" {");
        for (name, value) in &self.fields {
            out.push(' ');
            out.push_str(name);
            out.push_str(": \"");
            out.push_str(value);
            out.push('"');
        }
        out.push_str(" }");
        out
    }

    /// Parse an annotation from wire format.
    pub fn parse(input: &str) -> Result<Self, AnnotationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AnnotationError::Empty);
        }

        let (class, rest) = match input.find(' ') {
            Some(pos) => (&input[..pos], input[pos..].trim_start()),
            None => (input, ""),
        };
        let rest = match rest.strip_prefix('{') {
            Some(r) => r,
            None => {
                return Err(AnnotationError::MissingOpenBrace {
                    found: rest.chars().take(8).collect(),
                });
            }
        };

        let mut annotation = Annotation::new(class);
        let mut rest = rest.trim_start();
        loop {
            if let Some(after) = rest.strip_prefix('}') {
                let after = after.trim();
                if !after.is_empty() {
                    return Err(AnnotationError::TrailingInput {
                        rest: after.to_string(),
                    });
                }
                return Ok(annotation);
            }
            if rest.is_empty() {
                return Err(AnnotationError::MissingCloseBrace);
            }

            let name_end = rest
                .find(|c: char| c == ':' || c.is_whitespace())
                .unwrap_or(rest.len());
            let name = rest[..name_end].to_string();
            rest = rest[name_end..].trim_start();
            rest = match rest.strip_prefix(':') {
                Some(r) => r.trim_start(),
                None => return Err(AnnotationError::MissingColon { name }),
            };
            rest = match rest.strip_prefix('"') {
                Some(r) => r,
                None => return Err(AnnotationError::MissingQuote { name }),
            };
            let value_end = match rest.find('"') {
                Some(pos) => pos,
                None => return Err(AnnotationError::UnterminatedValue { name }),
            };
            annotation.push(name, &rest[..value_end]);
            rest = rest[value_end + 1..].trim_start();
        }
    }
}

impl std::fmt::Display for Annotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format())
    }
}
