//! Named parameter sources.
//!
//! Parameters are addressed by a path (the configuration name, e.g. `QuadControlParams`)
//! and a key (e.g. `kpPosXY`). Names are compared ignoring ASCII case.

use core::{fmt, str::Lines};
use nalgebra::Vector3;

/// Sections may inherit from each other up to this depth.
const MAX_INHERITANCE_DEPTH: usize = 8;

/// A parameter value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Scalar(f32),
    Vector(Vector3<f32>),
}

impl Value {
    /// Parse `1.5` as a scalar or `1, 2, 3` as a vector.
    pub fn parse(s: &str) -> Result<Self, ParamError> {
        let mut parts = s.split(',').map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|_| ParamError::Malformed)
        });

        let first = parts.next().ok_or(ParamError::Malformed)??;
        let Some(second) = parts.next() else {
            return Ok(Self::Scalar(first));
        };
        let third = parts.next().ok_or(ParamError::Malformed)??;
        if parts.next().is_some() {
            return Err(ParamError::Malformed);
        }

        Ok(Self::Vector(Vector3::new(first, second?, third)))
    }

    pub fn scalar(self) -> Result<f32, ParamError> {
        match self {
            Self::Scalar(value) => Ok(value),
            Self::Vector(_) => Err(ParamError::UnexpectedValue),
        }
    }

    pub fn vector(self) -> Result<Vector3<f32>, ParamError> {
        match self {
            Self::Vector(value) => Ok(value),
            Self::Scalar(_) => Err(ParamError::UnexpectedValue),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamError {
    /// The value could not be parsed.
    Malformed,
    /// No parameter exists with this key.
    UnknownKey,
    /// A scalar was given where a vector was expected, or the reverse.
    UnexpectedValue,
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let err_string = match self {
            Self::Malformed => "Value could not be parsed",
            Self::UnknownKey => "Specified key does not exist",
            Self::UnexpectedValue => "Value not valid",
        };
        f.write_str(err_string)
    }
}

/// A source of named parameters.
pub trait Params {
    /// Get the value of `key` under `path`, or `None` if it is not set.
    fn get(&self, path: &str, key: &str) -> Result<Option<Value>, ParamError>;
}

impl<P: Params + ?Sized> Params for &P {
    fn get(&self, path: &str, key: &str) -> Result<Option<Value>, ParamError> {
        (**self).get(path, key)
    }
}

/// Fully-qualified `"path.key"` and value pairs. Later pairs override earlier ones.
impl Params for [(&str, Value)] {
    fn get(&self, path: &str, key: &str) -> Result<Option<Value>, ParamError> {
        Ok(self
            .iter()
            .rev()
            .find(|(name, _)| {
                name.rsplit_once('.').map_or(false, |(name_path, name_key)| {
                    name_path.eq_ignore_ascii_case(path) && name_key.eq_ignore_ascii_case(key)
                })
            })
            .map(|(_, value)| *value))
    }
}

/// Parameters in the simulator's text format, read without allocating.
///
/// ```text
/// # Comments start with `#` or `//`
/// [QuadControlParams]
/// Mass = 0.5
/// kpPQR = 23, 23, 5
///
/// # Sections can inherit every parameter they don't set from another section
/// [Heavy : QuadControlParams]
/// Mass = 0.8
///
/// # Fully-qualified keys work outside of their section
/// QuadControlParams.kpYaw = 2
/// ```
///
/// When a parameter is defined more than once the last definition wins.
#[derive(Clone, Copy, Debug)]
pub struct ParamText<'a> {
    text: &'a str,
}

impl<'a> ParamText<'a> {
    pub const fn new(text: &'a str) -> Self {
        Self { text }
    }

    fn entries(&self) -> Entries<'a> {
        Entries {
            lines: self.text.lines(),
            section: "",
        }
    }

    /// The raw text of `key` defined directly in `section`.
    fn find(&self, section: &str, key: &str) -> Option<&'a str> {
        self.entries()
            .filter_map(|entry| match entry {
                Entry::Param {
                    section: entry_section,
                    key: entry_key,
                    value,
                } if entry_section.eq_ignore_ascii_case(section)
                    && entry_key.eq_ignore_ascii_case(key) =>
                {
                    Some(value)
                }
                _ => None,
            })
            .last()
    }

    /// The section `section` inherits from.
    fn base(&self, section: &str) -> Option<&'a str> {
        self.entries()
            .filter_map(|entry| match entry {
                Entry::Section { name, base } if name.eq_ignore_ascii_case(section) => base,
                _ => None,
            })
            .last()
    }
}

impl Params for ParamText<'_> {
    fn get(&self, path: &str, key: &str) -> Result<Option<Value>, ParamError> {
        let mut section = path;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Some(value) = self.find(section, key) {
                return Value::parse(value).map(Some);
            }

            match self.base(section) {
                Some(base) => section = base,
                None => break,
            }
        }

        Ok(None)
    }
}

enum Entry<'a> {
    Section {
        name: &'a str,
        base: Option<&'a str>,
    },
    Param {
        section: &'a str,
        key: &'a str,
        value: &'a str,
    },
}

struct Entries<'a> {
    lines: Lines<'a>,
    section: &'a str,
}

impl<'a> Iterator for Entries<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = strip_comment(self.lines.next()?).trim();
            if line.is_empty() {
                continue;
            }

            if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let (name, base) = match header.split_once(':') {
                    Some((name, base)) => (name.trim(), Some(base.trim())),
                    None => (header.trim(), None),
                };
                self.section = name;
                return Some(Entry::Section { name, base });
            }

            let Some((name, value)) = line.split_once('=') else {
                continue;
            };
            let name = name.trim();
            let (section, key) = match name.rsplit_once('.') {
                Some((section, key)) => (section.trim(), key.trim()),
                None => (self.section, name),
            };

            return Some(Entry::Param {
                section,
                key,
                value: value.trim(),
            });
        }
    }
}

fn strip_comment(line: &str) -> &str {
    let end = [line.find('#'), line.find("//")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(line.len());
    &line[..end]
}

#[cfg(test)]
mod tests {
    use super::{ParamError, ParamText, Params, Value};
    use nalgebra::Vector3;

    const TEXT: &str = "
        # Cascaded controller gains
        [QuadControlParams]
        UseIdealEstimator = 1
        Mass = 0.5      // kg
        kpPQR = 23, 23, 5
        kpYaw = 1

        [Heavy : QuadControlParams]
        Mass = 0.8

        [Broken]
        kpBank = fast
        kpPQR = 1, 2

        QuadControlParams.kpYaw = 2
    ";

    #[test]
    fn parse_values() {
        assert_eq!(Value::parse(" 1.5 "), Ok(Value::Scalar(1.5)));
        assert_eq!(
            Value::parse("1, 2,3"),
            Ok(Value::Vector(Vector3::new(1., 2., 3.)))
        );
        assert_eq!(Value::parse(""), Err(ParamError::Malformed));
        assert_eq!(Value::parse("1, 2, 3, 4"), Err(ParamError::Malformed));
    }

    #[test]
    fn sections_and_comments() {
        let params = ParamText::new(TEXT);

        assert_eq!(
            params.get("QuadControlParams", "Mass"),
            Ok(Some(Value::Scalar(0.5)))
        );
        assert_eq!(
            params.get("quadcontrolparams", "KPPQR"),
            Ok(Some(Value::Vector(Vector3::new(23., 23., 5.))))
        );
        assert_eq!(params.get("QuadControlParams", "kpBank"), Ok(None));
    }

    #[test]
    fn qualified_keys_override_earlier_values() {
        let params = ParamText::new(TEXT);
        assert_eq!(
            params.get("QuadControlParams", "kpYaw"),
            Ok(Some(Value::Scalar(2.)))
        );
    }

    #[test]
    fn inheritance() {
        let params = ParamText::new(TEXT);

        assert_eq!(params.get("Heavy", "Mass"), Ok(Some(Value::Scalar(0.8))));
        assert_eq!(params.get("Heavy", "kpYaw"), Ok(Some(Value::Scalar(2.))));
        assert_eq!(params.get("Missing", "Mass"), Ok(None));
    }

    #[test]
    fn malformed_values() {
        let params = ParamText::new(TEXT);

        assert_eq!(params.get("Broken", "kpBank"), Err(ParamError::Malformed));
        assert_eq!(params.get("Broken", "kpPQR"), Err(ParamError::Malformed));
    }

    #[test]
    fn inheritance_cycles_terminate() {
        let params = ParamText::new("[A : B]\n[B : A]\n");
        assert_eq!(params.get("A", "Mass"), Ok(None));
    }
}
