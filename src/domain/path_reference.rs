use std::fmt;

const SCHEME_SEPARATOR: &str = "://";

/// A `scheme://locator` reference to the folder that holds a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathReference {
    scheme: String,
    locator: String,
}

impl PathReference {
    pub fn new(scheme: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            locator: locator.into(),
        }
    }

    /// Splits on the first `://`. Input without a separator yields an empty scheme.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(SCHEME_SEPARATOR) {
            Some((scheme, locator)) => Self::new(scheme, locator),
            None => Self::new("", raw),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }
}

impl fmt::Display for PathReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scheme.is_empty() {
            f.write_str(&self.locator)
        } else {
            write!(f, "{}{}{}", self.scheme, SCHEME_SEPARATOR, self.locator)
        }
    }
}
