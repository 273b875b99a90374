/*!
XML-style qualified names, written in Clark notation: `{namespace}local`, or
just `local` for a name with no namespace.
 */

use core::fmt::{self, Display};
use core::str::FromStr;

/// A local name, optionally qualified by a namespace URI
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    namespace: Option<String>,
    local: String,
}

impl QualifiedName {
    pub fn new(namespace: Option<impl Into<String>>, local: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(Into::into),
            local: local.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn local(&self) -> &str {
        &self.local
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum QualifiedNameError {
    #[error("namespace is missing its closing '}}'")]
    Unterminated,

    #[error("local part is empty")]
    EmptyLocalPart,
}

impl FromStr for QualifiedName {
    type Err = QualifiedNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, local) = match s.strip_prefix('{') {
            None => (None, s),
            Some(rest) => {
                let (namespace, local) =
                    rest.split_once('}').ok_or(QualifiedNameError::Unterminated)?;

                // `{}local` is the same as `local`
                (Some(namespace).filter(|ns| !ns.is_empty()), local)
            }
        };

        if local.is_empty() {
            return Err(QualifiedNameError::EmptyLocalPart);
        }

        Ok(Self::new(namespace, local))
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace {
            Some(ref namespace) => write!(f, "{{{namespace}}}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}
