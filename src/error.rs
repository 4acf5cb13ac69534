use std::fmt;

/// Error raised while registering routes or editing a route list.
///
/// Routing itself never fails with an error: a URL that does not match any
/// route and a parameter set that cannot be turned into a URL are both
/// reported as `None`. `RouteError` covers the setup phase only, where a
/// broken mask or a bad list index is a programming mistake the caller
/// should hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The mask string could not be compiled.
    ///
    /// Raised for unbalanced `[` `]` brackets, an unterminated `<...>`
    /// placeholder, an invalid placeholder name, or a per-parameter regex
    /// fragment that the regex engine rejects.
    MaskSyntax {
        /// The offending mask, verbatim as given at registration
        mask: String,
        /// What the compiler stumbled over
        detail: String,
    },
    /// The same parameter name is bound twice.
    ///
    /// Either the mask names a placeholder twice, or metadata fixes a
    /// parameter to a value that disagrees with the default the mask
    /// already assigns to it.
    DuplicateParameter {
        /// The offending mask
        mask: String,
        /// The parameter name that was bound twice
        name: String,
    },
    /// `RouteList::modify` was called with an index past the end of the list.
    OutOfRange {
        /// The requested index
        index: usize,
        /// The number of routers currently in the list
        len: usize,
    },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::MaskSyntax { mask, detail } => {
                write!(f, "invalid mask '{}': {}", mask, detail)
            }
            RouteError::DuplicateParameter { mask, name } => {
                write!(
                    f,
                    "parameter '{}' is bound more than once in mask '{}'",
                    name, mask
                )
            }
            RouteError::OutOfRange { index, len } => {
                write!(
                    f,
                    "router index {} is out of range (list contains {} routers)",
                    index, len
                )
            }
        }
    }
}

impl std::error::Error for RouteError {}
