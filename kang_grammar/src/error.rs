use std::error::Error;
use std::fmt;

/// Raised when a grammar description cannot be loaded.
#[derive(Debug)]
pub enum InvalidGrammar {
    /// The document is not well-formed XML.
    Xml(quick_xml::Error),
    /// The document has no `<grammar>` root element.
    MissingRoot,
    /// An element that does not belong where it was found.
    UnexpectedElement { element: String },
    /// A required attribute is absent.
    MissingAttribute {
        element: String,
        attribute: String,
    },
    /// An attribute has a value outside its domain.
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },
    /// A rule references a terminal that was never declared.
    UnknownTerminal { name: String },
    /// A rule references a variable that was never declared.
    UnknownVariable { name: String },
    /// Two terminals share a name.
    DuplicateTerminal { name: String },
    /// Two variables share a name.
    DuplicateVariable { name: String },
    /// A `<repeat>` whose minimum exceeds its maximum.
    RepeatBounds { min: usize, max: usize },
    /// The document declares no variables, so there is no start symbol.
    NoVariables,
}

impl fmt::Display for InvalidGrammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            InvalidGrammar::Xml(error) => write!(f, "malformed grammar document: {}", error),
            InvalidGrammar::MissingRoot => write!(f, "missing <grammar> root element"),
            InvalidGrammar::UnexpectedElement { element } => {
                write!(f, "unexpected element <{}>", element)
            }
            InvalidGrammar::MissingAttribute { element, attribute } => {
                write!(f, "<{}> is missing the \"{}\" attribute", element, attribute)
            }
            InvalidGrammar::InvalidAttribute {
                element,
                attribute,
                value,
            } => write!(
                f,
                "<{}> has invalid {}=\"{}\"",
                element, attribute, value
            ),
            InvalidGrammar::UnknownTerminal { name } => {
                write!(f, "reference to undeclared terminal \"{}\"", name)
            }
            InvalidGrammar::UnknownVariable { name } => {
                write!(f, "reference to undeclared variable \"{}\"", name)
            }
            InvalidGrammar::DuplicateTerminal { name } => {
                write!(f, "terminal \"{}\" is declared twice", name)
            }
            InvalidGrammar::DuplicateVariable { name } => {
                write!(f, "variable \"{}\" is declared twice", name)
            }
            InvalidGrammar::RepeatBounds { min, max } => write!(
                f,
                "<repeat> minimum ({}) greater than maximum ({})",
                min, max
            ),
            InvalidGrammar::NoVariables => write!(f, "grammar declares no variables"),
        }
    }
}

impl Error for InvalidGrammar {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            InvalidGrammar::Xml(error) => Some(error),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for InvalidGrammar {
    fn from(error: quick_xml::Error) -> Self {
        InvalidGrammar::Xml(error)
    }
}
