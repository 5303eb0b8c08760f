//! Error codes for all compiler diagnostics.

use std::fmt;

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where the first digit is the phase:
/// - E1xxx: Parser errors
/// - E2xxx: Semantic errors
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Parser Errors (E1xxx)
    /// Expected token after a committed prefix
    E1001,
    /// Input left over after the program
    E1002,
    /// Matching step budget exhausted
    E1003,
    /// Literal out of range
    E1004,

    // Semantic Errors (E2xxx)
    /// Type mismatch
    E2001,
    /// Wrong number of call arguments
    E2002,
    /// Unknown identifier
    E2003,
    /// Unknown member
    E2004,
    /// Cannot infer type
    E2005,
    /// Duplicate declaration
    E2006,
    /// Operator not defined for operand types
    E2007,
    /// Unknown type name
    E2008,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// One-line description for `--explain` style output.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::E1001 => "expected token",
            ErrorCode::E1002 => "unexpected trailing input",
            ErrorCode::E1003 => "parser step budget exhausted",
            ErrorCode::E1004 => "literal out of range",
            ErrorCode::E2001 => "type mismatch",
            ErrorCode::E2002 => "wrong number of arguments",
            ErrorCode::E2003 => "unknown identifier",
            ErrorCode::E2004 => "unknown member",
            ErrorCode::E2005 => "cannot infer type",
            ErrorCode::E2006 => "duplicate declaration",
            ErrorCode::E2007 => "operator not defined for these types",
            ErrorCode::E2008 => "unknown type",
            ErrorCode::E9001 => "internal compiler error",
        }
    }

    pub fn is_parse_error(self) -> bool {
        self.as_str().starts_with("E1")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
