mod parser;


pub use parser::{parse, parse_path};

use serde::{Deserialize, Serialize};

/// Separator between the record type and the path expression
pub const TYPE_SEPARATOR: char = '@';

/// Separator between the path expression and the hook name
pub const HOOK_SEPARATOR: char = '#';

/// Separator between path segments
pub const SEGMENT_SEPARATOR: char = '.';

/// How a path segment descends into its child
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Descend into exactly this field
    Field,
    /// `key[]`: the field is a sequence, descend into every element
    Array,
    /// `key[o]`: the field is a mapping, descend into every value
    Map,
}

impl SegmentKind {
    /// DSL suffix that selects this kind
    pub fn suffix(self) -> &'static str {
        match self {
            SegmentKind::Field => "",
            SegmentKind::Array => "[]",
            SegmentKind::Map => "[o]",
        }
    }
}

/// One navigation step of a rule path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathSegment {
    pub key: String,
    pub kind: SegmentKind,
}

impl PathSegment {
    pub fn field(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: SegmentKind::Field,
        }
    }

    pub fn array(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: SegmentKind::Array,
        }
    }

    pub fn map(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: SegmentKind::Map,
        }
    }
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.key, self.kind.suffix())
    }
}

/// Parsed form of `<recordType>@<pathExpr>[#<hookName>]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Value the record's discriminator must equal
    pub record_type: String,
    /// Navigation steps from the record root to the leaves
    pub path: Vec<PathSegment>,
    /// Optional transform applied to every string leaf
    pub hook: Option<String>,
}
