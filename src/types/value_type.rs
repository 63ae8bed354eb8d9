//! # Declared Value Types
//!
//! The type a project author declares for a variable, struct field, or array
//! element. Declared types drive both the wire tag selection and the
//! recursive decomposition of containers; the runtime value alone is not
//! enough because the firmware reads struct fields positionally in declared
//! order.
//!
//! Composite types carry the name of their definition in the
//! [`TypeTable`](super::TypeTable) (`Struct`, `Enum`, `Object`) or nest
//! another declared type (`Array`).

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Undefined,
    Null,
    Integer,
    Float,
    Double,
    Boolean,
    String,
    Date,
    Widget,
    Json,
    Event,
    /// Element type of an untyped sequence.
    Any,
    Enum(String),
    Struct(String),
    Object(String),
    Array(Box<ValueType>),
}

impl ValueType {
    pub fn array_of(element: ValueType) -> Self {
        ValueType::Array(Box::new(element))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, ValueType::Array(_))
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, ValueType::Struct(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, ValueType::Enum(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, ValueType::Object(_))
    }

    /// The declared element type of an array type.
    pub fn array_element_type(&self) -> Option<&ValueType> {
        match self {
            ValueType::Array(element) => Some(element),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Undefined => write!(f, "undefined"),
            ValueType::Null => write!(f, "null"),
            ValueType::Integer => write!(f, "integer"),
            ValueType::Float => write!(f, "float"),
            ValueType::Double => write!(f, "double"),
            ValueType::Boolean => write!(f, "boolean"),
            ValueType::String => write!(f, "string"),
            ValueType::Date => write!(f, "date"),
            ValueType::Widget => write!(f, "widget"),
            ValueType::Json => write!(f, "json"),
            ValueType::Event => write!(f, "event"),
            ValueType::Any => write!(f, "any"),
            ValueType::Enum(name) => write!(f, "enum:{}", name),
            ValueType::Struct(name) => write!(f, "struct:{}", name),
            ValueType::Object(name) => write!(f, "object:{}", name),
            ValueType::Array(element) => write!(f, "array:{}", element),
        }
    }
}
