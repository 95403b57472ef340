#![deny(missing_docs)]

//! # Types & Formats
//!
//! Closed enumerations of the JSON types and the `format` values the modeler
//! understands. Anything else parses to `Format::Other` and is rejected by the
//! classifier.

use std::fmt;

/// The JSON Schema `type` keyword values that map to code-model schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    /// `array`
    Array,
    /// `boolean`
    Boolean,
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `object`
    Object,
    /// `string`
    String,
}

impl JsonType {
    /// Parses a `type` keyword value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "array" => Some(Self::Array),
            "boolean" => Some(Self::Boolean),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "object" => Some(Self::Object),
            "string" => Some(Self::String),
            _ => None,
        }
    }

    /// The keyword spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Object => "object",
            Self::String => "string",
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known `format` values (OAS format registry plus AutoRest extensions).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Format {
    /// No format, or an empty one.
    None,
    /// `int32`
    Int32,
    /// `int64`
    Int64,
    /// `unixtime`
    UnixTime,
    /// `float`
    Float,
    /// `double`
    Double,
    /// `decimal`
    Decimal,
    /// `byte`
    Byte,
    /// `base64url`
    Base64Url,
    /// `certificate`
    Certificate,
    /// `binary`
    Binary,
    /// `char`
    Char,
    /// `date`
    Date,
    /// `date-time`
    DateTime,
    /// `date-time-rfc1123`
    DateTimeRfc1123,
    /// `duration`
    Duration,
    /// `uuid`
    Uuid,
    /// `uri` / `url`
    Uri,
    /// `password`
    Password,
    /// `odata-query`
    OData,
    /// Anything else.
    Other(String),
}

impl Format {
    /// Parses an optional `format` keyword value.
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            None | Some("") => Self::None,
            Some("int32") => Self::Int32,
            Some("int64") => Self::Int64,
            Some("unixtime") => Self::UnixTime,
            Some("float") => Self::Float,
            Some("double") => Self::Double,
            Some("decimal") => Self::Decimal,
            Some("byte") => Self::Byte,
            Some("base64url") => Self::Base64Url,
            Some("certificate") => Self::Certificate,
            Some("binary") => Self::Binary,
            Some("char") => Self::Char,
            Some("date") => Self::Date,
            Some("date-time") => Self::DateTime,
            Some("date-time-rfc1123") => Self::DateTimeRfc1123,
            Some("duration") => Self::Duration,
            Some("uuid") => Self::Uuid,
            Some("uri") | Some("url") => Self::Uri,
            Some("password") => Self::Password,
            Some("odata-query") => Self::OData,
            Some(other) => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UnixTime => "unixtime",
            Self::Float => "float",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::Byte => "byte",
            Self::Base64Url => "base64url",
            Self::Certificate => "certificate",
            Self::Binary => "binary",
            Self::Char => "char",
            Self::Date => "date",
            Self::DateTime => "date-time",
            Self::DateTimeRfc1123 => "date-time-rfc1123",
            Self::Duration => "duration",
            Self::Uuid => "uuid",
            Self::Uri => "uri",
            Self::Password => "password",
            Self::OData => "odata-query",
            Self::Other(other) => other,
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        assert_eq!(Format::parse(None), Format::None);
        assert_eq!(Format::parse(Some("")), Format::None);
        assert_eq!(Format::parse(Some("url")), Format::Uri);
        assert_eq!(
            Format::parse(Some("int128")),
            Format::Other("int128".into())
        );
        assert_eq!(Format::parse(Some("date-time-rfc1123")).to_string(), "date-time-rfc1123");
    }

    #[test]
    fn test_parse_types() {
        assert_eq!(JsonType::parse("integer"), Some(JsonType::Integer));
        assert_eq!(JsonType::parse("null"), None);
        assert_eq!(JsonType::Object.to_string(), "object");
    }
}
