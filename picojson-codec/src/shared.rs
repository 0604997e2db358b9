// SPDX-License-Identifier: Apache-2.0

use crate::JsonNumber;

/// Events delivered by the push parser, with escapes already decoded
#[derive(Debug, Clone, PartialEq)]
pub enum ParseEvent<'a> {
    /// The start of an object (`{`).
    MapStart,
    /// An object key, borrowed from the parser's scratch buffer.
    MapKey(&'a str),
    /// The end of an object (`}`).
    MapEnd,
    /// The start of an array (`[`).
    ArrayStart,
    /// The end of an array (`]`).
    ArrayEnd,
    /// A string value.
    String(&'a str),
    /// A number value.
    Number(JsonNumber<'a>),
    /// A boolean value.
    Bool(bool),
    /// A null value.
    Null,
    /// The document is complete.
    EndDocument,
}
