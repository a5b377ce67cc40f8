//! # twee_json
//!
//! Converts a Twee 3 story into a [StoryDocument]: story metadata, the list
//! of parsed [Passage]s, and the initial variable state collected from
//! `StoryInit`.
//! The conversion is a pure function over the source text, see [convert_twee3].
//! A [StoryDocument] serializes directly to JSON via serde, or with
//! [serialize_json] for a pretty-printed string.


pub use serde_json;
use serde::Serialize;
use serde_json::{Map, Value};

/// The structured form of a converted Twee story.
#[derive(Debug, Clone, Serialize)]
pub struct StoryDocument {
    /// Story-level metadata from the `StoryTitle` and `StoryData` passages.
    pub metadata: StoryMetadata,
    /// The story passages, in source order, except that the passage named by
    /// `StoryData`'s `start` field is moved to the front.
    pub passages: Vec<Passage>,
    /// Variable state after `StoryInit`, before any story passage applies.
    pub variables: Map<String, Value>,
}

/// Story-level metadata.
#[derive(Debug, Clone, Serialize)]
pub struct StoryMetadata {
    /// The trimmed body of the `StoryTitle` passage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The `StoryData` passage body, parsed as a JSON object.
    /// Please refer to the [specification](https://github.com/iftechfoundation/twine-specs/blob/master/twee-3-specification.md#storydata)
    /// for standard fields such as `start` and `ifid`; arbitrary extra keys
    /// round-trip unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

/// Representation of a passage in a [StoryDocument].
#[derive(Debug, Clone, Serialize)]
pub struct Passage {
    /// The name of the passage. Unique among the story passages.
    pub name: String,
    /// The passage tags, in appearance order.
    pub tags: Vec<String>,
    /// The passage body with comments removed and blank runs collapsed.
    /// Choice markup and `(set: ...)` macros stay in place.
    pub content: String,
    /// The `[[...]]` choice links, in appearance order.
    pub choices: Vec<Choice>,
    /// The `<!-- ... -->` comment bodies, trimmed, in appearance order.
    pub comments: Vec<String>,
    /// Variable state as of the end of this passage. Omitted until the
    /// first assignment anywhere in the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Map<String, Value>>,
}

/// A choice link to another passage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    /// The display text.
    pub text: String,
    /// The target passage name.
    pub link: String,
}

/// Possible conversion errors.
#[derive(Error, Debug)]
pub enum Error {
    /// The input bytes are not UTF-8 text. Only [convert_twee3_bytes] can
    /// report this; the conversion itself never fails.
    #[error("Input is not UTF-8 text: {0}")]
    InputNotUtf8(#[from] std::str::Utf8Error),
}

/// Possible warnings during conversion.
/// The converter is generous: every recoverable condition is reported as a
/// warning and skipped, and the rest of the document still converts.
#[derive(Debug, Clone)]
pub enum Warning {
    /// The `StoryData` body wasn't a valid JSON object and has been discarded.
    StoryDataMalformed,
    /// 2 passages with the same name were found.
    /// The argument is the passage name.
    PassageDuplicated(String),
    /// A `(set: ...)` macro didn't fit the supported value grammar and has
    /// been skipped. The argument is the passage name.
    AssignmentMalformed(String),
}

mod twee3;
use thiserror::Error;
pub use twee3::*;

mod harlowe;
mod markup;
