use regex::Regex;

use crate::harlowe;
use crate::markup;
use crate::*;

/// A passage as cut out of the source, before content parsing.
struct RawPassage {
    name: String,
    tags: Vec<String>,
    body: String,
}

/// Splits Twee source into raw passages.
///
/// A marker line starts with `::` (after optional indentation), followed by a
/// non-empty name and an optional `[tag1 tag2]` list. Lines that don't fit
/// that shape, including malformed markers, stay as content of the preceding
/// passage; text before the first marker belongs to no passage.
fn split_passages(source: &str) -> Vec<RawPassage> {
    let marker =
        Regex::new(r"^[ \t]*::[ \t]*([^\[\]\s][^\[\]]*?)[ \t]*(?:\[([^\]]*)\][ \t]*)?$").unwrap();
    let mut raw: Vec<RawPassage> = Vec::new();
    for line in source.lines() {
        if let Some(c) = marker.captures(line) {
            let name = c.get(1).unwrap().as_str().to_string();
            let tags = c
                .get(2)
                .map(|t| t.as_str().split_whitespace().map(|s| s.to_string()).collect())
                .unwrap_or_default();
            raw.push(RawPassage { name, tags, body: String::new() });
        } else if let Some(p) = raw.last_mut() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("\\::") {
                // escaped marker, drop the backslash
                p.body.push_str(&line[..line.len() - trimmed.len()]);
                p.body.push_str(&trimmed[1..]);
            } else {
                p.body.push_str(line);
            }
            p.body.push('\n');
        }
    }
    for p in &mut raw {
        p.body = p.body.trim().to_string();
    }
    raw
}

/// Converts Twee 3 source into a [StoryDocument].
///
/// Total over its input: anything that merely fails to match an optional
/// feature (bad `StoryData` JSON, a macro outside the supported grammar, a
/// duplicated passage) is reported in the warning list and skipped, and the
/// rest of the document still converts.
pub fn convert_twee3(source: &str) -> (StoryDocument, Vec<Warning>) {
    let source = source.replace("\r\n", "\n");
    let mut warnings = vec![];
    let mut title: Option<String> = None;
    let mut data: Option<Map<String, Value>> = None;
    let mut init_body: Option<String> = None;
    let mut raws: Vec<RawPassage> = Vec::new();
    for raw in split_passages(&source) {
        match raw.name.as_str() {
            "StoryTitle" => {
                if title.is_some() {
                    warnings.push(Warning::PassageDuplicated("StoryTitle".to_string()));
                }
                title = Some(raw.body.trim().to_string());
            }
            "StoryData" => {
                if data.is_some() {
                    warnings.push(Warning::PassageDuplicated("StoryData".to_string()));
                }
                data = match serde_json::from_str::<Value>(&raw.body) {
                    Ok(Value::Object(o)) => Some(o),
                    _ => {
                        warnings.push(Warning::StoryDataMalformed);
                        None
                    }
                };
            }
            "StoryInit" => {
                if init_body.is_some() {
                    warnings.push(Warning::PassageDuplicated("StoryInit".to_string()));
                }
                init_body = Some(raw.body);
            }
            _ => {
                if raws.iter().any(|p| p.name == raw.name) {
                    warnings.push(Warning::PassageDuplicated(raw.name));
                } else {
                    raws.push(raw);
                }
            }
        }
    }

    let mut running: Map<String, Value> = Map::new();
    if let Some(body) = &init_body {
        for (name, value) in harlowe::extract_assignments(body, "StoryInit", &mut warnings) {
            running.insert(name, value);
        }
    }
    let variables = running.clone();

    let mut passages = Vec::new();
    for raw in raws {
        let (content, comments) = markup::strip_comments(&raw.body);
        let choices = markup::extract_choices(&content);
        for (name, value) in harlowe::extract_assignments(&content, &raw.name, &mut warnings) {
            running.insert(name, value);
        }
        let snapshot = if running.is_empty() { None } else { Some(running.clone()) };
        passages.push(Passage {
            name: raw.name,
            tags: raw.tags,
            content,
            choices,
            comments,
            variables: snapshot,
        });
    }

    if let Some(Value::String(start)) = data.as_ref().and_then(|d| d.get("start")) {
        if let Some(i) = passages.iter().position(|p| &p.name == start) {
            let p = passages.remove(i);
            passages.insert(0, p);
        }
    }

    return (
        StoryDocument {
            metadata: StoryMetadata { title, data },
            passages,
            variables,
        },
        warnings,
    );
}

/// Converts Twee 3 source given as raw bytes.
///
/// The only fallible entry point: bytes that aren't UTF-8 text are a contract
/// violation, reported as [Error::InputNotUtf8] rather than a warning.
pub fn convert_twee3_bytes(source: &[u8]) -> Result<(StoryDocument, Vec<Warning>), Error> {
    Ok(convert_twee3(std::str::from_utf8(source)?))
}

/// Serializes a [StoryDocument] into pretty-printed JSON.
pub fn serialize_json(doc: &StoryDocument) -> String {
    serde_json::to_string_pretty(doc).unwrap()
}
