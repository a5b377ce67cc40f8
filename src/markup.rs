use regex::{Regex, RegexBuilder};

use crate::Choice;

/// Removes `<!-- ... -->` spans from a passage body.
///
/// Returns the body with comments removed, blank runs collapsed and the ends
/// trimmed, plus the trimmed comment texts in appearance order. A comment
/// sitting alone on its own line leaves behind at most one blank line.
pub(crate) fn strip_comments(body: &str) -> (String, Vec<String>) {
    let comment = RegexBuilder::new(r"<!--(.*?)-->")
        .dot_matches_new_line(true)
        .build()
        .unwrap();
    let mut comments = vec![];
    for c in comment.captures_iter(body) {
        comments.push(c.get(1).unwrap().as_str().trim().to_string());
    }
    let stripped = comment.replace_all(body, "");
    let blanks = Regex::new(r"\n[ \t]*\n([ \t]*\n)+").unwrap();
    let content = blanks.replace_all(&stripped, "\n\n").trim().to_string();
    (content, comments)
}

/// Extracts `[[...]]` choice links, left to right.
///
/// The interior splits on the first `|` into display text and link target;
/// without a pipe the text doubles as the link. The markup itself stays in
/// the passage content.
pub(crate) fn extract_choices(content: &str) -> Vec<Choice> {
    let link = Regex::new(r"\[\[(.*?)\]\]").unwrap();
    link.captures_iter(content)
        .map(|c| {
            let inner = c.get(1).unwrap().as_str();
            match inner.split_once('|') {
                Some((text, link)) => Choice { text: text.to_string(), link: link.to_string() },
                None => Choice { text: inner.to_string(), link: inner.to_string() },
            }
        })
        .collect()
}
