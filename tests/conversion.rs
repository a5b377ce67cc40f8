use serde_json::json;
use twee_json::{convert_twee3, Choice, Warning};

#[test]
fn converts_a_simple_story() {
    let source = r#":: StoryTitle
My Story

:: StoryData
{
    "start": "Start",
    "ifid": "12345678-1234-1234-1234-123456789012"
}

:: Start
This is the start of the story.

[[Go to next|Next]]

:: Next
This is the next passage.

[[Go back|Start]]"#;

    let (doc, warnings) = convert_twee3(source);

    assert!(warnings.is_empty(), "{:?}", warnings);
    assert_eq!(doc.metadata.title.as_deref(), Some("My Story"));
    assert_eq!(doc.metadata.data.as_ref().unwrap().get("start"), Some(&json!("Start")));
    assert_eq!(doc.passages.len(), 2);
    assert_eq!(doc.passages[0].name, "Start");
    assert_eq!(
        doc.passages[0].content,
        "This is the start of the story.\n\n[[Go to next|Next]]"
    );
    assert_eq!(
        doc.passages[0].choices,
        vec![Choice { text: "Go to next".to_string(), link: "Next".to_string() }]
    );
}

#[test]
fn parses_tags() {
    let source = ":: Start [tag1 tag2]\nThis passage has tags.\n\n:: Next [tag3]\nDifferent tags.";
    let (doc, _) = convert_twee3(source);
    assert_eq!(doc.passages[0].tags, vec!["tag1", "tag2"]);
    assert_eq!(doc.passages[1].tags, vec!["tag3"]);

    let (doc, _) = convert_twee3(":: Start\nNo tags here.");
    assert!(doc.passages[0].tags.is_empty());
}

#[test]
fn seeds_and_accumulates_variables() {
    let source = r#":: StoryInit
(set: $score to 0)
(set: $name to "Player")

:: Start
Your name is $name and your score is $score.

(set: $score to 5)

[[Next|Next]]

:: Next
Your score is now $score."#;

    let (doc, warnings) = convert_twee3(source);

    assert!(warnings.is_empty(), "{:?}", warnings);
    assert_eq!(doc.variables.get("score"), Some(&json!(0)));
    assert_eq!(doc.variables.get("name"), Some(&json!("Player")));
    let start = doc.passages[0].variables.as_ref().unwrap();
    assert_eq!(start.get("score"), Some(&json!(5)));
    // the macro is reported, not erased
    assert!(doc.passages[0].content.contains("(set: $score to 5)"));
    // a passage without assignments still carries the running snapshot
    let next = doc.passages[1].variables.as_ref().unwrap();
    assert_eq!(next.get("score"), Some(&json!(5)));
    assert_eq!(next.get("name"), Some(&json!("Player")));
}

#[test]
fn collects_comments() {
    let source = ":: Start\nThis is the content.\n<!-- This is a comment -->\nMore content.";
    let (doc, _) = convert_twee3(source);
    assert_eq!(doc.passages[0].content, "This is the content.\n\nMore content.");
    assert_eq!(doc.passages[0].comments, vec!["This is a comment"]);
}

#[test]
fn handles_empty_choices() {
    let source = ":: Start\nThis is the content.\n\n[[]]\n\n:: Next\nThis is the next passage.";
    let (doc, _) = convert_twee3(source);
    assert_eq!(
        doc.passages[0].choices,
        vec![Choice { text: "".to_string(), link: "".to_string() }]
    );
}

#[test]
fn evaluates_datamaps() {
    let source = r#":: StoryInit
(set: $inventory to (datamap: "sword", "steel sword", "shield", "wooden shield"))

:: Start
You have a $inventory.sword and a $inventory.shield."#;

    let (doc, warnings) = convert_twee3(source);

    assert!(warnings.is_empty(), "{:?}", warnings);
    assert_eq!(
        doc.variables.get("inventory"),
        Some(&json!({"sword": "steel sword", "shield": "wooden shield"}))
    );
}

#[test]
fn moves_the_start_passage_to_the_front() {
    let source = r#":: StoryData
{
    "start": "Start"
}

:: Middle
This is in the middle.

:: Start
This is the start.

:: End
This is the end."#;

    let (doc, _) = convert_twee3(source);

    assert_eq!(doc.passages[0].name, "Start");
    assert_eq!(doc.passages[1].name, "Middle");
    assert_eq!(doc.passages[2].name, "End");
}

#[test]
fn keeps_source_order_without_a_start() {
    let (doc, _) = convert_twee3(":: C\nc\n\n:: A\na\n\n:: B\nb");
    let names: Vec<&str> = doc.passages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["C", "A", "B"]);
}

#[test]
fn snapshots_accumulate_monotonically() {
    let source = ":: One\n(set: $a to 1)\n\n:: Two\n(set: $b to 2)\n\n:: Three\n(set: $a to 3)";
    let (doc, _) = convert_twee3(source);
    let mut seen = serde_json::Map::new();
    for p in &doc.passages {
        let vars = p.variables.as_ref().unwrap();
        for key in seen.keys() {
            assert!(vars.contains_key(key), "{} lost {}", p.name, key);
        }
        seen = vars.clone();
    }
    assert_eq!(seen.get("a"), Some(&json!(3)));
    assert_eq!(seen.get("b"), Some(&json!(2)));
}

#[test]
fn omits_snapshots_until_the_first_assignment() {
    let source = ":: One\nNothing here.\n\n:: Two\n(set: $a to 1)\n\n:: Three\nStill nothing.";
    let (doc, _) = convert_twee3(source);
    assert!(doc.passages[0].variables.is_none());
    assert!(doc.passages[1].variables.is_some());
    assert!(doc.passages[2].variables.is_some());
    assert!(doc.variables.is_empty());
}

#[test]
fn degrades_gracefully_on_malformed_pieces() {
    let source = r#":: StoryData
{ this is not json

:: Start
(set: $broken to 1 +)
(set: $fine to "kept")

[[Onward|Next]]

:: Next
Done."#;

    let (doc, warnings) = convert_twee3(source);

    assert!(doc.metadata.data.is_none());
    assert_eq!(doc.passages.len(), 2);
    let vars = doc.passages[0].variables.as_ref().unwrap();
    assert_eq!(vars.get("fine"), Some(&json!("kept")));
    assert!(vars.get("broken").is_none());
    assert!(warnings.iter().any(|w| matches!(w, Warning::StoryDataMalformed)));
    assert!(warnings.iter().any(|w| matches!(w, Warning::AssignmentMalformed(p) if p == "Start")));
}

#[test]
fn converts_the_fixture_story() {
    let (doc, warnings) = convert_twee3(include_str!("../test-data/Night Courier.twee"));

    assert!(warnings.is_empty(), "{:?}", warnings);
    assert_eq!(doc.metadata.title.as_deref(), Some("Night Courier"));
    let names: Vec<&str> = doc.passages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Briefing", "Safehouse", "Plaza", "Walk away", "Drop"]);
    assert!(doc.passages.iter().all(|p| !p.content.is_empty()));

    assert_eq!(doc.passages[0].tags, vec!["intro"]);
    assert_eq!(doc.passages[0].comments.len(), 1);
    assert_eq!(
        doc.passages[0].choices,
        vec![
        Choice { text: "Take the job".to_string(), link: "Plaza".to_string() },
        Choice { text: "Walk away".to_string(), link: "Walk away".to_string() },
        ]
    );

    // baseline is the post-StoryInit state
    assert_eq!(doc.variables.get("credits"), Some(&json!(40)));
    assert_eq!(
        doc.variables.get("gear"),
        Some(&json!({"badge": "forged press pass", "radio": "shortwave receiver"}))
    );

    // Plaza reassigns credits on top of the running state
    let plaza = doc.passages.iter().find(|p| p.name == "Plaza").unwrap();
    let vars = plaza.variables.as_ref().unwrap();
    assert_eq!(vars.get("credits"), Some(&json!(25)));
    assert_eq!(vars.get("rested"), Some(&json!(true)));
    assert_eq!(vars.get("alerted"), Some(&json!(false)));
}
