use super::*;

#[test]
fn parses_add_with_free_text() {
    assert_eq!(parse_intent("add buy  oat milk "), Ok(Intent::Add("buy  oat milk".into())));
}

#[test]
fn add_without_text_parses_to_empty_add() {
    assert_eq!(parse_intent("add"), Ok(Intent::Add(String::new())));
}

#[test]
fn parses_id_commands_and_aliases() {
    assert_eq!(parse_intent("toggle 3"), Ok(Intent::Toggle(TodoId(3))));
    assert_eq!(parse_intent("t #3"), Ok(Intent::Toggle(TodoId(3))));
    assert_eq!(parse_intent("rm 9"), Ok(Intent::Delete(TodoId(9))));
    assert_eq!(parse_intent("DELETE 9"), Ok(Intent::Delete(TodoId(9))));
}

#[test]
fn parses_edit_id_and_text() {
    assert_eq!(parse_intent("edit 4 new words"), Ok(Intent::Edit(TodoId(4), "new words".into())));
}

#[test]
fn rejects_missing_or_bad_ids() {
    assert!(parse_intent("toggle").is_err());
    assert!(parse_intent("rm x").is_err());
    assert!(parse_intent("edit nope text").is_err());
}

#[test]
fn blank_line_redraws() {
    assert_eq!(parse_intent("   "), Ok(Intent::List));
}

#[test]
fn parses_control_intents() {
    assert_eq!(parse_intent("retry"), Ok(Intent::Retry));
    assert_eq!(parse_intent("dismiss"), Ok(Intent::Dismiss));
    assert_eq!(parse_intent("theme"), Ok(Intent::Theme));
    assert_eq!(parse_intent("quit"), Ok(Intent::Quit));
    assert_eq!(parse_intent("?"), Ok(Intent::Help));
}

#[test]
fn unknown_verb_is_an_error() {
    let err = parse_intent("frobnicate 1").unwrap_err();
    assert!(err.contains("frobnicate"));
}
