use super::*;

#[test]
fn test_parse_tags_trims() {
    let raw = vec!["core".to_string(), " seed ".to_string()];
    let tags = parse_tags(&raw).unwrap();
    let names: Vec<&str> = tags.iter().map(|t| t.as_str()).collect();
    assert_eq!(names, vec!["core", "seed"]);
}

#[test]
fn test_parse_tags_rejects_blank() {
    let raw = vec!["core".to_string(), " ".to_string()];
    let err = parse_tags(&raw).unwrap_err();
    assert!(err.to_string().contains("Invalid tag ' '"));
}

#[test]
fn test_exit_code_displays_nothing() {
    assert_eq!(ExitCode(2).to_string(), "");
}
