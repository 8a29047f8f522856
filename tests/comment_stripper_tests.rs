use copy_folder_content::comments::{
    collapse_blank_lines, remove_comments, strip_comments, StripError, StripOptions,
};

fn strip(text: &str) -> String {
    strip_comments(text, StripOptions::default())
}

#[test]
fn test_removes_line_and_block_comments() {
    let input = "let a = 1; // trailing\n/* block\n   spanning */\nlet b = 2;\n";
    assert_eq!(strip(input), "let a = 1;\n\nlet b = 2;\n");
}

#[test]
fn test_removes_html_comments() {
    let input = "<div>\n<!-- hidden -->\n</div>\n";
    assert_eq!(strip(input), "<div>\n\n</div>\n");
}

#[test]
fn test_comment_markers_inside_strings_survive() {
    let input =
        "const url = \"http://example.com\"; // real comment\nconst re = '/* not a comment */';\n";
    assert_eq!(
        strip(input),
        "const url = \"http://example.com\";\nconst re = '/* not a comment */';\n"
    );
}

#[test]
fn test_apostrophes_and_lifetimes_do_not_hide_comments() {
    let input = "fn name<'a>(s: &'a str) -> &'a str { s } // lifetime\nlet it's = 1; // prose\n";
    assert_eq!(
        strip(input),
        "fn name<'a>(s: &'a str) -> &'a str { s }\nlet it's = 1;\n"
    );
}

#[test]
fn test_hash_comments_only_when_enabled() {
    let input = "#!/usr/bin/env python\n# comment\nprint('#not')\n";
    assert_eq!(strip(input), input);

    let stripped = strip_comments(input, StripOptions { hash_comments: true });
    assert_eq!(stripped, "#!/usr/bin/env python\n\nprint('#not')\n");
}

#[test]
fn test_text_without_comments_is_unchanged() {
    let input = "fn main() {\n    println!(\"hi\");\n\n    run();\n}\n";
    assert_eq!(strip(input), input);
}

#[test]
fn test_blank_line_runs_collapse_to_one() {
    for n in 2..8 {
        let input = format!("top{}bottom\n", "\n".repeat(n + 1));
        assert_eq!(collapse_blank_lines(&input), "top\n\nbottom\n", "run of {} blank lines", n);
    }
    assert_eq!(collapse_blank_lines("a\n  \n\t\n \nb"), "a\n\nb");
    assert_eq!(collapse_blank_lines("a\r\n\r\n\r\nb"), "a\r\n\r\nb");
}

#[test]
fn test_single_blank_line_is_kept() {
    assert_eq!(collapse_blank_lines("a\n\nb\n"), "a\n\nb\n");
}

#[test]
fn test_whitespace_without_comments_is_unchanged() {
    for input in ["   \n", "\t", " \n"] {
        assert_eq!(strip(input), input);
    }
}

#[test]
fn test_comment_only_input_becomes_empty() {
    assert_eq!(strip("// just a comment\n/* and another */\n\n\n"), "");
}

#[test]
fn test_unterminated_block_comment_returns_original() {
    let input = "let a = 1;\n/* never closed\n\n\n\nlet b = 2;\n";
    assert!(matches!(
        remove_comments(input, StripOptions::default()),
        Err(StripError::UnterminatedComment(11))
    ));
    assert_eq!(strip(input), input);
}
