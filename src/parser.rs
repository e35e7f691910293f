use std::sync::LazyLock;

use regex::Regex;

use crate::block::{Block, ListItem};

static CHECKLIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[( |x)\] (.*)$").unwrap());
static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*]\s+(.*)$").unwrap());

/// Parse one text field into a list of blocks.
///
/// Every string parses; a line matching no pattern becomes a paragraph.
pub fn parse(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut list: Option<Vec<ListItem>> = None;

    for line in text.split('\n') {
        let line = trim_line(line);

        if let Some(item) = list_item(line) {
            list.get_or_insert_with(Vec::new).push(item);
            continue;
        }

        flush_list(&mut list, &mut blocks);
        blocks.push(line_block(line));
    }

    flush_list(&mut list, &mut blocks);
    blocks
}

/// Trim whitespace and byte-order marks, which editors leave at the start of a file.
fn trim_line(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

fn flush_list(list: &mut Option<Vec<ListItem>>, blocks: &mut Vec<Block>) {
    if let Some(items) = list.take() {
        blocks.push(Block::List { items });
    }
}

/// Classify a trimmed line that does not extend a list.
fn line_block(line: &str) -> Block {
    if line == "---" {
        return Block::Rule;
    }
    if let Some(text) = line.strip_prefix("# ") {
        return Block::Heading1 { text: text.to_string() };
    }
    if let Some(text) = line.strip_prefix("## ") {
        return Block::Heading2 { text: text.to_string() };
    }
    if let Some(text) = line.strip_prefix("> ") {
        return Block::Quote { text: text.to_string() };
    }
    Block::Paragraph { text: line.to_string() }
}

/// Match a trimmed line against the checklist and bullet patterns, checklist first.
fn list_item(line: &str) -> Option<ListItem> {
    // Rules, blanks, headings and quotes never match these patterns,
    // so testing lists before them keeps the same precedence.
    if let Some(caps) = CHECKLIST_RE.captures(line) {
        return Some(ListItem::task(&caps[2], &caps[1] == "x"));
    }
    BULLET_RE
        .captures(line)
        .map(|caps| ListItem::bullet(&caps[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn para(text: &str) -> Block {
        Block::Paragraph { text: text.to_string() }
    }

    #[test]
    fn empty_input_is_one_spacer() {
        assert_eq!(parse(""), vec![para("")]);
    }

    #[test]
    fn bullets_merge_into_one_list() {
        assert_eq!(
            parse("- a\n- b\n- c"),
            vec![Block::List {
                items: vec![ListItem::bullet("a"), ListItem::bullet("b"), ListItem::bullet("c")]
            }]
        );
    }

    #[test]
    fn blank_line_splits_lists() {
        assert_eq!(
            parse("- a\n\n- b"),
            vec![
                Block::List { items: vec![ListItem::bullet("a")] },
                para(""),
                Block::List { items: vec![ListItem::bullet("b")] },
            ]
        );
    }

    #[test]
    fn checklist_items() {
        assert_eq!(
            parse("[x] done\n[ ] todo"),
            vec![Block::List {
                items: vec![ListItem::task("done", true), ListItem::task("todo", false)]
            }]
        );
    }

    #[test]
    fn checklist_and_bullets_share_a_list() {
        assert_eq!(
            parse("* one\n[ ] two"),
            vec![Block::List {
                items: vec![ListItem::bullet("one"), ListItem::task("two", false)]
            }]
        );
    }

    #[rstest]
    #[case("# Title", Block::Heading1 { text: "Title".into() })]
    #[case("## Title", Block::Heading2 { text: "Title".into() })]
    #[case("> quoted", Block::Quote { text: "quoted".into() })]
    #[case("---", Block::Rule)]
    #[case("  ---  ", Block::Rule)]
    #[case("#", para("#"))]
    #[case("#Title", para("#Title"))]
    #[case("### deep", para("### deep"))]
    #[case("[X] shouting", para("[X] shouting"))]
    #[case("[ x] spaced", para("[ x] spaced"))]
    #[case("[x]", para("[x]"))]
    #[case("-", para("-"))]
    #[case("*bold* start", para("*bold* start"))]
    #[case("----", para("----"))]
    fn single_line(#[case] input: &str, #[case] expected: Block) {
        assert_eq!(parse(input), vec![expected]);
    }

    #[test]
    fn heading_text_keeps_extra_spaces() {
        assert_eq!(parse("#  Wide"), vec![Block::Heading1 { text: " Wide".into() }]);
    }

    #[test]
    fn bullet_swallows_extra_whitespace() {
        assert_eq!(
            parse("-   spaced\n*\titem"),
            vec![Block::List {
                items: vec![ListItem::bullet("spaced"), ListItem::bullet("item")]
            }]
        );
    }

    #[test]
    fn lines_are_trimmed() {
        assert_eq!(
            parse("   hello  \r\n\t- item\r"),
            vec![para("hello"), Block::List { items: vec![ListItem::bullet("item")] }]
        );
    }

    #[test]
    fn byte_order_mark_is_trimmed() {
        assert_eq!(
            parse("\u{FEFF}# Title\n- a"),
            vec![
                Block::Heading1 { text: "Title".into() },
                Block::List { items: vec![ListItem::bullet("a")] },
            ]
        );
    }

    #[test]
    fn trailing_list_is_flushed() {
        let blocks = parse("intro\n- a\n- b");
        assert_eq!(
            blocks,
            vec![
                para("intro"),
                Block::List {
                    items: vec![ListItem::bullet("a"), ListItem::bullet("b")]
                },
            ]
        );
    }

    #[test]
    fn any_other_line_closes_the_list() {
        assert_eq!(
            parse("- a\n# H\n- b\n---\n- c\n> q"),
            vec![
                Block::List { items: vec![ListItem::bullet("a")] },
                Block::Heading1 { text: "H".into() },
                Block::List { items: vec![ListItem::bullet("b")] },
                Block::Rule,
                Block::List { items: vec![ListItem::bullet("c")] },
                Block::Quote { text: "q".into() },
            ]
        );
    }

    #[test]
    fn order_follows_lines() {
        let text = "> q\n## two\n# one\npara\n---";
        assert_eq!(
            parse(text),
            vec![
                Block::Quote { text: "q".into() },
                Block::Heading2 { text: "two".into() },
                Block::Heading1 { text: "one".into() },
                para("para"),
                Block::Rule,
            ]
        );
    }

    #[test]
    fn parsing_is_deterministic() {
        let text = "# Notes\n- a\n[x] b\n\n> $E=mc^2$\n---\ntail";
        assert_eq!(parse(text), parse(text));
    }

    #[test]
    fn unicode_passes_through() {
        assert_eq!(
            parse("# 🚀 Überblick\n- 数学"),
            vec![
                Block::Heading1 { text: "🚀 Überblick".into() },
                Block::List { items: vec![ListItem::bullet("数学")] },
            ]
        );
    }
}
