use std::sync::LazyLock;

use regex::Regex;

use crate::segmenter::DaySegment;
use crate::text::{contains_ci, rfind_ci};
use crate::types::DayMenu;

pub const LINE_BREAK: &str = "<br>";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DayMenuError {
    #[error("No lunch menu found")]
    EmptyMenu,
    #[error("Segment does not mention its weekday, not a weekly menu")]
    NotWeeklyMenu,
    #[error("Weekday label still present after cleanup")]
    LabelNotStripped,
}

static RE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("invalid regex: whitespace"));

/// Separators written right after a weekday label, as in `Måndag: ...`.
const LABEL_SEPARATORS: &[char] = &[':', '-', '–', '—', ',', '.'];

pub fn sanitize(raw: &str, label: &str) -> Result<String, DayMenuError> {
    if raw.trim().is_empty() {
        return Err(DayMenuError::EmptyMenu);
    }
    let after_label = strip_label(raw, label).ok_or(DayMenuError::NotWeeklyMenu)?;

    let menu = clean_menu_text(after_label);
    if menu.is_empty() {
        return Err(DayMenuError::EmptyMenu);
    }
    if contains_ci(&menu, label) {
        return Err(DayMenuError::LabelNotStripped);
    }
    Ok(menu)
}

pub fn sanitize_day(segment: &DaySegment<'_>) -> Result<DayMenu, DayMenuError> {
    sanitize(segment.raw, segment.label).map(|menu| DayMenu {
        weekday: segment.weekday,
        label: segment.label.to_string(),
        menu,
    })
}

fn strip_label<'a>(raw: &'a str, label: &str) -> Option<&'a str> {
    let end = rfind_ci(raw, label)?.end;
    let rest = raw[end..].trim_start_matches([' ', '\u{a0}']);
    Some(match rest.strip_prefix(LABEL_SEPARATORS) {
        Some(after) => after,
        None => rest,
    })
}

/// Entity decoding, trimming, `<br>` line breaks and whitespace collapsing.
/// Idempotent only on output that has no entity left after one decode: a
/// doubly escaped `&amp;lt;` comes out as `&lt;` and decodes again on a second pass.
pub fn clean_menu_text(text: &str) -> String {
    let decoded = html_escape::decode_html_entities(text);
    let trimmed = decoded.trim().trim_start_matches('\n');
    let with_breaks = trimmed.replace('\n', LINE_BREAK);
    RE_WHITESPACE.replace_all(&with_breaks, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_page;
    use crate::types::Weekday;
    use url::Url;

    #[test]
    fn test_strips_label_and_separator() {
        let menu = sanitize("Måndag: Fisk  \n\nSoppa", "Måndag").unwrap();
        assert_eq!(menu, "Fisk <br><br>Soppa");
        assert!(!menu.contains(':'));
    }

    #[test]
    fn test_label_match_ignores_case() {
        assert_eq!(sanitize("MÅNDAG Fisk", "måndag").unwrap(), "Fisk");
        assert_eq!(sanitize("tisdag – Pasta", "Tisdag").unwrap(), "Pasta");
    }

    #[test]
    fn test_keeps_only_text_after_last_label() {
        let raw = "Fredag (se även fredag nästa vecka)\nFREDAG\nTacos";
        assert_eq!(sanitize(raw, "fredag").unwrap(), "Tacos");
    }

    #[test]
    fn test_newlines_become_line_breaks() {
        let menu = sanitize("Onsdag\nPannkakor\nSylt\n", "onsdag").unwrap();
        assert_eq!(menu, "Pannkakor<br>Sylt");
    }

    #[test]
    fn test_decodes_entities() {
        let menu = sanitize("Torsdag\nFish &amp; chips&nbsp;med r&auml;ksallad", "torsdag").unwrap();
        assert_eq!(menu, "Fish & chips med räksallad");
    }

    #[test]
    fn test_rejects_blank_segment() {
        assert_eq!(sanitize("  \n\t ", "måndag"), Err(DayMenuError::EmptyMenu));
    }

    #[test]
    fn test_rejects_segment_without_label() {
        assert_eq!(sanitize("Köttbullar", "måndag"), Err(DayMenuError::NotWeeklyMenu));
    }

    #[test]
    fn test_rejects_label_without_menu() {
        assert_eq!(sanitize("Fredag\n   \n\n", "fredag"), Err(DayMenuError::EmptyMenu));
        assert_eq!(sanitize("Fredag:", "fredag"), Err(DayMenuError::EmptyMenu));
    }

    #[test]
    fn test_rejects_label_revealed_by_decoding() {
        let raw = "Måndag\nStängt, öppet tis&#100;ag";
        assert_eq!(sanitize(raw, "tisdag"), Err(DayMenuError::NotWeeklyMenu));
        let raw = "Tisdag\nStängt, öppet tis&#100;ag";
        assert_eq!(sanitize(raw, "tisdag"), Err(DayMenuError::LabelNotStripped));
    }

    #[test]
    fn test_clean_menu_text_is_idempotent() {
        let inputs = [
            "  Fisk  \n\nSoppa ",
            "Pasta &amp; sallad\n\tKaffe",
            "\n\nKöttbullar\r\nLingon",
            "Fisk <br><br>Soppa",
        ];
        for input in inputs {
            let once = clean_menu_text(input);
            assert_eq!(clean_menu_text(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_parsed_page_entities_are_decoded_once() {
        let url = Url::parse("https://krogen.example.se/lunch").unwrap();
        let page = parse_page(
            "<p>Måndag</p><p>Skriv &amp;lt;3 till oss</p><p>Fish &amp; chips</p>",
            &url,
        );

        let menu = sanitize(&page.text, "måndag").unwrap();
        assert_eq!(menu, "Skriv &lt;3 till oss<br>Fish & chips");
    }

    #[test]
    fn test_sanitize_day_builds_day_menu() {
        let segment = DaySegment {
            weekday: Weekday::Wednesday,
            label: "onsdag",
            raw: "Onsdag\nÄrtsoppa &amp; pannkakor\n",
        };
        let menu = sanitize_day(&segment).unwrap();
        assert_eq!(menu.weekday, Weekday::Wednesday);
        assert_eq!(menu.label, "onsdag");
        assert_eq!(menu.menu, "Ärtsoppa & pannkakor");
    }
}
