use std::sync::LazyLock;

use crate::fetcher::{FetchedPage, RawLink};

use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("invalid selector: anchor"));

const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style", "noscript", "template", "svg"];

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li",
    "main", "nav", "ol", "p", "pre", "section", "table", "tbody", "td", "th", "thead", "tr",
    "ul",
];

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

fn break_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn collect_visible_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            // indentation between block elements is not a line of its own
            Node::Text(text) if text.trim().is_empty() && (out.is_empty() || out.ends_with('\n')) => {}
            // kept escaped so the menu cleanup decodes entities exactly once
            Node::Text(text) => out.push_str(&html_escape::encode_text(&**text)),
            Node::Element(el) => {
                let name = el.name();
                if HIDDEN_ELEMENTS.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                let is_block = BLOCK_ELEMENTS.contains(&name);
                if is_block {
                    break_line(out);
                }
                if let Some(child) = ElementRef::wrap(child) {
                    collect_visible_text(child, out);
                }
                if is_block {
                    break_line(out);
                }
            }
            _ => {}
        }
    }
}

/// Visible text of a document, one line per block element or `<br>`.
/// `&`, `<` and `>` stay escaped as entities.
pub fn visible_text(document: &Html) -> String {
    let mut out = String::new();
    collect_visible_text(document.root_element(), &mut out);
    out
}

pub fn parse_links(document: &Html) -> Vec<RawLink> {
    document
        .select(&ANCHOR_SELECTOR)
        .map(|a| RawLink {
            href: a.value().attr("href").map(|h| h.trim().to_string()),
            text: elem_text(a),
        })
        .collect()
}

pub fn parse_page(html: &str, url: &Url) -> FetchedPage {
    let document = Html::parse_document(html);
    FetchedPage {
        url: url.clone(),
        links: parse_links(&document),
        text: visible_text(&document),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_parse_links_in_document_order() {
        let html = r#"
            <nav>
                <a href="/">Hem</a>
                <a href="/meny/lunch/">Lunch &amp; meny</a>
                <a>Ingen länk</a>
                <a href=" https://boka.example.se/ ">Boka bord</a>
            </nav>
        "#;

        let page = parse_page(html, &url("https://krogen.example.se/"));

        assert_eq!(page.links.len(), 4);
        assert_eq!(page.links[0].href.as_deref(), Some("/"));
        assert_eq!(page.links[1].text, "Lunch & meny");
        assert_eq!(page.links[2].href, None);
        assert_eq!(page.links[3].href.as_deref(), Some("https://boka.example.se/"));
    }

    #[test]
    fn test_visible_text_breaks_blocks_and_br() {
        let html = "<html><body><h2>Veckans lunch</h2><p>Måndag<br>Fisk</p><div>Tisdag</div>\
                    <span>Soppa</span></body></html>";
        let document = Html::parse_document(html);
        assert_eq!(visible_text(&document), "Veckans lunch\nMåndag\nFisk\nTisdag\nSoppa");
    }

    #[test]
    fn test_visible_text_skips_scripts_and_head() {
        let html = r#"<html><head><title>Krogen</title><style>p { color: red }</style></head>
            <body><script>var fredag = 1;</script><p>Fredag</p><noscript>Aktivera JS</noscript></body></html>"#;
        let text = visible_text(&Html::parse_document(html));
        assert!(text.contains("Fredag"));
        assert!(!text.contains("fredag = 1"));
        assert!(!text.contains("Krogen"));
        assert!(!text.contains("color"));
        assert!(!text.contains("Aktivera"));
    }

    #[test]
    fn test_visible_text_keeps_entities_escaped() {
        let html = "<p>Fisk &amp; chips</p><p>Skriv &amp;lt;3 till oss</p><p>1 &lt; 2</p>";
        let text = visible_text(&Html::parse_document(html));
        assert_eq!(text, "Fisk &amp; chips\nSkriv &amp;lt;3 till oss\n1 &lt; 2\n");
    }

    #[test]
    fn test_parse_root_page_fixture() {
        let html =
            fs::read_to_string("fixtures/root-page.html").expect("Failed to read sample HTML file");
        let page = parse_page(&html, &url("https://krogen.example.se/"));

        let lunch = page
            .links
            .iter()
            .find(|l| l.text.to_lowercase().contains("lunch"))
            .expect("Should find a lunch link");
        assert_eq!(lunch.href.as_deref(), Some("/dagens-lunch/"));
        assert!(page.text.contains("Välkommen"));
    }

    #[test]
    fn test_parse_lunch_page_fixture() {
        let html = fs::read_to_string("fixtures/lunch-page.html")
            .expect("Failed to read sample HTML file");
        let page = parse_page(&html, &url("https://krogen.example.se/dagens-lunch/"));

        for day in ["Måndag", "Tisdag", "Onsdag", "Torsdag", "Fredag"] {
            assert!(page.text.contains(day), "lunch page text should mention {day}");
        }
        assert!(page.text.contains("Köttbullar med gräddsås"));
        assert!(page.text.contains("Fish &amp; chips"));
        assert!(!page.text.contains("gtag"));
        assert!(!page.text.contains("\n\n\n"));
    }
}
