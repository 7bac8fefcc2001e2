// src/core/document.rs

use crate::core::models::PageInfo;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static META_NAMED: Lazy<Selector> = Lazy::new(|| Selector::parse("meta[name]").unwrap());

/// The parsed page. Built once per analysis and only ever read afterwards.
///
/// Parsing goes through html5ever, which recovers from any malformed or
/// truncated markup, so building a model never fails. Missing elements are
/// simply absent from the tree.
pub struct DocumentModel {
    raw: String,
    html: Html,
}

impl DocumentModel {
    pub fn parse(raw_body: &str) -> Self {
        Self {
            raw: raw_body.to_string(),
            html: Html::parse_document(raw_body),
        }
    }

    /// The unparsed body text, for checks that work on the source itself.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn select<'a, 'b>(&'a self, selector: &'b Selector) -> scraper::html::Select<'a, 'b> {
        self.html.select(selector)
    }

    pub fn select_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    pub fn exists(&self, selector: &Selector) -> bool {
        self.select_first(selector).is_some()
    }

    /// Title and meta description, the same facts the report header shows.
    pub fn page_info(&self) -> PageInfo {
        let title = self
            .select_first(&TITLE)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty());
        let description = self
            .select(&META_NAMED)
            .find(|el| el.value().attr("name").is_some_and(|n| n.eq_ignore_ascii_case("description")))
            .and_then(|el| el.value().attr("content"))
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        PageInfo { title, description }
    }
}

/// Text content of an element with surrounding whitespace removed.
pub fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// The closest element sibling before `el`, skipping text and comment nodes.
pub fn previous_element_sibling<'a>(el: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.prev_siblings().find_map(ElementRef::wrap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_markup_still_parses() {
        let doc = DocumentModel::parse("<div><span class='price'>$5<footer>unclosed");
        let footer = Selector::parse("footer").unwrap();
        assert!(doc.exists(&footer));
    }

    #[test]
    fn empty_body_yields_empty_tree() {
        let doc = DocumentModel::parse("");
        let header = Selector::parse("header").unwrap();
        assert!(!doc.exists(&header));
        assert_eq!(doc.raw(), "");
    }

    #[test]
    fn page_info_reads_title_and_description() {
        let doc = DocumentModel::parse(
            r#"<html><head><title>  Shop  </title><meta name="Description" content="Cheap stuff"></head></html>"#,
        );
        let info = doc.page_info();
        assert_eq!(info.title.as_deref(), Some("Shop"));
        assert_eq!(info.description.as_deref(), Some("Cheap stuff"));
    }

    #[test]
    fn page_info_missing_fields_are_none() {
        let info = DocumentModel::parse("<p>no head</p>").page_info();
        assert_eq!(info, PageInfo::default());
    }

    #[test]
    fn previous_sibling_skips_whitespace() {
        let doc = DocumentModel::parse("<div><b>a</b>\n   <i>b</i></div>");
        let italic = Selector::parse("i").unwrap();
        let el = doc.select_first(&italic).unwrap();
        let prev = previous_element_sibling(&el).unwrap();
        assert_eq!(prev.value().name(), "b");
    }
}
