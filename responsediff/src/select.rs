use scraper::{Html, Selector};

use crate::error::{Error, Result};

/// Separator between matched elements in a selected fixture.
pub const ELEMENT_SEPARATOR: &str = "\n---\n";

/// Outer HTML of every element matching `selector`, in document order.
pub fn select_html(html: &str, selector: &str) -> Result<String> {
    let parsed = Selector::parse(selector)
        .map_err(|e| Error::InvalidSelector(format!("{}: {:?}", selector, e)))?;
    let document = Html::parse_document(html);

    let elements: Vec<String> = document
        .select(&parsed)
        .map(|element| element.html())
        .collect();

    Ok(elements.join(ELEMENT_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_joins_matches() {
        let html = r#"
        <html>
        <head><title>Site</title></head>
        <body>
            <header>navigation</header>
            <h1>Title</h1>
            <p>First</p>
            <p>Second</p>
        </body>
        </html>
        "#;

        let selected = select_html(html, "h1, p").unwrap();
        assert_eq!(selected, "<h1>Title</h1>\n---\n<p>First</p>\n---\n<p>Second</p>");
    }

    #[test]
    fn test_select_without_match_is_empty() {
        assert_eq!(select_html("<p>text</p>", "h1").unwrap(), "");
    }

    #[test]
    fn test_invalid_selector() {
        let result = select_html("<p>text</p>", "p[");
        assert!(matches!(result, Err(Error::InvalidSelector(_))));
    }
}
