//! Page bookkeeping for placeholder paragraphs.
//!
//! Some paragraphs cannot be drawn when they are laid out: the current page
//! number, the total page count, and links to anchored pages are only known
//! once the whole document is paginated. Those paragraphs record where their
//! text would have gone, and a later pass fills it in.

use serde_json::Value;
use tracing::debug;

use folio_core::logging::targets;

use crate::text::DocumentId;
use crate::types::Point;

/// Identifier of a page within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PageId(pub u32);

/// Position of a page-number placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct PageData {
    pub origin: Point,
    pub page: PageId,
    pub width: f32,
}

/// Position of a page-count placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct PageCountData {
    pub origin: Point,
    pub document: DocumentId,
    pub page: PageId,
    pub width: f32,
}

/// A page that link paragraphs can refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNumberData {
    pub page: PageId,
    /// Evaluated anchor value, matched against link reference values.
    pub text_value: String,
}

/// Position and target of a page-number link.
#[derive(Debug, Clone, PartialEq)]
pub struct PageNumberLinkData {
    pub origin: Point,
    pub page: PageId,
    pub width: f32,
    /// Evaluated link value.
    pub text_value: String,
    /// Unevaluated link expression.
    pub reference_value: String,
    /// Link text for document links.
    pub message: Option<String>,
}

/// Receives page bookkeeping records.
pub trait PageRecorder {
    /// Record a page-number placeholder.
    fn record_page_number(&mut self, data: PageData);

    /// Record a page-count placeholder.
    fn record_page_count(&mut self, data: PageCountData);

    /// Record an anchored page.
    fn record_anchor(&mut self, data: PageNumberData);

    /// Record a page-number link.
    fn record_link(&mut self, data: PageNumberLinkData);
}

/// A recorder that keeps every record in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingPages {
    pub page_numbers: Vec<PageData>,
    pub page_counts: Vec<PageCountData>,
    pub anchors: Vec<PageNumberData>,
    pub links: Vec<PageNumberLinkData>,
}

impl RecordingPages {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.page_numbers.is_empty()
            && self.page_counts.is_empty()
            && self.anchors.is_empty()
            && self.links.is_empty()
    }
}

impl PageRecorder for RecordingPages {
    fn record_page_number(&mut self, data: PageData) {
        debug!(target: targets::PAGES, page = data.page.0, "recorded page number placeholder");
        self.page_numbers.push(data);
    }

    fn record_page_count(&mut self, data: PageCountData) {
        debug!(target: targets::PAGES, page = data.page.0, "recorded page count placeholder");
        self.page_counts.push(data);
    }

    fn record_anchor(&mut self, data: PageNumberData) {
        debug!(target: targets::PAGES, page = data.page.0, value = %data.text_value, "recorded anchor");
        self.anchors.push(data);
    }

    fn record_link(&mut self, data: PageNumberLinkData) {
        debug!(target: targets::PAGES, page = data.page.0, value = %data.text_value, "recorded link");
        self.links.push(data);
    }
}

/// Evaluates the dynamic values of anchors and links.
pub trait ExpressionEvaluator {
    /// Evaluate `expression` against `data`.
    fn evaluate(&self, expression: &str, data: &Value) -> String;

    /// Whether an anchor's `condition` holds for the item named `var`.
    fn condition(&self, condition: Option<&str>, var: Option<&str>, data: &Value) -> bool;
}

/// Evaluator substituting `${path.to.value}` placeholders from JSON data.
///
/// Paths are dot-separated object keys or array indices. Missing values
/// evaluate to the empty string. A condition holds when it is absent, or when
/// it evaluates (within `data[var]` if `var` is given) to something other than
/// an empty string, `false` or `0`. A leading `!` negates it.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPathEvaluator;

impl JsonPathEvaluator {
    fn lookup<'v>(data: &'v Value, path: &str) -> Option<&'v Value> {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(data, |value, segment| match value {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }

    fn render(value: &Value) -> String {
        match value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl ExpressionEvaluator for JsonPathEvaluator {
    fn evaluate(&self, expression: &str, data: &Value) -> String {
        let mut output = String::with_capacity(expression.len());
        let mut rest = expression;

        while let Some(open) = rest.find("${") {
            let Some(close) = rest[open + 2..].find('}') else {
                break;
            };
            output.push_str(&rest[..open]);
            let path = rest[open + 2..open + 2 + close].trim();
            if let Some(value) = Self::lookup(data, path) {
                output.push_str(&Self::render(value));
            }
            rest = &rest[open + 2 + close + 1..];
        }
        output.push_str(rest);
        output
    }

    fn condition(&self, condition: Option<&str>, var: Option<&str>, data: &Value) -> bool {
        let Some(condition) = condition.map(str::trim).filter(|c| !c.is_empty()) else {
            return true;
        };
        let scope = match var {
            Some(var) => Self::lookup(data, var).unwrap_or(&Value::Null),
            None => data,
        };

        let (negate, expression) = match condition.strip_prefix('!') {
            Some(expression) => (true, expression),
            None => (false, condition),
        };
        let value = self.evaluate(expression, scope);
        let holds = !matches!(value.trim(), "" | "false" | "0");
        holds != negate
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_evaluate_substitutes_paths() {
        let data = json!({ "chapter": { "id": "intro", "number": 3 }, "tags": ["a", "b"] });
        let evaluator = JsonPathEvaluator;

        assert_eq!(evaluator.evaluate("${chapter.id}", &data), "intro");
        assert_eq!(evaluator.evaluate("Chapter ${chapter.number}", &data), "Chapter 3");
        assert_eq!(evaluator.evaluate("${tags.1}-${missing}", &data), "b-");
        assert_eq!(evaluator.evaluate("literal", &data), "literal");
        assert_eq!(evaluator.evaluate("open ${never", &data), "open ${never");
    }

    #[test]
    fn test_condition() {
        let data = json!({ "item": { "visible": true, "hidden": false, "count": 0 } });
        let evaluator = JsonPathEvaluator;

        assert!(evaluator.condition(None, None, &data));
        assert!(evaluator.condition(Some("${visible}"), Some("item"), &data));
        assert!(!evaluator.condition(Some("${hidden}"), Some("item"), &data));
        assert!(!evaluator.condition(Some("${count}"), Some("item"), &data));
        assert!(evaluator.condition(Some("!${hidden}"), Some("item"), &data));
        assert!(!evaluator.condition(Some("${item.visible}"), Some("absent"), &data));
    }

    #[test]
    fn test_recording_pages() {
        let mut pages = RecordingPages::new();
        assert!(pages.is_empty());

        pages.record_anchor(PageNumberData {
            page: PageId(4),
            text_value: "intro".to_string(),
        });
        assert_eq!(pages.anchors.len(), 1);
        assert!(!pages.is_empty());
    }
}
