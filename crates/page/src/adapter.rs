use crate::error::{PageError, PageResult};
use crate::text::{is_visible, rendered_text};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Reads the three regions of an exercise page. Implementations return text
/// already trimmed, or `None` when the region is not present.
pub trait PageAdapter {
    fn extract_problem(&self) -> Option<String>;
    fn extract_code(&self) -> Option<String>;
    /// Only an error that is currently shown counts.
    fn extract_error(&self) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSelectors {
    pub problem: String,
    pub code: String,
    pub error: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            problem: "div.question-content-container".to_string(),
            code: "div.view-lines".to_string(),
            error: "div.actual-output-box".to_string(),
        }
    }
}

impl PageSelectors {
    pub fn compile(&self) -> PageResult<CompiledSelectors> {
        Ok(CompiledSelectors {
            problem: parse_selector("problem", &self.problem)?,
            code: parse_selector("code", &self.code)?,
            error: parse_selector("error", &self.error)?,
            source: self.clone(),
        })
    }
}

fn parse_selector(region: &'static str, selector: &str) -> PageResult<Selector> {
    Selector::parse(selector).map_err(|e| PageError::InvalidSelector {
        region,
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    problem: Selector,
    code: Selector,
    error: Selector,
    source: PageSelectors,
}

impl CompiledSelectors {
    pub fn source(&self) -> &PageSelectors {
        &self.source
    }
}

/// CSS-selector adapter over a parsed HTML document.
pub struct SelectorAdapter<'a> {
    document: Html,
    selectors: &'a CompiledSelectors,
}

impl<'a> SelectorAdapter<'a> {
    pub fn parse(html: &str, selectors: &'a CompiledSelectors) -> Self {
        Self {
            document: Html::parse_document(html),
            selectors,
        }
    }
}

impl PageAdapter for SelectorAdapter<'_> {
    fn extract_problem(&self) -> Option<String> {
        let element = self.document.select(&self.selectors.problem).next();
        if element.is_none() {
            warn!(
                "Selector not found for PROBLEM: {:?}",
                self.selectors.source.problem
            );
        }
        element.map(rendered_text)
    }

    fn extract_code(&self) -> Option<String> {
        let element = self.document.select(&self.selectors.code).next();
        if element.is_none() {
            warn!("Selector not found for CODE: {:?}", self.selectors.source.code);
        }
        element.map(rendered_text)
    }

    fn extract_error(&self) -> Option<String> {
        match self.document.select(&self.selectors.error).next() {
            Some(element) if is_visible(element) => Some(rendered_text(element)),
            _ => {
                debug!(
                    "No visible error box found with selector {:?}",
                    self.selectors.source.error
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selectors_compile() {
        assert!(PageSelectors::default().compile().is_ok());
    }

    #[test]
    fn invalid_selector_names_its_region() {
        let selectors = PageSelectors {
            code: "div[".to_string(),
            ..PageSelectors::default()
        };
        match selectors.compile() {
            Err(PageError::InvalidSelector { region, selector, .. }) => {
                assert_eq!(region, "code");
                assert_eq!(selector, "div[");
            }
            other => panic!("expected invalid selector, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn hidden_error_box_is_not_an_error() {
        let compiled = PageSelectors::default().compile().expect("compile");
        let adapter = SelectorAdapter::parse(
            r#"<div class="actual-output-box" style="display:none">Traceback</div>"#,
            &compiled,
        );
        assert_eq!(adapter.extract_error(), None);
    }

    #[test]
    fn empty_region_is_present_but_empty() {
        let compiled = PageSelectors::default().compile().expect("compile");
        let adapter = SelectorAdapter::parse(r#"<div class="view-lines">   </div>"#, &compiled);
        assert_eq!(adapter.extract_code(), Some(String::new()));
        assert_eq!(adapter.extract_problem(), None);
    }
}
