use crate::TokenKind;

/// Keyword tables used to classify header and step lines.
///
/// Header keywords are matched against the text before the first colon; step
/// keywords are matched as line prefixes and keep their trailing space, so a
/// step token's keyword concatenates directly with its text.
#[derive(Clone, Debug)]
pub struct Dialect {
    headers: Vec<(String, TokenKind)>,
    steps: Vec<String>,
}

impl Dialect {
    /// Build a dialect from explicit keyword tables. Header keywords are
    /// matched longest-first so `Scenario Outline` wins over `Scenario`.
    pub fn new(headers: Vec<(String, TokenKind)>, steps: Vec<String>) -> Self {
        let mut headers = headers;
        headers.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        let mut steps = steps;
        steps.sort_by(|a, b| b.len().cmp(&a.len()));
        Self { headers, steps }
    }

    /// Match `line` (already left-trimmed) against the header tables,
    /// returning the kind, keyword and remainder text.
    pub(crate) fn match_header<'a>(&self, line: &'a str) -> Option<(TokenKind, &str, &'a str)> {
        for (keyword, kind) in &self.headers {
            if let Some(rest) = line.strip_prefix(keyword.as_str()) {
                if let Some(text) = rest.strip_prefix(':') {
                    return Some((*kind, keyword, text.trim()));
                }
            }
        }
        None
    }

    /// Match `line` (already left-trimmed) against the step table, returning
    /// the keyword with its trailing space and the remainder text.
    pub(crate) fn match_step<'a>(&self, line: &'a str) -> Option<(&str, &'a str)> {
        for keyword in &self.steps {
            if let Some(rest) = line.strip_prefix(keyword.as_str()) {
                return Some((keyword, rest.trim()));
            }
        }
        None
    }
}

impl Default for Dialect {
    fn default() -> Self {
        let headers = [
            ("Feature", TokenKind::FeatureLine),
            ("Background", TokenKind::BackgroundLine),
            ("Scenario", TokenKind::ScenarioLine),
            ("Example", TokenKind::ScenarioLine),
            ("Scenario Outline", TokenKind::ScenarioLine),
            ("Scenario Template", TokenKind::ScenarioLine),
            ("Examples", TokenKind::ExamplesLine),
            ("Scenarios", TokenKind::ExamplesLine),
            ("Rule", TokenKind::RuleLine),
        ]
        .into_iter()
        .map(|(keyword, kind)| (keyword.to_string(), kind))
        .collect();

        let steps = ["Given ", "When ", "Then ", "And ", "But ", "* "]
            .into_iter()
            .map(str::to_string)
            .collect();

        Self::new(headers, steps)
    }
}
