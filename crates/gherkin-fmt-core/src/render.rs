use std::collections::BTreeMap;

use gherkin_fmt_config::IndentConfig;
use gherkin_fmt_parser::TokenKind;

use crate::command::CommandPipeline;
use crate::error::FormatResult;
use crate::section::{Direction, Section, SectionChain};
use crate::table;

/// Kinds looked past when resolving context: blank lines, tags and comments
/// say nothing about where their neighbors sit.
const NOISE: [TokenKind; 3] = [TokenKind::Empty, TokenKind::TagLine, TokenKind::Comment];

/// Walk the chain once, in order, rendering each section and threading the
/// single pending-command slot. Returns the assembled document: lines joined
/// with `\n`, no forced trailing newline.
pub fn transform(
    chain: &SectionChain,
    indent: &IndentConfig,
    commands: &BTreeMap<String, String>,
) -> FormatResult<String> {
    let mut document: Vec<String> = Vec::new();
    let mut pipeline = CommandPipeline::new(commands);

    for (index, section) in chain.sections().iter().enumerate() {
        let padding = section_padding(chain, index, section, indent);
        let lines = extract_lines(chain, index, section)?;

        let lines = match section.kind {
            TokenKind::Comment => {
                // Each comment line resets the slot in turn; only the last
                // one's directive (if any) stays armed.
                for token in &section.values {
                    pipeline.observe_comment(&token.text);
                }
                lines
            }
            // Separators bound doc-string content and are never substituted;
            // a pending command passes over them onto the fenced block.
            TokenKind::DocStringSeparator => lines,
            _ => pipeline.apply(lines)?,
        };

        for line in lines {
            document.push(indent_and_trim(padding, &line));
        }
    }

    Ok(document.join("\n"))
}

fn padding_for_kind(kind: TokenKind, indent: &IndentConfig) -> usize {
    match kind {
        TokenKind::BackgroundLine | TokenKind::ScenarioLine => indent.background_and_scenario,
        TokenKind::StepLine | TokenKind::ExamplesLine => indent.step,
        TokenKind::DocStringSeparator
        | TokenKind::RuleLine
        | TokenKind::TableRow
        | TokenKind::Other => indent.table_and_doc_string,
        TokenKind::FeatureLine
        | TokenKind::TagLine
        | TokenKind::Comment
        | TokenKind::Empty => 0,
    }
}

fn section_padding(
    chain: &SectionChain,
    index: usize,
    section: &Section,
    indent: &IndentConfig,
) -> usize {
    match section.kind {
        // Tags and comments adopt the level of the closest real neighbor,
        // preferring the one that follows.
        TokenKind::TagLine | TokenKind::Comment => chain
            .nearest(index, &NOISE, Direction::Forward)
            .or_else(|| chain.nearest(index, &NOISE, Direction::Backward))
            .map(|neighbor| padding_for_kind(neighbor.kind, indent))
            .unwrap_or(0),
        kind => padding_for_kind(kind, indent),
    }
}

/// Per-kind line extraction; one pure rule per variant.
fn extract_lines(
    chain: &SectionChain,
    index: usize,
    section: &Section,
) -> FormatResult<Vec<String>> {
    let values = &section.values;

    let lines = match section.kind {
        TokenKind::FeatureLine
        | TokenKind::BackgroundLine
        | TokenKind::ScenarioLine
        | TokenKind::ExamplesLine => {
            vec![format!("{}: {}", values[0].keyword, values[0].text)]
        }
        TokenKind::DocStringSeparator | TokenKind::RuleLine => vec![values[0].keyword.clone()],
        TokenKind::StepLine => values
            .iter()
            .map(|token| format!("{}{}", token.keyword, token.text))
            .collect(),
        TokenKind::Comment => values
            .iter()
            .map(|token| token.text.trim().to_string())
            .collect(),
        TokenKind::TagLine | TokenKind::Empty => {
            values.iter().map(|token| token.items.join(" ")).collect()
        }
        TokenKind::Other => {
            let lines: Vec<String> = values.iter().map(|token| token.text.clone()).collect();
            if is_feature_description(chain, index) {
                lines.iter().map(|line| line.trim().to_string()).collect()
            } else {
                lines
            }
        }
        TokenKind::TableRow => {
            let rows: Vec<Vec<String>> = values.iter().map(|token| token.items.clone()).collect();
            table::format_rows(&rows)?
        }
    };

    Ok(lines)
}

/// Description text directly under the feature header is re-flowed flush;
/// body text elsewhere is left as authored.
fn is_feature_description(chain: &SectionChain, index: usize) -> bool {
    chain
        .nearest(index, &[TokenKind::Empty], Direction::Backward)
        .map(|section| section.kind == TokenKind::FeatureLine)
        .unwrap_or(false)
}

fn indent_and_trim(padding: usize, line: &str) -> String {
    let mut indented = " ".repeat(padding);
    indented.push_str(line);
    indented.trim_end_matches(&[' ', '\t'][..]).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gherkin_fmt_parser::{scan, Dialect};

    fn render(doc: &str) -> String {
        let chain = SectionChain::build(scan(doc, &Dialect::default()));
        transform(&chain, &IndentConfig::default(), &BTreeMap::new()).unwrap()
    }

    #[test]
    fn feature_header_renders_at_zero_indent() {
        assert_eq!(render("  Feature:   Set api"), "Feature: Set api");
    }

    #[test]
    fn step_renders_at_step_indent() {
        assert_eq!(
            render("Then match some JSON properties"),
            "    Then match some JSON properties"
        );
    }

    #[test]
    fn doc_string_separator_renders_keyword_alone() {
        assert_eq!(render("\"\"\"json"), "      \"\"\"");
    }

    #[test]
    fn tag_line_prefers_the_following_neighbor() {
        assert_eq!(render("@wip\nScenario: x"), "  @wip\n  Scenario: x");
    }

    #[test]
    fn tag_line_falls_back_to_the_preceding_neighbor() {
        assert_eq!(
            render("Given a\n\n@wip"),
            "    Given a\n\n    @wip"
        );
    }

    #[test]
    fn dangling_tag_line_sits_at_zero() {
        assert_eq!(render("@wip"), "@wip");
    }

    #[test]
    fn feature_description_is_trimmed_then_indented() {
        assert_eq!(
            render("Feature: x\n   described loosely   "),
            "Feature: x\n      described loosely"
        );
    }

    #[test]
    fn body_text_elsewhere_keeps_its_own_shape() {
        // Description under a scenario is not re-flowed; only right-trimmed
        // and indented.
        assert_eq!(
            render("Scenario: x\nfree text"),
            "  Scenario: x\n      free text"
        );
    }

    #[test]
    fn empty_lines_carry_no_padding() {
        assert_eq!(render("Feature: x\n\nScenario: y"), "Feature: x\n\n  Scenario: y");
    }
}
