use gherkin_fmt_parser::{Token, TokenKind};

/// One classified unit of the document: a run of adjacent tokens sharing a
/// kind. Header lines and doc-string separators never merge, so a section of
/// those kinds always holds exactly one token.
#[derive(Clone, Debug)]
pub struct Section {
    pub kind: TokenKind,
    pub values: Vec<Token>,
}

/// Ordered, index-addressable sequence of sections. Immutable once built;
/// neighbor lookups scan the index in either direction rather than chasing
/// links.
#[derive(Debug)]
pub struct SectionChain {
    sections: Vec<Section>,
}

/// Direction for a [`SectionChain::nearest`] scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl SectionChain {
    /// Group the parser's token stream into sections, preserving document
    /// order.
    pub fn build(tokens: Vec<Token>) -> Self {
        let mut sections: Vec<Section> = Vec::new();

        for token in tokens {
            let merge = match sections.last() {
                Some(last) if last.kind == token.kind => !starts_fresh(token.kind),
                _ => false,
            };

            if merge {
                if let Some(last) = sections.last_mut() {
                    last.values.push(token);
                }
            } else {
                sections.push(Section {
                    kind: token.kind,
                    values: vec![token],
                });
            }
        }

        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Find the nearest section from `index` in `direction` whose kind is not
    /// in `excluded`, or `None` when the chain is exhausted first.
    pub fn nearest(
        &self,
        index: usize,
        excluded: &[TokenKind],
        direction: Direction,
    ) -> Option<&Section> {
        match direction {
            Direction::Forward => self.sections[index + 1..]
                .iter()
                .find(|section| !excluded.contains(&section.kind)),
            Direction::Backward => self.sections[..index]
                .iter()
                .rev()
                .find(|section| !excluded.contains(&section.kind)),
        }
    }
}

/// Kinds that open a new section even when the previous token has the same
/// kind: two adjacent scenario headers are two sections, not one.
fn starts_fresh(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::FeatureLine
            | TokenKind::BackgroundLine
            | TokenKind::ScenarioLine
            | TokenKind::RuleLine
            | TokenKind::ExamplesLine
            | TokenKind::DocStringSeparator
    )
}
