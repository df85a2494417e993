//! Candidate field names for a user-typed field.

/// One way of turning user input into a schema field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateStrategy {
    /// The input as typed
    Verbatim,
    /// Input plus `Link` (`instagram` -> `instagramLink`)
    LinkSuffixed,
    /// Input lowercased
    Lowercased,
    /// Input lowercased plus `Link`
    LowercasedLinkSuffixed,
}

impl CandidateStrategy {
    /// Strategies in priority order.
    pub const ORDER: [CandidateStrategy; 4] = [
        Self::Verbatim,
        Self::LinkSuffixed,
        Self::Lowercased,
        Self::LowercasedLinkSuffixed,
    ];

    pub fn apply(&self, input: &str) -> String {
        match self {
            Self::Verbatim => input.to_string(),
            Self::LinkSuffixed => format!("{}Link", input),
            Self::Lowercased => input.to_lowercase(),
            Self::LowercasedLinkSuffixed => format!("{}Link", input.to_lowercase()),
        }
    }
}

/// Candidates in priority order, duplicates dropped after first occurrence.
pub fn candidates(input: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(CandidateStrategy::ORDER.len());
    for strategy in CandidateStrategy::ORDER {
        let candidate = strategy.apply(input);
        if !out.contains(&candidate) {
            out.push(candidate);
        }
    }
    out
}
