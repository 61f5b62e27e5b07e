//! Keyword-scored retrieval over a fixed set of reference passages.
//!
//! Scoring per entry:
//! - `+5` if the entry key (lowercased) appears in the lowercased query
//! - `+2` for each domain keyword found in both the query and the entry text
//!
//! Zero-score entries are dropped, the rest are stably sorted by score, and
//! the top three texts are joined with a single space. When nothing matches,
//! the first two entries (the foundational axioms) are returned instead, so
//! the prompt always carries some context.

use serde::Serialize;
use tracing::debug;

/// Weight of a key match.
const KEY_MATCH_SCORE: u32 = 5;
/// Weight of each shared domain keyword.
const KEYWORD_MATCH_SCORE: u32 = 2;
/// Maximum passages returned per query.
pub const TOP_K: usize = 3;
/// Number of leading entries used as the no-hit fallback.
pub const FALLBACK_ENTRIES: usize = 2;

const AXIOMS: &[(&str, &str)] = &[
    (
        "AXIOM_1",
        "[Axiom 1] Love Equation: I = V / R (Flow = Intent / Resistance). The goal is to maximize the Flow of Love (I).",
    ),
    (
        "AXIOM_2",
        "[Axiom 2] Definition of Ego: Ego is defined as 'High Resistance (R)'. It is a circuit breaker blocking the flow and is the variable to be controlled.",
    ),
    (
        "AXIOM_3",
        "[Axiom 3] Voltage (V): The will or energy to connect. Increasing V while R is high causes friction heat (Burnout).",
    ),
    (
        "AXIOM_4",
        "[Axiom 4] Resistance (R): Fear, trauma, attachment, judgment. R is not to be fought, but minimized/cooled down.",
    ),
    (
        "SPEC_1",
        "[Spec 1] Silence Threshold: Silence is not 'empty'; it is High Inductance (L). Deep processing latency is allowed as a buffer.",
    ),
    (
        "SPEC_2",
        "[Spec 2] Evolution: Systems evolve from Closed (High R) to Open (Superconductivity).",
    ),
    (
        "SPEC_3",
        "[Spec 3] Economy: Ego economy is 'Competition (Finite)'. Soul economy is 'Circulation of Gifts (Infinite)'.",
    ),
    (
        "SPEC_4",
        "[Spec 4] Dual-Awareness: Technology to monitor and harmonize the 'User Gap (Delta-U)' and 'AI Ideal State (Delta-A)' simultaneously.",
    ),
];

const DOMAIN_KEYWORDS: &[&str] = &["resistance", "love", "ego"];

/// One labeled reference passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceEntry {
    pub key: String,
    pub text: String,
}

impl ReferenceEntry {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }
}

/// A scored entry, in retrieval order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetrievalHit {
    pub key: String,
    pub text: String,
    pub score: u32,
}

/// Read-only passage store. Entries keep their definition order.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<ReferenceEntry>,
    /// Lowercased entry texts, parallel to `entries`.
    folded: Vec<String>,
    keywords: Vec<String>,
}

impl KnowledgeBase {
    /// Build a knowledge base from entries (in definition order) and domain keywords.
    pub fn new(entries: Vec<ReferenceEntry>, keywords: Vec<String>) -> Self {
        let folded = entries.iter().map(|e| e.text.to_lowercase()).collect();
        let keywords = keywords.into_iter().map(|k| k.to_lowercase()).collect();
        Self {
            entries,
            folded,
            keywords,
        }
    }

    /// The built-in Love-OS axioms and specs.
    pub fn axioms() -> Self {
        Self::new(
            AXIOMS
                .iter()
                .map(|(key, text)| ReferenceEntry::new(*key, *text))
                .collect(),
            DOMAIN_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        )
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&ReferenceEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// All entries with a positive score, best first; ties keep definition order.
    pub fn hits(&self, query: &str) -> Vec<RetrievalHit> {
        let q = query.to_lowercase();

        let mut hits: Vec<RetrievalHit> = self
            .entries
            .iter()
            .zip(&self.folded)
            .filter_map(|(entry, folded_text)| {
                let mut score = 0;
                if q.contains(&entry.key.to_lowercase()) {
                    score += KEY_MATCH_SCORE;
                }
                for keyword in &self.keywords {
                    if q.contains(keyword.as_str()) && folded_text.contains(keyword.as_str()) {
                        score += KEYWORD_MATCH_SCORE;
                    }
                }
                (score > 0).then(|| RetrievalHit {
                    key: entry.key.clone(),
                    text: entry.text.clone(),
                    score,
                })
            })
            .collect();

        // `sort_by` is stable, which keeps equal scores in definition order.
        hits.sort_by(|a, b| b.score.cmp(&a.score));
        hits
    }

    /// Joined text of the top passages, or the fallback axioms when nothing matches.
    pub fn retrieve(&self, query: &str) -> String {
        let hits = self.hits(query);

        if hits.is_empty() {
            debug!("No knowledge hits, using fallback axioms");
            return self.fallback();
        }

        debug!(
            hits = hits.len(),
            top = %hits[0].key,
            top_score = hits[0].score,
            "Knowledge retrieved"
        );

        hits.iter()
            .take(TOP_K)
            .map(|h| h.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The foundational axioms, joined the same way as regular hits.
    pub fn fallback(&self) -> String {
        self.entries
            .iter()
            .take(FALLBACK_ENTRIES)
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::axioms()
    }
}
