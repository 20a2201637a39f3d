//! Tracking codes: generation and lookup.
//!
//! RULE: A tracking code is assigned once at submission and never changes.
//! Codes are drawn from an alphabet without look-alike characters
//! (no 0/O, no 1/I) so citizens can read them back over the phone.

use crate::{complaint::Complaint, config::TrackingConfig, types::TrackingCode};
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;
use uuid::Uuid;

const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const HYPHENATED_LEN: usize = 36;

/// Produces `PREFIX` + N random characters, e.g. `CMP-7KQ2M9XD`.
///
/// Seeded generators are fully reproducible, which the tests rely on.
/// Uniqueness is not guaranteed here; the desk checks the store and
/// draws again on collision.
pub struct TrackingCodeGenerator {
    prefix: String,
    length: usize,
    inner:  Pcg64Mcg,
}

impl TrackingCodeGenerator {
    pub fn new(config: &TrackingConfig) -> Self {
        let inner = match config.seed {
            Some(seed) => Pcg64Mcg::seed_from_u64(seed),
            None => Pcg64Mcg::from_entropy(),
        };
        Self {
            prefix: config.prefix.clone(),
            length: config.length,
            inner,
        }
    }

    pub fn next_code(&mut self) -> TrackingCode {
        let mut code = String::with_capacity(self.prefix.len() + self.length);
        code.push_str(&self.prefix);
        for _ in 0..self.length {
            let idx = (self.inner.next_u64() % ALPHABET.len() as u64) as usize;
            code.push(char::from(ALPHABET[idx]));
        }
        code
    }
}

/// A parsed tracking-page query.
///
/// Every query is matched as a tracking-code fragment. A query that is
/// a hyphenated UUID is additionally matched against complaint ids.
/// Anything else never reaches the id column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupQuery {
    fragment: String,
    id:       Option<Uuid>,
}

impl LookupQuery {
    /// Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            fragment: trimmed.to_lowercase(),
            id:       parse_hyphenated(trimmed),
        })
    }

    /// Lower-cased text for case-insensitive tracking-code matching.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Hyphenated lower-case form of the id, if the query was one.
    pub fn id(&self) -> Option<String> {
        self.id.map(|u| u.hyphenated().to_string())
    }

    pub fn matches_id(&self, complaint: &Complaint) -> bool {
        self.id()
            .is_some_and(|id| complaint.id.eq_ignore_ascii_case(&id))
    }

    pub fn matches_tracking_code(&self, complaint: &Complaint) -> bool {
        complaint.tracking_id.to_lowercase().contains(&self.fragment)
    }
}

/// Complaint ids are stored in the 36-character hyphenated form only.
/// Simple, braced and `urn:uuid:` spellings stay plain fragments.
fn parse_hyphenated(text: &str) -> Option<Uuid> {
    if text.len() != HYPHENATED_LEN {
        return None;
    }
    Uuid::parse_str(text).ok()
}

/// In-memory lookup. An exact id hit wins over a tracking-code fragment
/// hit; otherwise the first fragment hit in input order is returned.
pub fn find_complaint<'a>(all: &'a [Complaint], query: &LookupQuery) -> Option<&'a Complaint> {
    all.iter()
        .find(|c| query.matches_id(c))
        .or_else(|| all.iter().find(|c| query.matches_tracking_code(c)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_generators_agree() {
        let config = TrackingConfig { seed: Some(7), ..TrackingConfig::default() };
        let mut a = TrackingCodeGenerator::new(&config);
        let mut b = TrackingCodeGenerator::new(&config);
        for _ in 0..20 {
            assert_eq!(a.next_code(), b.next_code());
        }
    }

    #[test]
    fn codes_have_prefix_length_and_alphabet() {
        let config = TrackingConfig {
            prefix: "TRK-".into(),
            length: 10,
            seed: Some(99),
        };
        let mut codes = TrackingCodeGenerator::new(&config);
        for _ in 0..100 {
            let code = codes.next_code();
            let body = code.strip_prefix("TRK-").expect("prefix");
            assert_eq!(body.len(), 10, "{code}");
            assert!(body.bytes().all(|b| ALPHABET.contains(&b)), "{code}");
        }
    }

    #[test]
    fn blank_query_is_none() {
        assert!(LookupQuery::parse("").is_none());
        assert!(LookupQuery::parse("   \t").is_none());
    }

    #[test]
    fn only_well_formed_uuids_become_ids() {
        let q = LookupQuery::parse("3F2504E0-4F89-41D3-9A0C-0305E82C3301").unwrap();
        assert_eq!(q.id().as_deref(), Some("3f2504e0-4f89-41d3-9a0c-0305e82c3301"));

        // 36 characters, but not a UUID.
        let q = LookupQuery::parse("zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz").unwrap();
        assert_eq!(q.id(), None);

        for other_form in [
            "3f2504e04f8941d39a0c0305e82c3301",
            "{3f2504e0-4f89-41d3-9a0c-0305e82c3301}",
            "urn:uuid:3f2504e0-4f89-41d3-9a0c-0305e82c3301",
        ] {
            let q = LookupQuery::parse(other_form).unwrap();
            assert_eq!(q.id(), None, "{other_form}");
        }

        let q = LookupQuery::parse(" cmp-7k ").unwrap();
        assert_eq!(q.id(), None);
        assert_eq!(q.fragment(), "cmp-7k");
    }
}
