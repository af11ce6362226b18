use crate::core::error::{MalformedPreferenceError, Side};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// A one-to-one assignment of proposers to responders
///
/// Proposers keep their insertion order. Every proposer present maps to a
/// responder or to nothing; the inverse index always agrees with the forward
/// assignments, so no responder is held by two proposers.
#[derive(Debug, Clone, Default)]
pub struct Matching {
    entries: Vec<(String, Option<String>)>,
    proposer_index: HashMap<String, usize>,
    responder_index: HashMap<String, usize>,
}

impl Matching {
    pub fn new() -> Self {
        Self::default()
    }

    /// A matching in which every given proposer is unmatched
    pub fn unmatched<'a, I>(proposers: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut matching = Matching::new();
        for proposer in proposers {
            if !matching.proposer_index.contains_key(proposer) {
                matching
                    .proposer_index
                    .insert(proposer.to_string(), matching.entries.len());
                matching.entries.push((proposer.to_string(), None));
            }
        }
        matching
    }

    /// Build a matching from explicit assignments, rejecting repeated
    /// proposers and responders held twice
    pub fn from_assignments<I, P, R>(assignments: I) -> Result<Self, MalformedPreferenceError>
    where
        I: IntoIterator<Item = (P, Option<R>)>,
        P: Into<String>,
        R: Into<String>,
    {
        let mut matching = Matching::new();
        for (proposer, responder) in assignments {
            let proposer = proposer.into();
            if matching.proposer_index.contains_key(&proposer) {
                return Err(MalformedPreferenceError::DuplicateAgent {
                    side: Side::Proposer,
                    agent: proposer,
                });
            }

            let position = matching.entries.len();
            let responder = responder.map(Into::into);
            if let Some(responder) = &responder {
                if let Some(&holder) = matching.responder_index.get(responder) {
                    return Err(MalformedPreferenceError::ResponderAssignedTwice {
                        responder: responder.clone(),
                        first: matching.entries[holder].0.clone(),
                        second: proposer,
                    });
                }
                matching.responder_index.insert(responder.clone(), position);
            }

            matching.proposer_index.insert(proposer.clone(), position);
            matching.entries.push((proposer, responder));
        }
        Ok(matching)
    }

    /// Build a matching from matched pairs only
    pub fn from_pairs<I, P, R>(pairs: I) -> Result<Self, MalformedPreferenceError>
    where
        I: IntoIterator<Item = (P, R)>,
        P: Into<String>,
        R: Into<String>,
    {
        Self::from_assignments(pairs.into_iter().map(|(p, r)| (p, Some(r))))
    }

    /// Number of proposers present, matched or not
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn matched_count(&self) -> usize {
        self.responder_index.len()
    }

    pub fn contains_proposer(&self, proposer: &str) -> bool {
        self.proposer_index.contains_key(proposer)
    }

    pub fn partner_of(&self, proposer: &str) -> Option<&str> {
        let &idx = self.proposer_index.get(proposer)?;
        self.entries[idx].1.as_deref()
    }

    pub fn proposer_of(&self, responder: &str) -> Option<&str> {
        self.responder_index
            .get(responder)
            .map(|&idx| self.entries[idx].0.as_str())
    }

    /// All proposers in insertion order with their partner, if any
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(proposer, responder)| (proposer.as_str(), responder.as_deref()))
    }

    /// Matched pairs in proposer order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .filter_map(|(proposer, responder)| responder.map(|r| (proposer, r)))
    }

    pub fn unmatched_proposers(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, responder)| responder.is_none())
            .map(|(proposer, _)| proposer)
    }

    /// Pair `proposer` with `responder`, adding the proposer if absent.
    ///
    /// The proposer's previous partner becomes free. Returns the proposer
    /// that previously held `responder`, which is now unmatched.
    pub(crate) fn assign(&mut self, proposer: &str, responder: &str) -> Option<String> {
        let position = match self.proposer_index.get(proposer) {
            Some(&idx) => idx,
            None => {
                self.proposer_index
                    .insert(proposer.to_string(), self.entries.len());
                self.entries.push((proposer.to_string(), None));
                self.entries.len() - 1
            }
        };

        if let Some(previous) = self.entries[position].1.take() {
            self.responder_index.remove(&previous);
        }

        let displaced = self
            .responder_index
            .insert(responder.to_string(), position)
            .filter(|&holder| holder != position)
            .map(|holder| {
                self.entries[holder].1 = None;
                self.entries[holder].0.clone()
            });

        self.entries[position].1 = Some(responder.to_string());
        displaced
    }

    /// A copy in which `first` and `second` exchange partners.
    ///
    /// Returns `None` when either proposer is absent.
    pub fn swapped(&self, first: &str, second: &str) -> Option<Matching> {
        let &a = self.proposer_index.get(first)?;
        let &b = self.proposer_index.get(second)?;

        let mut swapped = self.clone();
        let first_partner = swapped.entries[a].1.take();
        let second_partner = swapped.entries[b].1.take();

        if let Some(responder) = &second_partner {
            swapped.responder_index.insert(responder.clone(), a);
        }
        if let Some(responder) = &first_partner {
            swapped.responder_index.insert(responder.clone(), b);
        }
        swapped.entries[a].1 = second_partner;
        swapped.entries[b].1 = first_partner;
        Some(swapped)
    }
}

/// Equal when every proposer has the same partner, regardless of order
impl PartialEq for Matching {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|(proposer, responder)| {
                other.contains_proposer(proposer) && other.partner_of(proposer) == responder
            })
    }
}

impl Eq for Matching {}

impl fmt::Display for Matching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (proposer, responder)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match responder {
                Some(responder) => write!(f, "{}->{}", proposer, responder)?,
                None => write!(f, "{}->_", proposer)?,
            }
        }
        Ok(())
    }
}

impl Serialize for Matching {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (proposer, responder) in &self.entries {
            map.serialize_entry(proposer, responder)?;
        }
        map.end()
    }
}

struct MatchingVisitor;

impl<'de> Visitor<'de> for MatchingVisitor {
    type Value = Matching;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map from proposer id to responder id or null")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
        let mut assignments = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(entry) = access.next_entry::<String, Option<String>>()? {
            assignments.push(entry);
        }
        Matching::from_assignments(assignments).map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Matching {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MatchingVisitor)
    }
}
