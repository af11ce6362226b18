use crate::core::error::{MalformedPreferenceError, Side};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Ranked preference lists for one side of the market
///
/// Agents keep the order in which they were defined; that order drives
/// proposal order in the engine and pair order in the enumerator. Each list
/// is most-preferred first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceTable {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl PreferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an agent and its preference list.
    ///
    /// A repeated agent is kept so that validation can report it; lookups
    /// resolve to the first definition.
    pub fn push<A, I, P>(&mut self, agent: A, preferences: I)
    where
        A: Into<String>,
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let agent = agent.into();
        let preferences = preferences.into_iter().map(Into::into).collect();
        self.index.entry(agent.clone()).or_insert(self.entries.len());
        self.entries.push((agent, preferences));
    }

    /// Builder-style variant of [`PreferenceTable::push`]
    pub fn with<A, I, P>(mut self, agent: A, preferences: I) -> Self
    where
        A: Into<String>,
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.push(agent, preferences);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, agent: &str) -> bool {
        self.index.contains_key(agent)
    }

    /// Agents in definition order
    pub fn agents(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(agent, _)| agent.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(agent, list)| (agent.as_str(), list.as_slice()))
    }

    pub fn get(&self, agent: &str) -> Option<&[String]> {
        self.index
            .get(agent)
            .map(|&idx| self.entries[idx].1.as_slice())
    }

    /// Definition position of an agent
    pub fn position(&self, agent: &str) -> Option<usize> {
        self.index.get(agent).copied()
    }

    pub(crate) fn entry(&self, position: usize) -> Option<(&str, &[String])> {
        self.entries
            .get(position)
            .map(|(agent, list)| (agent.as_str(), list.as_slice()))
    }

    /// Zero-based rank of `partner` in `agent`'s list
    pub fn rank(&self, agent: &str, partner: &str) -> Option<usize> {
        self.get(agent)?.iter().position(|p| p == partner)
    }

    fn check_duplicates(&self, side: Side) -> Result<(), MalformedPreferenceError> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        for (agent, list) in &self.entries {
            if !seen.insert(agent.as_str()) {
                return Err(MalformedPreferenceError::DuplicateAgent {
                    side,
                    agent: agent.clone(),
                });
            }

            let mut listed = HashSet::with_capacity(list.len());
            for partner in list {
                if !listed.insert(partner.as_str()) {
                    return Err(MalformedPreferenceError::DuplicateEntry {
                        side,
                        agent: agent.clone(),
                        partner: partner.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Every partner named by this side must exist on the other side and
    /// list the naming agent back.
    fn check_references(
        &self,
        side: Side,
        other: &PreferenceTable,
    ) -> Result<(), MalformedPreferenceError> {
        for (agent, list) in &self.entries {
            for partner in list {
                let Some(partner_list) = other.get(partner) else {
                    return Err(MalformedPreferenceError::UnknownAgent {
                        side: side.opposite(),
                        agent: partner.clone(),
                        referenced_by: agent.clone(),
                    });
                };
                if !partner_list.iter().any(|p| p == agent) {
                    return Err(MalformedPreferenceError::Unranked {
                        side: side.opposite(),
                        agent: partner.clone(),
                        partner: agent.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl<A, P> FromIterator<(A, Vec<P>)> for PreferenceTable
where
    A: Into<String>,
    P: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (A, Vec<P>)>>(iter: T) -> Self {
        let mut table = PreferenceTable::new();
        for (agent, preferences) in iter {
            table.push(agent, preferences);
        }
        table
    }
}

impl Serialize for PreferenceTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (agent, list) in &self.entries {
            map.serialize_entry(agent, list)?;
        }
        map.end()
    }
}

struct PreferenceTableVisitor;

impl<'de> Visitor<'de> for PreferenceTableVisitor {
    type Value = PreferenceTable;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map from agent id to a ranked list of partner ids")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
        let mut table = PreferenceTable::new();
        // Document order is preference-table order
        while let Some((agent, list)) = access.next_entry::<String, Vec<String>>()? {
            table.push(agent, list);
        }
        Ok(table)
    }
}

impl<'de> Deserialize<'de> for PreferenceTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PreferenceTableVisitor)
    }
}

/// Check that two tables describe a well-formed market: no agent defined
/// twice, no list repeating a partner, every listed partner known to the
/// other side, and every listing reciprocated.
pub fn validate(
    proposers: &PreferenceTable,
    responders: &PreferenceTable,
) -> Result<(), MalformedPreferenceError> {
    proposers.check_duplicates(Side::Proposer)?;
    responders.check_duplicates(Side::Responder)?;
    proposers.check_references(Side::Proposer, responders)?;
    responders.check_references(Side::Responder, proposers)?;
    Ok(())
}

/// Both sides' preferences, validated once on construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceModel {
    proposers: PreferenceTable,
    responders: PreferenceTable,
}

impl PreferenceModel {
    pub fn new(
        proposers: PreferenceTable,
        responders: PreferenceTable,
    ) -> Result<Self, MalformedPreferenceError> {
        validate(&proposers, &responders)?;
        Ok(Self {
            proposers,
            responders,
        })
    }

    pub fn proposers(&self) -> &PreferenceTable {
        &self.proposers
    }

    pub fn responders(&self) -> &PreferenceTable {
        &self.responders
    }

    pub fn solve(&self) -> Result<crate::core::Matching, MalformedPreferenceError> {
        crate::core::solve(&self.proposers, &self.responders)
    }

    pub fn is_stable(
        &self,
        matching: &crate::core::Matching,
    ) -> Result<bool, MalformedPreferenceError> {
        crate::core::is_stable(matching, &self.proposers, &self.responders)
    }

    pub fn enumerate_stable(&self) -> Result<Vec<crate::core::Matching>, MalformedPreferenceError> {
        crate::core::enumerate_stable(&self.proposers, &self.responders)
    }
}

/// Rank lookup table for one side, built once per solve or verification
pub(crate) struct RankIndex<'a> {
    side: Side,
    ranks: HashMap<&'a str, HashMap<&'a str, usize>>,
}

impl<'a> RankIndex<'a> {
    pub(crate) fn new(side: Side, table: &'a PreferenceTable) -> Self {
        let mut ranks = HashMap::with_capacity(table.len());
        for (agent, list) in table.iter() {
            ranks.entry(agent).or_insert_with(|| {
                list.iter()
                    .enumerate()
                    .map(|(rank, partner)| (partner.as_str(), rank))
                    .collect()
            });
        }
        Self { side, ranks }
    }

    pub(crate) fn rank(&self, agent: &str, partner: &str) -> Option<usize> {
        self.ranks.get(agent)?.get(partner).copied()
    }

    pub(crate) fn rank_of(&self, agent: &str, partner: &str) -> Result<usize, MalformedPreferenceError> {
        self.rank(agent, partner)
            .ok_or_else(|| MalformedPreferenceError::Unranked {
                side: self.side,
                agent: agent.to_string(),
                partner: partner.to_string(),
            })
    }

    /// Whether `agent` strictly prefers `a` over `b`
    pub(crate) fn prefers(&self, agent: &str, a: &str, b: &str) -> Result<bool, MalformedPreferenceError> {
        Ok(self.rank_of(agent, a)? < self.rank_of(agent, b)?)
    }
}
