//! Birth/survival rule tables and the per-cell transition function.

use crate::{Adjacency, Error, Result, TileShape, geometry};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, sync::LazyLock};

/// The state of a single cell. `0` is dead, `1` is alive, and anything
/// above is a "dying" state of a multi-state (Generations) rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellState(pub u8);
impl CellState {
    pub const DEAD: Self = Self(0);
    pub const ALIVE: Self = Self(1);

    #[inline]
    pub fn is_dead(self) -> bool {
        self == Self::DEAD
    }
    #[inline]
    pub fn is_alive(self) -> bool {
        self == Self::ALIVE
    }
}
impl From<bool> for CellState {
    #[inline]
    fn from(alive: bool) -> Self {
        if alive { Self::ALIVE } else { Self::DEAD }
    }
}
impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Neighbor counts that give birth to dead cells and keep live cells alive.
///
/// Serialized as its rule string, e.g. `"B3/S23"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleTable {
    birth: BTreeSet<u8>,
    survive: BTreeSet<u8>,
    states: u8,
}

impl RuleTable {
    pub fn new<B, S>(birth: B, survive: S) -> Self
    where
        B: IntoIterator<Item = u8>,
        S: IntoIterator<Item = u8>,
    {
        Self {
            birth: birth.into_iter().collect(),
            survive: survive.into_iter().collect(),
            states: 2,
        }
    }

    /// Turns this into a Generations rule with `states` states (including dead).
    pub fn with_states(mut self, states: u8) -> Result<Self> {
        if states < 2 {
            return Err(Error::RuleParse(format!(
                "a rule needs at least 2 states, got {states}"
            )));
        }
        self.states = states;
        Ok(self)
    }

    /// B3/S23
    pub fn conway() -> Self {
        Self::new([3], [2, 3])
    }
    /// B36/S23
    pub fn high_life() -> Self {
        Self::new([3, 6], [2, 3])
    }
    /// B3678/S34678
    pub fn day_and_night() -> Self {
        Self::new([3, 6, 7, 8], [3, 4, 6, 7, 8])
    }
    /// B2/S
    pub fn seeds() -> Self {
        Self::new([2], [])
    }
    /// B2/S/C3
    pub fn brians_brain() -> Self {
        Self {
            birth: BTreeSet::from([2]),
            survive: BTreeSet::new(),
            states: 3,
        }
    }

    #[inline]
    pub fn birth(&self) -> impl Iterator<Item = u8> + '_ {
        self.birth.iter().copied()
    }
    #[inline]
    pub fn survive(&self) -> impl Iterator<Item = u8> + '_ {
        self.survive.iter().copied()
    }
    #[inline]
    pub fn states(&self) -> u8 {
        self.states
    }

    #[inline]
    pub fn births_on(&self, count: u8) -> bool {
        self.birth.contains(&count)
    }
    #[inline]
    pub fn survives_on(&self, count: u8) -> bool {
        self.survive.contains(&count)
    }

    /// Largest neighbor count the rule mentions
    pub fn max_count(&self) -> Option<u8> {
        let b = self.birth.last().copied();
        let s = self.survive.last().copied();
        b.max(s)
    }

    /// Checks every count against the neighborhood size of `shape`/`adjacency`
    pub fn validate(&self, shape: TileShape, adjacency: Adjacency) -> Result<()> {
        let max = geometry::max_neighbors(shape, adjacency);
        match self.max_count() {
            Some(count) if count > max => Err(Error::InvalidRuleTable {
                count,
                max,
                shape,
                adjacency,
            }),
            _ => Ok(()),
        }
    }

    /// Parses `B3/S23`, `B2/S/C3`, or the survival-first form `23/3`.
    ///
    /// Counts are single digits unless separated by commas (`B3/S2,3,10`).
    pub fn parse<S: AsRef<str>>(s: S) -> Result<Self> {
        static BS: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[Bb]([\d,]*)/[Ss]([\d,]*)(?:/[Cc]?(\d+))?$").expect("valid regex")
        });
        static SB: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^([\d,]*)/([\d,]*)(?:/(\d+))?$").expect("valid regex"));

        let s = s.as_ref().trim();
        let (birth, survive, states) = if let Some(caps) = BS.captures(s) {
            (caps.get(1), caps.get(2), caps.get(3))
        } else if let Some(caps) = SB.captures(s) {
            (caps.get(2), caps.get(1), caps.get(3))
        } else {
            return Err(Error::RuleParse(s.to_owned()));
        };

        let counts = |m: Option<regex::Match<'_>>| parse_counts(m.map_or("", |m| m.as_str()));
        let rule = Self {
            birth: counts(birth)?,
            survive: counts(survive)?,
            states: 2,
        };
        match states {
            Some(m) => {
                let n = m
                    .as_str()
                    .parse::<u8>()
                    .map_err(|_| Error::RuleParse(s.to_owned()))?;
                rule.with_states(n)
            }
            None => Ok(rule),
        }
    }
}

fn parse_counts(digits: &str) -> Result<BTreeSet<u8>> {
    let bad = || Error::RuleParse(format!("bad neighbor count in {digits:?}"));
    if digits.contains(',') {
        digits
            .split(',')
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<u8>().map_err(|_| bad()))
            .collect()
    } else {
        digits
            .chars()
            .map(|c| c.to_digit(10).map(|d| d as u8).ok_or_else(bad))
            .collect()
    }
}

fn write_counts(f: &mut fmt::Formatter<'_>, counts: &BTreeSet<u8>) -> fmt::Result {
    let wide = counts.iter().any(|&c| c > 9);
    for (i, c) in counts.iter().enumerate() {
        if wide && i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{c}")?;
    }
    // a lone wide count still needs a comma, or "10" reads back as 1 and 0
    if wide && counts.len() == 1 {
        f.write_str(",")?;
    }
    Ok(())
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::conway()
    }
}
impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("B")?;
        write_counts(f, &self.birth)?;
        f.write_str("/S")?;
        write_counts(f, &self.survive)?;
        if self.states > 2 {
            write!(f, "/C{}", self.states)?;
        }
        Ok(())
    }
}
impl TryFrom<String> for RuleTable {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}
impl From<RuleTable> for String {
    fn from(rule: RuleTable) -> Self {
        rule.to_string()
    }
}

/// Decides the next state of one cell. Only [`CellState::ALIVE`] neighbors
/// are counted in `live_neighbors`.
///
/// A live cell that fails to survive dies outright under a two-state rule,
/// and starts dying (state 2) under a multi-state rule. Dying cells age by one
/// state per generation regardless of their neighbors, and become dead after
/// the last state.
#[inline]
pub fn next_state(current: CellState, live_neighbors: u8, rules: &RuleTable) -> CellState {
    match current.0 {
        0 => CellState::from(rules.births_on(live_neighbors)),
        1 if rules.survives_on(live_neighbors) => CellState::ALIVE,
        1 if rules.states > 2 => CellState(2),
        1 => CellState::DEAD,
        dying if dying.saturating_add(1) < rules.states => CellState(dying + 1),
        _ => CellState::DEAD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conway_transitions() {
        let rules = RuleTable::conway();

        assert_eq!(next_state(CellState::DEAD, 3, &rules), CellState::ALIVE);
        assert_eq!(next_state(CellState::DEAD, 2, &rules), CellState::DEAD);
        assert_eq!(next_state(CellState::ALIVE, 2, &rules), CellState::ALIVE);
        assert_eq!(next_state(CellState::ALIVE, 3, &rules), CellState::ALIVE);
        assert_eq!(next_state(CellState::ALIVE, 1, &rules), CellState::DEAD);
        assert_eq!(next_state(CellState::ALIVE, 4, &rules), CellState::DEAD);
    }

    #[test]
    fn generations_cells_age_out() {
        let rules = RuleTable::brians_brain();

        assert_eq!(next_state(CellState::DEAD, 2, &rules), CellState::ALIVE);
        assert_eq!(next_state(CellState::ALIVE, 2, &rules), CellState(2));
        // dying cells ignore their neighbors
        assert_eq!(next_state(CellState(2), 2, &rules), CellState::DEAD);

        let rules = RuleTable::conway().with_states(4).unwrap();
        assert_eq!(next_state(CellState(2), 0, &rules), CellState(3));
        assert_eq!(next_state(CellState(3), 0, &rules), CellState::DEAD);
    }

    #[test]
    fn parses_rule_strings() {
        assert_eq!(RuleTable::parse("B3/S23").unwrap(), RuleTable::conway());
        assert_eq!(RuleTable::parse("b36/s23").unwrap(), RuleTable::high_life());
        assert_eq!(RuleTable::parse("23/3").unwrap(), RuleTable::conway());
        assert_eq!(RuleTable::parse("B2/S/C3").unwrap(), RuleTable::brians_brain());
        assert_eq!(RuleTable::parse("/2/3").unwrap(), RuleTable::brians_brain());

        let wide = RuleTable::parse("B4,5/S2,10,12").unwrap();
        assert!(wide.survives_on(10));
        assert!(wide.births_on(4));
        assert_eq!(wide.max_count(), Some(12));

        assert!(RuleTable::parse("hello").is_err());
        assert!(RuleTable::parse("B3/S23/C1").is_err());
    }

    #[test]
    fn displays_canonical_form() {
        assert_eq!(RuleTable::conway().to_string(), "B3/S23");
        assert_eq!(RuleTable::brians_brain().to_string(), "B2/S/C3");
        assert_eq!(RuleTable::new([3], [2, 10]).to_string(), "B3/S2,10");
        assert_eq!(RuleTable::new([10], [2, 3]).to_string(), "B10,/S23");
    }

    #[test]
    fn wide_counts_survive_reparsing() {
        let rules = [
            RuleTable::new([10], [2, 3]),
            RuleTable::new([3], [12]),
            RuleTable::new([12], [10]),
            RuleTable::new([4, 10], [1, 2, 11]),
            RuleTable::new([10], []).with_states(4).unwrap(),
        ];
        for rule in rules {
            let text = rule.to_string();
            assert_eq!(RuleTable::parse(&text).unwrap(), rule, "{text}");

            let json = serde_json::to_string(&rule).unwrap();
            assert_eq!(serde_json::from_str::<RuleTable>(&json).unwrap(), rule, "{json}");
        }
    }

    #[test]
    fn validates_against_neighborhood_size() {
        let nine = RuleTable::new([3], [9]);
        let err = nine.validate(TileShape::Square, Adjacency::Moore).unwrap_err();
        assert!(matches!(err, Error::InvalidRuleTable { count: 9, max: 8, .. }));

        assert!(nine.validate(TileShape::Triangle, Adjacency::Moore).is_ok());
        assert!(RuleTable::conway().validate(TileShape::Hexagon, Adjacency::VonNeumann).is_ok());
        assert!(RuleTable::high_life().validate(TileShape::Hexagon, Adjacency::VonNeumann).is_err());
    }

    #[test]
    fn serializes_as_rule_string() {
        let json = serde_json::to_string(&RuleTable::high_life()).unwrap();
        assert_eq!(json, "\"B36/S23\"");

        let rule: RuleTable = serde_json::from_str("\"B2/S/C3\"").unwrap();
        assert_eq!(rule, RuleTable::brians_brain());
        assert!(serde_json::from_str::<RuleTable>("\"nope\"").is_err());
    }
}
