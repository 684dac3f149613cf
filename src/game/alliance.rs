//! Player alliances.
//!
//! Allied counters count as one continuous line for win detection and for
//! nothing else. A finished [`AllianceRegistry`] is immutable; setup flows
//! build one through an [`AllianceDraftSession`].

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::AllianceError;

use super::player::PlayerId;

/// A named group of players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alliance {
    pub name: String,
    pub members: BTreeSet<PlayerId>,
}

impl Alliance {
    pub fn new(name: impl Into<String>, members: impl IntoIterator<Item = PlayerId>) -> Self {
        Alliance {
            name: name.into(),
            members: members.into_iter().collect(),
        }
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.members.contains(&player)
    }
}

/// Validated alliances. Each player belongs to at most one alliance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllianceRegistry {
    alliances: Vec<Alliance>,
    membership: HashMap<PlayerId, usize>,
}

impl AllianceRegistry {
    /// Build a registry, rejecting repeated names and players listed in more
    /// than one alliance.
    pub fn new(alliances: Vec<Alliance>) -> Result<Self, AllianceError> {
        let mut membership = HashMap::new();
        for (idx, alliance) in alliances.iter().enumerate() {
            if alliances[..idx].iter().any(|a| a.name == alliance.name) {
                return Err(AllianceError::DuplicateName(alliance.name.clone()));
            }
            for &player in &alliance.members {
                if let Some(prev) = membership.insert(player, idx) {
                    return Err(AllianceError::DuplicateMember {
                        player,
                        first: alliances[prev].name.clone(),
                        second: alliance.name.clone(),
                    });
                }
            }
        }
        Ok(AllianceRegistry {
            alliances,
            membership,
        })
    }

    /// Check that every member exists in a `player_count` game.
    pub fn validate_players(&self, player_count: usize) -> Result<(), AllianceError> {
        match self
            .membership
            .keys()
            .filter(|p| p.index() >= player_count)
            .min()
        {
            Some(&player) => Err(AllianceError::UnknownPlayer {
                player,
                player_count,
            }),
            None => Ok(()),
        }
    }

    /// True when two different players share an alliance.
    pub fn allied(&self, a: PlayerId, b: PlayerId) -> bool {
        if a == b {
            return false;
        }
        match (self.membership.get(&a), self.membership.get(&b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    pub fn alliance_of(&self, player: PlayerId) -> Option<&Alliance> {
        self.membership.get(&player).map(|&idx| &self.alliances[idx])
    }

    pub fn alliances(&self) -> &[Alliance] {
        &self.alliances
    }

    pub fn is_empty(&self) -> bool {
        self.alliances.is_empty()
    }
}

/// Mutable alliance setup owned by a configuration flow.
///
/// Starts with every player unassigned. Alliances are named `Alliance-N` in
/// creation order.
#[derive(Debug, Clone)]
pub struct AllianceDraftSession {
    player_count: usize,
    alliances: Vec<Alliance>,
    unassigned: Vec<PlayerId>,
}

impl AllianceDraftSession {
    pub fn new(player_count: usize) -> Self {
        AllianceDraftSession {
            player_count,
            alliances: Vec::new(),
            unassigned: PlayerId::all(player_count).collect(),
        }
    }

    /// Add an empty alliance and return its name.
    pub fn add_alliance(&mut self) -> String {
        let mut n = self.alliances.len() + 1;
        let name = loop {
            let candidate = format!("Alliance-{n}");
            if !self.alliances.iter().any(|a| a.name == candidate) {
                break candidate;
            }
            n += 1;
        };
        self.alliances.push(Alliance::new(name.clone(), []));
        name
    }

    /// Move a player into an alliance, taking them out of any other one.
    pub fn assign(&mut self, player: PlayerId, alliance: &str) -> Result<(), AllianceError> {
        if player.index() >= self.player_count {
            return Err(AllianceError::UnknownPlayer {
                player,
                player_count: self.player_count,
            });
        }
        let target = self
            .alliances
            .iter()
            .position(|a| a.name == alliance)
            .ok_or_else(|| AllianceError::UnknownAlliance(alliance.to_string()))?;

        self.detach(player);
        self.alliances[target].members.insert(player);
        Ok(())
    }

    /// Return a player to the unassigned pool.
    pub fn unassign(&mut self, player: PlayerId) {
        if player.index() < self.player_count && !self.unassigned.contains(&player) {
            self.detach(player);
            self.unassigned.push(player);
        }
    }

    pub fn unassigned(&self) -> &[PlayerId] {
        &self.unassigned
    }

    pub fn alliances(&self) -> &[Alliance] {
        &self.alliances
    }

    /// Freeze the draft. Empty alliances are dropped.
    pub fn finalize(self) -> Result<AllianceRegistry, AllianceError> {
        let alliances = self
            .alliances
            .into_iter()
            .filter(|a| !a.members.is_empty())
            .collect();
        let registry = AllianceRegistry::new(alliances)?;
        registry.validate_players(self.player_count)?;
        Ok(registry)
    }

    fn detach(&mut self, player: PlayerId) {
        self.unassigned.retain(|&p| p != player);
        for alliance in &mut self.alliances {
            alliance.members.remove(&player);
        }
    }
}
