//! Generation layering and union synthesis.
//!
//! [`Generations`] groups everyone reachable from a start person by their level
//! relative to it, oldest generation first. [`layout`] turns those buckets into
//! rank rows where co-parents sit next to each other around a union point.
//! Union points are named by [`UnionId`], which only depends on the two
//! partners and not on the side the traversal came from.
use roaring::RoaringBitmap;
use tracing::debug;

use std::collections::HashSet;
use std::fmt;

use crate::construct::{PersonHasher, PersonId, Population};
use crate::error::Result;

// ------------- Generations -------------
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Generations {
    buckets: Vec<Vec<PersonId>>,
}

impl Generations {
    /// Layers everyone connected to `start` through father, mother or child
    /// links. Level 0 is the level of `start`, parents sit one level up and
    /// children one level down; the first level a person is reached at wins.
    pub fn compute(population: &Population, start: PersonId) -> Result<Self> {
        population.get(start)?;
        let mut visited = RoaringBitmap::new();
        let mut placed: Vec<(i64, PersonId)> = Vec::with_capacity(population.len());
        place(population, start, 0, &mut visited, &mut placed);

        let lowest = placed.iter().map(|(level, _)| *level).min().unwrap_or(0);
        let highest = placed.iter().map(|(level, _)| *level).max().unwrap_or(0);
        let mut buckets = vec![Vec::new(); (highest - lowest + 1) as usize];
        for (level, id) in placed {
            buckets[(level - lowest) as usize].push(id);
        }
        debug!(start, generations = buckets.len(), "generations computed");
        Ok(Self { buckets })
    }
    pub fn buckets(&self) -> &[Vec<PersonId>] {
        &self.buckets
    }
    pub fn len(&self) -> usize {
        self.buckets.len()
    }
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
    /// First person of the most ancestral generation.
    pub fn oldest(&self) -> Option<PersonId> {
        self.buckets.first().and_then(|bucket| bucket.first()).copied()
    }
    pub fn level_of(&self, id: PersonId) -> Option<usize> {
        self.buckets.iter().position(|bucket| bucket.contains(&id))
    }
    pub fn people(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.buckets.iter().flatten().copied()
    }
}

// Pending work of the layering walk. A visit expands into the visits of the
// children, the placement of the person itself, then the visits of the parents.
enum Task {
    Visit(PersonId, i64),
    Place(PersonId, i64),
}

// Children are placed before the person itself so that every resolved
// sub-branch precedes its root within a level. Tasks are pushed in reverse so
// they pop in that order, and a person is claimed when its visit pops.
fn place(
    population: &Population,
    start: PersonId,
    level: i64,
    visited: &mut RoaringBitmap,
    placed: &mut Vec<(i64, PersonId)>,
) {
    let mut stack = vec![Task::Visit(start, level)];
    while let Some(task) = stack.pop() {
        match task {
            Task::Place(id, level) => placed.push((level, id)),
            Task::Visit(id, level) => {
                if !visited.insert(id as u32) {
                    continue;
                }
                let person = &population[id];
                for parent in [person.mother(), person.father()].into_iter().flatten() {
                    stack.push(Task::Visit(parent, level - 1));
                }
                stack.push(Task::Place(id, level));
                for &child in person.children().iter().rev() {
                    stack.push(Task::Visit(child, level + 1));
                }
            }
        }
    }
}

// ------------- UnionId -------------
#[derive(Eq, PartialEq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct UnionId {
    low: PersonId,
    high: PersonId,
}
impl UnionId {
    pub fn new(a: PersonId, b: PersonId) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }
    pub fn partners(&self) -> (PersonId, PersonId) {
        (self.low, self.high)
    }
}
impl fmt::Display for UnionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "r{}x{}", self.low, self.high)
    }
}

// ------------- Union -------------
#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub struct Union {
    pub id: UnionId,
    pub person: PersonId,
    pub spouse: PersonId,
}

/// Unions of `person` with each of its co-parents, in children order.
pub fn unions(population: &Population, person: PersonId) -> Result<Vec<Union>> {
    population.get(person)?;
    Ok(population
        .spouses(person)
        .into_iter()
        .map(|spouse| Union {
            id: UnionId::new(person, spouse),
            person,
            spouse,
        })
        .collect())
}

// ------------- Layout -------------
#[derive(Eq, PartialEq, Clone, Debug)]
pub enum RankMember {
    Person(PersonId),
    Union(Union),
}

/// One row per generation. Every person shows up in exactly one row, and
/// every union exactly once, in the row of whichever partner came first.
pub fn layout(population: &Population, generations: &Generations) -> Result<Vec<Vec<RankMember>>> {
    let mut placed: HashSet<PersonId, PersonHasher> = HashSet::default();
    let mut seen: HashSet<UnionId, PersonHasher> = HashSet::default();
    let mut ranks = Vec::with_capacity(generations.len());
    for bucket in generations.buckets() {
        let mut rank = Vec::new();
        for &person in bucket {
            population.get(person)?;
            if !placed.insert(person) {
                continue;
            }
            rank.push(RankMember::Person(person));
            thread_unions(population, person, &mut placed, &mut seen, &mut rank);
        }
        ranks.push(rank);
    }
    Ok(ranks)
}

// Follows co-parents transitively so a spouse that joins the tree only
// through another family still gets its union placed next to it. Each entry
// of the stack is a person and the spouses of it still to be threaded.
fn thread_unions(
    population: &Population,
    person: PersonId,
    placed: &mut HashSet<PersonId, PersonHasher>,
    seen: &mut HashSet<UnionId, PersonHasher>,
    rank: &mut Vec<RankMember>,
) {
    let mut stack = vec![(person, population.spouses(person).into_iter())];
    while let Some((person, spouses)) = stack.last_mut() {
        let person = *person;
        let Some(spouse) = spouses.next() else {
            stack.pop();
            continue;
        };
        let id = UnionId::new(person, spouse);
        if !seen.insert(id) {
            continue;
        }
        rank.push(RankMember::Union(Union { id, person, spouse }));
        if placed.insert(spouse) {
            rank.push(RankMember::Person(spouse));
            stack.push((spouse, population.spouses(spouse).into_iter()));
        }
    }
}

/// The union point (or single parent) a person descends from, if any.
pub fn descent(population: &Population, id: PersonId) -> Result<Option<Descent>> {
    let person = population.get(id)?;
    Ok(match (person.father(), person.mother()) {
        (Some(father), Some(mother)) if father != mother => {
            Some(Descent::Union(UnionId::new(father, mother)))
        }
        (Some(parent), _) | (None, Some(parent)) => Some(Descent::Parent(parent)),
        (None, None) => None,
    })
}

#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum Descent {
    Union(UnionId),
    Parent(PersonId),
}

