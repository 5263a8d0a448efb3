//! The command surface over a population.
//!
//! A [`Session`] is the explicit mutable context every command runs against:
//! the population plus the cursor (the currently selected person). Relation
//! paths are resolved from the cursor unless a command says otherwise.
use tracing::{info, warn};

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::Settings;
use crate::construct::{Person, PersonId, Population};
use crate::error::{GeneaError, Result};
use crate::generation::{Generations, layout};
use crate::relation::{RelationPath, Resolved, Step, resolve, rm_relation, set_relation};
use crate::{persist, render};

/// A person addressed either by id or by a relation path from the cursor.
#[derive(Eq, PartialEq, Clone, Debug)]
pub enum Target {
    Id(PersonId),
    Path(RelationPath),
}
impl FromStr for Target {
    type Err = GeneaError;
    fn from_str(s: &str) -> Result<Target> {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            let id = s.parse().map_err(|_| GeneaError::Parse {
                message: format!("{} is not a valid ID", s),
                col: None,
            })?;
            return Ok(Target::Id(id));
        }
        Ok(Target::Path(s.parse()?))
    }
}

#[derive(Debug, Default)]
pub struct Session {
    population: Population,
    cursor: Option<PersonId>,
    settings: Settings,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            population: Population::new(),
            cursor: None,
            settings,
        }
    }
    pub fn population(&self) -> &Population {
        &self.population
    }
    pub fn cursor(&self) -> Option<PersonId> {
        self.cursor
    }
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
    fn require_cursor(&self) -> Result<PersonId> {
        self.cursor.ok_or(GeneaError::NoCursor)
    }
    /// Resolves every step but the last from `anchor`; the result must be a
    /// single person.
    fn anchor<'p>(&self, path: &'p RelationPath, anchor: PersonId) -> Result<(PersonId, &'p Step)> {
        let (last, prefix) = path.split_last()?;
        match resolve(&self.population, prefix, anchor)? {
            Resolved::Single(of) => Ok((of, last)),
            Resolved::Group(_) => Err(GeneaError::GroupNotLast(
                prefix.last().map(|s| s.to_string()).unwrap_or_default(),
            )),
        }
    }

    /// `Person ID n`, then sex and name, then the dates.
    pub fn describe(&self, id: PersonId) -> Result<String> {
        let person = self.population.get(id)?;
        Ok(format!("Person ID {}\n {}", id, person))
    }

    pub fn create<S: AsRef<str>>(&mut self, args: &[S]) -> Result<PersonId> {
        let person = Person::from_args(args)?;
        let id = self.population.add(person);
        info!(person = id, "person created");
        if self.cursor.is_none() {
            self.cursor = Some(id);
        }
        Ok(id)
    }

    /// Creates a person standing in the last relation of `path` to the person
    /// the rest of the path leads to.
    pub fn add<S: AsRef<str>>(&mut self, path: &RelationPath, args: &[S]) -> Result<PersonId> {
        let cursor = self.require_cursor()?;
        let (of, last) = self.anchor(path, cursor)?;
        let person = Person::from_args(args)?;
        let id = self.population.add(person);
        if let Err(e) = set_relation(&mut self.population, last.relation(), of, id) {
            // nothing links to the new person yet, so it leaves no trace
            self.population.remove(id)?;
            return Err(e);
        }
        info!(person = id, of, relation = %last, "person added");
        Ok(id)
    }

    /// Makes `other` stand in the last relation of `path` to the person the
    /// rest of the path leads to from the cursor.
    pub fn attach(&mut self, path: &RelationPath, other: PersonId) -> Result<()> {
        let cursor = self.require_cursor()?;
        self.attach_from(path, cursor, other)
    }
    /// Same as [`Session::attach`] with the path walked from `from`.
    pub fn attach_between(&mut self, path: &RelationPath, from: PersonId, other: PersonId) -> Result<()> {
        self.require_cursor()?;
        self.attach_from(path, from, other)
    }
    fn attach_from(&mut self, path: &RelationPath, from: PersonId, other: PersonId) -> Result<()> {
        self.population.get(other)?;
        let (of, last) = self.anchor(path, from)?;
        set_relation(&mut self.population, last.relation(), of, other)?;
        info!(person = other, of, relation = %last, "person attached");
        Ok(())
    }

    /// An id removes that person entirely; a path severs its last relation
    /// and returns whoever was detached.
    pub fn remove(&mut self, target: &Target) -> Result<Option<PersonId>> {
        let cursor = self.require_cursor()?;
        match target {
            Target::Id(id) => {
                self.population.remove(*id)?;
                self.cursor = match cursor {
                    c if c == *id && self.population.is_empty() => {
                        warn!("cursor set to nobody");
                        None
                    }
                    c if c == *id => Some(0),
                    c if c > *id => Some(c - 1),
                    c => Some(c),
                };
                info!(person = id, "person removed");
                Ok(None)
            }
            Target::Path(path) => {
                let (of, last) = self.anchor(path, cursor)?;
                let detached = rm_relation(&mut self.population, last, of)?;
                info!(person = of, detached, relation = %last, "relation removed");
                Ok(Some(detached))
            }
        }
    }

    pub fn overwrite<S: AsRef<str>>(&mut self, args: &[S]) -> Result<PersonId> {
        let cursor = self.require_cursor()?;
        let person = Person::from_args(args)?;
        self.population.overwrite(cursor, person)?;
        Ok(cursor)
    }

    /// The cursor, the person with a given id, or whoever a path leads to.
    pub fn info(&self, target: Option<&Target>) -> Result<Vec<PersonId>> {
        let cursor = self.require_cursor()?;
        match target {
            None => Ok(vec![cursor]),
            Some(Target::Id(id)) => {
                self.population.get(*id)?;
                Ok(vec![*id])
            }
            Some(Target::Path(path)) => {
                Ok(resolve(&self.population, path.steps(), cursor)?.people().to_vec())
            }
        }
    }

    pub fn list(&self) -> Vec<PersonId> {
        self.population.iter().map(|(id, _)| id).collect()
    }

    pub fn search(&self, name: &str) -> Vec<PersonId> {
        self.population.search(name)
    }

    pub fn select(&mut self, target: &Target) -> Result<PersonId> {
        let cursor = self.require_cursor()?;
        let selected = match target {
            Target::Id(id) => {
                self.population.get(*id)?;
                *id
            }
            Target::Path(path) => match resolve(&self.population, path.steps(), cursor)? {
                Resolved::Single(id) => id,
                Resolved::Group(_) => {
                    return Err(GeneaError::GroupNotLast(path.to_string()));
                }
            },
        };
        self.cursor = Some(selected);
        Ok(selected)
    }

    pub fn dump(&self, path: impl AsRef<Path>) -> Result<()> {
        if self.population.is_empty() {
            return Err(GeneaError::Empty);
        }
        persist::dump(&self.population, path)
    }

    /// Appends the population stored at `path`; the cursor moves to the first
    /// loaded person only when it pointed at nobody.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<Range<PersonId>> {
        let loaded = persist::load(path)?;
        let ids = self.population.append(loaded);
        if self.cursor.is_none() && !ids.is_empty() {
            self.cursor = Some(ids.start);
        }
        Ok(ids)
    }

    /// Layers the tree around the cursor, re-rooted at its oldest member, and
    /// renders it as DOT.
    pub fn graph(&self) -> Result<String> {
        let cursor = self.require_cursor()?;
        let around_cursor = Generations::compute(&self.population, cursor)?;
        let oldest = around_cursor.oldest().unwrap_or(cursor);
        let generations = Generations::compute(&self.population, oldest)?;
        let ranks = layout(&self.population, &generations)?;
        render::dot(&self.population, &ranks, &self.settings.graph)
    }

    /// Writes the DOT description next to `path`, e.g. `tree.png.dot`, and
    /// returns the file written.
    pub fn export_graph(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let text = self.graph()?;
        let mut file = path.as_ref().as_os_str().to_owned();
        file.push(&self.settings.graph.dot_suffix);
        let file = PathBuf::from(file);
        fs::write(&file, text)?;
        info!(path = %file.display(), "graph written");
        Ok(file)
    }
}
