//! Relation paths and their evaluation.
//!
//! A path such as `father.mother.sibling:Alice.children` is a chain of
//! [`Step`]s walked from a start person. Scalar steps move a single cursor;
//! a group step (`children`, `siblings`) yields a set and may only end a path.
//! The grammar lives in `relation.pest`.
use pest::Parser;
use pest::error::LineColLocation;
use pest_derive::Parser;
use tracing::debug;

use std::fmt;
use std::str::FromStr;

use crate::construct::{PersonId, Population};
use crate::error::{GeneaError, Result};

#[derive(Parser)]
#[grammar = "relation.pest"]
struct RelationParser;

// ------------- Relation -------------
#[derive(Eq, PartialEq, Hash, Clone, Copy, Debug)]
pub enum Relation {
    Father,
    Mother,
    Child,
    Sibling,
    Spouse,
    Children,
    Siblings,
}
impl Relation {
    pub fn keyword(&self) -> &'static str {
        match self {
            Relation::Father => "father",
            Relation::Mother => "mother",
            Relation::Child => "child",
            Relation::Sibling => "sibling",
            Relation::Spouse => "spouse",
            Relation::Children => "children",
            Relation::Siblings => "siblings",
        }
    }
    pub fn is_group(&self) -> bool {
        matches!(self, Relation::Children | Relation::Siblings)
    }
    fn accepts_specifier(&self) -> bool {
        matches!(self, Relation::Child | Relation::Sibling | Relation::Spouse)
    }
}
impl FromStr for Relation {
    type Err = GeneaError;
    fn from_str(s: &str) -> Result<Relation> {
        Ok(match s {
            "father" => Relation::Father,
            "mother" => Relation::Mother,
            "child" => Relation::Child,
            "sibling" => Relation::Sibling,
            "spouse" => Relation::Spouse,
            "children" => Relation::Children,
            "siblings" => Relation::Siblings,
            _ => return Err(GeneaError::UnknownRelation(s.to_string())),
        })
    }
}
impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

// ------------- Step -------------
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Step {
    relation: Relation,
    specifier: Option<String>,
}
impl Step {
    pub fn new(relation: Relation, specifier: Option<String>) -> Result<Self> {
        if specifier.is_some() && !relation.accepts_specifier() {
            return Err(GeneaError::SpecifierNotAllowed(relation.to_string()));
        }
        Ok(Self {
            relation,
            specifier,
        })
    }
    pub fn relation(&self) -> Relation {
        self.relation
    }
    pub fn specifier(&self) -> Option<&str> {
        self.specifier.as_deref()
    }
}
impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.specifier {
            Some(specifier) => write!(f, "{}:{}", self.relation, specifier),
            None => write!(f, "{}", self.relation),
        }
    }
}

// ------------- RelationPath -------------
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct RelationPath {
    steps: Vec<Step>,
}
impl RelationPath {
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
    /// The final step and the steps leading to it.
    pub fn split_last(&self) -> Result<(&Step, &[Step])> {
        self.steps.split_last().ok_or_else(|| GeneaError::Parse {
            message: "empty relation path".into(),
            col: None,
        })
    }
}
impl FromStr for RelationPath {
    type Err = GeneaError;
    fn from_str(s: &str) -> Result<RelationPath> {
        let mut pairs = RelationParser::parse(Rule::path, s).map_err(|e| {
            let col = match e.line_col {
                LineColLocation::Pos((_, col)) | LineColLocation::Span((_, col), _) => col,
            };
            GeneaError::Parse {
                message: format!("invalid relation path '{}' at column {}", s, col),
                col: Some(col),
            }
        })?;
        let mut steps = Vec::new();
        let path = pairs.next().ok_or_else(|| GeneaError::Parse {
            message: format!("empty relation path '{}'", s),
            col: None,
        })?;
        for step in path.into_inner().filter(|p| p.as_rule() == Rule::step) {
            let mut relation = None;
            let mut specifier = None;
            for part in step.into_inner() {
                match part.as_rule() {
                    Rule::keyword => relation = Some(part.as_str().parse::<Relation>()?),
                    Rule::specifier => specifier = Some(part.as_str().to_string()),
                    _ => (),
                }
            }
            let relation = relation.ok_or_else(|| GeneaError::Parse {
                message: format!("missing relation in '{}'", s),
                col: None,
            })?;
            steps.push(Step::new(relation, specifier)?);
        }
        Ok(RelationPath { steps })
    }
}
impl fmt::Display for RelationPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", DisplaySteps(&self.steps))
    }
}

// ------------- Resolution -------------
#[derive(Eq, PartialEq, Clone, Debug)]
pub enum Resolved {
    Single(PersonId),
    Group(Vec<PersonId>),
}
impl Resolved {
    pub fn single(&self) -> Option<PersonId> {
        match self {
            Resolved::Single(id) => Some(*id),
            Resolved::Group(_) => None,
        }
    }
    pub fn people(&self) -> &[PersonId] {
        match self {
            Resolved::Single(id) => std::slice::from_ref(id),
            Resolved::Group(ids) => ids,
        }
    }
}

/// Everyone standing in `relation` to `id`, in resolution order.
pub fn relatives(population: &Population, relation: Relation, id: PersonId) -> Vec<PersonId> {
    let person = &population[id];
    match relation {
        Relation::Father => person.father().into_iter().collect(),
        Relation::Mother => person.mother().into_iter().collect(),
        Relation::Child | Relation::Children => {
            // a person filling both parent slots lists the child twice
            let mut children: Vec<PersonId> = Vec::with_capacity(person.children().len());
            for &child in person.children() {
                if !children.contains(&child) {
                    children.push(child);
                }
            }
            children
        }
        Relation::Sibling | Relation::Siblings => population.siblings(id),
        Relation::Spouse => population.spouses(id),
    }
}

/// Walks `steps` from `start`. Either every step resolves or the whole call
/// fails; there are no partial results.
pub fn resolve(population: &Population, steps: &[Step], start: PersonId) -> Result<Resolved> {
    population.get(start)?;
    if let Some(step) = steps
        .iter()
        .rev()
        .skip(1)
        .find(|step| step.relation.is_group())
    {
        return Err(GeneaError::GroupNotLast(step.to_string()));
    }
    let mut current = start;
    for (index, step) in steps.iter().enumerate() {
        let candidates = relatives(population, step.relation, current);
        if step.relation.is_group() {
            debug!(start, path = %DisplaySteps(steps), found = candidates.len(), "group resolved");
            return Ok(Resolved::Group(candidates));
        }
        current = match &step.specifier {
            None => candidates
                .first()
                .copied()
                .ok_or_else(|| GeneaError::RelationNotSet {
                    step: index + 1,
                    relation: step.to_string(),
                })?,
            Some(name) => candidates
                .into_iter()
                .find(|&c| population[c].first_name() == name)
                .ok_or_else(|| GeneaError::NoMatch {
                    relation: step.relation.to_string(),
                    specifier: name.clone(),
                })?,
        };
    }
    Ok(Resolved::Single(current))
}

struct DisplaySteps<'a>(&'a [Step]);
impl fmt::Display for DisplaySteps<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

// ------------- Mutation by relation -------------
/// Makes `other` stand in `relation` to `of`.
pub fn set_relation(
    population: &mut Population,
    relation: Relation,
    of: PersonId,
    other: PersonId,
) -> Result<()> {
    match relation {
        Relation::Father => population.set_father(of, other).map(drop),
        Relation::Mother => population.set_mother(of, other).map(drop),
        Relation::Child | Relation::Children => population.set_child(of, other).map(drop),
        Relation::Sibling | Relation::Siblings => population.set_sibling(of, other),
        Relation::Spouse => Err(GeneaError::UnsupportedRelation(relation.to_string())),
    }
}

/// Severs the relation named by `step` from `of`, returning who was detached.
pub fn rm_relation(population: &mut Population, step: &Step, of: PersonId) -> Result<PersonId> {
    match step.relation {
        Relation::Father => population.rm_father(of),
        Relation::Mother => population.rm_mother(of),
        Relation::Child => population.rm_child(of, step.specifier().unwrap_or_default()),
        Relation::Sibling | Relation::Spouse | Relation::Children | Relation::Siblings => {
            Err(GeneaError::UnsupportedRelation(step.relation.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chained_steps() {
        let path: RelationPath = "father.mother.sibling:Alice.children".parse().unwrap();
        assert_eq!(path.steps().len(), 4);
        assert_eq!(path.steps()[2].relation(), Relation::Sibling);
        assert_eq!(path.steps()[2].specifier(), Some("Alice"));
        assert_eq!(path.to_string(), "father.mother.sibling:Alice.children");
    }

    #[test]
    fn rejects_malformed_paths() {
        for text in ["", "father..mother", "child:", ".father", "father."] {
            assert!(
                matches!(text.parse::<RelationPath>(), Err(GeneaError::Parse { .. })),
                "{text} should not parse"
            );
        }
    }

    #[test]
    fn rejects_unknown_keywords_and_specifiers() {
        assert!(matches!(
            "uncle".parse::<RelationPath>(),
            Err(GeneaError::UnknownRelation(_))
        ));
        assert!(matches!(
            "father:Bob".parse::<RelationPath>(),
            Err(GeneaError::SpecifierNotAllowed(_))
        ));
        assert!(matches!(
            "children:Bob".parse::<RelationPath>(),
            Err(GeneaError::SpecifierNotAllowed(_))
        ));
    }
}
