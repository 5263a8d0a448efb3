// used to log replaced and severed links
use tracing::{debug, error, warn};

// sets and maps keyed by person ids use a fast hasher
use core::hash::BuildHasherDefault;
use seahash::SeaHasher;

// used to print out readable forms of a construct
use std::fmt;
// used to address persons in the population
use std::ops::{Index, Range};

// our own stuff that we need
use crate::datatype::{Date, Death, Sex};
use crate::error::{GeneaError, Result};

// ------------- PersonId -------------
// Position of a person in the population. Ids are dense, so removing a
// person renumbers everyone after it.
pub type PersonId = usize;

pub type PersonHasher = BuildHasherDefault<SeaHasher>;

// ------------- Parent -------------
#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum Parent {
    Father,
    Mother,
}
impl Parent {
    pub fn of(sex: Sex) -> Parent {
        match sex {
            Sex::Male => Parent::Father,
            Sex::Female => Parent::Mother,
        }
    }
    pub fn name(&self) -> &'static str {
        match self {
            Parent::Father => "father",
            Parent::Mother => "mother",
        }
    }
}

// ------------- Person -------------
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Person {
    first_name: String,
    last_name: String,
    sex: Sex,
    born: Date,
    died: Death,
    // links into the owning population, never owning handles
    father: Option<PersonId>,
    mother: Option<PersonId>,
    children: Vec<PersonId>,
}

impl Person {
    pub fn new(first_name: String, last_name: String, sex: Sex, born: Date, died: Death) -> Self {
        Self {
            first_name,
            last_name,
            sex,
            born,
            died,
            father: None,
            mother: None,
            children: Vec::new(),
        }
    }
    /// Builds an unlinked person from `<first name> <last name> <sex> <birth> [<death>]`.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        if args.len() != 4 && args.len() != 5 {
            return Err(GeneaError::ArgumentCount {
                expected: "4 or 5",
                found: args.len(),
            });
        }
        let sex = args[2].as_ref().parse::<Sex>()?;
        let born = args[3].as_ref().parse::<Date>()?;
        let died = match args.get(4) {
            Some(token) => Death::Known(token.as_ref().parse::<Date>()?),
            None => Death::Unknown,
        };
        Ok(Self::new(
            args[0].as_ref().to_string(),
            args[1].as_ref().to_string(),
            sex,
            born,
            died,
        ))
    }
    pub fn first_name(&self) -> &str {
        &self.first_name
    }
    pub fn last_name(&self) -> &str {
        &self.last_name
    }
    pub fn sex(&self) -> Sex {
        self.sex
    }
    pub fn born(&self) -> &Date {
        &self.born
    }
    pub fn died(&self) -> &Death {
        &self.died
    }
    pub fn father(&self) -> Option<PersonId> {
        self.father
    }
    pub fn mother(&self) -> Option<PersonId> {
        self.mother
    }
    pub fn parent(&self, parent: Parent) -> Option<PersonId> {
        match parent {
            Parent::Father => self.father,
            Parent::Mother => self.mother,
        }
    }
    pub fn children(&self) -> &[PersonId] {
        &self.children
    }
    fn parent_slot(&mut self, parent: Parent) -> &mut Option<PersonId> {
        match parent {
            Parent::Father => &mut self.father,
            Parent::Mother => &mut self.mother,
        }
    }
    fn unlist_child(&mut self, child: PersonId) {
        // a single occurrence, a person may be both parents of the same child
        if let Some(position) = self.children.iter().position(|&c| c == child) {
            self.children.remove(position);
        }
    }
    fn shift_links(&mut self, shift: impl Fn(PersonId) -> PersonId) {
        self.father = self.father.map(&shift);
        self.mother = self.mother.map(&shift);
        for child in self.children.iter_mut() {
            *child = shift(*child);
        }
    }
}
impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "({}) {} {}\n {} - {}",
            self.sex, self.first_name, self.last_name, self.born, self.died
        )
    }
}

// ------------- Population -------------
// The registry owns every person; all relations are ids into it.
#[derive(Debug, Default, Clone)]
pub struct Population {
    people: Vec<Person>,
}

impl Population {
    pub fn new() -> Self {
        Self { people: Vec::new() }
    }
    pub fn len(&self) -> usize {
        self.people.len()
    }
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
    pub fn get(&self, id: PersonId) -> Result<&Person> {
        self.people.get(id).ok_or(GeneaError::UnknownPerson(id))
    }
    pub fn contains(&self, id: PersonId) -> bool {
        id < self.people.len()
    }
    pub fn iter(&self) -> impl Iterator<Item = (PersonId, &Person)> {
        self.people.iter().enumerate()
    }
    fn check(&self, id: PersonId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(GeneaError::UnknownPerson(id))
        }
    }
    /// Adds a person, dropping whatever links it carried.
    pub fn add(&mut self, mut person: Person) -> PersonId {
        person.father = None;
        person.mother = None;
        person.children.clear();
        self.people.push(person);
        self.people.len() - 1
    }
    /// Moves every person of `other` to the end of this population, keeping
    /// their relations. Returns the ids they were given.
    pub fn append(&mut self, other: Population) -> Range<PersonId> {
        let offset = self.people.len();
        for mut person in other.people {
            person.shift_links(|id| id + offset);
            self.people.push(person);
        }
        offset..self.people.len()
    }
    /// Replaces name, sex and dates of a person while keeping its links.
    pub fn overwrite(&mut self, id: PersonId, with: Person) -> Result<()> {
        self.check(id)?;
        let person = &mut self.people[id];
        person.first_name = with.first_name;
        person.last_name = with.last_name;
        person.sex = with.sex;
        person.born = with.born;
        person.died = with.died;
        Ok(())
    }
    pub fn search(&self, name: &str) -> Vec<PersonId> {
        self.iter()
            .filter(|(_, p)| p.first_name == name || p.last_name == name)
            .map(|(id, _)| id)
            .collect()
    }

    /// Children of the father other than `id`, then children of the mother not
    /// already listed. Full siblings appear once.
    pub fn siblings(&self, id: PersonId) -> Vec<PersonId> {
        let mut siblings: Vec<PersonId> = Vec::new();
        let person = &self.people[id];
        for parent in [person.father, person.mother].into_iter().flatten() {
            for &child in self.people[parent].children.iter() {
                if child != id && !siblings.contains(&child) {
                    siblings.push(child);
                }
            }
        }
        siblings
    }
    /// The other parents of the children of `id`, in children order.
    pub fn spouses(&self, id: PersonId) -> Vec<PersonId> {
        let mut spouses: Vec<PersonId> = Vec::new();
        for &child in self.people[id].children.iter() {
            let child = &self.people[child];
            let other = if child.father == Some(id) {
                child.mother
            } else {
                child.father
            };
            if let Some(other) = other {
                if other != id && !spouses.contains(&other) {
                    spouses.push(other);
                }
            }
        }
        spouses
    }

    // ------------- Mutators -------------
    /// Installs `parent` in the given slot of `child`. An occupied slot is
    /// replaced, not rejected, and the displaced parent is returned.
    pub fn set_parent(
        &mut self,
        child: PersonId,
        parent: PersonId,
        slot: Parent,
    ) -> Result<Option<PersonId>> {
        self.check(child)?;
        self.check(parent)?;
        let previous = self.people[child].parent(slot);
        if previous == Some(parent) {
            return Ok(None);
        }
        if let Some(previous) = previous {
            warn!(person = child, previous, replacement = parent, "{} replaced", slot.name());
            self.people[previous].unlist_child(child);
        }
        *self.people[child].parent_slot(slot) = Some(parent);
        self.people[parent].children.push(child);
        debug!(person = child, parent, "{} set", slot.name());
        Ok(previous)
    }
    pub fn set_father(&mut self, child: PersonId, father: PersonId) -> Result<Option<PersonId>> {
        self.set_parent(child, father, Parent::Father)
    }
    pub fn set_mother(&mut self, child: PersonId, mother: PersonId) -> Result<Option<PersonId>> {
        self.set_parent(child, mother, Parent::Mother)
    }
    /// Attaches `other` as a child of `of`, in the slot given by the sex of `of`.
    pub fn set_child(&mut self, of: PersonId, other: PersonId) -> Result<Option<PersonId>> {
        let slot = Parent::of(self.get(of)?.sex);
        self.set_parent(other, of, slot)
    }
    /// Gives `other` every parent `of` has. Parents `other` had in those slots
    /// are displaced.
    pub fn set_sibling(&mut self, of: PersonId, other: PersonId) -> Result<()> {
        self.check(other)?;
        let (father, mother) = {
            let person = self.get(of)?;
            (person.father, person.mother)
        };
        if father.is_none() && mother.is_none() {
            return Err(GeneaError::NoKnownParent);
        }
        if let Some(father) = father {
            self.set_father(other, father)?;
        }
        if let Some(mother) = mother {
            self.set_mother(other, mother)?;
        }
        Ok(())
    }
    /// Severs the link between `child` and the parent in `slot`, returning that parent.
    pub fn rm_parent(&mut self, child: PersonId, slot: Parent) -> Result<PersonId> {
        self.check(child)?;
        match self.people[child].parent_slot(slot).take() {
            Some(parent) => {
                self.people[parent].unlist_child(child);
                debug!(person = child, parent, "{} removed", slot.name());
                Ok(parent)
            }
            None => {
                warn!(person = child, "no {} to remove", slot.name());
                Err(GeneaError::NotSet(slot.name().to_string()))
            }
        }
    }
    pub fn rm_father(&mut self, child: PersonId) -> Result<PersonId> {
        self.rm_parent(child, Parent::Father)
    }
    pub fn rm_mother(&mut self, child: PersonId) -> Result<PersonId> {
        self.rm_parent(child, Parent::Mother)
    }
    /// Detaches the first child of `parent` whose first name is `name`.
    pub fn rm_child(&mut self, parent: PersonId, name: &str) -> Result<PersonId> {
        if name.is_empty() {
            return Err(GeneaError::SpecifierRequired("child".into()));
        }
        let child = self
            .get(parent)?
            .children
            .iter()
            .copied()
            .find(|&c| self.people[c].first_name == name)
            .ok_or_else(|| GeneaError::NoMatch {
                relation: "child".into(),
                specifier: name.into(),
            })?;
        self.detach_child(parent, child)?;
        Ok(child)
    }
    fn detach_child(&mut self, parent: PersonId, child: PersonId) -> Result<()> {
        let person = &mut self.people[child];
        let slot = if person.father == Some(parent) {
            &mut person.father
        } else if person.mother == Some(parent) {
            &mut person.mother
        } else {
            error!(person = child, parent, "child does not point back at its parent");
            return Err(GeneaError::Invariant(format!(
                "person {} is listed as a child of {} without being linked to it",
                child, parent
            )));
        };
        *slot = None;
        self.people[parent].unlist_child(child);
        Ok(())
    }
    /// Removes a person outright. All its links are severed first, then every
    /// later person is renumbered one step down.
    pub fn remove(&mut self, id: PersonId) -> Result<Person> {
        self.check(id)?;
        for slot in [Parent::Father, Parent::Mother] {
            if let Some(parent) = self.people[id].parent_slot(slot).take() {
                self.people[parent].unlist_child(id);
            }
        }
        while let Some(&child) = self.people[id].children.first() {
            self.detach_child(id, child)?;
        }
        let removed = self.people.remove(id);
        for person in self.people.iter_mut() {
            person.shift_links(|other| if other > id { other - 1 } else { other });
        }
        debug!(person = id, remaining = self.people.len(), "person removed");
        Ok(removed)
    }
}
impl Index<PersonId> for Population {
    type Output = Person;
    fn index(&self, id: PersonId) -> &Person {
        &self.people[id]
    }
}
