// The persisted form of a population is plain text:
//
//   N
//   <first name> <last name> <M|F> <birth> [<death>]     (N lines)
//   <father index|-1> <mother index|-1>                  (N lines)
//
// Indexes refer to positions in the person block. Loading either yields a
// complete population or nothing at all.
use tracing::{debug, info};

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::construct::{Person, PersonId, Population};
use crate::datatype::Death;
use crate::error::{GeneaError, Result};

pub fn encode(population: &Population) -> String {
    let mut out = String::new();
    // writing into a String can not fail
    let _ = writeln!(out, "{}", population.len());
    for (_, person) in population.iter() {
        let _ = write!(
            out,
            "{} {} {} {}",
            person.first_name(),
            person.last_name(),
            person.sex(),
            person.born()
        );
        if let Death::Known(date) = person.died() {
            let _ = write!(out, " {}", date);
        }
        out.push('\n');
    }
    let index = |link: Option<PersonId>| link.map_or(-1, |id| id as i64);
    for (_, person) in population.iter() {
        let _ = writeln!(out, "{} {}", index(person.father()), index(person.mother()));
    }
    out
}

pub fn decode(text: &str) -> Result<Population> {
    let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line));
    let corrupted = |line: usize, message: &str| GeneaError::Corrupted {
        line,
        message: message.to_string(),
    };

    let (line, count) = lines.next().ok_or_else(|| corrupted(1, "missing count"))?;
    let count: usize = count
        .trim()
        .parse()
        .map_err(|_| corrupted(line, "unreadable count"))?;

    let mut population = Population::new();
    for _ in 0..count {
        let (line, text) = lines
            .next()
            .ok_or_else(|| corrupted(line + population.len() + 1, "missing person"))?;
        let args: Vec<&str> = text.split_whitespace().collect();
        let person =
            Person::from_args(&args).map_err(|e| corrupted(line, &e.to_string()))?;
        population.add(person);
    }

    for id in 0..count {
        let (line, text) = lines
            .next()
            .ok_or_else(|| corrupted(count + id + 2, "missing relations"))?;
        let indexes = text
            .split_whitespace()
            .map(|token| token.parse::<i64>())
            .collect::<std::result::Result<Vec<i64>, _>>()
            .map_err(|_| corrupted(line, "relations must be integers"))?;
        let &[father, mother] = indexes.as_slice() else {
            return Err(corrupted(line, "expected a father and a mother index"));
        };
        // out of range indexes, -1 included, leave the slot empty
        let in_range = |index: i64| usize::try_from(index).ok().filter(|&i| i < count);
        if let Some(father) = in_range(father) {
            population.set_father(id, father)?;
        }
        if let Some(mother) = in_range(mother) {
            population.set_mother(id, mother)?;
        }
    }
    debug!(people = count, "population decoded");
    Ok(population)
}

/// Writes the whole population to `path`. The file is only touched once the
/// text is complete.
pub fn dump(population: &Population, path: impl AsRef<Path>) -> Result<()> {
    let text = encode(population);
    fs::write(path.as_ref(), text)?;
    info!(path = %path.as_ref().display(), people = population.len(), "population dumped");
    Ok(())
}

pub fn load(path: impl AsRef<Path>) -> Result<Population> {
    let text = fs::read_to_string(path.as_ref())?;
    let population = decode(&text)?;
    info!(path = %path.as_ref().display(), people = population.len(), "population loaded");
    Ok(population)
}
