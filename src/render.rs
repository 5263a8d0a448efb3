//! Graphviz (DOT) description of a layered population.
//!
//! Each generation becomes a `rank = same` subgraph, co-parents are joined
//! through a point-shaped union node and children hang below the union (or
//! their single known parent). Turning the text into an image is left to
//! whoever runs `dot`.
use std::fmt::Write as _;

use crate::config::GraphSettings;
use crate::construct::{PersonId, Population};
use crate::datatype::Sex;
use crate::error::Result;
use crate::generation::{Descent, RankMember, descent};

fn node(id: PersonId) -> String {
    format!("n{}", id)
}

fn person_node(population: &Population, id: PersonId, settings: &GraphSettings) -> Result<String> {
    let person = population.get(id)?;
    let color = match person.sex() {
        Sex::Male => &settings.male_color,
        Sex::Female => &settings.female_color,
    };
    let label = format!(
        "{} {}\\n{} - {}",
        person.first_name(),
        person.last_name(),
        person.born(),
        person.died()
    )
    .replace('"', "\\\"");
    Ok(format!(
        "{} [shape=box, style=filled, color={}, label=\"{}\"]",
        node(id),
        color,
        label
    ))
}

pub fn dot(population: &Population, ranks: &[Vec<RankMember>], settings: &GraphSettings) -> Result<String> {
    let mut out = String::new();
    // writing into a String can not fail
    let _ = writeln!(out, "graph G {{");
    let _ = writeln!(
        out,
        "graph [newrank=true, ranksep={}, concentrate=true, overlap=false, splines=true]",
        settings.ranksep
    );
    let _ = writeln!(out, "edge [dir=none]");
    for (generation, rank) in ranks.iter().enumerate() {
        let _ = writeln!(out, "subgraph gen{} {{", generation);
        let _ = writeln!(out, "rank = same");
        let mut previous: Option<PersonId> = None;
        let mut joined: Option<PersonId> = None;
        for member in rank {
            match member {
                RankMember::Person(id) => {
                    let _ = writeln!(out, "{}", person_node(population, *id, settings)?);
                    if let Some(previous) = previous {
                        if joined != Some(*id) {
                            let _ = writeln!(out, "{}--{} [style=invis]", node(previous), node(*id));
                        }
                    }
                    previous = Some(*id);
                    joined = None;
                }
                RankMember::Union(union) => {
                    let _ = writeln!(out, "{} [shape=point, width=0.05]", union.id);
                    // a later spouse's union stays to the right of the previous spouse
                    if let Some(previous) = previous {
                        if previous != union.person {
                            let _ = writeln!(out, "{}--{} [style=invis]", node(previous), union.id);
                        }
                    }
                    let _ = writeln!(
                        out,
                        "{}--{}--{}",
                        node(union.person),
                        union.id,
                        node(union.spouse)
                    );
                    joined = Some(union.spouse);
                }
            }
        }
        let _ = writeln!(out, "}}");
        for member in rank {
            if let RankMember::Person(id) = member {
                match descent(population, *id)? {
                    Some(Descent::Union(union)) => {
                        let _ = writeln!(out, "{}:s--{}:n", union, node(*id));
                    }
                    Some(Descent::Parent(parent)) => {
                        let _ = writeln!(out, "{}:s--{}:n", node(parent), node(*id));
                    }
                    None => (),
                }
            }
        }
    }
    let _ = writeln!(out, "}}");
    Ok(out)
}
