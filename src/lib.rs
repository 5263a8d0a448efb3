//! Genea – a genealogical record set and the relation graph engine behind it.
//!
//! A population is a flat registry of persons linked by father, mother and
//! children relations:
//! * A [`construct::Person`] carries a name, a [`datatype::Sex`], a partial
//!   birth [`datatype::Date`] and an optional [`datatype::Death`].
//! * A [`construct::Population`] owns every person; relations are
//!   [`construct::PersonId`]s into it, never owning handles. A person is listed
//!   among the children of `p` exactly when `p` is its father or mother, and
//!   every mutator keeps both sides of a link in step.
//!
//! ## Modules
//! * [`construct`] – persons, the population arena and the relation mutators.
//! * [`datatype`] – sex, partial dates and the death sum type.
//! * [`relation`] – dotted relation paths (`father.sibling:Alice.children`),
//!   their resolver and mutation by relation name. Grammar in `relation.pest`.
//! * [`generation`] – generation layering and deterministic union nodes.
//! * [`persist`] – the line-oriented text format.
//! * [`render`] – DOT output for the layered tree.
//! * [`interface`] – [`interface::Session`], the explicit context (population +
//!   cursor) the command loop drives.
//! * [`config`] – settings from `genea.toml` and `GENEA_*` variables.
//!
//! ## Quick Start
//! ```
//! use genea::interface::{Session, Target};
//! use genea::relation::RelationPath;
//! let mut session = Session::default();
//! let alice = session.create(&["Alice", "Smith", "F", "1950"]).unwrap();
//! let path: RelationPath = "father".parse().unwrap();
//! let bob = session.add(&path, &["Bob", "Smith", "M", "1920"]).unwrap();
//! let children: Target = "father.children".parse().unwrap();
//! assert_eq!(session.info(Some(&children)).unwrap(), vec![alice]);
//! assert_eq!(session.population()[alice].father(), Some(bob));
//! ```

pub mod config;
pub mod construct;
pub mod datatype;
pub mod error;
pub mod generation;
pub mod interface;
pub mod persist;
pub mod relation;
pub mod render;

pub use error::{GeneaError, Result};
