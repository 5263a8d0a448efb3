use genea::GeneaError;
use genea::construct::{Person, PersonId, Population};
use genea::relation::{Relation, Step, rm_relation};

fn person(args: &str) -> Person {
    let args: Vec<&str> = args.split_whitespace().collect();
    Person::from_args(&args).expect("person")
}

fn population(people: &[&str]) -> Population {
    let mut population = Population::new();
    for args in people {
        population.add(person(args));
    }
    population
}

// Every parent link has its children entry and the other way around.
fn assert_consistent(population: &Population) {
    for (id, person) in population.iter() {
        for parent in [person.father(), person.mother()].into_iter().flatten() {
            assert!(
                population[parent].children().contains(&id),
                "{id} is not listed among the children of {parent}"
            );
        }
        for &child in person.children() {
            let child_person = &population[child];
            assert!(
                child_person.father() == Some(id) || child_person.mother() == Some(id),
                "{child} does not point back at {id}"
            );
        }
    }
}

#[test]
fn from_args_checks_arity_and_tokens() {
    assert!(matches!(
        Person::from_args(&["Bob", "Smith", "M"]),
        Err(GeneaError::ArgumentCount { found: 3, .. })
    ));
    assert!(matches!(
        Person::from_args(&["Bob", "Smith", "X", "1920"]),
        Err(GeneaError::InvalidSex(_))
    ));
    assert!(matches!(
        Person::from_args(&["Bob", "Smith", "M", "12/6"]),
        Err(GeneaError::InvalidDate(_))
    ));
    let bob = person("Bob Smith M 1920 3/1990");
    assert_eq!(bob.to_string(), "(M) Bob Smith\n 1920 - 3/1990");
}

#[test]
fn replacing_a_parent_returns_the_displaced_one() {
    let mut population = population(&["Ann Smith F 2000", "Bob Smith M 1970", "Carl Doe M 1971"]);
    assert_eq!(population.set_father(0, 1).unwrap(), None);
    assert_eq!(population.set_father(0, 2).unwrap(), Some(1));
    assert_eq!(population[0].father(), Some(2));
    assert!(population[1].children().is_empty());
    assert_eq!(population[2].children(), &[0]);
    assert_consistent(&population);
}

#[test]
fn setting_the_same_parent_twice_changes_nothing() {
    let mut population = population(&["Ann Smith F 2000", "Bob Smith M 1970"]);
    population.set_father(0, 1).unwrap();
    assert_eq!(population.set_father(0, 1).unwrap(), None);
    assert_eq!(population[1].children(), &[0]);
}

#[test]
fn removing_an_absent_parent_fails() {
    let mut population = population(&["Ann Smith F 2000", "Bob Smith M 1970"]);
    population.set_father(0, 1).unwrap();
    assert_eq!(population.rm_father(0).unwrap(), 1);
    assert!(matches!(population.rm_father(0), Err(GeneaError::NotSet(slot)) if slot == "father"));
    assert!(matches!(population.rm_mother(0), Err(GeneaError::NotSet(_))));
    assert!(population[1].children().is_empty());
    assert_consistent(&population);
}

#[test]
fn set_child_uses_the_sex_of_the_parent() {
    let mut population = population(&["Eve Jones F 1950", "Ann Smith F 1975"]);
    population.set_child(0, 1).unwrap();
    assert_eq!(population[1].mother(), Some(0));
    assert_eq!(population[1].father(), None);
    assert_consistent(&population);
}

#[test]
fn siblings_share_every_known_parent() {
    let mut population = population(&[
        "Bob Smith M 1920",
        "Carol Smith F 1922",
        "Dan Smith M 1950",
        "Alice Smith F 1952",
        "Carl Doe M 1921",
    ]);
    population.set_father(2, 0).unwrap();
    population.set_mother(2, 1).unwrap();
    population.set_father(3, 4).unwrap();

    population.set_sibling(2, 3).unwrap();
    assert_eq!(population[3].father(), Some(0));
    assert_eq!(population[3].mother(), Some(1));
    assert!(population[4].children().is_empty());
    assert_eq!(population.siblings(2), vec![3]);
    assert_eq!(population.siblings(3), vec![2]);
    assert_consistent(&population);
}

#[test]
fn sibling_needs_a_known_parent() {
    let mut population = population(&["Ann Smith F 1975", "Ben Smith M 1977"]);
    assert!(matches!(population.set_sibling(0, 1), Err(GeneaError::NoKnownParent)));
    assert_eq!(population[1].father(), None);
}

#[test]
fn rm_child_matches_by_first_name() {
    let mut population = population(&["Dan Smith M 1950", "Ann Smith F 1975", "Ben Smith M 1977"]);
    population.set_child(0, 1).unwrap();
    population.set_child(0, 2).unwrap();

    assert!(matches!(population.rm_child(0, ""), Err(GeneaError::SpecifierRequired(_))));
    assert!(matches!(population.rm_child(0, "Zed"), Err(GeneaError::NoMatch { .. })));
    assert_eq!(population.rm_child(0, "Ben").unwrap(), 2);
    assert_eq!(population[0].children(), &[1]);
    assert_eq!(population[2].father(), None);
    assert_consistent(&population);
}

#[test]
fn rm_relation_by_step() {
    let mut population = population(&["Dan Smith M 1950", "Ann Smith F 1975"]);
    population.set_child(0, 1).unwrap();

    let child = Step::new(Relation::Child, None).unwrap();
    assert!(matches!(
        rm_relation(&mut population, &child, 0),
        Err(GeneaError::SpecifierRequired(_))
    ));
    let spouse = Step::new(Relation::Spouse, None).unwrap();
    assert!(matches!(
        rm_relation(&mut population, &spouse, 0),
        Err(GeneaError::UnsupportedRelation(_))
    ));
    let father = Step::new(Relation::Father, None).unwrap();
    assert_eq!(rm_relation(&mut population, &father, 1).unwrap(), 0);
    assert!(population[0].children().is_empty());
}

#[test]
fn same_person_as_both_parents() {
    let mut population = population(&["Pat Smith M 1950", "Ann Smith F 1975"]);
    population.set_father(1, 0).unwrap();
    population.set_mother(1, 0).unwrap();
    assert_eq!(population[0].children(), &[1, 1]);
    population.rm_father(1).unwrap();
    assert_eq!(population[0].children(), &[1]);
    assert_eq!(population[1].mother(), Some(0));
}

#[test]
fn removing_a_person_renumbers_the_rest() {
    // 0 Bob + 1 Carol -> 2 Dan; 2 Dan + 3 Eve -> 4 Ann
    let mut population = population(&[
        "Bob Smith M 1920",
        "Carol Smith F 1922",
        "Dan Smith M 1950",
        "Eve Jones F 1951",
        "Ann Smith F 1975",
    ]);
    population.set_father(2, 0).unwrap();
    population.set_mother(2, 1).unwrap();
    population.set_father(4, 2).unwrap();
    population.set_mother(4, 3).unwrap();

    let removed = population.remove(1).unwrap();
    assert_eq!(removed.first_name(), "Carol");
    assert_eq!(population.len(), 4);

    let dan: PersonId = 1;
    let ann: PersonId = 3;
    assert_eq!(population[dan].first_name(), "Dan");
    assert_eq!(population[dan].father(), Some(0));
    assert_eq!(population[dan].mother(), None);
    assert_eq!(population[ann].father(), Some(dan));
    assert_eq!(population[ann].mother(), Some(2));
    assert_eq!(population[0].children(), &[dan]);
    assert_consistent(&population);

    population.remove(dan).unwrap();
    assert_eq!(population[2].father(), None);
    assert!(population[0].children().is_empty());
    assert_consistent(&population);

    assert!(matches!(population.remove(10), Err(GeneaError::UnknownPerson(10))));
}

#[test]
fn add_drops_foreign_links() {
    let mut population = population(&["Dan Smith M 1950", "Ann Smith F 1975"]);
    population.set_child(0, 1).unwrap();
    let copy = population[0].clone();
    let id = population.add(copy);
    assert!(population[id].children().is_empty());
    assert_eq!(population[0].children(), &[1]);
}

#[test]
fn overwrite_keeps_links() {
    let mut population = population(&["Dan Smith M 1950", "Ann Smith F 1975"]);
    population.set_child(0, 1).unwrap();
    population.overwrite(1, person("Anna Smith F 6/1975 2020")).unwrap();
    assert_eq!(population[1].first_name(), "Anna");
    assert_eq!(population[1].father(), Some(0));
    assert_eq!(population[1].died().to_string(), "2020");
    assert!(population.overwrite(5, person("X Y M 1900")).is_err());
}

#[test]
fn append_shifts_relations() {
    let mut first = population(&["Zed Doe M 1900"]);
    let mut second = population(&["Dan Smith M 1950", "Ann Smith F 1975"]);
    second.set_child(0, 1).unwrap();

    let ids = first.append(second);
    assert_eq!(ids, 1..3);
    assert_eq!(first[2].father(), Some(1));
    assert_eq!(first[1].children(), &[2]);
    assert_consistent(&first);
}

#[test]
fn search_matches_either_name() {
    let population = population(&["Dan Smith M 1950", "Ann Smith F 1975", "Smith Jones M 1960"]);
    assert_eq!(population.search("Smith"), vec![0, 1, 2]);
    assert_eq!(population.search("Ann"), vec![1]);
    assert!(population.search("ann").is_empty());
}
