use genea::config::GraphSettings;
use genea::construct::{Person, Population};
use genea::generation::{Descent, Generations, RankMember, Union, UnionId, descent, layout, unions};
use genea::render;

fn person(args: &str) -> Person {
    let args: Vec<&str> = args.split_whitespace().collect();
    Person::from_args(&args).expect("person")
}

// 0 Bob + 1 Carol -> 2 Dan
// 2 Dan + 3 Eve   -> 4 Ann
fn three_generations() -> Population {
    let mut population = Population::new();
    for args in [
        "Bob Smith M 1920",
        "Carol Smith F 1922 1990",
        "Dan Smith M 1950",
        "Eve Jones F 1951",
        "Ann Smith F 1975",
    ] {
        population.add(person(args));
    }
    population.set_father(2, 0).unwrap();
    population.set_mother(2, 1).unwrap();
    population.set_father(4, 2).unwrap();
    population.set_mother(4, 3).unwrap();
    population
}

#[test]
fn levels_are_relative_to_the_start() {
    let population = three_generations();
    let generations = Generations::compute(&population, 4).unwrap();
    assert_eq!(generations.buckets(), &[vec![0, 1], vec![2, 3], vec![4]]);
    assert_eq!(generations.oldest(), Some(0));
    assert_eq!(generations.level_of(4), Some(2));
    assert_eq!(generations.level_of(1), Some(0));
}

#[test]
fn children_are_placed_before_their_parent() {
    let population = three_generations();
    let generations = Generations::compute(&population, 0).unwrap();
    assert_eq!(generations.buckets(), &[vec![1, 0], vec![3, 2], vec![4]]);
    assert_eq!(generations.oldest(), Some(1));
}

#[test]
fn everyone_connected_is_placed_exactly_once() {
    let mut population = three_generations();
    let stranger = population.add(person("Zed Doe M 1900"));
    let generations = Generations::compute(&population, 2).unwrap();
    let mut people: Vec<_> = generations.people().collect();
    people.sort();
    assert_eq!(people, vec![0, 1, 2, 3, 4]);
    assert_eq!(generations.level_of(stranger), None);

    let alone = Generations::compute(&population, stranger).unwrap();
    assert_eq!(alone.buckets(), &[vec![stranger]]);
    assert!(Generations::compute(&population, 99).is_err());
}

#[test]
fn union_ids_ignore_the_side() {
    assert_eq!(UnionId::new(7, 3), UnionId::new(3, 7));
    assert_eq!(UnionId::new(7, 3).to_string(), "r3x7");
    assert_eq!(UnionId::new(7, 3).partners(), (3, 7));

    let population = three_generations();
    let from_dan = unions(&population, 2).unwrap();
    let from_eve = unions(&population, 3).unwrap();
    assert_eq!(from_dan.len(), 1);
    assert_eq!(from_dan[0].id, from_eve[0].id);
    assert_eq!(from_dan[0].spouse, 3);
    assert_eq!(from_eve[0].spouse, 2);
}

#[test]
fn descent_goes_through_the_union() {
    let mut population = three_generations();
    assert_eq!(descent(&population, 4).unwrap(), Some(Descent::Union(UnionId::new(2, 3))));
    assert_eq!(descent(&population, 0).unwrap(), None);
    population.rm_father(4).unwrap();
    assert_eq!(descent(&population, 4).unwrap(), Some(Descent::Parent(3)));
}

#[test]
fn layout_sits_spouses_next_to_their_union() {
    let population = three_generations();
    let generations = Generations::compute(&population, 0).unwrap();
    let ranks = layout(&population, &generations).unwrap();
    let union = |person, spouse| {
        RankMember::Union(Union {
            id: UnionId::new(person, spouse),
            person,
            spouse,
        })
    };
    assert_eq!(
        ranks,
        vec![
            vec![RankMember::Person(1), union(1, 0), RankMember::Person(0)],
            vec![RankMember::Person(3), union(3, 2), RankMember::Person(2)],
            vec![RankMember::Person(4)],
        ]
    );
}

#[test]
fn dot_output_joins_unions_and_descent() {
    let population = three_generations();
    let generations = Generations::compute(&population, 0).unwrap();
    let ranks = layout(&population, &generations).unwrap();
    let dot = render::dot(&population, &ranks, &GraphSettings::default()).unwrap();

    assert!(dot.starts_with("graph G {\n"));
    assert!(dot.trim_end().ends_with('}'));
    assert!(dot.contains("ranksep=3"));
    assert!(dot.contains("subgraph gen0 {\nrank = same\n"));
    assert!(dot.contains("subgraph gen2 {"));
    assert!(dot.contains("n0 [shape=box, style=filled, color=lightblue, label=\"Bob Smith\\n1920 - \"]"));
    assert!(dot.contains("n1 [shape=box, style=filled, color=pink, label=\"Carol Smith\\n1922 - 1990\"]"));
    assert!(dot.contains("r0x1 [shape=point, width=0.05]"));
    assert!(dot.contains("n1--r0x1--n0"));
    assert!(dot.contains("r0x1:s--n2:n"));
    assert!(dot.contains("r2x3:s--n4:n"));
    // partners are joined through the union, not an invisible edge
    assert!(!dot.contains("n1--n0 [style=invis]"));
}

// Person i is the father of person i + 1.
fn chain(length: usize) -> Population {
    let mut population = Population::new();
    for i in 0..length {
        let id = population.add(person("Heir Line M 1900"));
        if i > 0 {
            population.set_father(id, id - 1).unwrap();
        }
    }
    population
}

#[test]
fn long_lines_of_descent_are_layered() {
    let population = chain(10_000);
    let generations = Generations::compute(&population, 0).unwrap();
    assert_eq!(generations.len(), 10_000);
    assert_eq!(generations.buckets()[0], vec![0]);
    assert_eq!(generations.buckets()[9_999], vec![9_999]);

    let from_last = Generations::compute(&population, 9_999).unwrap();
    assert_eq!(from_last.oldest(), Some(0));
    assert_eq!(from_last.level_of(9_999), Some(9_999));

    let ranks = layout(&population, &generations).unwrap();
    assert_eq!(ranks.len(), 10_000);
    assert!(ranks.iter().all(|rank| rank.len() == 1));
}

#[test]
fn long_chains_of_co_parents_are_threaded() {
    // partner i and partner i + 1 share child i
    let partners = 10_000;
    let mut population = Population::new();
    for _ in 0..=partners {
        population.add(person("Partner Line F 1900"));
    }
    for i in 0..partners {
        let child = population.add(person("Child Line M 1930"));
        population.set_father(child, i).unwrap();
        population.set_mother(child, i + 1).unwrap();
    }
    let generations = Generations::compute(&population, 0).unwrap();
    assert_eq!(generations.len(), 2);
    assert_eq!(generations.buckets()[0].len(), partners + 1);
    assert_eq!(generations.buckets()[1].len(), partners);

    let ranks = layout(&population, &generations).unwrap();
    let unions = ranks[0]
        .iter()
        .filter(|member| matches!(member, RankMember::Union(_)))
        .count();
    assert_eq!(unions, partners);
    assert_eq!(ranks[0].len(), 2 * partners + 1);
}

#[test]
fn later_spouses_are_ordered_after_the_previous_one() {
    let mut population = Population::new();
    for args in ["Adam Smith M 1900", "Beth Smith F 1901", "Cora Doe F 1902", "Dora Roe F 1903"] {
        population.add(person(args));
    }
    let union = |person, spouse| {
        RankMember::Union(Union {
            id: UnionId::new(person, spouse),
            person,
            spouse,
        })
    };
    let ranks = vec![vec![
        RankMember::Person(0),
        union(0, 1),
        RankMember::Person(1),
        union(0, 2),
        RankMember::Person(2),
        union(0, 3),
        RankMember::Person(3),
    ]];
    let dot = render::dot(&population, &ranks, &GraphSettings::default()).unwrap();
    assert!(dot.contains("n1--r0x2 [style=invis]"));
    assert!(dot.contains("n2--r0x3 [style=invis]"));
    assert!(!dot.contains("n0--r0x1 [style=invis]"));
    assert!(dot.contains("n0--r0x2--n2"));
}
