use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use genea::config::Settings;
use genea::construct::PersonId;
use genea::interface::{Session, Target};
use genea::relation::RelationPath;
use genea::{GeneaError, Result};

const HELP: &str = "\
Commands (the cursor is always on a person once someone exists):
  create <first> <last> <M|F> <birth> [<death>]        create an unrelated person
  add <relation> <first> <last> <M|F> <birth> [<death>] create the <relation> of the cursor
  overwrite <first> <last> <M|F> <birth> [<death>]     rewrite the cursor
  attach <relation> <id> | <relation> <id1> <id2>      link existing persons
  remove <relation> | <id>                             sever a relation or remove a person
  info [<relation> | <id>]                             describe people
  list | search <name>                                 list everyone or match a name
  select <relation> | <id>                             move the cursor
  dump <file> | load <file>                            write or append a tree file
  generate-graph <file>                                write <file>.dot for Graphviz
Relations: father, mother, child[:<first>], sibling[:<first>], spouse[:<first>],
children, siblings; chained with '.', e.g. father.sibling:Alice.children";

fn usage(program: &str) {
    eprintln!("Usage:");
    eprintln!("\t{}\t\t\t# starts a new empty tree", program);
    eprintln!("\t{} <file>\t\t# loads an existing tree", program);
    eprintln!("\t{} -h | --help\t# prints this message", program);
}

fn show(session: &Session, ids: &[PersonId]) -> Result<()> {
    if ids.is_empty() {
        println!("Nobody");
    }
    for id in ids {
        println!("{}", session.describe(*id)?);
    }
    Ok(())
}

fn arity(args: &[&str], allowed: &[usize], expected: &'static str) -> Result<()> {
    if allowed.contains(&args.len()) {
        Ok(())
    } else {
        Err(GeneaError::ArgumentCount {
            expected,
            found: args.len(),
        })
    }
}

fn parse_id(token: &str) -> Result<PersonId> {
    match token.parse::<Target>()? {
        Target::Id(id) => Ok(id),
        Target::Path(_) => Err(GeneaError::Parse {
            message: format!("{} is not a valid ID", token),
            col: None,
        }),
    }
}

fn execute(session: &mut Session, command: &str, args: &[&str]) -> Result<()> {
    match command {
        "help" => eprintln!("{}", HELP),
        "create" => {
            let id = session.create(args)?;
            println!("Created person ID {}", id);
            show(session, &[id])?;
        }
        "add" => {
            arity(args, &[5, 6], "5 or 6")?;
            let path: RelationPath = args[0].parse()?;
            let id = session.add(&path, &args[1..])?;
            println!("Created person ID {}", id);
            show(session, &[id])?;
        }
        "overwrite" => {
            let id = session.overwrite(args)?;
            show(session, &[id])?;
        }
        "attach" => {
            match args {
                [path, other] => session.attach(&path.parse::<RelationPath>()?, parse_id(other)?)?,
                [path, from, other] => {
                    session.attach_between(&path.parse::<RelationPath>()?, parse_id(from)?, parse_id(other)?)?
                }
                _ => {
                    return Err(GeneaError::ArgumentCount {
                        expected: "2 or 3",
                        found: args.len(),
                    });
                }
            }
        }
        "remove" => {
            arity(args, &[1], "1")?;
            session.remove(&args[0].parse::<Target>()?)?;
        }
        "info" => {
            arity(args, &[0, 1], "0 or 1")?;
            let target = args.first().map(|t| t.parse::<Target>()).transpose()?;
            let ids = session.info(target.as_ref())?;
            show(session, &ids)?;
        }
        "list" => {
            if session.population().is_empty() {
                println!("No person exists yet");
            }
            show(session, &session.list())?;
        }
        "search" => {
            arity(args, &[1], "1")?;
            show(session, &session.search(args[0]))?;
        }
        "select" => {
            arity(args, &[1], "1")?;
            let id = session.select(&args[0].parse::<Target>()?)?;
            show(session, &[id])?;
        }
        "dump" => {
            arity(args, &[1], "1")?;
            session.dump(args[0])?;
            println!("Tree dumped to {}", args[0]);
        }
        "load" => {
            arity(args, &[1], "1")?;
            let ids = session.load(args[0])?;
            println!("Loaded {} people from {}", ids.len(), args[0]);
        }
        "generate-graph" => {
            arity(args, &[1], "1")?;
            let file = session.export_graph(args[0])?;
            println!("Generated DOT file at {}", file.display());
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            eprintln!("Type 'help' to obtain a list of available commands");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            Settings::default()
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("genea");
    if args.len() > 2 {
        usage(program);
        return ExitCode::FAILURE;
    }
    let file = args.get(1).cloned();
    if matches!(file.as_deref(), Some("-h") | Some("--help")) {
        usage(program);
        return ExitCode::SUCCESS;
    }

    let prompt = settings.prompt.clone();
    let mut session = Session::new(settings);
    match file {
        Some(file) => match session.load(&file) {
            Ok(ids) => info!(file = %file, people = ids.len(), "tree loaded"),
            Err(e) => warn!(file = %file, error = %e, "could not load tree, starting empty"),
        },
        None => info!("created empty tree"),
    }

    let interactive = io::stdin().is_terminal();
    let stdin = io::stdin();
    loop {
        if interactive {
            eprint!("{}", prompt);
            let _ = io::stderr().flush();
        }
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => (),
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((command, args)) = tokens.split_first() else {
            continue;
        };
        if let Err(e) = execute(&mut session, command, args) {
            eprintln!("{}: {}", command, e);
        }
    }
    ExitCode::SUCCESS
}
