use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use colored::Colorize;
use itertools::Itertools;
use symlogic::{
    explanation::{Explain, Explanation},
    proof::{matching::Derivation, steps::Proof},
    propositional_logic::parser::{operator_glyphs, parse_statement},
};

use crate::Output;

const HELP: &str = "\
Commands (lines are numbered from 1):
  select <line>...          choose lines for argument forms
  forms                     list argument forms for the selection
  rules <line> [i,j,...]    list replacement rules for a line or a fragment of it
  take <option>             add the listed option as a new line
  fill <line> <statement>   replace the placeholder % on a line
  delete <line>             remove a line nothing depends on
  show                      print the proof
  explain                   print the proof as a tree
  quit                      leave";

/// A derivation offered by the last `forms` or `rules` command.
struct Offer {
    statement: Derivation,
    rule: String,
    sources: Vec<usize>,
}

fn print_help() {
    println!("{HELP}\n\nOperators, loosest binding last:");

    for (name, glyphs) in operator_glyphs() {
        println!("  {name:<14} {}", glyphs.join("  "));
    }
}

struct Session<'o> {
    proof: Proof,
    selected: Vec<usize>,
    offers: Vec<Offer>,
    output: &'o Output,
}

fn line_number(argument: &str) -> anyhow::Result<usize> {
    let number = argument
        .parse::<usize>()
        .with_context(|| format!("\"{argument}\" is not a line number"))?;

    match number.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("Lines are numbered from 1"),
    }
}

impl Session<'_> {
    fn select(&mut self, arguments: &[&str]) -> anyhow::Result<()> {
        let selected = arguments
            .iter()
            .map(|argument| line_number(argument))
            .collect::<anyhow::Result<Vec<_>>>()?;

        for &index in &selected {
            self.proof.line(index)?;
        }

        self.selected = selected;
        Ok(())
    }

    fn forms(&mut self) -> anyhow::Result<()> {
        if self.selected.is_empty() {
            bail!("Select at least one line first");
        }

        let matches = self
            .proof
            .argument_forms(&self.selected, &mut Explanation::default())?;

        let selected = &self.selected;
        let offers = matches
            .iter()
            .flat_map(|found| {
                found.derived.iter().map(move |result| Offer {
                    statement: result.tree.clone(),
                    rule: found.form.abbreviation.to_owned(),
                    sources: selected.clone(),
                })
            })
            .collect();
        self.offers = offers;

        self.print_offers();
        Ok(())
    }

    fn rules(&mut self, arguments: &[&str]) -> anyhow::Result<()> {
        let Some((line, path)) = arguments.split_first() else {
            bail!("Usage: rules <line> [i,j,...]");
        };

        let index = line_number(line)?;
        let path = path
            .iter()
            .flat_map(|part| part.split(','))
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<usize>()
                    .with_context(|| format!("\"{part}\" is not a child index"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let matches = self
            .proof
            .replacement_rules(index, &path, &mut Explanation::default())?;

        let mut offers = Vec::new();
        for found in &matches {
            for whole in &found.spliced {
                offers.push(Offer {
                    statement: Derivation::from(&parse_statement(whole)?),
                    rule: found.rule.abbreviation.to_owned(),
                    sources: vec![index],
                });
            }
        }
        self.offers = offers;

        self.print_offers();
        Ok(())
    }

    fn print_offers(&self) {
        if self.offers.is_empty() {
            println!("Nothing applies.");
        }

        for (number, offer) in self.offers.iter().enumerate() {
            println!(
                "  [{}] {}    {}",
                number + 1,
                self.output.paint(offer.statement.to_string().as_str().green()),
                offer.rule
            );
        }
    }

    fn take(&mut self, argument: &str) -> anyhow::Result<()> {
        let Some(offer) = line_number(argument)
            .ok()
            .and_then(|index| self.offers.get(index))
        else {
            bail!("There is no option {argument}");
        };

        self.proof.push(
            offer.statement.clone(),
            offer.rule.clone(),
            offer.sources.clone(),
        )?;
        self.offers.clear();

        self.show();
        Ok(())
    }

    fn fill(&mut self, line: &str, statement: &str) -> anyhow::Result<()> {
        let index = line_number(line)?;
        let replacement = parse_statement(statement)
            .map_err(|error| anyhow::anyhow!("{error}\n{}", error.caret(statement)))?;

        self.proof.fill(index, &replacement)?;

        self.show();
        Ok(())
    }

    fn delete(&mut self, argument: &str) -> anyhow::Result<()> {
        let index = line_number(argument)?;

        self.proof.remove(index)?;
        self.selected.clear();
        self.offers.clear();

        self.show();
        Ok(())
    }

    fn show(&self) {
        println!("{}", self.proof);

        if self.proof.is_complete() {
            println!("{}", self.output.paint("Proof complete.".green().bold()));
        }
    }

    /// Runs one command line; returns `false` once the session should end.
    fn execute(&mut self, input: &str) -> anyhow::Result<bool> {
        let (command, rest) = input.trim().split_once(' ').unwrap_or((input.trim(), ""));
        let arguments = rest.split_whitespace().collect::<Vec<_>>();

        tracing::debug!(command, ?arguments, "proof command");

        match command {
            "" => {}
            "select" => self.select(&arguments)?,
            "forms" => self.forms()?,
            "rules" => self.rules(&arguments)?,
            "take" => self.take(rest.trim())?,
            "fill" => {
                let Some((line, statement)) = rest.trim().split_once(' ') else {
                    bail!("Usage: fill <line> <statement>");
                };
                self.fill(line, statement.trim())?;
            }
            "delete" => self.delete(rest.trim())?,
            "show" => self.show(),
            "explain" => {
                let mut explanation = Explanation::default();
                self.proof.explain(&mut explanation);
                println!("{explanation}");
            }
            "help" => print_help(),
            "quit" | "exit" => return Ok(false),
            other => bail!("Unknown command \"{other}\"; type help for a list"),
        }

        Ok(true)
    }
}

pub fn run(premises: &[String], conclusion: &str, output: &Output) -> anyhow::Result<()> {
    let mut session = Session {
        proof: Proof::new(premises, conclusion)?,
        selected: Vec::new(),
        offers: Vec::new(),
        output,
    };

    println!(
        "Proving {} from {}",
        output.paint(session.proof.conclusion().to_string().as_str().blue().bold()),
        premises.iter().join(", ")
    );
    print_help();
    println!();
    session.show();

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        match session.execute(&input) {
            Ok(true) => {}
            Ok(false) => break,
            Err(error) => eprintln!("{}", output.paint(format!("{error:#}").as_str().red())),
        }
    }

    Ok(())
}
