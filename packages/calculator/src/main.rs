use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use itertools::Itertools;
use symlogic::{
    config::{EngineConfig, DEFAULT_MAX_VARIABLES},
    error::LogicError,
    explanation::Explanation,
    markdown::Markdown,
    proof::{catalogue::Catalogue, derive},
    propositional_logic::{
        parser::{parse, ParsedStatement},
        syntax::prettify,
        truth_table::{build_joined_table, MainColumns, TruthTable},
        verdict::{check_argument, classify, compare, Relation},
    },
};
use tracing_subscriber::EnvFilter;

mod prove;

#[derive(Parser)]
#[command(name = "calculator")]
#[command(about = "Truth tables, argument checking and proofs for propositional logic")]
struct Cli {
    /// Largest number of distinct symbols a truth table may have
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_VARIABLES)]
    max_variables: usize,

    /// Log what the engine is doing to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print markdown with HTML colouring instead of terminal colours
    #[arg(long, global = true)]
    markdown: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Truth table of a single statement
    Table {
        statement: String,

        /// Only the symbol columns and the result
        #[arg(long)]
        simple: bool,
    },
    /// Compare statements for equivalence and consistency
    Compare {
        #[arg(required = true, num_args = 2..)]
        statements: Vec<String>,
    },
    /// Check an argument; the last statement is the conclusion
    Argument {
        #[arg(required = true, num_args = 2..)]
        statements: Vec<String>,
    },
    /// Argument forms whose premises match the given statements
    Derive {
        #[arg(required = true)]
        statements: Vec<String>,

        #[arg(long)]
        explain: bool,
    },
    /// Replacement rules applicable to a statement or one of its fragments
    Replace {
        statement: String,

        /// Child indices from the root, e.g. `1,0`
        #[arg(long, value_delimiter = ',')]
        path: Vec<usize>,

        #[arg(long)]
        explain: bool,
    },
    /// Build a proof interactively; the last statement is the conclusion
    Prove {
        #[arg(required = true, num_args = 2..)]
        statements: Vec<String>,
    },
}

/// Output settings shared by every command.
pub struct Output {
    pub markdown: bool,
}

impl Output {
    pub fn paint(&self, text: ColoredString) -> String {
        if self.markdown {
            text.markdown()
        } else {
            text.to_string()
        }
    }

    fn table<M: MainColumns>(&self, table: &TruthTable<M>) -> String {
        if self.markdown {
            table.to_markdown()
        } else {
            table.to_string()
        }
    }
}

fn parse_with_caret(text: &str) -> anyhow::Result<ParsedStatement> {
    parse(text).map_err(|error| anyhow::anyhow!("{error}\n{}", error.caret(text)))
}

fn with_caret(error: LogicError, source: &str) -> anyhow::Error {
    match error {
        LogicError::Syntax(error) => anyhow::anyhow!("{error}\n{}", error.caret(source)),
        error => error.into(),
    }
}

fn show_table(
    statement: &str,
    simple: bool,
    config: &EngineConfig,
    output: &Output,
) -> anyhow::Result<()> {
    let parsed = parse_with_caret(statement)?;
    let table = parsed.truth_table(config)?;

    println!("- **Input:** {}\n", output.paint(prettify(statement).as_str().green()));

    let shown = if simple { &table.simple } else { &table.detailed };
    println!("{}", output.table(shown));

    println!(
        "- **Conclusion:** {} is a {}\n",
        parsed.statement,
        output.paint(classify(&table.detailed).to_string().as_str().blue().bold())
    );

    Ok(())
}

fn show_joined(
    statements: &[String],
    is_argument: bool,
    config: &EngineConfig,
    output: &Output,
) -> anyhow::Result<()> {
    let parsed = statements
        .iter()
        .map(|statement| parse_with_caret(statement))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let trees = parsed.iter().map(|parsed| &parsed.syntax).collect::<Vec<_>>();

    let table = build_joined_table(&trees, is_argument, config)?;

    println!(
        "- **Input:** {}\n",
        output.paint(
            statements
                .iter()
                .map(|statement| prettify(statement))
                .join(" / ")
                .as_str()
                .green()
        )
    );
    println!("{}", output.table(&table.detailed));

    if is_argument {
        let validity = check_argument(&table.detailed);

        if validity.valid {
            println!("- **Conclusion:** ✅ The argument is valid.\n");
        } else {
            let rows = validity
                .counterexamples
                .iter()
                .map(|row| (row + 1).to_string())
                .join(", ");
            println!(
                "- **Conclusion:** ❌ The argument is invalid; counterexample rows: {}\n",
                output.paint(rows.as_str().red())
            );
        }
    } else {
        let comparison = compare(&table.detailed);

        let relation = match comparison.relation {
            Relation::Equivalent => "equivalent",
            Relation::Contradictory => "contradictory",
            Relation::Neither => "neither equivalent nor contradictory",
        };
        let consistency = if comparison.consistent {
            "consistent"
        } else {
            "inconsistent"
        };

        println!(
            "- **Conclusion:** The statements are {} and {}.\n",
            output.paint(relation.blue().bold()),
            output.paint(consistency.blue().bold())
        );
    }

    Ok(())
}

fn derive_forms(statements: &[String], explain: bool, output: &Output) -> anyhow::Result<()> {
    let mut explanation = Explanation::new("Argument forms");

    let statements = statements
        .iter()
        .map(|statement| parse_with_caret(statement).map(|parsed| parsed.statement))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let matches = Catalogue::global().match_argument_forms(&statements, &mut explanation);

    if explain {
        println!("{explanation}");
    }

    if matches.is_empty() {
        println!("No argument form applies.");
    }

    for found in &matches {
        println!(
            "- **{}** ({}): {}",
            found.form.name,
            found.form.abbreviation,
            found
                .derived
                .iter()
                .map(|result| output.paint(result.text.as_str().green()))
                .join(", ")
        );
    }

    Ok(())
}

fn replace_fragment(statement: &str, path: &[usize], explain: bool, output: &Output) -> anyhow::Result<()> {
    let mut explanation = Explanation::new("Replacement rules");

    let matches = derive::get_replacement_rules(statement, path, &mut explanation)
        .map_err(|error| with_caret(error, statement))?;

    if explain {
        println!("{explanation}");
    }

    if matches.is_empty() {
        println!("No replacement rule applies.");
    }

    for found in &matches {
        let results = found
            .derived
            .iter()
            .zip(&found.spliced)
            .map(|(result, whole)| {
                if path.is_empty() {
                    output.paint(result.text.as_str().green())
                } else {
                    format!("{} ⟹ {}", result.text, output.paint(whole.as_str().green()))
                }
            })
            .join(", ");

        println!("- **{}** ({}): {results}", found.rule.name, found.rule.abbreviation);
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("symlogic=debug,calculator=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Catalogue::global();

    let config = EngineConfig::with_max_variables(cli.max_variables);
    let output = Output {
        markdown: cli.markdown,
    };

    match cli.command {
        Command::Table { statement, simple } => show_table(&statement, simple, &config, &output),
        Command::Compare { statements } => show_joined(&statements, false, &config, &output),
        Command::Argument { statements } => show_joined(&statements, true, &config, &output),
        Command::Derive {
            statements,
            explain,
        } => derive_forms(&statements, explain, &output),
        Command::Replace {
            statement,
            path,
            explain,
        } => replace_fragment(&statement, &path, explain, &output),
        Command::Prove { statements } => {
            let Some((conclusion, premises)) = statements.split_last() else {
                bail!("A proof needs at least one premise and a conclusion");
            };

            prove::run(premises, conclusion, &output).context("Proof session failed")
        }
    }
}
