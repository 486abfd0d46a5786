use anyhow::{bail, Result};
use clap::{Arg, ArgMatches, Command};
use ppattach::eval::{evaluate, Evaluation};

use crate::io::{extractor, load_config, load_lexicon, read_treebank};
use crate::traits::PpAttachApp;

const CONFIG: &str = "CONFIG";
const GOLD: &str = "GOLD";
const PRED: &str = "PRED";

pub struct EvalApp {
    config: String,
    gold: String,
    pred: String,
}

impl PpAttachApp for EvalApp {
    fn app() -> Command {
        Command::new("eval")
            .arg_required_else_help(true)
            .about("Evaluate preposition attachments of a parsed treebank")
            .arg(
                Arg::new(CONFIG)
                    .help("Extraction configuration file")
                    .index(1)
                    .required(true),
            )
            .arg(
                Arg::new(GOLD)
                    .help("Gold standard treebank")
                    .index(2)
                    .required(true),
            )
            .arg(
                Arg::new(PRED)
                    .help("Predicted treebank")
                    .index(3)
                    .required(true),
            )
    }

    fn parse(matches: &ArgMatches) -> Result<Self> {
        let config = matches.get_one::<String>(CONFIG).unwrap().into();
        let gold = matches.get_one::<String>(GOLD).unwrap().into();
        let pred = matches.get_one::<String>(PRED).unwrap().into();

        Ok(EvalApp { config, gold, pred })
    }

    fn run(&self) -> Result<()> {
        let config = load_config(&self.config)?;
        let lexicon = load_lexicon(&config)?;
        let extractor = extractor(&config, lexicon.as_ref())?;

        let gold = read_treebank(&config.corpus, &self.gold)?;
        let pred = read_treebank(&config.corpus, &self.pred)?;
        if gold.len() != pred.len() {
            bail!(
                "Gold treebank has {} sentences, predicted treebank has {}",
                gold.len(),
                pred.len()
            );
        }

        let mut evaluation = Evaluation::default();
        for (idx, (gold, pred)) in gold.iter().zip(&pred).enumerate() {
            let (gold, pred) = match (gold, pred) {
                (Some(gold), Some(pred)) => (gold, pred),
                _ => continue,
            };

            match evaluate(&extractor, gold, pred) {
                Ok(sentence_evaluation) => evaluation += sentence_evaluation,
                Err(err) => log::error!("Skipping sentence {}: {}", idx, err),
            }
        }

        println!(
            "Total: {}, correct: {} ({:.2}%)",
            evaluation.total,
            evaluation.correct,
            evaluation.accuracy() * 100.
        );

        Ok(())
    }
}
