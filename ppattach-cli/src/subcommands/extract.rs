use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use ppattach::attachment::Attachment;
use ppattach::extract::Diagnostic;
use ppattach::sentence::Sentence;
use rayon::prelude::*;

use crate::io::{extractor, load_config, load_lexicon, read_treebank};
use crate::progress::ExtractSpeed;
use crate::stats::{AttachmentStats, TreebankStats};
use crate::traits::PpAttachApp;
use crate::writer::AttachmentWriter;

const CONFIG: &str = "CONFIG";
const INPUT: &str = "INPUT";
const OUTPUT_PREFIX: &str = "OUTPUT_PREFIX";
const THREADS: &str = "THREADS";

pub struct ExtractApp {
    config: String,
    input: String,
    output_prefix: String,
    threads: Option<usize>,
}

/// Log the diagnostics of a sentence and return its samples.
fn report(sentence: &Sentence, extracted: Vec<Result<Attachment, Diagnostic>>) -> Vec<Attachment> {
    extracted
        .into_iter()
        .filter_map(|attachment| match attachment {
            Ok(attachment) => Some(attachment),
            Err(diagnostic) => {
                log::warn!(
                    "{} in sentence starting at line {}:\n{}",
                    diagnostic,
                    sentence
                        .start_line()
                        .map(|line| (line + 1).to_string())
                        .unwrap_or_else(|| "?".to_string()),
                    sentence
                );
                None
            }
        })
        .collect()
}

impl PpAttachApp for ExtractApp {
    fn app() -> Command {
        Command::new("extract")
            .arg_required_else_help(true)
            .about("Extract attachment samples from a treebank")
            .arg(
                Arg::new(CONFIG)
                    .help("Extraction configuration file")
                    .index(1)
                    .required(true),
            )
            .arg(
                Arg::new(INPUT)
                    .help("Input treebank")
                    .index(2)
                    .required(true),
            )
            .arg(
                Arg::new(OUTPUT_PREFIX)
                    .help("Prefix of the output files")
                    .index(3)
                    .required(true),
            )
            .arg(
                Arg::new(THREADS)
                    .help("Extraction threads")
                    .long("threads")
                    .value_name("N")
                    .num_args(1),
            )
    }

    fn parse(matches: &ArgMatches) -> Result<Self> {
        let config = matches.get_one::<String>(CONFIG).unwrap().into();
        let input = matches.get_one::<String>(INPUT).unwrap().into();
        let output_prefix = matches.get_one::<String>(OUTPUT_PREFIX).unwrap().into();
        let threads = matches
            .get_one::<String>(THREADS)
            .map(|v| v.parse().context("Cannot parse number of threads"))
            .transpose()?;

        Ok(ExtractApp {
            config,
            input,
            output_prefix,
            threads,
        })
    }

    fn run(&self) -> Result<()> {
        if let Some(threads) = self.threads {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .context("Cannot set up extraction threads")?;
        }

        let config = load_config(&self.config)?;
        let lexicon = load_lexicon(&config)?;
        let extractor = extractor(&config, lexicon.as_ref())?;

        let sentences: Vec<Sentence> = read_treebank(&config.corpus, &self.input)?
            .into_iter()
            .flatten()
            .collect();

        let mut speed = ExtractSpeed::new();
        let extracted: Vec<Vec<_>> = sentences
            .par_iter()
            .map(|sentence| extractor.attachments(sentence).collect())
            .collect();

        let mut attachments = Vec::new();
        for (sentence, extracted) in sentences.iter().zip(extracted) {
            let sentence_attachments = report(sentence, extracted);
            speed.count_sentence(sentence_attachments.len());
            attachments.extend(sentence_attachments);
        }

        let mut writer = AttachmentWriter::create(&self.output_prefix, &config.extract).context(
            format!("Cannot create output files with prefix: {}", self.output_prefix),
        )?;
        for attachment in &attachments {
            writer
                .write(attachment)
                .context("Cannot write attachment sample")?;
        }
        writer.flush().context("Cannot flush output files")?;

        let treebank_stats = TreebankStats::new(&extractor, &sentences);
        let verb_preps_path = format!("{}.verbpreps", self.output_prefix);
        let verb_preps = File::create(&verb_preps_path)
            .context(format!("Cannot create: {}", verb_preps_path))?;
        treebank_stats
            .write_verb_preps(BufWriter::new(verb_preps))
            .context(format!("Cannot write verb-preposition counts to: {}", verb_preps_path))?;

        println!("{}", treebank_stats);
        println!("{}", AttachmentStats::new(&attachments));

        Ok(())
    }
}
