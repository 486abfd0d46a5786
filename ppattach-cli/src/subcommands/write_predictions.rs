use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgMatches, Command};
use ppattach::attachment::Attachment;
use ppattach::config::Format;
use ppattach::extract::Extractor;
use ppattach::sentence::Sentence;

use crate::io::{extractor, load_config, load_lexicon, read_treebank};
use crate::traits::PpAttachApp;

const CONFIG: &str = "CONFIG";
const INPUT: &str = "INPUT";
const PREDICTIONS: &str = "PREDICTIONS";
const INCLUDED: &str = "INCLUDED";

pub struct WritePredictionsApp {
    config: String,
    input: String,
    predictions: String,
    included: String,
}

/// Read a file with one 1-based number per line.
fn read_numbers(path: &str) -> Result<Vec<usize>> {
    let f = File::open(path).context(format!("Cannot open file: {}", path))?;
    let mut numbers = Vec::new();
    for (idx, line) in BufReader::new(f).lines().enumerate() {
        let line = line.context(format!("Cannot read line from: {}", path))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        numbers.push(
            line.parse()
                .context(format!("Cannot parse number on line {} of {}", idx + 1, path))?,
        );
    }

    Ok(numbers)
}

/// Extract the samples of a treebank, numbered as by `extract`.
fn extract_attachments(extractor: &Extractor<'_>, sentences: &[Option<Sentence>]) -> Vec<Attachment> {
    sentences
        .iter()
        .flatten()
        .flat_map(|sentence| extractor.attachments(sentence))
        .filter_map(Result::ok)
        .collect()
}

/// Map the 0-based corpus lines of prepositions to predicted heads.
///
/// `included[i]` is the 1-based index of the sample that the `i`-th
/// prediction was made for, `predictions[i]` the predicted 1-based
/// candidate rank.
fn predicted_heads(
    attachments: &[Attachment],
    predictions: &[usize],
    included: &[usize],
) -> Result<HashMap<usize, usize>> {
    if predictions.len() != included.len() {
        bail!(
            "Got {} predictions for {} included samples",
            predictions.len(),
            included.len()
        );
    }

    if attachments.len() < predictions.len() {
        bail!(
            "Got {} predictions, but only {} samples were extracted",
            predictions.len(),
            attachments.len()
        );
    }

    let mut heads = HashMap::new();
    for (&sample, &rank) in included.iter().zip(predictions) {
        let attachment = sample
            .checked_sub(1)
            .and_then(|idx| attachments.get(idx))
            .with_context(|| {
                format!(
                    "Sample {} is out of range, {} samples were extracted",
                    sample,
                    attachments.len()
                )
            })?;

        let line = attachment
            .predicted_line()
            .context("Sample does not have a corpus position")?;

        match attachment.predicted_head(rank) {
            Some(head) => {
                heads.insert(line, head);
            }
            None => log::warn!(
                "Predicted rank {} of sample {} exceeds its {} candidates",
                rank,
                sample,
                attachment.heads().len()
            ),
        }
    }

    Ok(heads)
}

/// Copy the corpus, adding a column with the predicted heads.
///
/// Empty lines are copied as-is.
fn write_with_predictions<R, W>(read: R, mut write: W, heads: &HashMap<usize, usize>) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    for (idx, line) in read.lines().enumerate() {
        let line = line.context("Cannot read corpus line")?;
        let line = line.trim_end();

        if line.is_empty() {
            writeln!(write)?;
            continue;
        }

        match heads.get(&idx) {
            Some(head) => writeln!(write, "{}\t{}", line, head)?,
            None => writeln!(write, "{}\t_", line)?,
        }
    }

    write.flush()?;

    Ok(())
}

impl PpAttachApp for WritePredictionsApp {
    fn app() -> Command {
        Command::new("write-predictions")
            .arg_required_else_help(true)
            .about("Add predicted preposition heads to a CoNLL treebank")
            .arg(
                Arg::new(CONFIG)
                    .help("Extraction configuration file")
                    .index(1)
                    .required(true),
            )
            .arg(
                Arg::new(INPUT)
                    .help("Treebank that the samples were extracted from")
                    .index(2)
                    .required(true),
            )
            .arg(
                Arg::new(PREDICTIONS)
                    .help("Predicted candidate ranks, one per line")
                    .index(3)
                    .required(true),
            )
            .arg(
                Arg::new(INCLUDED)
                    .help("1-based indices of the predicted samples, one per line")
                    .index(4)
                    .required(true),
            )
    }

    fn parse(matches: &ArgMatches) -> Result<Self> {
        let config = matches.get_one::<String>(CONFIG).unwrap().into();
        let input = matches.get_one::<String>(INPUT).unwrap().into();
        let predictions = matches.get_one::<String>(PREDICTIONS).unwrap().into();
        let included = matches.get_one::<String>(INCLUDED).unwrap().into();

        Ok(WritePredictionsApp {
            config,
            input,
            predictions,
            included,
        })
    }

    fn run(&self) -> Result<()> {
        let config = load_config(&self.config)?;
        if config.corpus.format != Format::Conll {
            bail!("Predictions can only be added to CoNLL treebanks");
        }

        let lexicon = load_lexicon(&config)?;
        let extractor = extractor(&config, lexicon.as_ref())?;

        let sentences = read_treebank(&config.corpus, &self.input)?;
        let attachments = extract_attachments(&extractor, &sentences);

        let predictions = read_numbers(&self.predictions)?;
        let included = read_numbers(&self.included)?;
        let heads = predicted_heads(&attachments, &predictions, &included)?;

        let output_path = format!("{}.pred", self.input);
        log::info!("Writing predictions to: {}", output_path);

        let input = File::open(&self.input).context(format!("Cannot open: {}", self.input))?;
        let output =
            File::create(&output_path).context(format!("Cannot create: {}", output_path))?;
        write_with_predictions(BufReader::new(input), BufWriter::new(output), &heads)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use maplit::{hashmap, hashset};
    use ppattach::attachment::Attachment;
    use ppattach::config::{Config, CorpusConfig, Format};
    use ppattach::dialect::Dialect;
    use ppattach::extract::{ChildSource, ExtractConfig};
    use ppattach::lexicon::Lexicon;

    use super::{extract_attachments, predicted_heads, write_with_predictions};
    use crate::io::extractor;

    static CORPUS: &str = "1\tsaw\tsee\tVBD\tVBD\t_\t0\tROOT\t_\t_
2\tthe\tthe\tDT\tDT\t_\t3\tNMOD\t_\t_
3\tman\tman\tNN\tNN\t_\t1\tOBJ\t_\t_
4\twith\twith\tIN\tIN\t_\t3\tNMOD\t_\t_
5\ta\ta\tDT\tDT\t_\t6\tNMOD\t_\t_
6\ttelescope\ttelescope\tNN\tNN\t_\t4\tPMOD\t_\t_

1\tshe\tshe\tPRP\tPRP\t_\t2\tSBJ\t_\t_
2\tate\teat\tVBD\tVBD\t_\t0\tROOT\t_\t_
3\tpasta\tpasta\tNN\tNN\t_\t2\tOBJ\t_\t_
4\twith\twith\tIN\tIN\t_\t2\tADV\t_\t_
5\tforks\tfork\tNNS\tNNS\t_\t4\tPMOD\t_\t_

";

    fn config() -> Config {
        Config {
            corpus: CorpusConfig {
                format: Format::Conll,
                dialect: Dialect::English,
                pos_column: None,
                lemmas: false,
                lowercase: false,
            },
            extract: ExtractConfig {
                child: ChildSource::Dependents,
                ..ExtractConfig::default()
            },
            lexicon: None,
        }
    }

    fn attachments_with_lexicon<L>(lexicon: Option<&L>) -> Vec<Attachment>
    where
        L: Lexicon + Sync,
    {
        let config = config();
        let extractor = extractor(&config, lexicon).unwrap();
        let sentences = config
            .corpus
            .sentences(CORPUS.as_bytes())
            .map(|sentence| sentence.map(Some))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        extract_attachments(&extractor, &sentences)
    }

    fn attachments() -> Vec<Attachment> {
        attachments_with_lexicon::<HashSet<String>>(None)
    }

    #[test]
    fn map_predictions_to_lines() {
        let attachments = attachments();
        assert_eq!(attachments.len(), 2);

        // Only the second sample was predicted, attaching to "pasta".
        let heads = predicted_heads(&attachments, &[2], &[2]).unwrap();
        assert_eq!(heads, hashmap! {10 => 3});

        let heads = predicted_heads(&attachments, &[1, 1], &[1, 2]).unwrap();
        assert_eq!(heads, hashmap! {3 => 1, 10 => 2});
    }

    #[test]
    fn reject_inconsistent_predictions() {
        let attachments = attachments();
        assert!(predicted_heads(&attachments, &[1, 2], &[1]).is_err());
        assert!(predicted_heads(&attachments, &[1], &[3]).is_err());
        assert!(predicted_heads(&attachments, &[1, 1, 1], &[1, 2, 2]).is_err());

        // Ranks beyond the candidates are skipped.
        assert!(predicted_heads(&attachments, &[3], &[1]).unwrap().is_empty());
    }

    #[test]
    fn add_prediction_column() {
        let heads = predicted_heads(&attachments(), &[2], &[2]).unwrap();

        let mut output = Vec::new();
        write_with_predictions(CORPUS.as_bytes(), &mut output, &heads).unwrap();
        let output = String::from_utf8(output).unwrap();
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(lines.len(), 13);
        assert!(lines[3].ends_with("\tNMOD\t_\t_\t_"));
        assert_eq!(lines[6], "");
        assert_eq!(lines[10], "4\twith\twith\tIN\tIN\t_\t2\tADV\t_\t_\t3");
        assert_eq!(lines[12], "");
    }

    #[test]
    fn lexicon_filtered_numbering() {
        let lexicon: HashSet<String> = hashset! {
            "she".to_string(),
            "ate".to_string(),
            "pasta".to_string(),
            "with".to_string(),
            "forks".to_string(),
        };

        // The first sentence is not covered, sample 1 is "with forks".
        let attachments = attachments_with_lexicon(Some(&lexicon));
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].predicted_line(), Some(10));

        let heads = predicted_heads(&attachments, &[1], &[1]).unwrap();
        assert_eq!(heads, hashmap! {10 => 2});
    }
}
