use std::fs::File;
use std::io::{self, BufWriter, Write};

use itertools::Itertools;
use ppattach::attachment::Attachment;
use ppattach::extract::ExtractConfig;

/// Writer for samples in flat files, one sample per line.
///
/// Every field of a sample is written to its own file, the file names
/// consist of a common prefix and a suffix per field.
///
/// `.ppparents` holds the head of every phrase word as a 1-based
/// position within the phrase (`0` for the preposition). For full
/// sub-trees with gaps these positions differ from sentence offsets.
pub struct AttachmentWriter<W> {
    heads: W,
    n_heads: W,
    labels: W,
    preps: W,
    children: W,
    pp_words: W,
    pp_parents: W,
    positions: W,
    heads_next: Option<W>,
    heads_pos: Option<W>,
    heads_next_pos: Option<W>,
}

impl AttachmentWriter<BufWriter<File>> {
    /// Create the files of the fields that are extracted with `config`.
    pub fn create(prefix: &str, config: &ExtractConfig) -> io::Result<Self> {
        Self::with_writers(
            |suffix| Ok(BufWriter::new(File::create(format!("{}{}", prefix, suffix))?)),
            config,
        )
    }
}

impl<W> AttachmentWriter<W>
where
    W: Write,
{
    pub fn with_writers<F>(mut open: F, config: &ExtractConfig) -> io::Result<Self>
    where
        F: FnMut(&str) -> io::Result<W>,
    {
        Ok(AttachmentWriter {
            heads: open(".heads.words")?,
            n_heads: open(".nheads")?,
            labels: open(".labels")?,
            preps: open(".preps.words")?,
            children: open(".children.words")?,
            pp_words: open(".ppwords")?,
            pp_parents: open(".ppparents")?,
            positions: open(".ind")?,
            heads_next: config
                .heads_next
                .then(|| open(".heads.next.words"))
                .transpose()?,
            heads_pos: config.heads_pos.then(|| open(".heads.pos")).transpose()?,
            heads_next_pos: config
                .heads_next_pos
                .then(|| open(".heads.next.pos"))
                .transpose()?,
        })
    }

    pub fn write(&mut self, attachment: &Attachment) -> io::Result<()> {
        writeln!(self.heads, "{}", attachment.heads().iter().join(" "))?;
        writeln!(self.n_heads, "{}", attachment.heads().len())?;
        match attachment.gold() {
            Some(gold) => writeln!(self.labels, "{}", gold)?,
            None => writeln!(self.labels, "-1")?,
        }
        writeln!(self.preps, "{}", attachment.prep())?;
        writeln!(self.children, "{}", attachment.child())?;
        writeln!(self.pp_words, "{}", attachment.pp_words().iter().join(" "))?;
        writeln!(
            self.pp_parents,
            "{}",
            attachment.pp_parents().iter().join(" ")
        )?;

        let position = attachment.position();
        writeln!(
            self.positions,
            "{}\t{}\t{}",
            position
                .start_line()
                .map(|line| line.to_string())
                .unwrap_or_else(|| "_".to_string()),
            position.prep() + 1,
            position.heads().iter().map(|head| head + 1).join(" ")
        )?;

        write_optional(&mut self.heads_next, attachment.heads_next())?;
        write_optional(&mut self.heads_pos, attachment.heads_pos())?;
        write_optional(&mut self.heads_next_pos, attachment.heads_next_pos())?;

        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        for writer in [
            &mut self.heads,
            &mut self.n_heads,
            &mut self.labels,
            &mut self.preps,
            &mut self.children,
            &mut self.pp_words,
            &mut self.pp_parents,
            &mut self.positions,
        ] {
            writer.flush()?;
        }

        for writer in [
            &mut self.heads_next,
            &mut self.heads_pos,
            &mut self.heads_next_pos,
        ] {
            if let Some(writer) = writer {
                writer.flush()?;
            }
        }

        Ok(())
    }
}

fn write_optional<W>(writer: &mut Option<W>, values: Option<&[String]>) -> io::Result<()>
where
    W: Write,
{
    if let (Some(writer), Some(values)) = (writer, values) {
        writeln!(writer, "{}", values.iter().join("\t"))?;
    }

    Ok(())
}
