use clap::{Args, ValueEnum};
use itertools::Itertools;
use miette::{miette, Result};
use nx_sarc::{sniff, SarcArchive};
use owo_colors::OwoColorize;
use similar::{ChangeTag, TextDiff};
use std::{borrow::Cow, collections::BTreeSet, fmt::Display, path::PathBuf};

use crate::commands::read_input;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Mode {
    #[default]
    Semantic,
    Full,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Change {
    Added(String, String),
    Removed(String, String),
    Comparison(String, String, String),
    Context(Vec<String>),
    Modified(String, String, Vec<Change>, Vec<Change>),
}

impl Change {
    fn modified(key: &str, name: &str) -> Self {
        Change::Modified(key.into(), name.into(), Vec::new(), Vec::new())
    }

    fn comparison(key: &str, old: impl Display, new: impl Display) -> Self {
        Change::Comparison(key.into(), old.to_string(), new.to_string())
    }

    pub fn with_children(&mut self, children: Vec<Change>) -> Result<()> {
        match self {
            Change::Modified(_, _, vec, _) => {
                vec.extend(children);
                vec.sort();
                Ok(())
            }
            _ => Err(miette!("tried to add children to an addition or removal")),
        }
    }

    pub fn with_related(&mut self, related: Vec<Change>) -> Result<()> {
        match self {
            Change::Modified(_, _, _, vec) => {
                vec.extend(related);
                vec.sort();
                Ok(())
            }
            _ => Err(miette!("tried to add related to an addition or removal")),
        }
    }
}

fn indent(text: &str) -> String {
    text.split('\n').map(|l| "  ".to_string() + l).join("\n")
}

impl Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Added(_, v) => {
                writeln!(f, "✅ {}", v.green())
            }
            Change::Removed(_, v) => {
                writeln!(f, "❌ {}", v.red())
            }
            Change::Comparison(key, old, new) => {
                writeln!(f, "* {}: {} vs {}", key, old.red(), new.green())
            }
            Change::Context(values) => {
                writeln!(f, "{}", values.iter().map(|l| format!(" {}", l)).join("\n"))
            }
            Change::Modified(_, v, children, related) => {
                let mut txt_final = related.iter().map(|c| c.to_string()).join("");

                let mut section = String::new();
                let mut current_key = String::new();
                for c in children {
                    let key = match c {
                        Change::Added(key, _) => format!("* {} added:\n", key),
                        Change::Removed(key, _) => format!("* {} removed:\n", key),
                        Change::Modified(key, _, _, _) => format!("* {} modified:\n", key),
                        _ => current_key.clone(),
                    };

                    if current_key != key {
                        if !section.is_empty() {
                            txt_final.push_str(&indent(&section));
                            txt_final.push('\n');
                        }
                        section.clear();

                        txt_final.push_str(&key);
                        current_key = key
                    }

                    section.push_str(&format!("{}\n", c));
                }
                txt_final.push_str(&indent(&section));

                writeln!(f, "🔃 {}", v.blue())?;
                writeln!(
                    f,
                    "{}",
                    txt_final
                        .split('\n')
                        .filter(|l| l.trim().len() > 1)
                        .map(|l| "  ".to_string() + l)
                        .join("\n")
                )
            }
        }
    }
}

#[derive(Args)]
pub struct DiffArgs {
    /// An input SARC file, optionally MCPK compressed
    #[arg(short, long, value_name = "FILE")]
    left: PathBuf,

    /// An input SARC file, optionally MCPK compressed
    #[arg(short, long, value_name = "FILE")]
    right: PathBuf,

    /// Comparison mode
    #[arg(short, long, value_enum, default_value_t = Mode::Semantic)]
    mode: Mode,
}

/// Unwrap MCPK containers, leave anything else untouched
fn payload(data: &[u8]) -> Result<Cow<'_, [u8]>> {
    Ok(if nx_mcpk::is_compressed(data) {
        Cow::Owned(nx_mcpk::decompress(data)?)
    } else {
        Cow::Borrowed(data)
    })
}

fn inline_diff(old: &str, new: &str) -> Vec<String> {
    let diff = TextDiff::from_lines(old, new);

    let mut comparison = Vec::new();
    for op in diff.ops() {
        for change in diff.iter_inline_changes(op) {
            let mut context = String::new();
            for (emphasized, value) in change.iter_strings_lossy() {
                let styled = match (emphasized, change.tag()) {
                    (true, ChangeTag::Insert) => value.green().underline().to_string(),
                    (true, _) => value.red().underline().to_string(),
                    (false, _) => value.dimmed().to_string(),
                };
                context.push_str(&styled);
            }
            comparison.push(context.trim_end_matches('\n').to_string());
        }
    }
    comparison
}

impl DiffArgs {
    fn handle_file(&self, name: &str, left: &[u8], right: &[u8]) -> Result<Option<Change>> {
        if left == right {
            return Ok(None);
        }

        let mut result = Change::modified("files", name);

        if left.len() != right.len() {
            result.with_related(vec![Change::comparison("size", left.len(), right.len())])?;
        }

        let (left, right) = (payload(left)?, payload(right)?);
        let (left_type, right_type) = (sniff(&left), sniff(&right));

        if left_type.extension != right_type.extension {
            result.with_related(vec![Change::comparison(
                "type",
                left_type.extension,
                right_type.extension,
            )])?;
        } else if left_type.extension == ".sarc" {
            if let Some(Change::Modified(_, _, children, related)) =
                self.handle_sarc(name, &left, &right)?
            {
                result.with_related(related)?;
                result.with_children(children)?;
            }
        } else if self.mode == Mode::Full {
            if let (Ok(old), Ok(new)) = (std::str::from_utf8(&left), std::str::from_utf8(&right))
            {
                result.with_related(vec![Change::Context(inline_diff(old, new))])?;
            }
        }

        Ok(Some(result))
    }

    fn handle_sarc(&self, name: &str, left: &[u8], right: &[u8]) -> Result<Option<Change>> {
        let left_sarc = SarcArchive::new(left)?;
        let right_sarc = SarcArchive::new(right)?;

        let mut related = Vec::new();
        if left_sarc.len() != right_sarc.len() {
            related.push(Change::comparison(
                "entries",
                left_sarc.len(),
                right_sarc.len(),
            ));
        }

        if self.mode == Mode::Full {
            if left_sarc.endian() != right_sarc.endian() {
                related.push(Change::comparison(
                    "byte order",
                    format!("{:?}", left_sarc.endian()),
                    format!("{:?}", right_sarc.endian()),
                ));
            }

            if left_sarc.hash_key() != right_sarc.hash_key() {
                related.push(Change::comparison(
                    "hash key",
                    format!("{:#x}", left_sarc.hash_key()),
                    format!("{:#x}", right_sarc.hash_key()),
                ));
            }

            if left.len() != right.len() {
                related.push(Change::comparison("size", left.len(), right.len()));
            }
        }

        let left_names = left_sarc.file_names().collect::<BTreeSet<_>>();
        let right_names = right_sarc.file_names().collect::<BTreeSet<_>>();

        let mut children = Vec::new();
        children.extend(
            right_names
                .difference(&left_names)
                .map(|k| Change::Added("files".into(), k.to_string())),
        );
        children.extend(
            left_names
                .difference(&right_names)
                .map(|k| Change::Removed("files".into(), k.to_string())),
        );

        for file in left_names.intersection(&right_names) {
            let data_left = left_sarc.by_name(file)?.data();
            let data_right = right_sarc.by_name(file)?.data();

            if let Some(c) = self.handle_file(file, data_left, data_right)? {
                children.push(c);
            }
        }

        if related.is_empty() && children.is_empty() {
            return Ok(None);
        }

        let mut result = Change::modified("sarc", name);
        result.with_related(related)?;
        result.with_children(children)?;

        Ok(Some(result))
    }

    pub fn handle(&self) -> Result<()> {
        let left = read_input(&self.left)?;
        let right = read_input(&self.right)?;

        let difference = self.handle_sarc(
            &self.left.to_string_lossy(),
            &payload(&left)?,
            &payload(&right)?,
        )?;

        if let Some(d) = difference {
            println!("{}", d);
        }

        Ok(())
    }
}
