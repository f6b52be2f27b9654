//! Line-oriented text records for the category graph
//!
//! Each line reads `<nameA> <kindA> <relation> <nameB> <kindB>` with fields
//! separated by whitespace, kinds in `{cat, page}` and relations in
//! `{CsubC, CsupC, CP, PC}`.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, RecordError, Result};
use crate::graph::entity::{ArchKind, NodeKind};
use crate::graph::store::{EdgeInsert, EntryGraph};

/// One named arch, as read from or written to a text line
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Record {
    pub origin: String,
    pub relation: ArchKind,
    pub destiny: String,
}

impl Record {
    pub fn new(origin: impl Into<String>, relation: ArchKind, destiny: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            relation,
            destiny: destiny.into(),
        }
    }
}

impl FromStr for Record {
    type Err = RecordError;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [origin, origin_kind, relation, destiny, destiny_kind] = fields[..] else {
            return Err(RecordError::FieldCount(fields.len()));
        };

        let origin_kind: NodeKind = origin_kind.parse()?;
        let relation: ArchKind = relation.parse()?;
        let destiny_kind: NodeKind = destiny_kind.parse()?;

        if origin_kind != relation.origin_kind() || destiny_kind != relation.destiny_kind() {
            return Err(RecordError::KindMismatch {
                relation: relation.token(),
                origin: origin_kind.token(),
                destiny: destiny_kind.token(),
            });
        }

        Ok(Record::new(origin, relation, destiny))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.origin,
            self.relation.origin_kind(),
            self.relation,
            self.destiny,
            self.relation.destiny_kind()
        )
    }
}

/// Parse a batch of lines. Blank lines are skipped; the first malformed line
/// aborts the batch with its 1-based line number.
pub fn parse_lines<I, S>(lines: I) -> Result<Vec<Record>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut records = Vec::new();
    for (idx, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        let record = line.parse().map_err(|kind| Error::Parse {
            line_number: idx + 1,
            line: line.to_string(),
            kind,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Load text lines into a store.
///
/// The whole batch is validated before anything is written, so a malformed
/// line leaves the store untouched. Returns the number of new arches.
pub fn load_lines<I, S>(graph: &mut EntryGraph, lines: I) -> Result<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let records = parse_lines(lines)?;
    let inserted = records
        .iter()
        .filter(|record| graph.set_data(record) == EdgeInsert::Inserted)
        .count();

    log::info!(
        "Loaded {} records ({} new arches); store has {} categories, {} pages, {} arches",
        records.len(),
        inserted,
        graph.category_count(),
        graph.page_count(),
        graph.edge_count()
    );
    Ok(inserted)
}

/// One line per arch, grouped CsubC, CsupC, CP, PC
pub fn dump_lines(graph: &EntryGraph) -> Vec<String> {
    graph.records().iter().map(Record::to_string).collect()
}

/// Read a record file into a store
pub fn load_file(graph: &mut EntryGraph, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    log::info!("Reading record file: {}", path.display());

    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    load_lines(graph, content.lines())
}

/// Write every arch of a store to a record file
pub fn save_file(graph: &EntryGraph, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut content = dump_lines(graph).join("\n");
    content.push('\n');
    fs::write(path, content).map_err(|e| Error::io(path, e))?;

    log::info!("Saved {} arches to {}", graph.edge_count(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record() {
        let record: Record = "Biology   cat\tCsubC Genetics cat".parse().unwrap();
        assert_eq!(record, Record::new("Biology", ArchKind::CsubC, "Genetics"));
        assert_eq!(record.to_string(), "Biology cat CsubC Genetics cat");

        let record: Record = "Gene page PC Genetics cat".parse().unwrap();
        assert_eq!(record.relation, ArchKind::PC);
    }

    #[test]
    fn test_malformed_records() {
        assert_eq!(
            "Biology cat CsubC Genetics".parse::<Record>(),
            Err(RecordError::FieldCount(4))
        );
        assert_eq!(
            "Biology cat CsubC Genetics cat extra".parse::<Record>(),
            Err(RecordError::FieldCount(6))
        );
        assert_eq!(
            "Biology category CsubC Genetics cat".parse::<Record>(),
            Err(RecordError::UnknownNodeKind("category".to_string()))
        );
        assert_eq!(
            "Biology cat SubOf Genetics cat".parse::<Record>(),
            Err(RecordError::UnknownRelation("SubOf".to_string()))
        );
        assert!(matches!(
            "Gene page CP Genetics cat".parse::<Record>(),
            Err(RecordError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_bad_line_leaves_store_untouched() {
        let mut graph = EntryGraph::with_capacity(4);
        let err = load_lines(
            &mut graph,
            ["Biology cat CsubC Genetics cat", "", "Biology cat CsubC"],
        )
        .unwrap_err();

        match err {
            Error::Parse {
                line_number, line, ..
            } => {
                assert_eq!(line_number, 3);
                assert_eq!(line, "Biology cat CsubC");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_load_creates_entities_once() {
        let mut graph = EntryGraph::with_capacity(4);
        let inserted = load_lines(
            &mut graph,
            [
                "Biology cat CsubC Genetics cat",
                "Biology cat CsubC Ecology cat",
                "Biology cat CsubC Ecology cat",
                "Biology cat CP Cell page",
            ],
        )
        .unwrap();

        assert_eq!(inserted, 3);
        assert_eq!(graph.category_count(), 3);
        assert_eq!(graph.page_count(), 1);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_dump_groups_by_relation() {
        let mut graph = EntryGraph::with_capacity(4);
        load_lines(
            &mut graph,
            [
                "Cell page PC Biology cat",
                "Biology cat CP Cell page",
                "Biology cat CsupC Genetics cat",
                "Genetics cat CsubC Biology cat",
            ],
        )
        .unwrap();

        assert_eq!(
            dump_lines(&graph),
            vec![
                "Genetics cat CsubC Biology cat",
                "Biology cat CsupC Genetics cat",
                "Biology cat CP Cell page",
                "Cell page PC Biology cat",
            ]
        );
    }
}
