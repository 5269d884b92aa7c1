use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::collection::MediaCollection;
use crate::decode::Resource;

/// Images picked by the user, by collection index.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    selected: BTreeSet<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip `index` in or out of the selection. Returns whether it is now
    /// selected.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.selected.remove(&index) {
            false
        } else {
            self.selected.insert(index);
            true
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// What a mark command acts on: the selection in collection order, or
    /// `current` alone when nothing is selected.
    pub fn marked(&self, current: usize) -> Vec<usize> {
        if self.selected.is_empty() {
            vec![current]
        } else {
            self.selected.iter().copied().collect()
        }
    }
}

/// Write one path per line for each index. Out-of-range indices are skipped.
/// Returns the number of lines written.
pub fn write_paths<R: Resource, W: Write>(
    collection: &MediaCollection<R>,
    indices: &[usize],
    out: &mut W,
) -> io::Result<usize> {
    let mut written = 0;
    for &index in indices {
        if let Ok(item) = collection.get(index) {
            writeln!(out, "{}", item.path().display())?;
            written += 1;
        }
    }
    out.flush()?;
    Ok(written)
}

/// Append the paths to `output`, or print them to stdout when no file is
/// given.
pub fn emit_paths<R: Resource>(
    collection: &MediaCollection<R>,
    indices: &[usize],
    output: Option<&Path>,
) -> io::Result<usize> {
    match output {
        Some(out_path) => {
            let mut file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(out_path)?;
            write_paths(collection, indices, &mut file)
        }
        None => write_paths(collection, indices, &mut io::stdout().lock()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{collection_of, path_for};

    #[test]
    fn toggle_flips_membership() {
        let mut sel = Selection::new();
        assert!(sel.toggle(3));
        assert!(sel.toggle(1));
        assert!(sel.contains(3));
        assert_eq!(sel.len(), 2);

        assert!(!sel.toggle(3));
        assert!(!sel.contains(3));
        assert_eq!(sel.marked(9), vec![1]);
    }

    #[test]
    fn empty_selection_marks_current() {
        let sel = Selection::new();
        assert!(sel.is_empty());
        assert_eq!(sel.marked(4), vec![4]);
    }

    #[test]
    fn marked_is_in_collection_order() {
        let mut sel = Selection::new();
        for index in [7, 2, 5] {
            sel.toggle(index);
        }
        assert_eq!(sel.marked(0), vec![2, 5, 7]);
    }

    #[test]
    fn paths_written_one_per_line() {
        let col = collection_of(4);
        let mut out = Vec::new();
        let written = write_paths(&col, &[1, 3, 8], &mut out).unwrap();
        assert_eq!(written, 2);
        let expected = format!("{}\n{}\n", path_for(1).display(), path_for(3).display());
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn emit_appends_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let out_path = dir.path().join("marked.txt");
        let col = collection_of(3);

        emit_paths(&col, &[0], Some(&out_path)).unwrap();
        emit_paths(&col, &[2], Some(&out_path)).unwrap();

        let contents = fs::read_to_string(&out_path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(Path::new(lines[1]), path_for(2));
    }
}
