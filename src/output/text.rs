//! Human-readable listing of duplicate groups.
//!
//! ```text
//! Group 1: 2 files, 10 B each (sha256:ab12...)
//!   /data/a.txt
//!   /data/b.txt
//!
//! 3 files scanned, 1 duplicate group, 1 duplicate file, 10 B reclaimable
//! ```

use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::{Condition, Paint};

use crate::counters::CounterSnapshot;
use crate::duplicates::{DuplicateGroup, ScanSummary};

/// Plain text formatter.
pub struct TextOutput<'a> {
    groups: &'a [DuplicateGroup],
    summary: &'a ScanSummary,
    counters: CounterSnapshot,
    color: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a formatter. Colors are used only when `color` is set.
    #[must_use]
    pub fn new(
        groups: &'a [DuplicateGroup],
        summary: &'a ScanSummary,
        counters: CounterSnapshot,
        color: bool,
    ) -> Self {
        Self {
            groups,
            summary,
            counters,
            color,
        }
    }

    fn condition(&self) -> Condition {
        if self.color {
            Condition::ALWAYS
        } else {
            Condition::NEVER
        }
    }

    /// Write the listing followed by the summary line.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let when = self.condition();

        if self.groups.is_empty() {
            writeln!(writer, "{}", "No duplicates found.".green().whenever(when))?;
        }

        for (idx, group) in self.groups.iter().enumerate() {
            let header = format!("Group {}:", idx + 1);
            writeln!(
                writer,
                "{} {} files, {} each ({})",
                header.bold().whenever(when),
                group.len(),
                ByteSize::b(group.size()),
                group.key.to_string().dim().whenever(when)
            )?;
            for file in &group.files {
                writeln!(writer, "  {}", file.path.display())?;
            }
            writeln!(writer)?;
        }

        let summary = self.summary;
        writeln!(
            writer,
            "{} files scanned, {} duplicate {}, {} duplicate {}, {} reclaimable",
            self.counters.files_scanned,
            summary.duplicate_groups,
            plural(summary.duplicate_groups, "group", "groups"),
            summary.duplicate_files,
            plural(summary.duplicate_files, "file", "files"),
            ByteSize::b(summary.reclaimable_space).to_string().cyan().whenever(when)
        )?;

        if self.counters.errors_encountered > 0 {
            let line = format!(
                "{} {} skipped (run with -v for details)",
                self.counters.errors_encountered,
                plural(self.counters.errors_encountered as usize, "entry", "entries")
            );
            writeln!(writer, "{}", line.yellow().whenever(when))?;
        }

        Ok(())
    }

    /// Render to a string.
    ///
    /// # Errors
    ///
    /// Never fails in practice; mirrors [`Self::write_to`].
    pub fn to_string(&self) -> io::Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn plural<'s>(count: usize, one: &'s str, many: &'s str) -> &'s str {
    if count == 1 {
        one
    } else {
        many
    }
}
