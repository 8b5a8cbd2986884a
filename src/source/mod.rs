//! Markdown documents for the terminal host.
//!
//! A [`Document`] holds the file text and the outline the host reports to
//! the synchroniser. Text and outline are updated in two steps so that an
//! edit can be observed before the outline is re-indexed, the same way an
//! editor's metadata index lags behind the buffer.

use crate::model::error::SourceError;
use crate::model::{FileId, HeadingLevel, OutlineItem, SourcePosition};
use pulldown_cmark::{Event, HeadingLevel as MdHeadingLevel, Options, Parser, Tag, TagEnd};
use std::ops::Range;
use std::path::Path;
use tracing::debug;

pub mod file;

pub use file::{DocumentWatcher, FileChange};

/// A markdown file loaded into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    file: FileId,
    lines: Vec<String>,
    outline: Vec<OutlineItem>,
    indexed: bool,
}

impl Document {
    /// Read and index the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::FileNotFound` if the file does not exist and
    /// `SourceError::Io` for other read failures.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SourceError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        let file = FileId::new(path)?;
        Ok(Self::from_text(file, &text))
    }

    /// Build an indexed document from in-memory text.
    pub fn from_text(file: FileId, text: &str) -> Self {
        let lines = split_lines(text);
        let outline = extract_outline(text);
        Self {
            file,
            lines,
            outline,
            indexed: true,
        }
    }

    /// Replace the text from disk without re-indexing.
    ///
    /// The outline keeps describing the previous text until
    /// [`reindex`](Self::reindex).
    pub fn reload(&mut self) -> Result<(), SourceError> {
        let text = std::fs::read_to_string(self.file.path())?;
        self.replace_text(&text);
        Ok(())
    }

    /// Replace the text without re-indexing.
    pub fn replace_text(&mut self, text: &str) {
        self.lines = split_lines(text);
        self.indexed = false;
    }

    /// Recompute the outline from the current text.
    pub fn reindex(&mut self) {
        self.outline = extract_outline(&self.lines.join("\n"));
        self.indexed = true;
        debug!(file = %self.file, headings = self.outline.len(), "document indexed");
    }

    /// Identity of the loaded file.
    pub fn file(&self) -> &FileId {
        &self.file
    }

    /// Current text, one entry per line.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Outline as of the last index. Offsets are line numbers.
    pub fn outline(&self) -> &[OutlineItem] {
        &self.outline
    }

    /// Whether the outline matches the text.
    pub fn is_indexed(&self) -> bool {
        self.indexed
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Extract the outline: ATX and setext headings in document order.
///
/// Parsing is CommonMark, so headings inside code blocks, HTML blocks and a
/// closed YAML front-matter block are skipped. A heading's text is its raw
/// inline source and its offset is the zero-based line it starts on.
pub fn extract_outline(text: &str) -> Vec<OutlineItem> {
    let line_starts = line_starts(text);
    let mut outline = Vec::new();
    let mut open: Option<OpenHeading> = None;

    let parser = Parser::new_ext(text, Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
    for (event, range) in parser.into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                open = Some(OpenHeading {
                    level: heading_level(level),
                    start: range.start,
                    content: None,
                });
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(heading) = open.take() {
                    outline.push(heading.finish(text, &line_starts));
                }
            }
            _ => {
                if let Some(heading) = open.as_mut() {
                    heading.extend(range);
                }
            }
        }
    }
    outline
}

/// A heading between its start and end events.
struct OpenHeading {
    level: HeadingLevel,
    start: usize,
    /// Source span covered by the heading's inline events.
    content: Option<Range<usize>>,
}

impl OpenHeading {
    fn extend(&mut self, range: Range<usize>) {
        self.content = Some(match self.content.take() {
            Some(span) => span.start.min(range.start)..span.end.max(range.end),
            None => range,
        });
    }

    fn finish(self, text: &str, line_starts: &[usize]) -> OutlineItem {
        let line = line_starts
            .partition_point(|&start| start <= self.start)
            .saturating_sub(1);
        let col = self.start - line_starts.get(line).copied().unwrap_or(0);
        // Setext content may span lines; the outline shows it on one
        let raw = self
            .content
            .and_then(|span| text.get(span))
            .map(|raw| raw.lines().map(str::trim).collect::<Vec<_>>().join(" "))
            .unwrap_or_default();
        OutlineItem {
            level: self.level,
            text: raw,
            start: SourcePosition::new(line, col),
            offset: line,
        }
    }
}

/// Byte offset of the first character of every line.
fn line_starts(text: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(text.match_indices('\n').map(|(ix, _)| ix + 1))
        .collect()
}

fn heading_level(level: MdHeadingLevel) -> HeadingLevel {
    match level {
        MdHeadingLevel::H1 => HeadingLevel::H1,
        MdHeadingLevel::H2 => HeadingLevel::H2,
        MdHeadingLevel::H3 => HeadingLevel::H3,
        MdHeadingLevel::H4 => HeadingLevel::H4,
        MdHeadingLevel::H5 => HeadingLevel::H5,
        MdHeadingLevel::H6 => HeadingLevel::H6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn summary(text: &str) -> Vec<(u8, String, usize)> {
        extract_outline(text)
            .into_iter()
            .map(|item| (item.level.get(), item.text, item.offset))
            .collect()
    }

    #[test]
    fn extracts_atx_headings_with_line_offsets() {
        let text = "# Guide\n\nintro\n## Install\ntext\n### Linux\n";
        assert_eq!(
            summary(text),
            vec![
                (1, "Guide".to_string(), 0),
                (2, "Install".to_string(), 3),
                (3, "Linux".to_string(), 5),
            ]
        );
    }

    #[test]
    fn requires_space_after_hashes() {
        assert!(summary("#hashtag\n####### seven\n").is_empty());
    }

    #[test]
    fn strips_closing_hashes_only_after_space() {
        assert_eq!(summary("## Title ##\n")[0].1, "Title");
        assert_eq!(summary("## C#\n")[0].1, "C#");
        assert_eq!(summary("#\n")[0].1, "");
    }

    #[test]
    fn skips_headings_in_fenced_code() {
        let text = "# Real\n```sh\n# comment\n```\n~~~~\n## also code\n~~~~\n## After\n";
        let titles: Vec<String> = summary(text).into_iter().map(|(_, t, _)| t).collect();
        assert_eq!(titles, vec!["Real", "After"]);
    }

    #[test]
    fn shorter_fence_does_not_close_longer_one() {
        let text = "````\n```\n# inside\n````\n# outside\n";
        let titles: Vec<String> = summary(text).into_iter().map(|(_, t, _)| t).collect();
        assert_eq!(titles, vec!["outside"]);
    }

    #[test]
    fn skips_front_matter_and_indented_code() {
        let text = "---\ntitle: x\n# not a heading\n---\n    # indented code\n   # Three spaces\n";
        let outline = extract_outline(text);
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].text, "Three spaces");
        assert_eq!(outline[0].start, SourcePosition::new(5, 3));
    }

    #[test]
    fn extracts_setext_headings() {
        let text = "Guide\n=====\n\ntext\n\nInstall\n-------\n";
        assert_eq!(
            summary(text),
            vec![(1, "Guide".to_string(), 0), (2, "Install".to_string(), 5)]
        );
    }

    #[test]
    fn leading_rule_is_not_front_matter() {
        let text = "---\n# Guide\n\ntext\n## Install\n";
        assert_eq!(
            summary(text),
            vec![(1, "Guide".to_string(), 1), (2, "Install".to_string(), 4)]
        );
    }

    #[test]
    fn keeps_raw_inline_markup_in_heading_text() {
        let outline = extract_outline("## **Install** `cargo`\n> # Quoted\n");
        assert_eq!(outline[0].text, "**Install** `cargo`");
        assert_eq!(outline[1].text, "Quoted");
        assert_eq!(outline[1].offset, 1);
    }

    #[test]
    fn replace_text_leaves_outline_until_reindex() {
        let file = FileId::new("doc.md").unwrap();
        let mut doc = Document::from_text(file, "# One\n");
        doc.replace_text("# One\n## Two\n");

        assert!(!doc.is_indexed());
        assert_eq!(doc.outline().len(), 1);
        assert_eq!(doc.lines().len(), 2);

        doc.reindex();
        assert!(doc.is_indexed());
        assert_eq!(doc.outline().len(), 2);
    }

    #[test]
    fn load_reads_file_from_disk() {
        let path = std::env::temp_dir().join("sticky_headings_load_test.md");
        fs::write(&path, "# Title\nbody\n").unwrap();

        let result = Document::load(&path);
        let _ = fs::remove_file(&path);

        let doc = result.unwrap();
        assert_eq!(doc.outline().len(), 1);
        assert_eq!(doc.lines(), ["# Title", "body"]);
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let path = std::env::temp_dir().join("sticky_headings_missing_12345.md");
        assert!(matches!(
            Document::load(&path),
            Err(SourceError::FileNotFound { .. })
        ));
    }
}
