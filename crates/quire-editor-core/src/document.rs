//! The document tree with flat positional addressing.
//!
//! Positions count Unicode scalar values (chars), not bytes or UTF-16.
//! Position 0 is the start of the root's content; every element adds one
//! position before and one after its content.

use tracing::trace;

use crate::error::EditorError;
use crate::node::{Element, ElementKind, Mark, Node, TextRun};

/// A document: a root element of kind [`ElementKind::Doc`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Element::new(ElementKind::Doc, Vec::new()))
    }
}

impl Document {
    /// Create a document from a root element, normalizing its text runs.
    pub fn new(mut root: Element) -> Self {
        normalize_tree(&mut root);
        Self { root }
    }

    /// Create a document holding the given top-level blocks.
    pub fn from_blocks(blocks: Vec<Node>) -> Self {
        Self::new(Element::new(ElementKind::Doc, blocks))
    }

    /// Create a document with one plain paragraph per entry.
    pub fn from_paragraphs<S: AsRef<str>>(paragraphs: &[S]) -> Self {
        let blocks = paragraphs
            .iter()
            .map(|text| {
                let content = if text.as_ref().is_empty() {
                    Vec::new()
                } else {
                    vec![TextRun::plain(text.as_ref()).into()]
                };
                Element::new(ElementKind::Paragraph, content).into()
            })
            .collect();
        Self::from_blocks(blocks)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Number of positions inside the root.
    pub fn content_size(&self) -> usize {
        self.root.content_size()
    }

    /// Visit every node depth-first with its absolute start position.
    ///
    /// The callback returns whether to descend into an element's children.
    pub fn descendants<'a, F>(&'a self, mut f: F)
    where
        F: FnMut(&'a Node, usize) -> bool,
    {
        visit(&self.root.content, 0, &mut f);
    }

    /// All text runs in document order, with their start positions.
    pub fn text_runs(&self) -> Vec<(usize, &TextRun)> {
        let mut runs = Vec::new();
        self.descendants(|node, pos| {
            if let Node::Text(run) = node {
                runs.push((pos, run));
            }
            true
        });
        runs
    }

    /// Concatenated text of all runs.
    pub fn text_content(&self) -> String {
        self.text_runs()
            .into_iter()
            .map(|(_, run)| run.text.as_str())
            .collect()
    }

    /// Text of the runs overlapping `from..to`. Structure and atoms are skipped.
    pub fn text_between(&self, from: usize, to: usize) -> Option<String> {
        if from > to || to > self.content_size() {
            return None;
        }
        let mut out = String::new();
        for (pos, run) in self.text_runs() {
            let end = pos + run.len_chars();
            if end <= from || pos >= to {
                continue;
            }
            let local_from = from.saturating_sub(pos);
            let local_to = to.min(end) - pos;
            out.extend(run.text.chars().skip(local_from).take(local_to - local_from));
        }
        Some(out)
    }

    fn check_range(&self, from: usize, to: usize) -> Result<(), EditorError> {
        let size = self.content_size();
        if to > size || from > to {
            return Err(EditorError::PositionOutOfRange {
                pos: to.max(from),
                size,
            });
        }
        Ok(())
    }

    /// Replace `from..to` inside one textblock with text carrying the marks found at `from`.
    ///
    /// Returns the inline nodes that were removed.
    pub(crate) fn replace_text(
        &mut self,
        from: usize,
        to: usize,
        text: &str,
    ) -> Result<Vec<Node>, EditorError> {
        self.check_range(from, to)?;
        let (block, start) = find_container_mut(&mut self.root, 0, from, to)
            .filter(|(el, _)| el.is_textblock())
            .ok_or(EditorError::NotInTextblock { from, to })?;

        let marks = marks_at(&block.content, from - start, from == to);
        let content = if text.is_empty() {
            Vec::new()
        } else {
            vec![TextRun::marked(text, marks).into()]
        };
        Ok(splice_inline(&mut block.content, from - start, to - start, content))
    }

    /// Replace `from..to` inside one textblock with the given inline nodes.
    pub(crate) fn replace_inline(
        &mut self,
        from: usize,
        to: usize,
        content: Vec<Node>,
    ) -> Result<Vec<Node>, EditorError> {
        self.check_range(from, to)?;
        if !content.iter().all(Node::is_inline) {
            return Err(EditorError::InvalidInsertPosition { pos: from });
        }
        let (block, start) = find_container_mut(&mut self.root, 0, from, to)
            .filter(|(el, _)| el.is_textblock())
            .ok_or(EditorError::NotInTextblock { from, to })?;
        Ok(splice_inline(&mut block.content, from - start, to - start, content))
    }

    /// Insert a node at `pos`.
    ///
    /// Inline nodes go inside textblocks; block nodes go between siblings.
    pub(crate) fn insert_node(&mut self, pos: usize, node: Node) -> Result<(), EditorError> {
        self.check_range(pos, pos)?;
        let (container, start) = find_container_mut(&mut self.root, 0, pos, pos)
            .ok_or(EditorError::InvalidInsertPosition { pos })?;

        if container.is_textblock() {
            if !node.is_inline() {
                return Err(EditorError::InvalidInsertPosition { pos });
            }
            splice_inline(&mut container.content, pos - start, pos - start, vec![node]);
            return Ok(());
        }

        if node.is_inline() {
            return Err(EditorError::InvalidInsertPosition { pos });
        }
        let index = child_index_at(&container.content, pos - start)
            .ok_or(EditorError::InvalidInsertPosition { pos })?;
        container.content.insert(index, node);
        Ok(())
    }

    /// Remove the node starting at `pos`, returning it.
    pub(crate) fn remove_node(&mut self, pos: usize) -> Result<Node, EditorError> {
        self.check_range(pos, pos)?;
        let (container, start) =
            find_container_mut(&mut self.root, 0, pos, pos).ok_or(EditorError::NoNodeAt { pos })?;
        let index = child_index_at(&container.content, pos - start)
            .filter(|&i| i < container.content.len())
            .ok_or(EditorError::NoNodeAt { pos })?;
        let removed = container.content.remove(index);
        if container.is_textblock() {
            normalize_inline(&mut container.content);
        }
        Ok(removed)
    }
}

impl From<Element> for Document {
    fn from(root: Element) -> Self {
        Self::new(root)
    }
}

fn visit<'a, F>(nodes: &'a [Node], base: usize, f: &mut F)
where
    F: FnMut(&'a Node, usize) -> bool,
{
    let mut pos = base;
    for node in nodes {
        let size = node.size();
        if f(node, pos) {
            if let Node::Element(el) = node {
                visit(&el.content, pos + 1, f);
            }
        }
        pos += size;
    }
}

/// Index of the child element whose inner range covers `from..=to`, with its content start.
fn covering_child(
    el: &Element,
    content_start: usize,
    from: usize,
    to: usize,
) -> Option<(usize, usize)> {
    let mut pos = content_start;
    for (i, child) in el.content.iter().enumerate() {
        let size = child.size();
        if let Node::Element(_) = child {
            let inner_start = pos + 1;
            let inner_end = pos + size - 1;
            if inner_start <= from && to <= inner_end {
                return Some((i, inner_start));
            }
        }
        if pos > to {
            break;
        }
        pos += size;
    }
    None
}

/// Deepest element whose content covers `from..=to`, with its content start.
fn find_container_mut(
    el: &mut Element,
    content_start: usize,
    from: usize,
    to: usize,
) -> Option<(&mut Element, usize)> {
    match covering_child(el, content_start, from, to) {
        Some((i, inner)) => match &mut el.content[i] {
            Node::Element(child) => find_container_mut(child, inner, from, to),
            _ => None,
        },
        None => Some((el, content_start)),
    }
}

/// Index of the child starting exactly at `offset`, or `len` for the end.
fn child_index_at(content: &[Node], offset: usize) -> Option<usize> {
    let mut pos = 0;
    for (i, child) in content.iter().enumerate() {
        if pos == offset {
            return Some(i);
        }
        if pos > offset {
            return None;
        }
        pos += child.size();
    }
    (pos == offset).then_some(content.len())
}

/// Split inline content so a child boundary falls at `offset`. Returns that child index.
fn split_inline(content: &mut Vec<Node>, offset: usize) -> usize {
    let mut pos = 0;
    for i in 0..content.len() {
        if pos == offset {
            return i;
        }
        let size = content[i].size();
        if offset < pos + size {
            if let Node::Text(run) = &content[i] {
                let (before, after) = run.split_at(offset - pos);
                content[i] = before.into();
                content.insert(i + 1, after.into());
                return i + 1;
            }
        }
        pos += size;
    }
    content.len()
}

fn splice_inline(content: &mut Vec<Node>, from: usize, to: usize, insert: Vec<Node>) -> Vec<Node> {
    let start = split_inline(content, from);
    let end = split_inline(content, to);
    let removed: Vec<Node> = content.splice(start..end, insert).collect();
    normalize_inline(content);
    trace!(from, to, removed = removed.len(), "spliced inline content");
    removed
}

/// Marks for text inserted at `offset`.
///
/// Replacements take the marks of the run being replaced; pure insertions
/// continue the run that ends at the insertion point.
fn marks_at(content: &[Node], offset: usize, insertion: bool) -> Vec<Mark> {
    let mut pos = 0;
    let mut ending_here = None;
    let mut starting_here = None;
    for node in content {
        let size = node.size();
        if let Node::Text(run) = node {
            if pos < offset && offset < pos + size {
                return run.marks.clone();
            }
            if pos + size == offset {
                ending_here = Some(&run.marks);
            }
            if pos == offset {
                starting_here = Some(&run.marks);
            }
        }
        if pos > offset {
            break;
        }
        pos += size;
    }
    let preferred = if insertion {
        ending_here.or(starting_here)
    } else {
        starting_here.or(ending_here)
    };
    preferred.cloned().unwrap_or_default()
}

/// Drop empty runs and merge neighbours with identical marks.
fn normalize_inline(content: &mut Vec<Node>) {
    let mut out: Vec<Node> = Vec::with_capacity(content.len());
    for node in content.drain(..) {
        match node {
            Node::Text(run) if run.is_empty() => {}
            Node::Text(run) => match out.last_mut() {
                Some(Node::Text(prev)) if prev.same_marks(&run) => {
                    let mut merged = String::with_capacity(prev.text.len() + run.text.len());
                    merged.push_str(&prev.text);
                    merged.push_str(&run.text);
                    prev.text = merged.into();
                }
                _ => out.push(Node::Text(run)),
            },
            other => out.push(other),
        }
    }
    *content = out;
}

fn normalize_tree(el: &mut Element) {
    if el.is_textblock() {
        normalize_inline(&mut el.content);
        return;
    }
    for child in &mut el.content {
        if let Node::Element(child) = child {
            normalize_tree(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::build::*;

    fn sample() -> Document {
        // 0 <p> 1 "Hello" 6 </p> 7 <ul> 8 <li> 9 <p> 10 "world" 15 </p> 16 </li> 17 </ul> 18
        Document::from_blocks(vec![
            paragraph(vec![text("Hello")]),
            bullet_list(vec![list_item(vec![paragraph(vec![text("world")])])]),
        ])
    }

    #[test]
    fn test_text_run_positions() {
        let doc = sample();
        let runs: Vec<_> = doc
            .text_runs()
            .into_iter()
            .map(|(pos, run)| (pos, run.text.to_string()))
            .collect();
        assert_eq!(runs, vec![(1, "Hello".to_string()), (10, "world".to_string())]);
        assert_eq!(doc.content_size(), 18);
    }

    #[test]
    fn test_text_between() {
        let doc = sample();
        assert_eq!(doc.text_between(1, 6).as_deref(), Some("Hello"));
        assert_eq!(doc.text_between(3, 12).as_deref(), Some("llowo"));
        assert_eq!(doc.text_between(0, 100), None);
    }

    #[test]
    fn test_replace_text_keeps_marks() {
        let mut doc = Document::from_blocks(vec![paragraph(vec![
            text("plain "),
            bold("strong"),
        ])]);
        let removed = doc.replace_text(7, 13, "bold").unwrap();
        assert_eq!(removed, vec![bold("strong")]);
        let p = doc.root().content[0].as_element().unwrap();
        assert_eq!(p.content, vec![text("plain "), bold("bold")]);
    }

    #[test]
    fn test_replace_text_within_run() {
        let mut doc = Document::from_paragraphs(&["cat cat cat"]);
        doc.replace_text(5, 8, "dog").unwrap();
        assert_eq!(doc.text_content(), "cat dog cat");
        // Still one merged run.
        assert_eq!(doc.text_runs().len(), 1);
    }

    #[test]
    fn test_delete_text_merges_runs() {
        let mut doc = Document::from_blocks(vec![paragraph(vec![
            text("ab"),
            bold("X"),
            text("cd"),
        ])]);
        doc.replace_text(3, 4, "").unwrap();
        assert_eq!(doc.text_runs().len(), 1);
        assert_eq!(doc.text_content(), "abcd");
    }

    #[test]
    fn test_replace_across_blocks_fails() {
        let mut doc = sample();
        let err = doc.replace_text(3, 12, "x").unwrap_err();
        assert_eq!(err, EditorError::NotInTextblock { from: 3, to: 12 });
    }

    #[test]
    fn test_insert_and_remove_block() {
        let mut doc = sample();
        doc.insert_node(7, paragraph(vec![text("new")])).unwrap();
        assert_eq!(doc.text_content(), "Hellonewworld");

        let removed = doc.remove_node(7).unwrap();
        assert_eq!(removed, paragraph(vec![text("new")]));
        assert_eq!(doc, sample());
    }

    #[test]
    fn test_insert_block_inside_text_fails() {
        let mut doc = sample();
        let err = doc.insert_node(3, paragraph(vec![])).unwrap_err();
        assert_eq!(err, EditorError::InvalidInsertPosition { pos: 3 });
    }

    #[test]
    fn test_insert_inline_atom() {
        let mut doc = Document::from_paragraphs(&["ab"]);
        doc.insert_node(2, image("x.png")).unwrap();
        assert_eq!(doc.content_size(), 5);
        let runs: Vec<_> = doc.text_runs().into_iter().map(|(pos, _)| pos).collect();
        assert_eq!(runs, vec![1, 3]);
    }

    #[test]
    fn test_multibyte_positions() {
        let doc = Document::from_paragraphs(&["héllo wörld"]);
        assert_eq!(doc.text_between(7, 12).as_deref(), Some("wörld"));
    }
}
