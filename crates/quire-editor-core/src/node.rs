//! Document tree nodes.
//!
//! The tree is a closed set of node kinds. Every element kind carries its own
//! typed attribute record instead of an open string-keyed bag, so the
//! compiler knows which attributes a given node may have.
//!
//! Sizes follow the usual rich-text position scheme: a text run counts one
//! position per char, an atom counts one, and an element counts its content
//! plus one position for each of its opening and closing boundaries.

use smol_str::SmolStr;

/// A node in the document tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// A container node with child content.
    Element(Element),
    /// A run of text sharing one set of marks.
    Text(TextRun),
    /// A leaf node that occupies a single position.
    Atom(Atom),
}

impl Node {
    /// Size of this node in document positions.
    pub fn size(&self) -> usize {
        match self {
            Node::Element(el) => el.content_size() + 2,
            Node::Text(run) => run.len_chars(),
            Node::Atom(_) => 1,
        }
    }

    /// Whether this node may appear inside a textblock.
    pub fn is_inline(&self) -> bool {
        match self {
            Node::Text(_) => true,
            Node::Atom(atom) => atom.is_inline(),
            Node::Element(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            Node::Text(run) => Some(run),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Plain text of this node and its descendants. Atoms contribute nothing.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Element(el) => el.content.iter().for_each(|child| child.collect_text(out)),
            Node::Text(run) => out.push_str(&run.text),
            Node::Atom(_) => {}
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl From<TextRun> for Node {
    fn from(run: TextRun) -> Self {
        Node::Text(run)
    }
}

impl From<Atom> for Node {
    fn from(atom: Atom) -> Self {
        Node::Atom(atom)
    }
}

/// A container node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    pub content: Vec<Node>,
}

impl Element {
    pub fn new(kind: ElementKind, content: Vec<Node>) -> Self {
        Self { kind, content }
    }

    /// Sum of the sizes of the child nodes.
    pub fn content_size(&self) -> usize {
        self.content.iter().map(Node::size).sum()
    }

    /// Whether this element holds inline content directly.
    pub fn is_textblock(&self) -> bool {
        self.kind.is_textblock()
    }
}

/// Heading attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeadingAttrs {
    /// 1 through 6.
    pub level: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderedListAttrs {
    pub start: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeBlockAttrs {
    pub language: Option<SmolStr>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableCellAttrs {
    pub colspan: u16,
    pub rowspan: u16,
    pub header: bool,
}

impl Default for TableCellAttrs {
    fn default() -> Self {
        Self {
            colspan: 1,
            rowspan: 1,
            header: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnsAttrs {
    pub count: u8,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardAttrs {
    pub title: Option<SmolStr>,
}

/// The kind of an element, with its attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// Root of the document.
    Doc,
    Paragraph,
    Heading(HeadingAttrs),
    Blockquote,
    BulletList,
    OrderedList(OrderedListAttrs),
    ListItem,
    CodeBlock(CodeBlockAttrs),
    Table,
    TableRow,
    TableCell(TableCellAttrs),
    /// Multi-column layout container.
    Columns(ColumnsAttrs),
    Column,
    Card(CardAttrs),
}

impl ElementKind {
    /// Textblocks hold text runs and inline atoms directly.
    pub fn is_textblock(&self) -> bool {
        matches!(
            self,
            ElementKind::Paragraph | ElementKind::Heading(_) | ElementKind::CodeBlock(_)
        )
    }
}

/// Inline formatting applied to a text run.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
    Link { href: SmolStr },
    TextColor { color: SmolStr },
    Highlight { color: SmolStr },
}

/// A run of text with a fixed set of marks.
///
/// Marks are kept sorted so that runs can be compared for merging.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRun {
    pub text: SmolStr,
    pub marks: Vec<Mark>,
}

impl TextRun {
    /// Create a run with no marks.
    pub fn plain(text: impl Into<SmolStr>) -> Self {
        Self {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    /// Create a run with the given marks.
    pub fn marked(text: impl Into<SmolStr>, mut marks: Vec<Mark>) -> Self {
        marks.sort();
        marks.dedup();
        Self {
            text: text.into(),
            marks,
        }
    }

    /// Length in chars (Unicode scalar values), which is also its size.
    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn same_marks(&self, other: &TextRun) -> bool {
        self.marks == other.marks
    }

    /// Split at a char offset, returning the (before, after) halves.
    pub fn split_at(&self, char_offset: usize) -> (TextRun, TextRun) {
        let byte = char_to_byte(&self.text, char_offset);
        let (before, after) = self.text.split_at(byte);
        (
            TextRun {
                text: before.into(),
                marks: self.marks.clone(),
            },
            TextRun {
                text: after.into(),
                marks: self.marks.clone(),
            },
        )
    }
}

/// Convert a char offset to a byte offset, clamping to the end of `s`.
pub fn char_to_byte(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(s.len())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageAttrs {
    pub src: SmolStr,
    pub alt: Option<SmolStr>,
    pub width: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MathAttrs {
    pub latex: SmolStr,
    /// Display (block) math rather than inline.
    pub display: bool,
}

/// Leaf nodes. Each occupies exactly one position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Atom {
    Image(ImageAttrs),
    Math(MathAttrs),
    HardBreak,
    HorizontalRule,
}

impl Atom {
    pub fn is_inline(&self) -> bool {
        match self {
            Atom::Image(_) | Atom::HardBreak => true,
            Atom::Math(math) => !math.display,
            Atom::HorizontalRule => false,
        }
    }
}

/// Shorthand constructors for building trees in code and tests.
pub mod build {
    use super::*;

    pub fn doc(content: Vec<Node>) -> Element {
        Element::new(ElementKind::Doc, content)
    }

    pub fn paragraph(content: Vec<Node>) -> Node {
        Element::new(ElementKind::Paragraph, content).into()
    }

    pub fn heading(level: u8, content: Vec<Node>) -> Node {
        Element::new(ElementKind::Heading(HeadingAttrs { level }), content).into()
    }

    pub fn blockquote(content: Vec<Node>) -> Node {
        Element::new(ElementKind::Blockquote, content).into()
    }

    pub fn bullet_list(items: Vec<Node>) -> Node {
        Element::new(ElementKind::BulletList, items).into()
    }

    pub fn list_item(content: Vec<Node>) -> Node {
        Element::new(ElementKind::ListItem, content).into()
    }

    pub fn table(rows: Vec<Node>) -> Node {
        Element::new(ElementKind::Table, rows).into()
    }

    pub fn table_row(cells: Vec<Node>) -> Node {
        Element::new(ElementKind::TableRow, cells).into()
    }

    pub fn table_cell(content: Vec<Node>) -> Node {
        Element::new(ElementKind::TableCell(TableCellAttrs::default()), content).into()
    }

    pub fn columns(columns: Vec<Node>) -> Node {
        let count = u8::try_from(columns.len()).unwrap_or(u8::MAX);
        Element::new(ElementKind::Columns(ColumnsAttrs { count }), columns).into()
    }

    pub fn column(content: Vec<Node>) -> Node {
        Element::new(ElementKind::Column, content).into()
    }

    pub fn text(text: &str) -> Node {
        TextRun::plain(text).into()
    }

    pub fn marked(text: &str, marks: Vec<Mark>) -> Node {
        TextRun::marked(text, marks).into()
    }

    pub fn bold(text: &str) -> Node {
        marked(text, vec![Mark::Bold])
    }

    pub fn image(src: &str) -> Node {
        Atom::Image(ImageAttrs {
            src: src.into(),
            alt: None,
            width: None,
        })
        .into()
    }

    pub fn hard_break() -> Node {
        Atom::HardBreak.into()
    }
}
