use std::io::Write;

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::{
    error::Result,
    id::{NodeId, NodeKey},
    tree::Tree,
};

/// Traverses a subtree and returns a string showing each node's name, state
/// and resolved rectangles for visual display. This is a debug function.
pub fn dump(tree: &Tree, root: NodeId) -> Result<String> {
    let key = tree.key(root)?;
    let mut buffer = Buffer::ansi();
    dump_node(&mut buffer, tree, key, 0)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Helper to write an indented, colored label followed by a value.
fn write_field(buffer: &mut Buffer, indent: &str, label: &str, value: &str) -> Result<()> {
    write!(buffer, "{indent}  ")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(buffer, "{label}")?;
    buffer.reset()?;
    writeln!(buffer, " {value}")?;
    Ok(())
}

/// Walk a node subtree and emit formatted debug output.
fn dump_node(buffer: &mut Buffer, tree: &Tree, key: NodeKey, level: usize) -> Result<()> {
    let node = &tree.nodes[key];
    let indent = "    ".repeat(level);

    write!(buffer, "{indent}")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    match &node.element.name {
        Some(n) => write!(buffer, "{n}")?,
        None => write!(buffer, "{:?}", tree.id(key))?,
    }
    buffer.reset()?;

    let mut indicators = Vec::new();
    if tree.focus == Some(key) {
        indicators.push(("FOCUSED", Color::Magenta));
    }
    if tree.hover == Some(key) {
        indicators.push(("hover", Color::Blue));
    }
    if node.element.hidden {
        indicators.push(("hidden", Color::Yellow));
    }
    if node.resolved.is_none() {
        indicators.push(("not rendered", Color::Red));
    }
    for (i, (label, color)) in indicators.iter().enumerate() {
        write!(buffer, "{}", if i == 0 { " " } else { ", " })?;
        buffer.set_color(ColorSpec::new().set_fg(Some(*color)))?;
        write!(buffer, "{label}")?;
        buffer.reset()?;
    }
    writeln!(buffer)?;

    if let Some(r) = node.resolved {
        let f = r.full;
        write_field(
            buffer,
            &indent,
            "full:",
            &format!("x: {}, y: {}, w: {}, h: {}", f.x, f.y, f.w, f.h),
        )?;
        let c = r.rect;
        write_field(
            buffer,
            &indent,
            "visible:",
            &format!("x: {}, y: {}, w: {}, h: {}", c.tl.x, c.tl.y, c.w, c.h),
        )?;
    }
    if node.scrollable() {
        let s = node.scroll;
        write_field(
            buffer,
            &indent,
            "scroll:",
            &format!(
                "base {} offset {} visible {} content {}",
                s.base, s.offset, s.visible, s.content
            ),
        )?;
    }

    for child in &node.children {
        dump_node(buffer, tree, *child, level + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{element::Element, geom::Expanse};

    #[test]
    fn dump_names_and_states() {
        let mut t = Tree::new(Expanse::new(10, 4));
        let root = t.root();
        let a = t
            .create_child(root, Element::new().name("list").width(4).height(2))
            .unwrap();
        t.create_child(a, Element::new().name("gone").hidden(true))
            .unwrap();
        t.layout().unwrap();
        let out = dump(&t, root).unwrap();
        assert!(out.contains("root"));
        assert!(out.contains("list"));
        assert!(out.contains("x: 0, y: 0, w: 4, h: 2"));
        assert!(out.contains("hidden"));
    }
}
