use std::{cell::RefCell, rc::Rc};

use tessera::{
    Border, BorderKind, Element, Extent, FocusManager, NodeEvent, NodeId, Propagation, Result,
    Screen, ScrollOptions,
    event::key::KeyCode,
    style::{Attribute, Color, PartialStyle, Style},
};

/// The nodes making up the list gym.
#[derive(Debug, Clone, Copy)]
pub struct ListGym {
    /// Title bar.
    pub header: NodeId,
    /// The scrolling list.
    pub list: NodeId,
    /// Status line under the list.
    pub status: NodeId,
}

/// Text for list row `i`.
fn item(i: usize) -> String {
    format!("{i:>4}  item number {i}")
}

/// Status line text for a list scrolled to `base` with `len` rows.
fn status_text(base: u32, len: usize) -> String {
    format!("row {base} of {len}  j/k scroll, a add, d drop, q quit")
}

impl ListGym {
    /// Build the gym on a screen with `items` initial rows and focus the
    /// list.
    pub fn install(screen: &mut Screen, items: usize) -> Result<Self> {
        let root = screen.root();
        let header = screen.create_child(
            root,
            Element::new()
                .name("header")
                .left(0)
                .right(0)
                .height(1)
                .style(Style::default().fg(Color::Black).bg(Color::Cyan))
                .content("tessera list gym"),
        )?;
        let rows: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new((0..items).map(item).collect()));
        let list = screen.create_child(
            root,
            Element::new()
                .name("list")
                .top(1)
                .bottom(1)
                .left(0)
                .width(Extent::Percent(100.0, 0))
                .border(Border::new(BorderKind::Line))
                .focus_style(PartialStyle::fg(Color::Yellow))
                .focusable(true)
                .scrollable(ScrollOptions::default())
                .content(rows.borrow().join("\n")),
        )?;
        let status = screen.create_child(
            root,
            Element::new()
                .name("status")
                .bottom(0)
                .left(0)
                .right(0)
                .height(1)
                .style(Style::default().with(Attribute::Dim))
                .content(status_text(0, items)),
        )?;

        let base = Rc::new(RefCell::new(0u32));
        {
            let (rows, base) = (rows.clone(), base.clone());
            screen.on(list, move |e, _, ctx| {
                if let NodeEvent::Scroll(b) = e {
                    *base.borrow_mut() = *b;
                    ctx.set_content(status, status_text(*b, rows.borrow().len()));
                }
                Propagation::Continue
            })?;
        }
        screen.on(root, move |e, _, ctx| {
            let NodeEvent::Key(k) = e else {
                return Propagation::Continue;
            };
            match k.key {
                KeyCode::Char('q') => ctx.exit(0),
                KeyCode::Char('j') => ctx.scroll(list, 1),
                KeyCode::Char('k') => ctx.scroll(list, -1),
                KeyCode::Char('g') => ctx.scroll_to(list, 0),
                KeyCode::Char('a') => {
                    let mut r = rows.borrow_mut();
                    let n = r.len();
                    r.push(item(n));
                    ctx.set_content(list, r.join("\n"));
                    ctx.set_content(status, status_text(*base.borrow(), r.len()));
                }
                KeyCode::Char('d') => {
                    let mut r = rows.borrow_mut();
                    r.pop();
                    ctx.set_content(list, r.join("\n"));
                    ctx.set_content(status, status_text(*base.borrow(), r.len()));
                }
                _ => return Propagation::Continue,
            }
            Propagation::Stop
        })?;
        screen.set_focus(list)?;
        tracing::info!(items, "list gym installed");
        Ok(Self {
            header,
            list,
            status,
        })
    }
}
