use crate::{
    question::{badge, button, glyph},
    render_question, Action, Element, Event, Node, Target, ViewState,
};
use alloc::{format, string::String};
use model::Section;

pub fn section_anchor(id: u64) -> String {
    format!("section-{id}")
}

/// Renders a section with all of its questions. Points are left for the
/// quiz renderer to total.
pub fn render_section(section: &Section, view: &ViewState) -> Node {
    let id = section.id;
    let busy = view.is_pending(Target::Section(id));

    let mut heading = Element::new("h2").text(format!("{}. {} ", section.order_number, section.name));
    if section.closed {
        heading = heading.child(glyph("lock")).text(" ");
    }
    if let Some(points) = section.points {
        heading = heading.child(Element::new("span").class("section-points").text(format!("{points}p")));
    }

    let mut group = Element::new("div").class("btn-group").attr("role", "group");
    if section.host {
        group = group
            .child(
                button(if section.open { "btn-success" } else { "btn-default" }, busy)
                    .on(Event::Click, Action::OpenSection(id))
                    .child(glyph("eye-open")),
            )
            .child(
                button(if section.closed { "btn-danger" } else { "btn-default" }, busy)
                    .on(Event::Click, Action::CloseSection(id))
                    .child(glyph("lock")),
            );
    } else {
        group = group.child(badge("user", section.user.clone()));
    }
    if let Some(average) = section.average {
        group = group.child(badge("equalizer", format!("{average}p")));
    }

    Element::new("div")
        .attr("id", section_anchor(id))
        .child(heading)
        .child(Element::new("div").class("section-bar").child(group))
        .children(section.questions.iter().map(|question| render_question(question, view)))
        .into()
}
