use crate::{
    question::{button, glyph},
    render_section, Action, Element, Event, Node, ViewState,
};
use alloc::format;
use model::{Quiz, Ranking};

fn ranking_row(ranking: &Ranking, viewer: Option<u64>) -> Element {
    let own = viewer == Some(ranking.id);
    let mut row = Element::new("tr");
    if own {
        row = row.class("bg-primary");
    }

    let mut name = Element::new("td").attr("style", "width: 100%");
    if own {
        name = name.child(glyph("user"));
    }
    name = name.text(format!(" {}", ranking.username));

    // Only the podium reveals its score.
    let mut score = Element::new("td").class("text-right");
    if ranking.rank < 4 {
        score = score.text(format!("{}", ranking.points));
    }

    row.child(Element::new("td").text(format!("{}", ranking.rank))).child(name).child(score)
}

/// Renders the whole quiz document rooted at `#quiz`.
pub fn render_quiz(quiz: &Quiz, view: &ViewState) -> Node {
    let mut root = Element::new("div").attr("id", "quiz");

    if view.failures > 0 {
        root = root.child(
            Element::new("div")
                .class("alert alert-warning stale")
                .attr("role", "alert")
                .child(glyph("warning-sign"))
                .text(format!(" Connection lost, retrying ({} failed attempts)", view.failures)),
        );
    }

    let toggle = button("btn-default", false)
        .attr("id", "auto-refresh")
        .on(Event::Click, Action::ToggleAutoRefresh)
        .child(glyph(if view.auto_refresh { "pause" } else { "play" }));

    root.child(toggle)
        .child(Element::new("h1").class("quiz-title").text(quiz.name.as_str()))
        .children(quiz.sections.iter().map(|section| render_section(section, view)))
        .child(
            Element::new("div").attr("id", "rankings").class("jumbotron").child(
                Element::new("table")
                    .class("table")
                    .children(quiz.rankings.iter().map(|ranking| ranking_row(ranking, quiz.user_id))),
            ),
        )
        .child(Element::new("div").class("total-score").text(format!("{}p", quiz.total_points())))
        .into()
}
