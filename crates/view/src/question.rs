use crate::{Action, Element, Event, Node, Target, ViewState};
use alloc::{format, string::String, vec::Vec};
use model::Question;

/// Answer summaries longer than this are cut down on the submit button.
const SUMMARY_LIMIT: usize = 20;

pub fn question_anchor(id: u64) -> String {
    format!("question-{id}")
}

pub(crate) fn glyph(name: &str) -> Element {
    Element::new("span").class(format!("glyphicon glyphicon-{name}"))
}

pub(crate) fn button(style: &str, disabled: bool) -> Element {
    let class = if disabled { format!("btn {style} disabled") } else { format!("btn {style}") };
    Element::new("button").attr("type", "button").class(class).flag("disabled", disabled)
}

/// A non-interactive badge inside a button group.
pub(crate) fn badge(icon: &str, label: String) -> Element {
    button("btn-default", true).child(glyph(icon)).text(format!(" {label}"))
}

fn summarize(question: &Question) -> String {
    let joined = question.answers.keys().collect::<Vec<_>>().join(", ");
    if joined.chars().count() <= SUMMARY_LIMIT {
        return joined;
    }
    let mut short: String = joined.chars().take(SUMMARY_LIMIT - 3).collect();
    short.push_str("...");
    short
}

fn choice_inputs(question: &Question, values: &[String]) -> Vec<Node> {
    let frozen = question.is_effectively_closed();
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let selected = question.answers.contains(value);
            let correct = question.is_correct(value);
            let status = if correct {
                "has-success"
            } else if selected && frozen {
                "has-error"
            } else {
                ""
            };

            let radio = Element::new("input")
                .attr("type", "radio")
                .attr("id", format!("question-{}-choice-{index}", question.id))
                .attr("name", format!("question-{}-input", question.id))
                .attr("value", value.as_str())
                .attr("data-id", format!("{}", question.id))
                .class("question-radio")
                .flag("checked", selected)
                .flag("disabled", frozen);

            let mut label = Element::new("label").child(radio).text(format!(" {value}"));
            if selected && correct {
                label = label.child(glyph("ok"));
            } else if selected && frozen {
                label = label.child(glyph("remove"));
            }

            Element::new("div").class(status).child(Element::new("div").class("radio").child(label)).into()
        })
        .collect()
}

fn text_inputs(question: &Question) -> Vec<Node> {
    let frozen = question.is_effectively_closed();
    let submitted: Vec<_> = question.answers.iter().collect();
    (0..question.max_answers)
        .map(|slot| {
            let (answer, count) = submitted.get(slot).copied().unwrap_or(("", 0.0));
            // Votes are only granted to answers the server accepted, including
            // near matches of the correct ones.
            let correct = !answer.is_empty() && (count > 0.0 || question.is_correct(answer));
            let wrong = !answer.is_empty() && !correct && frozen;
            let status = if correct {
                "form-group has-success has-feedback"
            } else if wrong {
                "form-group has-error has-feedback"
            } else {
                "form-group has-feedback"
            };

            let input = Element::new("input")
                .attr("type", "text")
                .class(if frozen { "form-control disabled question-text" } else { "form-control question-text" })
                .attr("id", format!("question-{}-input-{slot}", question.id))
                .attr("name", format!("question-{}-input", question.id))
                .attr("data-id", format!("{}", question.id))
                .attr("placeholder", answer)
                .attr("value", answer)
                .flag("disabled", frozen);

            let mut feedback = Element::new("span").class("form-control-feedback");
            if correct {
                feedback = feedback.text(format!("{count}")).child(glyph("ok"));
            } else if wrong {
                feedback = feedback.child(glyph("remove"));
            }

            Element::new("div").class(status).child(input).child(feedback).into()
        })
        .collect()
}

fn heading(question: &Question) -> Element {
    let mut heading = Element::new("h3").text(format!("{}. ", question.order_number));
    if question.bonus {
        heading = heading.child(glyph("asterisk")).text(" ");
    }
    if let Some(points) = question.points {
        heading = heading.child(Element::new("span").class("section-points").text(format!("{points}p")));
    }
    heading
}

fn body(question: &Question, view: &ViewState) -> Element {
    let state = if question.closed { "question-content disabled" } else { "question-content enabled" };
    let mut body = Element::new("div").class(state);
    if let Some(text) = &question.text {
        body = body.child(Node::Raw(text.clone()));
    }
    body = body.child(Element::new("br"));
    if let Some(content) = view.cache.content(question.id) {
        body = body.child(Node::Raw(content.into()));
    }
    body = body.child(Element::new("br"));
    if question.is_graded() {
        if let Some(reveal) = view.cache.answer_content(question.id) {
            body = body.child(Node::Raw(reveal.into()));
        }
    }
    body
}

fn toolbar(question: &Question, view: &ViewState) -> Element {
    let id = question.id;
    let busy = view.is_pending(Target::Question(id));
    let frozen = question.is_effectively_closed();

    let mut group = Element::new("div").class("btn-group").attr("role", "group");
    if question.host {
        group = group
            .child(
                button(if question.open { "btn-success" } else { "btn-default" }, busy)
                    .on(Event::Click, Action::OpenQuestion(id))
                    .child(glyph("eye-open")),
            )
            .child(
                button(if question.closed { "btn-danger" } else { "btn-default" }, busy)
                    .on(Event::Click, Action::CloseQuestion(id))
                    .child(glyph("lock")),
            );
    } else {
        let mut submit = button("btn-success", frozen || busy).on(Event::Click, Action::SetAnswer(id)).child(glyph("save"));
        if !question.answers.is_empty() {
            submit = submit.text(format!(" {}", summarize(question)));
        }
        group = group.child(submit);
    }

    if let Some(average) = question.average {
        group = group.child(badge("equalizer", format!("{average}p")));
    }

    group
        .child(badge("th-list", format!("{}", question.max_answers)))
        .child(badge("remove", format!("{}", question.base_points)))
        .child(
            button(if question.liked { "btn-primary" } else { "btn-default" }, busy)
                .on(Event::Click, Action::Like(id))
                .child(glyph("thumbs-up"))
                .text(format!(" {}", question.likes)),
        )
        .child(button("btn-default", busy).on(Event::Click, Action::RefreshQuestion(id)).child(glyph("refresh")))
}

/// Renders a single question. Pure: the same snapshot and view state always
/// yield the same tree.
pub fn render_question(question: &Question, view: &ViewState) -> Node {
    let id = question.id;
    let inputs = match &question.values {
        Some(values) => choice_inputs(question, values),
        None => text_inputs(question),
    };

    // Submitting the form dispatches the answer instead of navigating away.
    let form = Element::new("form")
        .attr("id", format!("question-{id}-form"))
        .class("form")
        .attr("data-id", format!("{id}"))
        .on(Event::Submit, Action::SetAnswer(id))
        .children(inputs);

    let mut reveal = Element::new("div").class("correct-answers");
    if !question.is_multiple_choice() {
        reveal = reveal.children(question.correct.iter().map(|answer| Element::new("p").text(answer.as_str())));
    }

    Element::new("div")
        .attr("id", question_anchor(id))
        .class("jumbotron question")
        .child(heading(question))
        .child(body(question, view))
        .child(Element::new("div").class("question-bar").child(toolbar(question, view)))
        .child(Element::new("div").class("answer-inputs").child(form))
        .child(reveal)
        .into()
}
