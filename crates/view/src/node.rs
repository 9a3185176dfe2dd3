use alloc::{string::String, vec::Vec};
use core::fmt::{self, Display, Formatter, Write};

/// Browser events that a rendered element may listen to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Click,
    Submit,
}

impl Event {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Submit => "submit",
        }
    }
}

/// User interactions that rendered controls are wired to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Like(u64),
    OpenQuestion(u64),
    CloseQuestion(u64),
    OpenSection(u64),
    CloseSection(u64),
    SetAnswer(u64),
    RefreshQuestion(u64),
    ToggleAutoRefresh,
}

impl Action {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Like(_) => "like",
            Self::OpenQuestion(_) => "open",
            Self::CloseQuestion(_) => "close",
            Self::OpenSection(_) => "open-section",
            Self::CloseSection(_) => "close-section",
            Self::SetAnswer(_) => "answer",
            Self::RefreshQuestion(_) => "refresh-question",
            Self::ToggleAutoRefresh => "toggle-auto-refresh",
        }
    }

    pub const fn target(self) -> Option<u64> {
        match self {
            Self::Like(id)
            | Self::OpenQuestion(id)
            | Self::CloseQuestion(id)
            | Self::OpenSection(id)
            | Self::CloseSection(id)
            | Self::SetAnswer(id)
            | Self::RefreshQuestion(id) => Some(id),
            Self::ToggleAutoRefresh => None,
        }
    }

    /// Inverse of [`Action::name`] paired with [`Action::target`].
    pub fn from_parts(name: &str, target: Option<u64>) -> Option<Self> {
        Some(match (name, target) {
            ("like", Some(id)) => Self::Like(id),
            ("open", Some(id)) => Self::OpenQuestion(id),
            ("close", Some(id)) => Self::CloseQuestion(id),
            ("open-section", Some(id)) => Self::OpenSection(id),
            ("close-section", Some(id)) => Self::CloseSection(id),
            ("answer", Some(id)) => Self::SetAnswer(id),
            ("refresh-question", Some(id)) => Self::RefreshQuestion(id),
            ("toggle-auto-refresh", None) => Self::ToggleAutoRefresh,
            _ => return None,
        })
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        match self.target() {
            Some(id) => write!(f, ":{id}"),
            None => Ok(()),
        }
    }
}

/// Elements that never have children nor a closing tag.
const VOID_TAGS: [&str; 3] = ["br", "hr", "input"];

#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, Option<String>)>,
    listeners: Vec<(Event, Action)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self { tag, attrs: Vec::new(), listeners: Vec::new(), children: Vec::new() }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, Some(value.into())));
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    /// Adds a valueless attribute such as `disabled` when the condition holds.
    pub fn flag(mut self, name: &'static str, enabled: bool) -> Self {
        if enabled {
            self.attrs.push((name, None));
        }
        self
    }

    pub fn on(mut self, event: Event, action: Action) -> Self {
        self.listeners.push((event, action));
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(key, _)| *key == name).and_then(|(_, value)| value.as_deref())
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.attrs.iter().any(|(key, _)| *key == name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class").is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn id(&self) -> Option<&str> {
        self.get_attr("id")
    }

    pub fn listeners(&self) -> &[(Event, Action)] {
        &self.listeners
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    /// Concatenation of every text node below this element, markup excluded.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    /// Every element below this one in document order, excluding itself.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        for child in &self.children {
            child.collect_elements(&mut out);
        }
        out
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attrs {
            match value {
                Some(value) => {
                    write!(f, " {name}=\"")?;
                    escape(f, value)?;
                    f.write_char('"')?;
                }
                None => write!(f, " {name}")?,
            }
        }
        for (event, action) in &self.listeners {
            write!(f, " data-on-{}=\"{action}\"", event.name())?;
        }
        f.write_char('>')?;

        if VOID_TAGS.contains(&self.tag) {
            return Ok(());
        }

        for child in &self.children {
            Display::fmt(child, f)?;
        }
        write!(f, "</{}>", self.tag)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Element(Element),
    /// Plain text, escaped on output.
    Text(String),
    /// Trusted markup supplied by the quiz server.
    Raw(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn find(&self, id: &str) -> Option<&Element> {
        let element = self.as_element()?;
        if element.id() == Some(id) {
            return Some(element);
        }
        element.children.iter().find_map(|child| child.find(id))
    }

    /// Swaps the subtree whose root carries the given `id` attribute.
    /// Returns `false` when no such subtree exists.
    pub fn replace(&mut self, id: &str, node: Node) -> bool {
        match self.find_node_mut(id) {
            Some(slot) => {
                *slot = node;
                true
            }
            None => false,
        }
    }

    fn find_node_mut(&mut self, id: &str) -> Option<&mut Node> {
        if matches!(self, Self::Element(element) if element.id() == Some(id)) {
            return Some(self);
        }
        match self {
            Self::Element(element) => element.children.iter_mut().find_map(|child| child.find_node_mut(id)),
            _ => None,
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Raw(_) => {}
            Self::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }

    fn collect_elements<'a>(&'a self, out: &mut Vec<&'a Element>) {
        if let Self::Element(element) = self {
            out.push(element);
            for child in &element.children {
                child.collect_elements(out);
            }
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(element) => Display::fmt(element, f),
            Self::Text(text) => escape(f, text),
            Self::Raw(markup) => f.write_str(markup),
        }
    }
}

fn escape(f: &mut Formatter<'_>, text: &str) -> fmt::Result {
    let mut rest = text;
    while let Some(pos) = rest.find(&['&', '<', '>', '"', '\''][..]) {
        let (head, tail) = rest.split_at(pos);
        f.write_str(head)?;
        let mut chars = tail.chars();
        f.write_str(match chars.next() {
            Some('&') => "&amp;",
            Some('<') => "&lt;",
            Some('>') => "&gt;",
            Some('"') => "&quot;",
            _ => "&#39;",
        })?;
        rest = chars.as_str();
    }
    f.write_str(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_text_and_attributes() {
        let node: Node = Element::new("p").attr("title", "\"x\" & y").text("<b>'hi'</b>").into();
        assert_eq!(node.to_string(), "<p title=\"&quot;x&quot; &amp; y\">&lt;b&gt;&#39;hi&#39;&lt;/b&gt;</p>");
    }

    #[test]
    fn raw_markup_is_untouched() {
        let node: Node = Element::new("div").child(Node::Raw(String::from("<i>ok</i>"))).into();
        assert_eq!(node.to_string(), "<div><i>ok</i></div>");
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let node: Node = Element::new("input").attr("type", "text").flag("disabled", true).flag("checked", false).into();
        assert_eq!(node.to_string(), "<input type=\"text\" disabled>");
    }

    #[test]
    fn listeners_serialize_as_data_attributes() {
        let node: Node = Element::new("button")
            .on(Event::Click, Action::Like(7))
            .on(Event::Submit, Action::ToggleAutoRefresh)
            .into();
        assert_eq!(
            node.to_string(),
            "<button data-on-click=\"like:7\" data-on-submit=\"toggle-auto-refresh\"></button>"
        );
    }

    #[test]
    fn action_names_round_trip() {
        for action in [
            Action::Like(1),
            Action::OpenQuestion(2),
            Action::CloseQuestion(3),
            Action::OpenSection(4),
            Action::CloseSection(5),
            Action::SetAnswer(6),
            Action::RefreshQuestion(7),
            Action::ToggleAutoRefresh,
        ] {
            assert_eq!(Action::from_parts(action.name(), action.target()), Some(action));
        }
        assert_eq!(Action::from_parts("like", None), None);
        assert_eq!(Action::from_parts("explode", Some(1)), None);
    }

    #[test]
    fn replaces_subtree_by_id() {
        let mut root: Node = Element::new("div")
            .attr("id", "root")
            .child(Element::new("p").attr("id", "a").text("old"))
            .child(Element::new("p").attr("id", "b").text("keep"))
            .into();

        assert!(root.replace("a", Element::new("p").attr("id", "a").text("new").into()));
        assert!(!root.replace("missing", Node::Text(String::from("x"))));
        assert_eq!(root.to_string(), "<div id=\"root\"><p id=\"a\">new</p><p id=\"b\">keep</p></div>");
        assert_eq!(root.find("b").map(Element::text_content).as_deref(), Some("keep"));
    }
}
