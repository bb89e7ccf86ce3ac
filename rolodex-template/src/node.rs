pub type Fragment = Vec<Node>;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, current)) => *current = value.to_string(),
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.retain(|(key, _)| key != name);
    }

    pub fn text(&self) -> String {
        text(&self.children)
    }

    pub fn find<F>(&self, predicate: F) -> Option<&Element>
    where
        F: Fn(&Element) -> bool + Copy,
    {
        find(&self.children, predicate)
    }

    pub fn find_all<F>(&self, predicate: F) -> Vec<&Element>
    where
        F: Fn(&Element) -> bool + Copy,
    {
        find_all(&self.children, predicate)
    }
}

/// Depth first search, the first match in document order.
pub fn find<F>(nodes: &[Node], predicate: F) -> Option<&Element>
where
    F: Fn(&Element) -> bool + Copy,
{
    for node in nodes {
        if let Node::Element(element) = node {
            if predicate(element) {
                return Some(element);
            }

            if let Some(found) = find(&element.children, predicate) {
                return Some(found);
            }
        }
    }
    None
}

pub fn find_all<F>(nodes: &[Node], predicate: F) -> Vec<&Element>
where
    F: Fn(&Element) -> bool + Copy,
{
    let mut result = Vec::new();
    for node in nodes {
        if let Node::Element(element) = node {
            if predicate(element) {
                result.push(element);
            }
            result.extend(find_all(&element.children, predicate));
        }
    }
    result
}

pub fn text(nodes: &[Node]) -> String {
    let mut result = String::new();
    for node in nodes {
        match node {
            Node::Element(element) => result.push_str(&element.text()),
            Node::Text(text) => result.push_str(text),
        }
    }
    result
}

pub fn to_html(nodes: &[Node]) -> String {
    let mut result = String::new();
    for node in nodes {
        write_node(&mut result, node);
    }
    result
}

fn write_node(result: &mut String, node: &Node) {
    match node {
        Node::Text(text) => result.push_str(&escape(text, false)),
        Node::Element(element) => {
            result.push('<');
            result.push_str(&element.name);
            for (key, value) in &element.attributes {
                result.push(' ');
                result.push_str(key);
                if !value.is_empty() {
                    result.push_str("=\"");
                    result.push_str(&escape(value, true));
                    result.push('"');
                }
            }
            result.push('>');

            if crate::markup::is_void(&element.name) {
                return;
            }

            for child in &element.children {
                write_node(result, child);
            }

            result.push_str("</");
            result.push_str(&element.name);
            result.push('>');
        }
    }
}

fn escape(value: &str, attribute: bool) -> String {
    let mut result = String::with_capacity(value.len());
    for char in value.chars() {
        match char {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if attribute => result.push_str("&quot;"),
            _ => result.push(char),
        }
    }
    result
}
