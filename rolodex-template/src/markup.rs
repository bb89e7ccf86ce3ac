use std::collections::BTreeSet;

use crate::error::TemplateError;

const VOID_ELEMENTS: [&str; 6] = ["br", "hr", "img", "input", "link", "meta"];

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Template {
    pub name: String,
    pub nodes: Vec<TemplateNode>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TemplateNode {
    Element {
        name: String,
        attributes: Vec<(String, Vec<Segment>)>,
        children: Vec<TemplateNode>,
    },
    Text(Vec<Segment>),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Segment {
    Literal(String),
    Placeholder(String),
}

impl Template {
    pub fn placeholders(&self) -> BTreeSet<String> {
        let mut result = BTreeSet::new();
        collect_placeholders(&self.nodes, &mut result);
        result
    }
}

fn collect_placeholders(nodes: &[TemplateNode], result: &mut BTreeSet<String>) {
    for node in nodes {
        match node {
            TemplateNode::Element {
                attributes,
                children,
                ..
            } => {
                for (_, segments) in attributes {
                    collect_segments(segments, result);
                }
                collect_placeholders(children, result);
            }
            TemplateNode::Text(segments) => collect_segments(segments, result),
        }
    }
}

fn collect_segments(segments: &[Segment], result: &mut BTreeSet<String>) {
    for segment in segments {
        if let Segment::Placeholder(path) = segment {
            result.insert(path.clone());
        }
    }
}

pub fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name.to_ascii_lowercase().as_str())
}

pub fn parse_catalog(source: &str) -> Result<Vec<Template>, TemplateError> {
    let mut parser = Parser::new(source);
    let mut templates = Vec::new();
    loop {
        parser.skip_whitespace();
        if parser.skip_comment()? {
            continue;
        }

        if parser.is_eof() {
            break;
        }

        let line = parser.line();
        if !parser.rest().starts_with("<template") {
            return Err(parser.error("expected <template>"));
        }

        match parser.parse_element()? {
            TemplateNode::Element {
                name,
                attributes,
                children,
            } => {
                if name != "template" {
                    return Err(TemplateError::Syntax {
                        line,
                        message: format!("expected <template>, found <{}>", name),
                    });
                }

                let name = attributes.iter().find_map(|(key, value)| match value.as_slice() {
                    [Segment::Literal(id)] if key == "id" => Some(id.clone()),
                    _ => None,
                });

                match name {
                    Some(name) => templates.push(Template {
                        name,
                        nodes: children,
                    }),
                    None => {
                        return Err(TemplateError::Syntax {
                            line,
                            message: "template without literal id".to_string(),
                        })
                    }
                }
            }
            TemplateNode::Text(_) => return Err(parser.error("expected <template>")),
        }
    }

    tracing::trace!("parsed {} templates", templates.len());

    Ok(templates)
}

struct Parser<'a> {
    source: &'a str,
    position: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.position..]
    }

    fn is_eof(&self) -> bool {
        self.position >= self.source.len()
    }

    fn line(&self) -> usize {
        self.source[..self.position].matches('\n').count() + 1
    }

    fn error(&self, message: &str) -> TemplateError {
        TemplateError::Syntax {
            line: self.line(),
            message: message.to_string(),
        }
    }

    fn advance(&mut self, bytes: usize) {
        self.position = (self.position + bytes).min(self.source.len());
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.advance(rest.len() - trimmed.len());
    }

    fn skip_comment(&mut self) -> Result<bool, TemplateError> {
        if !self.rest().starts_with("<!--") {
            return Ok(false);
        }

        match self.rest().find("-->") {
            Some(end) => {
                self.advance(end + 3);
                Ok(true)
            }
            None => Err(self.error("unclosed comment")),
        }
    }

    fn read_name(&mut self) -> &'a str {
        let rest = self.rest();
        let length = rest
            .find(|c: char| c.is_whitespace() || "=<>/\"'".contains(c))
            .unwrap_or(rest.len());

        self.advance(length);
        &rest[..length]
    }

    fn parse_nodes(&mut self, closing: Option<&str>) -> Result<Vec<TemplateNode>, TemplateError> {
        let mut nodes = Vec::new();
        loop {
            if self.is_eof() {
                return match closing {
                    Some(name) => Err(self.error(&format!("unclosed <{}>", name))),
                    None => Ok(nodes),
                };
            }

            if self.skip_comment()? {
                continue;
            }

            let rest = self.rest();
            if rest.starts_with("</") {
                self.advance(2);
                let name = self.read_name();
                self.skip_whitespace();
                if !self.rest().starts_with('>') {
                    return Err(self.error("malformed closing tag"));
                }
                self.advance(1);

                return match closing {
                    Some(expected) if expected.eq_ignore_ascii_case(name) => Ok(nodes),
                    _ => Err(self.error(&format!("unexpected </{}>", name))),
                };
            }

            if rest.starts_with('<') {
                nodes.push(self.parse_element()?);
                continue;
            }

            let length = rest.find('<').unwrap_or(rest.len());
            let text = trim_layout(&rest[..length]);
            if !text.trim().is_empty() {
                nodes.push(TemplateNode::Text(self.parse_segments(text)?));
            }
            self.advance(length);
        }
    }

    fn parse_element(&mut self) -> Result<TemplateNode, TemplateError> {
        self.advance(1);
        let name = self.read_name().to_string();
        if name.is_empty() {
            return Err(self.error("element without name"));
        }

        let mut attributes = Vec::new();
        let mut self_closing = false;
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.is_empty() {
                return Err(self.error(&format!("unclosed start tag <{}>", name)));
            }

            if rest.starts_with("/>") {
                self.advance(2);
                self_closing = true;
                break;
            }

            if rest.starts_with('>') {
                self.advance(1);
                break;
            }

            let key = self.read_name().to_string();
            if key.is_empty() {
                return Err(self.error(&format!("invalid attribute in <{}>", name)));
            }

            self.skip_whitespace();
            let value = if self.rest().starts_with('=') {
                self.advance(1);
                self.skip_whitespace();
                self.read_attribute_value()?
            } else {
                ""
            };

            let segments = if value.is_empty() {
                Vec::new()
            } else {
                self.parse_segments(value)?
            };
            attributes.push((key, segments));
        }

        let children = if self_closing || is_void(&name) {
            Vec::new()
        } else {
            self.parse_nodes(Some(&name))?
        };

        Ok(TemplateNode::Element {
            name,
            attributes,
            children,
        })
    }

    fn read_attribute_value(&mut self) -> Result<&'a str, TemplateError> {
        let rest = self.rest();
        match rest.chars().next() {
            Some(quote) if quote == '"' || quote == '\'' => match rest[1..].find(quote) {
                Some(end) => {
                    self.advance(end + 2);
                    Ok(&rest[1..end + 1])
                }
                None => Err(self.error("unclosed attribute value")),
            },
            _ => {
                let length = rest
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                self.advance(length);
                Ok(&rest[..length])
            }
        }
    }

    fn parse_segments(&self, text: &str) -> Result<Vec<Segment>, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = text;
        while let Some(start) = rest.find("${") {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }

            let after = &rest[start + 2..];
            let end = match after.find('}') {
                Some(end) => end,
                None => return Err(self.error("unclosed placeholder")),
            };

            let path = after[..end].trim();
            if path.is_empty() {
                return Err(self.error("empty placeholder"));
            }

            segments.push(Segment::Placeholder(path.to_string()));
            rest = &after[end + 1..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(segments)
    }
}

/// Strips leading and trailing whitespace runs that contain a line break.
fn trim_layout(text: &str) -> &str {
    let start = text.len() - text.trim_start().len();
    let text = if text[..start].contains('\n') {
        &text[start..]
    } else {
        text
    };

    let end = text.trim_end().len();
    if text[end..].contains('\n') {
        &text[..end]
    } else {
        text
    }
}
