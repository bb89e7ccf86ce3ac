use crate::{
    directive::{Binding, Directive},
    error::TemplateError,
    markup::{Segment, TemplateNode},
    node::{Element, Fragment, Node},
    Catalog,
};

pub fn directive(
    catalog: &Catalog,
    default: &str,
    directive: &Directive,
) -> Result<Fragment, TemplateError> {
    let name = if directive.template.is_empty() {
        default
    } else {
        directive.template.as_str()
    };

    let template = match catalog.get(name) {
        Some(it) => it,
        None => {
            tracing::error!("template is missing: {:?}", name);
            return Err(TemplateError::Missing(name.to_string()));
        }
    };

    nodes(catalog, default, &template.nodes, directive)
}

fn nodes(
    catalog: &Catalog,
    default: &str,
    template_nodes: &[TemplateNode],
    scope: &Directive,
) -> Result<Fragment, TemplateError> {
    let mut result = Vec::new();
    for template_node in template_nodes {
        match template_node {
            TemplateNode::Element {
                name,
                attributes,
                children,
            } => {
                let mut element = Element::new(name);
                for (key, segments) in attributes {
                    if let Some(value) = attribute(segments, scope) {
                        element.attributes.push((key.clone(), value));
                    }
                }
                element.children = nodes(catalog, default, children, scope)?;
                result.push(Node::Element(element));
            }
            TemplateNode::Text(segments) => {
                result.extend(text(catalog, default, segments, scope)?);
            }
        }
    }
    Ok(result)
}

fn text(
    catalog: &Catalog,
    default: &str,
    segments: &[Segment],
    scope: &Directive,
) -> Result<Fragment, TemplateError> {
    let mut result = Vec::new();
    let mut buffer = String::new();
    for segment in segments {
        let path = match segment {
            Segment::Literal(literal) => {
                buffer.push_str(literal);
                continue;
            }
            Segment::Placeholder(path) => path,
        };

        match scope.lookup(path) {
            Some(Binding::Text(value)) => buffer.push_str(value),
            Some(Binding::Flag(value)) => buffer.push_str(&value.to_string()),
            Some(Binding::Directive(nested)) => {
                flush(&mut result, &mut buffer);
                result.extend(directive(catalog, default, nested)?);
            }
            Some(Binding::List(items)) => {
                flush(&mut result, &mut buffer);
                for item in items {
                    result.extend(directive(catalog, default, item)?);
                }
            }
            Some(Binding::Absent) | None => {}
        }
    }
    flush(&mut result, &mut buffer);

    Ok(result)
}

fn flush(result: &mut Fragment, buffer: &mut String) {
    if !buffer.is_empty() {
        result.push(Node::Text(std::mem::take(buffer)));
    }
}

fn attribute(segments: &[Segment], scope: &Directive) -> Option<String> {
    if let [Segment::Placeholder(path)] = segments {
        return match scope.lookup(path) {
            Some(Binding::Text(value)) => Some(value.clone()),
            Some(Binding::Flag(true)) => Some(String::new()),
            Some(Binding::Flag(false)) | Some(Binding::Absent) | None => None,
            Some(Binding::Directive(_)) | Some(Binding::List(_)) => {
                tracing::trace!("structured binding used as attribute: {:?}", path);
                None
            }
        };
    }

    let mut value = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(literal) => value.push_str(literal),
            Segment::Placeholder(path) => match scope.lookup(path) {
                Some(Binding::Text(text)) => value.push_str(text),
                Some(Binding::Flag(flag)) => value.push_str(&flag.to_string()),
                _ => {}
            },
        }
    }
    Some(value)
}
