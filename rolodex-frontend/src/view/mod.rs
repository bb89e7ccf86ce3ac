use rolodex_template::{
    directive::Directive,
    node::{self, Fragment, Node},
};

use crate::{
    error::AppError,
    model::Model,
    outlet::{OutletId, Outlets, RenderContext},
    slot::Slot,
};

/// Interpolates the document from the current entry. Regions render only
/// after every slot change of the update is applied.
pub fn render_model(model: &mut Model) -> Result<(), AppError> {
    let route = model.store.route();
    let entry = model.store.read();
    let search = model.search.typed.as_deref();

    let details: Vec<Directive> = Outlets::DETAILS
        .iter()
        .filter_map(|id| model.outlets.get(*id))
        .filter_map(|outlet| {
            outlet.render(&RenderContext {
                route: &route,
                entry: &entry,
                phase: &outlet.phase,
                search,
                details: Vec::new(),
                details_loading: false,
            })
        })
        .collect();

    let details_loading = model.outlets.is_loading(OutletId::Contact)
        || model.outlets.is_loading(OutletId::EditContact);

    let mut regions = Vec::new();
    let mut details = Some(details);
    for id in Outlets::TOP_LEVEL {
        let directive = model.outlets.get(id).and_then(|outlet| {
            let details = if id == OutletId::Sidebar {
                details.take().unwrap_or_default()
            } else {
                Vec::new()
            };

            outlet.render(&RenderContext {
                route: &route,
                entry: &entry,
                phase: &outlet.phase,
                search,
                details,
                details_loading,
            })
        });
        regions.push((id, directive));
    }

    let mut app = Directive::new("app").with(
        "loading",
        model
            .splash
            .map(|slot| Directive::new("splash").with("slot", slot.as_str())),
    );

    for (id, directive) in regions {
        app.set(id.name(), directive);
    }

    model.document = model.catalog.interpolate("app", Some(&app))?;

    Ok(())
}

/// The document as projected: regions waiting in `new-content` are left out.
pub fn visible(nodes: &[Node]) -> Fragment {
    let mut result = Vec::new();
    for node in nodes {
        match node {
            Node::Element(element) => {
                if element.attribute("slot") == Some(Slot::NewContent.as_str()) {
                    continue;
                }

                let mut element = element.clone();
                element.children = visible(&element.children);
                result.push(Node::Element(element));
            }
            Node::Text(_) => result.push(node.clone()),
        }
    }
    result
}

pub fn html(model: &Model) -> String {
    node::to_html(&visible(&model.document))
}
