use std::collections::HashMap;

use directive::Directive;
use error::TemplateError;
use markup::Template;
use node::Fragment;

pub mod directive;
pub mod error;
mod interpolate;
pub mod markup;
pub mod node;

/// Named templates the interpolator resolves directives against.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    templates: HashMap<String, Template>,
}

impl Catalog {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let templates = markup::parse_catalog(source)?
            .into_iter()
            .map(|template| (template.name.clone(), template))
            .collect();

        Ok(Self { templates })
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.templates.keys().map(|name| name.as_str()).collect();
        names.sort();
        names
    }

    /// Builds a detached fragment for the directive. An empty template name
    /// resolves to `default`, the caller's own template. `None` renders
    /// nothing.
    pub fn interpolate(
        &self,
        default: &str,
        directive: Option<&Directive>,
    ) -> Result<Fragment, TemplateError> {
        match directive {
            Some(directive) => interpolate::directive(self, default, directive),
            None => Ok(Vec::new()),
        }
    }
}
