use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Directive {
    pub template: String,
    pub bindings: BTreeMap<String, Binding>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Binding {
    #[default]
    Absent,
    Directive(Box<Directive>),
    Flag(bool),
    List(Vec<Directive>),
    Text(String),
}

impl Directive {
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
            bindings: BTreeMap::new(),
        }
    }

    /// Directive for the caller's own template.
    pub fn own() -> Self {
        Self::new("")
    }

    pub fn with(mut self, key: &str, binding: impl Into<Binding>) -> Self {
        self.bindings.insert(key.to_string(), binding.into());
        self
    }

    pub fn set(&mut self, key: &str, binding: impl Into<Binding>) {
        self.bindings.insert(key.to_string(), binding.into());
    }

    /// Resolves a dot separated path through nested directive bindings.
    pub fn lookup(&self, path: &str) -> Option<&Binding> {
        let mut segments = path.split('.');
        let mut current = self.bindings.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Binding::Directive(nested) => nested.bindings.get(segment)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

impl From<Directive> for Binding {
    fn from(value: Directive) -> Self {
        Binding::Directive(Box::new(value))
    }
}

impl From<Option<Directive>> for Binding {
    fn from(value: Option<Directive>) -> Self {
        match value {
            Some(directive) => Binding::Directive(Box::new(directive)),
            None => Binding::Absent,
        }
    }
}

impl From<Vec<Directive>> for Binding {
    fn from(value: Vec<Directive>) -> Self {
        Binding::List(value)
    }
}

impl From<bool> for Binding {
    fn from(value: bool) -> Self {
        Binding::Flag(value)
    }
}

impl From<&str> for Binding {
    fn from(value: &str) -> Self {
        Binding::Text(value.to_string())
    }
}

impl From<String> for Binding {
    fn from(value: String) -> Self {
        Binding::Text(value)
    }
}

impl From<Option<String>> for Binding {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(text) => Binding::Text(text),
            None => Binding::Absent,
        }
    }
}

impl From<Option<&str>> for Binding {
    fn from(value: Option<&str>) -> Self {
        value.map(|text| text.to_string()).into()
    }
}
