use super::argument::Argument;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One link of a shorthand chain: a name plus its arguments.
///
/// `string:100` parses to `Method { name: "string", arguments: [100] }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub arguments: Vec<Argument>,
}

impl Method {
    pub fn new(name: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// A method without arguments
    pub fn bare(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Parse a single `name:arg1,arg2` token
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        match split_once_outside_quotes(token, ':') {
            Some((name, rest)) if !rest.trim().is_empty() => {
                let arguments = split_outside_quotes(rest, |c| c == ',')
                    .iter()
                    .map(|raw| Argument::parse(raw))
                    .collect();
                Self::new(name.trim(), arguments)
            }
            Some((name, _)) => Self::bare(name.trim()),
            None => Self::bare(token),
        }
    }

    pub fn argument(&self, index: usize) -> Option<&Argument> {
        self.arguments.get(index)
    }

    /// Value of the argument at `index`, treating null arguments as absent
    pub fn value(&self, index: usize) -> Option<&str> {
        self.arguments
            .get(index)
            .filter(|argument| !argument.is_null())
            .map(Argument::as_str)
    }

    pub fn first_non_null(&self) -> Option<&Argument> {
        self.arguments.iter().find(|argument| !argument.is_null())
    }

    pub fn has_arguments(&self) -> bool {
        !self.arguments.is_empty()
    }

    /// Call form, e.g. `string('name', 100)`
    pub fn render(&self) -> String {
        let arguments = self
            .arguments
            .iter()
            .map(Argument::render)
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", self.name, arguments)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// An ordered method chain parsed from one declaration line.
///
/// Order is significant: it is the call-chain order in the emitted code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Call {
    methods: Vec<Method>,
}

impl Call {
    pub fn new(methods: Vec<Method>) -> Self {
        Self { methods }
    }

    /// Parse a whole line such as `belongsTo:User,user_id nullable index`
    pub fn parse(line: &str) -> Self {
        let methods = split_outside_quotes(line, char::is_whitespace)
            .iter()
            .filter(|token| !token.is_empty())
            .map(|token| Method::parse(token))
            .collect();
        Self { methods }
    }

    pub fn first(&self) -> Option<&Method> {
        self.methods.first()
    }

    /// Name of the leading method
    pub fn name(&self) -> Option<&str> {
        self.methods.first().map(|method| method.name.as_str())
    }

    pub fn find(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|method| method.name == name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Number of methods called `name`
    pub fn count(&self, name: &str) -> usize {
        self.methods.iter().filter(|method| method.name == name).count()
    }

    /// Remove the first method called `name`. Later repeats stay in the chain.
    pub fn remove(&mut self, name: &str) -> Option<Method> {
        let position = self.methods.iter().position(|method| method.name == name)?;
        Some(self.methods.remove(position))
    }

    /// Split off every method whose name is in `names`, keeping order on both sides
    pub fn extract(&mut self, names: &[&str]) -> Call {
        let (taken, kept): (Vec<Method>, Vec<Method>) = std::mem::take(&mut self.methods)
            .into_iter()
            .partition(|method| names.contains(&method.name.as_str()));
        self.methods = kept;
        Call::new(taken)
    }

    /// Chain without its leading method
    pub fn tail(&self) -> Call {
        Call::new(self.methods.iter().skip(1).cloned().collect())
    }

    pub fn push(&mut self, method: Method) {
        self.methods.push(method);
    }

    pub fn extend(&mut self, other: Call) {
        self.methods.extend(other.methods);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Method> {
        self.methods.iter()
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Chained call form, e.g. `->string('name')->nullable()`
    pub fn render(&self) -> String {
        self.methods
            .iter()
            .map(|method| format!("->{}", method.render()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Call {
    type Item = &'a Method;
    type IntoIter = std::slice::Iter<'a, Method>;

    fn into_iter(self) -> Self::IntoIter {
        self.methods.iter()
    }
}

impl From<Vec<Method>> for Call {
    fn from(methods: Vec<Method>) -> Self {
        Self::new(methods)
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn split_outside_quotes(input: &str, is_separator: impl Fn(char) -> bool) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(q) if c == q => {
                quote = None;
                current.push(c);
            }
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                current.push(c);
            }
            None if is_separator(c) => parts.push(std::mem::take(&mut current)),
            None => current.push(c),
        }
    }
    parts.push(current);

    parts
}

fn split_once_outside_quotes(input: &str, separator: char) -> Option<(&str, &str)> {
    let mut quote: Option<char> = None;

    for (i, c) in input.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == separator => return Some((&input[..i], &input[i + c.len_utf8()..])),
            None => {}
        }
    }

    None
}
