use serde::Serialize;
use serde::ser::SerializeStruct;
use shellkit_grammar::Param;

/// One matched parameter and its accepted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg<'g> {
    param: &'g Param,
    value: String,
}

impl<'g> Arg<'g> {
    /// The grammar node this value was matched against.
    pub fn param(&self) -> &'g Param {
        self.param
    }

    /// Parameter name.
    pub fn name(&self) -> &'g str {
        &self.param.name
    }

    /// Accepted (possibly transformed) value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Serialize for Arg<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Arg", 3)?;
        s.serialize_field("name", &self.param.name)?;
        s.serialize_field("value", &self.value)?;
        s.serialize_field("help", &self.param.help)?;
        s.end()
    }
}

/// Ordered result of one match: `(parameter, value)` entries in match order.
///
/// A parameter name occurs at most once; inserting a name that is already
/// present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Pargv<'g> {
    args: Vec<Arg<'g>>,
}

impl<'g> Pargv<'g> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `param = value`, or update the value if `param.name` is present.
    pub fn insert(&mut self, param: &'g Param, value: impl Into<String>) {
        let value = value.into();
        match self.args.iter_mut().find(|a| a.param.name == param.name) {
            Some(existing) => {
                existing.param = param;
                existing.value = value;
            }
            None => self.args.push(Arg { param, value }),
        }
    }

    /// First entry named `name`.
    pub fn find(&self, name: &str) -> Option<&Arg<'g>> {
        self.args.iter().find(|a| a.param.name == name)
    }

    /// Value of the entry named `name`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.find(name).map(Arg::value)
    }

    /// Whether an entry named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Entries in match order.
    pub fn iter(&self) -> impl Iterator<Item = &Arg<'g>> {
        self.args.iter()
    }

    /// Entry names in match order.
    pub fn names(&self) -> impl Iterator<Item = &'g str> + '_ {
        self.args.iter().map(Arg::name)
    }
}

impl<'a, 'g> IntoIterator for &'a Pargv<'g> {
    type Item = &'a Arg<'g>;
    type IntoIter = std::slice::Iter<'a, Arg<'g>>;

    fn into_iter(self) -> Self::IntoIter {
        self.args.iter()
    }
}
