use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// The whole persisted state of a go2redirector instance.
///
/// Only `Lists` and `Links` are interpreted.  Other top-level properties such
/// as `Variables` and `NextLinkID` are kept as they are.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Database {
    #[serde(rename = "Lists")]
    pub lists: IndexMap<String, List>,
    #[serde(rename = "Links")]
    pub links: IndexMap<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Database {
    pub fn from_slice(data: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(data)
    }

    pub fn to_vec(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// A list of links.
///
/// The JSON object is kept as it is so that the order of its properties is
/// preserved when it's saved again.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct List(Map<String, Value>);

impl List {
    const TAG_BINDINGS: &'static str = "TagBindings";

    /// Returns the `TagBindings` object of the list.
    ///
    /// `Ok(None)` is returned if the list has no bindings, which is the case
    /// when the property is missing or `null`.
    pub fn tag_bindings(&self) -> Result<Option<&Map<String, Value>>, String> {
        match self.0.get(Self::TAG_BINDINGS) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(bindings)) => Ok(Some(bindings)),
            Some(v) => Err(format!("{} must be an object: {v}", Self::TAG_BINDINGS)),
        }
    }

    pub fn tag_bindings_mut(&mut self) -> Result<Option<&mut Map<String, Value>>, String> {
        match self.0.get_mut(Self::TAG_BINDINGS) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(bindings)) => Ok(Some(bindings)),
            Some(v) => Err(format!("{} must be an object: {v}", Self::TAG_BINDINGS)),
        }
    }
}

/// Tags bound to a link in a list.
///
/// Older versions of go2redirector bound a single tag to a link.  `null` is
/// written by the current version for a link decoupled without any tag.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    Tags(Vec<String>),
    Legacy(String),
    Unset,
}

impl TagValue {
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }

    pub fn into_tags(self) -> Vec<String> {
        match self {
            Self::Tags(tags) => tags,
            Self::Legacy(tag) => vec![tag],
            Self::Unset => vec![],
        }
    }
}

impl TryFrom<&Value> for TagValue {
    type Error = serde_json::Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        TagValue::deserialize(value)
    }
}
