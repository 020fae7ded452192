use std::borrow::Cow;

use hashlink::LinkedHashMap;
use saphyr::{Scalar, Yaml};

pub(crate) type YamlMap<'y> = LinkedHashMap<Yaml<'y>, Yaml<'y>>;

pub(crate) fn field<'a, 'y>(map: &'a YamlMap<'y>, key: &'static str) -> Option<&'a Yaml<'y>> {
    map.get(&Yaml::Value(Scalar::String(Cow::Borrowed(key))))
}

/// Reads a scalar as text. Integers are accepted and rendered in decimal.
pub(crate) fn text(yaml: &Yaml) -> Option<String> {
    yaml.as_str()
        .map(str::to_string)
        .or_else(|| yaml.as_integer().map(|n| n.to_string()))
}

pub(crate) fn text_list(yaml: &Yaml) -> Option<Vec<String>> {
    yaml.as_sequence()?.iter().map(text).collect()
}

pub(crate) fn index(yaml: &Yaml) -> Option<usize> {
    yaml.as_integer().and_then(|n| usize::try_from(n).ok())
}

pub(crate) fn index_list(yaml: &Yaml) -> Option<Vec<usize>> {
    yaml.as_sequence()?.iter().map(index).collect()
}
