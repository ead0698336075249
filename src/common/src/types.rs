use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

/// Tri-state update field. Unlike `Option`, a missing key stays `None`
/// while an explicit value (including `null` via `Option<T>`) becomes
/// `Some`, so partial updates can tell "don't touch" from "set".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionalProperty<T> {
    None,
    Some(T),
}

impl<T> Default for OptionalProperty<T> {
    #[inline]
    fn default() -> OptionalProperty<T> {
        OptionalProperty::None
    }
}

impl<T> OptionalProperty<T> {
    pub fn insert(&mut self, v: T) {
        *self = OptionalProperty::Some(v)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, OptionalProperty::None)
    }

    pub fn into<X>(self) -> OptionalProperty<X>
    where T: Into<X> {
        match self {
            OptionalProperty::None => OptionalProperty::None,
            OptionalProperty::Some(v) => OptionalProperty::Some(v.into()),
        }
    }
}

impl<T> From<Option<T>> for OptionalProperty<T> {
    fn from(v: Option<T>) -> Self {
        match v {
            None => OptionalProperty::None,
            Some(v) => OptionalProperty::Some(v),
        }
    }
}

impl<T> Serialize for OptionalProperty<T>
where T: Serialize
{
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where S: Serializer {
        match self {
            OptionalProperty::None => serializer.serialize_none(),
            OptionalProperty::Some(v) => serializer.serialize_some(v),
        }
    }
}

impl<'de, T> Deserialize<'de> for OptionalProperty<T>
where T: Deserialize<'de>
{
    fn deserialize<D>(de: D) -> std::result::Result<Self, D::Error>
    where D: Deserializer<'de> {
        let a = Deserialize::deserialize(de);
        a.map(OptionalProperty::Some)
    }
}
