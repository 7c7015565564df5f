use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap, HashSet, LinkedList, VecDeque};
use std::hash::BuildHasher;

use serde_json::{Map, Value};

use crate::inspector::{Inspect, Inspector};

fn sequence<'a, T, I>(items: I, inspector: &mut Inspector) -> Value
where
    T: Inspect + ?Sized + 'a,
    I: IntoIterator<Item = &'a T>,
{
    Value::Array(items.into_iter().map(|item| inspector.inspect(item)).collect())
}

/// String keys are used verbatim; any other key uses its JSON text.
fn map_key<K: Inspect + ?Sized>(key: &K, inspector: &mut Inspector) -> String {
    match inspector.inspect(key) {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

fn mapping<'a, K, V, I>(entries: I, inspector: &mut Inspector) -> Value
where
    K: Inspect + ?Sized + 'a,
    V: Inspect + ?Sized + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    let mut record = Map::new();
    for (key, value) in entries {
        let key = map_key(key, inspector);
        let value = inspector.inspect(value);
        record.insert(key, value);
    }
    Value::Object(record)
}

impl<T: Inspect> Inspect for [T] {
    fn inspect(&self, inspector: &mut Inspector) -> Value {
        sequence(self, inspector)
    }
}

impl<T: Inspect, const N: usize> Inspect for [T; N] {
    fn inspect(&self, inspector: &mut Inspector) -> Value {
        sequence(self, inspector)
    }
}

impl<T: Inspect> Inspect for Vec<T> {
    fn inspect(&self, inspector: &mut Inspector) -> Value {
        sequence(self, inspector)
    }
}

impl<T: Inspect> Inspect for VecDeque<T> {
    fn inspect(&self, inspector: &mut Inspector) -> Value {
        sequence(self, inspector)
    }
}

impl<T: Inspect> Inspect for LinkedList<T> {
    fn inspect(&self, inspector: &mut Inspector) -> Value {
        sequence(self, inspector)
    }
}

impl<T: Inspect + Ord> Inspect for BinaryHeap<T> {
    fn inspect(&self, inspector: &mut Inspector) -> Value {
        sequence(self, inspector)
    }
}

impl<T: Inspect, S: BuildHasher> Inspect for HashSet<T, S> {
    fn inspect(&self, inspector: &mut Inspector) -> Value {
        sequence(self, inspector)
    }
}

impl<T: Inspect> Inspect for BTreeSet<T> {
    fn inspect(&self, inspector: &mut Inspector) -> Value {
        sequence(self, inspector)
    }
}

impl<K: Inspect, V: Inspect, S: BuildHasher> Inspect for HashMap<K, V, S> {
    const AGGREGATE: bool = true;

    fn inspect(&self, inspector: &mut Inspector) -> Value {
        mapping(self, inspector)
    }
}

impl<K: Inspect, V: Inspect> Inspect for BTreeMap<K, V> {
    const AGGREGATE: bool = true;

    fn inspect(&self, inspector: &mut Inspector) -> Value {
        mapping(self, inspector)
    }
}

macro_rules! inspect_tuple {
    ($(($($name:ident . $index:tt),+)),* $(,)?) => {
        $(
            impl<$($name: Inspect),+> Inspect for ($($name,)+) {
                fn inspect(&self, inspector: &mut Inspector) -> Value {
                    Value::Array(vec![$(inspector.inspect(&self.$index)),+])
                }
            }
        )*
    };
}

inspect_tuple!(
    (A.0),
    (A.0, B.1),
    (A.0, B.1, C.2),
    (A.0, B.1, C.2, D.3),
    (A.0, B.1, C.2, D.3, E.4),
    (A.0, B.1, C.2, D.3, E.4, F.5),
    (A.0, B.1, C.2, D.3, E.4, F.5, G.6),
    (A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7),
);

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use crate::inspect;
    use serde_json::json;

    #[test]
    fn empty_collections_stay_empty() {
        assert_eq!(inspect(&Vec::<u8>::new()), json!([]));
        assert_eq!(inspect(&HashMap::<String, u8>::new()), json!({}));
        assert_eq!(inspect(&None::<Vec<u8>>), json!(null));
    }

    #[test]
    fn non_string_keys_use_json_text() {
        let mut scores = BTreeMap::new();
        scores.insert(1_u8, "one");
        scores.insert(2_u8, "two");
        assert_eq!(inspect(&scores), json!({"1": "one", "2": "two"}));
    }

    #[test]
    fn tuples_and_arrays_render_as_arrays() {
        assert_eq!(inspect(&(1, "a", true)), json!([1, "a", true]));
        assert_eq!(inspect(&[1.5_f64, 2.5]), json!([1.5, 2.5]));
    }

    #[test]
    fn nested_maps_keep_structure() {
        let mut inner = HashMap::new();
        inner.insert("c", 2);
        let mut outer: HashMap<&str, serde_json::Value> = HashMap::new();
        outer.insert("a", json!(1));
        outer.insert("b", crate::inspect(&inner));
        assert_eq!(inspect(&outer), json!({"a": 1, "b": {"c": 2}}));
    }
}
