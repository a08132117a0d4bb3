use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;

use crate::codec::value::{Complex, CompositeValue, MessageValue, Value};

/// Conversion of native Rust values into the host [`Value`] model.
///
/// Integers up to 64 bits become [`Value::Int`] unless they overflow `i64`,
/// `i128` always becomes [`Value::Long`], tuples keep their fixed arity, and
/// vectors and arrays become variable-length lists.
pub trait IntoValue {
	/// Convert `self` into a host value.
	fn into_value(self) -> Value;
}

impl IntoValue for Value {
	fn into_value(self) -> Value {
		self
	}
}

impl IntoValue for bool {
	fn into_value(self) -> Value {
		Value::Bool(self)
	}
}

macro_rules! int_into_value {
	($($ty:ty),*) => {
		$(impl IntoValue for $ty {
			fn into_value(self) -> Value {
				Value::Int(i64::from(self))
			}
		})*
	};
}

int_into_value!(i8, i16, i32, i64, u8, u16, u32);

impl IntoValue for u64 {
	fn into_value(self) -> Value {
		match i64::try_from(self) {
			Ok(value) => Value::Int(value),
			Err(_) => Value::Long(i128::from(self)),
		}
	}
}

impl IntoValue for usize {
	fn into_value(self) -> Value {
		(self as u64).into_value()
	}
}

impl IntoValue for i128 {
	fn into_value(self) -> Value {
		Value::Long(self)
	}
}

impl IntoValue for f32 {
	fn into_value(self) -> Value {
		Value::Float(f64::from(self))
	}
}

impl IntoValue for f64 {
	fn into_value(self) -> Value {
		Value::Float(self)
	}
}

impl IntoValue for Complex {
	fn into_value(self) -> Value {
		Value::Complex(self)
	}
}

impl IntoValue for String {
	fn into_value(self) -> Value {
		Value::Str(self)
	}
}

impl IntoValue for &str {
	fn into_value(self) -> Value {
		Value::Str(self.to_owned())
	}
}

impl IntoValue for CompositeValue {
	fn into_value(self) -> Value {
		Value::Composite(self)
	}
}

impl IntoValue for MessageValue {
	fn into_value(self) -> Value {
		Value::Message(self)
	}
}

impl<T: IntoValue> IntoValue for Option<T> {
	fn into_value(self) -> Value {
		self.map_or(Value::Null, IntoValue::into_value)
	}
}

impl<T: IntoValue> IntoValue for Vec<T> {
	fn into_value(self) -> Value {
		Value::List(self.into_iter().map(IntoValue::into_value).collect())
	}
}

impl<T: IntoValue, const N: usize> IntoValue for [T; N] {
	fn into_value(self) -> Value {
		Value::List(self.into_iter().map(IntoValue::into_value).collect())
	}
}

impl<K: Into<String>, V: IntoValue> IntoValue for IndexMap<K, V> {
	fn into_value(self) -> Value {
		Value::Map(self.into_iter().map(|(key, value)| (key.into(), value.into_value())).collect())
	}
}

impl<K: Into<String> + Ord, V: IntoValue> IntoValue for BTreeMap<K, V> {
	fn into_value(self) -> Value {
		Value::Map(self.into_iter().map(|(key, value)| (key.into(), value.into_value())).collect())
	}
}

impl<K: Into<String>, V: IntoValue, S> IntoValue for HashMap<K, V, S> {
	fn into_value(self) -> Value {
		Value::Map(self.into_iter().map(|(key, value)| (key.into(), value.into_value())).collect())
	}
}

macro_rules! tuple_into_value {
	($($name:ident),+) => {
		impl<$($name: IntoValue),+> IntoValue for ($($name,)+) {
			#[allow(non_snake_case)]
			fn into_value(self) -> Value {
				let ($($name,)+) = self;
				Value::Tuple(vec![$($name.into_value()),+])
			}
		}
	};
}

tuple_into_value!(A);
tuple_into_value!(A, B);
tuple_into_value!(A, B, C);
tuple_into_value!(A, B, C, D);
tuple_into_value!(A, B, C, D, E);
tuple_into_value!(A, B, C, D, E, F);

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;

	use super::IntoValue;
	use crate::codec::Value;

	#[test]
	fn u64_overflowing_i64_becomes_long() {
		assert_eq!(7_u64.into_value(), Value::Int(7));
		assert_eq!(u64::MAX.into_value(), Value::Long(i128::from(u64::MAX)));
	}

	#[test]
	fn tuples_keep_arity_and_vectors_become_lists() {
		assert_eq!((1, "a").into_value(), Value::Tuple(vec![Value::Int(1), Value::Str("a".to_owned())]));
		assert_eq!(vec![1.5_f64].into_value(), Value::List(vec![Value::Float(1.5)]));
	}

	#[test]
	fn btree_map_keeps_sorted_key_order() {
		let mut map = BTreeMap::new();
		map.insert("b", Some(2));
		map.insert("a", None);
		let Value::Map(items) = map.into_value() else {
			panic!("expected map");
		};
		let keys: Vec<&str> = items.keys().map(String::as_str).collect();
		assert_eq!(keys, ["a", "b"]);
	}
}
