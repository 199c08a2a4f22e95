//! Order-preserving query string representation.

/// Ordered list of query parameters.
///
/// Pairs serialize onto the URL in exactly the order they were appended, and duplicate
/// keys are kept as-is. The API gateway treats parameter order as significant for some
/// endpoints, so a hash map is deliberately not used here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query(Vec<(String, String)>);
impl Query {
	/// Creates an empty query.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends one key-value pair, preserving insertion order.
	pub fn pair<K, V>(mut self, key: K, value: V) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		self.0.push((key.into(), value.into()));

		self
	}

	/// Returns the number of pairs.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true when no pairs have been appended.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates the pairs in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}
}
impl<K, V> FromIterator<(K, V)> for Query
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}

/// Conversion into a [`Query`] for request parameter types.
pub trait AsQuery {
	/// Renders this value as an ordered query.
	fn as_query(&self) -> Query;
}
impl AsQuery for Query {
	fn as_query(&self) -> Query {
		self.clone()
	}
}
impl<Q> AsQuery for &Q
where
	Q: ?Sized + AsQuery,
{
	fn as_query(&self) -> Query {
		(*self).as_query()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn pairs_keep_insertion_order() {
		let query = Query::new().pair("b", "2").pair("a", "1").pair("c", "3");

		assert_eq!(
			query.iter().collect::<Vec<_>>(),
			[("b", "2"), ("a", "1"), ("c", "3")],
			"Pairs must come back in append order, not sorted."
		);
	}

	#[test]
	fn duplicate_keys_are_preserved() {
		let query = Query::new().pair("id", "1").pair("id", "2");

		assert_eq!(query.len(), 2);
		assert_eq!(query.iter().collect::<Vec<_>>(), [("id", "1"), ("id", "2")]);
	}

	#[test]
	fn collects_from_iterators() {
		let query = [("x", "1"), ("y", "2")].into_iter().collect::<Query>();

		assert_eq!(query.iter().collect::<Vec<_>>(), [("x", "1"), ("y", "2")]);
	}
}
