use std::fmt;
use std::hash::{Hash, Hasher};

use super::BigList;
use crate::config::BigListConfig;

impl<T: PartialEq> PartialEq for BigList<T> {
    fn eq(&self, other: &BigList<T>) -> bool {
        return self.len() == other.len() && self.iter().eq(other.iter());
    }
}

impl<T: Eq> Eq for BigList<T> {}

impl<T: PartialEq> PartialEq<[T]> for BigList<T> {
    fn eq(&self, other: &[T]) -> bool {
        return self.iter().eq(other.iter());
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for BigList<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        return self == other.as_slice();
    }
}

impl<T: Hash> Hash for BigList<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self.iter() {
            item.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for BigList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.debug_list().entries(self.iter()).finish();
    }
}

impl<T: Clone> FromIterator<T> for BigList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> BigList<T> {
        let items: Vec<T> = iter.into_iter().collect();
        return BigList::from(items);
    }
}

impl<T: Clone> From<Vec<T>> for BigList<T> {
    fn from(items: Vec<T>) -> BigList<T> {
        match BigList::from_vec_in(BigListConfig::default(), items) {
            Ok(list) => return list,
            Err(err) => panic!("building a list from a vector failed: {err}"),
        }
    }
}

impl<T: Clone> From<&[T]> for BigList<T> {
    fn from(items: &[T]) -> BigList<T> {
        return BigList::from(items.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use super::*;

    fn hash_of(list: &BigList<u32>) -> u64 {
        let mut hasher = DefaultHasher::new();
        list.hash(&mut hasher);
        return hasher.finish();
    }

    #[test]
    fn equality_ignores_shape() {
        let flat: BigList<u32> = (0..50).collect();
        let mut deep = BigList::with_config(BigListConfig::new(2, 2).unwrap());
        for i in (0..50).rev() {
            deep.insert(0usize, i).unwrap();
        }
        assert_eq!(flat, deep);
        assert_eq!(hash_of(&flat), hash_of(&deep));
        assert_eq!(deep, (0..50).collect::<Vec<u32>>());

        deep.reverse();
        assert_ne!(flat, deep);
        assert_eq!(&deep, &(0..50).rev().collect::<Vec<u32>>()[..]);
    }

    #[test]
    fn debug_prints_elements() {
        let list = BigList::from(vec![1, 2, 3]);
        assert_eq!(format!("{list:?}"), "[1, 2, 3]");
        let empty: BigList<u8> = BigList::from(&[][..]);
        assert_eq!(format!("{empty:?}"), "[]");
    }
}
