//! Self-balancing binary search tree that uses a color bit to ensure that the tree remains
//! approximately balanced during insertions and deletions. Missing keys are reported through
//! [`Error::KeyNotFound`], which carries the key that was looked up.

mod map;
mod node;
mod tree;

pub use self::map::RedBlackMap;

use std::error;
use std::fmt;
use std::result;

/// The error type for map and tree operations that look up a key.
///
/// The offending key is carried by value so that callers can branch on it programmatically
/// rather than parsing a message string.
///
/// # Examples
///
/// ```
/// use balanced_collections::red_black_tree::{Error, RedBlackMap};
///
/// let map: RedBlackMap<i32, i32> = RedBlackMap::new();
/// assert_eq!(map.get(&44), Err(Error::KeyNotFound(44)));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error<T> {
    KeyNotFound(T),
}

impl<T> Error<T> {
    /// Returns a reference to the key that was not found.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::Error;
    ///
    /// let error = Error::KeyNotFound(44);
    /// assert_eq!(error.key(), &44);
    /// ```
    pub fn key(&self) -> &T {
        match self {
            Error::KeyNotFound(key) => key,
        }
    }

    /// Consumes the error and returns the key that was not found.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::Error;
    ///
    /// let error = Error::KeyNotFound(44);
    /// assert_eq!(error.into_key(), 44);
    /// ```
    pub fn into_key(self) -> T {
        match self {
            Error::KeyNotFound(key) => key,
        }
    }
}

impl<T> fmt::Display for Error<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::KeyNotFound(key) => write!(f, "key not found: {:?}", key),
        }
    }
}

impl<T> error::Error for Error<T>
where
    T: fmt::Debug,
{
    fn description(&self) -> &str {
        match self {
            Error::KeyNotFound(_) => "key not found",
        }
    }
}

pub type Result<V, K> = result::Result<V, Error<K>>;
