/// Lazy iterator over the proper prefixes of a token list, shortest first
///
/// For tokens `[a, b, c, d]`, yields: `[a]` → `[a, b]` → `[a, b, c]`
///
/// The full list is never yielded: a route is not its own layout.
///
/// # Performance
///
/// - **Allocations**: Zero (only borrows sub-slices of the input)
/// - **Complexity**: O(depth) where depth is the number of tokens
///
/// # Examples
///
/// ```
/// use define_remix_app::path::PrefixHierarchy;
///
/// let tokens = ["a", "b", "c"];
/// let prefixes: Vec<&[&str]> = PrefixHierarchy::new(&tokens).collect();
/// assert_eq!(prefixes, vec![&tokens[..1], &tokens[..2]]);
/// ```
pub struct PrefixHierarchy<'a, T> {
    items: &'a [T],
    len: usize,
}

impl<'a, T> PrefixHierarchy<'a, T> {
    /// Creates a prefix iterator over the given items
    pub fn new(items: &'a [T]) -> Self {
        Self { items, len: 0 }
    }
}

impl<'a, T> Iterator for PrefixHierarchy<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<Self::Item> {
        self.len += 1;
        (self.len < self.items.len()).then(|| &self.items[..self.len])
    }
}

// Manual impl: a derive would require `T: Clone`
impl<'a, T> Clone for PrefixHierarchy<'a, T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items,
            len: self.len,
        }
    }
}
