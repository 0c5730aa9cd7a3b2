use serde::{Deserialize, Serialize};

/// Ordered list of class names whose clicks inside the embedded page ask the
/// host page to scroll to the embed.
///
/// Both the generator and the embedded page normalize through
/// [`ButtonClasses::parse`] / [`normalize_class`], so a class list written as
/// `".cta, .signup-button"` matches the same elements on both sides.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ButtonClasses(Vec<String>);

impl ButtonClasses {
    /// Normalize raw, user-typed text: split on any run of commas and
    /// whitespace, strip one leading `.` from each token, drop empties.
    ///
    /// ```
    /// use framebridge_protocol::ButtonClasses;
    ///
    /// let classes = ButtonClasses::parse(".Foo, bar  baz");
    /// assert_eq!(classes.as_slice(), ["Foo", "bar", "baz"]);
    /// ```
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(|c: char| c == ',' || c.is_whitespace())
                .filter_map(normalize_class)
                .map(str::to_owned)
                .collect(),
        )
    }

    /// Whether no class survived normalization.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The classes in configured order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Iterate the classes in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Normalize a single class token, returning `None` when nothing is left.
///
/// Applied again by the embedded page when matching clicks, so lists that
/// were not produced by [`ButtonClasses::parse`] still behave the same.
pub fn normalize_class(token: &str) -> Option<&str> {
    let token = token.trim();
    let token = token.strip_prefix('.').unwrap_or(token);
    (!token.is_empty()).then_some(token)
}

impl From<Vec<String>> for ButtonClasses {
    fn from(value: Vec<String>) -> Self {
        Self(value)
    }
}

impl From<ButtonClasses> for Vec<String> {
    fn from(value: ButtonClasses) -> Self {
        value.0
    }
}

impl<'a> IntoIterator for &'a ButtonClasses {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
