use std::collections::HashMap;
use std::hash::Hash;

use regex::Regex;
use scraper::ElementRef;

/// Compose functions right to left: `compose!(f, g, h)(x)` is `f(g(h(x)))`.
///
/// Each stage is a typed closure or fn item, so passing anything that is
/// not callable fails at compile time:
///
/// ```compile_fail
/// let broken = goldwatch::compose!(|x: i32| x + 1, 42);
/// broken(1);
/// ```
///
/// ```
/// let sum_doubled = goldwatch::compose!(|x: i32| x * 2, |(a, b)| a + b);
/// assert_eq!(sum_doubled((1, 2)), 6);
/// ```
#[macro_export]
macro_rules! compose {
    ($f:expr $(,)?) => { $f };
    ($f:expr, $($rest:expr),+ $(,)?) => {
        move |x| $f($crate::compose!($($rest),+)(x))
    };
}

/// Right-to-left composition of async stages. Each stage is awaited before
/// its result feeds the next one; there is no parallel fan-out.
#[macro_export]
macro_rules! compose_async {
    ($f:expr $(,)?) => {
        move |x| async move { $f(x).await }
    };
    ($f:expr, $($rest:expr),+ $(,)?) => {
        move |x| async move {
            let inner = $crate::compose_async!($($rest),+);
            $f(inner(x).await).await
        }
    };
}

/// The capability set extractors need from a DOM handle. Absence of text or
/// of an attribute is a typed no-value, not a raw null.
pub trait DomElement {
    /// Trimmed inner text, `None` when the element has none.
    fn text(&self) -> Option<String>;
    /// Value of the named attribute, `None` when absent.
    fn attribute(&self, name: &str) -> Option<String>;
}

impl DomElement for ElementRef<'_> {
    fn text(&self) -> Option<String> {
        let joined: String = ElementRef::text(self).collect();
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }
}

/// Strip everything that is not an ASCII digit, `-`, or `.`.
pub fn sanitize_number(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == '-' || *c == '.')
        .collect()
}

/// Rewrite an `http://` or scheme-relative prefix to `https://`.
pub fn enforce_https(url: &str) -> String {
    let pattern = Regex::new(r"^(https?:)?//").unwrap();
    pattern.replace(url, "https://").to_string()
}

/// Trimmed inner text of an element.
pub fn extract_text<E: DomElement>(el: &E) -> Option<String> {
    el.text()
}

/// Curried attribute extractor: `extract_attribute("href")(&el)`.
pub fn extract_attribute<E: DomElement>(name: &str) -> impl Fn(&E) -> Option<String> + '_ {
    move |el| el.attribute(name)
}

/// Attribute value as a full URL with the https scheme enforced.
pub fn extract_url_attribute<E: DomElement>(name: &str) -> impl Fn(&E) -> Option<String> + '_ {
    move |el| el.attribute(name).map(|url| enforce_https(&url))
}

/// Numeric content of an element: parse the sanitized inner text.
pub fn extract_number<E: DomElement>(el: &E) -> Option<f64> {
    let text = |el: &E| el.text();
    let sanitize = |t: Option<String>| t.map(|t| sanitize_number(&t));
    let parse = |t: Option<String>| t.and_then(|t| t.parse::<f64>().ok());
    compose!(parse, sanitize, text)(el)
}

/// Drop the `None` entries from a sequence of optional values.
pub fn without_nulls<T>(values: Vec<Option<T>>) -> Vec<T> {
    values.into_iter().flatten().collect()
}

/// Fold key/value pairs into one mapping; later keys overwrite earlier ones.
pub fn pairs_to_mapping<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> HashMap<K, V>
where
    K: Eq + Hash,
{
    let mut mapping = HashMap::new();
    for (key, value) in pairs {
        mapping.insert(key, value);
    }
    mapping
}

/// Apply an extractor to every element, collecting results in document order.
pub fn extract_all<E, V>(
    elements: impl IntoIterator<Item = E>,
    extractor: impl Fn(&E) -> V,
) -> Vec<V> {
    elements.into_iter().map(|el| extractor(&el)).collect()
}

/// Like [`extract_all`], then apply a transform to the whole collected
/// sequence.
pub fn extract_all_with<E, V, O>(
    elements: impl IntoIterator<Item = E>,
    extractor: impl Fn(&E) -> V,
    transform: impl FnOnce(Vec<V>) -> O,
) -> O {
    transform(extract_all(elements, extractor))
}
