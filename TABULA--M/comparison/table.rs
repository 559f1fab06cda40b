use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::{error::TabulaError, safe_text::SafeText};

/// Named colour palette for rendered tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Theme {
    /// Lime header over warm beige rows.
    #[default]
    Beige,
    /// Green header over pale green rows.
    Green,
    /// Blue header over pale blue rows.
    Blue,
}

/// Resolved colours for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Header row background.
    pub header: &'static str,
    /// Background for even data rows.
    pub row_even: &'static str,
    /// Background for odd data rows.
    pub row_odd: &'static str,
}

const BEIGE: Palette = Palette {
    header: "#BEFF3F",
    row_even: "#F5F3ED",
    row_odd: "#EDE9DC",
};

const GREEN: Palette = Palette {
    header: "#A8E71F",
    row_even: "#E8F5E9",
    row_odd: "#F1F8E9",
};

const BLUE: Palette = Palette {
    header: "#64B5F6",
    row_even: "#E3F2FD",
    row_odd: "#BBDEFB",
};

impl Theme {
    /// Resolves a theme by name, case-insensitively. Unknown names map to beige.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "green" => Self::Green,
            "blue" => Self::Blue,
            _ => Self::Beige,
        }
    }

    /// Lowercase theme name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Beige => "beige",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }

    /// Colour lookup for this theme.
    #[must_use]
    pub const fn palette(self) -> Palette {
        match self {
            Self::Beige => BEIGE,
            Self::Green => GREEN,
            Self::Blue => BLUE,
        }
    }
}

impl Palette {
    /// Stripe colour for a zero-based data row index.
    #[must_use]
    pub const fn row(&self, index: usize) -> &'static str {
        if index % 2 == 0 {
            self.row_even
        } else {
            self.row_odd
        }
    }
}

impl From<String> for Theme {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl From<Theme> for String {
    fn from(value: Theme) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Item-by-attribute comparison matrix, escaped at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    title: SafeText,
    items: Vec<SafeText>,
    attributes: Vec<SafeText>,
    values: IndexMap<(String, String), SafeText>,
    theme: Theme,
}

impl ComparisonTable {
    /// Starts a builder for a table with the given title.
    #[must_use]
    pub fn builder(title: impl Into<String>) -> ComparisonTableBuilder {
        ComparisonTableBuilder::new(title)
    }

    /// Table title.
    #[must_use]
    pub const fn title(&self) -> &SafeText {
        &self.title
    }

    /// Compared items, in column order.
    #[must_use]
    pub fn items(&self) -> &[SafeText] {
        &self.items
    }

    /// Attributes, in row order.
    #[must_use]
    pub fn attributes(&self) -> &[SafeText] {
        &self.attributes
    }

    /// Colour theme.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Value for an (item, attribute) pair, keyed by the raw caller text.
    #[must_use]
    pub fn value(&self, item: &str, attribute: &str) -> Option<&SafeText> {
        self.values.get(&(item.to_string(), attribute.to_string()))
    }

    /// Number of populated cells.
    #[must_use]
    pub fn populated_cells(&self) -> usize {
        self.values.len()
    }

    /// Returns the same table with a different theme.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

/// Builder validating item uniqueness before producing a [`ComparisonTable`].
#[derive(Debug, Clone)]
pub struct ComparisonTableBuilder {
    title: String,
    items: Vec<String>,
    attributes: Vec<String>,
    values: Vec<(String, String, String)>,
    theme: Theme,
}

impl ComparisonTableBuilder {
    /// New builder with no items or attributes.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
            attributes: Vec::new(),
            values: Vec::new(),
            theme: Theme::default(),
        }
    }

    /// Appends an item column.
    #[must_use]
    pub fn item(mut self, item: impl Into<String>) -> Self {
        self.items.push(item.into());
        self
    }

    /// Appends several item columns.
    #[must_use]
    pub fn items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items.extend(items.into_iter().map(Into::into));
        self
    }

    /// Appends an attribute row.
    #[must_use]
    pub fn attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    /// Appends several attribute rows.
    #[must_use]
    pub fn attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes.extend(attributes.into_iter().map(Into::into));
        self
    }

    /// Sets the cell at (item, attribute). Later calls overwrite earlier ones.
    #[must_use]
    pub fn value(
        mut self,
        item: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.values.push((item.into(), attribute.into(), value.into()));
        self
    }

    /// Sets the theme.
    #[must_use]
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Escapes every field and checks that items are unique and non-blank and
    /// that attributes are unique.
    pub fn build(self) -> Result<ComparisonTable, TabulaError> {
        let mut seen = IndexSet::with_capacity(self.items.len());
        for item in &self.items {
            if item.trim().is_empty() {
                return Err(TabulaError::EmptyItem);
            }
            if !seen.insert(item.as_str()) {
                return Err(TabulaError::DuplicateItem(item.clone()));
            }
        }
        let mut seen = IndexSet::with_capacity(self.attributes.len());
        for attribute in &self.attributes {
            if !seen.insert(attribute.as_str()) {
                return Err(TabulaError::DuplicateAttribute(attribute.clone()));
            }
        }
        let values = self
            .values
            .into_iter()
            .map(|(item, attribute, value)| ((item, attribute), SafeText::new(value)))
            .collect();
        Ok(ComparisonTable {
            title: SafeText::new(self.title),
            items: self.items.into_iter().map(SafeText::new).collect(),
            attributes: self.attributes.into_iter().map(SafeText::new).collect(),
            values,
            theme: self.theme,
        })
    }
}

/// Serialized shape of a comparison table, as accepted by the console and CLI.
///
/// `data` is keyed item first, then attribute.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComparisonTableInput {
    /// Table title.
    pub title: String,
    /// Compared items.
    pub items: Vec<String>,
    /// Attribute rows.
    pub attributes: Vec<String>,
    /// Sparse cell values.
    #[serde(default)]
    pub data: IndexMap<String, IndexMap<String, String>>,
    /// Theme name; unknown names fall back to beige.
    #[serde(default)]
    pub theme: Theme,
}

impl TryFrom<ComparisonTableInput> for ComparisonTable {
    type Error = TabulaError;

    fn try_from(input: ComparisonTableInput) -> Result<Self, Self::Error> {
        let mut builder = Self::builder(input.title)
            .items(input.items)
            .attributes(input.attributes)
            .theme(input.theme);
        for (item, row) in input.data {
            for (attribute, value) in row {
                builder = builder.value(item.clone(), attribute, value);
            }
        }
        builder.build()
    }
}

/// Two items, each with pros and cons, escaped at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProsConsTable {
    /// First item.
    pub item_a: SafeText,
    /// Advantages of the first item.
    #[serde(default)]
    pub pros_a: Vec<SafeText>,
    /// Disadvantages of the first item.
    #[serde(default)]
    pub cons_a: Vec<SafeText>,
    /// Second item.
    pub item_b: SafeText,
    /// Advantages of the second item.
    #[serde(default)]
    pub pros_b: Vec<SafeText>,
    /// Disadvantages of the second item.
    #[serde(default)]
    pub cons_b: Vec<SafeText>,
    /// Colour theme.
    #[serde(default)]
    pub theme: Theme,
}

impl ProsConsTable {
    /// Creates a table for two items with empty lists.
    #[must_use]
    pub fn new(item_a: impl Into<String>, item_b: impl Into<String>) -> Self {
        Self {
            item_a: SafeText::new(item_a),
            pros_a: Vec::new(),
            cons_a: Vec::new(),
            item_b: SafeText::new(item_b),
            pros_b: Vec::new(),
            cons_b: Vec::new(),
            theme: Theme::default(),
        }
    }

    /// Replaces the first item's lists.
    #[must_use]
    pub fn side_a<P, C>(mut self, pros: P, cons: C) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        self.pros_a = to_safe(pros);
        self.cons_a = to_safe(cons);
        self
    }

    /// Replaces the second item's lists.
    #[must_use]
    pub fn side_b<P, C>(mut self, pros: P, cons: C) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        self.pros_b = to_safe(pros);
        self.cons_b = to_safe(cons);
        self
    }

    /// Sets the theme.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Number of data rows: the longest of the four lists.
    #[must_use]
    pub fn row_count(&self) -> usize {
        [
            self.pros_a.len(),
            self.cons_a.len(),
            self.pros_b.len(),
            self.cons_b.len(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

fn to_safe<I, S>(values: I) -> Vec<SafeText>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(|v| SafeText::new(v.into())).collect()
}
