use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One row of the restaurant table before augmentation.
#[derive(Debug, Clone)]
pub(crate) struct RestaurantRecord {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) rating: f64,
    pub(crate) price: String,
    pub(crate) categories: Vec<String>,
    pub(crate) image_url: Option<String>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<RestaurantRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<RestaurantRow>() {
        let row = record?;
        records.push(RestaurantRecord {
            id: row.id,
            categories: split_categories(row.categories_list.as_deref().unwrap_or_default()),
            name: row.name,
            rating: row.rating.unwrap_or(0.0).clamp(0.0, 5.0),
            price: row.price.unwrap_or_default(),
            image_url: row.image_url,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct RestaurantRow {
    id: u64,
    name: String,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    price: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    categories_list: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    image_url: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts `Pizza, Italian` as well as list literals such as `['Pizza', "Italian"]`.
fn split_categories(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(trimmed);

    inner
        .split(',')
        .map(|part| part.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
pub(crate) fn split_categories_for_tests(raw: &str) -> Vec<String> {
    split_categories(raw)
}
