// src/api/models.rs
//! Wire types of the restaurant API

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// GeoJSON point; coordinates are `[longitude, latitude]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

impl Location {
    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub company_id: Option<i64>,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub postal_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    pub location: Location,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
}

/// Diet codes of a course. The API sends a list, but older entries carry
/// a plain string or nothing at all.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Diets {
    List(Vec<String>),
    Text(String),
    #[default]
    Missing,
}

impl Diets {
    /// Only a list is shown; anything else renders as a dash
    pub fn display(&self) -> String {
        match self {
            Diets::List(diets) => diets.join(", "),
            _ => " - ".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub price: Option<String>,
    #[serde(default)]
    pub diets: Diets,
}

impl Course {
    pub fn price_display(&self) -> &str {
        match self.price.as_deref() {
            Some(price) if !price.is_empty() => price,
            _ => " - ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub courses: Vec<Course>,
}

/// Weekly menu. `days` is absent when the restaurant publishes nothing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub days: Option<Vec<Day>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyMenu {
    #[serde(default)]
    pub courses: Vec<Course>,
}

/// Requested menu kind. Carried through the UI; fetching always uses the
/// weekly endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuType {
    #[default]
    Daily,
    Weekly,
}

impl MenuType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuType::Daily => "daily",
            MenuType::Weekly => "weekly",
        }
    }
}

impl fmt::Display for MenuType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Treat an explicit `null` like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restaurant_deserialization() {
        let json = r#"{
            "_id": "6470d38ecb12107db6fe24c1",
            "companyId": 1,
            "name": "Karaportti",
            "address": "Karaportti 2",
            "postalCode": "02610",
            "city": "Espoo",
            "phone": "+358 50 123 4567",
            "location": {"type": "Point", "coordinates": [24.758, 60.224]},
            "company": "Sodexo",
            "__v": 0
        }"#;

        let restaurant: Restaurant = serde_json::from_str(json).unwrap();
        assert_eq!(restaurant.id, "6470d38ecb12107db6fe24c1");
        assert_eq!(restaurant.postal_code, "02610");
        assert_eq!(restaurant.location.latitude(), 60.224);
        assert_eq!(restaurant.location.longitude(), 24.758);
    }

    #[test]
    fn test_diet_shapes() {
        let json = r#"{"days":[{"date":"Maanantai 13.11.","courses":[
            {"name":"Soup","price":"2,95 €","diets":["L","G"]},
            {"name":"Salad","diets":"VEG"},
            {"name":"Bread","price":3.5}
        ]}]}"#;

        let menu: Menu = serde_json::from_str(json).unwrap();
        let courses = &menu.days.unwrap()[0].courses;
        assert_eq!(courses[0].diets.display(), "L, G");
        assert_eq!(courses[1].diets.display(), " - ");
        assert_eq!(courses[1].price_display(), " - ");
        assert_eq!(courses[2].diets, Diets::Missing);
        assert_eq!(courses[2].price_display(), "3.5");
    }

    #[test]
    fn test_null_text_fields_default_to_empty() {
        let json = r#"[
            {"_id":"a","name":"N","phone":null,"address":null,"postalCode":null,"city":null,"company":null,"location":{"type":null,"coordinates":[24.9,60.1]}},
            {"_id":"b","name":"M","location":{"type":"Point","coordinates":[24.8,60.2]}}
        ]"#;

        let restaurants: Vec<Restaurant> = serde_json::from_str(json).unwrap();
        assert_eq!(restaurants.len(), 2);
        assert_eq!(restaurants[0].phone, "");
        assert_eq!(restaurants[0].address, "");
        assert_eq!(restaurants[0].company, "");
        assert_eq!(restaurants[0].location.kind, "");
    }

    #[test]
    fn test_nameless_course_keeps_menu() {
        let json = r#"{"days":[{"date":"Tiistai","courses":[
            {"price":"2"},
            {"name":null,"diets":null},
            {"name":"Soup"}
        ]},{"date":"Keskiviikko","courses":null}]}"#;

        let menu: Menu = serde_json::from_str(json).unwrap();
        let days = menu.days.unwrap();
        assert_eq!(days[0].courses.len(), 3);
        assert_eq!(days[0].courses[0].name, "");
        assert_eq!(days[0].courses[0].price_display(), "2");
        assert_eq!(days[0].courses[1].diets, Diets::Missing);
        assert_eq!(days[0].courses[2].name, "Soup");
        assert!(days[1].courses.is_empty());
    }

    #[test]
    fn test_menu_without_days() {
        let menu: Menu = serde_json::from_str("{}").unwrap();
        assert!(menu.days.is_none());
    }
}
