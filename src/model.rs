use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceLink {
    pub id: String,
    pub lesson_id: String,
    pub name: String,
    pub url: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    /// Calendar day of the lesson. Travels as midnight UTC on the wire.
    #[serde(with = "midnight_utc")]
    pub date: NaiveDate,
    pub title: String,
    pub content_html: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub resources: Vec<ResourceLink>,
}

mod midnight_utc {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("{}T00:00:00.000Z", date.format("%Y-%m-%d")))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        crate::export::to_date_input_value(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid lesson date: {}", raw)))
    }
}
