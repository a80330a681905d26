//! Breed records as served by `api.thecatapi.com/v1/breeds`.
//!
//! Field names match the wire keys verbatim (`life_span`, `reference_image_id`, ...),
//! so serde needs no renames. Only `id` and `name` are required; everything else
//! decodes to a blank or `None` when absent or `null`.

use serde::{Deserialize, Deserializer, Serialize};

/// Free-text weight ranges, e.g. `"7 - 10"` (imperial) and `"3 - 5"` (metric).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weight {
    #[serde(default, deserialize_with = "null_as_default")]
    pub imperial: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metric: String,
}

/// One cat breed.
///
/// Constructed once per fetch response and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breed {
    #[serde(deserialize_with = "non_empty")]
    pub id: String,
    #[serde(deserialize_with = "non_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weight: Weight,

    #[serde(default, deserialize_with = "null_as_default")]
    pub origin: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub temperament: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub life_span: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country_codes: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_names: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wikipedia_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfa_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vetstreet_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcahospitals_url: Option<String>,
    /// Opaque CDN image key; see [`crate::image::image_url`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_image_id: Option<String>,

    // Trait scores: small opaque integers (mostly 0-5), displayed as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indoor: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lap: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adaptability: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affection_level: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_friendly: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cat_friendly: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dog_friendly: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_level: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grooming: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_issues: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intelligence: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shedding_level: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_needs: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stranger_friendly: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocalisation: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bidability: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experimental: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hairless: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rare: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rex: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppressed_tail: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_legs: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hypoallergenic: Option<i32>,
}

impl Breed {
    /// Minimal record with only the required fields set.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            weight: Weight::default(),
            origin: String::new(),
            description: String::new(),
            temperament: String::new(),
            life_span: String::new(),
            country_codes: String::new(),
            country_code: String::new(),
            alt_names: None,
            wikipedia_url: None,
            cfa_url: None,
            vetstreet_url: None,
            vcahospitals_url: None,
            reference_image_id: None,
            indoor: None,
            lap: None,
            adaptability: None,
            affection_level: None,
            child_friendly: None,
            cat_friendly: None,
            dog_friendly: None,
            energy_level: None,
            grooming: None,
            health_issues: None,
            intelligence: None,
            shedding_level: None,
            social_needs: None,
            stranger_friendly: None,
            vocalisation: None,
            bidability: None,
            experimental: None,
            hairless: None,
            natural: None,
            rare: None,
            rex: None,
            suppressed_tail: None,
            short_legs: None,
            hypoallergenic: None,
        }
    }

    /// Trait scores in display order, labelled. Absent scores stay `None`.
    pub fn trait_scores(&self) -> [(&'static str, Option<i32>); 24] {
        [
            ("Adaptability", self.adaptability),
            ("Affection level", self.affection_level),
            ("Child friendly", self.child_friendly),
            ("Cat friendly", self.cat_friendly),
            ("Dog friendly", self.dog_friendly),
            ("Stranger friendly", self.stranger_friendly),
            ("Energy level", self.energy_level),
            ("Intelligence", self.intelligence),
            ("Bidability", self.bidability),
            ("Social needs", self.social_needs),
            ("Vocalisation", self.vocalisation),
            ("Grooming", self.grooming),
            ("Shedding level", self.shedding_level),
            ("Health issues", self.health_issues),
            ("Hypoallergenic", self.hypoallergenic),
            ("Indoor", self.indoor),
            ("Lap", self.lap),
            ("Experimental", self.experimental),
            ("Hairless", self.hairless),
            ("Natural", self.natural),
            ("Rare", self.rare),
            ("Rex", self.rex),
            ("Suppressed tail", self.suppressed_tail),
            ("Short legs", self.short_legs),
        ]
    }

    /// External reference links that are present, labelled.
    pub fn links(&self) -> Vec<(&'static str, &str)> {
        [
            ("Wikipedia", self.wikipedia_url.as_deref()),
            ("CFA", self.cfa_url.as_deref()),
            ("Vetstreet", self.vetstreet_url.as_deref()),
            ("VCA Hospitals", self.vcahospitals_url.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, url)| url.filter(|u| !u.is_empty()).map(|u| (label, u)))
        .collect()
    }
}

/// Reject missing-in-spirit identity fields: `""` and whitespace-only strings.
fn non_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.trim().is_empty() {
        return Err(serde::de::Error::custom("expected a non-empty string"));
    }
    Ok(s)
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABYSSINIAN: &str = r#"{
        "weight": { "imperial": "7  -  10", "metric": "3 - 5" },
        "id": "abys",
        "name": "Abyssinian",
        "cfa_url": "http://cfa.org/Breeds/BreedsAB/Abyssinian.aspx",
        "vetstreet_url": "http://www.vetstreet.com/cats/abyssinian",
        "vcahospitals_url": "https://vcahospitals.com/know-your-pet/cat-breeds/abyssinian",
        "temperament": "Active, Energetic, Independent, Intelligent, Gentle",
        "origin": "Egypt",
        "country_codes": "EG",
        "country_code": "EG",
        "description": "The Abyssinian is easy to care for, and a joy to have in your home.",
        "life_span": "14 - 15",
        "indoor": 0,
        "lap": 1,
        "alt_names": "",
        "adaptability": 5,
        "affection_level": 5,
        "child_friendly": 3,
        "dog_friendly": 4,
        "energy_level": 5,
        "grooming": 1,
        "health_issues": 2,
        "intelligence": 5,
        "shedding_level": 2,
        "social_needs": 5,
        "stranger_friendly": 5,
        "vocalisation": 1,
        "experimental": 0,
        "hairless": 0,
        "natural": 1,
        "rare": 0,
        "rex": 0,
        "suppressed_tail": 0,
        "short_legs": 0,
        "wikipedia_url": "https://en.wikipedia.org/wiki/Abyssinian_(cat)",
        "hypoallergenic": 0,
        "reference_image_id": "0XYvRd7oD"
    }"#;

    #[test]
    fn decodes_full_api_record() {
        let breed: Breed = serde_json::from_str(ABYSSINIAN).unwrap();
        assert_eq!(breed.id, "abys");
        assert_eq!(breed.name, "Abyssinian");
        assert_eq!(breed.origin, "Egypt");
        assert_eq!(breed.life_span, "14 - 15");
        assert_eq!(breed.weight.metric, "3 - 5");
        assert_eq!(breed.reference_image_id.as_deref(), Some("0XYvRd7oD"));
        assert_eq!(breed.affection_level, Some(5));
        assert_eq!(breed.suppressed_tail, Some(0));
        assert_eq!(breed.alt_names.as_deref(), Some(""));
        // Not sent for this breed.
        assert!(breed.cat_friendly.is_none());
        assert!(breed.bidability.is_none());
    }

    #[test]
    fn minimal_record_defaults_to_blank() {
        let breed: Breed = serde_json::from_str(r#"{"id": "aege", "name": "Aegean"}"#).unwrap();
        assert_eq!(breed, Breed::new("aege", "Aegean"));
        assert_eq!(breed.origin, "");
        assert_eq!(breed.weight, Weight::default());
        assert!(breed.reference_image_id.is_none());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let breed: Breed = serde_json::from_str(
            r#"{"id": "beng", "name": "Bengal", "image": {"id": "O3btzLlsO", "width": 1100}}"#,
        )
        .unwrap();
        assert_eq!(breed.name, "Bengal");
    }

    #[test]
    fn missing_name_is_rejected() {
        let err = serde_json::from_str::<Breed>(r#"{"id": "abys"}"#).unwrap_err();
        assert!(err.to_string().contains("name"), "{err}");
    }

    #[test]
    fn empty_id_is_rejected() {
        let err = serde_json::from_str::<Breed>(r#"{"id": "  ", "name": "Abyssinian"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("non-empty"), "{err}");
    }

    #[test]
    fn wrong_score_type_is_rejected() {
        let result =
            serde_json::from_str::<Breed>(r#"{"id": "abys", "name": "A", "grooming": "high"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn roundtrip_preserves_absent_optionals() {
        let json = format!(
            "[{ABYSSINIAN}, {{\"id\": \"aege\", \"name\": \"Aegean\", \"origin\": \"Greece\"}}]"
        );
        let first: Vec<Breed> = serde_json::from_str(&json).unwrap();
        let encoded = serde_json::to_string(&first).unwrap();
        assert!(!encoded.contains("\"cat_friendly\""));
        let second: Vec<Breed> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(first, second);
        assert!(second[1].reference_image_id.is_none());
    }

    #[test]
    fn links_skip_absent_and_empty() {
        let mut breed = Breed::new("abys", "Abyssinian");
        breed.wikipedia_url = Some("https://en.wikipedia.org/wiki/Abyssinian_(cat)".into());
        breed.cfa_url = Some(String::new());
        let links = breed.links();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].0, "Wikipedia");
    }

    #[test]
    fn trait_scores_are_labelled_in_order() {
        let mut breed = Breed::new("abys", "Abyssinian");
        breed.adaptability = Some(5);
        let scores = breed.trait_scores();
        assert_eq!(scores[0], ("Adaptability", Some(5)));
        assert_eq!(scores.iter().filter(|(_, s)| s.is_some()).count(), 1);
    }

    #[test]
    fn null_fields_decode_as_blank() {
        let json = r#"[
            {"id": "abys", "name": "Abyssinian", "origin": "Egypt"},
            {"id": "aege", "name": "Aegean", "origin": null, "weight": null,
             "temperament": null, "country_code": null, "alt_names": null}
        ]"#;
        let breeds: Vec<Breed> = serde_json::from_str(json).unwrap();
        assert_eq!(breeds.len(), 2);
        assert_eq!(breeds[0].origin, "Egypt");
        assert_eq!(breeds[1].origin, "");
        assert_eq!(breeds[1].weight, Weight::default());
        assert_eq!(breeds[1].temperament, "");
        assert_eq!(breeds[1].country_code, "");
        assert!(breeds[1].alt_names.is_none());
    }

    #[test]
    fn null_weight_halves_decode_as_blank() {
        let json = r#"{"id": "abys", "name": "Abyssinian",
                       "weight": {"imperial": null, "metric": "3 - 5"}}"#;
        let breed: Breed = serde_json::from_str(json).unwrap();
        assert_eq!(breed.weight.imperial, "");
        assert_eq!(breed.weight.metric, "3 - 5");
    }

    #[test]
    fn null_name_is_still_rejected() {
        let err = serde_json::from_str::<Breed>(r#"{"id": "abys", "name": null}"#).unwrap_err();
        assert!(err.to_string().contains("string"), "{err}");
    }
}
