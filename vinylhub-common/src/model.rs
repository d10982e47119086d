//! Domain model for the vinyl collection catalog
//!
//! An [`Album`] is the persistent collection entry. [`SearchResult`] and
//! [`AlbumDetail`] are the transient shapes returned by catalog searches;
//! they are never stored. [`ConditionGrade`] is the record-collecting
//! quality scale a collection entry can be annotated with.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Error;

/// A catalogued album held in a user's collection.
///
/// Fields mirror the wire shape: `cover_url` is null when the catalog has
/// no artwork, `condition` is null until the owner grades the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    /// Catalog album ID (opaque, unique per album)
    pub id: String,
    pub name: String,
    /// Primary (first-credited) artist name
    pub artist: String,
    /// As reported by the catalog: `YYYY`, `YYYY-MM`, or `YYYY-MM-DD`
    pub release_date: String,
    pub cover_url: Option<String>,
    pub spotify_url: String,
    /// Physical condition grade, unset until the owner assigns one
    #[serde(default)]
    pub condition: Option<ConditionGrade>,
}

/// One row of a catalog search, annotated with collection membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub release_date: String,
    pub cover_url: Option<String>,
    pub spotify_url: String,
    /// Whether the requesting user already holds this album
    #[serde(default)]
    pub in_collection: bool,
}

/// Full album detail fetched on demand from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumDetail {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub release_date: String,
    pub cover_url: Option<String>,
    pub spotify_url: String,
    pub label: Option<String>,
    /// Catalog popularity score, 0-100
    pub popularity: u32,
    pub genres: Vec<String>,
    pub tracks: Vec<TrackInfo>,
    #[serde(default)]
    pub in_collection: bool,
}

/// A single track on an album detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackInfo {
    pub name: String,
    pub duration_ms: u64,
}

/// Physical condition of a vinyl record, on the standard collecting scale.
///
/// Serialized form is always the short code (`"NM"`, `"VG+"`, ...).
/// Parsing accepts either the code or the full label, case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionGrade {
    Mint,
    NearMint,
    Excellent,
    VeryGoodPlus,
    VeryGood,
    Good,
    Fair,
    Poor,
}

impl ConditionGrade {
    /// All grades, best to worst
    pub const ALL: [ConditionGrade; 8] = [
        ConditionGrade::Mint,
        ConditionGrade::NearMint,
        ConditionGrade::Excellent,
        ConditionGrade::VeryGoodPlus,
        ConditionGrade::VeryGood,
        ConditionGrade::Good,
        ConditionGrade::Fair,
        ConditionGrade::Poor,
    ];

    /// Short grading code (`"NM"`, `"VG+"`, ...)
    pub fn code(&self) -> &'static str {
        match self {
            ConditionGrade::Mint => "M",
            ConditionGrade::NearMint => "NM",
            ConditionGrade::Excellent => "E",
            ConditionGrade::VeryGoodPlus => "VG+",
            ConditionGrade::VeryGood => "VG",
            ConditionGrade::Good => "G",
            ConditionGrade::Fair => "F",
            ConditionGrade::Poor => "P",
        }
    }

    /// Human-readable label (`"Near Mint"`, `"Very Good Plus"`, ...)
    pub fn label(&self) -> &'static str {
        match self {
            ConditionGrade::Mint => "Mint",
            ConditionGrade::NearMint => "Near Mint",
            ConditionGrade::Excellent => "Excellent",
            ConditionGrade::VeryGoodPlus => "Very Good Plus",
            ConditionGrade::VeryGood => "Very Good",
            ConditionGrade::Good => "Good",
            ConditionGrade::Fair => "Fair",
            ConditionGrade::Poor => "Poor",
        }
    }
}

impl fmt::Display for ConditionGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for ConditionGrade {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "");

        match normalized.as_str() {
            "m" | "mint" => Ok(ConditionGrade::Mint),
            "nm" | "nearmint" => Ok(ConditionGrade::NearMint),
            "e" | "ex" | "excellent" => Ok(ConditionGrade::Excellent),
            "vg+" | "verygoodplus" => Ok(ConditionGrade::VeryGoodPlus),
            "vg" | "verygood" => Ok(ConditionGrade::VeryGood),
            "g" | "good" => Ok(ConditionGrade::Good),
            "f" | "fair" => Ok(ConditionGrade::Fair),
            "p" | "poor" => Ok(ConditionGrade::Poor),
            _ => Err(Error::InvalidInput(format!("Unknown condition grade: {}", s))),
        }
    }
}

impl Serialize for ConditionGrade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for ConditionGrade {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_parses_code_and_label() {
        assert_eq!("NM".parse::<ConditionGrade>().unwrap(), ConditionGrade::NearMint);
        assert_eq!("Near Mint".parse::<ConditionGrade>().unwrap(), ConditionGrade::NearMint);
        assert_eq!("near mint".parse::<ConditionGrade>().unwrap(), ConditionGrade::NearMint);
        assert_eq!("VG+".parse::<ConditionGrade>().unwrap(), ConditionGrade::VeryGoodPlus);
        assert_eq!("very good plus".parse::<ConditionGrade>().unwrap(), ConditionGrade::VeryGoodPlus);
        assert_eq!("vg".parse::<ConditionGrade>().unwrap(), ConditionGrade::VeryGood);
        assert_eq!("  mint  ".parse::<ConditionGrade>().unwrap(), ConditionGrade::Mint);
    }

    #[test]
    fn test_grade_rejects_unknown_values() {
        assert!("pristine".parse::<ConditionGrade>().is_err());
        assert!("".parse::<ConditionGrade>().is_err());
        assert!("VG++".parse::<ConditionGrade>().is_err());
    }

    #[test]
    fn test_grade_displays_as_code() {
        assert_eq!(ConditionGrade::VeryGoodPlus.to_string(), "VG+");
        assert_eq!(ConditionGrade::Mint.to_string(), "M");
    }

    #[test]
    fn test_grade_round_trips_through_code() {
        for grade in ConditionGrade::ALL {
            assert_eq!(grade.code().parse::<ConditionGrade>().unwrap(), grade);
            assert_eq!(grade.label().parse::<ConditionGrade>().unwrap(), grade);
        }
    }

    #[test]
    fn test_grade_serializes_as_code_string() {
        let json = serde_json::to_string(&ConditionGrade::NearMint).unwrap();
        assert_eq!(json, "\"NM\"");

        let parsed: ConditionGrade = serde_json::from_str("\"very good\"").unwrap();
        assert_eq!(parsed, ConditionGrade::VeryGood);

        assert!(serde_json::from_str::<ConditionGrade>("\"shiny\"").is_err());
    }

    #[test]
    fn test_album_deserializes_without_condition() {
        let json = r#"{
            "id": "4aawyAB9vmqN3uQ7FjRGTy",
            "name": "Global Warming",
            "artist": "Pitbull",
            "release_date": "2012-11-16",
            "cover_url": null,
            "spotify_url": "https://open.spotify.com/album/4aawyAB9vmqN3uQ7FjRGTy"
        }"#;

        let album: Album = serde_json::from_str(json).unwrap();
        assert_eq!(album.name, "Global Warming");
        assert_eq!(album.cover_url, None);
        assert_eq!(album.condition, None);
    }

    #[test]
    fn test_album_serializes_condition_as_code() {
        let album = Album {
            id: "abc123".to_string(),
            name: "Kind of Blue".to_string(),
            artist: "Miles Davis".to_string(),
            release_date: "1959-08-17".to_string(),
            cover_url: Some("https://i.scdn.co/image/cover".to_string()),
            spotify_url: "https://open.spotify.com/album/abc123".to_string(),
            condition: Some(ConditionGrade::VeryGoodPlus),
        };

        let value = serde_json::to_value(&album).unwrap();
        assert_eq!(value["condition"], "VG+");
        assert_eq!(value["artist"], "Miles Davis");
    }
}
