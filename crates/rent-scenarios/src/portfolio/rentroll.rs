use super::domain::FloorplanDetails;
use crate::engine::{EngineError, Floorplan};
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Error raised while importing a rent-roll CSV export.
#[derive(Debug, thiserror::Error)]
pub enum RentRollImportError {
    #[error("failed to open rent roll: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read rent roll csv: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Invalid(#[from] EngineError),
    #[error("rent roll contained no floorplan rows")]
    Empty,
}

/// Parses a rent-roll CSV export into floorplan drafts.
///
/// Expected columns: `Name`, `Unit Type`, `Unit Count`, `Square Footage`,
/// `Base Rent`, `Amenity Rent`, with optional `Floor Level` and `View Type`.
/// Every row is validated through the engine's floorplan input rules before
/// the import succeeds; one bad row rejects the whole file.
pub fn parse_rent_roll<R: Read>(reader: R) -> Result<Vec<FloorplanDetails>, RentRollImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<RentRollRow>() {
        let details = record?.into_details();
        details.floorplan.validate()?;
        rows.push(details);
    }

    if rows.is_empty() {
        return Err(RentRollImportError::Empty);
    }

    Ok(rows)
}

pub fn parse_rent_roll_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<FloorplanDetails>, RentRollImportError> {
    let file = File::open(path)?;
    parse_rent_roll(file)
}

#[derive(Debug, Deserialize)]
struct RentRollRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Unit Type")]
    unit_type: String,
    #[serde(rename = "Unit Count")]
    unit_count: u32,
    #[serde(rename = "Square Footage")]
    square_footage: f64,
    #[serde(rename = "Base Rent")]
    base_rent: f64,
    #[serde(rename = "Amenity Rent")]
    amenity_rent: f64,
    #[serde(rename = "Floor Level", default, deserialize_with = "empty_string_as_none")]
    floor_level: Option<String>,
    #[serde(rename = "View Type", default, deserialize_with = "empty_string_as_none")]
    view_type: Option<String>,
}

impl RentRollRow {
    fn into_details(self) -> FloorplanDetails {
        FloorplanDetails {
            floorplan: Floorplan {
                name: self.name,
                unit_type: self.unit_type,
                unit_count: self.unit_count,
                square_footage: self.square_footage,
                base_rent: self.base_rent,
                amenity_rent: self.amenity_rent,
            },
            floor_level: self.floor_level,
            view_type: self.view_type,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
Name,Unit Type,Unit Count,Square Footage,Base Rent,Amenity Rent,Floor Level,View Type
A1 - Studio,Studio,40,450,1200.00,50.00,1-4,Courtyard
B1 - One Bedroom,1BR,80,650,1450.00,75.00,,
";

    #[test]
    fn parses_rows_with_optional_metadata() {
        let rows = parse_rent_roll(Cursor::new(SAMPLE)).expect("rent roll parses");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].floorplan.name, "A1 - Studio");
        assert_eq!(rows[0].floorplan.unit_count, 40);
        assert_eq!(rows[0].floor_level.as_deref(), Some("1-4"));
        assert_eq!(rows[1].floor_level, None);
        assert_eq!(rows[1].view_type, None);
        assert!((rows[1].floorplan.base_rent - 1450.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_rows_that_fail_engine_validation() {
        let csv = "\
Name,Unit Type,Unit Count,Square Footage,Base Rent,Amenity Rent
Broken,1BR,10,0,1450.00,75.00
";

        assert!(matches!(
            parse_rent_roll(Cursor::new(csv)),
            Err(RentRollImportError::Invalid(EngineError::InvalidInput {
                field: "square_footage",
                ..
            }))
        ));
    }

    #[test]
    fn empty_file_is_an_error() {
        let csv = "Name,Unit Type,Unit Count,Square Footage,Base Rent,Amenity Rent\n";

        assert!(matches!(
            parse_rent_roll(Cursor::new(csv)),
            Err(RentRollImportError::Empty)
        ));
    }
}
