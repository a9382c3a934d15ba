use crate::model::location::{format_degrees, Coordinates, SavedLocation};
use crate::prelude::LineError;

/// Parses one `lat,lon,name` line. Everything after the second comma is the
/// name, commas included.
pub fn parse_line(line: &str) -> Result<SavedLocation, LineError> {
    let trimmed = line.trim();
    let fields: Vec<&str> = trimmed.splitn(3, ',').collect();
    if fields.len() < 3 {
        return Err(LineError::TooFewFields(fields.len()));
    }

    let latitude = parse_degrees(fields[0])
        .ok_or_else(|| LineError::InvalidLatitude(fields[0].trim().to_string()))?;
    let longitude = parse_degrees(fields[1])
        .ok_or_else(|| LineError::InvalidLongitude(fields[1].trim().to_string()))?;
    let coordinates = Coordinates::new(latitude, longitude).ok_or(LineError::OutOfRange {
        latitude,
        longitude,
    })?;

    Ok(SavedLocation::at(coordinates, fields[2]))
}

/// Serializes a location as one newline-terminated line.
pub fn format_line(location: &SavedLocation) -> String {
    format!(
        "{},{},{}\n",
        format_degrees(location.latitude),
        format_degrees(location.longitude),
        location.name
    )
}

fn parse_degrees(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_keeps_embedded_commas() {
        let location = parse_line("40.7,-74.0,New York,NY").unwrap();
        assert_eq!(location.latitude, 40.7);
        assert_eq!(location.longitude, -74.0);
        assert_eq!(location.name, "New York,NY");
    }

    #[test]
    fn short_lines_report_field_count() {
        assert_eq!(parse_line(""), Err(LineError::TooFewFields(1)));
        assert_eq!(parse_line("1.0,2.0"), Err(LineError::TooFewFields(2)));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let location = parse_line("  10.5 , 20.25 ,Office \r\n").unwrap();
        assert_eq!(location.latitude, 10.5);
        assert_eq!(location.longitude, 20.25);
        assert_eq!(location.name, "Office");
    }

    #[test]
    fn non_numeric_fields_are_typed_errors() {
        assert_eq!(
            parse_line("north,2.0,Home"),
            Err(LineError::InvalidLatitude("north".into()))
        );
        assert_eq!(
            parse_line("1.0,east,Home"),
            Err(LineError::InvalidLongitude("east".into()))
        );
        assert!(matches!(
            parse_line("91.0,0.0,Pole"),
            Err(LineError::OutOfRange { .. })
        ));
    }

    #[test]
    fn formatted_line_parses_back_to_the_same_text() {
        let line = "-33.8688,151.2093,Sydney, NSW, Australia";
        let location = parse_line(line).unwrap();
        assert_eq!(format_line(&location), format!("{line}\n"));
    }

    #[test]
    fn whole_numbers_keep_their_decimal_point() {
        let location = SavedLocation::new(10.0, 20.0, "Home");
        assert_eq!(format_line(&location), "10.0,20.0,Home\n");
    }

    #[test]
    fn exponent_input_is_rewritten_in_short_form() {
        let location = parse_line("0.00001,1e-05,Tiny").unwrap();
        assert_eq!(format_line(&location), "1e-5,1e-5,Tiny\n");
    }
}
