#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalRecord {
    pub line_name: String,
    pub destination_name: String,
    // Seconds.
    pub time_to_station: u64,
}

impl ArrivalRecord {
    pub fn new(line_name: &str, destination_name: &str, time_to_station: u64) -> ArrivalRecord {
        return ArrivalRecord{
            line_name: line_name.to_string(),
            destination_name: destination_name.to_string(),
            time_to_station: time_to_station,
        };
    }
}

/// One row of display text, never wider than the display it was built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    text: String,
}

impl DisplayLine {
    /// Hard-cuts `text` to at most `columns` characters.
    pub fn new(text: &str, columns: usize) -> DisplayLine {
        return DisplayLine{
            text: text.chars().take(columns).collect(),
        };
    }

    pub fn text(&self) -> &str {
        return &self.text;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayState {
    Loading,
    Normal(Vec<DisplayLine>),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const NEUTRAL: Rgb = Rgb{r: 175, g: 175, b: 175};
    pub const ERROR: Rgb = Rgb{r: 150, g: 0, b: 0};
}

#[cfg(test)]
mod tests {
    use super::{ArrivalRecord, DisplayLine};

    #[test]
    fn display_line_cuts_to_width() {
        assert_eq!("1 BB Oxford Circ", DisplayLine::new("1 BB Oxford Circus due", 16).text());
        assert_eq!("short", DisplayLine::new("short", 16).text());
        assert_eq!("", DisplayLine::new("anything", 0).text());
    }

    #[test]
    fn display_line_counts_chars_not_bytes() {
        assert_eq!("Hôtel", DisplayLine::new("Hôtel de Ville", 5).text());
    }

    #[test]
    fn decode_ignores_unknown_fields() {
        let raw = r#"{"$type":"Tfl.Api.Presentation.Entities.Prediction, Tfl.Api.Presentation.Entities","id":"-1","lineName":"73","destinationName":"Stoke Newington","timeToStation":421,"modeName":"bus"}"#;
        let record: ArrivalRecord = serde_json::from_str(raw).expect("decode");
        assert_eq!(ArrivalRecord::new("73", "Stoke Newington", 421), record);
    }
}
