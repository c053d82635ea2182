use crate::structs;

/// Right-hand time label. Anything within the next two minutes is "due".
pub fn due_label(time_to_station: u64) -> String {
    let minutes = time_to_station / 60;

    if minutes <= 1 {
        return " due".to_string();
    }
    return format!(" {}min", minutes);
}

/// Lays out one arrival as `"{rank} {line} {destination} {time}"`, with the
/// line name right-aligned to `name_width` and the destination cut to
/// whatever room is left.
pub fn format_line(record: &structs::ArrivalRecord,
                   rank: usize,
                   name_width: usize,
                   columns: usize) -> structs::DisplayLine {
    // `{:>}` pads by char count and leaves longer names alone.
    let prefix = format!("{} {:>width$} ", rank, record.line_name, width = name_width);
    let suffix = due_label(record.time_to_station);

    let middle_length = columns
        .saturating_sub(prefix.chars().count())
        .saturating_sub(suffix.chars().count());
    let destination: String = record.destination_name.chars().take(middle_length).collect();

    // Prefix and suffix alone can overflow a narrow display.
    return structs::DisplayLine::new(
        &format!("{}{}{}", prefix, destination, suffix), columns);
}
