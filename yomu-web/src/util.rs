use yomu_client::api::Time;

/// Dates show up under post titles and comments as eg. `2023/01/25`
///
/// Rendered in UTC, not the viewer's local zone: near midnight the day shown
/// can differ from the viewer's.
pub fn format_date(time: &Time) -> String {
    time.format("%Y/%m/%d").to_string()
}
