use std::io::{self, Write};
use weather_core::{ForecastSeries, HistoryEntry, WeatherSample};

pub fn print_forecast(series: &ForecastSeries) -> io::Result<()> {
    write_forecast(&mut io::stdout().lock(), series.current(), series.daily())
}

pub fn print_history(entries: &[HistoryEntry]) -> io::Result<()> {
    write_history(&mut io::stdout().lock(), entries)
}

fn write_forecast(out: &mut impl Write, current: &WeatherSample, daily: &[WeatherSample]) -> io::Result<()> {
    writeln!(out, "{} ({})", current.city, current.display_date())?;
    writeln!(out, "  {}", describe(current))?;

    if daily.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "Forecast:")?;
    for day in daily {
        writeln!(out, "  {:<10}  {}", day.display_date(), describe(day))?;
    }
    Ok(())
}

fn write_history(out: &mut impl Write, entries: &[HistoryEntry]) -> io::Result<()> {
    if entries.is_empty() {
        return writeln!(out, "No cities in search history.");
    }

    for entry in entries {
        writeln!(out, "{}  {}", entry.id, entry.name)?;
    }
    Ok(())
}

fn describe(sample: &WeatherSample) -> String {
    format!(
        "{:>5.1}°F  wind {:.1} mph  humidity {}%  {} [{}]",
        sample.temperature_f, sample.wind_speed, sample.humidity_pct, sample.description, sample.icon
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(day: u32, temp: f64) -> WeatherSample {
        WeatherSample {
            city: "Paris".to_string(),
            date: weather_core::model::unix_to_date(1_709_812_800 + i64::from(day) * 86_400).unwrap(),
            icon: "01d".to_string(),
            description: "clear sky".to_string(),
            temperature_f: temp,
            wind_speed: 4.56,
            humidity_pct: 62,
        }
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn forecast_lists_current_then_days() {
        let text = render(|out| write_forecast(out, &sample(0, 51.26), &[sample(1, 48.0), sample(2, 60.5)]));

        assert_eq!(
            text,
            "Paris (3/7/2024)\n\
             \x20  51.3°F  wind 4.6 mph  humidity 62%  clear sky [01d]\n\
             \n\
             Forecast:\n\
             \x20 3/8/2024     48.0°F  wind 4.6 mph  humidity 62%  clear sky [01d]\n\
             \x20 3/9/2024     60.5°F  wind 4.6 mph  humidity 62%  clear sky [01d]\n"
        );
    }

    #[test]
    fn forecast_without_days_has_no_forecast_header() {
        let text = render(|out| write_forecast(out, &sample(0, 51.0), &[]));

        assert!(text.starts_with("Paris (3/7/2024)\n"));
        assert!(!text.contains("Forecast:"));
    }

    #[test]
    fn history_prints_id_and_name_in_order() {
        let entries = [
            HistoryEntry { name: "Oslo".into(), id: "a1".into() },
            HistoryEntry { name: "Lima".into(), id: "b2".into() },
        ];

        assert_eq!(render(|out| write_history(out, &entries)), "a1  Oslo\nb2  Lima\n");
    }

    #[test]
    fn empty_history_says_so() {
        assert_eq!(render(|out| write_history(out, &[])), "No cities in search history.\n");
    }
}
